//! # HTTP API
//!
//! Routes JSON requests under `/api` to the auth and donation-intake services.
//!
//! ## Sub-modules:
//! - `auth`: registration and login.
//! - `donations`: the three donation forms, the flat-file `/donate` endpoint and
//!   the listing of a donor's own donations.
//!
//! Blocking work (bcrypt, SQLite, file I/O) runs on Tokio's blocking pool so the
//! actix workers keep serving requests.

mod auth;
mod donations;

use actix_web::error::InternalError;
use actix_web::web::{self, scope};
use actix_web::{HttpResponse, Scope};
use common::responses::MessageResponse;

/// The base path for all API endpoints.
const API_PATH: &str = "/api";

/// Request bodies are small form submissions.
const JSON_LIMIT: usize = 64 * 1024;

/// Registers the JSON extractor settings and every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(configure_routes());
}

/// Configures and returns the Actix `Scope` for all API routes.
///
/// # Registered Routes:
///
/// *   **`POST /register`**: creates an account, `201` or `400` for a taken email.
/// *   **`POST /login`**: checks credentials and returns the user plus a bearer token.
/// *   **`POST /business-donation`** (bearer token): records a business donation.
/// *   **`POST /individual-donation`**: records a donation from the public form.
/// *   **`POST /financial-donation`**: records a money pledge.
/// *   **`POST /donate`** (bearer token): appends a row to the flat-file donation log.
/// *   **`GET /donations`** (bearer token): lists the caller's donations.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .configure(auth::configure_routes)
        .configure(donations::configure_routes)
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(MessageResponse::failure(format!("Invalid request body: {}", err)));
            InternalError::from_response(err, response).into()
        })
}
