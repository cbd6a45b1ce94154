//! # Registration Service
//!
//! Backs the `POST /api/register` endpoint.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives a JSON `RegisterRequest` with `name`, `email`,
//!     `phone`, `password` and `userType`. Any `userType` label is accepted.
//!
//! 2.  **Registration**: the request moves onto the blocking pool and into
//!     `AuthService::register`, which checks that email and password are present, hashes the
//!     password with bcrypt and stores the user on the active backend. If that backend is
//!     unreachable the user is stored on the flat-file store instead.
//!
//! 3.  **HTTP Response**: `201 Created` with `{"success":true,"message":"Registration successful"}`.
//!     Validation failures and taken emails become `400`, storage failures `500`.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::RegisterRequest;
use common::responses::MessageResponse;
use log::info;

/// Actix web handler for the `POST /api/register` endpoint.
///
/// # Arguments
/// * `state` - Shared application state holding the `AuthService`.
/// * `payload` - The registration form as JSON.
///
/// # Returns
/// - `201 Created` once the user is stored (on the failover store if the
///   database is unreachable).
/// - `400 Bad Request` with `"Email already registered"` for a taken email, or
///   `"Missing required field: ..."` when email or password is empty.
/// - `500 Internal Server Error` when no store accepted the user.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    info!("POST /api/register for {}", request.email);

    let auth = state.auth.clone();
    tokio::task::spawn_blocking(move || auth.register(&request)).await??;

    Ok(HttpResponse::Created().json(MessageResponse::ok("Registration successful")))
}
