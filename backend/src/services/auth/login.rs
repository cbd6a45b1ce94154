//! # Login Service
//!
//! Backs the `POST /api/login` endpoint.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives a JSON `LoginRequest` with `email` and `password`.
//!
//! 2.  **Credential Check**: `AuthService::login` looks the user up on the active store only and
//!     verifies the bcrypt hash. There is no failover here.
//!
//! 3.  **Token Issue**: on success a signed bearer token carrying the user id is issued.
//!
//! 4.  **HTTP Response**: `200 OK` with the user (minus its password hash) and the token.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::LoginRequest;
use common::responses::LoginResponse;
use log::info;

/// Actix web handler for the `POST /api/login` endpoint.
///
/// # Arguments
/// * `state` - Shared application state holding the `AuthService`.
/// * `payload` - The login form as JSON.
///
/// # Returns
/// - `200 OK` with a `LoginResponse` (user without its hash, bearer token).
/// - `401 Unauthorized` with `"Invalid credentials"` for an unknown email or a wrong password.
/// - `500 Internal Server Error` if the store cannot be read.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    info!("POST /api/login for {}", request.email);

    let auth = state.auth.clone();
    let session = tokio::task::spawn_blocking(move || auth.login(&request)).await??;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        user: session.user,
        token: session.token,
    }))
}
