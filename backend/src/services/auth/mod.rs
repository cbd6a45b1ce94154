//! Account endpoints: registration and login.

mod login;
mod register;

use actix_web::web::{self, post};

/// Registers the account routes on the `/api` scope.
///
/// # Registered Routes:
///
/// *   **`POST /register`**:
///     - **Handler**: `register::process`
///     - **Description**: Creates an account from a `RegisterRequest`.
///
/// *   **`POST /login`**:
///     - **Handler**: `login::process`
///     - **Description**: Verifies credentials and returns the user with a bearer token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", post().to(register::process))
        .route("/login", post().to(login::process));
}
