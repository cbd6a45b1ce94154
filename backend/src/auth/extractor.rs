use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

/// Token part of an `Authorization: Bearer <token>` value. The scheme matches
/// case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
}

/// Request guard for endpoints that need a bearer token.
///
/// Rejects with `401` when the `Authorization` header is missing or not a bearer
/// token, and with `403` when the token does not verify. Handlers taking this
/// extractor never run for unauthenticated requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ApiError::Internal(
                "application state is not configured".to_string(),
            )));
        };

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        ready(
            state
                .auth
                .verify_token(token)
                .map(AuthenticatedUser)
                .map_err(ApiError::from),
        )
    }
}
