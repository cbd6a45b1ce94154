use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, StorageError};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::donation::Donation;
use common::responses::DonationListResponse;

/// Actix web handler for the `GET /api/donations` endpoint.
///
/// Lists the caller's donations from the active store. A token whose user is
/// unknown to that store (it was issued by the other one) sees an empty list.
///
/// # Arguments
/// * `user` - Claims of the verified bearer token.
/// * `state` - Shared application state holding the `Storage`.
///
/// # Returns
/// - `200 OK` with a `DonationListResponse`.
/// - `500 Internal Server Error` if the store cannot be read.
pub async fn process(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let storage = state.storage.clone();
    let user_id = user.user_id();
    let donations = tokio::task::spawn_blocking(move || -> Result<Vec<Donation>, StorageError> {
        let backend = storage.primary();
        match backend.find_user_by_id(user_id)? {
            Some(donor) => backend.donations_by_donor(&donor),
            None => Ok(Vec::new()),
        }
    })
    .await??;

    Ok(HttpResponse::Ok().json(DonationListResponse {
        success: true,
        donations,
    }))
}
