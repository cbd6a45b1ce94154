use super::submission_response;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::IndividualDonationRequest;

/// Actix web handler for the `POST /api/individual-donation` endpoint.
///
/// No token is needed. The donor is found by email, or created with a
/// placeholder password that never logs in.
///
/// # Arguments
/// * `state` - Shared application state holding the `DonationIntake`.
/// * `payload` - The individual donation form as JSON.
///
/// # Returns
/// - `201 Created` when stored, `202 Accepted` when storage failed.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<IndividualDonationRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let intake = state.intake.clone();
    let outcome = tokio::task::spawn_blocking(move || intake.submit_individual(&request)).await?;
    Ok(submission_response(
        outcome,
        "Individual donation submitted successfully",
    ))
}
