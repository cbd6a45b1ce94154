use super::submission_response;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::FinancialDonationRequest;

/// Actix web handler for the `POST /api/financial-donation` endpoint.
///
/// The pledge is recorded; no payment is made. Amounts may be numbers or text
/// such as `"$25.00"`, and any frequency label is kept.
///
/// # Arguments
/// * `state` - Shared application state holding the `DonationIntake`.
/// * `payload` - The pledge form as JSON.
///
/// # Returns
/// - `201 Created` when stored, `202 Accepted` when storage failed.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<FinancialDonationRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let intake = state.intake.clone();
    let outcome = tokio::task::spawn_blocking(move || intake.submit_financial(&request)).await?;
    Ok(submission_response(
        outcome,
        "Financial donation submitted successfully",
    ))
}
