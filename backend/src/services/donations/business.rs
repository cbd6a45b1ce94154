//! # Business Donation Service
//!
//! Backs the `POST /api/business-donation` endpoint.
//!
//! ## Workflow
//!
//! 1.  **Authentication**: the `AuthenticatedUser` extractor checks the bearer token before
//!     the handler runs. Requests without a valid token never touch storage.
//!
//! 2.  **Intake**: `DonationIntake::submit_business` upserts the donor profile (business name
//!     and type) for the token's user and records the food donation.
//!
//! 3.  **HTTP Response**: `201 Created` when the donation was stored, `202 Accepted` with
//!     `"persisted": false` when storage failed. The failure is only logged.

use super::submission_response;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::BusinessDonationRequest;

/// Actix web handler for the `POST /api/business-donation` endpoint.
///
/// # Arguments
/// * `user` - Claims of the verified bearer token.
/// * `state` - Shared application state holding the `DonationIntake`.
/// * `payload` - The business donation form as JSON.
///
/// # Returns
/// - `201 Created` or `202 Accepted` with a `SubmissionResponse`.
/// - `401`/`403` from the extractor for a missing or invalid token.
pub async fn process(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    payload: web::Json<BusinessDonationRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let intake = state.intake.clone();
    let outcome =
        tokio::task::spawn_blocking(move || intake.submit_business(&user.0, &request)).await?;
    Ok(submission_response(
        outcome,
        "Business donation submitted successfully",
    ))
}
