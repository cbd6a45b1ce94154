//! # Donation Log Service
//!
//! Backs the `POST /api/donate` endpoint, which appends to the flat-file donation log
//! independent of which backend is active.
//!
//! ## Workflow
//!
//! 1.  **Authentication**: a valid bearer token is required.
//!
//! 2.  **Row Assembly**: `to_row` stamps the submission with a millisecond id and the
//!     current time.
//!
//! 3.  **Append**: the row goes to `donations.csv` through the shared `DonationLog`, so it
//!     never interleaves with rows written by the file backend.
//!
//! 4.  **HTTP Response**: `200 OK` on success. Unlike the form endpoints, a write failure is
//!     reported as `500` with `"Error saving donation"`.

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::DonationRow;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::DonateRequest;
use common::responses::MessageResponse;
use log::{error, info};

/// Actix web handler for the `POST /api/donate` endpoint.
///
/// # Arguments
/// * `user` - Claims of the verified bearer token.
/// * `state` - Shared application state holding the donation log.
/// * `payload` - The donation as JSON.
///
/// # Returns
/// - `200 OK` with `"Donation submitted successfully"`.
/// - `500 Internal Server Error` with `"Error saving donation"` if the append fails.
pub async fn process(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    payload: web::Json<DonateRequest>,
) -> Result<HttpResponse, ApiError> {
    let row = to_row(payload.into_inner());
    let id = row.id.clone();
    let log = state.donation_log.clone();

    match tokio::task::spawn_blocking(move || log.append(&row)).await? {
        Ok(()) => {
            info!("Donation {} logged by user {}", id, user.user_id());
            Ok(HttpResponse::Ok().json(MessageResponse::ok("Donation submitted successfully")))
        }
        Err(e) => {
            error!("Error saving donation {}: {}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(MessageResponse::failure("Error saving donation")))
        }
    }
}

/// Stamps the submission with a millisecond id and the current time.
fn to_row(request: DonateRequest) -> DonationRow {
    let now = Utc::now();
    DonationRow {
        id: now.timestamp_millis().to_string(),
        donation_type: request.donation_type,
        name: request.name,
        email: request.email,
        phone: request.phone,
        address: request.address,
        food_type: request.food_type,
        quantity: request.quantity,
        pickup_date: request.pickup_date,
        pickup_time: request.pickup_time,
        notes: request.notes,
        timestamp: now,
    }
}
