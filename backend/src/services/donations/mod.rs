//! Donation endpoints.
//!
//! The three form endpoints answer `201 Created` when the donation was stored
//! and `202 Accepted` (with `"persisted": false`) when storage failed and the
//! submission was only acknowledged. `success` is true in both cases.

mod business;
mod donate;
mod financial;
mod individual;
mod list;

use crate::intake::IntakeOutcome;
use actix_web::web::{self, get, post};
use actix_web::HttpResponse;
use common::responses::SubmissionResponse;

/// Registers the donation routes on the `/api` scope.
///
/// # Registered Routes:
///
/// *   **`POST /business-donation`** (bearer token):
///     - **Handler**: `business::process`
///     - **Description**: Records a business donation and its donor profile.
///
/// *   **`POST /individual-donation`**:
///     - **Handler**: `individual::process`
///     - **Description**: Records a donation from the public form, creating the donor if needed.
///
/// *   **`POST /financial-donation`**:
///     - **Handler**: `financial::process`
///     - **Description**: Records a money pledge.
///
/// *   **`POST /donate`** (bearer token):
///     - **Handler**: `donate::process`
///     - **Description**: Appends a row to the flat-file donation log.
///
/// *   **`GET /donations`** (bearer token):
///     - **Handler**: `list::process`
///     - **Description**: Lists the caller's donations.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/business-donation", post().to(business::process))
        .route("/individual-donation", post().to(individual::process))
        .route("/financial-donation", post().to(financial::process))
        .route("/donate", post().to(donate::process))
        .route("/donations", get().to(list::process));
}

fn submission_response(outcome: IntakeOutcome, message: &str) -> HttpResponse {
    let body = SubmissionResponse {
        success: true,
        message: message.to_string(),
        persisted: outcome.is_persisted(),
    };
    match outcome {
        IntakeOutcome::Persisted => HttpResponse::Created().json(body),
        IntakeOutcome::Accepted => HttpResponse::Accepted().json(body),
    }
}
