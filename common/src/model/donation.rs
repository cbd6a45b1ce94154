use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `donationType` recorded for submissions from the business form.
pub const BUSINESS_DONATION: &str = "business";
/// `donationType` recorded for submissions from the individual form.
pub const INDIVIDUAL_DONATION: &str = "individual";

/// Lifecycle state of a food donation. Records are created `Available`;
/// nothing in the server moves them further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Available,
    Claimed,
    Completed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Available => "available",
            DonationStatus::Claimed => "claimed",
            DonationStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(DonationStatus::Available),
            "claimed" => Some(DonationStatus::Claimed),
            "completed" => Some(DonationStatus::Completed),
            _ => None,
        }
    }
}

/// A recorded food donation.
///
/// `id` is the row id for the relational store and a generated string for the
/// flat-file store. `donor_id` is unknown for rows read back from the file store,
/// which only keeps the donor's contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub donor_id: Option<i64>,
    pub donation_type: String,
    pub food_type: String,
    pub quantity: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub pickup_address: String,
    pub notes: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

/// Business details attached to a donor account, one per donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub donor_id: i64,
    pub business_name: String,
    pub business_type: String,
}
