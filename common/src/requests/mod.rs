//! JSON payloads accepted by the `/api` endpoints.
//!
//! Field names follow the form element names posted by the web pages
//! (`businessName`, `individualEmail`, ...). Every field defaults to empty so a
//! partially filled form still deserializes; required-field checks live in the
//! pages themselves.

use crate::model::financial::DonationFrequency;
use crate::model::user::UserType;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessDonationRequest {
    pub business_name: String,
    pub business_type: String,
    pub contact_name: String,
    pub business_email: String,
    pub business_phone: String,
    pub business_address: String,
    pub food_type: String,
    pub food_quantity: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub business_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndividualDonationRequest {
    pub individual_name: String,
    pub individual_email: String,
    pub individual_phone: String,
    pub individual_address: String,
    /// Food category picked on the form; stored as the donation's food type.
    pub donation_type: String,
    pub individual_food_description: String,
    pub individual_pickup_date: String,
    pub individual_pickup_time: String,
    pub individual_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialDonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    #[serde(deserialize_with = "amount_from_number_or_text")]
    pub donation_amount: f64,
    pub donation_frequency: DonationFrequency,
    pub payment_method: String,
    pub comments: String,
    pub anonymous: bool,
}

/// Free-form donation posted to `/api/donate` and appended to the donation log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonateRequest {
    pub donation_type: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub food_type: String,
    pub quantity: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub notes: String,
}

/// Form inputs post amounts as text (`"25.00"`), API clients as numbers.
fn amount_from_number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => {
            let trimmed = text.trim().trim_start_matches('$');
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", text)))
        }
    }
}
