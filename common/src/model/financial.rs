use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a pledge recurs.
///
/// Form aliases (`once`, `yearly`, ...) fold into the canonical variants. Any
/// other label is kept as [`DonationFrequency::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DonationFrequency {
    #[default]
    OneTime,
    Monthly,
    Quarterly,
    Annually,
    Other(String),
}

impl DonationFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            DonationFrequency::OneTime => "one-time",
            DonationFrequency::Monthly => "monthly",
            DonationFrequency::Quarterly => "quarterly",
            DonationFrequency::Annually => "annually",
            DonationFrequency::Other(label) => label,
        }
    }
}

impl From<String> for DonationFrequency {
    fn from(label: String) -> Self {
        match label.as_str() {
            "" | "one-time" | "once" | "one_time" | "onetime" => DonationFrequency::OneTime,
            "monthly" => DonationFrequency::Monthly,
            "quarterly" => DonationFrequency::Quarterly,
            "annually" | "annual" | "yearly" => DonationFrequency::Annually,
            _ => DonationFrequency::Other(label),
        }
    }
}

impl From<DonationFrequency> for String {
    fn from(frequency: DonationFrequency) -> Self {
        match frequency {
            DonationFrequency::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// A pledged money donation. It is only recorded; no payment is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialDonation {
    pub id: String,
    pub donor_id: i64,
    pub amount: f64,
    pub frequency: DonationFrequency,
    pub payment_method: String,
    pub is_anonymous: bool,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_accepts_form_aliases() {
        let parsed: DonationFrequency = serde_json::from_str("\"once\"").unwrap();
        assert_eq!(parsed, DonationFrequency::OneTime);
        let parsed: DonationFrequency = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(parsed, DonationFrequency::Annually);
        assert_eq!(
            serde_json::to_string(&DonationFrequency::OneTime).unwrap(),
            "\"one-time\""
        );
    }

    #[test]
    fn unlisted_frequency_is_kept() {
        let parsed: DonationFrequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, DonationFrequency::Other("weekly".into()));
        assert_eq!(parsed.as_str(), "weekly");
    }
}
