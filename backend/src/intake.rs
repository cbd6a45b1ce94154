//! # Donation intake
//!
//! Records submissions of the three donation forms. Each submission is two
//! independent writes: the donor (account or business profile) first, then the
//! donation itself.
//!
//! Storage failures do not fail the submission. They are logged and reported as
//! [`IntakeOutcome::Accepted`], so callers can tell a stored donation from one
//! that was only acknowledged.

use crate::auth::Claims;
use crate::error::StorageError;
use crate::storage::{DonorContact, NewDonation, NewFinancialDonation, Storage};
use common::model::donation::{DonorProfile, BUSINESS_DONATION, INDIVIDUAL_DONATION};
use common::requests::{
    BusinessDonationRequest, FinancialDonationRequest, IndividualDonationRequest,
};
use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Every write reached the active store.
    Persisted,
    /// The submission was acknowledged but at least one write failed.
    Accepted,
}

impl IntakeOutcome {
    pub fn is_persisted(&self) -> bool {
        *self == IntakeOutcome::Persisted
    }
}

#[derive(Clone)]
pub struct DonationIntake {
    storage: Storage,
}

impl DonationIntake {
    pub fn new(storage: Storage) -> Self {
        DonationIntake { storage }
    }

    /// Records a business donation for the authenticated user.
    pub fn submit_business(
        &self,
        claims: &Claims,
        request: &BusinessDonationRequest,
    ) -> IntakeOutcome {
        outcome("business donation", self.record_business(claims, request))
    }

    /// Records a donation from the public individual form, creating the donor
    /// on first use of an email.
    pub fn submit_individual(&self, request: &IndividualDonationRequest) -> IntakeOutcome {
        outcome("individual donation", self.record_individual(request))
    }

    /// Records a financial pledge. Nothing is charged.
    pub fn submit_financial(&self, request: &FinancialDonationRequest) -> IntakeOutcome {
        outcome("financial donation", self.record_financial(request))
    }

    fn record_business(
        &self,
        claims: &Claims,
        request: &BusinessDonationRequest,
    ) -> Result<(), StorageError> {
        let backend = self.storage.primary();
        backend.upsert_donor_profile(&DonorProfile {
            donor_id: claims.user_id,
            business_name: request.business_name.clone(),
            business_type: request.business_type.clone(),
        })?;

        // File-store rows are matched to donors by email, so the account email
        // wins over the contact email typed on the form.
        let email = backend
            .find_user_by_id(claims.user_id)?
            .map(|user| user.email)
            .unwrap_or_else(|| request.business_email.clone());

        let donation = backend.insert_donation(NewDonation {
            donor_id: claims.user_id,
            donor: DonorContact {
                name: request.business_name.clone(),
                email,
                phone: request.business_phone.clone(),
                address: request.business_address.clone(),
            },
            donation_type: BUSINESS_DONATION.to_string(),
            food_type: request.food_type.clone(),
            quantity: request.food_quantity.clone(),
            pickup_date: request.pickup_date.clone(),
            pickup_time: request.pickup_time.clone(),
            pickup_address: request.business_address.clone(),
            notes: request.business_notes.clone(),
        })?;
        info!(
            "Business donation {} recorded for user {}",
            donation.id, claims.user_id
        );
        Ok(())
    }

    fn record_individual(&self, request: &IndividualDonationRequest) -> Result<(), StorageError> {
        let backend = self.storage.primary();
        let donor = DonorContact {
            name: request.individual_name.clone(),
            email: request.individual_email.clone(),
            phone: request.individual_phone.clone(),
            address: request.individual_address.clone(),
        };
        let donor_id = backend.ensure_donor(&donor)?;
        let donation = backend.insert_donation(NewDonation {
            donor_id,
            donor,
            donation_type: INDIVIDUAL_DONATION.to_string(),
            food_type: request.donation_type.clone(),
            quantity: request.individual_food_description.clone(),
            pickup_date: request.individual_pickup_date.clone(),
            pickup_time: request.individual_pickup_time.clone(),
            pickup_address: request.individual_address.clone(),
            notes: request.individual_notes.clone(),
        })?;
        info!(
            "Individual donation {} recorded for donor {}",
            donation.id, donor_id
        );
        Ok(())
    }

    fn record_financial(&self, request: &FinancialDonationRequest) -> Result<(), StorageError> {
        let backend = self.storage.primary();
        let donor_id = backend.ensure_donor(&DonorContact {
            name: request.donor_name.clone(),
            email: request.donor_email.clone(),
            phone: request.donor_phone.clone(),
            address: String::new(),
        })?;
        let pledge = backend.insert_financial_donation(NewFinancialDonation {
            donor_id,
            amount: request.donation_amount,
            frequency: request.donation_frequency.clone(),
            payment_method: request.payment_method.clone(),
            is_anonymous: request.anonymous,
            comments: request.comments.clone(),
        })?;
        info!(
            "Financial donation {} of {:.2} recorded for donor {}",
            pledge.id, pledge.amount, donor_id
        );
        Ok(())
    }
}

fn outcome(what: &str, result: Result<(), StorageError>) -> IntakeOutcome {
    match result {
        Ok(()) => IntakeOutcome::Persisted,
        Err(e) => {
            error!("Storing {} failed, acknowledging without persistence: {}", what, e);
            IntakeOutcome::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::UnreachableBackend;
    use crate::storage::{FileBackend, StorageBackend};
    use common::model::financial::DonationFrequency;
    use std::sync::Arc;

    fn file_intake(dir: &tempfile::TempDir) -> (DonationIntake, Arc<FileBackend>) {
        let files = Arc::new(FileBackend::open(dir.path()).unwrap());
        (
            DonationIntake::new(Storage::new(files.clone(), None)),
            files,
        )
    }

    fn individual(email: &str) -> IndividualDonationRequest {
        IndividualDonationRequest {
            individual_name: "Jo".into(),
            individual_email: email.into(),
            individual_phone: "9".into(),
            individual_address: "5 Oak Ave".into(),
            donation_type: "canned".into(),
            individual_food_description: "3 boxes".into(),
            individual_pickup_date: "2024-07-01".into(),
            individual_pickup_time: "10:00".into(),
            individual_notes: String::new(),
        }
    }

    #[test]
    fn individual_donation_creates_one_donor_and_one_donation() {
        let dir = tempfile::tempdir().unwrap();
        let (intake, files) = file_intake(&dir);

        assert_eq!(
            intake.submit_individual(&individual("jo@x.com")),
            IntakeOutcome::Persisted
        );

        let donor = files.find_user_by_email("jo@x.com").unwrap().unwrap();
        assert_eq!(files.find_user_by_id(donor.id + 1).unwrap(), None);
        let donations = files.donations_by_donor(&donor).unwrap();
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].donor_id, Some(donor.id));
        assert_eq!(donations[0].food_type, "canned");
        assert_eq!(donations[0].donation_type, INDIVIDUAL_DONATION);
    }

    #[test]
    fn repeat_donor_is_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let (intake, files) = file_intake(&dir);
        intake.submit_individual(&individual("jo@x.com"));
        intake.submit_individual(&individual("jo@x.com"));

        let donor = files.find_user_by_email("jo@x.com").unwrap().unwrap();
        assert_eq!(donor.id, 1);
        assert_eq!(files.find_user_by_id(2).unwrap(), None);
        assert_eq!(files.donations_by_donor(&donor).unwrap().len(), 2);
    }

    #[test]
    fn business_donation_is_linked_to_the_token_user() {
        let dir = tempfile::tempdir().unwrap();
        let (intake, files) = file_intake(&dir);
        let owner = files
            .insert_user(crate::storage::NewUser {
                user_type: common::model::user::UserType::Donor,
                name: "Owner".into(),
                email: "owner@x.com".into(),
                phone: "1".into(),
                password_hash: "hash".into(),
            })
            .unwrap();
        let claims = Claims {
            user_id: owner.id,
            iat: 0,
            exp: 0,
        };
        let request = BusinessDonationRequest {
            business_name: "Bakery".into(),
            business_email: "front-desk@bakery.com".into(),
            food_type: "bread".into(),
            ..BusinessDonationRequest::default()
        };

        assert!(intake.submit_business(&claims, &request).is_persisted());
        let donations = files.donations_by_donor(&owner).unwrap();
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].donation_type, BUSINESS_DONATION);
    }

    #[test]
    fn financial_donation_persists_on_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let (intake, files) = file_intake(&dir);
        let request = FinancialDonationRequest {
            donor_name: "Kim".into(),
            donor_email: "kim@x.com".into(),
            donation_amount: 50.0,
            donation_frequency: DonationFrequency::Monthly,
            ..FinancialDonationRequest::default()
        };
        assert!(intake.submit_financial(&request).is_persisted());
        assert!(files.find_user_by_email("kim@x.com").unwrap().is_some());
    }

    #[test]
    fn storage_failure_is_acknowledged_but_not_persisted() {
        let intake = DonationIntake::new(Storage::new(Arc::new(UnreachableBackend), None));
        assert_eq!(
            intake.submit_individual(&individual("jo@x.com")),
            IntakeOutcome::Accepted
        );
        assert_eq!(
            intake.submit_financial(&FinancialDonationRequest::default()),
            IntakeOutcome::Accepted
        );
    }
}
