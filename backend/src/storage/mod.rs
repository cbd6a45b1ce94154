//! # Storage
//!
//! Persistence for users and donations behind the [`StorageBackend`] trait.
//!
//! Two implementations exist:
//! - [`RelationalBackend`]: a pooled SQLite database, the preferred store.
//! - [`FileBackend`]: flat files under a data directory (`users.json`,
//!   `donations.csv`, ...), used when the database cannot be opened.
//!
//! [`Storage`] picks one at startup. When the relational store is active the file
//! store stays around as the failover target for registrations. The two stores are
//! never synchronised: a user registered in one is unknown to the other.

mod donation_log;
mod file;
mod relational;

pub use donation_log::{DonationLog, DonationRow};
pub use file::{FileBackend, DONATIONS_FILE};
pub use relational::RelationalBackend;

use crate::config::{BackendKind, StorageConfig};
use crate::error::StorageError;
use common::model::donation::{Donation, DonorProfile};
use common::model::financial::{DonationFrequency, FinancialDonation};
use common::model::user::{User, UserType};
use log::{info, warn};
use std::sync::Arc;

/// Password hash stored for donors created implicitly by a donation form.
/// It is not a bcrypt hash, so it can never satisfy a login.
pub const PLACEHOLDER_PASSWORD_HASH: &str = "placeholder_hash";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_type: UserType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// Contact details of a donor as entered on a donation form.
#[derive(Debug, Clone, Default)]
pub struct DonorContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_id: i64,
    pub donor: DonorContact,
    pub donation_type: String,
    pub food_type: String,
    pub quantity: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub pickup_address: String,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewFinancialDonation {
    pub donor_id: i64,
    pub amount: f64,
    pub frequency: DonationFrequency,
    pub payment_method: String,
    pub is_anonymous: bool,
    pub comments: String,
}

/// Capability interface shared by the relational and the flat-file store.
///
/// Operations are blocking; async callers run them on the blocking pool.
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Stores a new user. Fails with [`StorageError::Conflict`] when the email is taken.
    fn insert_user(&self, user: NewUser) -> Result<User, StorageError>;

    /// Returns the id of the user owning `contact.email`, creating a donor with
    /// the placeholder password hash when there is none. Existing users are left
    /// untouched.
    fn ensure_donor(&self, contact: &DonorContact) -> Result<i64, StorageError>;

    /// Inserts or replaces the business profile of a donor.
    fn upsert_donor_profile(&self, profile: &DonorProfile) -> Result<(), StorageError>;

    fn insert_donation(&self, donation: NewDonation) -> Result<Donation, StorageError>;

    fn insert_financial_donation(
        &self,
        donation: NewFinancialDonation,
    ) -> Result<FinancialDonation, StorageError>;

    fn donations_by_donor(&self, donor: &User) -> Result<Vec<Donation>, StorageError>;
}

/// The backend chosen at startup plus an optional failover target.
#[derive(Clone)]
pub struct Storage {
    primary: Arc<dyn StorageBackend>,
    fallback: Option<Arc<dyn StorageBackend>>,
}

impl Storage {
    pub fn new(
        primary: Arc<dyn StorageBackend>,
        fallback: Option<Arc<dyn StorageBackend>>,
    ) -> Self {
        Storage { primary, fallback }
    }

    /// Opens the configured backend. A relational store that cannot be reached
    /// is replaced by the file store for the lifetime of the process.
    ///
    /// `donations` is the log the file store appends food donations to.
    pub fn open(config: &StorageConfig, donations: DonationLog) -> Result<Self, StorageError> {
        let files: Arc<dyn StorageBackend> =
            Arc::new(FileBackend::with_donation_log(&config.data_dir, donations)?);

        if config.backend == BackendKind::File {
            info!("Using file storage in {}", config.data_dir.display());
            return Ok(Storage::new(files, None));
        }

        match RelationalBackend::open(config) {
            Ok(db) => {
                info!(
                    "Using relational storage at {} (pool size {})",
                    config.database_path.display(),
                    config.pool_size
                );
                Ok(Storage::new(Arc::new(db), Some(files)))
            }
            Err(e) if e.is_unavailable() => {
                warn!(
                    "Relational storage unavailable ({}), falling back to file storage in {}",
                    e,
                    config.data_dir.display()
                );
                Ok(Storage::new(files, None))
            }
            Err(e) => Err(e),
        }
    }

    pub fn primary(&self) -> &dyn StorageBackend {
        self.primary.as_ref()
    }

    /// Runs `op` on the primary backend and, if that backend turns out to be
    /// unreachable, once more on the failover backend.
    pub fn with_failover<T, F>(&self, what: &str, op: F) -> Result<T, StorageError>
    where
        F: Fn(&dyn StorageBackend) -> Result<T, StorageError>,
    {
        match op(self.primary.as_ref()) {
            Err(e) if e.is_unavailable() => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        "{} failed on {} storage ({}), retrying on {} storage",
                        what,
                        self.primary.kind().as_str(),
                        e,
                        fallback.kind().as_str()
                    );
                    op(fallback.as_ref())
                }
                None => Err(e),
            },
            other => other,
        }
    }
}
