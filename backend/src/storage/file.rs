//! Flat-file storage: a JSON array of users, a JSON array of donor profiles,
//! and CSV logs for food and financial donations, all under one data directory.

use super::donation_log::{DonationLog, DonationRow};
use super::{
    DonorContact, NewDonation, NewFinancialDonation, NewUser, StorageBackend,
    PLACEHOLDER_PASSWORD_HASH,
};
use crate::config::BackendKind;
use crate::error::StorageError;
use chrono::{DateTime, Utc};
use common::model::donation::{Donation, DonorProfile};
use common::model::financial::{DonationFrequency, FinancialDonation};
use common::model::user::{User, UserType};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

const USERS_FILE: &str = "users.json";
const PROFILES_FILE: &str = "donor_profiles.json";
pub const DONATIONS_FILE: &str = "donations.csv";
const FINANCIAL_FILE: &str = "financial_donations.csv";
const FINANCIAL_HEADER: &str =
    "id,donorId,amount,frequency,paymentMethod,anonymous,comments,timestamp\n";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialRow {
    id: String,
    donor_id: i64,
    amount: f64,
    frequency: DonationFrequency,
    payment_method: String,
    anonymous: bool,
    comments: String,
    timestamp: DateTime<Utc>,
}

pub struct FileBackend {
    users_path: PathBuf,
    profiles_path: PathBuf,
    financial_path: PathBuf,
    donations: DonationLog,
    /// Serialises read-modify-write cycles on the JSON files.
    lock: Mutex<()>,
}

impl FileBackend {
    /// Opens (and if needed creates) the data directory and its files.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        Self::with_donation_log(dir, DonationLog::new(dir.join(DONATIONS_FILE)))
    }

    /// Like [`FileBackend::open`], writing food donations to a log handle that
    /// is shared with other writers of the same file.
    pub fn with_donation_log(dir: &Path, donations: DonationLog) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let backend = FileBackend {
            users_path: dir.join(USERS_FILE),
            profiles_path: dir.join(PROFILES_FILE),
            financial_path: dir.join(FINANCIAL_FILE),
            donations,
            lock: Mutex::new(()),
        };
        for path in [&backend.users_path, &backend.profiles_path] {
            if !path.exists() {
                fs::write(path, "[]")?;
            }
        }
        backend.donations.ensure()?;
        Ok(backend)
    }

    fn read_users(&self) -> Result<Vec<User>, StorageError> {
        read_json_array(&self.users_path)
    }

    fn append_financial(&self, row: &FinancialRow) -> Result<(), StorageError> {
        let new_file = fs::metadata(&self.financial_path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.financial_path)?;
        if new_file {
            file.write_all(FINANCIAL_HEADER.as_bytes())?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_users()?.into_iter().find(|u| u.email == email))
    }

    fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_users()?.into_iter().find(|u| u.id == id))
    }

    fn insert_user(&self, user: NewUser) -> Result<User, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut users = self.read_users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict);
        }
        let stored = User {
            id: next_user_id(&users),
            user_type: user.user_type,
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(stored.clone());
        write_json(&self.users_path, &users)?;
        info!("User {} stored in {}", stored.id, self.users_path.display());
        Ok(stored)
    }

    fn ensure_donor(&self, contact: &DonorContact) -> Result<i64, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut users = self.read_users()?;
        if let Some(existing) = users.iter().find(|u| u.email == contact.email) {
            return Ok(existing.id);
        }
        let id = next_user_id(&users);
        users.push(User {
            id,
            user_type: UserType::Donor,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            password_hash: PLACEHOLDER_PASSWORD_HASH.to_string(),
            created_at: Utc::now(),
        });
        write_json(&self.users_path, &users)?;
        Ok(id)
    }

    fn upsert_donor_profile(&self, profile: &DonorProfile) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut profiles: Vec<DonorProfile> = read_json_array(&self.profiles_path)?;
        match profiles.iter_mut().find(|p| p.donor_id == profile.donor_id) {
            Some(existing) => *existing = profile.clone(),
            None => profiles.push(profile.clone()),
        }
        write_json(&self.profiles_path, &profiles)
    }

    fn insert_donation(&self, donation: NewDonation) -> Result<Donation, StorageError> {
        let row = DonationRow {
            id: Uuid::new_v4().simple().to_string(),
            donation_type: donation.donation_type,
            name: donation.donor.name,
            email: donation.donor.email,
            phone: donation.donor.phone,
            address: donation.pickup_address,
            food_type: donation.food_type,
            quantity: donation.quantity,
            pickup_date: donation.pickup_date,
            pickup_time: donation.pickup_time,
            notes: donation.notes,
            timestamp: Utc::now(),
        };
        self.donations.append(&row)?;
        let mut stored = Donation::from(row);
        stored.donor_id = Some(donation.donor_id);
        Ok(stored)
    }

    fn insert_financial_donation(
        &self,
        donation: NewFinancialDonation,
    ) -> Result<FinancialDonation, StorageError> {
        let row = FinancialRow {
            id: Uuid::new_v4().simple().to_string(),
            donor_id: donation.donor_id,
            amount: donation.amount,
            frequency: donation.frequency,
            payment_method: donation.payment_method,
            anonymous: donation.is_anonymous,
            comments: donation.comments,
            timestamp: Utc::now(),
        };
        {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.append_financial(&row)?;
        }
        Ok(FinancialDonation {
            id: row.id,
            donor_id: row.donor_id,
            amount: row.amount,
            frequency: row.frequency,
            payment_method: row.payment_method,
            is_anonymous: row.anonymous,
            comments: row.comments,
            created_at: row.timestamp,
        })
    }

    fn donations_by_donor(&self, donor: &User) -> Result<Vec<Donation>, StorageError> {
        Ok(self
            .donations
            .read_all()?
            .into_iter()
            .filter(|row| row.email == donor.email)
            .map(|row| Donation {
                donor_id: Some(donor.id),
                ..Donation::from(row)
            })
            .collect())
    }
}

fn next_user_id(users: &[User]) -> i64 {
    users.iter().map(|u| u.id).max().unwrap_or(0) + 1
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Writes through a sibling temp file and a rename, so a crash mid-write
/// leaves the previous contents in place.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
