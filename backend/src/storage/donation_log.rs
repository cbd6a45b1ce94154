//! Append-only CSV log of food donations (`donations.csv`).
//!
//! The file starts with a fixed header line. Rows are written with the `csv`
//! crate: text fields are quoted and embedded quotes doubled, so notes and
//! addresses containing commas, quotes or line breaks read back unchanged.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use common::model::donation::{Donation, DonationStatus};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

pub const DONATION_LOG_HEADER: &str =
    "id,donationType,name,email,phone,address,foodType,quantity,pickupDate,pickupTime,notes,timestamp\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRow {
    pub id: String,
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
    pub timestamp: DateTime<Utc>,
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        Donation {
            id: row.id,
            donor_id: None,
            donation_type: row.donation_type,
            food_type: row.food_type,
            quantity: row.quantity,
            pickup_date: row.pickup_date,
            pickup_time: row.pickup_time,
            pickup_address: row.address,
            notes: row.notes,
            status: DonationStatus::Available,
            created_at: row.timestamp,
        }
    }
}

/// Handle on the donation log file. Clones share one write lock, so rows
/// appended from the same process never interleave.
#[derive(Debug, Clone)]
pub struct DonationLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl DonationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DonationLog {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header if it does not exist yet.
    pub fn ensure(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_locked()
    }

    fn ensure_locked(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let missing = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if missing {
            fs::write(&self.path, DONATION_LOG_HEADER)?;
        }
        Ok(())
    }

    pub fn append(&self, row: &DonationRow) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_locked()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads every row back. A missing file is an empty log.
    pub fn read_all(&self) -> Result<Vec<DonationRow>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}
