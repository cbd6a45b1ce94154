//! SQLite-backed storage behind a bounded `r2d2` connection pool.
//!
//! Each operation borrows one connection for its statements and returns it.
//! Statements are not wrapped in transactions: a donor upsert followed by a
//! donation insert are two independent writes.

use super::{
    DonorContact, NewDonation, NewFinancialDonation, NewUser, StorageBackend,
    PLACEHOLDER_PASSWORD_HASH,
};
use crate::config::{BackendKind, StorageConfig};
use crate::error::StorageError;
use chrono::Utc;
use common::model::donation::{Donation, DonationStatus, DonorProfile};
use common::model::financial::FinancialDonation;
use common::model::user::{User, UserType};
use log::info;
use r2d2::{Pool, PooledConnection};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::time::Duration;

const SCHEMA: &str = include_str!("../../schema.sql");

const USER_COLUMNS: &str =
    "user_id, user_type, name, email, phone, password_hash, created_at";

/// Opens SQLite connections for the pool.
#[derive(Debug)]
struct SqliteConnectionManager {
    path: PathBuf,
}

impl r2d2::ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    fn is_valid(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch("")
    }

    fn has_broken(&self, _conn: &mut Connection) -> bool {
        false
    }
}

pub struct RelationalBackend {
    pool: Pool<SqliteConnectionManager>,
}

impl RelationalBackend {
    /// Builds the pool and makes sure the schema exists. Fails with
    /// [`StorageError::Unavailable`] when no connection can be opened.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager {
            path: config.database_path.clone(),
        };
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_timeout(config.connect_timeout.max(Duration::from_millis(1)))
            .build(manager)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        pool.get()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .execute_batch(SCHEMA)?;
        info!("Database schema ready at {}", config.database_path.display());
        Ok(RelationalBackend { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool
            .get()
            .map_err(|e| StorageError::PoolExhausted(e.to_string()))
    }

    fn find_user(
        &self,
        column: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<Option<User>, StorageError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users WHERE {} = ?1", USER_COLUMNS, column);
        Ok(conn.query_row(&sql, params![value], user_from_row).optional()?)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let user_type: String = row.get(1)?;
    Ok(User {
        id: row.get(0)?,
        user_type: UserType::from(user_type),
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn donation_from_row(row: &Row<'_>) -> rusqlite::Result<Donation> {
    let id: i64 = row.get(0)?;
    let status: String = row.get(9)?;
    Ok(Donation {
        id: id.to_string(),
        donor_id: row.get(1)?,
        donation_type: row.get(2)?,
        food_type: row.get(3)?,
        quantity: row.get(4)?,
        pickup_date: row.get(5)?,
        pickup_time: row.get(6)?,
        pickup_address: row.get(7)?,
        notes: row.get(8)?,
        status: DonationStatus::parse(&status).unwrap_or_default(),
        created_at: row.get(10)?,
    })
}

impl StorageBackend for RelationalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.find_user("email", &email)
    }

    fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.find_user("user_id", &id)
    }

    fn insert_user(&self, user: NewUser) -> Result<User, StorageError> {
        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (name, email, phone, user_type, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.name,
                user.email,
                user.phone,
                user.user_type.as_str(),
                user.password_hash,
                created_at
            ],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            user_type: user.user_type,
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            created_at,
        })
    }

    fn ensure_donor(&self, contact: &DonorContact) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (user_type, name, email, phone, address, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT(email) DO NOTHING",
            params![
                UserType::Donor.as_str(),
                contact.name,
                contact.email,
                contact.phone,
                contact.address,
                PLACEHOLDER_PASSWORD_HASH,
                Utc::now()
            ],
        )?;
        Ok(conn.query_row(
            "SELECT user_id FROM users WHERE email = ?1",
            params![contact.email],
            |row| row.get(0),
        )?)
    }

    fn upsert_donor_profile(&self, profile: &DonorProfile) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO donor_profiles (donor_id, business_name, business_type) VALUES (?1, ?2, ?3) \
             ON CONFLICT(donor_id) DO UPDATE SET \
             business_name = excluded.business_name, business_type = excluded.business_type",
            params![profile.donor_id, profile.business_name, profile.business_type],
        )?;
        Ok(())
    }

    fn insert_donation(&self, donation: NewDonation) -> Result<Donation, StorageError> {
        let conn = self.conn()?;
        let created_at = Utc::now();
        let status = DonationStatus::Available;
        conn.execute(
            "INSERT INTO donations (donor_id, donation_type, food_type, quantity, pickup_date, \
             pickup_time, pickup_address, description, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                donation.donor_id,
                donation.donation_type,
                donation.food_type,
                donation.quantity,
                donation.pickup_date,
                donation.pickup_time,
                donation.pickup_address,
                donation.notes,
                status.as_str(),
                created_at
            ],
        )?;
        Ok(Donation {
            id: conn.last_insert_rowid().to_string(),
            donor_id: Some(donation.donor_id),
            donation_type: donation.donation_type,
            food_type: donation.food_type,
            quantity: donation.quantity,
            pickup_date: donation.pickup_date,
            pickup_time: donation.pickup_time,
            pickup_address: donation.pickup_address,
            notes: donation.notes,
            status,
            created_at,
        })
    }

    fn insert_financial_donation(
        &self,
        donation: NewFinancialDonation,
    ) -> Result<FinancialDonation, StorageError> {
        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO financial_donations (donor_id, amount, donation_frequency, payment_method, \
             is_anonymous, comments, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                donation.donor_id,
                donation.amount,
                donation.frequency.as_str(),
                donation.payment_method,
                donation.is_anonymous,
                donation.comments,
                created_at
            ],
        )?;
        Ok(FinancialDonation {
            id: conn.last_insert_rowid().to_string(),
            donor_id: donation.donor_id,
            amount: donation.amount,
            frequency: donation.frequency,
            payment_method: donation.payment_method,
            is_anonymous: donation.is_anonymous,
            comments: donation.comments,
            created_at,
        })
    }

    fn donations_by_donor(&self, donor: &User) -> Result<Vec<Donation>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT donation_id, donor_id, donation_type, food_type, quantity, pickup_date, \
             pickup_time, pickup_address, description, status, created_at \
             FROM donations WHERE donor_id = ?1 ORDER BY donation_id",
        )?;
        let donations = stmt
            .query_map(params![donor.id], donation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(donations)
    }
}
