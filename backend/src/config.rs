//! Server configuration, read from the environment (and an optional `.env`).

use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Which store the server should try to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Relational,
    File,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Relational => "relational",
            BackendKind::File => "file",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// SQLite database file of the relational backend.
    pub database_path: PathBuf,
    pub pool_size: u32,
    pub connect_timeout: Duration,
    /// Directory holding `users.json`, `donations.csv` and the other flat files.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// File-only storage rooted at `data_dir`.
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        StorageConfig {
            backend: BackendKind::File,
            database_path: PathBuf::from("foodshare.sqlite"),
            pool_size: 10,
            connect_timeout: Duration::from_secs(5),
            data_dir: data_dir.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub storage: StorageConfig,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Ignoring unreadable .env file: {}", e);
            }
        }

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, signing tokens with the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("file") => BackendKind::File,
            Ok("relational") | Err(_) => BackendKind::Relational,
            Ok(other) => {
                warn!("Unknown STORAGE_BACKEND '{}', using relational", other);
                BackendKind::Relational
            }
        };

        let database_path = env::var("DB_PATH").map(PathBuf::from).unwrap_or_else(|_| {
            let name = env::var("DB_NAME").unwrap_or_else(|_| "foodshare".to_string());
            PathBuf::from(format!("{}.sqlite", name))
        });

        Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 3000),
            jwt_secret,
            token_ttl: token_ttl(parse_var("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)),
            storage: StorageConfig {
                backend,
                database_path,
                pool_size: parse_var("DB_POOL_SIZE", 10),
                connect_timeout: Duration::from_secs(parse_var("DB_CONNECT_TIMEOUT_SECS", 5)),
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data")),
            },
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
        }
    }
}

/// Token lifetime in hours. Values that are not positive or do not fit a
/// `chrono::Duration` fall back to the default.
fn token_ttl(hours: i64) -> chrono::Duration {
    match chrono::Duration::try_hours(hours) {
        Some(ttl) if hours > 0 => ttl,
        _ => {
            warn!(
                "TOKEN_TTL_HOURS={} is out of range, using {}",
                hours, DEFAULT_TOKEN_TTL_HOURS
            );
            chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS)
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using default", raw, name);
            default
        }),
        Err(_) => default,
    }
}
