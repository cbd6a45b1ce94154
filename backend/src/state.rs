use crate::auth::{AuthService, TokenIssuer};
use crate::config::Config;
use crate::error::StorageError;
use crate::intake::DonationIntake;
use crate::storage::{DonationLog, Storage, DONATIONS_FILE};

/// Services shared by all request handlers, registered once as `web::Data`.
///
/// Everything inside is cheap to clone; the stores themselves sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub intake: DonationIntake,
    pub storage: Storage,
    /// The flat-file donation log written by `POST /api/donate`, whichever
    /// backend is active.
    pub donation_log: DonationLog,
}

impl AppState {
    pub fn new(storage: Storage, tokens: TokenIssuer, donation_log: DonationLog) -> Self {
        AppState {
            auth: AuthService::new(storage.clone(), tokens),
            intake: DonationIntake::new(storage.clone()),
            storage,
            donation_log,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let donation_log = DonationLog::new(config.storage.data_dir.join(DONATIONS_FILE));
        let storage = Storage::open(&config.storage, donation_log.clone())?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
        Ok(AppState::new(storage, tokens, donation_log))
    }
}
