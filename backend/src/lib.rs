pub mod auth;
pub mod config;
pub mod error;
pub mod intake;
pub mod services;
pub mod state;
pub mod storage;
