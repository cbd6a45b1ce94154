//! # Authentication
//!
//! Registration, credential checks and bearer tokens.
//!
//! - `password`: salted bcrypt hashes (cost 10).
//! - `token`: signed HS256 tokens carrying the user id, valid for a configured window.
//! - `extractor`: the [`AuthenticatedUser`] request guard for protected endpoints.
//!
//! Registration is the one operation that fails over: if the relational store is
//! unreachable the user is written to the file store instead, and the caller
//! still sees a normal success.

mod extractor;
mod password;
mod token;

pub use extractor::AuthenticatedUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

use crate::error::{AuthError, StorageError};
use crate::storage::{NewUser, Storage};
use common::model::user::{PublicUser, User};
use common::requests::{LoginRequest, RegisterRequest};
use log::info;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    storage: Storage,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(storage: Storage, tokens: TokenIssuer) -> Self {
        AuthService { storage, tokens }
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        require(&request.email, "email")?;
        require(&request.password, "password")?;

        let password_hash = hash_password(&request.password)?;
        let user = self
            .storage
            .with_failover("Registration", |backend| {
                if backend.find_user_by_email(&request.email)?.is_some() {
                    return Err(StorageError::Conflict);
                }
                backend.insert_user(NewUser {
                    user_type: request.user_type.clone(),
                    name: request.name.clone(),
                    email: request.email.clone(),
                    phone: request.phone.clone(),
                    password_hash: password_hash.clone(),
                })
            })
            .map_err(|e| match e {
                StorageError::Conflict => AuthError::DuplicateEmail,
                other => AuthError::Storage(other),
            })?;

        info!("User registered with id {}", user.id);
        Ok(user)
    }

    pub fn login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        let user = self
            .storage
            .primary()
            .find_user_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(Session {
            user: PublicUser::from(user),
            token,
        })
    }

    pub fn verify_token(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        self.tokens.verify(token)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(field));
    }
    Ok(())
}
