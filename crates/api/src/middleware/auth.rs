//! # Authentication Module
//!
//! Admin credential checks and short-lived admin sessions.
//!
//! The admin password is held only as an Argon2 hash. A successful login
//! mints an opaque session token that the dashboard can send back as a
//! bearer token. Whether the toggle endpoint insists on that token is a
//! configuration switch, so the legacy unauthenticated contract can be kept.

use std::collections::HashMap;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use barberbook_core::errors::{BookingError, BookingResult};
use chrono::{DateTime, Duration, Utc};
use eyre::{Result, WrapErr, eyre};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AdminConfig;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is
/// returned in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies `password` against a PHC-formatted Argon2 hash.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Credential check plus the set of live admin sessions.
#[derive(Debug)]
pub struct AdminGate {
    password_hash: String,
    session_ttl: Duration,
    require_session: bool,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl AdminGate {
    /// Builds the gate, hashing the plain password when no hash is configured.
    ///
    /// # Errors
    ///
    /// Fails if a configured hash is not a valid PHC string.
    pub fn new(config: &AdminConfig) -> Result<Self> {
        let password_hash = match &config.password_hash {
            Some(hash) => {
                PasswordHash::new(hash).map_err(|e| eyre!("Invalid ADMIN_PASSWORD_HASH: {}", e))?;
                hash.clone()
            }
            None => hash_password(&config.password)?,
        };

        Ok(Self {
            password_hash,
            session_ttl: Duration::minutes(config.session_ttl_minutes),
            require_session: config.require_session,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Checks the password and opens a session on success.
    ///
    /// Argon2 verification is CPU-bound, so it runs on the blocking pool.
    pub async fn login(&self, password: &str) -> Result<Option<String>> {
        let password_hash = self.password_hash.clone();
        let password = password.to_string();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password_hash, &password))
                .await
                .wrap_err("Password verification task failed")??;
        if !matches {
            return Ok(None);
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.session_ttl;

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, expiry| *expiry > now);
        sessions.insert(token.clone(), expires_at);

        Ok(Some(token))
    }

    /// Whether `token` names a session that has not expired.
    pub async fn validate(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        matches!(sessions.get(token), Some(expiry) if *expiry > Utc::now())
    }

    /// Guards an admin-only request.
    ///
    /// Passes through when sessions are not required. Otherwise the request
    /// must carry a bearer token naming a live session.
    ///
    /// # Errors
    ///
    /// * `BookingError::Authentication` - session required but missing or expired
    pub async fn authorize(&self, headers: &HeaderMap) -> BookingResult<()> {
        if !self.require_session {
            return Ok(());
        }

        match extract_bearer_token(headers) {
            Some(token) if self.validate(&token).await => {
                debug!("Admin session accepted");
                Ok(())
            }
            _ => {
                warn!("Rejected admin request without a valid session");
                Err(BookingError::Authentication(
                    "Admin session required.".to_string(),
                ))
            }
        }
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}
