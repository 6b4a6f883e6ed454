//! Aetherday HTTP API.
//!
//! A thin axum layer over [`aetherday_core::service`]. Every `/api/v1`
//! route authenticates the caller from an HS256 bearer token; the token's
//! `sub` is the user id.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

use std::sync::{Arc, Mutex};

use aetherday_core::error::ConfigError;
use aetherday_core::{Config, Database, EnergyRates, TokenVerifier};

pub use error::ApiError;
pub use routes::create_app;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    pub verifier: TokenVerifier,
    pub rates: EnergyRates,
    /// Role a token needs to run the all-users regen batch.
    pub service_role: String,
}

impl AppState {
    pub fn new(db: Database, verifier: TokenVerifier, rates: EnergyRates, service_role: impl Into<String>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            verifier,
            rates,
            service_role: service_role.into(),
        }
    }

    /// Build state from loaded configuration.
    ///
    /// # Errors
    /// Fails when no signing secret is configured.
    pub fn from_config(config: &Config, db: Database) -> Result<Self, ConfigError> {
        let secret = config.auth.resolved_secret().ok_or_else(|| ConfigError::InvalidValue {
            key: "auth.jwt_secret".into(),
            message: format!(
                "no signing secret; set it in the config file or {}",
                aetherday_core::storage::JWT_SECRET_ENV
            ),
        })?;
        Ok(Self::new(
            db,
            TokenVerifier::new(secret, config.auth.issuer.clone()),
            config.energy,
            config.auth.service_role.clone(),
        ))
    }

    /// Run `f` against the database. The lock is released before returning,
    /// so handlers never hold it across an await.
    pub fn with_db<T>(&self, f: impl FnOnce(&Database) -> aetherday_core::Result<T>) -> Result<T, ApiError> {
        let db = self.db.lock().map_err(|_| ApiError::LockPoisoned)?;
        Ok(f(&db)?)
    }
}
