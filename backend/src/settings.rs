//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_SERVICE_*` environment variables, and
//! configuration files, in OrthoConfig's usual precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::UserServicePolicy;
use crate::inbound::http::api_key::{ApiKey, ApiKeyError};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No API key was configured.
    #[error("USER_SERVICE_API_KEY must be set")]
    MissingApiKey,
    /// The configured API key was unusable.
    #[error("invalid API key: {0}")]
    InvalidApiKey(#[from] ApiKeyError),
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Runtime configuration for the user service.
#[derive(Debug, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// Socket address to listen on; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. When absent the process-local store is
    /// used and data does not survive a restart.
    pub database_url: Option<String>,
    /// Shared secret expected in the `access_token` header.
    pub api_key: Option<String>,
    /// Skip name/email pattern checks and make delete idempotent.
    #[ortho_config(default = false)]
    pub lenient: bool,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl ServiceSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                reason: err.to_string(),
            })
    }

    /// Move the API key out of the settings. The secret string is wiped once
    /// the key is built.
    ///
    /// # Errors
    /// Fails when the key is missing or blank.
    pub fn take_api_key(&mut self) -> Result<ApiKey, SettingsError> {
        let secret = self.api_key.take().ok_or(SettingsError::MissingApiKey)?;
        Ok(ApiKey::new(secret)?)
    }

    /// Strict unless `lenient` is set.
    pub fn policy(&self) -> UserServicePolicy {
        if self.lenient {
            UserServicePolicy::lenient()
        } else {
            UserServicePolicy::strict()
        }
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            let config = PoolConfig::new(url);
            match self.pool_max_size {
                Some(max) => config.with_max_size(max),
                None => config,
            }
        })
    }
}
