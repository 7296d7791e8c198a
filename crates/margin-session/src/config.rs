//! Session configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default                                |
//! |-----------------------------|----------------------------------------|
//! | `MARGIN_DB_PATH`            | `<platform data dir>/margin.db`        |
//! | `MARGIN_TENANT_ID`          | `DEFAULT_TENANT_ID`                    |
//! | `MARGIN_LOG`                | `info,margin=debug,sqlx=warn`          |
//! | `MARGIN_DEFAULT_TAX_BPS`    | `0`                                    |
//! | `MARGIN_TARGET_MARGIN_BPS`  | `2000` (20%)                           |

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use margin_core::validation::validate_uuid;
use margin_core::{Percent, DEFAULT_TARGET_MARGIN, DEFAULT_TENANT_ID};
use margin_db::database_path_from;

pub use margin_db::default_database_path;

/// Log filter used when neither `RUST_LOG` nor `MARGIN_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,margin=debug,sqlx=warn";

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Tenant the products belong to
    pub tenant_id: String,

    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Tax applied to quick quotes of products that are not stored yet
    pub default_tax: Percent,

    /// Margin used for suggested prices
    pub target_margin: Percent,
}

impl SessionConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = database_path_from(&lookup)
            .ok_or_else(|| ConfigError::MissingRequired("MARGIN_DB_PATH".to_string()))?;

        let tenant_id = lookup("MARGIN_TENANT_ID").unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());
        validate_uuid(&tenant_id)
            .map_err(|_| ConfigError::InvalidValue("MARGIN_TENANT_ID".to_string()))?;

        let config = SessionConfig {
            database_path,
            tenant_id,

            log_filter: lookup("MARGIN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),

            default_tax: parse_bps(&lookup, "MARGIN_DEFAULT_TAX_BPS", Percent::zero())?,

            target_margin: parse_bps(&lookup, "MARGIN_TARGET_MARGIN_BPS", DEFAULT_TARGET_MARGIN)?,
        };

        if config.target_margin.bps() >= 10_000 {
            return Err(ConfigError::InvalidValue("MARGIN_TARGET_MARGIN_BPS".to_string()));
        }

        Ok(config)
    }
}

/// Non-negative basis points.
fn parse_bps<F>(lookup: &F, key: &str, default: Percent) -> Result<Percent, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(bps) if bps >= 0 => Ok(Percent::from_bps(bps)),
            _ => Err(ConfigError::InvalidValue(key.to_string())),
        },
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
