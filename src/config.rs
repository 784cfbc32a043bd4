// Runtime configuration
//
// Defaults match the historical behavior (port 8080, ./accounts.db, legacy
// 200 responses). Every value can be overridden from the environment or a
// `.env` file.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const ENV_BIND_ADDR: &str = "ACCOUNTS_BIND_ADDR";
pub const ENV_DB_PATH: &str = "ACCOUNTS_DB_PATH";
pub const ENV_STRICT_NOT_FOUND: &str = "ACCOUNTS_STRICT_NOT_FOUND";
pub const ENV_STRICT_ACCOUNT_TYPE: &str = "ACCOUNTS_STRICT_ACCOUNT_TYPE";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PATH: &str = "accounts.db";

/// Behavior switches for the HTTP handlers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiOptions {
    /// Answer 404 when update/delete matches no row (legacy: 200)
    pub strict_not_found: bool,

    /// Reject account types other than payable/receivable (legacy: accept)
    pub strict_account_type: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub api: ApiOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            api: ApiOptions::default(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(ENV_STRICT_NOT_FOUND) {
            config.api.strict_not_found = parse_flag(ENV_STRICT_NOT_FOUND, &raw)?;
        }

        if let Some(raw) = lookup(ENV_STRICT_ACCOUNT_TYPE) {
            config.api.strict_account_type = parse_flag(ENV_STRICT_ACCOUNT_TYPE, &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("{} must be a boolean, got {:?}", key, other)),
    }
}
