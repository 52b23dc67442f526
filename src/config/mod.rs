//! Configuration loading and validation.
//!
//! Every section and field is optional in the TOML file; anything left out
//! takes the value from the matching `Default` impl.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origin: "*".to_string(),
        }
    }
}

/// Dashboard behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Club whose players make up the public ranking (matched by exact name).
    /// When unset, or when no club has this name, the ranking lists everyone.
    pub ranking_club: Option<String>,

    /// How many matches the admin match list shows
    pub recent_matches_limit: usize,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            ranking_club: None,
            recent_matches_limit: 20,
        }
    }
}

/// An admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub email: String,

    /// Hex-encoded SHA-256 of the password (see `league-stats hash-password`)
    pub password_sha256: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admins: Vec<AdminAccount>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the document store
    pub data_dir: PathBuf,
    pub log_level: String,
    pub server: ServerConfig,
    pub league: LeagueConfig,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            league: LeagueConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl AppConfig {
    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if self.server.port == 0 {
            return invalid("server.port must be greater than 0".to_string());
        }
        if self.league.recent_matches_limit == 0 {
            return invalid("league.recent_matches_limit must be greater than 0".to_string());
        }
        if let Some(admin) = self
            .auth
            .admins
            .iter()
            .find(|a| !is_sha256_hex(&a.password_sha256))
        {
            return invalid(format!(
                "password_sha256 for {} must be 64 hex characters",
                admin.email
            ));
        }

        Ok(())
    }
}
