//! Gateway configuration

use std::path::PathBuf;

use flightsure_common::{AccountId, FlightSureError, Result};
use flightsure_data::LedgerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "flightsure.toml";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Gateway service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Deploying identity; ignored when a snapshot is restored
    pub owner: Option<AccountId>,
    /// Snapshot loaded at startup and written on shutdown
    pub snapshot_path: Option<PathBuf>,
    pub log_format: LogFormat,
    pub ledger: LedgerConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            owner: None,
            snapshot_path: None,
            log_format: LogFormat::Json,
            ledger: LedgerConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `.env`, the config file, and environment.
    ///
    /// The file is `$FLIGHTSURE_CONFIG` or `flightsure.toml` (optional).
    /// Variables prefixed `FLIGHTSURE__` override it, with `__` for nesting
    /// (e.g. `FLIGHTSURE__LEDGER__VOTE_COUNTING=once_per_voter`). `PORT`
    /// wins over everything.
    pub fn load() -> Result<Self> {
        if let Some(e) = unreadable_env_file(dotenvy::dotenv()) {
            debug!(error = %e, "Ignoring unreadable .env file");
        }

        let (file, required) = match std::env::var("FLIGHTSURE_CONFIG") {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_FILE.to_string(), false),
        };

        let builder = config::Config::builder()
            .add_source(config::File::with_name(&file).required(required))
            .add_source(
                config::Environment::with_prefix("FLIGHTSURE")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| FlightSureError::Config(e.to_string()))?;

        // Platform-assigned port takes priority
        if let Ok(port) = std::env::var("PORT") {
            cfg.port = port
                .parse()
                .map_err(|_| FlightSureError::Config(format!("invalid PORT: {port}")))?;
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The `.env` load error worth reporting; a missing file is not one
fn unreadable_env_file(result: dotenvy::Result<PathBuf>) -> Option<dotenvy::Error> {
    result.err().filter(|e| !e.not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightsure_data::VoteCounting;

    #[test]
    fn test_defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.addr(), "0.0.0.0:8080");
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(cfg.owner.is_none());
    }

    #[test]
    fn test_missing_env_file_is_quiet() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(unreadable_env_file(Err(dotenvy::Error::Io(missing))).is_none());
        assert!(unreadable_env_file(Ok(PathBuf::from(".env"))).is_none());

        let malformed = dotenvy::Error::LineParse("KEY=\"open".to_string(), 4);
        assert!(unreadable_env_file(Err(malformed)).is_some());
    }

    #[test]
    fn test_partial_toml() {
        let owner = AccountId::from_label("owner");
        let toml = format!(
            "port = 9000\nowner = \"{owner}\"\nlog_format = \"pretty\"\n\n[ledger]\nvote_counting = \"once_per_voter\"\n"
        );

        let cfg: GatewayConfig = config::Config::builder()
            .add_source(config::File::from_str(&toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.owner, Some(owner));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.ledger.vote_counting, VoteCounting::OncePerVoter);
        assert!(cfg.ledger.start_operational);
    }
}
