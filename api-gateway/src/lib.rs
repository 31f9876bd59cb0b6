//! FlightSure API Gateway
//!
//! REST/JSON and WebSocket surface for the flight-insurance ledger:
//! - Guards: operational gate and caller authorization
//! - Airlines: add, vote, fund, finalize registration
//! - Flights & policies: register flights, sell policies, credit insurees
//! - Credits: balances, withdrawals, treasury deposits
//! - `/ws`: live ledger events

pub mod config;
pub mod error;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use flightsure_data::{FlightSureData, LedgerSnapshot, PayoutLog};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::{GatewayConfig, LogFormat};
pub use error::ApiError;
pub use routes::{router, AppState};

/// Install the global tracing subscriber
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flightsure=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()?,
    }
    Ok(())
}

/// Build the ledger, restoring the snapshot when one exists
pub fn open_ledger(cfg: &GatewayConfig) -> anyhow::Result<FlightSureData> {
    let rail = Arc::new(PayoutLog::new());

    if let Some(path) = cfg.snapshot_path.as_deref().filter(|p| p.exists()) {
        let snapshot = LedgerSnapshot::read_from(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;

        if let Some(owner) = cfg.owner.filter(|o| *o != snapshot.owner()) {
            warn!(configured = %owner, snapshot = %snapshot.owner(), "Configured owner ignored, using snapshot owner");
        }
        info!(path = %path.display(), "Restoring ledger from snapshot");
        let ledger = FlightSureData::restore(snapshot, cfg.ledger.clone())?;
        return Ok(ledger.with_funds_transfer(rail));
    }

    let owner = cfg
        .owner
        .context("no owner configured (set FLIGHTSURE__OWNER) and no snapshot to restore")?;
    Ok(FlightSureData::new(owner, cfg.ledger.clone()).with_funds_transfer(rail))
}

/// Write the ledger snapshot to `path`
pub fn persist_snapshot(ledger: &FlightSureData, path: &Path) -> anyhow::Result<()> {
    let owner = ledger.owner();
    let snapshot = ledger.snapshot(&owner)?;
    snapshot
        .write_to(path)
        .with_context(|| format!("writing snapshot {}", path.display()))?;
    info!(path = %path.display(), "Ledger snapshot written");
    Ok(())
}
