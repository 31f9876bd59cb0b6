//! FlightSure API Gateway binary

use std::sync::Arc;

use flightsure_gateway::{init_tracing, open_ledger, persist_snapshot, router, AppState, GatewayConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = GatewayConfig::load()?;
    init_tracing(cfg.log_format)?;

    let ledger = Arc::new(open_ledger(&cfg)?);
    info!(
        owner = %ledger.owner(),
        vote_counting = ?cfg.ledger.vote_counting,
        "Ledger ready"
    );

    let app = router(AppState::new(ledger.clone()));

    let addr = cfg.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FlightSure API Gateway starting on {}", addr);
    info!("Endpoints: /health, /operational, /airlines, /flights, /policies, /credits, /deposits, /ws");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    if let Some(path) = cfg.snapshot_path.as_deref() {
        persist_snapshot(&ledger, path)?;
    }

    Ok(())
}
