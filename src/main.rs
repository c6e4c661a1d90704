use std::sync::Arc;

use anyhow::Result;
use predictive_insights::{api, config::Config, telemetry};
use predictive_insights::forecast::{BaselineOracle, ForecastEngine};
use predictive_insights::pipeline::Pipeline;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let engine = ForecastEngine::new(Box::new(BaselineOracle));
    let pipeline = Arc::new(Pipeline::new(engine, cfg.severity, cfg.report));

    let app = api::router(pipeline, &cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "Server binding to 0.0.0.0 - service will be accessible from the network. \
            Bind to 127.0.0.1 unless behind a reverse proxy."
        );
    }

    info!(%addr, "starting predictive-insights");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
