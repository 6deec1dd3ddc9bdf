//! Backend entry-point: loads settings, wires storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::Result;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use footballvoice::inbound::http::health::HealthState;
use server::{ServerConfig, create_server, load_settings};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let config = ServerConfig::from_settings(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result?;
    Ok(())
}
