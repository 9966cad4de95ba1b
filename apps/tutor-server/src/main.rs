//! # Tutor Gateway
//!
//! Actix-web server that puts IP blacklisting and per-client rate limiting
//! in front of the tutoring backend's routes.

use actix_web::HttpServer;
use anyhow::Context;

mod app;
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

#[cfg(test)]
mod tests;

use background::{Scheduler, SchedulerConfig, schedule_limiter_sweeps};
use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    tracing::info!(
        "Starting tutor gateway on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).context("Failed to build admission registries")?;

    let mut scheduler = Scheduler::new(SchedulerConfig::from_env())
        .await
        .context("Failed to create scheduler")?;
    schedule_limiter_sweeps(&scheduler, &state, config.admission.sweep_interval)
        .await
        .context("Failed to register rate limiter sweeps")?;
    scheduler.start().await.context("Failed to start scheduler")?;

    let server_state = state.clone();
    HttpServer::new(move || app::build_app(server_state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    scheduler.shutdown().await.context("Failed to stop scheduler")?;
    tracing::info!("Server exited");
    Ok(())
}
