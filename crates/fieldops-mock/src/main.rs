//! FieldOps mock backend: all four services on one port.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use fieldops_core::InMemoryBackend;
use fieldops_mock::{app, config::Config, seed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fieldops_mock=debug".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    tracing::info!("Starting FieldOps mock backend...");

    let config = Config::from_env();
    let state = Arc::new(InMemoryBackend::new("mock"));
    if let Some(user) = &config.seed_user {
        seed::seed_demo(&state, user).context("seeding demo data")?;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
