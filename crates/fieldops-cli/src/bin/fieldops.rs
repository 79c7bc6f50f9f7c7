//! FieldOps command line client.
//!
//! Usage:
//!   cargo run -p fieldops-cli -- fields list
//!   cargo run -p fieldops-cli -- missions move-waypoint <id> 0 55.7501,37.6101

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fieldops_cli::{args::Endpoints, run, Cli};
use fieldops_client::{Config, HttpBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fieldops_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(Config::from_env(), cli.endpoints);
    tracing::debug!(?config, "using endpoints");

    let backend = HttpBackend::new(config)?;
    let user = backend.user().to_string();
    let output = run(cli.command, &backend, &user).await?;
    print!("{output}");
    Ok(())
}

fn apply_overrides(mut config: Config, endpoints: Endpoints) -> Config {
    if let Some(url) = endpoints.fields_url {
        config.fields_url = url;
    }
    if let Some(url) = endpoints.drones_url {
        config.drones_url = url;
    }
    if let Some(url) = endpoints.missions_url {
        config.missions_url = url;
    }
    if let Some(url) = endpoints.planner_url {
        config.planner_url = url;
    }
    if let Some(user) = endpoints.user {
        config.user = user;
    }
    if let Some(secs) = endpoints.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    config
}
