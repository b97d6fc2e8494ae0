//! docsearch API server
//!
//! Reads configuration, connects to the search cluster and serves `/search`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use docsearch_api::{ApiKey, ApiServer, AppConfig, AppState};
use docsearch_elastic::ElasticClient;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch-api")]
#[command(author, version, about = "Authenticated hybrid search over the documentation index", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (environment variables take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let backend = ElasticClient::new(config.elastic_config(), config.http_config())
        .context("configuring search backend")?;
    let api_key = ApiKey::new(config.api_key.clone())?;
    let state = AppState::new(Arc::new(backend), api_key);

    let addr = config.listen_addr();
    info!("Starting docsearch API on {}", addr);

    ApiServer::new(state)
        .run(addr)
        .await
        .with_context(|| format!("serving on {}", addr))?;

    Ok(())
}
