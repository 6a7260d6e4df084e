//! Campaign Tracker — social media campaign performance dashboard backend.
//!
//! Main entry point that loads the startup dataset and starts the server.

use clap::Parser;
use parking_lot::RwLock;
use std::sync::Arc;
use tracker_api::ApiServer;
use tracker_core::config::AppConfig;
use tracker_core::{Dataset, DatasetSource};
use tracker_reporting::derive_table;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-tracker")]
#[command(about = "Social media campaign performance dashboard backend")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CAMPAIGN_TRACKER__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CAMPAIGN_TRACKER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "CAMPAIGN_TRACKER__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Delimited-text dataset to load at startup (overrides config)
    #[arg(long, env = "CAMPAIGN_TRACKER__DATASET__PATH")]
    dataset: Option<String>,
}

/// Load the startup dataset: the configured file if one is given,
/// otherwise the built-in sample. A file that fails to load falls back
/// to the sample so the service always starts with a servable table.
fn startup_dataset(path: Option<&str>) -> Dataset {
    if let Some(path) = path {
        match tracker_dataset::load_path(path) {
            Ok(records) => {
                info!(path, rows = records.len(), "Loaded startup dataset from file");
                return Dataset::new(DatasetSource::File, derive_table(&records));
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to load startup dataset, falling back to sample data");
            }
        }
    } else {
        info!("No dataset file configured, using sample data");
    }
    Dataset::new(DatasetSource::Sample, derive_table(&tracker_dataset::load_sample()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_tracker=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Campaign Tracker starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(path) = cli.dataset {
        config.dataset.path = Some(path);
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        dataset = config.dataset.path.as_deref().unwrap_or("<sample>"),
        "Configuration loaded"
    );

    // Load the startup dataset
    let dataset = startup_dataset(config.dataset.path.as_deref());
    info!(
        dataset_id = %dataset.id,
        source = dataset.source.as_str(),
        rows = dataset.len(),
        "Startup dataset ready"
    );
    let current = Arc::new(RwLock::new(dataset));

    // Start API server
    let api_server = ApiServer::new(config, current);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Campaign Tracker is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
