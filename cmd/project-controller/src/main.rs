use clap::Parser;
use pkg_constants::paths::{DEFAULT_CONTROLLER_CONFIG, DEFAULT_CONTROLLER_DATA_DIR};
use pkg_constants::state::DEFAULT_RECONCILE_INTERVAL_SECS;
use pkg_controllers::controller::ProjectController;
use pkg_controllers::sync::QuotaDefaults;
use pkg_state::client::Client;
use pkg_state::slate::SlateStore;
use pkg_types::config::{ControllerConfigFile, load_config_file};
use pkg_types::labels::MetadataKeys;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "project-controller",
    about = "Reconciles projects into namespaces, quotas, limits and monitors"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_CONTROLLER_CONFIG)]
    config: String,

    /// Directory for SlateDB object storage
    #[arg(long)]
    data_dir: Option<String>,

    /// Seconds between reconciliation passes
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ControllerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| DEFAULT_CONTROLLER_DATA_DIR.to_string());
    let interval_secs = cli
        .interval_secs
        .or(file_cfg.interval_secs)
        .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECS);
    let quota_defaults = QuotaDefaults::with_overrides(&file_cfg.quota_defaults)?;

    info!("Starting project-controller");
    info!("  Data dir:  {}", data_dir);
    info!("  Interval:  {}s", interval_secs);
    info!("  Quota floor overrides: {}", file_cfg.quota_defaults.len());

    let store = SlateStore::open(&data_dir).await?;
    let controller = ProjectController::new(
        Client::new(store.clone()),
        Arc::new(MetadataKeys::default()),
        Arc::new(quota_defaults),
    )
    .with_interval(Duration::from_secs(interval_secs.max(1)));
    let handle = controller.start();

    // Block until Ctrl-C
    info!("Controller is running. Press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down project-controller");

    handle.abort();
    store.close().await?;
    Ok(())
}
