//! Service configuration agent.
//!
//! Loads the service configuration once at startup and, when no local file is
//! given, keeps it in sync with the config center until the process is
//! stopped.
//!
//! ```text
//! --conf app.toml          local mode: decode the file once
//! (no --conf)              remote mode: connect → fetch → decode
//!                          → watch center events → reload on change
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use service_conf::config::{FileCenter, FileCenterOptions, ServiceConfig, SharedConfig};
use service_conf::lifecycle::{self, signals, Shutdown};
use service_conf::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "service-conf")]
#[command(about = "Load service configuration from a file or a config center", long_about = None)]
struct Cli {
    /// Local config file. Leave empty to use the config center.
    #[arg(long = "conf", env = "CONF_PATH", default_value = "")]
    conf: String,

    /// Published config file served by the file config center.
    #[arg(long, env = "CONF_CENTER_FILE", default_value = "/data/conf/app.toml")]
    center_file: PathBuf,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "service_conf=info")]
    log_level: String,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    tracing::info!("service-conf v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(addr) = cli.metrics_addr {
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let center_file = cli.center_file.clone();
    let started = lifecycle::init(
        SharedConfig::<ServiceConfig>::new(),
        &cli.conf,
        || FileCenter::connect(FileCenterOptions::new(center_file)),
        &shutdown,
    )?;

    let config = started.shared.load();
    tracing::info!(
        mode = ?started.mode,
        proxy = config.proxy,
        account_uri = %config.account_uri,
        passport_uri = %config.passport_uri,
        "Configuration ready"
    );

    signals::wait_for_shutdown().await;
    shutdown.trigger();

    if let Some(watcher) = started.watcher {
        tracing::info!(
            reloads = watcher.reloads(),
            failures = watcher.failures(),
            "Waiting for reload watcher"
        );
        watcher.join().await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
