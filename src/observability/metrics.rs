//! Metrics collection and exposition.
//!
//! # Metrics
//! - `conf_loads_total` (counter): load attempts by `source` (local, remote)
//!   and `result` (ok, connect, fetch, decode)
//! - `conf_last_success_timestamp_seconds` (gauge): unix time of the last
//!   successful load
//!
//! Without an installed recorder the macros are no-ops, so library users who
//! don't export metrics pay nothing.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::error::Stage;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one load attempt.
pub fn record_load(source: &'static str, failed: Option<Stage>) {
    let result = failed.map(|s| s.as_str()).unwrap_or("ok");
    metrics::counter!("conf_loads_total", "source" => source, "result" => result).increment(1);

    if failed.is_none() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        metrics::gauge!("conf_last_success_timestamp_seconds").set(now);
    }
}
