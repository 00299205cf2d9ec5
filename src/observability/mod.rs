//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader / watcher
//!     → tracing events (load ok / failed, stage, source)
//!     → metrics.rs (load counters, last-success gauge)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
