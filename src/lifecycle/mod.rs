//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Select mode from --conf → first load (fatal on error)
//!     → remote mode only: start reload watcher
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop watcher → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any error during the first load aborts startup
//! - The watcher only starts after the first load succeeded

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{init, Mode, Started};
