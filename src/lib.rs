//! 25-year solar savings projection: utility vs PPA vs outright purchase,
//! with query-string state sharing.

pub mod config;
pub mod io;
pub mod logging;
/// Projection engine, inputs, and summary metrics.
pub mod projection;
pub mod report;
/// Parameter/address synchronization and edit gating.
pub mod sync;
#[cfg(feature = "tui")]
pub mod tui;
