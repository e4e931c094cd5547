//! Main application modules.
//!
//! This module provides progress logging, shutdown handling, console output,
//! and statistics printing used by the scan loop.

pub mod console;
pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use console::{announce_notable, colorize_for};
pub use logging::spawn_progress_logger;
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_probe_statistics, print_summary};
