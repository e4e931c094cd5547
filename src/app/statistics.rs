//! End-of-run statistics.

use log::{debug, info};
use strum::IntoEnumIterator;

use crate::error_handling::{ProbeFailureKind, ProbeStats};

/// Non-zero failure counts as `label: count` lines, in category order.
pub fn failure_lines(stats: &ProbeStats) -> Vec<String> {
    ProbeFailureKind::iter()
        .filter_map(|kind| {
            let count = stats.get_count(kind);
            (count > 0).then(|| format!("{}: {}", kind.as_str(), count))
        })
        .collect()
}

/// Logs absorbed probe failures by category.
///
/// These never affect the report or the exit status, so they are only shown
/// at debug level.
pub fn print_probe_statistics(stats: &ProbeStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    debug!("Probe failures absorbed ({} total):", total);
    for line in failure_lines(stats) {
        debug!("   {}", line);
    }
}

/// One-line summary of the run.
pub fn format_summary(
    total: usize,
    redirected: usize,
    notable: usize,
    groups: usize,
    elapsed_seconds: f64,
) -> String {
    format!(
        "Probed {} domain{} in {:.1}s: {} redirected, {} notable across {} destination{}",
        total,
        if total == 1 { "" } else { "s" },
        elapsed_seconds,
        redirected,
        notable,
        groups,
        if groups == 1 { "" } else { "s" }
    )
}

/// Logs the run summary.
pub fn print_summary(
    total: usize,
    redirected: usize,
    notable: usize,
    groups: usize,
    elapsed_seconds: f64,
) {
    info!(
        "{}",
        format_summary(total, redirected, notable, groups, elapsed_seconds)
    );
}
