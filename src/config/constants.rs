//! Configuration constants.
//!
//! This module defines the defaults used throughout the application: concurrency
//! caps, probe timing, redirect limits, and output locations.

use std::time::Duration;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;
/// Upper bound accepted by config validation.
/// Each probe may hold an open connection for the full timeout, so very high values
/// mostly trigger rate limiting on the targets.
pub const MAX_CONCURRENCY_LIMIT: usize = 500;

/// Seconds between progress log lines while a scan is running.
pub const LOGGING_INTERVAL: u64 = 5;

/// Hard per-probe deadline in seconds.
/// Covers every navigation attempt for a domain, including the https fallback.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;
/// Settle window in seconds.
/// Client-side redirects (meta refresh) that fire within this window are followed.
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 4;

/// [`DEFAULT_PROBE_TIMEOUT_SECS`] as a `Duration`.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS);
/// [`DEFAULT_SETTLE_DELAY_SECS`] as a `Duration`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(DEFAULT_SETTLE_DELAY_SECS);

/// Default report destination.
pub const DEFAULT_OUTPUT_PATH: &str = "redirects.txt";

/// Scheme prepended to domains that have none.
pub const DEFAULT_SCHEME: &str = "http://";
/// Scheme tried when the default scheme produced no redirect.
pub const FALLBACK_SCHEME: &str = "https://";

/// Default User-Agent string for navigation requests.
///
/// Some hosts serve different redirects (or none at all) to clients that do not look
/// like a browser, so a Chrome-like string is used. Users can override this via the
/// `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Maximum HTML body size inspected for meta refresh tags (512KB)
pub const MAX_REFRESH_BODY_SIZE: usize = 512 * 1024;

/// Maximum input line length (2048 characters), matching common browser URL limits.
pub const MAX_DOMAIN_LENGTH: usize = 2048;
