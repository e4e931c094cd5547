//! redirect_check library: finds domains that redirect to a different host
//!
//! This library probes a list of domains concurrently, follows server-side and
//! client-side redirects, and groups every domain whose final host differs
//! meaningfully from its own by that final host. Redirects between a host and
//! its `www.` variant are not reported.
//!
//! # Example
//!
//! ```no_run
//! use redirect_check::{Config, run_scan};
//! use tokio;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.txt"),
//!     max_concurrency: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("Probed {} domains: {} notable redirects",
//!          report.total_domains, report.notable);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod aggregate;
mod app;
pub mod config;
mod error_handling;
mod host;
pub mod initialization;
mod input;
mod pool;
mod probe;
mod report;

// Re-export public API
pub use aggregate::{GroupedResult, NotableRedirect, RedirectAggregator, RedirectGroup};
pub use config::{Config, LogFormat, LogLevel, Opt, ReportFormat};
pub use error_handling::{
    InitializationError, ProbeError, ProbeFailureKind, ProbeStats, ScanError,
};
pub use host::{
    is_safe_redirect, normalize_host, RedirectClassifier, RedirectKind, SafeRedirectRule,
    SameSiteRule, WwwVariantRule,
};
pub use input::read_domains;
pub use pool::{PoolReport, WorkerPool};
pub use probe::{HttpNavigator, Navigator, RedirectChain, RedirectProbe};
pub use report::{render, write_report};
pub use run::{run_scan, run_scan_with, ScanReport};

// Internal run module (contains the main scanning logic)
mod run {
    use anyhow::{Context, Result};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use log::{debug, info};
    use tokio_util::sync::CancellationToken;

    use crate::aggregate::RedirectAggregator;
    use crate::app::{
        announce_notable, colorize_for, print_probe_statistics, print_summary,
        shutdown_gracefully, spawn_progress_logger,
    };
    use crate::config::{Config, LOGGING_INTERVAL};
    use crate::error_handling::ScanError;
    use crate::host::RedirectClassifier;
    use crate::initialization::init_client;
    use crate::input::read_domains;
    use crate::pool::WorkerPool;
    use crate::probe::{HttpNavigator, Navigator, RedirectProbe};
    use crate::report::write_report;

    /// Results of a redirect scanning run.
    ///
    /// Contains summary statistics about the completed scan. The grouped
    /// redirects themselves are in the report at `output_path`.
    #[derive(Debug, Clone)]
    pub struct ScanReport {
        /// Number of domains read from the input
        pub total_domains: usize,
        /// Domains whose probe observed any change of location
        pub redirected: usize,
        /// Domains recorded as notable redirects
        pub notable: usize,
        /// Distinct final hosts in the report
        pub groups: usize,
        /// Probe failures absorbed as "no redirect"
        pub probe_failures: usize,
        /// Workers that panicked
        pub panicked: usize,
        /// Path of the written report
        pub output_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs a redirect scan with the provided configuration.
    ///
    /// Reads the domain list, probes every domain over HTTP with at most
    /// `max_concurrency` probes in flight, and writes the grouped report.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid
    /// - The input file cannot be read
    /// - The HTTP client cannot be built
    /// - The report cannot be written
    ///
    /// Individual domains that fail to load never cause an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use redirect_check::{Config, run_scan};
    /// use std::path::PathBuf;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config {
    ///     file: PathBuf::from("domains.txt"),
    ///     output: PathBuf::from("redirects.txt"),
    ///     ..Default::default()
    /// };
    /// let report = run_scan(config).await?;
    /// println!("{} domains redirect elsewhere", report.notable);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_scan(config: Config) -> Result<ScanReport> {
        config.validate().map_err(ScanError::Usage)?;

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let navigator: Arc<dyn Navigator> = Arc::new(HttpNavigator::new(client));

        run_scan_with(config, navigator).await
    }

    /// Runs a scan using `navigator` to load pages.
    ///
    /// Same as [`run_scan`] without building an HTTP client, so any page
    /// loader can be plugged in.
    pub async fn run_scan_with(
        config: Config,
        navigator: Arc<dyn Navigator>,
    ) -> Result<ScanReport> {
        config.validate().map_err(ScanError::Usage)?;

        // The whole list is read before any probe starts, so an unreadable
        // input never leaves a partial report behind
        let domains = read_domains(&config.file).await?;
        let total_domains = domains.len();
        info!("Total domains in input: {}", total_domains);

        let classifier = RedirectClassifier::from_config(&config);
        debug!("Safe redirect rules: {:?}", classifier.rule_names());

        let aggregator = Arc::new(RedirectAggregator::new(classifier));
        let probe = Arc::new(RedirectProbe::from_config(navigator, &config));
        let stats = Arc::clone(probe.stats());
        let pool = WorkerPool::new(config.max_concurrency);

        let start_time = Instant::now();
        let completed = Arc::new(AtomicUsize::new(0));
        let redirected = Arc::new(AtomicUsize::new(0));
        let notable = Arc::new(AtomicUsize::new(0));
        let colorize = colorize_for(&config.log_format);

        let cancel = CancellationToken::new();
        let logging_task = spawn_progress_logger(
            start_time,
            Arc::clone(&completed),
            total_domains,
            Duration::from_secs(LOGGING_INTERVAL),
            cancel.clone(),
        );

        let pool_report = {
            let aggregator = Arc::clone(&aggregator);
            let completed = Arc::clone(&completed);
            let redirected = Arc::clone(&redirected);
            let notable = Arc::clone(&notable);

            pool.run(domains, move |domain: String| {
                let probe = Arc::clone(&probe);
                let aggregator = Arc::clone(&aggregator);
                let completed = Arc::clone(&completed);
                let redirected = Arc::clone(&redirected);
                let notable = Arc::clone(&notable);

                async move {
                    let chain = probe.probe(&domain).await;
                    if chain.is_redirect() {
                        redirected.fetch_add(1, Ordering::SeqCst);
                    }
                    if let Some(found) = aggregator.record_if_notable(&domain, &chain).await {
                        notable.fetch_add(1, Ordering::SeqCst);
                        announce_notable(&found, colorize);
                    }
                    completed.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await
        };

        shutdown_gracefully(cancel, Some(logging_task)).await;

        // Every worker has joined, so this is normally the last reference
        let grouped = match Arc::try_unwrap(aggregator) {
            Ok(aggregator) => aggregator.into_grouped(),
            Err(shared) => shared.snapshot().await,
        };

        write_report(&grouped, &config.output, config.format).await?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        let report = ScanReport {
            total_domains,
            redirected: redirected.load(Ordering::SeqCst),
            notable: notable.load(Ordering::SeqCst),
            groups: grouped.len(),
            probe_failures: stats.total(),
            panicked: pool_report.panicked,
            output_path: config.output.clone(),
            elapsed_seconds,
        };

        print_probe_statistics(&stats);
        print_summary(
            report.total_domains,
            report.redirected,
            report.notable,
            report.groups,
            report.elapsed_seconds,
        );

        Ok(report)
    }
}
