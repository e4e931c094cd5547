//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_OUTPUT_PATH, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_SETTLE_DELAY_SECS, DEFAULT_USER_AGENT, MAX_CONCURRENCY_LIMIT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `<host> redirects` headers followed by one domain per line (default)
    Text,
    /// A single JSON document with the same grouping and ordering
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use redirect_check::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.txt"),
///     max_concurrency: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read domains from (`-` for stdin)
    pub file: PathBuf,

    /// Report destination, overwritten if it exists
    pub output: PathBuf,

    /// Report format
    pub format: ReportFormat,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Maximum probes in flight
    pub max_concurrency: usize,

    /// Hard per-probe deadline in seconds
    pub timeout_seconds: u64,

    /// Settle window for client-side redirects, in seconds
    pub settle_seconds: u64,

    /// User-Agent sent by the HTTP navigator
    pub user_agent: String,

    /// Treat redirects within the same registrable domain as safe
    pub ignore_same_site: bool,

    /// Retry schemeless domains over https when http shows no redirect
    pub https_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("domains.txt"),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            format: ReportFormat::Text,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_PROBE_TIMEOUT_SECS,
            settle_seconds: DEFAULT_SETTLE_DELAY_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ignore_same_site: false,
            https_fallback: true,
        }
    }
}

impl Config {
    /// Validates the configuration before any work is scheduled.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.file.as_os_str().is_empty() {
            return Err("an input file is required (use -l <FILE>)".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("output path must not be empty".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(format!(
                "max_concurrency must be at most {} (got {})",
                MAX_CONCURRENCY_LIMIT, self.max_concurrency
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("timeout_seconds must be at least 1".to_string());
        }
        if self.settle_seconds >= self.timeout_seconds {
            return Err(format!(
                "settle_seconds ({}) must be shorter than timeout_seconds ({})",
                self.settle_seconds, self.timeout_seconds
            ));
        }
        Ok(())
    }

    /// Per-probe deadline.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Settle window handed to the navigator.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_seconds)
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// redirect_check -l domains.txt
///
/// # Custom output and concurrency
/// redirect_check -l domains.txt -o grouped.txt --max-concurrency 20
///
/// # Read domains from stdin
/// cat domains.txt | redirect_check -l -
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "redirect_check",
    version,
    about = "Finds domains that redirect to a different host and groups them by destination."
)]
pub struct Opt {
    /// Input file with one domain per line (`-` for stdin)
    #[arg(short = 'l', long = "list", value_parser)]
    pub file: PathBuf,

    /// Output file for the grouped report
    #[arg(short = 'o', long, value_parser, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Report format: text|json
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Maximum concurrent probes
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-domain timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Seconds to wait for client-side redirects to fire
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY_SECS)]
    pub settle_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Treat redirects between hosts of the same registrable domain as safe
    /// (e.g. shop.example.com -> example.com)
    #[arg(long)]
    pub ignore_same_site: bool,

    /// Do not retry schemeless domains over https when http shows no redirect
    #[arg(long)]
    pub no_https_fallback: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            file: opt.file,
            output: opt.output,
            format: opt.format,
            log_level: opt.log_level,
            log_format: opt.log_format,
            max_concurrency: opt.max_concurrency,
            timeout_seconds: opt.timeout_seconds,
            settle_seconds: opt.settle_seconds,
            user_agent: opt.user_agent,
            ignore_same_site: opt.ignore_same_site,
            https_fallback: !opt.no_https_fallback,
        }
    }
}
