//! Error type definitions.
//!
//! This module defines the fatal scan errors, initialization errors, and the
//! per-domain probe errors that are absorbed into "no redirect".

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Fatal errors that stop a scan.
///
/// Only setup and teardown failures end up here. Per-domain problems are
/// [`ProbeError`]s and never escalate.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Required configuration is missing or invalid.
    #[error("Configuration validation failed: {0}")]
    Usage(String),

    /// The input list could not be read.
    #[error("Failed to read input {}: {source}", path.display())]
    InputIo {
        /// Input path (`-` for stdin)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The report could not be created or written.
    #[error("Failed to write report {}: {source}", path.display())]
    OutputIo {
        /// Report destination
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Errors raised while navigating to a single domain.
///
/// These are absorbed by the probe and only counted.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The HTTP request failed.
    #[error("navigation failed: {0}")]
    Navigation(#[from] ReqwestError),

    /// A redirect target could not be parsed.
    #[error("invalid redirect location '{location}': {source}")]
    InvalidLocation {
        /// Raw `Location` or refresh target
        location: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// A `Location` header that is not valid UTF-8.
    #[error("undecodable redirect location '{0}'")]
    UndecodableLocation(String),

    /// The probe deadline expired.
    #[error("navigation timed out after {0:?}")]
    Timeout(Duration),

    /// More hops than `MAX_REDIRECT_HOPS`.
    #[error("too many redirects (more than {0} hops)")]
    TooManyRedirects(usize),

    /// Failure reported by a navigation backend other than the HTTP one.
    #[error("navigator error: {0}")]
    Browser(String),
}

/// Categories of absorbed probe failures, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ProbeFailureKind {
    /// Probe deadline or HTTP timeout
    Timeout,
    /// Connection could not be established
    Connect,
    /// Request or body error
    Request,
    /// Unparsable redirect target
    InvalidLocation,
    /// Redirect loop or overly long chain
    TooManyRedirects,
    /// Anything else
    Other,
}

impl ProbeFailureKind {
    /// Human-readable label used in statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeFailureKind::Timeout => "Probe timeout",
            ProbeFailureKind::Connect => "Connection error",
            ProbeFailureKind::Request => "Request error",
            ProbeFailureKind::InvalidLocation => "Invalid redirect location",
            ProbeFailureKind::TooManyRedirects => "Too many redirects",
            ProbeFailureKind::Other => "Other navigation error",
        }
    }
}

impl From<&ProbeError> for ProbeFailureKind {
    fn from(error: &ProbeError) -> Self {
        match error {
            ProbeError::Timeout(_) => ProbeFailureKind::Timeout,
            ProbeError::Navigation(e) if e.is_timeout() => ProbeFailureKind::Timeout,
            ProbeError::Navigation(e) if e.is_connect() => ProbeFailureKind::Connect,
            ProbeError::Navigation(e) if e.is_request() || e.is_body() => {
                ProbeFailureKind::Request
            }
            ProbeError::Navigation(_) => ProbeFailureKind::Other,
            ProbeError::InvalidLocation { .. } | ProbeError::UndecodableLocation(_) => {
                ProbeFailureKind::InvalidLocation
            }
            ProbeError::TooManyRedirects(_) => ProbeFailureKind::TooManyRedirects,
            ProbeError::Browser(_) => ProbeFailureKind::Other,
        }
    }
}
