//! Domain list input.
//!
//! The whole list is read before any probe is scheduled, so an unreadable
//! input aborts the scan without doing partial work.

use std::path::Path;

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::MAX_DOMAIN_LENGTH;
use crate::error_handling::ScanError;

/// Returns the domain on `line`, or `None` for blank lines and `#` comments.
pub fn parse_domain_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if trimmed.len() > MAX_DOMAIN_LENGTH {
        warn!(
            "Skipping line exceeding maximum length ({} > {}): {}...",
            trimmed.len(),
            MAX_DOMAIN_LENGTH,
            trimmed.chars().take(50).collect::<String>()
        );
        return None;
    }
    Some(trimmed)
}

/// Reads every domain from `reader`.
pub async fn read_domains_from<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut domains = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if let Some(domain) = parse_domain_line(&line) {
            domains.push(domain.to_string());
        }
    }
    Ok(domains)
}

/// Reads the domain list from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns `ScanError::InputIo` if the source cannot be opened or read.
pub async fn read_domains(path: &Path) -> Result<Vec<String>, ScanError> {
    let input_io = |source: std::io::Error| ScanError::InputIo {
        path: path.to_path_buf(),
        source,
    };

    let domains = if path.as_os_str() == "-" {
        info!("Reading domains from stdin");
        read_domains_from(BufReader::new(tokio::io::stdin()))
            .await
            .map_err(input_io)?
    } else {
        let file = tokio::fs::File::open(path).await.map_err(input_io)?;
        read_domains_from(BufReader::new(file))
            .await
            .map_err(input_io)?
    };

    info!("Total domains in input: {}", domains.len());
    Ok(domains)
}
