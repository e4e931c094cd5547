//! Grouped report output.
//!
//! Groups are always written in ascending order of final host so two runs with
//! the same outcome produce the same file, regardless of probe completion order.
//! Domains within a group keep the order in which they were recorded.
//!
//! Text format:
//!
//! ```text
//! bar.com redirects
//! foo.com
//! baz.com
//!
//! qux.com redirects
//! quux.com
//! ```

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::aggregate::{GroupedResult, RedirectGroup};
use crate::config::ReportFormat;
use crate::error_handling::ScanError;

#[derive(Serialize)]
struct JsonReport<'a> {
    groups: Vec<RedirectGroup<'a>>,
}

/// Writes the text format to `out`.
pub fn render_text<W: Write>(grouped: &GroupedResult, out: &mut W) -> io::Result<()> {
    for (i, group) in grouped.sorted_groups().iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} redirects", group.final_host)?;
        for domain in group.domains {
            writeln!(out, "{}", domain)?;
        }
    }
    Ok(())
}

/// Writes the JSON format to `out`.
pub fn render_json<W: Write>(grouped: &GroupedResult, out: &mut W) -> io::Result<()> {
    let report = JsonReport {
        groups: grouped.sorted_groups(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

/// Renders the report in `format` into a byte buffer.
pub fn render(grouped: &GroupedResult, format: ReportFormat) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ReportFormat::Text => render_text(grouped, &mut buf)?,
        ReportFormat::Json => render_json(grouped, &mut buf)?,
    }
    Ok(buf)
}

/// Writes the report to `destination`, replacing any existing file.
///
/// # Errors
///
/// Returns `ScanError::OutputIo` if the file cannot be created or written.
pub async fn write_report(
    grouped: &GroupedResult,
    destination: &Path,
    format: ReportFormat,
) -> Result<(), ScanError> {
    let output_io = |source: io::Error| ScanError::OutputIo {
        path: destination.to_path_buf(),
        source,
    };

    let bytes = render(grouped, format).map_err(output_io)?;
    tokio::fs::write(destination, bytes)
        .await
        .map_err(output_io)?;

    log::debug!(
        "Wrote {} group(s) to {}",
        grouped.len(),
        destination.display()
    );
    Ok(())
}
