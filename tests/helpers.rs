// Shared test helpers: scripted navigators and scan configuration.
//
// Each integration test file includes this with `mod helpers;`, so not every
// helper is used by every file.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redirect_check::{Config, LogFormat, LogLevel, Navigator, ProbeError};
use tempfile::NamedTempFile;

/// Navigator answering from a fixed table of start URL → final URL.
///
/// Unknown URLs resolve to themselves (no redirect). Hosts listed in
/// `slow_hosts` never answer, and hosts in `panic_hosts` panic.
#[derive(Default)]
pub struct ScriptedNavigator {
    routes: HashMap<String, String>,
    slow_hosts: Vec<String>,
    panic_hosts: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, from: &str, to: &str) -> Self {
        self.routes.insert(from.to_string(), to.to_string());
        self
    }

    pub fn slow(mut self, host: &str) -> Self {
        self.slow_hosts.push(host.to_string());
        self
    }

    pub fn panics_on(mut self, host: &str) -> Self {
        self.panic_hosts.push(host.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn matches(hosts: &[String], url: &str) -> bool {
        hosts
            .iter()
            .any(|h| url == format!("http://{h}") || url == format!("https://{h}"))
    }
}

#[async_trait]
impl Navigator for ScriptedNavigator {
    async fn navigate(&self, url: &str, _settle: Duration) -> Result<String, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if Self::matches(&self.panic_hosts, url) {
            panic!("navigator blew up on {url}");
        }
        if Self::matches(&self.slow_hosts, url) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string()))
    }
}

/// Navigator that records how many calls are in flight at once.
pub struct GaugeNavigator {
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl GaugeNavigator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Navigator for GaugeNavigator {
    async fn navigate(&self, url: &str, _settle: Duration) -> Result<String, ProbeError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        // Every domain lands on the same destination
        if url.contains("://landing.example") {
            Ok(url.to_string())
        } else {
            Ok("https://landing.example/".to_string())
        }
    }
}

/// Writes `lines` to a temporary input file.
pub fn write_domains(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write domain");
    }
    file.flush().expect("Failed to flush file");
    file
}

/// A quiet config reading `input` and writing to `output`.
pub fn test_config(input: &Path, output: &Path) -> Config {
    Config {
        file: input.to_path_buf(),
        output: output.to_path_buf(),
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        max_concurrency: 5,
        timeout_seconds: 2,
        settle_seconds: 0,
        user_agent: "redirect_check_test/1.0".to_string(),
        ..Default::default()
    }
}

/// Path for a report inside `dir`.
pub fn report_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("redirects.txt")
}
