//! Per-domain redirect probing.
//!
//! A probe turns one input domain into a [`RedirectChain`]:
//! - the domain gets a default `http://` scheme if it has none
//! - the [`Navigator`] resolves where that URL ends up
//! - a different final location yields `[start, final]`, anything else an empty chain
//!
//! Failures of any kind (network, timeout, malformed redirect) are absorbed
//! into "no redirect" and counted in [`ProbeStats`]. A probe never returns an
//! error to its caller.

mod navigator;
mod refresh;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{
    Config, DEFAULT_PROBE_TIMEOUT, DEFAULT_SCHEME, DEFAULT_SETTLE_DELAY, FALLBACK_SCHEME,
};
use crate::error_handling::{ProbeError, ProbeStats};

pub use navigator::{HttpNavigator, Navigator};

/// URLs visited for one domain, from the starting URL to the final location.
///
/// Fewer than two entries means no redirect was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectChain(Vec<String>);

impl RedirectChain {
    /// A chain meaning "no redirect".
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// A two-entry chain from `start` to `end`.
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self(vec![start.into(), end.into()])
    }

    /// All URLs in visit order.
    pub fn urls(&self) -> &[String] {
        &self.0
    }

    /// Number of URLs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the "no redirect" chain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the chain records an actual redirect.
    pub fn is_redirect(&self) -> bool {
        self.0.len() >= 2
    }

    /// Starting URL.
    pub fn origin(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Final location.
    pub fn destination(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl From<Vec<String>> for RedirectChain {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

/// Prefixes `scheme` unless the input already starts with `http://` or `https://`.
pub fn ensure_scheme(scheme: &str, domain: &str) -> String {
    let domain = domain.trim();
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("{scheme}{domain}")
    }
}

/// Starting URLs to try for a domain, in order.
fn start_urls(domain: &str, https_fallback: bool) -> Vec<String> {
    let primary = ensure_scheme(DEFAULT_SCHEME, domain);
    let has_scheme = primary == domain.trim();
    if https_fallback && !has_scheme {
        vec![primary, ensure_scheme(FALLBACK_SCHEME, domain)]
    } else {
        vec![primary]
    }
}

/// Compares two locations, ignoring differences the URL parser normalizes away
/// (e.g. `http://a.com` vs `http://a.com/`).
fn same_location(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Probes domains through a [`Navigator`] under a hard deadline.
///
/// Each call is independent; the only shared piece is the failure counter.
pub struct RedirectProbe {
    navigator: Arc<dyn Navigator>,
    timeout: Duration,
    settle_delay: Duration,
    https_fallback: bool,
    stats: Arc<ProbeStats>,
}

impl RedirectProbe {
    /// A probe with the default timeout (15s), settle delay (4s) and https fallback.
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            timeout: DEFAULT_PROBE_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            https_fallback: true,
            stats: Arc::new(ProbeStats::new()),
        }
    }

    /// A probe using the timeout, settle delay and fallback setting of `config`.
    pub fn from_config(navigator: Arc<dyn Navigator>, config: &Config) -> Self {
        Self::new(navigator)
            .with_timeout(config.probe_timeout())
            .with_settle_delay(config.settle_delay())
            .with_https_fallback(config.https_fallback)
    }

    /// Overrides the per-domain deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the settle window passed to the navigator.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Enables or disables the https retry for schemeless domains.
    pub fn with_https_fallback(mut self, enabled: bool) -> Self {
        self.https_fallback = enabled;
        self
    }

    /// Counters of failures absorbed so far.
    pub fn stats(&self) -> &Arc<ProbeStats> {
        &self.stats
    }

    /// Per-domain deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the redirect chain for `domain`, or an empty chain if there was
    /// no redirect or the probe failed or timed out.
    pub async fn probe(&self, domain: &str) -> RedirectChain {
        match tokio::time::timeout(self.timeout, self.try_probe(domain)).await {
            Ok(Ok(chain)) => chain,
            Ok(Err(e)) => self.absorb(domain, e),
            Err(_) => self.absorb(domain, ProbeError::Timeout(self.timeout)),
        }
    }

    fn absorb(&self, domain: &str, error: ProbeError) -> RedirectChain {
        log::debug!("No redirect recorded for {}: {}", domain, error);
        self.stats.record(&error);
        RedirectChain::none()
    }

    async fn try_probe(&self, domain: &str) -> Result<RedirectChain, ProbeError> {
        let mut last_error = None;
        let mut reached_any = false;

        for start in start_urls(domain, self.https_fallback) {
            match self.navigator.navigate(&start, self.settle_delay).await {
                Ok(final_url) if !final_url.is_empty() && !same_location(&start, &final_url) => {
                    return Ok(RedirectChain::between(start, final_url));
                }
                Ok(_) => reached_any = true,
                Err(e) => {
                    log::trace!("Navigation to {} failed: {}", start, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !reached_any => Err(e),
            _ => Ok(RedirectChain::none()),
        }
    }
}
