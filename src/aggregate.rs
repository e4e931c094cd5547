//! Grouping of notable redirects by destination host.
//!
//! One [`RedirectAggregator`] is created per scan and shared by every worker
//! through an `Arc`. The grouping map is the only mutable state workers share;
//! it sits behind a single lock held just long enough to append one domain.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::host::{normalize_host, RedirectClassifier, RedirectKind};
use crate::probe::RedirectChain;

/// Final host → origin domains, in the order their probes completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedResult {
    groups: HashMap<String, Vec<String>>,
}

/// One group of a [`GroupedResult`], as written to reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectGroup<'a> {
    /// Destination host
    pub final_host: &'a str,
    /// Origin domains, in recorded order
    pub domains: &'a [String],
}

impl GroupedResult {
    fn push(&mut self, final_host: String, domain: String) {
        self.groups.entry(final_host).or_default().push(domain);
    }

    /// Number of distinct final hosts.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no redirect was recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of domains across all groups.
    pub fn total_domains(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Domains that redirected to `final_host`.
    pub fn get(&self, final_host: &str) -> Option<&[String]> {
        self.groups.get(final_host).map(Vec::as_slice)
    }

    /// Groups ordered by final host; members keep their stored order.
    pub fn sorted_groups(&self) -> Vec<RedirectGroup<'_>> {
        let mut groups: Vec<RedirectGroup<'_>> = self
            .groups
            .iter()
            .map(|(host, domains)| RedirectGroup {
                final_host: host.as_str(),
                domains: domains.as_slice(),
            })
            .collect();
        groups.sort_by(|a, b| a.final_host.cmp(b.final_host));
        groups
    }
}

impl<H, D> FromIterator<(H, D)> for GroupedResult
where
    H: Into<String>,
    D: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (H, D)>>(iter: T) -> Self {
        let mut grouped = GroupedResult::default();
        for (host, domain) in iter {
            grouped.push(host.into(), domain.into());
        }
        grouped
    }
}

/// A redirect that was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotableRedirect {
    /// Domain as read from the input
    pub domain: String,
    /// Host of the starting URL
    pub origin_host: String,
    /// Host the probe ended on (the group key)
    pub final_host: String,
    /// Whether the redirect also upgraded to https
    pub kind: RedirectKind,
}

/// Thread-safe accumulator of notable redirects.
pub struct RedirectAggregator {
    classifier: RedirectClassifier,
    grouped: Mutex<GroupedResult>,
}

impl RedirectAggregator {
    /// Creates an empty aggregator using `classifier` to skip safe redirects.
    pub fn new(classifier: RedirectClassifier) -> Self {
        Self {
            classifier,
            grouped: Mutex::new(GroupedResult::default()),
        }
    }

    /// Records `domain` under its final host if the chain shows a notable redirect.
    ///
    /// Nothing is recorded when the chain has fewer than two URLs, when either
    /// end has no parsable host, or when the classifier deems the redirect safe.
    pub async fn record_if_notable(
        &self,
        domain: &str,
        chain: &RedirectChain,
    ) -> Option<NotableRedirect> {
        if !chain.is_redirect() {
            return None;
        }
        let origin_url = chain.origin()?;
        let final_url = chain.destination()?;

        let (Some(origin_host), Some(final_host)) =
            (normalize_host(origin_url), normalize_host(final_url))
        else {
            log::debug!(
                "Skipping {}: could not extract hosts from {} -> {}",
                domain,
                origin_url,
                final_url
            );
            return None;
        };

        if self.classifier.is_safe_redirect(&origin_host, &final_host) {
            return None;
        }

        {
            let mut grouped = self.grouped.lock().await;
            grouped.push(final_host.clone(), domain.to_string());
        }

        Some(NotableRedirect {
            domain: domain.to_string(),
            origin_host,
            final_host,
            kind: RedirectKind::of(origin_url, final_url),
        })
    }

    /// Copy of the current grouping.
    pub async fn snapshot(&self) -> GroupedResult {
        self.grouped.lock().await.clone()
    }

    /// Consumes the aggregator once no worker holds it anymore.
    pub fn into_grouped(self) -> GroupedResult {
        self.grouped.into_inner()
    }
}

impl Default for RedirectAggregator {
    fn default() -> Self {
        Self::new(RedirectClassifier::default())
    }
}
