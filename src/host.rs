//! Host extraction and safe-redirect classification.
//!
//! Key pieces:
//! - `normalize_host()` - extracts the lowercase hostname from a URL-like string
//! - `SafeRedirectRule` - one predicate deciding that a redirect is not worth reporting
//! - `RedirectClassifier` - an ordered list of rules; the first match wins
//!
//! Everything here is pure. Malformed input is treated as "no host" rather than
//! an error so a single bad entry never interrupts a scan.

use crate::config::DEFAULT_SCHEME;

const WWW_PREFIX: &str = "www.";

/// Extracts the hostname from a URL or bare domain.
///
/// A default `http://` scheme is assumed when the input has none, so both
/// `"https://Example.com/path"` and `"example.com"` yield `"example.com"`.
/// Applying it to its own output returns the same value.
///
/// Returns `None` if the input cannot be parsed or has no host component.
pub fn normalize_host(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if trimmed.contains("://") {
        url::Url::parse(trimmed)
    } else {
        url::Url::parse(&format!("{DEFAULT_SCHEME}{trimmed}"))
    }
    .ok()?;

    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Removes one leading `www.` (case-insensitive).
pub fn strip_www(host: &str) -> &str {
    match host.get(..WWW_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(WWW_PREFIX) => &host[WWW_PREFIX.len()..],
        _ => host,
    }
}

/// A predicate over `(from_host, to_host)` marking a redirect as safe.
pub trait SafeRedirectRule: Send + Sync {
    /// Short identifier used in debug logs.
    fn name(&self) -> &'static str;

    /// Returns true if a redirect from `from` to `to` is not notable.
    fn is_safe(&self, from: &str, to: &str) -> bool;
}

/// Same host, or bare domain ↔ `www.` variant of it.
#[derive(Debug, Default, Clone, Copy)]
pub struct WwwVariantRule;

impl SafeRedirectRule for WwwVariantRule {
    fn name(&self) -> &'static str {
        "www-variant"
    }

    fn is_safe(&self, from: &str, to: &str) -> bool {
        strip_www(from).eq_ignore_ascii_case(strip_www(to))
    }
}

/// Both hosts share a registrable domain according to the Public Suffix List.
///
/// `shop.example.co.uk` → `example.co.uk` is safe, `example.co.uk` →
/// `other.co.uk` is not. IP addresses and hosts without a known suffix never match.
#[derive(Debug, Default, Clone, Copy)]
pub struct SameSiteRule;

impl SameSiteRule {
    fn registrable_domain(host: &str) -> Option<String> {
        if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
            return None;
        }
        let lower = host.to_ascii_lowercase();
        psl::domain_str(&lower).map(str::to_string)
    }
}

impl SafeRedirectRule for SameSiteRule {
    fn name(&self) -> &'static str {
        "same-site"
    }

    fn is_safe(&self, from: &str, to: &str) -> bool {
        match (
            Self::registrable_domain(from),
            Self::registrable_domain(to),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// How a notable redirect changed the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// Moved to another host over the same (or a downgraded) scheme
    CrossHost,
    /// Moved to another host and from http to https
    ProtocolUpgrade,
}

impl RedirectKind {
    /// Classifies a redirect by the schemes of its first and last URL.
    pub fn of(origin_url: &str, final_url: &str) -> Self {
        if !origin_url.starts_with("https://") && final_url.starts_with("https://") {
            RedirectKind::ProtocolUpgrade
        } else {
            RedirectKind::CrossHost
        }
    }
}

/// Ordered set of safe-redirect rules.
///
/// Rules are evaluated in insertion order and the first match short-circuits.
/// The default set holds only [`WwwVariantRule`].
pub struct RedirectClassifier {
    rules: Vec<Box<dyn SafeRedirectRule>>,
}

impl RedirectClassifier {
    /// A classifier with no rules at all; every cross-host redirect is notable,
    /// including `www.` variants.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule after the existing ones.
    pub fn with_rule(mut self, rule: impl SafeRedirectRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Builds the classifier used by a scan.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let classifier = Self::default();
        if config.ignore_same_site {
            classifier.with_rule(SameSiteRule)
        } else {
            classifier
        }
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Returns true if any rule marks the redirect as safe.
    pub fn is_safe_redirect(&self, from: &str, to: &str) -> bool {
        match self.rules.iter().find(|rule| rule.is_safe(from, to)) {
            Some(rule) => {
                log::trace!("Redirect {} -> {} is safe ({})", from, to, rule.name());
                true
            }
            None => false,
        }
    }
}

impl Default for RedirectClassifier {
    fn default() -> Self {
        Self::empty().with_rule(WwwVariantRule)
    }
}

/// Checks a redirect against the default rule set.
pub fn is_safe_redirect(from: &str, to: &str) -> bool {
    WwwVariantRule.is_safe(from, to)
}
