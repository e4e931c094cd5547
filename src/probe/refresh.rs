//! Client-side redirect detection.
//!
//! Pages that redirect with `<meta http-equiv="refresh" content="0; url=...">`
//! never send a `Location` header, so the HTTP navigator looks for the tag in
//! the final response body.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

const META_REFRESH_SELECTOR_STR: &str = "meta[http-equiv]";

static META_REFRESH_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| {
    Selector::parse(META_REFRESH_SELECTOR_STR)
        .map_err(|e| {
            log::error!(
                "Failed to parse meta refresh selector '{}': {}",
                META_REFRESH_SELECTOR_STR,
                e
            );
        })
        .ok()
});

// "5", "0; url=/next", "0;URL='https://example.com'", "3, https://example.com"
static REFRESH_CONTENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d*)?)\s*(?:[;,]\s*(?:url\s*=\s*)?(.*?))?\s*$")
        .map_err(|e| log::error!("Failed to compile refresh content pattern: {}", e))
        .ok()
});

/// A parsed refresh directive.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaRefresh {
    /// Delay before the browser would navigate
    pub delay: Duration,
    /// Target as written in the page (possibly relative)
    pub target: String,
}

/// Parses the `content` attribute of a refresh tag.
///
/// Returns `None` for malformed content or a refresh without a target (which
/// only reloads the current page).
pub fn parse_refresh_content(content: &str) -> Option<MetaRefresh> {
    let pattern = REFRESH_CONTENT.as_ref()?;
    let caps = pattern.captures(content)?;

    let seconds: f64 = caps.get(1)?.as_str().parse().ok()?;
    let target = caps
        .get(2)
        .map(|m| m.as_str().trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .unwrap_or("");
    if target.is_empty() {
        return None;
    }

    // Delays too large for a Duration never fire
    let delay = Duration::try_from_secs_f64(seconds).ok()?;

    Some(MetaRefresh {
        delay,
        target: target.to_string(),
    })
}

/// Finds the first meta refresh in `html` that fires within `settle`.
///
/// A refresh scheduled after the settle window would not have happened by the
/// time a browser reads its location, so it is ignored.
pub fn find_meta_refresh(html: &str, settle: Duration) -> Option<String> {
    let selector = META_REFRESH_SELECTOR.as_ref()?;
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .filter_map(|el| el.value().attr("content"))
        .filter_map(parse_refresh_content)
        .find(|refresh| refresh.delay <= settle)
        .map(|refresh| refresh.target)
}
