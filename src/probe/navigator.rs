//! Navigation backends.
//!
//! The probe only needs one capability: "go to this URL, let redirects settle,
//! tell me where you ended up". [`Navigator`] is that seam. [`HttpNavigator`]
//! implements it with a plain HTTP client that follows redirects by hand.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::config::{MAX_REDIRECT_HOPS, MAX_REFRESH_BODY_SIZE};
use crate::error_handling::ProbeError;

use super::refresh::find_meta_refresh;

/// Resolves the final location of a URL.
///
/// Implementations must be cancel-safe: the probe drops the future when its
/// deadline expires.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigates to `url` and returns the location reached after any server- or
    /// client-driven redirects that fire within `settle`.
    async fn navigate(&self, url: &str, settle: Duration) -> Result<String, ProbeError>;
}

/// Navigator backed by `reqwest`.
///
/// Follows 301/302/303/307/308 responses manually (the client must have
/// redirects disabled) and then checks HTML bodies for a meta refresh that would
/// fire within the settle window.
pub struct HttpNavigator {
    client: Arc<reqwest::Client>,
    max_hops: usize,
}

impl HttpNavigator {
    /// Creates a navigator around a client with redirects disabled.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            max_hops: MAX_REDIRECT_HOPS,
        }
    }

    /// Overrides the maximum number of hops followed.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }
}

fn resolve_location(current: &Url, location: &str) -> Result<Url, ProbeError> {
    Url::parse(location)
        .or_else(|_| current.join(location))
        .map_err(|source| ProbeError::InvalidLocation {
            location: location.to_string(),
            source,
        })
}

/// Decodes a raw `Location` value. Servers often send unencoded UTF-8 paths,
/// which `HeaderValue::to_str` rejects.
fn decode_location(raw: &[u8]) -> Result<&str, ProbeError> {
    std::str::from_utf8(raw)
        .map_err(|_| ProbeError::UndecodableLocation(String::from_utf8_lossy(raw).into_owned()))
}

fn is_http_redirect(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

fn is_html(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

async fn read_limited_body(mut response: reqwest::Response) -> Result<String, ProbeError> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() >= MAX_REFRESH_BODY_SIZE {
            body.truncate(MAX_REFRESH_BODY_SIZE);
            break;
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn navigate(&self, url: &str, settle: Duration) -> Result<String, ProbeError> {
        let mut current = Url::parse(url).map_err(|source| ProbeError::InvalidLocation {
            location: url.to_string(),
            source,
        })?;

        // One request per hop, plus the request for the final page.
        for _ in 0..=self.max_hops {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if is_http_redirect(status) {
                let Some(location) = response.headers().get(reqwest::header::LOCATION) else {
                    log::debug!(
                        "Redirect status {} for {} but no Location header",
                        status.as_u16(),
                        current
                    );
                    return Ok(current.to_string());
                };
                let location = decode_location(location.as_bytes())?;
                let next = resolve_location(&current, location)?;
                log::trace!("{} -> {} ({})", current, next, status.as_u16());
                current = next;
                continue;
            }

            if !is_html(&response) {
                return Ok(current.to_string());
            }

            let body = read_limited_body(response).await?;
            match find_meta_refresh(&body, settle) {
                Some(target) => {
                    let next = resolve_location(&current, &target)?;
                    if next == current {
                        return Ok(current.to_string());
                    }
                    log::trace!("{} -> {} (meta refresh)", current, next);
                    current = next;
                }
                None => return Ok(current.to_string()),
            }
        }

        Err(ProbeError::TooManyRedirects(self.max_hops))
    }
}
