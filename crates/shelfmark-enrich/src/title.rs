//! Best-effort page-title fetching.
//!
//! The fetcher is infallible by contract: every failure path (connection
//! error, timeout, non-2xx status, missing or empty `<title>`) collapses
//! into the fixed placeholder so site creation never blocks on a flaky
//! remote page. The bounded request timeout is the only thing standing
//! between a slow origin and a slow create, so it stays small.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

use shelfmark_core::defaults::{FALLBACK_TITLE, TITLE_FETCH_TIMEOUT_SECS};
use shelfmark_core::{Error, Result, TitleFetcher};

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex"));

/// Fetches page titles over HTTP with a bounded timeout.
pub struct HttpTitleFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpTitleFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// `TITLE_FETCH_TIMEOUT_SECS` overrides the default timeout.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("TITLE_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(TITLE_FETCH_TIMEOUT_SECS);

        Self::new(timeout_secs)
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!("status {}", response.status())));
        }

        let body = response.text().await?;

        TITLE_RE
            .captures(&body)
            .and_then(|caps| caps.get(1))
            .map(|m| decode_entities(m.as_str().trim()))
            .filter(|title| !title.is_empty())
            .ok_or_else(|| Error::Upstream("no title element".to_string()))
    }
}

#[async_trait]
impl TitleFetcher for HttpTitleFetcher {
    async fn fetch_title(&self, url: &str) -> String {
        let start = Instant::now();
        match self.try_fetch(url).await {
            Ok(title) => {
                debug!(
                    subsystem = "enrich",
                    component = "title",
                    op = "fetch",
                    url,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Fetched page title"
                );
                title
            }
            Err(err) => {
                warn!(
                    subsystem = "enrich",
                    component = "title",
                    op = "fetch",
                    url,
                    timeout_secs = self.timeout_secs,
                    error = %err,
                    "Title fetch failed, using placeholder"
                );
                FALLBACK_TITLE.to_string()
            }
        }
    }
}

/// Decode the handful of HTML entities that commonly show up in titles.
fn decode_entities(s: &str) -> String {
    // `&amp;` last, so `&amp;lt;` decodes to `&lt;` and no further.
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
