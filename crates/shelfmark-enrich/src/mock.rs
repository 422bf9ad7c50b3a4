//! Mock adapters for deterministic testing.
//!
//! Provide canned titles and identities so handler tests never touch the
//! network.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelfmark_enrich::mock::MockTitleFetcher;
//!
//! let titles = MockTitleFetcher::new()
//!     .with_title("http://x.com", "X")
//!     .with_default_title("Fallback");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shelfmark_core::defaults::FALLBACK_TITLE;
use shelfmark_core::{Error, IdentityVerifier, Result, TitleFetcher, VerifiedIdentity};

/// Mock title fetcher with fixed per-url responses and a call log.
#[derive(Clone)]
pub struct MockTitleFetcher {
    fixed_titles: HashMap<String, String>,
    default_title: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTitleFetcher {
    /// Create a mock that answers the placeholder for every url.
    pub fn new() -> Self {
        Self {
            fixed_titles: HashMap::new(),
            default_title: FALLBACK_TITLE.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the title returned for a specific url.
    pub fn with_title(mut self, url: &str, title: &str) -> Self {
        self.fixed_titles.insert(url.to_string(), title.to_string());
        self
    }

    /// Set the title returned for urls without a fixed response.
    pub fn with_default_title(mut self, title: &str) -> Self {
        self.default_title = title.to_string();
        self
    }

    /// Urls this mock has been asked about, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockTitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TitleFetcher for MockTitleFetcher {
    async fn fetch_title(&self, url: &str) -> String {
        self.calls.lock().unwrap().push(url.to_string());
        self.fixed_titles
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.default_title.clone())
    }
}

/// Mock identity verifier that accepts every token as one fixed identity,
/// or rejects everything.
#[derive(Clone)]
pub struct MockIdentityVerifier {
    identity: Option<VerifiedIdentity>,
}

impl MockIdentityVerifier {
    /// Accept any token as the given subject/email.
    pub fn accepting(subject: &str, email: &str) -> Self {
        Self {
            identity: Some(VerifiedIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
            }),
        }
    }

    /// Reject every token as an invalid credential.
    pub fn rejecting() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityVerifier for MockIdentityVerifier {
    async fn verify(&self, _raw_token: &str) -> Result<VerifiedIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| Error::InvalidCredential("mock verifier rejects all tokens".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_title_fetcher_fixed_and_default() {
        let titles = MockTitleFetcher::new()
            .with_title("http://known.com", "Known")
            .with_default_title("Fallback");

        assert_eq!(titles.fetch_title("http://known.com").await, "Known");
        assert_eq!(titles.fetch_title("http://other.com").await, "Fallback");
        assert_eq!(
            titles.calls(),
            vec!["http://known.com".to_string(), "http://other.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mock_identity_verifier_modes() {
        let accepting = MockIdentityVerifier::accepting("sub-1", "a@example.com");
        let identity = accepting.verify("anything").await.unwrap();
        assert_eq!(identity.subject, "sub-1");

        let rejecting = MockIdentityVerifier::rejecting();
        assert!(matches!(
            rejecting.verify("anything").await.unwrap_err(),
            Error::InvalidCredential(_)
        ));
    }
}
