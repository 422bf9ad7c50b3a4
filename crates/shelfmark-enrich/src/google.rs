//! Google ID-token verification.
//!
//! The raw token from the login request is handed to Google's tokeninfo
//! endpoint, which validates the signature and expiry server-side. We only
//! check that the response parses and that the audience matches our client
//! id before trusting the (subject, email) pair.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use shelfmark_core::defaults::{GOOGLE_TOKENINFO_URL, IDENTITY_TIMEOUT_SECS};
use shelfmark_core::{Error, IdentityVerifier, Result, VerifiedIdentity};

/// Verifies Google ID tokens via the tokeninfo endpoint.
pub struct GoogleIdentityVerifier {
    client: Client,
    /// Expected audience. None when GOOGLE_CLIENT_ID is unset; verification
    /// then fails with a configuration error rather than at startup.
    client_id: Option<String>,
    tokeninfo_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    aud: String,
    sub: String,
    email: Option<String>,
}

impl GoogleIdentityVerifier {
    /// Create a verifier for the given OAuth client id.
    pub fn new(client_id: Option<String>) -> Self {
        Self::with_endpoint(client_id, GOOGLE_TOKENINFO_URL.to_string())
    }

    /// Create a verifier against a custom tokeninfo endpoint (tests).
    pub fn with_endpoint(client_id: Option<String>, tokeninfo_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(IDENTITY_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            client_id,
            tokeninfo_url,
        }
    }

    /// Create from environment variables (`GOOGLE_CLIENT_ID`).
    pub fn from_env() -> Self {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty());
        if client_id.is_none() {
            warn!(
                subsystem = "enrich",
                component = "google",
                "GOOGLE_CLIENT_ID is not set; logins will fail as misconfigured"
            );
        }
        Self::new(client_id)
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, raw_token: &str) -> Result<VerifiedIdentity> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| Error::Config("GOOGLE_CLIENT_ID is not set".to_string()))?;

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", raw_token)])
            .send()
            .await
            .map_err(|e| Error::InvalidCredential(format!("tokeninfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::InvalidCredential(format!(
                "tokeninfo returned status {}",
                response.status()
            )));
        }

        let info: TokenInfoResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidCredential(format!("tokeninfo response invalid: {}", e)))?;

        if info.aud != client_id {
            return Err(Error::InvalidCredential(
                "token audience does not match this application".to_string(),
            ));
        }

        let email = info
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::InvalidCredential("token carries no email".to_string()))?;

        debug!(
            subsystem = "enrich",
            component = "google",
            op = "verify",
            "Verified identity token"
        );

        Ok(VerifiedIdentity {
            subject: info.sub,
            email,
        })
    }
}
