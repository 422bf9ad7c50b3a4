//! Bearer-token issuance, verification, and the authenticated-owner extractor.
//!
//! Tokens are stateless: `bm_<payload>.<sig>` where the payload is
//! base64url(`<owner_uuid>:<expiry_unix>`) and the signature is the hex
//! HMAC-SHA256 of the payload under the server secret. Expiry rides inside
//! the signed payload, so there is nothing to revoke server-side and no
//! refresh flow; an expired token forces a fresh login.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use shelfmark_core::defaults::AUTH_TOKEN_TTL_DAYS;
use shelfmark_core::{Error, Owner, OwnerRepository, Result};

use crate::{ApiError, AppState};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "bm_";

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct AuthTokens {
    secret: String,
    ttl: Duration,
}

impl AuthTokens {
    /// Create a codec with an explicit secret and token lifetime.
    pub fn new(secret: String, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Create from environment variables.
    ///
    /// `AUTH_TOKEN_SECRET` is required; `AUTH_TOKEN_TTL_DAYS` overrides the
    /// default 7-day lifetime.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("AUTH_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("AUTH_TOKEN_SECRET is not set".to_string()))?;

        let ttl_days = std::env::var("AUTH_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(AUTH_TOKEN_TTL_DAYS);

        Ok(Self::new(secret, Duration::days(ttl_days)))
    }

    /// Issue a token for the owner, expiring after the configured TTL.
    pub fn issue(&self, owner_id: Uuid) -> String {
        self.issue_with_expiry(owner_id, (Utc::now() + self.ttl).timestamp())
    }

    fn issue_with_expiry(&self, owner_id: Uuid, expiry_unix: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{}:{}", owner_id, expiry_unix));
        let signature = self.sign(&payload);
        format!("{}{}.{}", TOKEN_PREFIX, payload, signature)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a token's signature and expiry, returning the owner id.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let unauthenticated = |msg: &str| Error::Unauthenticated(msg.to_string());

        let rest = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| unauthenticated("unrecognized token format"))?;
        let (payload, signature) = rest
            .split_once('.')
            .ok_or_else(|| unauthenticated("unrecognized token format"))?;

        let signature_bytes =
            hex::decode(signature).map_err(|_| unauthenticated("malformed signature"))?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature_bytes)
            .map_err(|_| unauthenticated("signature mismatch"))?;

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| unauthenticated("malformed payload"))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| unauthenticated("malformed payload"))?;
        let (id_part, expiry_part) = decoded
            .split_once(':')
            .ok_or_else(|| unauthenticated("malformed payload"))?;

        let owner_id =
            Uuid::parse_str(id_part).map_err(|_| unauthenticated("malformed owner id"))?;
        let expiry_unix = expiry_part
            .parse::<i64>()
            .map_err(|_| unauthenticated("malformed expiry"))?;

        if expiry_unix <= Utc::now().timestamp() {
            return Err(unauthenticated("token expired"));
        }

        Ok(owner_id)
    }
}

/// Extractor that requires a valid bearer token resolving to a known owner.
///
/// Usage:
/// ```ignore
/// async fn my_handler(RequireOwner { owner }: RequireOwner) -> impl IntoResponse {
///     // every store call is scoped by owner.id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireOwner {
    pub owner: Owner,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let owner_id = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        // A signed token for a subject we no longer know is still a 401, not
        // a 404; the owner row is the source of truth.
        let owner = state
            .db
            .owners
            .get(owner_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("Unknown subject".to_string()))?;

        Ok(RequireOwner { owner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> AuthTokens {
        AuthTokens::new("test-secret".to_string(), Duration::days(7))
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let tokens = codec();
        let owner_id = Uuid::new_v4();

        let token = tokens.issue(owner_id);
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(tokens.verify(&token).unwrap(), owner_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = codec();
        let owner_id = Uuid::new_v4();

        let token = tokens.issue_with_expiry(owner_id, Utc::now().timestamp() - 60);
        let err = tokens.verify(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated(_)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let tokens = codec();
        let token = tokens.issue(Uuid::new_v4());

        let (head, sig) = token.split_once('.').unwrap();
        let other_payload = URL_SAFE_NO_PAD.encode(format!(
            "{}:{}",
            Uuid::new_v4(),
            Utc::now().timestamp() + 3600
        ));
        let forged = format!("{}{}.{}", TOKEN_PREFIX, other_payload, sig);
        assert!(tokens.verify(&forged).is_err());
        assert!(tokens.verify(head).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = codec().issue(Uuid::new_v4());
        let other = AuthTokens::new("other-secret".to_string(), Duration::days(7));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        let tokens = codec();
        for garbage in ["", "bm_", "bm_abc", "bm_abc.def", "not-a-token", "bm_!!!.00"] {
            assert!(tokens.verify(garbage).is_err(), "accepted {:?}", garbage);
        }
    }
}
