//! Login and identity handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shelfmark_core::{IdentityVerifier, OwnerRepository};

use crate::auth::RequireOwner;
use crate::{ApiError, AppState};

/// Request body for Google login.
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    /// Raw ID token obtained by the client from Google.
    pub token: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/google — exchange a Google ID token for a bearer token.
///
/// First login provisions the owner; later logins resolve the same record.
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let identity = state.identity.verify(&req.token).await?;

    let owner = state
        .db
        .owners
        .resolve_or_create(&identity.subject, &identity.email)
        .await?;

    info!(
        subsystem = "api",
        component = "auth",
        op = "login",
        owner_id = %owner.id,
        "Owner authenticated"
    );

    Ok(Json(LoginResponse {
        access_token: state.tokens.issue(owner.id),
        token_type: "bearer".to_string(),
    }))
}

/// Response body for the identity endpoint.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
}

/// GET /api/users/me — identify the calling owner.
pub async fn whoami(RequireOwner { owner }: RequireOwner) -> Json<MeResponse> {
    Json(MeResponse {
        id: owner.id,
        email: owner.email,
    })
}
