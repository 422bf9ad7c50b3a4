//! Site CRUD, reorder, and move handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use shelfmark_core::{NewSite, OrderAssignment, Site, SiteRepository, TitleFetcher};
use shelfmark_enrich::favicon_url_for;

use crate::auth::RequireOwner;
use crate::{ApiError, AppState};

/// Request body for creating a site.
#[derive(Debug, Deserialize)]
pub struct CreateSitePayload {
    pub url: String,
    /// Absent title triggers enrichment against the page itself.
    pub title: Option<String>,
    pub category_id: Uuid,
}

/// Request body for retitling a site.
#[derive(Debug, Deserialize)]
pub struct UpdateSitePayload {
    pub title: String,
}

/// Request body for moving a site between categories.
#[derive(Debug, Deserialize)]
pub struct MoveSitePayload {
    pub site_id: Uuid,
    pub new_category_id: Uuid,
}

/// POST /api/sites — create a site at the end of its category's order.
///
/// Title enrichment (bounded timeout, placeholder fallback) and favicon
/// derivation both finish before the write transaction is opened.
pub async fn create_site(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Json(payload): Json<CreateSitePayload>,
) -> Result<Json<Site>, ApiError> {
    let url = payload.url.trim();
    if url.is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }

    let title = match payload.title.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
        Some(title) => title.to_string(),
        None => state.titles.fetch_title(url).await,
    };

    let favicon_url = favicon_url_for(url);

    let site = state
        .db
        .sites
        .create(
            owner.id,
            NewSite {
                category_id: payload.category_id,
                url: url.to_string(),
                title,
                favicon_url,
            },
        )
        .await?;

    Ok(Json(site))
}

/// PUT /api/sites/{id} — update a site's title.
pub async fn update_site_title(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSitePayload>,
) -> Result<Json<Site>, ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let site = state.db.sites.update_title(owner.id, id, title).await?;
    Ok(Json(site))
}

/// DELETE /api/sites/{id} — delete a site.
pub async fn delete_site(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.sites.delete(owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/update-order/sites — batch display_order assignment.
///
/// All-or-nothing: one id outside the caller's scope rejects the whole
/// batch with 403.
pub async fn reorder_sites(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Json(assignments): Json<Vec<OrderAssignment>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.sites.reorder(owner.id, &assignments).await?;
    Ok(Json(serde_json::json!({
        "message": "Site order updated"
    })))
}

/// POST /api/move-site — reassign a site to another category. The site
/// keeps its display_order.
pub async fn move_site(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Json(payload): Json<MoveSitePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .sites
        .move_to_category(owner.id, payload.site_id, payload.new_category_id)
        .await?;
    Ok(Json(serde_json::json!({
        "message": "Site moved"
    })))
}
