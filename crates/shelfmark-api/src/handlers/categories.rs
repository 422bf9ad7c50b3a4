//! Category CRUD and reorder handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use shelfmark_core::{CategoryRepository, CategoryWithSites, OrderAssignment};

use crate::auth::RequireOwner;
use crate::{ApiError, AppState};

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

fn validated_name(payload: &CategoryPayload) -> Result<&str, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    Ok(name)
}

/// GET /api/categories — the owner's categories with their sites, in
/// display order.
pub async fn list_categories(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
) -> Result<Json<Vec<CategoryWithSites>>, ApiError> {
    let categories = state.db.categories.list_with_sites(owner.id).await?;
    Ok(Json(categories))
}

/// POST /api/categories — create a category at the end of the display order.
pub async fn create_category(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryWithSites>, ApiError> {
    let name = validated_name(&payload)?;
    let category = state.db.categories.create(owner.id, name).await?;
    Ok(Json(category))
}

/// PUT /api/categories/{id} — rename a category.
pub async fn update_category(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryWithSites>, ApiError> {
    let name = validated_name(&payload)?;
    let category = state.db.categories.rename(owner.id, id, name).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} — delete a category and all its sites.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.categories.delete(owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/update-order/categories — batch display_order assignment.
///
/// All-or-nothing: one id outside the caller's scope rejects the whole
/// batch with 403.
pub async fn reorder_categories(
    State(state): State<AppState>,
    RequireOwner { owner }: RequireOwner,
    Json(assignments): Json<Vec<OrderAssignment>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.categories.reorder(owner.id, &assignments).await?;
    Ok(Json(serde_json::json!({
        "message": "Category order updated"
    })))
}
