//! Core traits for shelfmark abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// OWNER REPOSITORY
// =============================================================================

/// Repository for owner provisioning and lookup.
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Look up an owner by identity-provider subject, creating the record on
    /// first login. Idempotent, including under concurrent first logins.
    async fn resolve_or_create(&self, google_sub: &str, email: &str) -> Result<Owner>;

    /// Get an owner by id.
    async fn get(&self, id: Uuid) -> Result<Option<Owner>>;

    /// Get an owner by identity-provider subject.
    async fn get_by_subject(&self, google_sub: &str) -> Result<Option<Owner>>;
}

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Repository for category operations. Every call is scoped to an owner;
/// entities outside that scope behave as if absent.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category at the end of the owner's display order.
    async fn create(&self, owner_id: Uuid, name: &str) -> Result<CategoryWithSites>;

    /// List the owner's categories, each with its sites, both ordered by
    /// ascending display_order (ties broken by creation order).
    async fn list_with_sites(&self, owner_id: Uuid) -> Result<Vec<CategoryWithSites>>;

    /// Rename a category. NotFound if it does not exist under the owner.
    async fn rename(&self, owner_id: Uuid, category_id: Uuid, name: &str)
        -> Result<CategoryWithSites>;

    /// Delete a category and all its sites in one transaction.
    async fn delete(&self, owner_id: Uuid, category_id: Uuid) -> Result<()>;

    /// Apply a batch of display_order assignments. If any referenced id is
    /// not owned by the caller the whole batch is rejected with
    /// PermissionDenied and nothing is applied.
    async fn reorder(&self, owner_id: Uuid, assignments: &[OrderAssignment]) -> Result<()>;
}

// =============================================================================
// SITE REPOSITORY
// =============================================================================

/// Repository for site operations, scoped to the owner that transitively
/// owns the site's category.
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Create a site at the end of its category's display order. NotFound if
    /// the category is not owned by the caller.
    async fn create(&self, owner_id: Uuid, site: NewSite) -> Result<Site>;

    /// Update a site's title. NotFound if the site is not in the owner's scope.
    async fn update_title(&self, owner_id: Uuid, site_id: Uuid, title: &str) -> Result<Site>;

    /// Delete a site. NotFound if the site is not in the owner's scope.
    async fn delete(&self, owner_id: Uuid, site_id: Uuid) -> Result<()>;

    /// Apply a batch of display_order assignments. Same all-or-nothing
    /// ownership contract as category reorders.
    async fn reorder(&self, owner_id: Uuid, assignments: &[OrderAssignment]) -> Result<()>;

    /// Reassign a site to another category owned by the same owner. The
    /// site's display_order is left untouched.
    async fn move_to_category(
        &self,
        owner_id: Uuid,
        site_id: Uuid,
        new_category_id: Uuid,
    ) -> Result<()>;
}

// =============================================================================
// EXTERNAL COLLABORATOR BOUNDARIES
// =============================================================================

/// Verifies a raw identity-provider credential into a stable subject + email.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Returns InvalidCredential on any verification failure, Config when the
    /// provider is not configured server-side.
    async fn verify(&self, raw_token: &str) -> Result<VerifiedIdentity>;
}

/// Best-effort page-title lookup. Infallible by contract: any network error,
/// non-2xx status, or missing title element yields the fixed placeholder.
#[async_trait]
pub trait TitleFetcher: Send + Sync {
    async fn fetch_title(&self, url: &str) -> String;
}
