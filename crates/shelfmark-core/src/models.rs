//! Core data models for shelfmark.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated end user. The tenancy boundary: every category and site
/// is reachable only through its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    /// Stable subject id issued by the identity provider.
    pub google_sub: String,
    pub email: String,
    pub created_at_utc: DateTime<Utc>,
}

/// A named, ordered group of sites. Never reparented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Sort key within the owner's scope. Assigned append-at-end on creation,
    /// rewritten by reorders, never renormalized after deletes.
    pub display_order: i32,
    pub created_at_utc: DateTime<Utc>,
}

/// A category together with its sites, both in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithSites {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub created_at_utc: DateTime<Utc>,
    pub sites: Vec<Site>,
}

impl From<Category> for CategoryWithSites {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            display_order: category.display_order,
            created_at_utc: category.created_at_utc,
            sites: Vec::new(),
        }
    }
}

/// A bookmarked page. `category_id` is mutable via move; `display_order` is
/// scoped to the owning category and survives moves unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub url: String,
    pub favicon_url: Option<String>,
    pub display_order: i32,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Final column values for a new site. Title and favicon enrichment have
/// already run by the time this reaches the store.
#[derive(Debug, Clone)]
pub struct NewSite {
    pub category_id: Uuid,
    pub url: String,
    pub title: String,
    pub favicon_url: Option<String>,
}

/// One (id, order) assignment in a batch reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: Uuid,
    pub order: i32,
}

/// Identity attested by the external provider after verifying a raw credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_v7;

    #[test]
    fn test_category_with_sites_from_category_is_empty() {
        let category = Category {
            id: new_v7(),
            name: "Dev".to_string(),
            display_order: 0,
            created_at_utc: Utc::now(),
        };
        let with_sites = CategoryWithSites::from(category.clone());
        assert_eq!(with_sites.id, category.id);
        assert_eq!(with_sites.name, "Dev");
        assert!(with_sites.sites.is_empty());
    }

    #[test]
    fn test_order_assignment_deserializes_from_api_shape() {
        let parsed: OrderAssignment =
            serde_json::from_str(r#"{"id":"0191f3a0-0000-7000-8000-000000000000","order":3}"#)
                .unwrap();
        assert_eq!(parsed.order, 3);
    }

    #[test]
    fn test_site_serializes_null_favicon() {
        let site = Site {
            id: new_v7(),
            category_id: new_v7(),
            title: "X".to_string(),
            url: "http://x.com".to_string(),
            favicon_url: None,
            display_order: 0,
            created_at_utc: Utc::now(),
            updated_at_utc: Utc::now(),
        };
        let value = serde_json::to_value(&site).unwrap();
        assert!(value["favicon_url"].is_null());
        assert_eq!(value["display_order"], 0);
    }
}
