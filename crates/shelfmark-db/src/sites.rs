//! Site repository implementation.
//!
//! Sites are owned transitively: every query joins through the owning
//! category's owner_id. Ownership checks and the writes they guard share a
//! single transaction, so a concurrent category delete cannot slip between
//! the check and the mutation.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use shelfmark_core::{new_v7, Error, NewSite, OrderAssignment, Result, Site, SiteRepository};

/// PostgreSQL implementation of SiteRepository.
pub struct PgSiteRepository {
    pool: Pool<Postgres>,
}

impl PgSiteRepository {
    /// Create a new PgSiteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn site_from_row(row: sqlx::postgres::PgRow) -> Site {
        Site {
            id: row.get("id"),
            category_id: row.get("category_id"),
            title: row.get("title"),
            url: row.get("url"),
            favicon_url: row.get("favicon_url"),
            display_order: row.get("display_order"),
            created_at_utc: row.get("created_at_utc"),
            updated_at_utc: row.get("updated_at_utc"),
        }
    }
}

#[async_trait]
impl SiteRepository for PgSiteRepository {
    async fn create(&self, owner_id: Uuid, site: NewSite) -> Result<Site> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let owned: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1 AND owner_id = $2")
                .bind(site.category_id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;

        if owned.is_none() {
            return Err(Error::NotFound(format!(
                "Category {} not found",
                site.category_id
            )));
        }

        // Append-at-end within the category; the owner's other categories do
        // not influence the slot.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site WHERE category_id = $1")
            .bind(site.category_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO site (id, category_id, title, url, favicon_url, display_order,
                               created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
        )
        .bind(id)
        .bind(site.category_id)
        .bind(&site.title)
        .bind(&site.url)
        .bind(&site.favicon_url)
        .bind(count as i32)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(Site {
            id,
            category_id: site.category_id,
            title: site.title,
            url: site.url,
            favicon_url: site.favicon_url,
            display_order: count as i32,
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    async fn update_title(&self, owner_id: Uuid, site_id: Uuid, title: &str) -> Result<Site> {
        let row = sqlx::query(
            "UPDATE site SET title = $1, updated_at_utc = $2
             WHERE id = $3
               AND category_id IN (SELECT id FROM category WHERE owner_id = $4)
             RETURNING id, category_id, title, url, favicon_url, display_order,
                       created_at_utc, updated_at_utc",
        )
        .bind(title)
        .bind(Utc::now())
        .bind(site_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::site_from_row)
            .ok_or_else(|| Error::NotFound(format!("Site {} not found", site_id)))
    }

    async fn delete(&self, owner_id: Uuid, site_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM site
             WHERE id = $1
               AND category_id IN (SELECT id FROM category WHERE owner_id = $2)",
        )
        .bind(site_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Site {} not found", site_id)));
        }
        Ok(())
    }

    async fn reorder(&self, owner_id: Uuid, assignments: &[OrderAssignment]) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
        let distinct: HashSet<Uuid> = ids.iter().copied().collect();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Every id in the batch must resolve to a site whose category belongs
        // to the caller before any update is applied.
        let owned: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT s.id)
             FROM site s
             JOIN category c ON c.id = s.category_id
             WHERE s.id = ANY($1) AND c.owner_id = $2",
        )
        .bind(&ids)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if owned != distinct.len() as i64 {
            return Err(Error::PermissionDenied(
                "order batch references sites outside the caller's scope".to_string(),
            ));
        }

        for assignment in assignments {
            sqlx::query(
                "UPDATE site SET display_order = $1
                 WHERE id = $2
                   AND category_id IN (SELECT id FROM category WHERE owner_id = $3)",
            )
            .bind(assignment.order)
            .bind(assignment.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn move_to_category(
        &self,
        owner_id: Uuid,
        site_id: Uuid,
        new_category_id: Uuid,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let destination: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1 AND owner_id = $2")
                .bind(new_category_id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;

        if destination.is_none() {
            return Err(Error::NotFound(format!(
                "Category {} not found",
                new_category_id
            )));
        }

        // Only the category reference changes; display_order carries over
        // into the destination untouched.
        let result = sqlx::query(
            "UPDATE site SET category_id = $1, updated_at_utc = $2
             WHERE id = $3
               AND category_id IN (SELECT id FROM category WHERE owner_id = $4)",
        )
        .bind(new_category_id)
        .bind(Utc::now())
        .bind(site_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Site {} not found", site_id)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
