//! Category repository implementation.
//!
//! Every operation is filtered by the owning owner's id; a category that
//! exists under a different owner is indistinguishable from one that does
//! not exist at all.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use shelfmark_core::{
    new_v7, Category, CategoryRepository, CategoryWithSites, Error, OrderAssignment, Result, Site,
};

/// PostgreSQL implementation of CategoryRepository.
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
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

/// Fetch one category's sites in display order, inside a transaction.
async fn sites_for_category_tx(
    tx: &mut Transaction<'_, Postgres>,
    category_id: Uuid,
) -> Result<Vec<Site>> {
    let rows = sqlx::query(
        "SELECT id, category_id, title, url, favicon_url, display_order,
                created_at_utc, updated_at_utc
         FROM site
         WHERE category_id = $1
         ORDER BY display_order, id",
    )
    .bind(category_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(Error::Database)?;

    Ok(rows.into_iter().map(site_from_row).collect())
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, owner_id: Uuid, name: &str) -> Result<CategoryWithSites> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Append-at-end: the next slot is the current count, not the lowest
        // freed value. Deletions leave gaps that are never reclaimed.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO category (id, owner_id, name, display_order, created_at_utc)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(name)
        .bind(count as i32)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(CategoryWithSites::from(Category {
            id,
            name: name.to_string(),
            display_order: count as i32,
            created_at_utc: now,
        }))
    }

    async fn list_with_sites(&self, owner_id: Uuid) -> Result<Vec<CategoryWithSites>> {
        let category_rows = sqlx::query(
            "SELECT id, name, display_order, created_at_utc
             FROM category
             WHERE owner_id = $1
             ORDER BY display_order, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let site_rows = sqlx::query(
            "SELECT s.id, s.category_id, s.title, s.url, s.favicon_url, s.display_order,
                    s.created_at_utc, s.updated_at_utc
             FROM site s
             JOIN category c ON c.id = s.category_id
             WHERE c.owner_id = $1
             ORDER BY s.display_order, s.id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut sites_by_category: HashMap<Uuid, Vec<Site>> = HashMap::new();
        for row in site_rows {
            let site = site_from_row(row);
            sites_by_category.entry(site.category_id).or_default().push(site);
        }

        Ok(category_rows
            .into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                CategoryWithSites {
                    id,
                    name: row.get("name"),
                    display_order: row.get("display_order"),
                    created_at_utc: row.get("created_at_utc"),
                    sites: sites_by_category.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn rename(
        &self,
        owner_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> Result<CategoryWithSites> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(
            "UPDATE category SET name = $1
             WHERE id = $2 AND owner_id = $3
             RETURNING id, name, display_order, created_at_utc",
        )
        .bind(name)
        .bind(category_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Category {} not found", category_id)))?;

        let sites = sites_for_category_tx(&mut tx, category_id).await?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(CategoryWithSites {
            id: row.get("id"),
            name: row.get("name"),
            display_order: row.get("display_order"),
            created_at_utc: row.get("created_at_utc"),
            sites,
        })
    }

    async fn delete(&self, owner_id: Uuid, category_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let owned: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1 AND owner_id = $2")
                .bind(category_id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;

        if owned.is_none() {
            return Err(Error::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        // Delete children first, then the category, inside one transaction.
        sqlx::query("DELETE FROM site WHERE category_id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn reorder(&self, owner_id: Uuid, assignments: &[OrderAssignment]) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
        let distinct: HashSet<Uuid> = ids.iter().copied().collect();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Ownership of the whole batch is checked before any row changes.
        let owned: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT id) FROM category WHERE id = ANY($1) AND owner_id = $2",
        )
        .bind(&ids)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if owned != distinct.len() as i64 {
            return Err(Error::PermissionDenied(
                "order batch references categories outside the caller's scope".to_string(),
            ));
        }

        for assignment in assignments {
            sqlx::query("UPDATE category SET display_order = $1 WHERE id = $2 AND owner_id = $3")
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
}
