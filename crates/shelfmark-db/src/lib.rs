//! # shelfmark-db
//!
//! PostgreSQL database layer for shelfmark.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for owners, categories, and sites
//! - The per-owner ordering model: append-at-end display_order assignment,
//!   all-or-nothing batch reorders, and ownership-scoped mutations, each
//!   executed inside a single transaction
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelfmark_db::Database;
//! use shelfmark_core::{CategoryRepository, OwnerRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/shelfmark").await?;
//!
//!     let owner = db.owners.resolve_or_create("sub-123", "me@example.com").await?;
//!     let category = db.categories.create(owner.id, "Reading list").await?;
//!
//!     println!("Created category: {}", category.id);
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod owners;
pub mod pool;
pub mod sites;

#[cfg(test)]
mod tests;

// Test fixtures for integration tests
// Note: Always compiled so downstream crates' tests can use TestDatabase
pub mod test_fixtures;

// Re-export core types
pub use shelfmark_core::*;

// Re-export repository implementations
pub use categories::PgCategoryRepository;
pub use owners::PgOwnerRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sites::PgSiteRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Owner repository for provisioning and lookup.
    pub owners: PgOwnerRepository,
    /// Category repository for ordering-scoped category operations.
    pub categories: PgCategoryRepository,
    /// Site repository for ordering-scoped site operations.
    pub sites: PgSiteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            owners: PgOwnerRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            sites: PgSiteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            owners: PgOwnerRepository::new(self.pool.clone()),
            categories: PgCategoryRepository::new(self.pool.clone()),
            sites: PgSiteRepository::new(self.pool.clone()),
        }
    }
}
