//! Owner repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use shelfmark_core::{new_v7, Error, Owner, OwnerRepository, Result};

/// PostgreSQL implementation of OwnerRepository.
pub struct PgOwnerRepository {
    pool: Pool<Postgres>,
}

impl PgOwnerRepository {
    /// Create a new PgOwnerRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn owner_from_row(row: sqlx::postgres::PgRow) -> Owner {
        Owner {
            id: row.get("id"),
            google_sub: row.get("google_sub"),
            email: row.get("email"),
            created_at_utc: row.get("created_at_utc"),
        }
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn resolve_or_create(&self, google_sub: &str, email: &str) -> Result<Owner> {
        if let Some(owner) = self.get_by_subject(google_sub).await? {
            return Ok(owner);
        }

        let id = new_v7();
        let now = Utc::now();

        // Two first logins for the same subject can race here; the conflict
        // clause turns the loser's insert into a no-op and the re-read below
        // returns the winner's row either way.
        sqlx::query(
            "INSERT INTO owner (id, google_sub, email, created_at_utc)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (google_sub) DO NOTHING",
        )
        .bind(id)
        .bind(google_sub)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.get_by_subject(google_sub).await?.ok_or_else(|| {
            Error::Internal(format!("owner upsert lost subject {}", google_sub))
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Owner>> {
        let row = sqlx::query(
            "SELECT id, google_sub, email, created_at_utc FROM owner WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::owner_from_row))
    }

    async fn get_by_subject(&self, google_sub: &str) -> Result<Option<Owner>> {
        let row = sqlx::query(
            "SELECT id, google_sub, email, created_at_utc FROM owner WHERE google_sub = $1",
        )
        .bind(google_sub)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::owner_from_row))
    }
}
