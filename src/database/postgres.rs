use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Tab;
use crate::database::repository::TabStore;

const CREATE_TABS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tabs (
        id          UUID PRIMARY KEY,
        seq         BIGSERIAL,
        document    JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// The `tabs` collection: one JSONB document per tab, keyed by its id.
#[derive(Clone)]
pub struct PgTabStore {
    pool: PgPool,
}

impl PgTabStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collection if this is a fresh database.
    pub async fn ensure_collection(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABS_TABLE).execute(&self.pool).await?;
        info!("tabs collection ready");
        Ok(())
    }

    fn decode(id: Uuid, document: Json<Tab>) -> Tab {
        let mut tab = document.0;
        tab.id = Some(id);
        tab
    }
}

#[async_trait]
impl TabStore for PgTabStore {
    async fn find_all(&self) -> Result<Vec<Tab>, DatabaseError> {
        let rows = sqlx::query("SELECT id, document FROM tabs ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<Tab, DatabaseError> {
                let id: Uuid = row.try_get("id")?;
                let document: Json<Tab> = row.try_get("document")?;
                Ok(Self::decode(id, document))
            })
            .collect()
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Tab>, DatabaseError> {
        let row = sqlx::query("SELECT document FROM tabs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::decode(id, row.try_get("document")?))),
            None => Ok(None),
        }
    }

    async fn insert_one(&self, tab: &Tab) -> Result<(), DatabaseError> {
        let id = tab.id.unwrap_or_else(Uuid::nil);
        let result = sqlx::query("INSERT INTO tabs (id, document) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(tab))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DatabaseError::Duplicate(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_one(&self, id: Uuid, tab: &Tab) -> Result<u64, DatabaseError> {
        let result =
            sqlx::query("UPDATE tabs SET document = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(tab))
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM tabs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
