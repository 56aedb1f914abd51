use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use common::models::CurrentOrder;
use sqlx::sqlite::{self, SqliteConnectOptions, SqlitePool};
use tracing::{debug, info};

use crate::order_store::{OrderStore, StoreError};

/// Single-row SQLite table holding the tracked order.
#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePool::connect_with(options).await?;
        info!("Opened order database {}", path.display());
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let schema = include_str!("../../../sql/schema.sql");
        sqlx::query(schema).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn get(&self) -> Result<Option<CurrentOrder>, StoreError> {
        let ord_id = sqlx::query_scalar::<_, String>("SELECT ord_id FROM current_order WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(ord_id.filter(|id| !id.is_empty()).map(CurrentOrder::new))
    }

    async fn set(&self, order: &CurrentOrder) -> Result<(), StoreError> {
        sqlx::query(
            r#"
                INSERT INTO current_order (id, ord_id) VALUES (1, ?)
                ON CONFLICT(id) DO UPDATE SET
                    ord_id = excluded.ord_id,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            "#,
        )
        .bind(order.ord_id.as_str())
        .execute(&self.pool)
        .await?;

        debug!("Saved current order {}", order.ord_id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM current_order")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");

        let store = SqliteOrderStore::open(&path).await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
        store.set(&CurrentOrder::new("111")).await.unwrap();
        store.set(&CurrentOrder::new("612279038112002048")).await.unwrap();
        store.pool.close().await;

        let reopened = SqliteOrderStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get().await.unwrap(),
            Some(CurrentOrder::new("612279038112002048"))
        );

        reopened.clear().await.unwrap();
        assert_eq!(reopened.get().await.unwrap(), None);
        reopened.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_id_reads_as_no_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteOrderStore::open(&dir.path().join("orders.db")).await.unwrap();

        store.set(&CurrentOrder::new("")).await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }
}
