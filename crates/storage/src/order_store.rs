use async_trait::async_trait;
use common::models::CurrentOrder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("order store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("order file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("order database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Holds at most one tracked order. `set` overwrites, `clear` on an empty
/// store is a no-op.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self) -> Result<Option<CurrentOrder>, StoreError>;

    async fn set(&self, order: &CurrentOrder) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
