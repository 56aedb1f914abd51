use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use common::models::CurrentOrder;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use crate::order_store::{OrderStore, StoreError};

/// Keeps the tracked order in a small JSON file, `{"ordId": "..."}`.
pub struct JsonFileStore {
    path: PathBuf,
}

#[derive(Deserialize)]
struct OrderFile {
    #[serde(rename = "ordId", default)]
    ord_id: Option<String>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("current_order.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn get(&self) -> Result<Option<CurrentOrder>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: OrderFile = serde_json::from_slice(&bytes)?;
        Ok(file
            .ord_id
            .filter(|id| !id.is_empty())
            .map(CurrentOrder::new))
    }

    async fn set(&self, order: &CurrentOrder) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves a half-written file.
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec(order)?).await?;
        fs::rename(&temp, &self.path).await?;

        debug!("Saved current order {} to {}", order.ord_id, self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
