pub mod db;
pub mod file_store;
pub mod order_store;

pub use db::SqliteOrderStore;
pub use file_store::JsonFileStore;
pub use order_store::{OrderStore, StoreError};
