pub mod dynamodb;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::models::User;
use crate::utils::AppError;

pub use dynamodb::DynamoDB;
pub use memory::MemoryTable;

/// The table every operation works against.
pub const USERS_TABLE: &str = "Users";

/// One page of a table scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub items: Vec<User>,
    /// The store holds more items than this page returned.
    pub truncated: bool,
    /// Items on this page that could not be read as a `User`.
    pub skipped: usize,
}

/// Handle to the remote `Users` table.
///
/// Implementations keep the store's native semantics: `put_item` overwrites,
/// `update_item` inserts on a missing key, `delete_item` ignores missing keys.
#[async_trait]
pub trait UserTable: Send + Sync {
    fn table_name(&self) -> &str;

    async fn put_item(&self, user: &User) -> Result<(), AppError>;

    /// Single scan request; does not follow continuation keys.
    async fn scan(&self) -> Result<ScanPage, AppError>;

    async fn update_item(&self, user: &User) -> Result<(), AppError>;

    async fn delete_item(&self, user_id: i64) -> Result<(), AppError>;
}

/// Builds the table handle selected by the configuration.
pub async fn connect(config: &AppConfig) -> Arc<dyn UserTable> {
    match config.backend {
        StoreBackend::DynamoDb => {
            let db = DynamoDB::new(config).await;
            log::info!("✅ DynamoDB client ready (region {})", db.region());
            Arc::new(db.table(USERS_TABLE))
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store, data is lost on restart");
            Arc::new(MemoryTable::new(USERS_TABLE))
        }
    }
}
