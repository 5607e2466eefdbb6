use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{ScanPage, UserTable};
use crate::models::User;
use crate::utils::AppError;

/// In-process `Users` table with the same write semantics as DynamoDB.
///
/// Used for local runs (`STORE_BACKEND=memory`) and headless tests.
pub struct MemoryTable {
    table_name: String,
    items: RwLock<BTreeMap<i64, User>>,
    #[cfg(test)]
    failure: std::sync::Mutex<Option<String>>,
    #[cfg(test)]
    page_limit: std::sync::Mutex<Option<usize>>,
}

impl MemoryTable {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            items: RwLock::new(BTreeMap::new()),
            #[cfg(test)]
            failure: std::sync::Mutex::new(None),
            #[cfg(test)]
            page_limit: std::sync::Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn check_failure(&self) -> Result<(), AppError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(AppError::remote(message.clone())),
            None => Ok(()),
        }
    }

    #[cfg(not(test))]
    fn check_failure(&self) -> Result<(), AppError> {
        Ok(())
    }

    #[cfg(test)]
    fn page_limit(&self) -> Option<usize> {
        *self.page_limit.lock().unwrap()
    }

    #[cfg(not(test))]
    fn page_limit(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
impl MemoryTable {
    /// Every request fails with `message` until cleared with `None`.
    pub fn fail_with(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Scans return at most `limit` items and flag the rest as truncated.
    pub fn limit_page(&self, limit: Option<usize>) {
        *self.page_limit.lock().unwrap() = limit;
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.items.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserTable for MemoryTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn put_item(&self, user: &User) -> Result<(), AppError> {
        self.check_failure()?;
        self.items.write().await.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<ScanPage, AppError> {
        self.check_failure()?;
        let items = self.items.read().await;
        let limit = self.page_limit().unwrap_or(items.len());
        Ok(ScanPage {
            items: items.values().take(limit).cloned().collect(),
            truncated: items.len() > limit,
            skipped: 0,
        })
    }

    async fn update_item(&self, user: &User) -> Result<(), AppError> {
        self.check_failure()?;
        let mut items = self.items.write().await;
        let entry = items
            .entry(user.user_id)
            .or_insert_with(|| User::new(user.user_id, "", ""));
        entry.first_name = user.first_name.clone();
        entry.email = user.email.clone();
        Ok(())
    }

    async fn delete_item(&self, user_id: i64) -> Result<(), AppError> {
        self.check_failure()?;
        self.items.write().await.remove(&user_id);
        Ok(())
    }
}
