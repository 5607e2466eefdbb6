// ==================== USER RECORD OPERATIONS ====================
// Add / view / update / delete against the `Users` table.
// Each call records its query shape before hitting the store.

use crate::{
    database::{ScanPage, UserTable},
    models::{LastQuery, QueryLog, User},
    utils::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    View,
    Update,
    Delete,
}

impl Operation {
    pub fn title(self) -> &'static str {
        match self {
            Operation::Add => "Add User",
            Operation::View => "View Users",
            Operation::Update => "Update User",
            Operation::Delete => "Delete User",
        }
    }

    /// "Error adding user: ..." and friends.
    pub fn failure_message(self, err: &AppError) -> String {
        let what = match self {
            Operation::Add => "adding user",
            Operation::View => "retrieving users",
            Operation::Update => "updating user",
            Operation::Delete => "deleting user",
        };
        format!("Error {}: {}", what, err)
    }

    /// Only the three writes report success; a scan just shows its rows.
    pub fn success_message(self, user_id: i64) -> Option<String> {
        let done = match self {
            Operation::Add => "added",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
            Operation::View => return None,
        };
        Some(format!("User {} {} successfully!", user_id, done))
    }
}

/// PutItem - unconditional, replaces an existing record with the same UserID
pub async fn add_user(
    table: &dyn UserTable,
    last_query: &LastQuery,
    user: &User,
) -> Result<(), AppError> {
    log::info!("📝 Adding user {}", user.user_id);
    last_query.record(QueryLog::put_item(table.table_name(), user));

    table.put_item(user).await.map_err(|e| {
        log::error!("❌ PutItem failed for user {}: {}", user.user_id, e);
        e
    })?;

    log::info!("✅ User {} added", user.user_id);
    Ok(())
}

/// Scan - first page only, sorted by UserID for display
pub async fn view_users(
    table: &dyn UserTable,
    last_query: &LastQuery,
) -> Result<ScanPage, AppError> {
    log::info!("📋 Scanning {}", table.table_name());
    last_query.record(QueryLog::scan(table.table_name()));

    let mut page = table.scan().await.map_err(|e| {
        log::error!("❌ Scan failed: {}", e);
        e
    })?;
    page.items.sort_by_key(|u| u.user_id);

    if page.truncated {
        log::warn!("⚠️  Scan returned only the first page ({} users)", page.items.len());
    }
    if page.skipped > 0 {
        log::warn!("⚠️  {} unreadable items left out of the listing", page.skipped);
    }
    log::info!("✅ Retrieved {} users", page.items.len());
    Ok(page)
}

/// UpdateItem - sets FirstName and Email, creating the record if missing
pub async fn update_user(
    table: &dyn UserTable,
    last_query: &LastQuery,
    user: &User,
) -> Result<(), AppError> {
    log::info!("🔧 Updating user {}", user.user_id);
    last_query.record(QueryLog::update_item(table.table_name(), user));

    table.update_item(user).await.map_err(|e| {
        log::error!("❌ UpdateItem failed for user {}: {}", user.user_id, e);
        e
    })?;

    log::info!("✅ User {} updated", user.user_id);
    Ok(())
}

/// DeleteItem - succeeds whether or not the record existed
pub async fn delete_user(
    table: &dyn UserTable,
    last_query: &LastQuery,
    user_id: i64,
) -> Result<(), AppError> {
    log::info!("🗑️  Deleting user {}", user_id);
    last_query.record(QueryLog::delete_item(table.table_name(), user_id));

    table.delete_item(user_id).await.map_err(|e| {
        log::error!("❌ DeleteItem failed for user {}: {}", user_id, e);
        e
    })?;

    log::info!("✅ User {} deleted", user_id);
    Ok(())
}
