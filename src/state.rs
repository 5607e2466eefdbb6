use std::sync::Arc;

use crate::database::UserTable;
use crate::models::LastQuery;

/// Shared by every handler through `web::Data`.
pub struct AppState {
    pub table: Arc<dyn UserTable>,
    pub last_query: LastQuery,
}

impl AppState {
    pub fn new(table: Arc<dyn UserTable>) -> Self {
        Self {
            table,
            last_query: LastQuery::new(),
        }
    }

    pub fn table(&self) -> &dyn UserTable {
        self.table.as_ref()
    }
}
