use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{PoisonError, RwLock};

use super::User;

pub const UPDATE_EXPRESSION: &str = "SET FirstName = :first_name, Email = :email";

/// Low-level shape of the last request sent to the store, in DynamoDB's
/// typed JSON notation. Shown in the panel sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct QueryLog {
    pub operation: String,
    #[schema(value_type = Object)]
    pub params: Value,
}

impl QueryLog {
    pub fn put_item(table_name: &str, user: &User) -> Self {
        Self {
            operation: "PutItem".to_string(),
            params: json!({
                "TableName": table_name,
                "Item": {
                    "UserID": { "N": user.user_id.to_string() },
                    "FirstName": { "S": user.first_name },
                    "Email": { "S": user.email },
                }
            }),
        }
    }

    pub fn scan(table_name: &str) -> Self {
        Self {
            operation: "Scan".to_string(),
            params: json!({
                "TableName": table_name,
                "Select": "ALL_ATTRIBUTES",
            }),
        }
    }

    pub fn update_item(table_name: &str, user: &User) -> Self {
        Self {
            operation: "UpdateItem".to_string(),
            params: json!({
                "TableName": table_name,
                "Key": { "UserID": { "N": user.user_id.to_string() } },
                "UpdateExpression": UPDATE_EXPRESSION,
                "ExpressionAttributeValues": {
                    ":first_name": { "S": user.first_name },
                    ":email": { "S": user.email },
                }
            }),
        }
    }

    pub fn delete_item(table_name: &str, user_id: i64) -> Self {
        Self {
            operation: "DeleteItem".to_string(),
            params: json!({
                "TableName": table_name,
                "Key": { "UserID": { "N": user_id.to_string() } },
            }),
        }
    }

    pub fn pretty_params(&self) -> String {
        serde_json::to_string_pretty(&self.params).unwrap_or_else(|_| self.params.to_string())
    }
}

/// Holds the most recent [`QueryLog`] for the diagnostic panel.
#[derive(Debug, Default)]
pub struct LastQuery {
    inner: RwLock<Option<QueryLog>>,
}

impl LastQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, query: QueryLog) {
        log::debug!("🔎 {} {}", query.operation, query.params);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(query);
    }

    pub fn get(&self) -> Option<QueryLog> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
