use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

use super::{ScanPage, UserTable};
use crate::config::AppConfig;
use crate::models::{User, UPDATE_EXPRESSION};
use crate::utils::AppError;

const ATTR_USER_ID: &str = "UserID";
const ATTR_FIRST_NAME: &str = "FirstName";
const ATTR_EMAIL: &str = "Email";

/// DynamoDB connection. Hands out table handles.
#[derive(Clone)]
pub struct DynamoDB {
    client: Client,
    region: String,
}

impl DynamoDB {
    /// Credentials are not checked here; a bad pair only shows up on the
    /// first request.
    pub async fn new(config: &AppConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "user-admin-panel-env",
            ));
        }

        if let Some(endpoint) = &config.endpoint_url {
            log::info!("🔧 DynamoDB endpoint override: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            region: config.region.clone(),
        }
    }

    pub fn table(&self, name: &str) -> DynamoTable {
        DynamoTable {
            client: self.client.clone(),
            table_name: name.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

pub struct DynamoTable {
    client: Client,
    table_name: String,
}

fn key_of(user_id: i64) -> AttributeValue {
    AttributeValue::N(user_id.to_string())
}

pub(crate) fn to_item(user: &User) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(ATTR_USER_ID.to_string(), key_of(user.user_id));
    item.insert(ATTR_FIRST_NAME.to_string(), AttributeValue::S(user.first_name.clone()));
    item.insert(ATTR_EMAIL.to_string(), AttributeValue::S(user.email.clone()));
    item
}

pub(crate) fn from_item(item: &HashMap<String, AttributeValue>) -> Result<User, AppError> {
    let user_id = match item.get(ATTR_USER_ID) {
        Some(AttributeValue::N(n)) => n
            .parse::<i64>()
            .map_err(|e| AppError::remote(format!("Invalid {} attribute '{}': {}", ATTR_USER_ID, n, e)))?,
        _ => return Err(AppError::remote(format!("Missing or invalid {} attribute", ATTR_USER_ID))),
    };

    let string_attr = |name: &str| match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        _ => Err(AppError::remote(format!(
            "Missing or invalid {} attribute on user {}",
            name, user_id
        ))),
    };

    Ok(User {
        user_id,
        first_name: string_attr(ATTR_FIRST_NAME)?,
        email: string_attr(ATTR_EMAIL)?,
    })
}

/// Keeps every readable item; the table is schemaless so a foreign writer
/// may have left rows without our attributes.
pub(crate) fn users_from_items(items: &[HashMap<String, AttributeValue>]) -> (Vec<User>, usize) {
    let mut users = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        match from_item(item) {
            Ok(user) => users.push(user),
            Err(e) => {
                log::warn!("⚠️  Skipping unreadable item: {}", e);
                skipped += 1;
            }
        }
    }

    (users, skipped)
}

#[async_trait]
impl UserTable for DynamoTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn put_item(&self, user: &User) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(user)))
            .send()
            .await
            .map_err(AppError::from_sdk)?;
        Ok(())
    }

    async fn scan(&self) -> Result<ScanPage, AppError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .select(Select::AllAttributes)
            .send()
            .await
            .map_err(AppError::from_sdk)?;

        let (items, skipped) = users_from_items(output.items());

        let truncated = output
            .last_evaluated_key()
            .map_or(false, |key| !key.is_empty());

        Ok(ScanPage {
            items,
            truncated,
            skipped,
        })
    }

    async fn update_item(&self, user: &User) -> Result<(), AppError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_USER_ID, key_of(user.user_id))
            .update_expression(UPDATE_EXPRESSION)
            .expression_attribute_values(":first_name", AttributeValue::S(user.first_name.clone()))
            .expression_attribute_values(":email", AttributeValue::S(user.email.clone()))
            .send()
            .await
            .map_err(AppError::from_sdk)?;
        Ok(())
    }

    async fn delete_item(&self, user_id: i64) -> Result<(), AppError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_USER_ID, key_of(user_id))
            .send()
            .await
            .map_err(AppError::from_sdk)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_attributes() {
        let item = to_item(&User::new(7, "Alice", "a@x.com"));

        assert_eq!(item.get("UserID"), Some(&AttributeValue::N("7".into())));
        assert_eq!(item.get("FirstName"), Some(&AttributeValue::S("Alice".into())));
        assert_eq!(item.get("Email"), Some(&AttributeValue::S("a@x.com".into())));
        assert_eq!(from_item(&item).unwrap(), User::new(7, "Alice", "a@x.com"));
    }

    #[test]
    fn test_missing_attribute_is_remote_error() {
        let mut item = to_item(&User::new(7, "Alice", "a@x.com"));
        item.remove("Email");

        let err = from_item(&item).unwrap_err();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("Email"));
    }

    #[test]
    fn test_string_user_id_is_rejected() {
        let mut item = to_item(&User::new(7, "Alice", "a@x.com"));
        item.insert("UserID".into(), AttributeValue::S("7".into()));

        assert!(from_item(&item).is_err());
    }

    #[test]
    fn test_scan_keeps_good_rows_next_to_bad_ones() {
        let good = to_item(&User::new(1, "Alice", "a@x.com"));

        let mut no_email = to_item(&User::new(2, "Bob", "b@x.com"));
        no_email.remove("Email");

        let mut too_wide = to_item(&User::new(3, "Carol", "c@x.com"));
        too_wide.insert("UserID".into(), AttributeValue::N("99999999999999999999".into()));

        let also_good = to_item(&User::new(4, "Dan", "d@x.com"));

        let (users, skipped) = users_from_items(&[good, no_email, too_wide, also_good]);
        assert_eq!(users, vec![User::new(1, "Alice", "a@x.com"), User::new(4, "Dan", "d@x.com")]);
        assert_eq!(skipped, 2);
    }

    #[tokio::test]
    #[ignore] // Requires DynamoDB Local on :8000 with a `Users` table
    async fn test_dynamodb_local_round_trip() {
        dotenv::dotenv().ok();

        let config = AppConfig::from_lookup(|key| match key {
            "DYNAMODB_ENDPOINT" => Some("http://localhost:8000".into()),
            "AWS_ACCESS_KEY_ID" => Some("local".into()),
            "AWS_SECRET_ACCESS_KEY" => Some("local".into()),
            _ => None,
        })
        .unwrap();
        let table = DynamoDB::new(&config).await.table(crate::database::USERS_TABLE);

        table.put_item(&User::new(9001, "Alice", "a@x.com")).await.unwrap();
        let page = table.scan().await.unwrap();
        assert!(page.items.contains(&User::new(9001, "Alice", "a@x.com")));

        table.delete_item(9001).await.unwrap();
        let page = table.scan().await.unwrap();
        assert!(page.items.iter().all(|u| u.user_id != 9001));
    }
}
