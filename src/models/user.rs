use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

use crate::utils::AppError;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const ENTER_USER_ID: &str = "Please enter a User ID";
pub const USER_ID_NOT_INTEGER: &str = "User ID must be an integer";
pub const USER_ID_OUT_OF_RANGE: &str = "User ID is out of range";

/// Item stored in the `Users` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

impl User {
    pub fn new(user_id: i64, first_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            email: email.into(),
        }
    }
}

/// Raw text submitted by the Add/Update forms (or the JSON API).
#[derive(Debug, Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct UserForm {
    /// JSON clients may send a number here; forms always send text.
    #[serde(default, deserialize_with = "deserialize_user_id")]
    #[schema(value_type = String, example = "1")]
    pub user_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
}

impl UserForm {
    /// All three fields are required; `user_id` must parse as an integer.
    pub fn validate(&self) -> Result<User, AppError> {
        let user_id = self.user_id.trim();
        let first_name = self.first_name.trim();
        let email = self.email.trim();

        if user_id.is_empty() || first_name.is_empty() || email.is_empty() {
            return Err(AppError::validation(FILL_ALL_FIELDS));
        }

        Ok(User::new(parse_user_id(user_id)?, first_name, email))
    }
}

/// Body of the JSON update call; the key comes from the path.
#[derive(Debug, Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
}

/// Raw text submitted by the Delete form.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DeleteForm {
    #[serde(default)]
    pub user_id: String,
}

impl DeleteForm {
    pub fn validate(&self) -> Result<i64, AppError> {
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::validation(ENTER_USER_ID));
        }
        parse_user_id(user_id)
    }
}

pub fn parse_user_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            AppError::validation(USER_ID_OUT_OF_RANGE)
        }
        _ => AppError::validation(USER_ID_NOT_INTEGER),
    })
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        _ => Err(serde::de::Error::custom("user_id must be a string or a number")),
    }
}
