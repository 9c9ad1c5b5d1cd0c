// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! API contract types for users and the admin profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Account status of a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
    Disabled,
}

impl UserStatus {
    /// Status reached by the enable/disable toggle
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Disabled,
            UserStatus::Pending | UserStatus::Disabled => UserStatus::Active,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Active => write!(f, "active"),
            UserStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            "disabled" => Ok(UserStatus::Disabled),
            _ => Err(format!(
                "Invalid user status: {}. Use 'pending', 'active' or 'disabled'",
                s
            )),
        }
    }
}

/// Platform user as listed by the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub current_level: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(deserialize_with = "number_or_string")]
    pub balance: f64,
    pub status: UserStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Balances occasionally arrive as decimal strings
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Balance {
        Number(f64),
        Text(String),
    }

    match Balance::deserialize(deserializer)? {
        Balance::Number(n) => Ok(n),
        Balance::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// One page of the user listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Status change for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

/// Credit added to a user's balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddBalanceRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

/// The signed-in admin's profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Profile update body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

/// Password change body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserialization() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "username": "alice",
            "email": "alice@example.com",
            "current_level": "gold",
            "is_verified": true,
            "balance": "12.5",
            "status": "pending",
            "createdAt": "2025-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.balance, 12.5);
        assert_eq!(user.status, UserStatus::Pending);
    }

    #[test]
    fn test_user_page_uses_camel_case() {
        let page: UserPage = serde_json::from_value(json!({
            "users": [],
            "totalPages": 4,
            "currentPage": 2
        }))
        .unwrap();
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Disabled);
        assert_eq!(UserStatus::Disabled.toggled(), UserStatus::Active);
        assert_eq!(UserStatus::Pending.toggled(), UserStatus::Active);
        assert_eq!("Disabled".parse::<UserStatus>(), Ok(UserStatus::Disabled));
        assert!("banned".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_change_password_wire_names() {
        let request = ChangePasswordRequest {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "currentPassword": "old", "newPassword": "new" })
        );
    }
}
