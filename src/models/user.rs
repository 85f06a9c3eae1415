//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AvishkarError;

/// Application roles, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Participant,
    Organizer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Participant => "participant",
            UserRole::Organizer => "organizer",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AvishkarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "participant" => Ok(UserRole::Participant),
            "organizer" => Ok(UserRole::Organizer),
            "admin" => Ok(UserRole::Admin),
            other => Err(AvishkarError::InvalidInput(format!(
                "Unknown role: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub firebase_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub mobile: Option<String>,
    pub role: String,
    pub organizer_request: bool,
    pub fcm_tokens: Vec<String>,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Parse the stored role string into the typed role
    pub fn role(&self) -> Result<UserRole, AvishkarError> {
        UserRole::from_str(&self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub firebase_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub mobile: Option<String>,
    pub organizer_request: Option<bool>,
    pub is_banned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Participant, UserRole::Organizer, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::Participant < UserRole::Organizer);
        assert!(UserRole::Organizer < UserRole::Admin);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(UserRole::from_str("superuser").is_err());
    }
}
