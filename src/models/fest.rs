//! Fest-wide settings and contact messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Singleton row of fest-wide toggles and display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FestSettings {
    pub id: i64,
    pub fest_name: String,
    pub edition: String,
    pub registrations_open: bool,
    pub payment_upi_id: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFestSettingsRequest {
    pub fest_name: Option<String>,
    pub edition: Option<String>,
    pub registrations_open: Option<bool>,
    pub payment_upi_id: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactMessageRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}
