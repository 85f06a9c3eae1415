//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AvishkarError;

/// Admin approval states of an event listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = AvishkarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "rejected" => Ok(EventStatus::Rejected),
            "completed" => Ok(EventStatus::Completed),
            other => Err(AvishkarError::InvalidInput(format!(
                "Unknown event status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub price: i32,
    pub slots: Option<i32>,
    pub registered_count: i32,
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    pub winners: Vec<String>,
    pub assigned_to: Option<i64>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Parse the stored status string into the typed approval state
    pub fn status(&self) -> Result<EventStatus, AvishkarError> {
        EventStatus::from_str(&self.status)
    }

    /// Whether the event appears on the public surface at all
    pub fn publicly_visible(&self) -> bool {
        self.is_active && self.status == EventStatus::Approved.as_str()
    }

    /// Whether participants may currently register for this event
    pub fn accepts_registrations(&self) -> bool {
        self.publicly_visible()
    }

    pub fn is_free(&self) -> bool {
        self.price == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub price: i32,
    pub slots: Option<i32>,
    pub image_url: Option<String>,
    pub assigned_to: Option<i64>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub price: Option<i32>,
    pub slots: Option<i32>,
    pub image_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub winners: Option<Vec<String>>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(status: &str, is_active: bool) -> Event {
        Event {
            id: 1,
            title: "Robo Wars".to_string(),
            description: None,
            event_date: Utc::now(),
            venue: Some("Main Arena".to_string()),
            category: Some("robotics".to_string()),
            price: 200,
            slots: Some(64),
            registered_count: 0,
            image_url: None,
            gallery: vec![],
            winners: vec![],
            assigned_to: Some(5),
            organizer_name: None,
            organizer_contact: None,
            status: status.to_string(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_publicly_visible() {
        assert!(sample_event("approved", true).publicly_visible());
        // The approval queue and pulled listings stay hidden
        assert!(!sample_event("pending", true).publicly_visible());
        assert!(!sample_event("rejected", true).publicly_visible());
        assert!(!sample_event("approved", false).publicly_visible());
        assert!(!sample_event("completed", true).publicly_visible());
    }

    #[test]
    fn test_accepts_registrations() {
        assert!(sample_event("approved", true).accepts_registrations());
        assert!(!sample_event("approved", false).accepts_registrations());
        assert!(!sample_event("pending", true).accepts_registrations());
        assert!(!sample_event("rejected", true).accepts_registrations());
        assert!(!sample_event("completed", true).accepts_registrations());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            EventStatus::Pending,
            EventStatus::Approved,
            EventStatus::Rejected,
            EventStatus::Completed,
        ] {
            assert_eq!(EventStatus::from_str(status.as_str()).unwrap(), status);
        }
    }
}
