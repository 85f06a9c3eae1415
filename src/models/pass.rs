//! Entry-pass payload
//!
//! The payload is the JSON string that participant clients render as a QR
//! code and organizers scan at the door. It deliberately carries no
//! signature or checksum; trust comes from the server-side lookup against
//! the registration row plus the organizer-only scan endpoint.

use serde::{Deserialize, Serialize};

use crate::models::registration::Registration;
use crate::utils::errors::{AvishkarError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassPayload {
    pub registration_id: i64,
    pub user_id: i64,
    pub event_id: i64,
}

impl PassPayload {
    pub fn for_registration(registration: &Registration) -> Self {
        Self {
            registration_id: registration.id,
            user_id: registration.user_id,
            event_id: registration.event_id,
        }
    }

    /// Serialize into the QR string handed to clients
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a scanned QR string
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw.trim())
            .map_err(|e| AvishkarError::PassVerification(format!("unreadable pass payload: {}", e)))
    }

    /// Check the decoded payload against the registration row it claims
    /// to reference. A mismatch means a tampered or stale payload.
    pub fn matches(&self, registration: &Registration) -> bool {
        self.registration_id == registration.id
            && self.user_id == registration.user_id
            && self.event_id == registration.event_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn sample_registration() -> Registration {
        Registration {
            id: 42,
            user_id: 7,
            event_id: 3,
            name: "Asha Rao".to_string(),
            email: "asha@college.edu".to_string(),
            mobile: "9876543210".to_string(),
            college: "MNNIT".to_string(),
            roll_no: Some("2023CS042".to_string()),
            department: Some("CSE".to_string()),
            team_members: vec![],
            payment_screenshot_url: None,
            status: "approved".to_string(),
            reviewed_by: Some(1),
            checked_in_at: None,
            registered_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let registration = sample_registration();
        let payload = PassPayload::for_registration(&registration);
        let raw = payload.encode().unwrap();
        let decoded = PassPayload::decode(&raw).unwrap();
        assert_eq!(decoded, payload);
        assert!(decoded.matches(&registration));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_matches!(
            PassPayload::decode("not json at all"),
            Err(AvishkarError::PassVerification(_))
        );
        assert_matches!(
            PassPayload::decode("{\"registration_id\": \"nope\"}"),
            Err(AvishkarError::PassVerification(_))
        );
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let raw = "  {\"registration_id\":42,\"user_id\":7,\"event_id\":3}\n";
        let decoded = PassPayload::decode(raw).unwrap();
        assert_eq!(decoded.registration_id, 42);
    }

    #[test]
    fn test_mismatch_detected() {
        let registration = sample_registration();
        let mut payload = PassPayload::for_registration(&registration);
        payload.user_id = 999;
        assert!(!payload.matches(&registration));

        let mut payload = PassPayload::for_registration(&registration);
        payload.event_id = 999;
        assert!(!payload.matches(&registration));
    }
}
