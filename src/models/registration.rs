//! Registration model and status lifecycle
//!
//! A registration moves through a fixed set of states from signup to
//! check-in at the venue. All status comparisons in the application go
//! through [`RegistrationStatus`]; the database stores the lowercase
//! string form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AvishkarError;

/// Lifecycle states of an event registration.
///
/// Legal transitions:
/// - `Pending -> PaymentUploaded` (participant attaches payment proof)
/// - `PaymentUploaded -> PaymentUploaded` (re-upload before review)
/// - `Pending | PaymentUploaded -> Approved | Rejected` (organizer review;
///   approval straight from `Pending` covers free events)
/// - `Approved -> CheckedIn` (organizer scans the entry pass)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    PaymentUploaded,
    Approved,
    Rejected,
    CheckedIn,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::PaymentUploaded => "payment_uploaded",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
            RegistrationStatus::CheckedIn => "checked_in",
        }
    }

    /// Whether moving from `self` to `to` is a legal lifecycle step
    pub fn can_transition(&self, to: RegistrationStatus) -> bool {
        use RegistrationStatus::*;
        matches!(
            (self, to),
            (Pending, PaymentUploaded)
                | (PaymentUploaded, PaymentUploaded)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (PaymentUploaded, Approved)
                | (PaymentUploaded, Rejected)
                | (Approved, CheckedIn)
        )
    }

    /// Whether an entry pass may be issued or displayed in this state
    pub fn pass_issuable(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Approved | RegistrationStatus::CheckedIn
        )
    }

    /// Whether the participant may still cancel the registration
    pub fn cancellable(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Pending | RegistrationStatus::PaymentUploaded
        )
    }

    /// Build the error for an illegal transition attempt
    pub fn transition_error(&self, to: RegistrationStatus) -> AvishkarError {
        AvishkarError::InvalidStateTransition {
            from: self.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = AvishkarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "payment_uploaded" => Ok(RegistrationStatus::PaymentUploaded),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            "checked_in" => Ok(RegistrationStatus::CheckedIn),
            other => Err(AvishkarError::InvalidInput(format!(
                "Unknown registration status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub roll_no: Option<String>,
    pub department: Option<String>,
    pub team_members: Vec<String>,
    pub payment_screenshot_url: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Parse the stored status string into the typed lifecycle state
    pub fn status(&self) -> Result<RegistrationStatus, AvishkarError> {
        RegistrationStatus::from_str(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub roll_no: Option<String>,
    pub department: Option<String>,
    pub team_members: Vec<String>,
}

/// Review decision made by an organizer or admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> RegistrationStatus {
        match self {
            ReviewDecision::Approve => RegistrationStatus::Approved,
            ReviewDecision::Reject => RegistrationStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::PaymentUploaded,
            RegistrationStatus::Approved,
            RegistrationStatus::Rejected,
            RegistrationStatus::CheckedIn,
        ] {
            let parsed = RegistrationStatus::from_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        // "confirmed" and "paid" were folded into "approved"
        assert_matches!(
            RegistrationStatus::from_str("confirmed"),
            Err(AvishkarError::InvalidInput(_))
        );
        assert_matches!(
            RegistrationStatus::from_str("paid"),
            Err(AvishkarError::InvalidInput(_))
        );
    }

    #[test]
    fn test_legal_transitions() {
        use RegistrationStatus::*;
        assert!(Pending.can_transition(PaymentUploaded));
        assert!(PaymentUploaded.can_transition(PaymentUploaded));
        assert!(Pending.can_transition(Approved));
        assert!(Pending.can_transition(Rejected));
        assert!(PaymentUploaded.can_transition(Approved));
        assert!(PaymentUploaded.can_transition(Rejected));
        assert!(Approved.can_transition(CheckedIn));
    }

    #[test]
    fn test_illegal_transitions() {
        use RegistrationStatus::*;
        assert!(!Pending.can_transition(CheckedIn));
        assert!(!Rejected.can_transition(Approved));
        assert!(!Rejected.can_transition(CheckedIn));
        assert!(!CheckedIn.can_transition(Approved));
        assert!(!CheckedIn.can_transition(CheckedIn));
        assert!(!Approved.can_transition(Pending));
        assert!(!Approved.can_transition(PaymentUploaded));
    }

    #[test]
    fn test_pass_issuable() {
        use RegistrationStatus::*;
        assert!(Approved.pass_issuable());
        assert!(CheckedIn.pass_issuable());
        assert!(!Pending.pass_issuable());
        assert!(!PaymentUploaded.pass_issuable());
        assert!(!Rejected.pass_issuable());
    }

    #[test]
    fn test_cancellable() {
        use RegistrationStatus::*;
        assert!(Pending.cancellable());
        assert!(PaymentUploaded.cancellable());
        assert!(!Approved.cancellable());
        assert!(!CheckedIn.cancellable());
        assert!(!Rejected.cancellable());
    }

    #[test]
    fn test_transition_error_shape() {
        let err = RegistrationStatus::Rejected.transition_error(RegistrationStatus::CheckedIn);
        assert_matches!(
            err,
            AvishkarError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "rejected");
                assert_eq!(to, "checked_in");
            }
        );
    }

    #[test]
    fn test_review_decision_targets() {
        assert_eq!(
            ReviewDecision::Approve.target_status(),
            RegistrationStatus::Approved
        );
        assert_eq!(
            ReviewDecision::Reject.target_status(),
            RegistrationStatus::Rejected
        );
    }
}
