//! End-to-end checks of the registration state machine and entry-pass
//! verification, exercised through the public library API.

use chrono::Utc;

use avishkar::models::event::Event;
use avishkar::models::pass::PassPayload;
use avishkar::models::registration::{Registration, RegistrationStatus, ReviewDecision};

fn registration(status: &str) -> Registration {
    Registration {
        id: 42,
        user_id: 7,
        event_id: 3,
        name: "Asha Rao".to_string(),
        email: "asha@college.edu".to_string(),
        mobile: "+919876543210".to_string(),
        college: "NIT".to_string(),
        roll_no: Some("CS21B042".to_string()),
        department: Some("CSE".to_string()),
        team_members: vec![],
        payment_screenshot_url: None,
        status: status.to_string(),
        reviewed_by: None,
        checked_in_at: None,
        registered_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn event(price: i32) -> Event {
    Event {
        id: 3,
        title: "Robo Wars".to_string(),
        description: None,
        event_date: Utc::now(),
        venue: Some("Main Arena".to_string()),
        category: Some("robotics".to_string()),
        price,
        slots: Some(64),
        registered_count: 10,
        image_url: None,
        gallery: vec![],
        winners: vec![],
        assigned_to: Some(5),
        organizer_name: None,
        organizer_contact: None,
        status: "approved".to_string(),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn paid_registration_walks_the_full_lifecycle() {
    let mut status = RegistrationStatus::Pending;

    for next in [
        RegistrationStatus::PaymentUploaded,
        RegistrationStatus::Approved,
        RegistrationStatus::CheckedIn,
    ] {
        assert!(status.can_transition(next), "{} -> {} must be legal", status, next);
        status = next;
    }

    // Terminal: nothing moves out of checked_in
    for target in [
        RegistrationStatus::Pending,
        RegistrationStatus::PaymentUploaded,
        RegistrationStatus::Approved,
        RegistrationStatus::Rejected,
    ] {
        assert!(!status.can_transition(target));
    }
}

#[test]
fn free_event_skips_payment() {
    assert!(event(0).is_free());
    assert!(RegistrationStatus::Pending.can_transition(RegistrationStatus::Approved));
}

#[test]
fn rejection_does_not_wait_for_payment_proof() {
    // A paid-event signup that never uploads proof can still be cleared
    assert!(!event(200).is_free());
    assert!(RegistrationStatus::Pending.can_transition(RegistrationStatus::Rejected));
    assert!(RegistrationStatus::PaymentUploaded.can_transition(RegistrationStatus::Rejected));
}

#[test]
fn rejection_is_terminal_for_check_in() {
    let status = RegistrationStatus::Rejected;
    assert!(!status.can_transition(RegistrationStatus::CheckedIn));
    assert!(!status.pass_issuable());
}

#[test]
fn cancellation_window_closes_at_review() {
    assert!(RegistrationStatus::Pending.cancellable());
    assert!(RegistrationStatus::PaymentUploaded.cancellable());
    assert!(!RegistrationStatus::Approved.cancellable());
    assert!(!RegistrationStatus::Rejected.cancellable());
    assert!(!RegistrationStatus::CheckedIn.cancellable());
}

#[test]
fn pass_only_exists_after_approval() {
    assert!(!RegistrationStatus::Pending.pass_issuable());
    assert!(!RegistrationStatus::PaymentUploaded.pass_issuable());
    assert!(RegistrationStatus::Approved.pass_issuable());
    assert!(RegistrationStatus::CheckedIn.pass_issuable());
}

#[test]
fn scanned_pass_matches_its_registration() {
    let reg = registration("approved");
    let encoded = PassPayload::for_registration(&reg).encode().unwrap();

    let decoded = PassPayload::decode(&encoded).unwrap();
    assert!(decoded.matches(&reg));
    assert_eq!(decoded.registration_id, 42);
    assert_eq!(decoded.event_id, 3);
}

#[test]
fn forged_pass_is_detected_against_the_row() {
    let reg = registration("approved");
    let mut payload = PassPayload::for_registration(&reg);
    payload.user_id = 999;

    assert!(!payload.matches(&reg));
}

#[test]
fn garbage_scan_input_is_rejected() {
    assert!(PassPayload::decode("not json").is_err());
    assert!(PassPayload::decode("").is_err());
    assert!(PassPayload::decode("{\"registration_id\": \"nope\"}").is_err());
}

#[test]
fn review_decisions_map_to_statuses() {
    assert_eq!(
        ReviewDecision::Approve.target_status(),
        RegistrationStatus::Approved
    );
    assert_eq!(
        ReviewDecision::Reject.target_status(),
        RegistrationStatus::Rejected
    );
}

#[test]
fn legacy_status_spellings_are_not_accepted() {
    use std::str::FromStr;

    // Older clients used several spellings for the approved state; the
    // backend stores exactly one.
    for legacy in ["confirmed", "paid", "Approved", "APPROVED"] {
        assert!(RegistrationStatus::from_str(legacy).is_err(), "{}", legacy);
    }
}
