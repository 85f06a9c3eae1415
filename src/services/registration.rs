//! Registration lifecycle service
//!
//! This service owns the registration state machine: signup with slot
//! accounting, payment proof attachment, organizer review, participant
//! cancellation, entry-pass issuance and the scan-time verification
//! handshake that marks attendance.

use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::event::Event;
use crate::models::fest::FestSettings;
use crate::models::pass::PassPayload;
use crate::models::registration::{
    CreateRegistrationRequest, Registration, RegistrationStatus, ReviewDecision,
};
use crate::services::auth::{AuthContext, AuthService};
use crate::services::event::PUBLIC_EVENTS_CACHE_KEY;
use crate::services::redis::RedisService;
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::helpers;
use crate::utils::logging;

/// Participant-facing signup input; the user id comes from the auth context
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub roll_no: Option<String>,
    pub department: Option<String>,
    pub team_members: Vec<String>,
}

/// Outcome of a successful entry-pass scan
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanResult {
    pub registration: Registration,
    pub participant_name: String,
    pub event_id: i64,
}

fn ensure_registrations_open(settings: &FestSettings) -> Result<()> {
    if !settings.registrations_open {
        return Err(AvishkarError::RegistrationsClosed);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    auth: AuthService,
    redis: RedisService,
}

impl RegistrationService {
    pub fn new(db: DatabaseService, auth: AuthService, redis: RedisService) -> Self {
        Self { db, auth, redis }
    }

    /// Create a registration for the authenticated participant.
    ///
    /// Refused when fest registrations are closed, when the event is not
    /// approved/active, or when the participant is already registered.
    /// Capacity is enforced by the repository inside a transaction.
    pub async fn register(
        &self,
        context: &AuthContext,
        input: SignupInput,
    ) -> Result<Registration> {
        let settings = self.db.fest.get_settings().await?;
        ensure_registrations_open(&settings)?;

        let event = self.require_event(input.event_id).await?;
        if !event.accepts_registrations() {
            return Err(AvishkarError::InvalidInput(
                "event is not open for registrations".to_string(),
            ));
        }

        if !helpers::is_valid_email(&input.email) {
            return Err(AvishkarError::InvalidInput("invalid email".to_string()));
        }
        if !helpers::is_valid_mobile(&input.mobile) {
            return Err(AvishkarError::InvalidInput(
                "invalid mobile number".to_string(),
            ));
        }
        if input.name.trim().is_empty() || input.college.trim().is_empty() {
            return Err(AvishkarError::InvalidInput(
                "name and college are required".to_string(),
            ));
        }

        let registration = self
            .db
            .registrations
            .create(CreateRegistrationRequest {
                user_id: context.user_id,
                event_id: input.event_id,
                name: helpers::normalize_whitespace(&input.name),
                email: input.email,
                mobile: input.mobile,
                college: input.college,
                roll_no: input.roll_no,
                department: input.department,
                team_members: input.team_members,
            })
            .await?;

        self.invalidate_event_cache().await;

        info!(
            registration_id = registration.id,
            user_id = context.user_id,
            event_id = input.event_id,
            "Registration created"
        );
        Ok(registration)
    }

    /// Attach payment proof. Legal from `Pending` or `PaymentUploaded`
    /// (re-upload before review), owner only.
    pub async fn attach_payment(
        &self,
        context: &AuthContext,
        registration_id: i64,
        screenshot_url: String,
    ) -> Result<Registration> {
        let registration = self.require_owned(context, registration_id).await?;

        let status = registration.status()?;
        if !status.can_transition(RegistrationStatus::PaymentUploaded) {
            return Err(status.transition_error(RegistrationStatus::PaymentUploaded));
        }

        // The repository refuses to touch reviewed rows, so a review
        // landing between the read above and this update surfaces here.
        let updated = self
            .db
            .registrations
            .set_payment_screenshot(registration_id, &screenshot_url)
            .await?
            .ok_or_else(|| {
                AvishkarError::InvalidInput(
                    "registration was reviewed and can no longer accept payment proof".to_string(),
                )
            })?;

        info!(
            registration_id = registration_id,
            user_id = context.user_id,
            "Payment proof attached"
        );
        Ok(updated)
    }

    /// Organizer/admin review: approve or reject. Approval straight from
    /// `Pending` is only allowed for free events; paid events need proof.
    pub async fn review(
        &self,
        context: &AuthContext,
        registration_id: i64,
        decision: ReviewDecision,
    ) -> Result<Registration> {
        let registration = self.require_registration(registration_id).await?;
        let event = self.require_event(registration.event_id).await?;
        self.auth.require_event_access(context, &event)?;

        let status = registration.status()?;
        let target = decision.target_status();

        if !status.can_transition(target) {
            return Err(status.transition_error(target));
        }

        if decision == ReviewDecision::Approve
            && status == RegistrationStatus::Pending
            && !event.is_free()
        {
            return Err(AvishkarError::InvalidInput(
                "payment proof required before approval".to_string(),
            ));
        }

        let updated = self
            .db
            .registrations
            .set_review(registration_id, target, context.user_id)
            .await?;

        logging::log_registration_action(
            registration_id,
            context.user_id,
            target.as_str(),
            None,
        );
        Ok(updated)
    }

    /// Participant cancels their own registration; only before review
    pub async fn cancel(&self, context: &AuthContext, registration_id: i64) -> Result<()> {
        let registration = self.require_owned(context, registration_id).await?;

        let status = registration.status()?;
        if !status.cancellable() {
            return Err(AvishkarError::InvalidInput(format!(
                "registration cannot be cancelled in status {}",
                status
            )));
        }

        let deleted = self.db.registrations.delete(registration_id).await?;
        if !deleted {
            return Err(AvishkarError::InvalidInput(
                "registration was reviewed and can no longer be cancelled".to_string(),
            ));
        }

        self.invalidate_event_cache().await;

        info!(
            registration_id = registration_id,
            user_id = context.user_id,
            "Registration cancelled"
        );
        Ok(())
    }

    /// Issue the entry-pass payload string for an approved registration.
    /// Owner, the event's organizer and admins may fetch it.
    pub async fn issue_pass(&self, context: &AuthContext, registration_id: i64) -> Result<String> {
        let registration = self.require_registration(registration_id).await?;

        if registration.user_id != context.user_id {
            let event = self.require_event(registration.event_id).await?;
            self.auth.require_event_access(context, &event)?;
        }

        let status = registration.status()?;
        if !status.pass_issuable() {
            return Err(AvishkarError::InvalidInput(format!(
                "no entry pass in status {}",
                status
            )));
        }

        PassPayload::for_registration(&registration).encode()
    }

    /// List the authenticated participant's registrations with pass
    /// payloads where issuable
    pub async fn list_mine(
        &self,
        context: &AuthContext,
    ) -> Result<Vec<(Registration, Option<String>)>> {
        let registrations = self.db.registrations.list_for_user(context.user_id).await?;

        let mut out = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let pass = match registration.status() {
                Ok(status) if status.pass_issuable() => {
                    Some(PassPayload::for_registration(&registration).encode()?)
                }
                _ => None,
            };
            out.push((registration, pass));
        }

        Ok(out)
    }

    /// Organizer/admin listing of an event's registrations
    pub async fn list_for_event(
        &self,
        context: &AuthContext,
        event_id: i64,
    ) -> Result<Vec<Registration>> {
        let event = self.require_event(event_id).await?;
        self.auth.require_event_access(context, &event)?;

        self.db.registrations.list_for_event(event_id).await
    }

    /// Verify a scanned entry pass and mark attendance.
    ///
    /// The raw QR string is decoded, checked against the stored
    /// registration row, and the `Approved -> CheckedIn` transition is
    /// applied. A pass scanned twice surfaces `AlreadyCheckedIn`.
    pub async fn mark_attendance(
        &self,
        context: &AuthContext,
        raw_payload: &str,
    ) -> Result<ScanResult> {
        let payload = PassPayload::decode(raw_payload)?;
        debug!(
            registration_id = payload.registration_id,
            organizer_id = context.user_id,
            "Entry pass scanned"
        );

        let registration = self
            .db
            .registrations
            .find_by_id(payload.registration_id)
            .await?
            .ok_or(AvishkarError::RegistrationNotFound {
                registration_id: payload.registration_id,
            })?;

        if !payload.matches(&registration) {
            warn!(
                registration_id = payload.registration_id,
                organizer_id = context.user_id,
                "Pass payload does not match registration row"
            );
            return Err(AvishkarError::PassVerification(
                "pass does not match registration".to_string(),
            ));
        }

        let event = self.require_event(registration.event_id).await?;
        self.auth.require_event_access(context, &event)?;

        match registration.status()? {
            RegistrationStatus::CheckedIn => {
                logging::log_scan_result(
                    registration.id,
                    context.user_id,
                    false,
                    Some("already checked in"),
                );
                return Err(AvishkarError::AlreadyCheckedIn {
                    registration_id: registration.id,
                });
            }
            RegistrationStatus::Approved => {}
            other => {
                logging::log_scan_result(
                    registration.id,
                    context.user_id,
                    false,
                    Some("not approved"),
                );
                return Err(other.transition_error(RegistrationStatus::CheckedIn));
            }
        }

        // The guarded UPDATE re-checks the status, so a concurrent scan of
        // the same pass loses here rather than double-admitting.
        let checked_in = self
            .db
            .registrations
            .check_in(registration.id)
            .await?
            .ok_or(AvishkarError::AlreadyCheckedIn {
                registration_id: registration.id,
            })?;

        logging::log_scan_result(checked_in.id, context.user_id, true, None);

        Ok(ScanResult {
            participant_name: checked_in.name.clone(),
            event_id: event.id,
            registration: checked_in,
        })
    }

    async fn require_registration(&self, registration_id: i64) -> Result<Registration> {
        self.db
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(AvishkarError::RegistrationNotFound { registration_id })
    }

    async fn require_owned(
        &self,
        context: &AuthContext,
        registration_id: i64,
    ) -> Result<Registration> {
        let registration = self.require_registration(registration_id).await?;

        if registration.user_id != context.user_id {
            return Err(AvishkarError::PermissionDenied(format!(
                "registration {} belongs to another user",
                registration_id
            )));
        }

        Ok(registration)
    }

    async fn require_event(&self, event_id: i64) -> Result<Event> {
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AvishkarError::EventNotFound { event_id })
    }

    /// Signup and cancellation change an event's registered count, which
    /// the cached public listing carries. A Redis outage only means the
    /// listing goes stale until its TTL.
    async fn invalidate_event_cache(&self) {
        if let Err(e) = self.redis.delete(PUBLIC_EVENTS_CACHE_KEY).await {
            debug!(error = %e, "Failed to invalidate event cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn fest_settings(registrations_open: bool) -> FestSettings {
        FestSettings {
            id: 1,
            fest_name: "Avishkar".to_string(),
            edition: "2026".to_string(),
            registrations_open,
            payment_upi_id: None,
            support_email: None,
            support_phone: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_closed_fest_refuses_signup() {
        assert_matches!(
            ensure_registrations_open(&fest_settings(false)),
            Err(AvishkarError::RegistrationsClosed)
        );
    }

    #[test]
    fn test_open_fest_admits_signup() {
        assert!(ensure_registrations_open(&fest_settings(true)).is_ok());
    }

    #[tokio::test]
    async fn test_cache_invalidation_tolerates_redis_outage() {
        let mut settings = Settings::default();
        settings.redis.url = "redis://127.0.0.1:1".to_string();

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&settings.database.url)
            .unwrap();
        let service = RegistrationService::new(
            DatabaseService::new(pool),
            AuthService::new(settings.clone()),
            RedisService::new(settings).unwrap(),
        );

        // Nothing listening on the Redis port; the call must not fail
        service.invalidate_event_cache().await;
    }
}
