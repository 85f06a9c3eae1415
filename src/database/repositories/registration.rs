//! Registration repository implementation
//!
//! Slot accounting happens here: creation and cancellation run inside a
//! transaction that locks the event row, so two concurrent registrants
//! cannot both take the last slot.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::registration::{CreateRegistrationRequest, Registration, RegistrationStatus};
use crate::utils::errors::AvishkarError;

const REGISTRATION_COLUMNS: &str = "id, user_id, event_id, name, email, mobile, college, roll_no, department, team_members, payment_screenshot_url, status, reviewed_by, checked_in_at, registered_at, updated_at";

// Statuses a participant may still act on; mirrors
// RegistrationStatus::cancellable so reviewed rows cannot be touched
// even when a review lands between the service's read and the update.
const UNREVIEWED_PREDICATE: &str = "status IN ('pending', 'payment_uploaded')";

fn ensure_capacity(
    event_id: i64,
    slots: Option<i32>,
    registered_count: i32,
) -> Result<(), AvishkarError> {
    if let Some(slots) = slots {
        if registered_count >= slots {
            return Err(AvishkarError::EventFull { event_id });
        }
    }
    Ok(())
}

fn ensure_not_registered(event_id: i64, existing: i64) -> Result<(), AvishkarError> {
    if existing > 0 {
        return Err(AvishkarError::AlreadyRegistered { event_id });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a registration, checking capacity and bumping the event's
    /// registered count in one transaction with the event row locked.
    pub async fn create(
        &self,
        request: CreateRegistrationRequest,
    ) -> Result<Registration, AvishkarError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Option<i32>, i32)> = sqlx::query_as(
            "SELECT slots, registered_count FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(request.event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (slots, registered_count) = row.ok_or(AvishkarError::EventNotFound {
            event_id: request.event_id,
        })?;

        ensure_capacity(request.event_id, slots, registered_count)?;

        let duplicate: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(request.event_id)
        .bind(request.user_id)
        .fetch_one(&mut *tx)
        .await?;

        ensure_not_registered(request.event_id, duplicate.0)?;

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (user_id, event_id, name, email, mobile, college, roll_no, department, team_members, status, registered_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $10)
            RETURNING id, user_id, event_id, name, email, mobile, college, roll_no, department, team_members, payment_screenshot_url, status, reviewed_by, checked_in_at, registered_at, updated_at
            "#,
        )
        .bind(request.user_id)
        .bind(request.event_id)
        .bind(request.name)
        .bind(request.email)
        .bind(request.mobile)
        .bind(request.college)
        .bind(request.roll_no)
        .bind(request.department)
        .bind(request.team_members)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE events SET registered_count = registered_count + 1, updated_at = $2 WHERE id = $1")
            .bind(request.event_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(registration)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, AvishkarError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM registrations WHERE id = $1",
            REGISTRATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// List a participant's registrations
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Registration>, AvishkarError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM registrations WHERE user_id = $1 ORDER BY registered_at DESC",
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// List registrations for an event (organizer review table)
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Registration>, AvishkarError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM registrations WHERE event_id = $1 ORDER BY registered_at ASC",
            REGISTRATION_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Attach or replace the payment screenshot URL. The status predicate
    /// makes this a no-op once the row has been reviewed, so a concurrent
    /// approval cannot be overwritten back to payment_uploaded.
    pub async fn set_payment_screenshot(
        &self,
        id: i64,
        url: &str,
    ) -> Result<Option<Registration>, AvishkarError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET payment_screenshot_url = $2, status = $3, updated_at = $4
            WHERE id = $1 AND {}
            RETURNING {}
            "#,
            UNREVIEWED_PREDICATE, REGISTRATION_COLUMNS
        ))
        .bind(id)
        .bind(url)
        .bind(RegistrationStatus::PaymentUploaded.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Record the review decision
    pub async fn set_review(
        &self,
        id: i64,
        status: RegistrationStatus,
        reviewer_id: i64,
    ) -> Result<Registration, AvishkarError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2, reviewed_by = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, user_id, event_id, name, email, mobile, college, roll_no, department, team_members, payment_screenshot_url, status, reviewed_by, checked_in_at, registered_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(reviewer_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Mark attendance. The status predicate makes the update a no-op when
    /// the registration is not currently approved, so a replayed scan
    /// cannot check in twice.
    pub async fn check_in(&self, id: i64) -> Result<Option<Registration>, AvishkarError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = 'checked_in', checked_in_at = $2, updated_at = $2
            WHERE id = $1 AND status = 'approved'
            RETURNING id, user_id, event_id, name, email, mobile, college, roll_no, department, team_members, payment_screenshot_url, status, reviewed_by, checked_in_at, registered_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Delete an unreviewed registration and release its slot in one
    /// transaction. Returns false when no row matched, which covers both a
    /// missing row and one a concurrent review already moved on.
    pub async fn delete(&self, id: i64) -> Result<bool, AvishkarError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64,)> = sqlx::query_as(&format!(
            "DELETE FROM registrations WHERE id = $1 AND {} RETURNING event_id",
            UNREVIEWED_PREDICATE
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some((event_id,)) = row {
            sqlx::query(
                "UPDATE events SET registered_count = GREATEST(registered_count - 1, 0), updated_at = $2 WHERE id = $1",
            )
            .bind(event_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.is_some())
    }

    /// Count registrations for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, AvishkarError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count total registrations
    pub async fn count(&self) -> Result<i64, AvishkarError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_full_event_refuses_signup() {
        assert_matches!(
            ensure_capacity(7, Some(64), 64),
            Err(AvishkarError::EventFull { event_id: 7 })
        );
        assert_matches!(
            ensure_capacity(7, Some(64), 70),
            Err(AvishkarError::EventFull { event_id: 7 })
        );
    }

    #[test]
    fn test_last_slot_still_admits() {
        assert!(ensure_capacity(7, Some(64), 63).is_ok());
    }

    #[test]
    fn test_unlimited_event_never_fills() {
        assert!(ensure_capacity(7, None, 100_000).is_ok());
    }

    #[test]
    fn test_duplicate_signup_refused() {
        assert_matches!(
            ensure_not_registered(3, 1),
            Err(AvishkarError::AlreadyRegistered { event_id: 3 })
        );
        assert!(ensure_not_registered(3, 0).is_ok());
    }

    #[test]
    fn test_unreviewed_predicate_matches_cancellable_statuses() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::PaymentUploaded,
            RegistrationStatus::Approved,
            RegistrationStatus::Rejected,
            RegistrationStatus::CheckedIn,
        ] {
            let quoted = format!("'{}'", status.as_str());
            assert_eq!(
                UNREVIEWED_PREDICATE.contains(&quoted),
                status.cancellable(),
                "predicate disagrees with lifecycle for {}",
                status.as_str()
            );
        }
    }
}
