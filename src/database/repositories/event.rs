//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::utils::errors::AvishkarError;

const EVENT_COLUMNS: &str = "id, title, description, event_date, venue, category, price, slots, registered_count, image_url, gallery, winners, assigned_to, organizer_name, organizer_contact, status, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event in the pending approval state
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, AvishkarError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, event_date, venue, category, price, slots, registered_count, image_url, gallery, winners, assigned_to, organizer_name, organizer_contact, status, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, '{}', '{}', $9, $10, $11, 'pending', true, $12, $12)
            RETURNING id, title, description, event_date, venue, category, price, slots, registered_count, image_url, gallery, winners, assigned_to, organizer_name, organizer_contact, status, is_active, created_at, updated_at
            "#,
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.venue)
        .bind(request.category)
        .bind(request.price)
        .bind(request.slots)
        .bind(request.image_url)
        .bind(request.assigned_to)
        .bind(request.organizer_name)
        .bind(request.organizer_contact)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AvishkarError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event fields
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, AvishkarError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                venue = COALESCE($5, venue),
                category = COALESCE($6, category),
                price = COALESCE($7, price),
                slots = COALESCE($8, slots),
                image_url = COALESCE($9, image_url),
                gallery = COALESCE($10, gallery),
                winners = COALESCE($11, winners),
                organizer_name = COALESCE($12, organizer_name),
                organizer_contact = COALESCE($13, organizer_contact),
                is_active = COALESCE($14, is_active),
                updated_at = $15
            WHERE id = $1
            RETURNING id, title, description, event_date, venue, category, price, slots, registered_count, image_url, gallery, winners, assigned_to, organizer_name, organizer_contact, status, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.venue)
        .bind(request.category)
        .bind(request.price)
        .bind(request.slots)
        .bind(request.image_url)
        .bind(request.gallery)
        .bind(request.winners)
        .bind(request.organizer_name)
        .bind(request.organizer_contact)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Set the admin approval status
    pub async fn set_status(&self, id: i64, status: EventStatus) -> Result<Event, AvishkarError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, title, description, event_date, venue, category, price, slots, registered_count, image_url, gallery, winners, assigned_to, organizer_name, organizer_contact, status, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event (registrations cascade)
    pub async fn delete(&self, id: i64) -> Result<(), AvishkarError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List approved, active events for public browsing
    pub async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AvishkarError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE status = 'approved' AND is_active = true ORDER BY event_date ASC LIMIT $1 OFFSET $2",
            EVENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List all events regardless of status (admin view)
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AvishkarError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY event_date ASC LIMIT $1 OFFSET $2",
            EVENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events awaiting admin approval
    pub async fn list_pending(&self) -> Result<Vec<Event>, AvishkarError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE status = 'pending' ORDER BY created_at ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events assigned to an organizer
    pub async fn list_assigned_to(&self, organizer_id: i64) -> Result<Vec<Event>, AvishkarError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE assigned_to = $1 ORDER BY event_date ASC",
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, AvishkarError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
