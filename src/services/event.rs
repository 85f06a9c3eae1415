//! Event catalogue service
//!
//! Organizer-facing event CRUD with admin approval, plus the public
//! browse listing cached in Redis. Every mutation invalidates the cache
//! so the public catalogue never serves stale approvals.

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::models::user::UserRole;
use crate::services::auth::{AuthContext, AuthService};
use crate::services::redis::RedisService;
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::logging;

pub(crate) const PUBLIC_EVENTS_CACHE_KEY: &str = "events:public";
const PUBLIC_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    auth: AuthService,
    redis: RedisService,
}

impl EventService {
    pub fn new(db: DatabaseService, auth: AuthService, redis: RedisService) -> Self {
        Self { db, auth, redis }
    }

    /// Public catalogue of approved, active events. Served from Redis when
    /// warm; a cache miss or Redis outage falls through to Postgres.
    pub async fn list_public(&self) -> Result<Vec<Event>> {
        match self.redis.get::<Vec<Event>>(PUBLIC_EVENTS_CACHE_KEY).await {
            Ok(Some(events)) => {
                debug!(count = events.len(), "Public event listing served from cache");
                return Ok(events);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "Event cache unavailable, falling back to database");
            }
        }

        let events = self.db.events.list_public(PUBLIC_PAGE_SIZE, 0).await?;

        if let Err(e) = self.redis.set(PUBLIC_EVENTS_CACHE_KEY, &events, None).await {
            debug!(error = %e, "Failed to warm event cache");
        }

        Ok(events)
    }

    pub async fn get(&self, event_id: i64) -> Result<Event> {
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AvishkarError::EventNotFound { event_id })
    }

    /// Public detail view. Events that are not approved and active answer
    /// not-found, so the approval queue is invisible to anonymous callers.
    pub async fn get_public(&self, event_id: i64) -> Result<Event> {
        let event = self.get(event_id).await?;
        if !event.publicly_visible() {
            return Err(AvishkarError::EventNotFound { event_id });
        }
        Ok(event)
    }

    /// Organizer proposes an event; it enters the admin approval queue.
    /// Organizers are always assigned to their own submission, admins may
    /// assign any organizer.
    pub async fn create(
        &self,
        context: &AuthContext,
        mut request: CreateEventRequest,
    ) -> Result<Event> {
        self.auth.require_role(context, UserRole::Organizer)?;

        if request.title.trim().is_empty() {
            return Err(AvishkarError::InvalidInput("title is required".to_string()));
        }
        if request.price < 0 {
            return Err(AvishkarError::InvalidInput(
                "price cannot be negative".to_string(),
            ));
        }
        if matches!(request.slots, Some(slots) if slots <= 0) {
            return Err(AvishkarError::InvalidInput(
                "slots must be positive".to_string(),
            ));
        }

        if !context.is_admin() {
            request.assigned_to = Some(context.user_id);
        } else if request.assigned_to.is_none() {
            request.assigned_to = Some(context.user_id);
        }

        let event = self.db.events.create(request).await?;
        info!(event_id = event.id, created_by = context.user_id, "Event submitted for approval");
        Ok(event)
    }

    /// Update an event's details; owner organizer or admin only
    pub async fn update(
        &self,
        context: &AuthContext,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.get(event_id).await?;
        self.auth.require_event_access(context, &event)?;

        if matches!(request.price, Some(price) if price < 0) {
            return Err(AvishkarError::InvalidInput(
                "price cannot be negative".to_string(),
            ));
        }
        if matches!(request.slots, Some(slots) if slots < event.registered_count) {
            return Err(AvishkarError::InvalidInput(format!(
                "slots cannot be reduced below {} existing registrations",
                event.registered_count
            )));
        }

        let updated = self.db.events.update(event_id, request).await?;
        self.invalidate_cache().await;

        info!(event_id = event_id, updated_by = context.user_id, "Event updated");
        Ok(updated)
    }

    /// Admin approves or rejects a pending event
    pub async fn review(
        &self,
        context: &AuthContext,
        event_id: i64,
        approve: bool,
    ) -> Result<Event> {
        self.auth.require_role(context, UserRole::Admin)?;

        let event = self.get(event_id).await?;
        if event.status()? != EventStatus::Pending {
            return Err(AvishkarError::InvalidInput(format!(
                "event {} is not pending review",
                event_id
            )));
        }

        let status = if approve {
            EventStatus::Approved
        } else {
            EventStatus::Rejected
        };

        let updated = self.db.events.set_status(event_id, status).await?;
        self.invalidate_cache().await;

        logging::log_event_action(event_id, status.as_str(), context.user_id, None);
        Ok(updated)
    }

    /// Admin marks an event completed after the fest day
    pub async fn complete(&self, context: &AuthContext, event_id: i64) -> Result<Event> {
        self.auth.require_role(context, UserRole::Admin)?;

        let event = self.get(event_id).await?;
        if event.status()? != EventStatus::Approved {
            return Err(AvishkarError::InvalidInput(format!(
                "only approved events can be completed, event {} is {}",
                event_id, event.status
            )));
        }

        let updated = self
            .db
            .events
            .set_status(event_id, EventStatus::Completed)
            .await?;
        self.invalidate_cache().await;

        info!(event_id = event_id, admin_id = context.user_id, "Event completed");
        Ok(updated)
    }

    /// Delete an event; admin only, and never once registrations exist
    pub async fn delete(&self, context: &AuthContext, event_id: i64) -> Result<()> {
        self.auth.require_role(context, UserRole::Admin)?;

        let event = self.get(event_id).await?;
        let registrations = self.db.registrations.count_for_event(event_id).await?;
        if registrations > 0 {
            return Err(AvishkarError::InvalidInput(format!(
                "event {} has {} registrations and cannot be deleted",
                event_id, registrations
            )));
        }

        self.db.events.delete(event.id).await?;
        self.invalidate_cache().await;

        info!(event_id = event_id, admin_id = context.user_id, "Event deleted");
        Ok(())
    }

    /// Admin listing of every event regardless of status
    pub async fn list_all(
        &self,
        context: &AuthContext,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>> {
        self.auth.require_role(context, UserRole::Admin)?;
        self.db.events.list_all(limit, offset).await
    }

    /// Admin approval queue
    pub async fn list_pending(&self, context: &AuthContext) -> Result<Vec<Event>> {
        self.auth.require_role(context, UserRole::Admin)?;
        self.db.events.list_pending().await
    }

    /// Events managed by the calling organizer
    pub async fn list_mine(&self, context: &AuthContext) -> Result<Vec<Event>> {
        self.auth.require_role(context, UserRole::Organizer)?;
        self.db.events.list_assigned_to(context.user_id).await
    }

    async fn invalidate_cache(&self) {
        if let Err(e) = self.redis.delete(PUBLIC_EVENTS_CACHE_KEY).await {
            debug!(error = %e, "Failed to invalidate event cache");
        }
    }
}
