//! Admin dashboard endpoints
//!
//! Everything here sits behind the admin role check. Handlers stay thin;
//! the services enforce the role again so nothing depends on the router
//! wiring alone.

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::event::Event;
use crate::models::fest::{ContactMessage, FestSettings, UpdateFestSettingsRequest};
use crate::models::user::{User, UserRole};
use crate::services::auth::AuthContext;
use crate::state::AppState;
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::helpers;

const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl Pagination {
    fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 200);
        let offset = helpers::calculate_offset(self.page.unwrap_or(1), per_page);
        (per_page as i64, offset as i64)
    }
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub title: String,
    pub body: String,
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Value>> {
    state
        .services
        .auth_service
        .require_role(&context, UserRole::Admin)?;

    let mut stats = state.db.get_system_stats().await?;
    if let Some(map) = stats.as_object_mut() {
        map.insert(
            "notifications".to_string(),
            serde_json::to_value(state.services.notification_service.get_stats())?,
        );
    }
    Ok(Json(stats))
}

/// GET /api/admin/events
pub async fn list_events(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Event>>> {
    let (limit, offset) = pagination.limit_offset();
    let events = state
        .services
        .event_service
        .list_all(&context, limit, offset)
        .await?;
    Ok(Json(events))
}

/// GET /api/admin/events/pending — approval queue
pub async fn list_pending_events(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<Event>>> {
    let events = state.services.event_service.list_pending(&context).await?;
    Ok(Json(events))
}

/// POST /api/admin/events/:id/review
pub async fn review_event(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(event_id): Path<i64>,
    Json(body): Json<ApprovalRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .review(&context, event_id, body.approve)
        .await?;
    Ok(Json(event))
}

/// POST /api/admin/events/:id/complete
pub async fn complete_event(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(event_id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .complete(&context, event_id)
        .await?;
    Ok(Json(event))
}

/// DELETE /api/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(event_id): Path<i64>,
) -> Result<Json<Value>> {
    state
        .services
        .event_service
        .delete(&context, event_id)
        .await?;
    Ok(Json(json!({ "deleted": event_id })))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<User>>> {
    let (limit, offset) = pagination.limit_offset();
    let users = state
        .services
        .user_service
        .list(&context, limit, offset)
        .await?;
    Ok(Json(users))
}

/// GET /api/admin/organizer-requests
pub async fn list_organizer_requests(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<User>>> {
    let users = state
        .services
        .user_service
        .list_organizer_requests(&context)
        .await?;
    Ok(Json(users))
}

/// POST /api/admin/organizer-requests/:id/review
pub async fn review_organizer_request(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(user_id): Path<i64>,
    Json(body): Json<ApprovalRequest>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .review_organizer_request(&context, user_id, body.approve)
        .await?;
    Ok(Json(user))
}

/// POST /api/admin/users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(user_id): Path<i64>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .set_role(&context, user_id, body.role)
        .await?;
    Ok(Json(user))
}

/// POST /api/admin/users/:id/ban
pub async fn set_banned(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(user_id): Path<i64>,
    Json(body): Json<BanRequest>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .set_banned(&context, user_id, body.banned)
        .await?;
    Ok(Json(user))
}

/// PATCH /api/admin/settings — fest-wide toggles
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<UpdateFestSettingsRequest>,
) -> Result<Json<FestSettings>> {
    state
        .services
        .auth_service
        .require_role(&context, UserRole::Admin)?;

    let settings = state.db.fest.update_settings(body).await?;
    Ok(Json(settings))
}

/// GET /api/admin/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ContactMessage>>> {
    state
        .services
        .auth_service
        .require_role(&context, UserRole::Admin)?;

    let (limit, offset) = pagination.limit_offset();
    let messages = state.db.fest.list_contact_messages(limit, offset).await?;
    Ok(Json(messages))
}

/// POST /api/notifications/broadcast
///
/// Push a fest-wide announcement to every registered device of non-banned
/// users. Per-token failures are tolerated; counts come back to the admin.
pub async fn broadcast(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<BroadcastRequest>,
) -> Result<Json<Value>> {
    if body.title.trim().is_empty() || body.body.trim().is_empty() {
        return Err(AvishkarError::InvalidInput(
            "title and body are required".to_string(),
        ));
    }

    let tokens = state.services.user_service.all_fcm_tokens(&context).await?;

    let mut parameters = std::collections::HashMap::new();
    parameters.insert("title".to_string(), body.title);
    parameters.insert("body".to_string(), body.body);

    let (sent, failed) = state
        .services
        .notification_service
        .broadcast(&tokens, "broadcast", &parameters)
        .await?;

    Ok(Json(json!({
        "tokens": tokens.len(),
        "sent": sent,
        "failed": failed,
    })))
}
