//! Event catalogue endpoints

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::services::auth::AuthContext;
use crate::state::AppState;
use crate::utils::errors::Result;

/// GET /api/events — public listing of approved, active events
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    let events = state.services.event_service.list_public().await?;
    Ok(Json(events))
}

/// GET /api/events/:id — public detail, approved and active events only
pub async fn get(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state.services.event_service.get_public(event_id).await?;
    Ok(Json(event))
}

/// POST /api/events — organizer submits an event for approval
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<CreateEventRequest>,
) -> Result<Json<Event>> {
    let event = state.services.event_service.create(&context, body).await?;
    Ok(Json(event))
}

/// PATCH /api/events/:id — owner organizer or admin
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(event_id): Path<i64>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .update(&context, event_id, body)
        .await?;
    Ok(Json(event))
}

/// GET /api/events/mine — events assigned to the calling organizer
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<Event>>> {
    let events = state.services.event_service.list_mine(&context).await?;
    Ok(Json(events))
}

/// GET /api/events/:id/registrations — organizer view of signups
pub async fn list_registrations(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(event_id): Path<i64>,
) -> Result<Json<Value>> {
    let registrations = state
        .services
        .registration_service
        .list_for_event(&context, event_id)
        .await?;

    Ok(Json(json!({
        "event_id": event_id,
        "count": registrations.len(),
        "registrations": registrations,
    })))
}
