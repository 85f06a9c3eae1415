//! Registration lifecycle endpoints

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::models::registration::{Registration, ReviewDecision};
use crate::services::auth::AuthContext;
use crate::services::registration::SignupInput;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub roll_no: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub team_members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentUploadRequest {
    /// Original filename, used only for its extension
    pub filename: String,
    /// Base64-encoded screenshot, with or without a data-URL prefix
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

#[derive(Debug, Serialize)]
pub struct RegistrationWithPass {
    #[serde(flatten)]
    pub registration: Registration,
    pub pass: Option<String>,
}

/// POST /api/registrations
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<Registration>> {
    let registration = state
        .services
        .registration_service
        .register(
            &context,
            SignupInput {
                event_id: body.event_id,
                name: body.name,
                email: body.email,
                mobile: body.mobile,
                college: body.college,
                roll_no: body.roll_no,
                department: body.department,
                team_members: body.team_members,
            },
        )
        .await?;

    Ok(Json(registration))
}

/// GET /api/registrations/mine
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<RegistrationWithPass>>> {
    let registrations = state
        .services
        .registration_service
        .list_mine(&context)
        .await?;

    Ok(Json(
        registrations
            .into_iter()
            .map(|(registration, pass)| RegistrationWithPass { registration, pass })
            .collect(),
    ))
}

/// POST /api/registrations/:id/payment
///
/// Stores the screenshot and moves the registration to payment review
pub async fn upload_payment(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(registration_id): Path<i64>,
    Json(body): Json<PaymentUploadRequest>,
) -> Result<Json<Registration>> {
    let url = state
        .services
        .upload_service
        .store_image(&body.filename, &body.data)
        .await?;

    let registration = state
        .services
        .registration_service
        .attach_payment(&context, registration_id, url)
        .await?;

    Ok(Json(registration))
}

/// POST /api/registrations/:id/review — organizer or admin decision.
/// The participant is notified on their registered devices; notification
/// failure never fails the review.
pub async fn review(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(registration_id): Path<i64>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<Registration>> {
    let registration = state
        .services
        .registration_service
        .review(&context, registration_id, body.decision)
        .await?;

    notify_review(&state, &registration, body.decision == ReviewDecision::Approve).await;

    Ok(Json(registration))
}

/// GET /api/registrations/:id/pass
pub async fn get_pass(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(registration_id): Path<i64>,
) -> Result<Json<Value>> {
    let pass = state
        .services
        .registration_service
        .issue_pass(&context, registration_id)
        .await?;

    Ok(Json(json!({
        "registration_id": registration_id,
        "pass": pass,
    })))
}

/// DELETE /api/registrations/:id — participant cancels before review
pub async fn cancel(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(registration_id): Path<i64>,
) -> Result<Json<Value>> {
    state
        .services
        .registration_service
        .cancel(&context, registration_id)
        .await?;

    Ok(Json(json!({ "cancelled": registration_id })))
}

async fn notify_review(state: &AppState, registration: &Registration, approved: bool) {
    let user = match state.db.users.find_by_id(registration.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "Could not load user for review notification");
            return;
        }
    };

    if user.fcm_tokens.is_empty() {
        return;
    }

    let event = match state.db.events.find_by_id(registration.event_id).await {
        Ok(Some(event)) => event,
        _ => return,
    };

    if let Err(e) = state
        .services
        .notification_service
        .send_review_notification(&user.fcm_tokens, registration, &event, approved)
        .await
    {
        warn!(error = %e, registration_id = registration.id, "Review notification failed");
    }
}
