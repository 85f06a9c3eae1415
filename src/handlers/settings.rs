//! Public fest information and contact form

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::models::fest::{ContactMessage, CreateContactMessageRequest};
use crate::state::AppState;
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::helpers;

/// GET /api/settings
///
/// Public view of fest-wide settings: name, edition, whether registrations
/// are open, and the UPI id shown on the payment screen.
pub async fn get_public(State(state): State<AppState>) -> Result<Json<Value>> {
    let settings = state.db.fest.get_settings().await?;

    Ok(Json(json!({
        "fest_name": settings.fest_name,
        "edition": settings.edition,
        "registrations_open": settings.registrations_open,
        "payment_upi_id": settings.payment_upi_id,
        "support_email": settings.support_email,
        "support_phone": settings.support_phone,
    })))
}

/// POST /api/contact — public contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(body): Json<CreateContactMessageRequest>,
) -> Result<Json<ContactMessage>> {
    if body.name.trim().is_empty() || body.message.trim().is_empty() {
        return Err(AvishkarError::InvalidInput(
            "name and message are required".to_string(),
        ));
    }
    if !helpers::is_valid_email(&body.email) {
        return Err(AvishkarError::InvalidInput("invalid email".to_string()));
    }

    let message = state.db.fest.create_contact_message(body).await?;
    Ok(Json(message))
}
