//! Entry-pass scanning

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;

use crate::services::auth::AuthContext;
use crate::services::registration::ScanResult;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Raw contents of the scanned QR code
    pub payload: String,
}

/// POST /api/attendance/mark
///
/// Organizer scans a participant's entry pass at the venue. A valid first
/// scan marks attendance; a repeated scan returns a conflict so gate staff
/// see the pass was already used.
pub async fn scan(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanResult>> {
    let result = state
        .services
        .registration_service
        .mark_attendance(&context, &body.payload)
        .await?;

    Ok(Json(result))
}
