//! Standalone image upload
//!
//! Used by organizers for event images and galleries. Payment screenshots
//! normally go through the registration payment endpoint, which stores and
//! attaches in one call.

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::auth::AuthContext;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    /// Base64-encoded file contents, with or without a data-URL prefix
    pub data: String,
}

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<UploadRequest>,
) -> Result<Json<Value>> {
    let url = state
        .services
        .upload_service
        .store_image(&body.filename, &body.data)
        .await?;

    tracing::debug!(user_id = context.user_id, url = %url, "File uploaded");
    Ok(Json(json!({ "url": url })))
}
