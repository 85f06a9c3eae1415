//! FCM push delivery client
//!
//! Thin reqwest client for the FCM legacy HTTP endpoint. When push is
//! disabled in configuration the client accepts sends and drops them,
//! which keeps the notification paths exercisable in development.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{AvishkarError, PushError, Result};

/// Outgoing push message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

/// FCM response envelope (legacy HTTP API)
#[derive(Debug, Clone, Deserialize)]
struct FcmResponse {
    success: Option<i64>,
    failure: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct FcmClient {
    client: Client,
    settings: Settings,
}

impl FcmClient {
    /// Create a new FcmClient instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.fcm.timeout_seconds))
            .user_agent("Avishkar-Backend/1.0")
            .build()
            .map_err(AvishkarError::Http)?;

        Ok(Self { client, settings })
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.fcm.enabled
    }

    /// Send a push message to a single device token
    pub async fn send_to_token(&self, token: &str, message: &PushMessage) -> Result<()> {
        if !self.is_enabled() {
            debug!("FCM disabled, dropping push message");
            return Ok(());
        }

        let payload = json!({
            "to": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            }
        });

        let response = self
            .client
            .post(&self.settings.fcm.api_url)
            .header(
                "Authorization",
                format!("key={}", self.settings.fcm.server_key),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AvishkarError::Push(PushError::Timeout)
                } else {
                    AvishkarError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "FCM request rejected");
            return Err(AvishkarError::Push(PushError::RequestFailed(format!(
                "status {}",
                status
            ))));
        }

        let body: FcmResponse = response
            .json()
            .await
            .map_err(|e| AvishkarError::Push(PushError::InvalidResponse(e.to_string())))?;

        if body.failure.unwrap_or(0) > 0 && body.success.unwrap_or(0) == 0 {
            return Err(AvishkarError::Push(PushError::RequestFailed(
                "delivery rejected for token".to_string(),
            )));
        }

        debug!("Push message delivered");
        Ok(())
    }
}
