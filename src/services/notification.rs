//! Notification service implementation
//!
//! This service handles message formatting and sending: a small template
//! system with parameter substitution, bulk fan-out over device tokens
//! with per-token failure tolerance, and delivery statistics.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::event::Event;
use crate::models::registration::Registration;
use crate::services::fcm::{FcmClient, PushMessage};
use crate::utils::errors::{AvishkarError, Result};

/// Message template structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub key: String,
    pub title: String,
    pub body: String,
}

/// Notification statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
    pub sent_by_template: HashMap<String, u64>,
}

/// Notification service for push message handling.
///
/// Delivery statistics live behind a shared handle, so every clone of the
/// service feeds the same counters.
#[derive(Debug, Clone)]
pub struct NotificationService {
    fcm: FcmClient,
    templates: HashMap<String, MessageTemplate>,
    stats: Arc<Mutex<NotificationStats>>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(fcm: FcmClient) -> Self {
        Self {
            fcm,
            templates: Self::load_default_templates(),
            stats: Arc::new(Mutex::new(NotificationStats::default())),
        }
    }

    /// Render a template with parameters substituted
    pub fn format_message(
        &self,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<PushMessage> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            AvishkarError::InvalidInput(format!("Template not found: {}", template_key))
        })?;

        let mut title = template.title.clone();
        let mut body = template.body.clone();

        for (key, value) in parameters {
            let placeholder = format!("{{{}}}", key);
            title = title.replace(&placeholder, value);
            body = body.replace(&placeholder, value);
        }

        Ok(PushMessage { title, body })
    }

    /// Send a templated notification to one device token
    pub async fn send_to_token(
        &self,
        token: &str,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<()> {
        let message = self.format_message(template_key, parameters)?;

        match self.fcm.send_to_token(token, &message).await {
            Ok(()) => {
                self.update_stats_success(template_key);
                debug!(template_key = %template_key, "Notification sent");
                Ok(())
            }
            Err(e) => {
                self.update_stats_failure();
                warn!(template_key = %template_key, error = %e, "Failed to send notification");
                Err(e)
            }
        }
    }

    /// Fan a templated notification out to many device tokens. Per-token
    /// failure is tolerated; the caller gets sent/failed counts.
    pub async fn broadcast(
        &self,
        tokens: &[String],
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<(u64, u64)> {
        info!(count = tokens.len(), template_key = %template_key, "Broadcasting notification");

        let message = self.format_message(template_key, parameters)?;
        let mut sent = 0u64;
        let mut failed = 0u64;

        for token in tokens {
            match self.fcm.send_to_token(token, &message).await {
                Ok(()) => {
                    self.update_stats_success(template_key);
                    sent += 1;
                }
                Err(e) => {
                    self.update_stats_failure();
                    warn!(error = %e, "Failed to deliver broadcast to token");
                    failed += 1;
                }
            }

            // Small delay between sends to avoid rate limiting
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        info!(sent = sent, failed = failed, "Broadcast completed");
        Ok((sent, failed))
    }

    /// Notify a participant that their registration was reviewed
    pub async fn send_review_notification(
        &self,
        tokens: &[String],
        registration: &Registration,
        event: &Event,
        approved: bool,
    ) -> Result<(u64, u64)> {
        let mut parameters = HashMap::new();
        parameters.insert("event_title".to_string(), event.title.clone());
        parameters.insert("name".to_string(), registration.name.clone());

        let template_key = if approved {
            "registration_approved"
        } else {
            "registration_rejected"
        };

        self.broadcast(tokens, template_key, &parameters).await
    }

    /// Snapshot of delivery statistics across all clones of the service
    pub fn get_stats(&self) -> NotificationStats {
        self.stats.lock().unwrap().clone()
    }

    fn update_stats_success(&self, template_key: &str) {
        let mut stats = self.stats.lock().unwrap();
        stats.total_sent += 1;
        *stats
            .sent_by_template
            .entry(template_key.to_string())
            .or_insert(0) += 1;
    }

    fn update_stats_failure(&self) {
        self.stats.lock().unwrap().total_failed += 1;
    }

    /// Load default message templates
    fn load_default_templates() -> HashMap<String, MessageTemplate> {
        let mut templates = HashMap::new();

        templates.insert(
            "registration_approved".to_string(),
            MessageTemplate {
                key: "registration_approved".to_string(),
                title: "Registration approved".to_string(),
                body: "Hi {name}, your registration for {event_title} is approved. Your entry pass is ready."
                    .to_string(),
            },
        );

        templates.insert(
            "registration_rejected".to_string(),
            MessageTemplate {
                key: "registration_rejected".to_string(),
                title: "Registration rejected".to_string(),
                body: "Hi {name}, your registration for {event_title} was rejected. Contact the organizers for details."
                    .to_string(),
            },
        );

        templates.insert(
            "event_approved".to_string(),
            MessageTemplate {
                key: "event_approved".to_string(),
                title: "Event live".to_string(),
                body: "{event_title} is now open for registrations!".to_string(),
            },
        );

        templates.insert(
            "broadcast".to_string(),
            MessageTemplate {
                key: "broadcast".to_string(),
                title: "{title}".to_string(),
                body: "{body}".to_string(),
            },
        );

        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;

    fn test_service() -> NotificationService {
        let fcm = FcmClient::new(Settings::default()).unwrap();
        NotificationService::new(fcm)
    }

    #[test]
    fn test_format_message() {
        let service = test_service();

        let mut parameters = HashMap::new();
        parameters.insert("name".to_string(), "Asha".to_string());
        parameters.insert("event_title".to_string(), "Robo Wars".to_string());

        let message = service
            .format_message("registration_approved", &parameters)
            .unwrap();
        assert!(message.body.contains("Asha"));
        assert!(message.body.contains("Robo Wars"));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let service = test_service();
        let result = service.format_message("no_such_template", &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_broadcast_template_substitutes_both_fields() {
        let service = test_service();

        let mut parameters = HashMap::new();
        parameters.insert("title".to_string(), "Schedule change".to_string());
        parameters.insert("body".to_string(), "Finals moved to 5pm".to_string());

        let message = service.format_message("broadcast", &parameters).unwrap();
        assert_eq!(message.title, "Schedule change");
        assert_eq!(message.body, "Finals moved to 5pm");
    }

    #[tokio::test]
    async fn test_disabled_fcm_counts_as_sent() {
        // Default settings leave push disabled; sends are accepted and dropped
        let service = test_service();

        let tokens = vec!["tok-a".to_string(), "tok-b".to_string()];
        let mut parameters = HashMap::new();
        parameters.insert("title".to_string(), "t".to_string());
        parameters.insert("body".to_string(), "b".to_string());

        let (sent, failed) = service
            .broadcast(&tokens, "broadcast", &parameters)
            .await
            .unwrap();
        assert_eq!(sent, 2);
        assert_eq!(failed, 0);
        assert_eq!(service.get_stats().total_sent, 2);
    }

    #[tokio::test]
    async fn test_stats_shared_across_clones() {
        // Handlers clone the service per request; counters must survive
        let service = test_service();
        let handle = service.clone();

        let mut parameters = HashMap::new();
        parameters.insert("title".to_string(), "t".to_string());
        parameters.insert("body".to_string(), "b".to_string());

        handle
            .send_to_token("tok-a", "broadcast", &parameters)
            .await
            .unwrap();

        let stats = service.get_stats();
        assert_eq!(stats.total_sent, 1);
        assert_eq!(stats.sent_by_template.get("broadcast"), Some(&1));
    }
}
