//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod fcm;
pub mod notification;
pub mod redis;
pub mod registration;
pub mod upload;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, Claims};
pub use event::EventService;
pub use fcm::{FcmClient, PushMessage};
pub use notification::{MessageTemplate, NotificationService, NotificationStats};
pub use redis::RedisService;
pub use registration::{RegistrationService, ScanResult, SignupInput};
pub use upload::UploadService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub notification_service: NotificationService,
    pub redis_service: RedisService,
    pub upload_service: UploadService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(settings.clone());
        let redis_service = RedisService::new(settings.clone())?;
        let fcm_client = FcmClient::new(settings.clone())?;

        let user_service = UserService::new(db.clone(), auth_service.clone());
        let event_service =
            EventService::new(db.clone(), auth_service.clone(), redis_service.clone());
        let registration_service =
            RegistrationService::new(db, auth_service.clone(), redis_service.clone());
        let notification_service = NotificationService::new(fcm_client);
        let upload_service = UploadService::new(settings);

        Ok(Self {
            auth_service,
            user_service,
            event_service,
            registration_service,
            notification_service,
            redis_service,
            upload_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let redis_healthy = self.redis_service.health_check().await.unwrap_or(false);

        ServiceHealthStatus { redis_healthy }
    }
}

/// Health status for supporting services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub redis_healthy: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.redis_healthy
    }

    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.redis_healthy {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}
