//! Authentication service implementation
//!
//! This service handles JWT verification for API requests, role-based
//! access control for participants, organizers and admins, and ownership
//! checks for organizer-managed events.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::models::event::Event;
use crate::models::user::{User, UserRole};
use crate::utils::errors::{AvishkarError, Result};

/// JWT claims carried by API bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External auth subject (firebase uid)
    pub sub: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication context for a request, injected by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub firebase_uid: String,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_organizer(&self) -> bool {
        self.role >= UserRole::Organizer
    }
}

/// Authentication service for token handling and access control
#[derive(Debug, Clone)]
pub struct AuthService {
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Issue a bearer token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.firebase_uid.clone(),
            role: user.role()?,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.settings.auth.token_ttl_hours)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )
        .map_err(|e| AvishkarError::Authentication(format!("token issue failed: {}", e)))
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!(error = %e, "Token verification failed");
            AvishkarError::Authentication("invalid or expired token".to_string())
        })?;

        Ok(data.claims)
    }

    /// Build the request auth context from a verified user row
    pub fn context_for_user(&self, user: &User) -> Result<AuthContext> {
        if user.is_banned {
            return Err(AvishkarError::PermissionDenied(
                "account is banned".to_string(),
            ));
        }

        let context = AuthContext {
            user_id: user.id,
            firebase_uid: user.firebase_uid.clone(),
            role: user.role()?,
        };

        debug!(user_id = context.user_id, role = %context.role, "Authentication context created");
        Ok(context)
    }

    /// Require at least the given role
    pub fn require_role(&self, context: &AuthContext, required: UserRole) -> Result<()> {
        if context.role < required {
            return Err(AvishkarError::PermissionDenied(format!(
                "requires {} role",
                required
            )));
        }

        Ok(())
    }

    /// Organizers may only manage events assigned to them; admins bypass
    pub fn require_event_access(&self, context: &AuthContext, event: &Event) -> Result<()> {
        if context.is_admin() {
            return Ok(());
        }

        if context.role == UserRole::Organizer && event.assigned_to == Some(context.user_id) {
            return Ok(());
        }

        Err(AvishkarError::PermissionDenied(format!(
            "user {} may not manage event {}",
            context.user_id, event.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    fn test_user(role: &str) -> User {
        User {
            id: 10,
            firebase_uid: "uid-10".to_string(),
            email: "user@college.edu".to_string(),
            display_name: None,
            mobile: None,
            role: role.to_string(),
            organizer_request: false,
            fcm_tokens: vec![],
            is_banned: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_event(assigned_to: Option<i64>) -> Event {
        Event {
            id: 3,
            title: "Hackathon".to_string(),
            description: None,
            event_date: Utc::now(),
            venue: None,
            category: None,
            price: 0,
            slots: None,
            registered_count: 0,
            image_url: None,
            gallery: vec![],
            winners: vec![],
            assigned_to,
            organizer_name: None,
            organizer_contact: None,
            status: "approved".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = AuthService::new(test_settings());
        let user = test_user("organizer");

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "uid-10");
        assert_eq!(claims.role, UserRole::Organizer);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = AuthService::new(test_settings());
        let user = test_user("admin");

        let mut token = service.issue_token(&user).unwrap();
        token.push('x');
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_banned_user_gets_no_context() {
        let service = AuthService::new(test_settings());
        let mut user = test_user("participant");
        user.is_banned = true;

        assert!(service.context_for_user(&user).is_err());
    }

    #[test]
    fn test_role_requirements() {
        let service = AuthService::new(test_settings());
        let participant = service.context_for_user(&test_user("participant")).unwrap();
        let organizer = service.context_for_user(&test_user("organizer")).unwrap();
        let admin = service.context_for_user(&test_user("admin")).unwrap();

        assert!(service.require_role(&participant, UserRole::Participant).is_ok());
        assert!(service.require_role(&participant, UserRole::Organizer).is_err());
        assert!(service.require_role(&organizer, UserRole::Organizer).is_ok());
        assert!(service.require_role(&organizer, UserRole::Admin).is_err());
        assert!(service.require_role(&admin, UserRole::Admin).is_ok());
    }

    #[test]
    fn test_event_access() {
        let service = AuthService::new(test_settings());
        let organizer = service.context_for_user(&test_user("organizer")).unwrap();
        let admin = service.context_for_user(&test_user("admin")).unwrap();

        // Organizer owns the event
        assert!(service
            .require_event_access(&organizer, &test_event(Some(10)))
            .is_ok());
        // Organizer does not own the event
        assert!(service
            .require_event_access(&organizer, &test_event(Some(99)))
            .is_err());
        // Admin bypasses ownership
        assert!(service
            .require_event_access(&admin, &test_event(Some(99)))
            .is_ok());
    }
}
