//! Rate limiting middleware
//!
//! Per-user sliding-window rate limiting applied to authenticated API
//! traffic. Admins are exempt.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::services::auth::AuthContext;
use crate::utils::errors::{AvishkarError, Result};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Extra requests allowed in short bursts
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_duration: Duration::from_secs(60),
            burst_allowance: 10,
        }
    }
}

/// Request history for one user
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        if (self.requests.len() as u32) < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Sliding-window limiter shared across request handlers
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<i64, RateLimitEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check and record a request for the authenticated user
    pub fn check(&self, context: &AuthContext) -> Result<()> {
        if context.is_admin() {
            debug!(user_id = context.user_id, "Admin exempt from rate limiting");
            return Ok(());
        }

        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(context.user_id)
            .or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            Ok(())
        } else {
            warn!(user_id = context.user_id, "Rate limit exceeded");
            Err(AvishkarError::RateLimitExceeded)
        }
    }

    /// Drop entries idle for more than two windows
    pub fn cleanup_old_entries(&self) {
        let mut entries = self.entries.lock().unwrap();
        let cutoff = Instant::now() - self.config.window_duration * 2;

        entries.retain(|_, entry| entry.requests.iter().any(|&time| time > cutoff));
        debug!(remaining_entries = entries.len(), "Cleaned up rate limit entries");
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn context(user_id: i64, role: UserRole) -> AuthContext {
        AuthContext {
            user_id,
            firebase_uid: format!("uid-{}", user_id),
            role,
        }
    }

    #[test]
    fn test_rate_limit_basic() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 3,
            window_duration: Duration::from_secs(60),
            burst_allowance: 1,
        });
        let user = context(1, UserRole::Participant);

        assert!(limiter.check(&user).is_ok());
        assert!(limiter.check(&user).is_ok());
        assert!(limiter.check(&user).is_ok());
        // Burst allowance absorbs one more
        assert!(limiter.check(&user).is_ok());
        assert!(limiter.check(&user).is_err());
    }

    #[test]
    fn test_admin_exemption() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        });
        let admin = context(2, UserRole::Admin);
        let participant = context(3, UserRole::Participant);

        assert!(limiter.check(&admin).is_ok());
        assert!(limiter.check(&admin).is_ok());
        assert!(limiter.check(&admin).is_ok());

        assert!(limiter.check(&participant).is_ok());
        assert!(limiter.check(&participant).is_err());
    }

    #[test]
    fn test_users_tracked_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        });

        assert!(limiter.check(&context(10, UserRole::Participant)).is_ok());
        assert!(limiter.check(&context(11, UserRole::Participant)).is_ok());
        assert!(limiter.check(&context(10, UserRole::Participant)).is_err());
    }
}
