//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{AvishkarError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_fcm_config(&settings.fcm)?;
    validate_upload_config(&settings.uploads)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(AvishkarError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(AvishkarError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AvishkarError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(AvishkarError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AvishkarError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AvishkarError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate API auth configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(AvishkarError::Config("JWT secret is required".to_string()));
    }

    if config.jwt_secret.len() < 32 {
        return Err(AvishkarError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }

    if config.token_ttl_hours <= 0 {
        return Err(AvishkarError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate FCM configuration
fn validate_fcm_config(config: &super::FcmConfig) -> Result<()> {
    if config.enabled {
        if config.api_url.is_empty() {
            return Err(AvishkarError::Config("FCM API URL is required".to_string()));
        }

        if config.server_key.is_empty() {
            return Err(AvishkarError::Config(
                "FCM server key is required when push is enabled".to_string(),
            ));
        }
    }

    if config.timeout_seconds == 0 {
        return Err(AvishkarError::Config(
            "FCM timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate upload configuration
fn validate_upload_config(config: &super::UploadConfig) -> Result<()> {
    if config.directory.is_empty() {
        return Err(AvishkarError::Config(
            "Upload directory is required".to_string(),
        ));
    }

    if config.max_size_bytes == 0 {
        return Err(AvishkarError::Config(
            "Upload size limit must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AvishkarError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AvishkarError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_empty_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "too-short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let mut settings = valid_settings();
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_fcm_enabled_requires_key() {
        let mut settings = valid_settings();
        settings.fcm.enabled = true;
        settings.fcm.server_key = String::new();
        assert!(validate_settings(&settings).is_err());

        settings.fcm.server_key = "server-key".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
