//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Avishkar backend.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer for the rolling log
/// file; the caller must keep it alive for the lifetime of the process
/// or file output stops.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "avishkar.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log registration lifecycle actions with structured data
pub fn log_registration_action(
    registration_id: i64,
    user_id: i64,
    action: &str,
    details: Option<&str>,
) {
    info!(
        registration_id = registration_id,
        user_id = user_id,
        action = action,
        details = details,
        "Registration action performed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log entry-pass scan results
pub fn log_scan_result(registration_id: i64, organizer_id: i64, accepted: bool, reason: Option<&str>) {
    if accepted {
        info!(
            registration_id = registration_id,
            organizer_id = organizer_id,
            "Entry pass accepted"
        );
    } else {
        warn!(
            registration_id = registration_id,
            organizer_id = organizer_id,
            reason = reason,
            "Entry pass rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only test in this binary that installs the global subscriber
    #[test]
    fn test_init_returns_live_file_writer_guard() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            file_path: dir.path().to_string_lossy().to_string(),
        };

        let guard = init_logging(&config).unwrap();
        info!("startup line");
        // Dropping the guard flushes the background writer
        drop(guard);

        let wrote_log_file = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("avishkar.log")
            });
        assert!(wrote_log_file);
    }
}
