//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        format!("{}...", &text[..max_length.saturating_sub(3)])
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let pattern = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
    match pattern {
        Ok(re) => re.is_match(email),
        Err(_) => false,
    }
}

/// Validate mobile number format (Indian 10-digit, optional country code)
pub fn is_valid_mobile(mobile: &str) -> bool {
    let pattern = regex::Regex::new(r"^(\+91[\-\s]?)?[6-9]\d{9}$");
    match pattern {
        Ok(re) => re.is_match(mobile.trim()),
        Err(_) => false,
    }
}

/// Calculate pagination offset
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1) * page_size
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("student@college.edu"));
        assert!(is_valid_email("a.b@c.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@at.com"));
    }

    #[test]
    fn test_is_valid_mobile() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("+91 9876543210"));
        assert!(is_valid_mobile("+91-9876543210"));
        assert!(!is_valid_mobile("1234567890"));
        assert!(!is_valid_mobile("98765"));
        assert!(!is_valid_mobile("abcdefghij"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("pay ment.png"), "pay_ment.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
    }

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 20), 0);
        assert_eq!(calculate_offset(3, 20), 40);
        assert_eq!(calculate_offset(0, 20), 0);
    }

    #[test]
    fn test_generate_random_string() {
        let s = generate_random_string(16);
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
