//! Share link keys and validity.
//!
//! A share link grants access to one event until its expiry. Keys are
//! opaque, globally unique strings; callers may supply their own or let
//! [`generate_key`] produce one.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lifetime applied when a share link is created without an explicit expiry.
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Maximum accepted length of a share key.
pub const MAX_KEY_LENGTH: usize = 128;

/// Generate a new share key.
///
/// UUIDv7 in simple (hyphen-free) form: 32 lowercase hex characters,
/// time-ordered so recently issued keys cluster in the unique index.
pub fn generate_key() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Validate a caller-supplied share key.
///
/// Keys end up in URLs, so only ASCII alphanumerics, `-` and `_` are allowed.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty() {
        return Err(CoreError::Validation("Share key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Share key exceeds maximum length of {MAX_KEY_LENGTH} characters"
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::Validation(format!(
            "Share key contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Expiry used when none is supplied.
pub fn default_expiry(now: Timestamp) -> Timestamp {
    now + Duration::days(DEFAULT_TTL_DAYS)
}

/// A share link is valid while it is not soft-deleted and its expiry lies
/// strictly in the future.
pub fn is_valid(expiry: Timestamp, deleted_at: Option<Timestamp>, now: Timestamp) -> bool {
    deleted_at.is_none() && expiry > now
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
