//! Username rules and availability.

use serde::Serialize;
use thiserror::Error;

use crate::profiles::store::{ProfileStore, StoreError};
use crate::routing::classifier::is_reserved;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;

/// First path segments the main domain routes itself.
const ROUTE_NAMES: &[&str] = &["api", "healthz", "metrics"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must be between 3 and 30 characters")]
    Length,
    #[error("username may only contain lower-case letters, digits, '-' and '_'")]
    Characters,
    #[error("username must start with a letter or digit")]
    Leading,
    #[error("username is reserved")]
    Reserved,
}

/// Lower-case and trim a username for storage or lookup.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Check a normalized username against the platform rules.
pub fn validate_username(name: &str) -> Result<(), UsernameError> {
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&name.len()) {
        return Err(UsernameError::Length);
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    {
        return Err(UsernameError::Characters);
    }
    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(UsernameError::Leading);
    }
    if is_reserved(name) || ROUTE_NAMES.contains(&name) {
        return Err(UsernameError::Reserved);
    }
    Ok(())
}

/// Answer to an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub username: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whether `raw` could be claimed right now.
pub async fn check_availability(
    store: &dyn ProfileStore,
    raw: &str,
) -> Result<Availability, StoreError> {
    let username = normalize_username(raw);

    if let Err(e) = validate_username(&username) {
        return Ok(Availability {
            username,
            available: false,
            reason: Some(e.to_string()),
        });
    }

    let taken = store.profile_by_username(&username).await?.is_some();
    Ok(Availability {
        available: !taken,
        reason: taken.then(|| "username is taken".to_string()),
        username,
    })
}
