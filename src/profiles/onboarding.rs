//! Onboarding gate.

use serde::Serialize;

use crate::profiles::types::Profile;

/// Where a signed-in owner should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Onboarding,
    Dashboard,
}

/// Onboarding is done only once the flag is set and a username is claimed.
pub fn next_step(profile: &Profile) -> NextStep {
    match (&profile.username, profile.onboarding_completed) {
        (Some(_), true) => NextStep::Dashboard,
        _ => NextStep::Onboarding,
    }
}
