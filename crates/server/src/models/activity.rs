//! Admin activity trail.

use serde::{Deserialize, Serialize};

/// One recorded admin action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub username: String,
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub timestamp: String,
}

/// Client-submitted log entry. A missing timestamp is filled in server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivityLog {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub timestamp: Option<String>,
}
