//! User role models
//!
//! Authentication lives outside this core; callers supply opaque user ids
//! and perform the role check before invoking write operations. The role
//! enum is shared so the HTTP wrapper and the core agree on its spelling.

use serde::{Deserialize, Serialize};

/// Roles recognized by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Administers the catalog and resolves stock requests
    Admin,
    /// Records usage in the field and submits stock requests
    Supervisor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Supervisor => "supervisor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "supervisor" => Some(UserRole::Supervisor),
            _ => None,
        }
    }
}
