//! Staff Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Front-of-house staff role
///
/// Routing and capabilities key off this enum; the auth/session layer
/// supplies it as an opaque fact, credentials are never checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaffRole {
    Owner,
    Manager,
    VipHost,
    Waitress,
    Barback,
    Doorman,
    Bartender,
}

impl StaffRole {
    /// Display label (`VIP Host`, `Doorman`, …)
    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Owner => "Owner",
            StaffRole::Manager => "Manager",
            StaffRole::VipHost => "VIP Host",
            StaffRole::Waitress => "Waitress",
            StaffRole::Barback => "Barback",
            StaffRole::Doorman => "Doorman",
            StaffRole::Bartender => "Bartender",
        }
    }

    /// Wire form (`vip-host`, `doorman`, …)
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Manager => "manager",
            StaffRole::VipHost => "vip-host",
            StaffRole::Waitress => "waitress",
            StaffRole::Barback => "barback",
            StaffRole::Doorman => "doorman",
            StaffRole::Bartender => "bartender",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff entity (floor roster)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub role: StaffRole,
    /// Assigned floor section for tonight, if any
    pub section: Option<String>,
    pub active: bool,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub role: StaffRole,
    pub section: Option<String>,
}

/// Viewer identity handed in by the auth/session layer
///
/// The core treats this as opaque input; credential checks live with the
/// host's auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub role: StaffRole,
    pub staff_id: Option<i64>,
    /// Assigned section, carried for display; not a visibility path
    pub assigned_section: Option<String>,
}

impl Viewer {
    pub fn new(role: StaffRole, staff_id: Option<i64>) -> Self {
        Self {
            role,
            staff_id,
            assigned_section: None,
        }
    }
}
