//! Role capability descriptors
//!
//! Each role carries a fixed capability set; the routing engine and the
//! thread manager consume these flags instead of re-deriving them from the
//! role in multiple places.

use shared::models::StaffRole;

/// Capability flags for a staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCapabilities {
    /// May reply inside visible threads
    pub can_reply: bool,
    /// May start a new thread to a member
    pub can_initiate: bool,
    /// May change a thread's display tag
    pub can_retag: bool,
    /// May re-route a thread to a different type
    pub can_move: bool,
    /// May scan member passes at the door
    pub can_scan: bool,
    /// Sees threads but never writes (barback)
    pub read_only: bool,
}

impl RoleCapabilities {
    /// Capability set for a role
    pub fn for_role(role: StaffRole) -> Self {
        match role {
            StaffRole::Owner => Self {
                can_reply: true,
                can_initiate: true,
                can_retag: false, // owner re-routes via move instead
                can_move: true,
                can_scan: true,
                read_only: false,
            },
            StaffRole::Manager | StaffRole::VipHost => Self {
                can_reply: true,
                can_initiate: true,
                can_retag: true,
                can_move: false,
                can_scan: true,
                read_only: false,
            },
            StaffRole::Waitress => Self {
                can_reply: true,
                can_initiate: false,
                can_retag: false,
                can_move: false,
                can_scan: true,
                read_only: false,
            },
            StaffRole::Doorman => Self {
                can_reply: true,
                can_initiate: false,
                can_retag: false,
                can_move: false,
                can_scan: true,
                read_only: false,
            },
            StaffRole::Barback => Self {
                can_reply: false,
                can_initiate: false,
                can_retag: false,
                can_move: false,
                can_scan: false,
                read_only: true,
            },
            StaffRole::Bartender => Self {
                can_reply: true,
                can_initiate: false,
                can_retag: false,
                can_move: false,
                can_scan: false,
                read_only: false,
            },
        }
    }
}

impl From<StaffRole> for RoleCapabilities {
    fn from(role: StaffRole) -> Self {
        Self::for_role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barback_is_read_only() {
        let caps = RoleCapabilities::for_role(StaffRole::Barback);
        assert!(caps.read_only);
        assert!(!caps.can_reply);
    }

    #[test]
    fn only_owner_moves_only_managers_retag() {
        assert!(RoleCapabilities::for_role(StaffRole::Owner).can_move);
        assert!(!RoleCapabilities::for_role(StaffRole::Owner).can_retag);
        assert!(RoleCapabilities::for_role(StaffRole::Manager).can_retag);
        assert!(RoleCapabilities::for_role(StaffRole::VipHost).can_retag);
        assert!(!RoleCapabilities::for_role(StaffRole::Waitress).can_retag);
    }
}
