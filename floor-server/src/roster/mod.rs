//! 名册 — members, floor staff, promoters
//!
//! In-memory roster behind one store; callers never hold direct references
//! into the collections. Mutations persist fire-and-forget.

use crate::db::Persist;
use parking_lot::RwLock;
use shared::models::{Member, MemberCreate, Promoter, Staff, StaffCreate, StaffRole};
use shared::util::{now_millis, snowflake_id};
use std::collections::HashMap;

/// Roster store (会员/员工/推广员)
pub struct RosterStore {
    members: RwLock<HashMap<i64, Member>>,
    staff: RwLock<HashMap<i64, Staff>>,
    promoters: RwLock<HashMap<i64, Promoter>>,
    persist: Persist,
}

impl RosterStore {
    pub fn new(persist: Persist) -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
            staff: RwLock::new(HashMap::new()),
            promoters: RwLock::new(HashMap::new()),
            persist,
        }
    }

    // ==================== Members ====================

    pub fn add_member(&self, data: MemberCreate) -> Member {
        let member = Member {
            id: snowflake_id(),
            name: data.name,
            phone: data.phone,
            email: data.email,
            notes: data.notes,
            is_active: true,
            created_at: now_millis(),
        };
        self.members.write().insert(member.id, member.clone());
        self.persist.save_member(&member);
        member
    }

    pub fn member(&self, id: i64) -> Option<Member> {
        self.members.read().get(&id).cloned()
    }

    /// Comp issuance lookup: exact name or exact phone
    pub fn member_by_name_or_phone(&self, recipient: &str) -> Option<Member> {
        self.members
            .read()
            .values()
            .find(|m| m.name == recipient || m.phone.as_deref() == Some(recipient))
            .cloned()
    }

    /// Manual-entry match: phone equality first, then case-insensitive name
    pub fn match_member(&self, name: &str, phone: Option<&str>) -> Option<Member> {
        let members = self.members.read();
        members
            .values()
            .find(|m| phone.is_some() && m.phone.as_deref() == phone)
            .or_else(|| {
                members
                    .values()
                    .find(|m| m.name.eq_ignore_ascii_case(name))
            })
            .cloned()
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.read().values().cloned().collect()
    }

    // ==================== Staff ====================

    pub fn add_staff(&self, data: StaffCreate) -> Staff {
        let staff = Staff {
            id: snowflake_id(),
            name: data.name,
            role: data.role,
            section: data.section,
            active: true,
        };
        self.staff.write().insert(staff.id, staff.clone());
        self.persist.save_staff(&staff);
        staff
    }

    pub fn staff(&self, id: i64) -> Option<Staff> {
        self.staff.read().get(&id).cloned()
    }

    /// Active waitresses, for the seat-assignment picker
    pub fn waitresses(&self) -> Vec<Staff> {
        self.staff
            .read()
            .values()
            .filter(|s| s.role == StaffRole::Waitress && s.active)
            .cloned()
            .collect()
    }

    /// Active staff holding a given role
    pub fn active_staff_with_role(&self, role: StaffRole) -> Vec<Staff> {
        self.staff
            .read()
            .values()
            .filter(|s| s.role == role && s.active)
            .cloned()
            .collect()
    }

    /// Day off / reactivate
    pub fn set_staff_active(&self, id: i64, active: bool) -> Option<Staff> {
        let mut staff = self.staff.write();
        let entry = staff.get_mut(&id)?;
        entry.active = active;
        let updated = entry.clone();
        drop(staff);
        self.persist.save_staff(&updated);
        Some(updated)
    }

    /// Remove from the roster entirely
    pub fn archive_staff(&self, id: i64) -> Option<Staff> {
        self.staff.write().remove(&id)
    }

    pub fn assign_section(&self, id: i64, section: Option<String>) -> Option<Staff> {
        let mut staff = self.staff.write();
        let entry = staff.get_mut(&id)?;
        entry.section = section;
        let updated = entry.clone();
        drop(staff);
        self.persist.save_staff(&updated);
        Some(updated)
    }

    // ==================== Promoters ====================

    pub fn add_promoter(&self, name: impl Into<String>) -> Promoter {
        let promoter = Promoter {
            id: snowflake_id(),
            name: name.into(),
            active: true,
            guest_list: Vec::new(),
            nights: Vec::new(),
        };
        self.promoters.write().insert(promoter.id, promoter.clone());
        self.persist.save_promoter(&promoter);
        promoter
    }

    pub fn promoter(&self, id: i64) -> Option<Promoter> {
        self.promoters.read().get(&id).cloned()
    }

    pub fn set_promoter_active(&self, id: i64, active: bool) -> Option<Promoter> {
        let mut promoters = self.promoters.write();
        let entry = promoters.get_mut(&id)?;
        entry.active = active;
        let updated = entry.clone();
        drop(promoters);
        self.persist.save_promoter(&updated);
        Some(updated)
    }

    /// Append a referred guest to the promoter's list (deduplicated)
    pub fn add_promoter_guest(&self, id: i64, guest_name: &str) -> Option<Promoter> {
        let mut promoters = self.promoters.write();
        let entry = promoters.get_mut(&id)?;
        if !entry.guest_list.iter().any(|g| g == guest_name) {
            entry.guest_list.push(guest_name.to_string());
        }
        let updated = entry.clone();
        drop(promoters);
        self.persist.save_promoter(&updated);
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RosterStore {
        RosterStore::new(Persist::noop())
    }

    #[test]
    fn member_match_prefers_phone() {
        let roster = store();
        let by_phone = roster.add_member(MemberCreate {
            name: "Ava Chen".into(),
            phone: Some("555-0101".into()),
            email: None,
            notes: None,
        });
        roster.add_member(MemberCreate {
            name: "ava chen".into(),
            phone: Some("555-0202".into()),
            email: None,
            notes: None,
        });

        let matched = roster.match_member("Ava Chen", Some("555-0101")).unwrap();
        assert_eq!(matched.id, by_phone.id);
    }

    #[test]
    fn member_match_falls_back_to_name_case_insensitive() {
        let roster = store();
        let m = roster.add_member(MemberCreate {
            name: "Jordan Reyes".into(),
            phone: None,
            email: None,
            notes: None,
        });
        let matched = roster.match_member("jordan reyes", None).unwrap();
        assert_eq!(matched.id, m.id);
    }

    #[test]
    fn waitresses_filters_role_and_active() {
        let roster = store();
        let w1 = roster.add_staff(StaffCreate {
            name: "Dana".into(),
            role: StaffRole::Waitress,
            section: Some("North".into()),
        });
        let w2 = roster.add_staff(StaffCreate {
            name: "Mia".into(),
            role: StaffRole::Waitress,
            section: None,
        });
        roster.add_staff(StaffCreate {
            name: "Theo".into(),
            role: StaffRole::Barback,
            section: None,
        });
        roster.set_staff_active(w2.id, false);

        let waitresses = roster.waitresses();
        assert_eq!(waitresses.len(), 1);
        assert_eq!(waitresses[0].id, w1.id);
    }

    #[test]
    fn promoter_guest_list_deduplicates() {
        let roster = store();
        let p = roster.add_promoter("Rico");
        roster.add_promoter_guest(p.id, "Ava Chen");
        roster.add_promoter_guest(p.id, "Ava Chen");
        let p = roster.promoter(p.id).unwrap();
        assert_eq!(p.guest_list, vec!["Ava Chen".to_string()]);
    }
}
