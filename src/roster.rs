use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// One staff entry. `name` is the natural key; the roster does not reject
/// duplicate names itself, so callers must not enroll the same name twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    /// Service names this member can perform, matched case-insensitively.
    pub specializations: Vec<String>,
    pub salary: u32,
}

/// Owns the staff list and answers qualification queries over it.
#[derive(Debug, Default)]
pub struct StaffRoster {
    members: Vec<StaffMember>,
}

impl StaffRoster {
    pub fn new() -> Self {
        StaffRoster {
            members: Vec::new(),
        }
    }

    pub fn from_records(members: Vec<StaffMember>) -> Self {
        StaffRoster { members }
    }

    /// Appends a new staff entry.
    pub fn enroll(&mut self, name: String, specializations: Vec<String>, salary: u32) {
        self.members.push(StaffMember {
            name,
            specializations,
            salary,
        });
    }

    /// Removes the first entry matching `name` exactly (case-sensitive),
    /// returning it.
    pub fn terminate(&mut self, name: &str) -> Result<StaffMember, DeskError> {
        let index = self
            .members
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| DeskError::not_found(format!("staff member {name}")))?;
        Ok(self.members.remove(index))
    }

    /// Names of every member qualified for the whole requested set, in
    /// roster order. Specialization tokens are trimmed and compared
    /// case-insensitively. An empty request qualifies everyone.
    pub fn qualified(&self, services: &[String]) -> Vec<String> {
        self.members
            .iter()
            .filter(|member| {
                let specs: Vec<String> = member
                    .specializations
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .collect();
                services.iter().all(|s| specs.contains(&s.to_lowercase()))
            })
            .map(|member| member.name.clone())
            .collect()
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_roster() -> StaffRoster {
        let mut roster = StaffRoster::new();
        roster.enroll("Asha".to_string(), names(&["Haircut", "Shaving"]), 15000);
        roster.enroll(
            "Rohit".to_string(),
            names(&["Haircut", "Hair Coloring", "Facial"]),
            18000,
        );
        roster
    }

    #[test]
    fn qualification_is_case_insensitive() {
        let roster = sample_roster();
        assert_eq!(
            roster.qualified(&names(&["haircut"])),
            vec!["Asha".to_string(), "Rohit".to_string()]
        );
    }

    #[test]
    fn every_requested_service_must_be_covered() {
        let roster = sample_roster();
        assert_eq!(
            roster.qualified(&names(&["Haircut", "Facial"])),
            vec!["Rohit".to_string()]
        );
        assert!(roster.qualified(&names(&["Haircut", "Massage"])).is_empty());
    }

    #[test]
    fn empty_request_qualifies_the_whole_roster_in_order() {
        let roster = sample_roster();
        assert_eq!(
            roster.qualified(&[]),
            vec!["Asha".to_string(), "Rohit".to_string()]
        );
    }

    #[test]
    fn specialization_tokens_are_trimmed() {
        let mut roster = StaffRoster::new();
        roster.enroll("Mira".to_string(), names(&[" Haircut ", "Facial "]), 12000);
        assert_eq!(roster.qualified(&names(&["Haircut"])), vec!["Mira".to_string()]);
    }

    #[test]
    fn terminate_removes_the_first_exact_match() {
        let mut roster = sample_roster();
        roster.enroll("Asha".to_string(), names(&["Massage"]), 9000);
        let removed = roster.terminate("Asha").unwrap();
        assert_eq!(removed.salary, 15000);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn terminate_is_case_sensitive_and_fails_when_absent() {
        let mut roster = sample_roster();
        assert_eq!(
            roster.terminate("asha"),
            Err(DeskError::not_found("staff member asha"))
        );
        assert_eq!(roster.len(), 2);
    }
}
