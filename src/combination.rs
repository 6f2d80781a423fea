//! Role/affiliation combination validation.
//!
//! A static compatibility table records which secondary affiliations
//! legitimately pair with which primary roles. The validator is advisory: it
//! backs the operator-facing "validate" action but is not consulted on the
//! grant path. Invalid pairings are expected to be prevented at
//! account-provisioning time, and an unsanctioned pairing simply contributes
//! no incremental grants during evaluation.

use crate::role::{Role, SecondaryAffiliation};

/// Sanctioned (role, affiliation) pairings.
const COMPATIBLE: &[(Role, SecondaryAffiliation)] = &[
    (Role::Teacher, SecondaryAffiliation::Staff),
    (Role::Teacher, SecondaryAffiliation::StudentCouncilAdvisor),
    (Role::Teacher, SecondaryAffiliation::VicePrincipal),
    (Role::Admin, SecondaryAffiliation::Staff),
    (Role::Parent, SecondaryAffiliation::Staff),
];

/// Validates role/affiliation combinations against the compatibility table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinationValidator;

impl CombinationValidator {
    /// Create a new validator over the built-in compatibility table.
    pub fn new() -> Self {
        Self
    }

    /// Check whether a combination is sanctioned. No affiliation is valid
    /// for every role.
    pub fn is_valid(&self, role: Role, affiliation: Option<SecondaryAffiliation>) -> bool {
        match affiliation {
            None => true,
            Some(affiliation) => COMPATIBLE.contains(&(role, affiliation)),
        }
    }

    /// All affiliations sanctioned for a role, in canonical order.
    pub fn valid_affiliations(&self, role: Role) -> Vec<SecondaryAffiliation> {
        SecondaryAffiliation::ALL
            .iter()
            .copied()
            .filter(|affiliation| COMPATIBLE.contains(&(role, *affiliation)))
            .collect()
    }
}
