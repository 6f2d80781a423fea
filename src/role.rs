//! Primary roles and secondary affiliations.
//!
//! Both vocabularies are closed enumerations: adding a role or affiliation is
//! a single change point here, and every table that consumes them (the
//! permission matrix, the combination validator) is matched exhaustively, so
//! the compiler flags any table a new variant is missing from.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// An actor's primary organizational category. Exactly one per actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(rename_all = "kebab-case"))]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Teaching staff member.
    Teacher,
    /// Enrolled student.
    Student,
    /// Parent or guardian of a student.
    Parent,
}

impl Role {
    /// All primary roles, in canonical order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Parent];

    /// Get the stable string form used in export keys and audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }
}

/// An optional secondary role layered on a primary role. At most one per
/// actor; it can only widen access, never narrow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(rename_all = "kebab-case"))]
pub enum SecondaryAffiliation {
    /// General staff membership (schedules, facilities).
    Staff,
    /// Faculty advisor to the student council.
    StudentCouncilAdvisor,
    /// Vice-principal duties on top of a teaching role.
    VicePrincipal,
}

impl SecondaryAffiliation {
    /// All secondary affiliations, in canonical order.
    pub const ALL: [SecondaryAffiliation; 3] = [
        SecondaryAffiliation::Staff,
        SecondaryAffiliation::StudentCouncilAdvisor,
        SecondaryAffiliation::VicePrincipal,
    ];

    /// Get the stable string form used in export keys and audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecondaryAffiliation::Staff => "staff",
            SecondaryAffiliation::StudentCouncilAdvisor => "student-council-advisor",
            SecondaryAffiliation::VicePrincipal => "vice-principal",
        }
    }
}

impl fmt::Display for SecondaryAffiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecondaryAffiliation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(SecondaryAffiliation::Staff),
            "student-council-advisor" => Ok(SecondaryAffiliation::StudentCouncilAdvisor),
            "vice-principal" => Ok(SecondaryAffiliation::VicePrincipal),
            other => Err(Error::InvalidAffiliation(other.to_string())),
        }
    }
}
