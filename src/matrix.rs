//! Role-permission and role-affiliation matrices.
//!
//! The matrix maps every primary role to its baseline permission ids and
//! every sanctioned (role, affiliation) pairing to the incremental ids that
//! pairing adds. Composition is strictly additive: resolving a role with an
//! affiliation always yields a superset of the role's baseline, so an
//! affiliation can widen access but never revoke it.
//!
//! Every id referenced by either table is validated against the catalog when
//! the matrix is built. A dangling reference fails construction with
//! [`Error::UnknownPermission`] and can never surface during grant
//! evaluation.

use crate::{
    error::{Error, Result},
    permission::{Permission, PermissionCatalog},
    role::{Role, SecondaryAffiliation},
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// The static permission matrix: baseline grants per role plus incremental
/// grants per sanctioned (role, affiliation) pairing.
#[derive(Debug, Clone)]
pub struct RolePermissionMatrix {
    catalog: Arc<PermissionCatalog>,
    baseline: HashMap<Role, BTreeSet<String>>,
    grants: HashMap<(Role, SecondaryAffiliation), BTreeSet<String>>,
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl RolePermissionMatrix {
    /// Build a matrix from explicit tables, validating every referenced id
    /// against the catalog. Roles absent from `baseline` get an empty
    /// baseline set.
    pub fn from_tables<B, G>(catalog: Arc<PermissionCatalog>, baseline: B, grants: G) -> Result<Self>
    where
        B: IntoIterator<Item = (Role, Vec<String>)>,
        G: IntoIterator<Item = ((Role, SecondaryAffiliation), Vec<String>)>,
    {
        let mut baseline_sets: HashMap<Role, BTreeSet<String>> = Role::ALL
            .iter()
            .map(|role| (*role, BTreeSet::new()))
            .collect();

        for (role, permission_ids) in baseline {
            let set = baseline_sets.entry(role).or_default();
            for id in permission_ids {
                if !catalog.contains(&id) {
                    return Err(Error::UnknownPermission {
                        permission_id: id,
                        referenced_by: format!("role '{role}'"),
                    });
                }
                set.insert(id);
            }
        }

        let mut grant_sets: HashMap<(Role, SecondaryAffiliation), BTreeSet<String>> =
            HashMap::new();

        for ((role, affiliation), permission_ids) in grants {
            let set = grant_sets.entry((role, affiliation)).or_default();
            for id in permission_ids {
                if !catalog.contains(&id) {
                    return Err(Error::UnknownPermission {
                        permission_id: id,
                        referenced_by: format!("pairing '{role}-{affiliation}'"),
                    });
                }
                set.insert(id);
            }
        }

        Ok(Self {
            catalog,
            baseline: baseline_sets,
            grants: grant_sets,
        })
    }

    /// The built-in matrix for the school administration platform.
    ///
    /// Panics only if the built-in tables reference an id missing from the
    /// built-in catalog, which is a fatal startup condition pinned by tests.
    pub fn school_matrix() -> Self {
        let catalog = Arc::new(PermissionCatalog::school_catalog());

        let baseline = [
            (
                Role::Admin,
                ids(&[
                    "academic.grades.view",
                    "academic.grades.edit",
                    "academic.attendance.view",
                    "academic.attendance.edit",
                    "academic.records.export",
                    "admin.users.manage",
                    "admin.users.delete",
                    "admin.settings.edit",
                    "admin.audit.view",
                    "communication.notices.send",
                    "communication.announcements.publish",
                ]),
            ),
            (
                Role::Teacher,
                ids(&[
                    "academic.grades.view",
                    "academic.grades.edit",
                    "academic.attendance.view",
                    "academic.attendance.edit",
                    "communication.notices.send",
                ]),
            ),
            (
                Role::Student,
                ids(&["academic.grades.view", "academic.attendance.view"]),
            ),
            (
                Role::Parent,
                ids(&[
                    "academic.grades.view",
                    "academic.attendance.view",
                    "communication.notices.send",
                ]),
            ),
        ];

        let grants = [
            (
                (Role::Teacher, SecondaryAffiliation::VicePrincipal),
                ids(&[
                    "admin.users.manage",
                    "admin.settings.edit",
                    "admin.audit.view",
                    "academic.records.export",
                ]),
            ),
            (
                (Role::Teacher, SecondaryAffiliation::StudentCouncilAdvisor),
                ids(&[
                    "council.activities.manage",
                    "communication.announcements.publish",
                ]),
            ),
            (
                (Role::Teacher, SecondaryAffiliation::Staff),
                ids(&["staff.schedule.view"]),
            ),
            (
                (Role::Admin, SecondaryAffiliation::Staff),
                ids(&["staff.schedule.view"]),
            ),
            (
                (Role::Parent, SecondaryAffiliation::Staff),
                ids(&["staff.schedule.view"]),
            ),
        ];

        Self::from_tables(catalog, baseline, grants)
            .expect("built-in permission tables are internally consistent")
    }

    /// The catalog this matrix was validated against.
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Shared handle to the catalog.
    pub fn catalog_arc(&self) -> Arc<PermissionCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Baseline permission ids held unconditionally by a role, sorted.
    pub fn baseline_ids(&self, role: Role) -> Vec<&str> {
        self.baseline
            .get(&role)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Incremental permission ids granted by a (role, affiliation) pairing,
    /// sorted. Unsanctioned pairings have no entry and yield an empty list.
    pub fn affiliation_ids(&self, role: Role, affiliation: SecondaryAffiliation) -> Vec<&str> {
        self.grants
            .get(&(role, affiliation))
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Check whether a role's baseline set contains a permission id.
    pub fn has_baseline(&self, role: Role, permission_id: &str) -> bool {
        self.baseline
            .get(&role)
            .is_some_and(|set| set.contains(permission_id))
    }

    /// Check whether a pairing's incremental grants contain a permission id.
    /// `None` affiliation never grants anything beyond the baseline.
    pub fn has_affiliation_grant(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        permission_id: &str,
    ) -> bool {
        affiliation.is_some_and(|affiliation| {
            self.grants
                .get(&(role, affiliation))
                .is_some_and(|set| set.contains(permission_id))
        })
    }

    /// The effective permission ids for a role with an optional affiliation:
    /// the union of the baseline and the pairing's incremental grants. With
    /// no affiliation this is exactly the baseline.
    pub fn effective_ids(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
    ) -> BTreeSet<&str> {
        let mut set: BTreeSet<&str> = self
            .baseline
            .get(&role)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
            .collect();

        if let Some(affiliation) = affiliation {
            if let Some(extra) = self.grants.get(&(role, affiliation)) {
                set.extend(extra.iter().map(String::as_str));
            }
        }

        set
    }

    /// Resolve a role's baseline permission set.
    pub fn permissions_for_role(&self, role: Role) -> Vec<&Permission> {
        self.baseline
            .get(&role)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    /// Resolve the effective permission set for a role with an optional
    /// affiliation, sorted by permission id.
    pub fn permissions_for_role_affiliation(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
    ) -> Vec<&Permission> {
        self.effective_ids(role, affiliation)
            .into_iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }
}

impl Default for RolePermissionMatrix {
    fn default() -> Self {
        Self::school_matrix()
    }
}
