//! Permission definitions and the static catalog.

use std::collections::HashMap;
use std::fmt;

/// A permission is an atomic capability describing one allowed action on a
/// resource, identified by a stable id of the form `"<resource>.<action>"`.
///
/// Permissions are created once from the static catalog table at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct Permission {
    /// Stable identifier, `"<resource>.<action>"`.
    id: String,
    /// Human-readable name.
    name: String,
    /// The resource this permission applies to (e.g. "academic.grades").
    resource: String,
    /// The action being performed (e.g. "view", "edit", "delete").
    action: String,
    /// Description shown in operator tooling.
    description: String,
}

impl Permission {
    /// Create a new permission. The id is derived as `"<resource>.<action>"`.
    pub fn new(
        resource: impl Into<String>,
        action: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let resource = resource.into();
        let action = action.into();

        if resource.trim().is_empty() || action.trim().is_empty() {
            panic!("Resource and action cannot be empty");
        }

        Self {
            id: format!("{resource}.{action}"),
            name: name.into(),
            resource,
            action,
            description: description.into(),
        }
    }

    /// Get the stable permission id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the resource this permission applies to.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Get the action this permission grants.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Get the description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Split a permission id into its best-effort (resource, action) parts.
///
/// The action is everything after the last `.`, matching how ids are built.
/// Used for audit enrichment when an unknown id cannot be resolved through
/// the catalog.
pub(crate) fn split_permission_id(id: &str) -> (String, String) {
    match id.rsplit_once('.') {
        Some((resource, action)) => (resource.to_string(), action.to_string()),
        None => (id.to_string(), String::new()),
    }
}

/// The static registry of all known permissions.
///
/// Populated once at process start; `all()` preserves registration order so
/// listings and exports are deterministic. Lookup never fails with an error,
/// keeping the hot grant path branch-only.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    permissions: Vec<Permission>,
    index: HashMap<String, usize>,
}

impl PermissionCatalog {
    /// Create a catalog from a list of permissions, preserving order.
    /// A duplicate id keeps the first registration.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut catalog = Self::default();
        for permission in permissions {
            if !catalog.index.contains_key(permission.id()) {
                catalog
                    .index
                    .insert(permission.id().to_string(), catalog.permissions.len());
                catalog.permissions.push(permission);
            }
        }
        catalog
    }

    /// The built-in catalog for the school administration platform.
    pub fn school_catalog() -> Self {
        Self::from_permissions([
            Permission::new(
                "academic.grades",
                "view",
                "View grades",
                "View student grade records",
            ),
            Permission::new(
                "academic.grades",
                "edit",
                "Edit grades",
                "Enter and correct student grades",
            ),
            Permission::new(
                "academic.attendance",
                "view",
                "View attendance",
                "View attendance records",
            ),
            Permission::new(
                "academic.attendance",
                "edit",
                "Edit attendance",
                "Record and correct attendance",
            ),
            Permission::new(
                "academic.records",
                "export",
                "Export academic records",
                "Export transcripts and record summaries",
            ),
            Permission::new(
                "admin.users",
                "manage",
                "Manage users",
                "Create and update user accounts",
            ),
            Permission::new(
                "admin.users",
                "delete",
                "Delete users",
                "Remove user accounts from the platform",
            ),
            Permission::new(
                "admin.settings",
                "edit",
                "Edit settings",
                "Change platform configuration",
            ),
            Permission::new(
                "admin.audit",
                "view",
                "View audit log",
                "Review recorded access decisions",
            ),
            Permission::new(
                "communication.notices",
                "send",
                "Send notices",
                "Send notices to classes and families",
            ),
            Permission::new(
                "communication.announcements",
                "publish",
                "Publish announcements",
                "Publish school-wide announcements",
            ),
            Permission::new(
                "council.activities",
                "manage",
                "Manage council activities",
                "Organize student council activities",
            ),
            Permission::new(
                "staff.schedule",
                "view",
                "View staff schedule",
                "View staff duty and meeting schedules",
            ),
        ])
    }

    /// All permissions in registration order.
    pub fn all(&self) -> &[Permission] {
        &self.permissions
    }

    /// Look up a permission by id. Absent ids yield `None`, never an error.
    pub fn get(&self, id: &str) -> Option<&Permission> {
        self.index.get(id).map(|&i| &self.permissions[i])
    }

    /// Check whether a permission id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of registered permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}
