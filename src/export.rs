//! JSON matrix export and import for operational tooling.
//!
//! An export document is shaped as
//! `{ "<role>": ["<permissionId>", ...], "<role>-<affiliation>": [...] }`:
//! the role key carries the baseline permission ids and the pairing key
//! carries the pairing's incremental grants, mirroring the matrix structure.
//! Reloading a document into a fresh catalog reproduces identical decisions
//! for every exported id.

use crate::{
    error::{Error, Result},
    matrix::RolePermissionMatrix,
    permission::PermissionCatalog,
    role::{Role, SecondaryAffiliation},
};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Build the export document for a role and optional affiliation.
pub fn export_document(
    matrix: &RolePermissionMatrix,
    role: Role,
    affiliation: Option<SecondaryAffiliation>,
) -> BTreeMap<String, Vec<String>> {
    let mut document = BTreeMap::new();

    document.insert(
        role.to_string(),
        matrix
            .baseline_ids(role)
            .into_iter()
            .map(str::to_string)
            .collect(),
    );

    if let Some(affiliation) = affiliation {
        document.insert(
            format!("{role}-{affiliation}"),
            matrix
                .affiliation_ids(role, affiliation)
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
    }

    document
}

/// Serialize the export document for a role and optional affiliation.
pub fn export_json(
    matrix: &RolePermissionMatrix,
    role: Role,
    affiliation: Option<SecondaryAffiliation>,
) -> Result<String> {
    let document = export_document(matrix, role, affiliation);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// The download file name for an export, encoding the queried role and
/// affiliation: `permissions-<role>[-<affiliation>].json`.
pub fn export_file_name(role: Role, affiliation: Option<SecondaryAffiliation>) -> String {
    match affiliation {
        Some(affiliation) => format!("permissions-{role}-{affiliation}.json"),
        None => format!("permissions-{role}.json"),
    }
}

/// Write the export document to `dir`, returning the written path.
pub fn write_export(
    dir: impl AsRef<Path>,
    matrix: &RolePermissionMatrix,
    role: Role,
    affiliation: Option<SecondaryAffiliation>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .map_err(|e| Error::Export(format!("Failed to create export directory: {e}")))?;

    let path = dir.join(export_file_name(role, affiliation));
    let file = File::create(&path)
        .map_err(|e| Error::Export(format!("Failed to create export file: {e}")))?;

    let writer = BufWriter::new(file);
    let document = export_document(matrix, role, affiliation);
    serde_json::to_writer_pretty(writer, &document)?;

    Ok(path)
}

/// Parse an export key into its role and optional affiliation.
fn parse_export_key(key: &str) -> Result<(Role, Option<SecondaryAffiliation>)> {
    if let Ok(role) = Role::from_str(key) {
        return Ok((role, None));
    }

    for role in Role::ALL {
        if let Some(rest) = key.strip_prefix(role.as_str()) {
            if let Some(rest) = rest.strip_prefix('-') {
                if let Ok(affiliation) = SecondaryAffiliation::from_str(rest) {
                    return Ok((role, Some(affiliation)));
                }
            }
        }
    }

    Err(Error::InvalidExportKey(key.to_string()))
}

/// Rebuild a matrix from an export document, validating every id against
/// `catalog`. Roles absent from the document get an empty baseline.
pub fn import_document(
    catalog: Arc<PermissionCatalog>,
    document: &BTreeMap<String, Vec<String>>,
) -> Result<RolePermissionMatrix> {
    let mut baseline = Vec::new();
    let mut grants = Vec::new();

    for (key, permission_ids) in document {
        match parse_export_key(key)? {
            (role, None) => baseline.push((role, permission_ids.clone())),
            (role, Some(affiliation)) => {
                grants.push(((role, affiliation), permission_ids.clone()))
            }
        }
    }

    RolePermissionMatrix::from_tables(catalog, baseline, grants)
}

/// Rebuild a matrix from exported JSON.
pub fn import_json(catalog: Arc<PermissionCatalog>, json: &str) -> Result<RolePermissionMatrix> {
    let document: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
    import_document(catalog, &document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name_encodes_query() {
        assert_eq!(export_file_name(Role::Admin, None), "permissions-admin.json");
        assert_eq!(
            export_file_name(Role::Teacher, Some(SecondaryAffiliation::VicePrincipal)),
            "permissions-teacher-vice-principal.json"
        );
    }

    #[test]
    fn test_export_document_shape() {
        let matrix = RolePermissionMatrix::school_matrix();
        let document = export_document(
            &matrix,
            Role::Teacher,
            Some(SecondaryAffiliation::StudentCouncilAdvisor),
        );

        assert_eq!(document.len(), 2);
        assert!(document.contains_key("teacher"));
        assert!(document.contains_key("teacher-student-council-advisor"));
        assert!(document["teacher"].contains(&"academic.grades.view".to_string()));
        assert!(document["teacher-student-council-advisor"]
            .contains(&"council.activities.manage".to_string()));
    }

    #[test]
    fn test_export_without_affiliation_has_single_key() {
        let matrix = RolePermissionMatrix::school_matrix();
        let document = export_document(&matrix, Role::Student, None);
        assert_eq!(document.len(), 1);
        assert_eq!(document["student"].len(), 2);
    }

    #[test]
    fn test_parse_export_key() {
        assert_eq!(parse_export_key("admin").unwrap(), (Role::Admin, None));
        assert_eq!(
            parse_export_key("teacher-vice-principal").unwrap(),
            (Role::Teacher, Some(SecondaryAffiliation::VicePrincipal))
        );
        assert!(parse_export_key("janitor").is_err());
        assert!(parse_export_key("teacher-janitor").is_err());
    }

    #[test]
    fn test_import_rejects_unknown_ids() {
        let catalog = Arc::new(PermissionCatalog::school_catalog());
        let mut document = BTreeMap::new();
        document.insert(
            "student".to_string(),
            vec!["no.such.permission".to_string()],
        );

        assert!(matches!(
            import_document(catalog, &document),
            Err(Error::UnknownPermission { .. })
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_grants() {
        let matrix = RolePermissionMatrix::school_matrix();
        let json = export_json(&matrix, Role::Teacher, Some(SecondaryAffiliation::VicePrincipal))
            .unwrap();

        let imported = import_json(matrix.catalog_arc(), &json).unwrap();

        let original = matrix.effective_ids(Role::Teacher, Some(SecondaryAffiliation::VicePrincipal));
        let reloaded =
            imported.effective_ids(Role::Teacher, Some(SecondaryAffiliation::VicePrincipal));
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_write_export_creates_named_file() {
        let matrix = RolePermissionMatrix::school_matrix();
        let dir = std::env::temp_dir().join("school-access-export-test");

        let path = write_export(&dir, &matrix, Role::Admin, Some(SecondaryAffiliation::Staff))
            .unwrap();
        assert!(path.ends_with("permissions-admin-staff.json"));
        assert!(path.exists());

        let json = fs::read_to_string(&path).unwrap();
        let imported = import_json(matrix.catalog_arc(), &json).unwrap();
        assert!(imported.has_baseline(Role::Admin, "admin.users.delete"));

        let _ = fs::remove_file(&path);
    }
}
