//! Error types for the access control engine.

use thiserror::Error;

/// The main error type for access control operations.
///
/// Grant evaluation itself is total and never returns an error; these
/// variants cover table construction, parsing at the edges, and export I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// A matrix entry references a permission id that is not in the catalog.
    /// Raised once when tables are built, never during grant evaluation.
    #[error("Permission '{permission_id}' referenced by {referenced_by} is not in the catalog")]
    UnknownPermission {
        /// The dangling permission id.
        permission_id: String,
        /// The matrix entry that referenced it (e.g. "role 'teacher'").
        referenced_by: String,
    },

    /// A string could not be parsed as a primary role.
    #[error("Unknown role: '{0}'")]
    InvalidRole(String),

    /// A string could not be parsed as a secondary affiliation.
    #[error("Unknown affiliation: '{0}'")]
    InvalidAffiliation(String),

    /// An export document key did not match "<role>" or "<role>-<affiliation>".
    #[cfg(feature = "persistence")]
    #[error("Invalid export key: '{0}'")]
    InvalidExportKey(String),

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing or reading an export file failed.
    #[cfg(feature = "persistence")]
    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type alias for access control operations.
pub type Result<T> = std::result::Result<T, Error>;
