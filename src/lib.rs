//! # School Access
//!
//! This crate provides a role-based access control decision engine for
//! school administration platforms: given an actor's primary role and
//! optional secondary affiliation, it determines whether a requested action
//! on a resource is permitted, explains why, and records every decision in
//! a filterable audit trail.
//!
//! ## Features
//!
//! - Static permission catalog with stable `"<resource>.<action>"` ids
//! - Baseline permissions per role plus additive affiliation grants
//! - Advisory role/affiliation combination validation
//! - Total, fail-closed grant evaluation (checks never error)
//! - Mandatory, concurrency-safe audit trail with filtered queries
//! - Explicit, bounded audit retention pruning
//! - JSON matrix export/import for operational tooling
//! - Thread-safe implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use school_access::{AccessEngine, AuditFilter, RequestContext, Role};
//!
//! // One engine per process, built over the static school tables.
//! let engine = AccessEngine::new();
//!
//! // Check a permission; the decision is audited unconditionally.
//! let context = RequestContext::for_user("principal-1").with_ip("10.0.0.7");
//! let decision = engine.has_permission(Role::Admin, None, "academic.grades.view", &context);
//!
//! assert!(decision.can_access);
//! assert_eq!(decision.reason, "granted via role");
//!
//! // Review the trail.
//! let entries = engine.audit_logs(&AuditFilter::new());
//! assert_eq!(entries.len(), 1);
//! assert!(entries[0].granted);
//! ```
//!
//! ## Audit Logging
//!
//! When the `audit` feature is enabled, every decision is also logged
//! through the standard logging framework. To enable log output:
//!
//! ```rust
//! use school_access::init_audit_logger;
//!
//! // Initialize logging (must be called early in program execution)
//! init_audit_logger();
//!
//! // Configure log level through RUST_LOG environment variable:
//! // RUST_LOG=info,school_access=debug
//! ```
//!
//! Granted decisions are logged at info level and denials at warn level;
//! the durable audit trail in [`AuditLogStore`] is written regardless of
//! this feature.

#[cfg(feature = "audit")]
pub fn init_audit_logger() {
    env_logger::init();
}

pub mod audit;
pub mod combination;
pub mod context;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod permission;
pub mod query;
pub mod role;

#[cfg(feature = "persistence")]
pub mod export;

#[cfg(test)]
mod property_tests;

// Re-export main types for convenience
pub use crate::{
    audit::{AuditFilter, AuditLogEntry, AuditLogStore},
    combination::CombinationValidator,
    context::RequestContext,
    engine::{AccessDecision, AccessEngine, AccessEngineConfig},
    error::{Error, Result},
    matrix::RolePermissionMatrix,
    metrics::{EngineMetrics, MetricsSnapshot},
    permission::{Permission, PermissionCatalog},
    query::{AccessQuery, EngineQuery},
    role::{Role, SecondaryAffiliation},
};
