//! The access decision engine.
//!
//! Composes the permission catalog, the role/affiliation matrix, and the
//! combination validator to answer grant queries, and writes every answer to
//! the audit log store. Auditing is a mandatory side effect of evaluation,
//! never optional.
//!
//! # Failure semantics
//!
//! Authorization queries are total functions: they never return an error on
//! any input. An unknown permission id resolves to a denial with reason
//! "permission not found". A throwing authorization check risks callers
//! catching the error and failing open, which is unacceptable for a security
//! gate.

#[cfg(feature = "audit")]
use log::{info, warn};

use crate::{
    audit::{AuditFilter, AuditLogEntry, AuditLogStore},
    combination::CombinationValidator,
    context::RequestContext,
    matrix::RolePermissionMatrix,
    metrics::EngineMetrics,
    permission::{split_permission_id, PermissionCatalog},
    role::{Role, SecondaryAffiliation},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Reason string for a grant satisfied by the role's baseline set.
pub const REASON_GRANTED_ROLE: &str = "granted via role";
/// Reason string for a grant satisfied by an affiliation's incremental set.
pub const REASON_GRANTED_AFFILIATION: &str = "granted via affiliation";
/// Reason string for an id missing from the catalog.
pub const REASON_NOT_FOUND: &str = "permission not found";
/// Reason string for a known id the actor does not hold.
pub const REASON_INSUFFICIENT: &str = "insufficient permissions";
/// Aggregate reason when at least one candidate id is held.
pub const REASON_ANY_GRANTED: &str = "at least one permission granted";
/// Aggregate reason when no candidate id is held.
pub const REASON_ANY_DENIED: &str = "none of the requested permissions granted";
/// Aggregate reason for an empty candidate list (vacuous OR).
pub const REASON_ANY_EMPTY: &str = "no permissions requested";

/// The outcome of one access check. Transient; the durable record is the
/// corresponding [`AuditLogEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether access is granted.
    pub can_access: bool,
    /// Short user-facing explanation, surfaced directly in notifications.
    pub reason: String,
    /// The permission id the check concerned. For a multi-id check this is
    /// the satisfied id, or all candidate ids joined with " | " on denial.
    pub required_permission: String,
}

impl AccessDecision {
    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.can_access
    }

    /// Returns true if access was denied.
    pub fn is_denied(&self) -> bool {
        !self.can_access
    }
}

/// Configuration for the access engine.
#[derive(Debug, Clone)]
pub struct AccessEngineConfig {
    /// Whether to emit a log line per decision through the logging facade.
    /// Has no effect unless the `audit` feature is enabled.
    pub log_decisions: bool,
}

impl Default for AccessEngineConfig {
    fn default() -> Self {
        Self {
            log_decisions: true,
        }
    }
}

/// Result of resolving one permission id against the effective set.
#[derive(Debug, Clone)]
struct Evaluation {
    granted: bool,
    reason: &'static str,
    resource: String,
    action: String,
}

/// The role-based access decision engine.
///
/// All grant evaluation is synchronous and reads only immutable tables; the
/// audit store is the single shared mutable resource and handles its own
/// locking, so the engine can be shared freely across threads.
pub struct AccessEngine {
    config: AccessEngineConfig,
    matrix: RolePermissionMatrix,
    validator: CombinationValidator,
    audit: Arc<AuditLogStore>,
    metrics: EngineMetrics,
}

impl AccessEngine {
    /// Create an engine over the built-in school tables.
    pub fn new() -> Self {
        Self::with_config(AccessEngineConfig::default())
    }

    /// Create an engine over the built-in school tables with custom
    /// configuration.
    pub fn with_config(config: AccessEngineConfig) -> Self {
        Self::with_tables(
            config,
            RolePermissionMatrix::school_matrix(),
            CombinationValidator::new(),
        )
    }

    /// Create an engine from an already-validated matrix and validator.
    /// Matrix construction is where dangling permission ids are rejected.
    pub fn with_tables(
        config: AccessEngineConfig,
        matrix: RolePermissionMatrix,
        validator: CombinationValidator,
    ) -> Self {
        Self {
            config,
            matrix,
            validator,
            audit: Arc::new(AuditLogStore::new()),
            metrics: EngineMetrics::new(),
        }
    }

    /// Replace the engine's audit store with a shared one, so several
    /// engines (or an external viewer) can observe the same trail.
    pub fn with_audit_store(mut self, store: Arc<AuditLogStore>) -> Self {
        self.audit = store;
        self
    }

    /// The engine's configuration.
    pub fn config(&self) -> &AccessEngineConfig {
        &self.config
    }

    /// The permission catalog backing this engine.
    pub fn catalog(&self) -> &PermissionCatalog {
        self.matrix.catalog()
    }

    /// The role/affiliation permission matrix.
    pub fn matrix(&self) -> &RolePermissionMatrix {
        &self.matrix
    }

    /// The combination validator (advisory; see [`Self::is_valid_combination`]).
    pub fn validator(&self) -> &CombinationValidator {
        &self.validator
    }

    /// Shared handle to the audit store.
    pub fn audit_store(&self) -> Arc<AuditLogStore> {
        Arc::clone(&self.audit)
    }

    /// Operational counters.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Advisory check that a role/affiliation combination is sanctioned.
    ///
    /// Surfaced to operators; an invalid pairing does not force a deny on
    /// the grant path, it merely contributes no incremental grants there.
    pub fn is_valid_combination(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
    ) -> bool {
        self.validator.is_valid(role, affiliation)
    }

    /// Check whether an actor holds one permission.
    ///
    /// Appends exactly one audit entry carrying the inputs, the outcome, and
    /// the supplied context. Never fails: unknown ids deny with
    /// [`REASON_NOT_FOUND`].
    pub fn has_permission(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        permission_id: &str,
        context: &RequestContext,
    ) -> AccessDecision {
        let evaluation = self.evaluate(role, affiliation, permission_id);
        self.record(
            role,
            affiliation,
            &evaluation.resource,
            &evaluation.action,
            evaluation.granted,
            evaluation.reason,
            context,
        );

        AccessDecision {
            can_access: evaluation.granted,
            reason: evaluation.reason.to_string(),
            required_permission: permission_id.to_string(),
        }
    }

    /// Check whether an actor holds any of the candidate permissions.
    ///
    /// Logical OR over the same resolution as [`Self::has_permission`], but
    /// writes exactly one aggregate audit entry for the whole call. An empty
    /// candidate list is a denial by definition.
    pub fn has_any_permission<S: AsRef<str>>(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        permission_ids: &[S],
        context: &RequestContext,
    ) -> AccessDecision {
        if permission_ids.is_empty() {
            self.record(role, affiliation, "", "", false, REASON_ANY_EMPTY, context);
            return AccessDecision {
                can_access: false,
                reason: REASON_ANY_EMPTY.to_string(),
                required_permission: String::new(),
            };
        }

        // The aggregate entry records the granting permission's fields, or
        // the first candidate's when nothing matched.
        let first = self.evaluate(role, affiliation, permission_ids[0].as_ref());
        let fallback_fields = (first.resource.clone(), first.action.clone());

        let mut winner: Option<(usize, Evaluation)> = None;
        if first.granted {
            winner = Some((0, first));
        } else {
            for (index, id) in permission_ids.iter().enumerate().skip(1) {
                let evaluation = self.evaluate(role, affiliation, id.as_ref());
                if evaluation.granted {
                    winner = Some((index, evaluation));
                    break;
                }
            }
        }

        match winner {
            Some((index, evaluation)) => {
                self.record(
                    role,
                    affiliation,
                    &evaluation.resource,
                    &evaluation.action,
                    true,
                    REASON_ANY_GRANTED,
                    context,
                );
                AccessDecision {
                    can_access: true,
                    reason: REASON_ANY_GRANTED.to_string(),
                    required_permission: permission_ids[index].as_ref().to_string(),
                }
            }
            None => {
                self.record(
                    role,
                    affiliation,
                    &fallback_fields.0,
                    &fallback_fields.1,
                    false,
                    REASON_ANY_DENIED,
                    context,
                );
                let candidates: Vec<&str> =
                    permission_ids.iter().map(|id| id.as_ref()).collect();
                AccessDecision {
                    can_access: false,
                    reason: REASON_ANY_DENIED.to_string(),
                    required_permission: candidates.join(" | "),
                }
            }
        }
    }

    /// Query the audit trail. Supplied filter fields are ANDed; results are
    /// most-recent-first; an inverted date range yields an empty sequence.
    pub fn audit_logs(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        self.audit.query(filter)
    }

    /// Explicit retention pruning: drop audit entries older than `cutoff`.
    /// Returns the number of removed entries.
    pub fn prune_audit_before(&self, cutoff: DateTime<Utc>) -> usize {
        self.audit.prune_before(cutoff)
    }

    /// Resolve one id against the effective permission set for the actor.
    fn evaluate(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        permission_id: &str,
    ) -> Evaluation {
        match self.matrix.catalog().get(permission_id) {
            None => {
                let (resource, action) = split_permission_id(permission_id);
                Evaluation {
                    granted: false,
                    reason: REASON_NOT_FOUND,
                    resource,
                    action,
                }
            }
            Some(permission) => {
                let (resource, action) = (
                    permission.resource().to_string(),
                    permission.action().to_string(),
                );
                if self.matrix.has_baseline(role, permission_id) {
                    Evaluation {
                        granted: true,
                        reason: REASON_GRANTED_ROLE,
                        resource,
                        action,
                    }
                } else if self
                    .matrix
                    .has_affiliation_grant(role, affiliation, permission_id)
                {
                    Evaluation {
                        granted: true,
                        reason: REASON_GRANTED_AFFILIATION,
                        resource,
                        action,
                    }
                } else {
                    Evaluation {
                        granted: false,
                        reason: REASON_INSUFFICIENT,
                        resource,
                        action,
                    }
                }
            }
        }
    }

    /// Append the mandatory audit entry for a decision and update counters.
    #[allow(clippy::too_many_arguments)]
    fn record(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        resource: &str,
        action: &str,
        granted: bool,
        reason: &str,
        context: &RequestContext,
    ) {
        let entry = AuditLogEntry::new(role, affiliation, resource, action, granted, reason)
            .with_context(context);
        self.audit.append(entry);
        self.metrics.record_audit_append();
        self.metrics.record_decision(role, granted, reason);

        #[cfg(feature = "audit")]
        if self.config.log_decisions {
            if granted {
                info!(
                    "Access GRANTED for role '{role}' on '{resource}' action '{action}': {reason}"
                );
            } else {
                warn!(
                    "Access DENIED for role '{role}' on '{resource}' action '{action}': {reason}"
                );
            }
        }
    }
}

impl Default for AccessEngine {
    fn default() -> Self {
        Self::new()
    }
}
