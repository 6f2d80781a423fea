//! Read-only query facade over the access engine.
//!
//! The facade performs only argument shaping and default-context injection;
//! every decision still flows through the engine and is audited there.

use crate::{
    audit::{AuditFilter, AuditLogEntry},
    context::RequestContext,
    engine::{AccessDecision, AccessEngine},
    permission::Permission,
    role::{Role, SecondaryAffiliation},
};
use chrono::{Duration, Utc};

/// Read-only surface for callers: permission listing, resource sugar, and
/// audit viewing, bound to a caller identity whose fields are auto-filled
/// into decisions that omit them.
pub struct AccessQuery<'a> {
    engine: &'a AccessEngine,
    caller: RequestContext,
}

/// Trait for obtaining a query facade from an engine.
pub trait EngineQuery {
    /// Get an anonymous query facade.
    fn query(&self) -> AccessQuery<'_>;

    /// Get a query facade bound to a caller identity.
    fn query_as(&self, caller: RequestContext) -> AccessQuery<'_>;
}

impl EngineQuery for AccessEngine {
    fn query(&self) -> AccessQuery<'_> {
        AccessQuery {
            engine: self,
            caller: RequestContext::new(),
        }
    }

    fn query_as(&self, caller: RequestContext) -> AccessQuery<'_> {
        AccessQuery {
            engine: self,
            caller,
        }
    }
}

impl<'a> AccessQuery<'a> {
    /// The caller identity this facade injects by default.
    pub fn caller(&self) -> &RequestContext {
        &self.caller
    }

    /// The effective permission set for a role with an optional affiliation.
    pub fn user_permissions(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
    ) -> Vec<&'a Permission> {
        self.engine
            .matrix()
            .permissions_for_role_affiliation(role, affiliation)
    }

    /// Projection of [`Self::user_permissions`] onto permission ids.
    pub fn user_permission_ids(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
    ) -> Vec<String> {
        self.user_permissions(role, affiliation)
            .into_iter()
            .map(|permission| permission.id().to_string())
            .collect()
    }

    /// Sugar for checking access to a (resource, action) pair: builds the
    /// `"<resource>.<action>"` id and delegates to the engine with the
    /// caller's context.
    pub fn can_access_resource(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        resource: &str,
        action: &str,
    ) -> AccessDecision {
        self.engine.has_permission(
            role,
            affiliation,
            &format!("{resource}.{action}"),
            &self.caller,
        )
    }

    /// Like [`Self::can_access_resource`], with an explicit context whose
    /// unset fields are auto-filled from the caller identity.
    pub fn can_access_resource_with_context(
        &self,
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        resource: &str,
        action: &str,
        context: &RequestContext,
    ) -> AccessDecision {
        let merged = context.or_defaults(&self.caller);
        self.engine.has_permission(
            role,
            affiliation,
            &format!("{resource}.{action}"),
            &merged,
        )
    }

    /// The newest `limit` audit entries within the trailing `window`,
    /// most-recent-first. Backs the audit log viewer's default
    /// "last 24 hours" page.
    pub fn recent_audit_logs(&self, window: Duration, limit: usize) -> Vec<AuditLogEntry> {
        let filter = AuditFilter::new().since(Utc::now() - window).limit(limit);
        self.engine.audit_logs(&filter)
    }
}
