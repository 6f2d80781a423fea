//! Metrics collection for the access engine.

use crate::role::Role;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Operational counters for decision traffic.
///
/// All counters use relaxed atomics; they are diagnostics, not part of the
/// decision or audit semantics.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    checks: Arc<AtomicU64>,
    granted: Arc<AtomicU64>,
    denied: Arc<AtomicU64>,
    audit_entries: Arc<AtomicU64>,
    role_activity: Arc<DashMap<Role, AtomicU64>>,
    denial_reasons: Arc<DashMap<String, AtomicU64>>,
}

impl EngineMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decision outcome.
    pub fn record_decision(&self, role: Role, granted: bool, reason: &str) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        if granted {
            self.granted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.denied.fetch_add(1, Ordering::Relaxed);
            self.denial_reasons
                .entry(reason.to_string())
                .and_modify(|count| {
                    count.fetch_add(1, Ordering::Relaxed);
                })
                .or_insert_with(|| AtomicU64::new(1));
        }

        self.role_activity
            .entry(role)
            .and_modify(|count| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .or_insert_with(|| AtomicU64::new(1));
    }

    /// Record one audit append.
    pub fn record_audit_append(&self) {
        self.audit_entries.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of decisions evaluated.
    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    /// Total number of granted decisions.
    pub fn granted(&self) -> u64 {
        self.granted.load(Ordering::Relaxed)
    }

    /// Total number of denied decisions.
    pub fn denied(&self) -> u64 {
        self.denied.load(Ordering::Relaxed)
    }

    /// Total number of audit entries written.
    pub fn audit_entries(&self) -> u64 {
        self.audit_entries.load(Ordering::Relaxed)
    }

    /// Fraction of decisions that were granted, or 0.0 before any traffic.
    pub fn grant_ratio(&self) -> f64 {
        let checks = self.checks();
        if checks == 0 {
            return 0.0;
        }
        self.granted() as f64 / checks as f64
    }

    /// Snapshot all counters for reporting.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let role_activity = self
            .role_activity
            .iter()
            .map(|entry| (*entry.key(), entry.value().load(Ordering::Relaxed)))
            .collect();
        let denial_reasons = self
            .denial_reasons
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();

        MetricsSnapshot {
            checks: self.checks(),
            granted: self.granted(),
            denied: self.denied(),
            audit_entries: self.audit_entries(),
            role_activity,
            denial_reasons,
        }
    }
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Total decisions evaluated.
    pub checks: u64,
    /// Granted decisions.
    pub granted: u64,
    /// Denied decisions.
    pub denied: u64,
    /// Audit entries written.
    pub audit_entries: u64,
    /// Decision count per primary role.
    pub role_activity: HashMap<Role, u64>,
    /// Denial count per reason string.
    pub denial_reasons: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_counters() {
        let metrics = EngineMetrics::new();
        metrics.record_decision(Role::Admin, true, "granted via role");
        metrics.record_decision(Role::Student, false, "insufficient permissions");
        metrics.record_decision(Role::Student, false, "insufficient permissions");

        assert_eq!(metrics.checks(), 3);
        assert_eq!(metrics.granted(), 1);
        assert_eq!(metrics.denied(), 2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.role_activity.get(&Role::Student), Some(&2));
        assert_eq!(
            snapshot.denial_reasons.get("insufficient permissions"),
            Some(&2)
        );
    }

    #[test]
    fn test_grant_ratio() {
        let metrics = EngineMetrics::new();
        assert_eq!(metrics.grant_ratio(), 0.0);

        metrics.record_decision(Role::Admin, true, "granted via role");
        metrics.record_decision(Role::Admin, false, "insufficient permissions");
        assert!((metrics.grant_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_audit_append_counter() {
        let metrics = EngineMetrics::new();
        metrics.record_audit_append();
        metrics.record_audit_append();
        assert_eq!(metrics.audit_entries(), 2);
    }
}
