//! Append-only audit trail of authorization decisions.
//!
//! Every decision the engine makes is recorded here. Entries are immutable
//! once written and the store only ever grows, except through the explicit,
//! bounded [`AuditLogStore::prune_before`] retention call, which runs under
//! the same write lock as appends so it cannot race one into data loss.

use crate::{
    context::RequestContext,
    role::{Role, SecondaryAffiliation},
};
use chrono::{DateTime, Utc};
use std::sync::RwLock;
use uuid::Uuid;

/// An immutable record of one authorization decision plus contextual
/// metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditLogEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
    /// The acting user, if supplied by the identity provider.
    pub user_id: Option<String>,
    /// The actor's primary role.
    pub role: Role,
    /// The actor's secondary affiliation, if any.
    pub affiliation: Option<SecondaryAffiliation>,
    /// The resource the decision concerned.
    pub resource: String,
    /// The action the decision concerned.
    pub action: String,
    /// Whether access was granted.
    pub granted: bool,
    /// Short user-facing explanation of the outcome.
    pub reason: String,
    /// Caller IP address, if supplied.
    pub ip: Option<String>,
    /// Caller user agent, if supplied.
    pub user_agent: Option<String>,
}

impl AuditLogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        role: Role,
        affiliation: Option<SecondaryAffiliation>,
        resource: impl Into<String>,
        action: impl Into<String>,
        granted: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: None,
            role,
            affiliation,
            resource: resource.into(),
            action: action.into(),
            granted,
            reason: reason.into(),
            ip: None,
            user_agent: None,
        }
    }

    /// Attach the request context supplied by the caller.
    pub fn with_context(mut self, context: &RequestContext) -> Self {
        self.user_id = context.user_id().map(str::to_string);
        self.ip = context.ip().map(str::to_string);
        self.user_agent = context.user_agent().map(str::to_string);
        self
    }
}

/// Filter for audit queries. Supplied fields are ANDed together; omitted
/// fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Earliest timestamp to include (inclusive).
    pub start_date: Option<DateTime<Utc>>,
    /// Latest timestamp to include (inclusive).
    pub end_date: Option<DateTime<Utc>>,
    /// Only entries for this primary role.
    pub role: Option<Role>,
    /// Only entries for this resource.
    pub resource: Option<String>,
    /// Only granted (or only denied) decisions.
    pub granted: Option<bool>,
    /// Cap on the number of returned entries, applied after ordering.
    pub limit: Option<usize>,
}

impl AuditFilter {
    /// Create a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include only entries at or after `start`.
    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Include only entries at or before `end`.
    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Include only entries for `role`.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Include only entries for `resource`.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Include only entries with this outcome.
    pub fn granted(mut self, granted: bool) -> Self {
        self.granted = Some(granted);
        self
    }

    /// Return at most `limit` entries.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether an entry satisfies every supplied predicate. An
    /// inverted date range (start after end) cannot be satisfied, so an
    /// over-constrained query degrades to "no results" rather than an error.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(start) = self.start_date {
            if entry.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if entry.timestamp > end {
                return false;
            }
        }
        if let Some(role) = self.role {
            if entry.role != role {
                return false;
            }
        }
        if let Some(resource) = &self.resource {
            if &entry.resource != resource {
                return false;
            }
        }
        if let Some(granted) = self.granted {
            if entry.granted != granted {
                return false;
            }
        }
        true
    }
}

/// Concurrency-safe, append-only store of decision records.
///
/// Appends take the write lock, so they are atomic relative to each other
/// and to pruning. Queries clone a filtered snapshot under the read lock;
/// they see a consistent state but may miss an append that races the read.
#[derive(Debug, Default)]
pub struct AuditLogStore {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl AuditLogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Entries arrive in decision order and are never
    /// mutated afterwards.
    pub fn append(&self, entry: AuditLogEntry) {
        self.entries.write().unwrap().push(entry);
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Snapshot the entries matching `filter`, most-recent-first. The
    /// optional limit is applied after ordering, so it returns the newest N
    /// matches.
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        let entries = self.entries.read().unwrap();
        let matching = entries.iter().rev().filter(|entry| filter.matches(entry));

        match filter.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        }
    }

    /// Remove entries older than `cutoff`, keeping relative order of the
    /// remainder. Serialized with appends via the write lock. Returns the
    /// number of removed entries.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|entry| entry.timestamp >= cutoff);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(resource: &str, granted: bool) -> AuditLogEntry {
        AuditLogEntry::new(
            Role::Teacher,
            None,
            resource,
            "view",
            granted,
            if granted { "granted via role" } else { "insufficient permissions" },
        )
    }

    #[test]
    fn test_append_and_query_order() {
        let store = AuditLogStore::new();
        store.append(entry("academic.grades", true));
        store.append(entry("academic.attendance", false));
        store.append(entry("admin.users", false));

        let all = store.query(&AuditFilter::new());
        assert_eq!(all.len(), 3);
        // Most-recent-first.
        assert_eq!(all[0].resource, "admin.users");
        assert_eq!(all[2].resource, "academic.grades");
    }

    #[test]
    fn test_filters_are_anded() {
        let store = AuditLogStore::new();
        store.append(entry("academic.grades", true));
        store.append(entry("academic.grades", false));
        store.append(entry("admin.users", false));

        let filter = AuditFilter::new().resource("academic.grades").granted(false);
        let results = store.query(&filter);
        assert_eq!(results.len(), 1);
        assert!(!results[0].granted);
    }

    #[test]
    fn test_inverted_date_range_yields_empty() {
        let store = AuditLogStore::new();
        store.append(entry("academic.grades", true));

        let now = Utc::now();
        let filter = AuditFilter::new()
            .since(now + Duration::hours(1))
            .until(now - Duration::hours(1));
        assert!(store.query(&filter).is_empty());
    }

    #[test]
    fn test_limit_returns_newest_matches() {
        let store = AuditLogStore::new();
        for i in 0..5 {
            store.append(entry(&format!("resource-{i}"), true));
        }

        let results = store.query(&AuditFilter::new().limit(2));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].resource, "resource-4");
        assert_eq!(results[1].resource, "resource-3");
    }

    #[test]
    fn test_prune_before_is_bounded() {
        let store = AuditLogStore::new();
        let mut old = entry("academic.grades", true);
        old.timestamp = Utc::now() - Duration::days(30);
        store.append(old);
        store.append(entry("academic.grades", true));

        let removed = store.prune_before(Utc::now() - Duration::days(7));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(AuditLogStore::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    store.append(entry("academic.grades", true));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 400);
    }
}
