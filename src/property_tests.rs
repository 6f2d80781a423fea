//! Property-style tests sweeping the full role/affiliation/permission space.

#[cfg(test)]
mod tests {
    use crate::{
        audit::AuditFilter,
        context::RequestContext,
        engine::AccessEngine,
        role::{Role, SecondaryAffiliation},
    };

    fn affiliations() -> Vec<Option<SecondaryAffiliation>> {
        let mut all: Vec<Option<SecondaryAffiliation>> =
            SecondaryAffiliation::ALL.iter().copied().map(Some).collect();
        all.push(None);
        all
    }

    #[test]
    fn property_decisions_are_deterministic() {
        let engine = AccessEngine::new();
        let context = RequestContext::new();
        let ids: Vec<String> = engine
            .catalog()
            .all()
            .iter()
            .map(|p| p.id().to_string())
            .collect();

        for role in Role::ALL {
            for affiliation in affiliations() {
                for id in &ids {
                    let first = engine.has_permission(role, affiliation, id, &context);
                    let second = engine.has_permission(role, affiliation, id, &context);
                    assert_eq!(first, second, "decision for ({role}, {affiliation:?}, {id}) must be stable");
                }
            }
        }
    }

    #[test]
    fn property_affiliation_never_narrows_access() {
        let engine = AccessEngine::new();

        for role in Role::ALL {
            let baseline = engine.matrix().effective_ids(role, None);
            for affiliation in SecondaryAffiliation::ALL {
                let effective = engine.matrix().effective_ids(role, Some(affiliation));
                assert!(baseline.is_subset(&effective));
            }
        }
    }

    #[test]
    fn property_any_equals_or_of_singles() {
        // Separate engines so audit counting stays per-call-shape.
        let single_engine = AccessEngine::new();
        let any_engine = AccessEngine::new();
        let context = RequestContext::new();

        let ids: Vec<String> = single_engine
            .catalog()
            .all()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        let candidate_sets: Vec<Vec<String>> = vec![
            ids.clone(),
            ids.iter().take(3).cloned().collect(),
            vec!["admin.users.delete".to_string(), "council.activities.manage".to_string()],
        ];

        for role in Role::ALL {
            for affiliation in affiliations() {
                for candidates in &candidate_sets {
                    let expected = candidates.iter().any(|id| {
                        single_engine
                            .has_permission(role, affiliation, id, &context)
                            .can_access
                    });

                    let before = any_engine.audit_logs(&AuditFilter::new()).len();
                    let decision =
                        any_engine.has_any_permission(role, affiliation, candidates, &context);
                    let after = any_engine.audit_logs(&AuditFilter::new()).len();

                    assert_eq!(decision.can_access, expected);
                    assert_eq!(after, before + 1, "aggregate call writes exactly one entry");
                }
            }
        }
    }

    #[test]
    fn property_no_affiliation_is_always_valid() {
        let engine = AccessEngine::new();
        for role in Role::ALL {
            assert!(engine.is_valid_combination(role, None));
        }
    }

    #[test]
    fn property_every_decision_appends_matching_entry() {
        let engine = AccessEngine::new();
        let context = RequestContext::new();
        let mut expected_entries = 0;

        for role in Role::ALL {
            for id in ["academic.grades.view", "admin.users.delete", "bogus.id"] {
                let decision = engine.has_permission(role, None, id, &context);
                expected_entries += 1;

                let entries = engine.audit_logs(&AuditFilter::new());
                assert_eq!(entries.len(), expected_entries);
                assert_eq!(entries[0].granted, decision.can_access);
            }
        }
    }
}
