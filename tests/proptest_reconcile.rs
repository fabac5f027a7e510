//! Property-based tests for the diff and membership cores
//!
//! These verify the reconciliation laws over randomized declared states:
//! idempotence, totality of the four-case classification, the
//! symmetric-difference equations, and byte-identical batch payloads
//! across repeated dispatch.

use cloudlink::{
    DeclaredIntegrations, IntegrationDiff, IntegrationKind, IntegrationRegistry, LinkedAccountId,
    MemberDiff, MemberSet, UserId,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// Generate an arbitrary parameter bag drawn from the fields the shapes
/// share. Kinds that do not know a field simply ignore it on parse, which
/// mirrors what canonicalization does to zero values.
fn arb_bag() -> impl Strategy<Value = Value> {
    (
        proptest::option::of(1u32..=86400),
        prop::collection::vec("[a-z]{2}-[a-z]{4,7}-[1-3]", 0..3),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(interval, regions, fetch_tags)| {
            let mut bag = serde_json::Map::new();
            if let Some(interval) = interval {
                bag.insert("metrics_polling_interval".to_string(), json!(interval));
            }
            if !regions.is_empty() {
                bag.insert("aws_regions".to_string(), json!(regions));
            }
            if let Some(fetch_tags) = fetch_tags {
                bag.insert("fetch_tags".to_string(), json!(fetch_tags));
            }
            Value::Object(bag)
        })
}

fn arb_kind() -> impl Strategy<Value = IntegrationKind> {
    prop::sample::select(IntegrationKind::ALL.to_vec())
}

/// Generate an arbitrary declared state (subset of kinds, each with a bag)
fn arb_declared() -> impl Strategy<Value = DeclaredIntegrations> {
    prop::collection::btree_map(arb_kind(), arb_bag(), 0..12)
        .prop_map(|bags| bags.into_iter().collect())
}

fn arb_member_set() -> impl Strategy<Value = MemberSet> {
    prop::collection::btree_set("u-[0-9]{1,4}", 0..20)
        .prop_map(|ids| ids.into_iter().map(UserId).collect())
}

proptest! {
    /// diff(S, S) issues nothing: re-applying a declaration is free
    #[test]
    fn diff_of_identical_states_is_a_noop(state in arb_declared()) {
        let registry = IntegrationRegistry::aws();
        let diff = IntegrationDiff::between(&state, &state, &registry).unwrap();
        prop_assert!(diff.is_noop());
    }

    /// Every kind in the closed enumeration lands in exactly one bucket
    #[test]
    fn classification_is_total(prior in arb_declared(), new in arb_declared()) {
        let registry = IntegrationRegistry::aws();
        let diff = IntegrationDiff::between(&prior, &new, &registry).unwrap();

        let enabled: BTreeSet<_> = diff.to_enable.iter().map(|(k, _)| *k).collect();
        let disabled: BTreeSet<_> = diff.to_disable.iter().cloned().collect();
        prop_assert!(enabled.is_disjoint(&disabled));

        for kind in IntegrationKind::ALL {
            let classified = enabled.contains(&kind) || disabled.contains(&kind);
            if diff.is_noop() {
                prop_assert!(!classified);
            } else {
                // enable covers everything declared new; disable covers
                // everything dropped; the rest are no-ops
                let expected = new.contains(kind) || prior.contains(kind);
                prop_assert_eq!(classified, expected, "kind {} misclassified", kind);
            }
        }
    }

    /// Disables only ever target kinds that were previously declared
    #[test]
    fn disables_come_from_the_prior_state(prior in arb_declared(), new in arb_declared()) {
        let registry = IntegrationRegistry::aws();
        let diff = IntegrationDiff::between(&prior, &new, &registry).unwrap();
        for kind in &diff.to_disable {
            prop_assert!(prior.contains(*kind) && !new.contains(*kind));
        }
    }

    /// Repeated diff + dispatch of identical inputs serializes to
    /// byte-identical wire payloads
    #[test]
    fn dispatch_is_deterministic(prior in arb_declared(), new in arb_declared()) {
        let registry = IntegrationRegistry::aws();
        let parent = LinkedAccountId(7);

        let diff_a = IntegrationDiff::between(&prior, &new, &registry).unwrap();
        let diff_b = IntegrationDiff::between(&prior, &new, &registry).unwrap();
        prop_assert_eq!(&diff_a, &diff_b);

        let (enable_a, disable_a) = cloudlink::integration::dispatch(&diff_a, parent, &registry).unwrap();
        let (enable_b, disable_b) = cloudlink::integration::dispatch(&diff_b, parent, &registry).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&enable_a.to_wire()).unwrap(),
            serde_json::to_string(&enable_b.to_wire()).unwrap()
        );
        prop_assert_eq!(
            serde_json::to_string(&disable_a.to_wire()).unwrap(),
            serde_json::to_string(&disable_b.to_wire()).unwrap()
        );
    }

    /// The symmetric-difference equations from the membership contract
    #[test]
    fn member_diff_laws(prior in arb_member_set(), new in arb_member_set()) {
        let diff = MemberDiff::between(&prior, &new);

        prop_assert!(diff.to_add.is_disjoint(&prior));
        prop_assert!(diff.to_remove.is_subset(&prior));
        prop_assert!(diff.to_add.is_subset(&new));

        // (prior − to_remove) ∪ to_add == new
        let converged: MemberSet = prior
            .difference(&diff.to_remove)
            .cloned()
            .chain(diff.to_add.iter().cloned())
            .collect();
        prop_assert_eq!(converged, new);
    }

    /// Identical member sets produce an empty diff (no remote traffic)
    #[test]
    fn member_diff_of_identical_sets_is_noop(set in arb_member_set()) {
        prop_assert!(MemberDiff::between(&set, &set).is_noop());
    }

    /// Applying a diff's own decomposition twice changes nothing further
    #[test]
    fn member_diff_is_idempotent(prior in arb_member_set(), new in arb_member_set()) {
        let diff = MemberDiff::between(&prior, &new);
        let converged: MemberSet = prior
            .difference(&diff.to_remove)
            .cloned()
            .chain(diff.to_add.iter().cloned())
            .collect();
        prop_assert!(MemberDiff::between(&converged, &new).is_noop());
    }
}
