//! Set-membership reconciliation: which users belong to a group.
//!
//! The membership variant of the reconciliation pattern. Members are
//! opaque identifiers with set semantics (duplicates collapse, order is
//! irrelevant); converging a declared set against the prior one decomposes
//! into a symmetric difference, and an empty diff issues no remote traffic
//! at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unordered member set under one group
pub type MemberSet = BTreeSet<UserId>;

/// The add/remove decomposition of a membership edit:
/// `to_add = new − prior`, `to_remove = prior − new`. Members present in
/// both sets are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDiff {
    pub to_add: MemberSet,
    pub to_remove: MemberSet,
}

impl MemberDiff {
    pub fn between(prior: &MemberSet, new: &MemberSet) -> Self {
        Self {
            to_add: new.difference(prior).cloned().collect(),
            to_remove: prior.difference(new).cloned().collect(),
        }
    }

    /// Both halves empty: nothing to send
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Members to add, canonical order, as a batch argument
    pub fn additions(&self) -> Vec<UserId> {
        self.to_add.iter().cloned().collect()
    }

    /// Members to remove, canonical order, as a batch argument
    pub fn removals(&self) -> Vec<UserId> {
        self.to_remove.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> MemberSet {
        ids.iter().map(|s| UserId::from(*s)).collect()
    }

    #[test]
    fn symmetric_difference_decomposition() {
        // prior {u1,u2}, new {u2,u3}: add u3, remove u1
        let diff = MemberDiff::between(&set(&["u1", "u2"]), &set(&["u2", "u3"]));
        assert_eq!(diff.to_add, set(&["u3"]));
        assert_eq!(diff.to_remove, set(&["u1"]));
    }

    #[test]
    fn empty_sets_are_a_noop() {
        let diff = MemberDiff::between(&MemberSet::new(), &MemberSet::new());
        assert!(diff.is_noop());
    }

    #[test]
    fn identical_sets_are_a_noop() {
        let members = set(&["u1", "u2", "u3"]);
        assert!(MemberDiff::between(&members, &members).is_noop());
    }

    #[test]
    fn additions_and_removals_are_disjoint_from_each_other() {
        let prior = set(&["a", "b", "c"]);
        let new = set(&["c", "d", "e"]);
        let diff = MemberDiff::between(&prior, &new);

        assert!(diff.to_add.is_disjoint(&prior));
        assert!(diff.to_remove.is_subset(&prior));
        assert!(diff.to_add.is_subset(&new));

        // (prior − to_remove) ∪ to_add == new
        let converged: MemberSet = prior
            .difference(&diff.to_remove)
            .cloned()
            .chain(diff.to_add.iter().cloned())
            .collect();
        assert_eq!(converged, new);
    }
}
