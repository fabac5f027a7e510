//! State diffing between prior and newly-declared integrations.
//!
//! Classification is total over the closed kind enumeration and its output
//! order is canonical: two diffs of identical inputs serialize to
//! byte-identical batches. Equal declared states short-circuit to an empty
//! diff, so a no-change apply issues no remote calls. When the states
//! differ, every kind present in the new state is (re-)enabled (the
//! remote has no separate update verb; re-enabling with the current
//! parameters *is* the update) and kinds dropped from the declaration are
//! disabled.

use crate::error::Result;
use crate::integration::kind::IntegrationKind;
use crate::integration::mapper::canonical_bag;
use crate::integration::registry::IntegrationRegistry;
use serde_json::Value;
use std::collections::BTreeMap;

/// Declared integrations under one linked account: at most one parameter
/// bag per kind (the schema enforces single-block-per-type upstream).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclaredIntegrations {
    bags: BTreeMap<IntegrationKind, Value>,
}

impl DeclaredIntegrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a kind with its parameter bag. Re-declaring a kind replaces
    /// the previous bag.
    pub fn declare(&mut self, kind: IntegrationKind, bag: Value) -> &mut Self {
        self.bags.insert(kind, bag);
        self
    }

    pub fn get(&self, kind: IntegrationKind) -> Option<&Value> {
        self.bags.get(&kind)
    }

    pub fn contains(&self, kind: IntegrationKind) -> bool {
        self.bags.contains_key(&kind)
    }

    /// Declared kinds with their bags, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (IntegrationKind, &Value)> {
        self.bags.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    /// Same declarations with every bag in canonical form
    fn canonicalize(&self, registry: &IntegrationRegistry) -> Result<Self> {
        let mut canonical = Self::new();
        for (kind, bag) in self.iter() {
            let mapper = registry.lookup(kind)?;
            canonical.declare(kind, canonical_bag(mapper, bag)?);
        }
        Ok(canonical)
    }
}

impl FromIterator<(IntegrationKind, Value)> for DeclaredIntegrations {
    fn from_iter<T: IntoIterator<Item = (IntegrationKind, Value)>>(iter: T) -> Self {
        Self {
            bags: iter.into_iter().collect(),
        }
    }
}

/// Minimal remote operations needed to converge prior -> new.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationDiff {
    /// Kinds to enable (or re-enable with current parameters), canonical
    /// order, canonical bags
    pub to_enable: Vec<(IntegrationKind, Value)>,
    /// Kinds to disable, canonical order
    pub to_disable: Vec<IntegrationKind>,
}

impl IntegrationDiff {
    /// Classify every kind in the closed enumeration into enable /
    /// disable / no-op.
    pub fn between(
        prior: &DeclaredIntegrations,
        new: &DeclaredIntegrations,
        registry: &IntegrationRegistry,
    ) -> Result<Self> {
        let prior = prior.canonicalize(registry)?;
        let new = new.canonicalize(registry)?;

        // Identical declared states converge by doing nothing.
        if prior == new {
            return Ok(Self::default());
        }

        let mut diff = Self::default();

        for kind in IntegrationKind::ALL {
            match (prior.get(kind), new.get(kind)) {
                // newly present, or still present: (re-)enable with the
                // new parameters
                (_, Some(bag)) => diff.to_enable.push((kind, bag.clone())),
                // newly absent: disable
                (Some(_), None) => diff.to_disable.push(kind),
                // absent in both
                (None, None) => {}
            }
        }

        Ok(diff)
    }

    pub fn is_noop(&self) -> bool {
        self.to_enable.is_empty() && self.to_disable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> IntegrationRegistry {
        IntegrationRegistry::aws()
    }

    fn declared(entries: &[(IntegrationKind, Value)]) -> DeclaredIntegrations {
        entries.iter().cloned().collect()
    }

    #[test]
    fn identical_states_diff_to_nothing() {
        let state = declared(&[
            (IntegrationKind::Billing, json!({"metrics_polling_interval": 300})),
            (IntegrationKind::Vpc, json!({"aws_regions": ["us-east-1"]})),
        ]);

        let diff = IntegrationDiff::between(&state, &state, &registry()).unwrap();
        assert!(diff.is_noop());
    }

    #[test]
    fn equivalent_bags_spelled_differently_still_diff_to_nothing() {
        // zero values are canonicalized away, so an explicit empty region
        // list equals an omitted one
        let prior = declared(&[(IntegrationKind::Cloudtrail, json!({"aws_regions": []}))]);
        let new = declared(&[(IntegrationKind::Cloudtrail, json!({}))]);

        let diff = IntegrationDiff::between(&prior, &new, &registry()).unwrap();
        assert!(diff.is_noop());
    }

    #[test]
    fn newly_declared_kind_reaffirms_existing_siblings() {
        // prior {billing}, new {billing, x_ray}: billing is reaffirmed,
        // x_ray newly enabled, nothing disabled
        let prior = declared(&[(IntegrationKind::Billing, json!({"metrics_polling_interval": 300}))]);
        let new = declared(&[
            (IntegrationKind::Billing, json!({"metrics_polling_interval": 300})),
            (IntegrationKind::XRay, json!({"aws_regions": ["us-east-1"]})),
        ]);

        let diff = IntegrationDiff::between(&prior, &new, &registry()).unwrap();
        let enabled: Vec<_> = diff.to_enable.iter().map(|(k, _)| *k).collect();
        assert_eq!(enabled, vec![IntegrationKind::Billing, IntegrationKind::XRay]);
        assert!(diff.to_disable.is_empty());
    }

    #[test]
    fn emptied_declaration_disables_everything_previously_declared() {
        let prior = declared(&[
            (IntegrationKind::Billing, json!({})),
            (IntegrationKind::XRay, json!({"aws_regions": ["us-east-1"]})),
        ]);
        let new = DeclaredIntegrations::new();

        let diff = IntegrationDiff::between(&prior, &new, &registry()).unwrap();
        assert!(diff.to_enable.is_empty());
        assert_eq!(
            diff.to_disable,
            vec![IntegrationKind::Billing, IntegrationKind::XRay]
        );
    }

    #[test]
    fn changed_parameters_reenable_with_the_new_bag() {
        let prior = declared(&[(
            IntegrationKind::Sqs,
            json!({"queue_prefixes": ["prod-"]}),
        )]);
        let new = declared(&[(
            IntegrationKind::Sqs,
            json!({"queue_prefixes": ["prod-", "staging-"]}),
        )]);

        let diff = IntegrationDiff::between(&prior, &new, &registry()).unwrap();
        assert_eq!(diff.to_enable.len(), 1);
        assert_eq!(
            diff.to_enable[0].1,
            json!({"queue_prefixes": ["prod-", "staging-"]})
        );
        assert!(diff.to_disable.is_empty());
    }

    #[test]
    fn classification_is_total_and_ordered() {
        // every kind declared on one side or the other; every kind must
        // land in exactly one bucket, in canonical order
        let mut prior = DeclaredIntegrations::new();
        let mut new = DeclaredIntegrations::new();
        for (i, kind) in IntegrationKind::ALL.into_iter().enumerate() {
            if i % 2 == 0 {
                prior.declare(kind, json!({}));
            } else {
                new.declare(kind, json!({}));
            }
        }

        let diff = IntegrationDiff::between(&prior, &new, &registry()).unwrap();
        assert_eq!(
            diff.to_enable.len() + diff.to_disable.len(),
            IntegrationKind::ALL.len()
        );

        let enabled: Vec<_> = diff.to_enable.iter().map(|(k, _)| *k).collect();
        let mut sorted = enabled.clone();
        sorted.sort();
        assert_eq!(enabled, sorted);

        let mut sorted = diff.to_disable.clone();
        sorted.sort();
        assert_eq!(diff.to_disable, sorted);
    }
}
