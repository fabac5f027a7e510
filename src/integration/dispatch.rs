//! Batch construction: drives a diff through the registry into the two
//! wire batches of one logical apply.
//!
//! Slots are keyed by kind in a BTreeMap and each kind's inputs append
//! into its own slot, so serialized batches are byte-identical for
//! identical diffs. No ordering between individual kinds is required by
//! the remote (they are independent resources under the parent); the
//! canonical order exists for determinism only.

use crate::error::Result;
use crate::integration::differ::IntegrationDiff;
use crate::integration::kind::IntegrationKind;
use crate::integration::mapper::{DisableInput, EnableInput};
use crate::integration::registry::IntegrationRegistry;
use crate::remote::types::LinkedAccountId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// All enable requests of one apply, grouped per kind under the parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnableBatch {
    provider: &'static str,
    slots: BTreeMap<IntegrationKind, Vec<EnableInput>>,
}

impl EnableBatch {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Kinds with at least one input, canonical order
    pub fn kinds(&self) -> impl Iterator<Item = IntegrationKind> + '_ {
        self.slots.keys().copied()
    }

    /// Wire form: `{"<provider>": {"<kind>": [ {entry}, ... ]}}`
    pub fn to_wire(&self) -> Value {
        batch_wire(self.provider, &self.slots, EnableInput::wire_entry)
    }
}

/// All disable requests of one apply, grouped per kind under the parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisableBatch {
    provider: &'static str,
    slots: BTreeMap<IntegrationKind, Vec<DisableInput>>,
}

impl DisableBatch {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = IntegrationKind> + '_ {
        self.slots.keys().copied()
    }

    pub fn to_wire(&self) -> Value {
        batch_wire(self.provider, &self.slots, DisableInput::wire_entry)
    }

    /// The cascade batch used when the parent is deleted: one disable per
    /// registered kind.
    pub fn disable_all(
        registry: &IntegrationRegistry,
        linked_account_id: LinkedAccountId,
    ) -> Result<Self> {
        let mut batch = Self {
            provider: registry.provider(),
            slots: BTreeMap::new(),
        };

        for kind in registry.kinds() {
            let mapper = registry.lookup(kind)?;
            batch
                .slots
                .entry(kind)
                .or_default()
                .push(mapper.disable(linked_account_id));
        }

        Ok(batch)
    }
}

fn batch_wire<T>(
    provider: &str,
    slots: &BTreeMap<IntegrationKind, Vec<T>>,
    entry: impl Fn(&T) -> Value,
) -> Value {
    let mut kinds = Map::new();
    for (kind, inputs) in slots {
        kinds.insert(
            kind.as_str().to_string(),
            Value::Array(inputs.iter().map(&entry).collect()),
        );
    }

    let mut wire = Map::new();
    wire.insert(provider.to_string(), Value::Object(kinds));
    Value::Object(wire)
}

/// Build the enable/disable batches for a diff. Both batches belong to the
/// same logical apply; submission happens in the convergence loop.
pub fn dispatch(
    diff: &IntegrationDiff,
    linked_account_id: LinkedAccountId,
    registry: &IntegrationRegistry,
) -> Result<(EnableBatch, DisableBatch)> {
    let mut enable = EnableBatch {
        provider: registry.provider(),
        slots: BTreeMap::new(),
    };
    let mut disable = DisableBatch {
        provider: registry.provider(),
        slots: BTreeMap::new(),
    };

    for (kind, bag) in &diff.to_enable {
        let mapper = registry.lookup(*kind)?;
        let input = mapper.enable(bag, linked_account_id)?;
        enable.slots.entry(*kind).or_default().push(input);
    }

    for kind in &diff.to_disable {
        let mapper = registry.lookup(*kind)?;
        disable
            .slots
            .entry(*kind)
            .or_default()
            .push(mapper.disable(linked_account_id));
    }

    tracing::debug!(
        enable = enable.slots.len(),
        disable = disable.slots.len(),
        linked_account = linked_account_id.0,
        "dispatched diff into batches"
    );

    Ok((enable, disable))
}
