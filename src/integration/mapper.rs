//! Field mapping between declared parameter bags and remote request
//! payloads.
//!
//! A mapper couples one integration kind to its parameter shape. The
//! enable direction parses the declared bag into the typed shape and
//! re-serializes it canonically (unset fields omitted, key order fixed by
//! the shape). The flatten direction projects an observed remote record
//! through the same shape, keeping only the fields the remote actually
//! echoed. [`merge_observed`] then overlays echoed fields onto the
//! last-declared bag so un-echoed fields keep their last-declared value
//! instead of being cleared: the remote is not required to echo every
//! input field, and clearing would manufacture a diff on the next apply.

use crate::error::{Error, Result};
use crate::integration::kind::IntegrationKind;
use crate::remote::types::{LinkedAccountId, ObservedIntegration};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Enable request for one integration kind under one linked account.
/// Built fresh on every apply, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EnableInput {
    pub linked_account_id: LinkedAccountId,
    pub kind: IntegrationKind,
    /// Canonical parameter payload (typed-shape serialization of the bag)
    pub params: Value,
}

impl EnableInput {
    /// The wire entry for the configure call: parameters plus the parent
    /// identifier.
    pub fn wire_entry(&self) -> Value {
        let mut entry = match &self.params {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        entry.insert(
            "linked_account_id".to_string(),
            Value::from(self.linked_account_id.0),
        );
        Value::Object(entry)
    }
}

/// Disable request: disabling never takes parameters, only the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableInput {
    pub linked_account_id: LinkedAccountId,
}

impl DisableInput {
    pub fn wire_entry(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(
            "linked_account_id".to_string(),
            Value::from(self.linked_account_id.0),
        );
        Value::Object(entry)
    }
}

/// One integration kind's mapping between declared bags and remote
/// payloads. Mappers are stateless; both directions are pure.
pub trait IntegrationMapper: Send + Sync {
    fn kind(&self) -> IntegrationKind;

    /// Parse the declared bag and build the enable request. Total over
    /// well-formed bags: absent fields take their zero value. A bag with a
    /// wrongly-typed field is an upstream-validation invariant violation.
    fn enable(&self, bag: &Value, linked_account_id: LinkedAccountId) -> Result<EnableInput>;

    fn disable(&self, linked_account_id: LinkedAccountId) -> DisableInput {
        DisableInput { linked_account_id }
    }

    /// Map an observed remote record back into declared-bag fields. Only
    /// the subset of fields the remote echoed (and the shape knows about)
    /// comes back; everything else is omitted, not nulled.
    fn flatten(&self, observed: &ObservedIntegration) -> Value;
}

/// Mapper for a kind whose parameters follow shape `P`.
pub struct ShapedMapper<P> {
    kind: IntegrationKind,
    _shape: PhantomData<fn() -> P>,
}

impl<P> ShapedMapper<P> {
    pub fn new(kind: IntegrationKind) -> Self {
        Self {
            kind,
            _shape: PhantomData,
        }
    }
}

impl<P> IntegrationMapper for ShapedMapper<P>
where
    P: Serialize + DeserializeOwned + Default + Send + Sync,
{
    fn kind(&self) -> IntegrationKind {
        self.kind
    }

    fn enable(&self, bag: &Value, linked_account_id: LinkedAccountId) -> Result<EnableInput> {
        let typed: P =
            serde_json::from_value(bag.clone()).map_err(|source| Error::InvalidParams {
                kind: self.kind,
                source,
            })?;

        let params = serde_json::to_value(&typed).unwrap_or_else(|_| Value::Object(Map::new()));

        Ok(EnableInput {
            linked_account_id,
            kind: self.kind,
            params,
        })
    }

    fn flatten(&self, observed: &ObservedIntegration) -> Value {
        let fields = Value::Object(observed.fields.clone());
        let typed: P = match serde_json::from_value(fields) {
            Ok(typed) => typed,
            Err(e) => {
                tracing::warn!(
                    kind = %self.kind,
                    error = %e,
                    "observed integration fields did not match the declared shape; dropping"
                );
                P::default()
            }
        };

        serde_json::to_value(&typed).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Canonicalize a declared bag through a mapper without building a
/// request. Used by the differ so that bags compare by canonical form, not
/// by however the front-end happened to spell them.
pub fn canonical_bag(mapper: &dyn IntegrationMapper, bag: &Value) -> Result<Value> {
    // linked account id 0 is a placeholder; only the params come back
    mapper
        .enable(bag, LinkedAccountId(0))
        .map(|input| input.params)
}

/// Overlay echoed fields onto the last-declared bag. Keys the remote did
/// not echo keep their last-declared value.
pub fn merge_observed(last_declared: &Value, echoed: &Value) -> Value {
    let mut merged = match last_declared {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    if let Value::Object(echoed) = echoed {
        for (key, value) in echoed {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}
