//! Integration toggle reconciliation under a linked cloud account.
//!
//! A linked account carries an open-ended set of independently togglable
//! service integrations. This module owns the path from declared
//! configuration to remote batches: kind enumeration, parameter shapes,
//! bag<->payload mapping, the kind->mapper registry, state diffing, and
//! batch dispatch. The convergence loop in [`crate::convergence`] drives
//! these against the remote transport.

pub mod differ;
pub mod dispatch;
pub mod kind;
pub mod mapper;
pub mod params;
pub mod registry;

pub use differ::{DeclaredIntegrations, IntegrationDiff};
pub use dispatch::{dispatch, DisableBatch, EnableBatch};
pub use kind::IntegrationKind;
pub use mapper::{merge_observed, DisableInput, EnableInput, IntegrationMapper};
pub use registry::IntegrationRegistry;
