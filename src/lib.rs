//! # cloudlink
//!
//! Reconciliation engine for linked cloud accounts: converge a declarative
//! configuration of per-service monitoring integrations (and group
//! membership) against a remote telemetry API.
//!
//! The engine diffs newly-declared state against the previously-recorded
//! declaration, dispatches the minimal enable/disable (or add/remove)
//! batches through a per-kind mapper registry, and re-reads the remote
//! with a bounded retry until the observed state reflects the change.
//! Applies are idempotent: re-applying an unchanged declaration issues no
//! remote calls.
//!
//! ## Example
//!
//! ```ignore
//! use cloudlink::{
//!     AccountId, CloudClient, DeclaredIntegrations, IntegrationKind,
//!     IntegrationReconciler, IntegrationRegistry, LinkedAccountId,
//!     ReconcilerConfig,
//! };
//! use serde_json::json;
//!
//! let config = ReconcilerConfig::load();
//! let client = CloudClient::new(&config)?;
//! let reconciler = IntegrationReconciler::new(
//!     client,
//!     IntegrationRegistry::aws(),
//!     config.convergence_settings(),
//! );
//!
//! let mut declared = DeclaredIntegrations::new();
//! declared.declare(IntegrationKind::Billing, json!({"metrics_polling_interval": 3600}));
//! declared.declare(IntegrationKind::Vpc, json!({"aws_regions": ["us-east-1"]}));
//!
//! let report = reconciler
//!     .create(AccountId(1), LinkedAccountId(42), &declared)
//!     .await?;
//! println!("enabled: {:?} ({:?})", report.enabled, report.confirmation);
//! ```
//!
//! The registry is built once and injected; distinct linked accounts may
//! be reconciled concurrently against it. The remote API is reached
//! through the [`remote::CloudTransport`] trait, so tests (and embedders
//! with their own transport) can substitute the HTTP client.

pub mod config;
pub mod convergence;
pub mod error;
pub mod integration;
pub mod membership;
pub mod remote;

pub use config::{ConvergenceSettings, ReconcilerConfig};
pub use convergence::{
    ApplyPhase, ApplyReport, Confirmation, GroupReconciler, GroupReport, GroupSpec,
    IntegrationReconciler,
};
pub use error::{Error, IntegrationFailure, Result};
pub use integration::{
    DeclaredIntegrations, DisableBatch, EnableBatch, IntegrationDiff, IntegrationKind,
    IntegrationRegistry,
};
pub use membership::{MemberDiff, MemberSet, UserId};
pub use remote::{
    AccountId, CloudClient, CloudTransport, Group, GroupId, LinkedAccount, LinkedAccountId,
    ObservedIntegration,
};
