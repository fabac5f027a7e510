//! Apply orchestration: create/update/read/delete with bounded read-back.
//!
//! An apply cycle walks `Declared -> Diffed -> Dispatched -> Converging ->
//! Observed | Failed`. Mutations are submitted as one logical apply (the
//! enable batch, then the disable batch) and are never retried here:
//! enable calls are not idempotent remote-side, so a failed mutation
//! surfaces directly and the *next* apply's diff retries exactly the
//! failed subset. The read-back poll tolerates the remote's
//! eventual-consistency lag with a bounded retry; exhausting the budget
//! downgrades the report to unconfirmed instead of failing, because the
//! mutation itself already succeeded.
//!
//! One apply per parent runs at a time (the declarative front-end
//! serializes applies per resource); distinct parents may be reconciled
//! concurrently since the registry is read-only. Every `.await` is a
//! cancellation boundary; in-flight remote calls are not cancelled
//! mid-request.

use crate::config::ConvergenceSettings;
use crate::error::{Error, IntegrationFailure, Result};
use crate::integration::differ::{DeclaredIntegrations, IntegrationDiff};
use crate::integration::dispatch::{dispatch, DisableBatch};
use crate::integration::kind::IntegrationKind;
use crate::integration::mapper::merge_observed;
use crate::integration::registry::IntegrationRegistry;
use crate::membership::{MemberDiff, MemberSet};
use crate::remote::transport::CloudTransport;
use crate::remote::types::{
    AccountId, ConfigurePayload, CreateGroupInput, Group, GroupId, LinkedAccount, LinkedAccountId,
};
use uuid::Uuid;

/// Phases of one apply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Declared,
    Diffed,
    Dispatched,
    Converging,
    Observed,
    Failed,
}

impl std::fmt::Display for ApplyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApplyPhase::Declared => "declared",
            ApplyPhase::Diffed => "diffed",
            ApplyPhase::Dispatched => "dispatched",
            ApplyPhase::Converging => "converging",
            ApplyPhase::Observed => "observed",
            ApplyPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Whether the post-apply read confirmed the declared state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Read-back reflects the just-applied declaration
    Observed,
    /// The retry budget ran out before the read caught up. The mutation
    /// succeeded; the next apply's diff reconciles any remaining
    /// discrepancy.
    Unconfirmed,
}

/// Outcome of one integration apply
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub apply_id: Uuid,
    /// Kinds submitted in the enable batch, canonical order
    pub enabled: Vec<IntegrationKind>,
    /// Kinds submitted in the disable batch, canonical order
    pub disabled: Vec<IntegrationKind>,
    pub confirmation: Confirmation,
    /// Flattened read-back state (un-echoed fields keep their declared
    /// values)
    pub observed: DeclaredIntegrations,
}

fn trace_phase(apply_id: Uuid, phase: ApplyPhase) {
    tracing::debug!(apply = %apply_id, phase = %phase, "apply phase");
}

fn require_parent(linked: LinkedAccountId) -> Result<()> {
    if linked.0 <= 0 {
        return Err(Error::MissingParent(format!(
            "linked account id {} is not a valid remote identifier",
            linked.0
        )));
    }
    Ok(())
}

fn collect_payload_failures(payload: &ConfigurePayload, failures: &mut Vec<IntegrationFailure>) {
    for error in &payload.errors {
        let Some(kind) = error.kind else {
            // errors without a kind cannot be retried per-kind; log
            // verbatim rather than misattribute them
            tracing::error!(message = %error.message, "remote reported an unattributed batch error");
            continue;
        };
        failures.push(IntegrationFailure {
            kind,
            message: error.message.clone(),
        });
    }
}

/// Drives integration applies for linked accounts.
pub struct IntegrationReconciler<T> {
    transport: T,
    registry: IntegrationRegistry,
    settings: ConvergenceSettings,
}

impl<T: CloudTransport> IntegrationReconciler<T> {
    pub fn new(transport: T, registry: IntegrationRegistry, settings: ConvergenceSettings) -> Self {
        Self {
            transport,
            registry,
            settings,
        }
    }

    /// First apply for a linked account: everything declared is new.
    pub async fn create(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
        declared: &DeclaredIntegrations,
    ) -> Result<ApplyReport> {
        self.apply(account, linked, &DeclaredIntegrations::new(), declared)
            .await
    }

    /// Converge from the previously-recorded declaration to the new one.
    pub async fn update(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
        prior: &DeclaredIntegrations,
        declared: &DeclaredIntegrations,
    ) -> Result<ApplyReport> {
        self.apply(account, linked, prior, declared).await
    }

    async fn apply(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
        prior: &DeclaredIntegrations,
        declared: &DeclaredIntegrations,
    ) -> Result<ApplyReport> {
        require_parent(linked)?;

        let apply_id = Uuid::new_v4();
        trace_phase(apply_id, ApplyPhase::Declared);

        let diff = IntegrationDiff::between(prior, declared, &self.registry)?;
        trace_phase(apply_id, ApplyPhase::Diffed);

        if diff.is_noop() {
            // converged already; no remote traffic
            return Ok(ApplyReport {
                apply_id,
                enabled: Vec::new(),
                disabled: Vec::new(),
                confirmation: Confirmation::Observed,
                observed: declared.clone(),
            });
        }

        let (enable, disable) = dispatch(&diff, linked, &self.registry)?;
        trace_phase(apply_id, ApplyPhase::Dispatched);

        let mut failures = Vec::new();

        if !enable.is_empty() {
            tracing::info!(
                apply = %apply_id,
                linked_account = %linked,
                kinds = ?enable.kinds().collect::<Vec<_>>(),
                "submitting enable batch"
            );
            let payload = self
                .transport
                .configure_integrations(account, &enable)
                .await
                .inspect_err(|_| trace_phase(apply_id, ApplyPhase::Failed))?;
            collect_payload_failures(&payload, &mut failures);
        }

        if !disable.is_empty() {
            tracing::info!(
                apply = %apply_id,
                linked_account = %linked,
                kinds = ?disable.kinds().collect::<Vec<_>>(),
                "submitting disable batch"
            );
            let payload = self
                .transport
                .disable_integrations(account, &disable)
                .await
                .inspect_err(|_| trace_phase(apply_id, ApplyPhase::Failed))?;
            collect_payload_failures(&payload, &mut failures);
        }

        if !failures.is_empty() {
            // siblings that succeeded stay applied; the next apply's diff
            // retries exactly this subset
            trace_phase(apply_id, ApplyPhase::Failed);
            return Err(Error::PartialBatch { failures });
        }

        trace_phase(apply_id, ApplyPhase::Converging);
        let (observed, confirmation) = self.converge(account, linked, declared).await?;
        trace_phase(apply_id, ApplyPhase::Observed);

        Ok(ApplyReport {
            apply_id,
            enabled: enable.kinds().collect(),
            disabled: disable.kinds().collect(),
            confirmation,
            observed,
        })
    }

    /// Read the remote state and flatten it into declared form.
    /// `last_declared` supplies the values for fields the remote does not
    /// echo.
    pub async fn read(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
        last_declared: &DeclaredIntegrations,
    ) -> Result<DeclaredIntegrations> {
        require_parent(linked)?;
        let remote = self.transport.linked_account(account, linked).await?;
        Ok(self.flatten_account(&remote, last_declared))
    }

    /// Disable every registered kind under the linked account. Used when
    /// the parent itself is deleted.
    pub async fn delete(&self, account: AccountId, linked: LinkedAccountId) -> Result<()> {
        require_parent(linked)?;

        let batch = DisableBatch::disable_all(&self.registry, linked)?;
        tracing::info!(linked_account = %linked, "disabling all integrations");
        let payload = self.transport.disable_integrations(account, &batch).await?;

        let mut failures = Vec::new();
        collect_payload_failures(&payload, &mut failures);
        if !failures.is_empty() {
            return Err(Error::PartialBatch { failures });
        }

        Ok(())
    }

    fn flatten_account(
        &self,
        remote: &LinkedAccount,
        last_declared: &DeclaredIntegrations,
    ) -> DeclaredIntegrations {
        let mut observed = DeclaredIntegrations::new();

        for integration in &remote.integrations {
            let Ok(mapper) = self.registry.lookup(integration.kind) else {
                tracing::warn!(kind = %integration.kind, "remote reported an unregistered integration kind");
                continue;
            };

            let echoed = mapper.flatten(integration);
            let bag = match last_declared.get(integration.kind) {
                Some(last) => merge_observed(last, &echoed),
                None => echoed,
            };
            observed.declare(integration.kind, bag);
        }

        observed
    }

    async fn converge(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
        expected: &DeclaredIntegrations,
    ) -> Result<(DeclaredIntegrations, Confirmation)> {
        let attempts = self.settings.read_back_attempts.max(1);
        let mut observed = DeclaredIntegrations::new();

        for attempt in 1..=attempts {
            observed = self.read(account, linked, expected).await?;

            // converged <=> re-diffing observed against declared is a no-op
            if IntegrationDiff::between(&observed, expected, &self.registry)?.is_noop() {
                return Ok((observed, Confirmation::Observed));
            }

            if attempt < attempts {
                tokio::time::sleep(self.settings.read_back_delay).await;
            }
        }

        tracing::warn!(
            linked_account = %linked,
            attempts,
            "read-back did not confirm the applied state within the retry budget; \
             reporting unconfirmed and leaving reconciliation to the next apply"
        );
        Ok((observed, Confirmation::Unconfirmed))
    }
}

/// Declared shape of a group: display name plus member set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub members: MemberSet,
}

/// Outcome of one group apply
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub apply_id: Uuid,
    pub group: Group,
    pub added: Vec<crate::membership::UserId>,
    pub removed: Vec<crate::membership::UserId>,
    pub confirmation: Confirmation,
}

/// Drives group lifecycle and membership applies.
pub struct GroupReconciler<T> {
    transport: T,
    settings: ConvergenceSettings,
}

impl<T: CloudTransport> GroupReconciler<T> {
    pub fn new(transport: T, settings: ConvergenceSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Create the group, then add the initially-declared members.
    pub async fn create(&self, spec: &GroupSpec, authentication_domain_id: &str) -> Result<GroupReport> {
        if spec.name.is_empty() {
            return Err(Error::MissingParent(
                "group name must not be empty".to_string(),
            ));
        }
        if authentication_domain_id.is_empty() {
            return Err(Error::MissingParent(
                "authentication domain id must not be empty".to_string(),
            ));
        }

        let apply_id = Uuid::new_v4();
        let group = self
            .transport
            .create_group(&CreateGroupInput {
                name: spec.name.clone(),
                authentication_domain_id: authentication_domain_id.to_string(),
            })
            .await?;
        tracing::info!(apply = %apply_id, group = %group.id, "created group");

        let added = spec.members.iter().cloned().collect::<Vec<_>>();
        if !added.is_empty() {
            let payload = self.transport.add_group_members(&group.id, &added).await?;
            check_membership_payload(&group.id, "add members", &payload)?;
        }

        let (observed, confirmation) = self.converge(&group.id, &spec.members).await?;

        Ok(GroupReport {
            apply_id,
            group: observed.unwrap_or(group),
            added,
            removed: Vec::new(),
            confirmation,
        })
    }

    /// Converge the group from its prior declared shape to the new one:
    /// rename if the name changed, then apply the membership diff.
    pub async fn update(
        &self,
        group_id: &GroupId,
        prior: &GroupSpec,
        new: &GroupSpec,
    ) -> Result<GroupReport> {
        if new.name.is_empty() {
            return Err(Error::MissingParent(
                "group name must not be empty".to_string(),
            ));
        }

        let apply_id = Uuid::new_v4();
        let mut group = None;

        if prior.name != new.name {
            group = Some(self.transport.update_group_name(group_id, &new.name).await?);
            tracing::info!(apply = %apply_id, group = %group_id, "renamed group");
        }

        let diff = MemberDiff::between(&prior.members, &new.members);
        let added = diff.additions();
        let removed = diff.removals();

        if diff.is_noop() {
            tracing::debug!(apply = %apply_id, group = %group_id, "member sets already match");
        } else {
            // add before remove: a member moving between declared sets is
            // never observable as removed-but-not-yet-added
            if !added.is_empty() {
                tracing::info!(apply = %apply_id, group = %group_id, count = added.len(), "adding members");
                let payload = self.transport.add_group_members(group_id, &added).await?;
                check_membership_payload(group_id, "add members", &payload)?;
            }
            if !removed.is_empty() {
                tracing::info!(apply = %apply_id, group = %group_id, count = removed.len(), "removing members");
                let payload = self
                    .transport
                    .remove_group_members(group_id, &removed)
                    .await?;
                check_membership_payload(group_id, "remove members", &payload)?;
            }
        }

        let (observed, confirmation) = self.converge(group_id, &new.members).await?;
        let group = match observed.or(group) {
            Some(group) => group,
            None => self.require_group(group_id).await?,
        };

        Ok(GroupReport {
            apply_id,
            group,
            added,
            removed,
            confirmation,
        })
    }

    /// Read the group with bounded retry: the remote indexes membership
    /// asynchronously, so a just-created group may briefly read as absent.
    pub async fn read(&self, group_id: &GroupId) -> Result<Option<Group>> {
        let attempts = self.settings.read_back_attempts.max(1);

        for attempt in 1..=attempts {
            if let Some(group) = self.transport.group_with_members(group_id).await? {
                return Ok(Some(group));
            }
            if attempt < attempts {
                tokio::time::sleep(self.settings.read_back_delay).await;
            }
        }

        Ok(None)
    }

    pub async fn delete(&self, group_id: &GroupId) -> Result<()> {
        tracing::info!(group = %group_id, "deleting group");
        self.transport.delete_group(group_id).await
    }

    async fn require_group(&self, group_id: &GroupId) -> Result<Group> {
        self.read(group_id).await?.ok_or_else(|| Error::RemoteMutation {
            context: format!("read group {group_id}"),
            message: "group not found after mutation".to_string(),
        })
    }

    async fn converge(
        &self,
        group_id: &GroupId,
        expected: &MemberSet,
    ) -> Result<(Option<Group>, Confirmation)> {
        let attempts = self.settings.read_back_attempts.max(1);
        let mut last = None;

        for attempt in 1..=attempts {
            if let Some(group) = self.transport.group_with_members(group_id).await? {
                if group.member_set() == *expected {
                    return Ok((Some(group), Confirmation::Observed));
                }
                last = Some(group);
            }
            if attempt < attempts {
                tokio::time::sleep(self.settings.read_back_delay).await;
            }
        }

        tracing::warn!(
            group = %group_id,
            attempts,
            "membership read-back did not confirm the applied state within the retry budget"
        );
        Ok((last, Confirmation::Unconfirmed))
    }
}

fn check_membership_payload(
    group_id: &GroupId,
    context: &str,
    payload: &crate::remote::types::MembershipPayload,
) -> Result<()> {
    if payload.errors.is_empty() {
        return Ok(());
    }

    let message = payload
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    Err(Error::RemoteMutation {
        context: format!("{context} (group {group_id})"),
        message,
    })
}
