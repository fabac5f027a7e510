//! The transport seam between the reconciliation engine and the remote
//! API.
//!
//! Every engine operation funnels through [`CloudTransport`]; the HTTP
//! implementation lives in [`crate::remote::client`], and tests substitute
//! an in-memory remote. Calls are synchronous from the engine's point of
//! view (awaited one at a time) and any returned error is authoritative.

use crate::error::Result;
use crate::integration::dispatch::{DisableBatch, EnableBatch};
use crate::membership::UserId;
use crate::remote::types::{
    AccountId, ConfigurePayload, CreateGroupInput, Group, GroupId, LinkedAccount, LinkedAccountId,
    MembershipPayload,
};
use async_trait::async_trait;

#[async_trait]
pub trait CloudTransport: Send + Sync {
    /// Submit an enable batch for a linked account's integrations
    async fn configure_integrations(
        &self,
        account: AccountId,
        batch: &EnableBatch,
    ) -> Result<ConfigurePayload>;

    /// Submit a disable batch for a linked account's integrations
    async fn disable_integrations(
        &self,
        account: AccountId,
        batch: &DisableBatch,
    ) -> Result<ConfigurePayload>;

    /// Read a linked account with its currently-active integrations
    async fn linked_account(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
    ) -> Result<LinkedAccount>;

    async fn create_group(&self, input: &CreateGroupInput) -> Result<Group>;

    /// Rename a group. The authentication domain cannot be changed here;
    /// the remote has no such verb.
    async fn update_group_name(&self, group: &GroupId, name: &str) -> Result<Group>;

    async fn delete_group(&self, group: &GroupId) -> Result<()>;

    async fn add_group_members(
        &self,
        group: &GroupId,
        users: &[UserId],
    ) -> Result<MembershipPayload>;

    async fn remove_group_members(
        &self,
        group: &GroupId,
        users: &[UserId],
    ) -> Result<MembershipPayload>;

    /// Read a group with its member set. `None` when the remote does not
    /// (yet) know the group; membership indexing lags mutations.
    async fn group_with_members(&self, group: &GroupId) -> Result<Option<Group>>;
}
