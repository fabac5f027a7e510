//! Remote API client
//!
//! Combines endpoint URL construction with the HTTP wrapper and exposes
//! the whole surface as [`CloudTransport`].

use crate::config::ReconcilerConfig;
use crate::error::{Error, Result};
use crate::integration::dispatch::{DisableBatch, EnableBatch};
use crate::membership::UserId;
use crate::remote::http::HttpClient;
use crate::remote::transport::CloudTransport;
use crate::remote::types::{
    AccountId, ConfigurePayload, CreateGroupInput, Group, GroupId, LinkedAccount, LinkedAccountId,
    MembershipPayload,
};
use async_trait::async_trait;
use serde_json::json;
use url::Url;

/// Main remote API client
#[derive(Clone)]
pub struct CloudClient {
    http: HttpClient,
    base: Url,
}

impl CloudClient {
    /// Create a client from configuration
    pub fn new(config: &ReconcilerConfig) -> Result<Self> {
        let base = Url::parse(&config.endpoint)?;
        let http = HttpClient::new(config.api_key.clone().unwrap_or_default())?;

        Ok(Self { http, base })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Build an account-scoped integrations URL
    fn integrations_url(&self, account: AccountId, action: &str) -> String {
        self.url(&format!("v1/accounts/{}/integrations/{}", account.0, action))
    }

    /// Build a linked-account URL
    fn linked_account_url(&self, account: AccountId, linked: LinkedAccountId) -> String {
        self.url(&format!(
            "v1/accounts/{}/linked_accounts/{}",
            account.0, linked.0
        ))
    }

    /// Build a group URL
    fn group_url(&self, path: &str) -> String {
        self.url(&format!("v1/groups/{path}"))
    }
}

#[async_trait]
impl CloudTransport for CloudClient {
    async fn configure_integrations(
        &self,
        account: AccountId,
        batch: &EnableBatch,
    ) -> Result<ConfigurePayload> {
        let url = self.integrations_url(account, "configure");
        let response = self.http.post(&url, Some(&batch.to_wire())).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn disable_integrations(
        &self,
        account: AccountId,
        batch: &DisableBatch,
    ) -> Result<ConfigurePayload> {
        let url = self.integrations_url(account, "disable");
        let response = self.http.post(&url, Some(&batch.to_wire())).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn linked_account(
        &self,
        account: AccountId,
        linked: LinkedAccountId,
    ) -> Result<LinkedAccount> {
        let url = self.linked_account_url(account, linked);
        let response = self.http.get(&url).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn create_group(&self, input: &CreateGroupInput) -> Result<Group> {
        let url = self.url("v1/groups");
        let body = serde_json::to_value(input)?;
        let response = self.http.post(&url, Some(&body)).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn update_group_name(&self, group: &GroupId, name: &str) -> Result<Group> {
        let url = self.group_url(&format!("{group}/rename"));
        let response = self.http.post(&url, Some(&json!({"name": name}))).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn delete_group(&self, group: &GroupId) -> Result<()> {
        let url = self.group_url(&group.0);
        self.http.delete(&url).await?;
        Ok(())
    }

    async fn add_group_members(
        &self,
        group: &GroupId,
        users: &[UserId],
    ) -> Result<MembershipPayload> {
        let url = self.group_url(&format!("{group}/members/add"));
        let response = self
            .http
            .post(&url, Some(&json!({"user_ids": users})))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn remove_group_members(
        &self,
        group: &GroupId,
        users: &[UserId],
    ) -> Result<MembershipPayload> {
        let url = self.group_url(&format!("{group}/members/remove"));
        let response = self
            .http
            .post(&url, Some(&json!({"user_ids": users})))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn group_with_members(&self, group: &GroupId) -> Result<Option<Group>> {
        let url = self.group_url(&group.0);
        match self.http.get(&url).await {
            Ok(response) => Ok(Some(serde_json::from_value(response)?)),
            Err(Error::Api { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> CloudClient {
        let config = ReconcilerConfig {
            endpoint: endpoint.to_string(),
            ..ReconcilerConfig::default()
        };
        CloudClient::new(&config).unwrap()
    }

    #[test]
    fn urls_nest_under_the_configured_endpoint() {
        let client = client("https://api.test:8443");
        assert_eq!(
            client.integrations_url(AccountId(7), "configure"),
            "https://api.test:8443/v1/accounts/7/integrations/configure"
        );
        assert_eq!(
            client.linked_account_url(AccountId(7), LinkedAccountId(12)),
            "https://api.test:8443/v1/accounts/7/linked_accounts/12"
        );
        assert_eq!(
            client.group_url("g-1/members/add"),
            "https://api.test:8443/v1/groups/g-1/members/add"
        );
    }

    #[test]
    fn trailing_slash_on_endpoint_does_not_double_up() {
        let client = client("https://api.test/");
        assert_eq!(
            client.group_url("g-1"),
            "https://api.test/v1/groups/g-1"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected_at_construction() {
        let config = ReconcilerConfig {
            endpoint: "not a url".to_string(),
            ..ReconcilerConfig::default()
        };
        assert!(CloudClient::new(&config).is_err());
    }
}
