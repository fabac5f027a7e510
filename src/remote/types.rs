//! Wire-side records exchanged with the remote API.

use crate::integration::kind::IntegrationKind;
use crate::membership::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The tenant account every remote call is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

/// Remote identifier of a linked cloud account. Assigned by the remote on
/// creation, immutable afterwards; the key every integration operation
/// hangs off of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedAccountId(pub i64);

impl std::fmt::Display for LinkedAccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Remote identifier of a user group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One currently-active integration as the remote reports it: the kind
/// discriminator, the remote-assigned id, and whichever parameter fields
/// the remote chose to echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedIntegration {
    pub kind: IntegrationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Echoed parameter fields; the remote is not required to echo every
    /// input field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A linked cloud account with its active integrations, as read back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: LinkedAccountId,
    /// Owning tenant account
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub integrations: Vec<ObservedIntegration>,
}

/// Per-item error inside an otherwise-accepted batch. The remote processes
/// each integration independently and reports failures alongside results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IntegrationKind>,
    pub message: String,
}

/// Response to a configure (enable) or disable batch call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurePayload {
    #[serde(default)]
    pub integrations: Vec<ObservedIntegration>,
    #[serde(default)]
    pub errors: Vec<PayloadError>,
}

/// A user group with its member set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Immutable after creation; the remote has no verb to move a group
    /// between authentication domains
    pub authentication_domain_id: String,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

impl Group {
    /// Members as a set: duplicates collapse, order is irrelevant
    pub fn member_set(&self) -> crate::membership::MemberSet {
        self.user_ids.iter().cloned().collect()
    }
}

/// Request to create a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupInput {
    pub name: String,
    pub authentication_domain_id: String,
}

/// Response to a member add/remove batch call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipPayload {
    #[serde(default)]
    pub user_ids: Vec<UserId>,
    #[serde(default)]
    pub errors: Vec<PayloadError>,
}
