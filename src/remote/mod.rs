//! Remote API surface: transport trait, HTTP implementation, and the wire
//! records both sides exchange.

pub mod client;
pub mod http;
pub mod transport;
pub mod types;

pub use client::CloudClient;
pub use transport::CloudTransport;
pub use types::{
    AccountId, ConfigurePayload, CreateGroupInput, Group, GroupId, LinkedAccount, LinkedAccountId,
    MembershipPayload, ObservedIntegration, PayloadError,
};
