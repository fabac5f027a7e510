//! Error taxonomy for the reconciliation engine.
//!
//! Errors split into invariant violations (unknown kinds, malformed
//! parameter bags; unreachable when the declarative front-end validates
//! upstream), fatal remote failures, and aggregate per-kind batch
//! failures. An exhausted read-back budget is deliberately *not* an error;
//! see [`crate::convergence::Confirmation`].

use crate::integration::kind::IntegrationKind;

pub type Result<T> = std::result::Result<T, Error>;

/// One failed sub-component inside an otherwise-submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationFailure {
    pub kind: IntegrationKind,
    pub message: String,
}

impl std::fmt::Display for IntegrationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A kind reached the registry that was never registered. The
    /// enumeration is closed, so this is a programming error, not user
    /// input.
    #[error("unknown integration kind: {kind}")]
    UnknownIntegration { kind: String },

    /// A declared parameter bag did not deserialize into the kind's
    /// parameter shape. Upstream schema validation makes this unreachable
    /// for well-formed configuration.
    #[error("invalid parameters for {kind} integration: {source}")]
    InvalidParams {
        kind: IntegrationKind,
        #[source]
        source: serde_json::Error,
    },

    /// The parent resource's remote identifier is missing or invalid.
    /// Fatal before any sub-component dispatch begins.
    #[error("missing or invalid parent identifier: {0}")]
    MissingParent(String),

    /// A remote mutation call itself failed. Fatal for this apply and not
    /// retried here: enable calls are not idempotent remote-side.
    #[error("remote mutation failed ({context}): {message}")]
    RemoteMutation { context: String, message: String },

    /// Some sub-components in a batch failed while siblings succeeded.
    /// Lists every failed kind so the caller can see exactly what the next
    /// apply will retry.
    #[error("{} integration(s) failed: {}", failures.len(), format_failures(failures))]
    PartialBatch { failures: Vec<IntegrationFailure> },

    /// The remote API answered with a non-success status.
    #[error("API request failed: {status}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(String),
}

fn format_failures(failures: &[IntegrationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map an API error to a short operator-facing message.
///
/// Raw bodies may carry account internals, so the generic classifications
/// here are what surfaces in user-visible diagnostics.
pub fn describe_api_error(error: &Error) -> String {
    if let Error::Api { status, .. } = error {
        return match status.as_u16() {
            401 => "Authentication failed. Check the configured API key.".to_string(),
            403 => "Permission denied. Check the API key's account permissions.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500 | 503 => "Remote service temporarily unavailable. Please try again.".to_string(),
            _ => format!("Request failed with status {status}."),
        };
    }

    error.to_string()
}
