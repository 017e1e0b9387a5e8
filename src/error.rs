//! Structured routing errors (§7).
//!
//! Mirrors the teacher's `errors::AppError` in shape — one
//! `thiserror` variant per failure code, collaborator failures folded
//! in with `#[from]` — but carries no HTTP mapping: translating a
//! `RoutingError` into a transport response is the delivery layer's
//! job, not this core's.

use serde_json::{Map, Value};
use thiserror::Error;

/// The seven error codes from §7, each carrying a `details` map so
/// callers can inspect structured context without parsing `Display`
/// output.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("call not found")]
    CallNotFound { details: Map<String, Value> },

    #[error("call is not in a routable state")]
    InvalidCallState { details: Map<String, Value> },

    #[error("no bids available for this call")]
    NoBidsAvailable { details: Map<String, Value> },

    #[error("call was already routed by a concurrent request")]
    CallAlreadyRouted { details: Map<String, Value> },

    #[error("internal storage error: {cause}")]
    InternalError {
        cause: anyhow::Error,
        details: Map<String, Value>,
    },

    #[error("routing rules are missing or malformed")]
    InvalidRules { details: Map<String, Value> },

    #[error("call was queued but the winning bid could not be marked Won")]
    PartialCommit {
        call_id: uuid::Uuid,
        bid_id: uuid::Uuid,
        cause: anyhow::Error,
    },
}

impl RoutingError {
    /// The stable string code for this error, suitable for logging or
    /// surfacing to a caller without exposing `Display` text.
    pub fn code(&self) -> &'static str {
        match self {
            RoutingError::CallNotFound { .. } => "CallNotFound",
            RoutingError::InvalidCallState { .. } => "InvalidCallState",
            RoutingError::NoBidsAvailable { .. } => "NoBidsAvailable",
            RoutingError::CallAlreadyRouted { .. } => "CallAlreadyRouted",
            RoutingError::InternalError { .. } => "InternalError",
            RoutingError::InvalidRules { .. } => "InvalidRules",
            RoutingError::PartialCommit { .. } => "PartialCommit",
        }
    }

    /// Whether a transport-level retry of the whole `RouteCall` is
    /// permissible for this error, per the Recovery column of §7's
    /// table.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            RoutingError::NoBidsAvailable { .. } | RoutingError::InternalError { .. }
        )
    }

    pub(crate) fn call_not_found(call_id: uuid::Uuid) -> Self {
        let mut details = Map::new();
        details.insert("call_id".into(), Value::String(call_id.to_string()));
        RoutingError::CallNotFound { details }
    }

    pub(crate) fn invalid_call_state(call_id: uuid::Uuid, status: &str) -> Self {
        let mut details = Map::new();
        details.insert("call_id".into(), Value::String(call_id.to_string()));
        details.insert("status".into(), Value::String(status.to_string()));
        RoutingError::InvalidCallState { details }
    }

    pub(crate) fn no_bids(call_id: uuid::Uuid, reason: &str) -> Self {
        let mut details = Map::new();
        details.insert("call_id".into(), Value::String(call_id.to_string()));
        details.insert("reason".into(), Value::String(reason.to_string()));
        RoutingError::NoBidsAvailable { details }
    }

    pub(crate) fn already_routed(call_id: uuid::Uuid) -> Self {
        let mut details = Map::new();
        details.insert("call_id".into(), Value::String(call_id.to_string()));
        RoutingError::CallAlreadyRouted { details }
    }

    pub(crate) fn internal(step: &str, cause: anyhow::Error) -> Self {
        let mut details = Map::new();
        details.insert("step".into(), Value::String(step.to_string()));
        RoutingError::InternalError { cause, details }
    }

    pub(crate) fn invalid_rules(reason: &str) -> Self {
        let mut details = Map::new();
        details.insert("reason".into(), Value::String(reason.to_string()));
        RoutingError::InvalidRules { details }
    }
}
