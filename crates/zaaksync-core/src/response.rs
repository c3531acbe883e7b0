//! Handler response types
//!
//! Handlers never raise: every entry point returns a [`HandlerOutcome`] so
//! callers can tell "pushed successfully" from "nothing happened" without
//! relying on control flow.

use http::StatusCode;
use serde_json::Value;

/// A structured response produced by a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Value,
}

impl ResponseEnvelope {
    /// JSON envelope with the given status.
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body,
        }
    }

    /// 201 Created envelope wrapping a remote response body.
    pub fn created(body: Value) -> Self {
        Self::json(StatusCode::CREATED, body)
    }

    /// 200 OK envelope.
    pub fn ok(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }
}

/// Result of a handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    /// The operation completed and produced a response envelope.
    Synced(ResponseEnvelope),
    /// The operation degraded to a no-op; the original inbound payload is
    /// returned unchanged.
    Unchanged(Value),
}

impl HandlerOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, HandlerOutcome::Synced(_))
    }

    /// The envelope, when the operation produced one.
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            HandlerOutcome::Synced(envelope) => Some(envelope),
            HandlerOutcome::Unchanged(_) => None,
        }
    }
}
