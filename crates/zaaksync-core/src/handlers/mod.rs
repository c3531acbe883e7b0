//! Bridge entry points
//!
//! Each handler takes an inbound event payload plus a resolved configuration
//! and returns a [`HandlerOutcome`]. The whole error taxonomy is caught
//! internally: any degradation is logged at warning level and the original
//! inbound payload is returned unchanged, so callers (synchronous or
//! command-triggered) never see an error.

pub mod case_sync;
pub mod document_sync;
pub mod file_materialize;

pub use case_sync::sync_case_to_target;
pub use document_sync::sync_document_to_target;
pub use file_materialize::{materialize_document_file, DOCUMENT_SCHEMA_REF};

use serde_json::Value;
use tracing::{error, warn};
use zaaksync_common::BridgeError;

use crate::response::HandlerOutcome;

/// Degrade to a no-op: log the error and hand the inbound payload back
/// unchanged.
fn degrade(event: Value, operation: &str, err: &BridgeError) -> HandlerOutcome {
    if err.is_degradable() {
        warn!(operation, error = %err, "Operation degraded to no-op");
    } else {
        error!(operation, error = %err, "Unexpected failure, returning input unchanged");
    }
    HandlerOutcome::Unchanged(event)
}

/// Walk a dotted path through nested objects.
fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// The business identification key of the inbound event, looked up first in
/// the response body (create/update events) and then in the request body.
fn identification_from_event(event: &Value) -> Option<&str> {
    value_at_path(event, "response.identificatie")
        .or_else(|| value_at_path(event, "body.identificatie"))
        .and_then(Value::as_str)
}
