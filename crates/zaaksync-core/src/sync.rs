//! Synchronization links and the idempotent push
//!
//! A synchronization link records the correspondence between a local record
//! and its counterpart in a target system. Links are created lazily on the
//! first push attempt and never deleted by this core. The push itself is
//! best-effort: an empty or failed remote response degrades to returning the
//! caller's input unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zaaksync_common::Result;

use crate::capabilities::store::SELF_REFERENCE_KEY;
use crate::capabilities::{ObjectStore, Record, SchemaDescriptor, SourceDescriptor, Transport};
use crate::response::ResponseEnvelope;

/// Correspondence between one local record and one
/// (source system, target schema) pair.
///
/// At most one active link exists per (record, target schema); creating a
/// second returns the existing link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronizationLink {
    pub id: Uuid,
    pub record_id: Uuid,
    pub source_ref: String,
    pub schema_ref: String,
    pub created_at: DateTime<Utc>,
    pub last_push_at: Option<DateTime<Utc>>,
}

impl SynchronizationLink {
    fn new(record_id: Uuid, source_ref: &str, schema_ref: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_id,
            source_ref: source_ref.to_string(),
            schema_ref: schema_ref.to_string(),
            created_at: Utc::now(),
            last_push_at: None,
        }
    }
}

pub struct SyncCoordinator {
    store: Arc<dyn ObjectStore>,
    transport: Arc<dyn Transport>,
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn ObjectStore>, transport: Arc<dyn Transport>) -> Self {
        Self { store, transport }
    }

    /// Return the existing link for this (record, schema) pair or create one.
    pub async fn get_or_create_link(
        &self,
        record: &Record,
        source: &SourceDescriptor,
        schema: &SchemaDescriptor,
    ) -> Result<SynchronizationLink> {
        if let Some(link) = self.store.find_link(record.id, &schema.reference).await? {
            debug!(link_id = %link.id, record_id = %record.id, "Reusing synchronization link");
            return Ok(link);
        }

        let link = SynchronizationLink::new(record.id, &source.reference, &schema.reference);
        self.store.persist_link(&link).await?;
        info!(link_id = %link.id, record_id = %record.id, schema = %schema.reference, "Created synchronization link");
        Ok(link)
    }

    /// Push `payload` to `location` on the target source.
    ///
    /// The payload is sanitized of internal self-reference metadata at every
    /// depth before transmission. A non-empty remote response is wrapped as a
    /// 201 envelope; an empty or failed response yields `None` so the caller
    /// can propagate its input as-is. Callers must not assume exactly-once
    /// delivery: the link guarantees at most one link record, not at most one
    /// transmitted payload.
    pub async fn push(
        &self,
        record: &Record,
        source: &SourceDescriptor,
        schema: &SchemaDescriptor,
        payload: &Value,
        location: &str,
    ) -> Result<Option<ResponseEnvelope>> {
        let mut link = self.get_or_create_link(record, source, schema).await?;

        let sanitized = strip_self_references(payload.clone());
        debug!(
            link_id = %link.id,
            url = %format!("{}{}", source.location, location),
            "Synchronizing record to target"
        );

        match self.transport.post(source, location, &sanitized).await? {
            Some(body) => {
                link.last_push_at = Some(Utc::now());
                self.store.persist_link(&link).await?;
                Ok(Some(ResponseEnvelope::created(body)))
            }
            None => {
                warn!(link_id = %link.id, "Remote returned no usable response, propagating input as-is");
                Ok(None)
            }
        }
    }
}

/// Recursively remove every key literally named `_self`, at any depth,
/// through both objects and arrays. Sibling data is preserved.
pub fn strip_self_references(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != SELF_REFERENCE_KEY)
                .map(|(key, nested)| (key, strip_self_references(nested)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(strip_self_references).collect())
        }
        other => other,
    }
}
