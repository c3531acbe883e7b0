//! Object store capability and the record model
//!
//! Records are owned and versioned by an external object store; this core
//! only reads them and requests mutations through [`ObjectStore::persist`].

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;
use zaaksync_common::Result;

use crate::sync::SynchronizationLink;

/// Internal metadata key attached to a record's full representation.
///
/// Stripped recursively from every outgoing payload before transmission.
pub const SELF_REFERENCE_KEY: &str = "_self";

/// An externally stored domain object.
///
/// Exposes a flat key/value view over `data`; nested properties and relations
/// are plain JSON trees inside it. The `lock` token and `locked` flag are the
/// advisory-lock state used during chunked uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub schema_ref: String,
    pub data: Map<String, Value>,
    pub lock: Option<Uuid>,
    pub locked: bool,
}

impl Record {
    /// Create an empty record for the given schema with a fresh id.
    pub fn new(schema_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_ref: schema_ref.into(),
            data: Map::new(),
            lock: None,
            locked: false,
        }
    }

    /// Merge the top-level keys of `partial` into this record's data.
    ///
    /// Non-object values are ignored, matching the store's partial-update
    /// semantics.
    pub fn hydrate(&mut self, partial: Value) {
        if let Value::Object(map) = partial {
            for (key, value) in map {
                self.data.insert(key, value);
            }
        }
    }

    /// Full representation of this record, including the `_self` metadata
    /// block the object store attaches to every indexed object.
    pub fn to_value(&self) -> Value {
        let mut map = self.data.clone();
        map.insert(
            SELF_REFERENCE_KEY.to_string(),
            json!({
                "id": self.id.to_string(),
                "schema": self.schema_ref,
            }),
        );
        Value::Object(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.data.get(key).and_then(Value::as_u64)
    }
}

/// Persistent object store boundary.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Load the full record by id, `None` when it does not exist.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record>>;

    /// Persist the record's current state.
    async fn persist(&self, record: &Record) -> Result<()>;

    /// Find the synchronization link for a (record, target schema) pair.
    async fn find_link(
        &self,
        record_id: Uuid,
        schema_ref: &str,
    ) -> Result<Option<SynchronizationLink>>;

    /// Persist a synchronization link.
    async fn persist_link(&self, link: &SynchronizationLink) -> Result<()>;
}
