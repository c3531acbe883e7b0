//! Identification-based record resolution
//!
//! Finds exactly one record for a business identification key. Zero or
//! multiple matches abort the operation; every downstream step assumes a
//! unique, unambiguous source record.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use zaaksync_common::{BridgeError, Result};

use crate::capabilities::store::SELF_REFERENCE_KEY;
use crate::capabilities::{ObjectStore, Record, SchemaDescriptor, SearchIndex};

pub struct RecordResolver {
    search: Arc<dyn SearchIndex>,
    store: Arc<dyn ObjectStore>,
}

impl RecordResolver {
    pub fn new(search: Arc<dyn SearchIndex>, store: Arc<dyn ObjectStore>) -> Self {
        Self { search, store }
    }

    /// Resolve the single record of `schema` matching `filter`.
    ///
    /// # Errors
    ///
    /// - `NotFound` - no record matches the filter
    /// - `AmbiguousMatch` - more than one record matches the filter
    pub async fn resolve(
        &self,
        schema: &SchemaDescriptor,
        filter: &Map<String, Value>,
    ) -> Result<Record> {
        let results = self
            .search
            .search(std::slice::from_ref(&schema.reference), filter)
            .await?;

        if results.is_empty() {
            return Err(BridgeError::NotFound(describe_filter(filter)));
        }
        if results.len() > 1 {
            return Err(BridgeError::AmbiguousMatch(describe_filter(filter)));
        }

        let id = result_id(&results[0])?;
        debug!(record_id = %id, schema = %schema.reference, "Resolved unique record");

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| BridgeError::NotFound(format!("record {id} missing from store")))
    }
}

/// Extract the record id from a search result's `_self` metadata.
fn result_id(result: &Value) -> Result<Uuid> {
    result
        .get(SELF_REFERENCE_KEY)
        .and_then(|meta| meta.get("id"))
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| BridgeError::Storage("search result carries no record id".to_string()))
}

fn describe_filter(filter: &Map<String, Value>) -> String {
    filter
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
