//! Search capability
//!
//! Equality-filtered queries against the object store's search index, scoped
//! to one or more schemas. Results are the raw indexed representations and
//! include the `_self` metadata block carrying the record id.

use async_trait::async_trait;
use serde_json::{Map, Value};
use zaaksync_common::Result;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Search records of the given schemas matching every key/value pair in
    /// `filter` exactly.
    async fn search(&self, schema_refs: &[String], filter: &Map<String, Value>) -> Result<Vec<Value>>;
}
