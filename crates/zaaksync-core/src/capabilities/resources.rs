//! Resource lookup capability
//!
//! Resolves string configuration references to live descriptors. Every
//! descriptor is a plain value; an unresolvable reference yields `None`,
//! which handlers degrade to a no-op.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A remote target system a payload can be pushed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Stable configuration reference, e.g. `https://vrijbrp.nl/source/vrijbrp.dossiers.source.json`
    pub reference: String,
    /// Base URL of the target system.
    pub location: String,
    /// Optional API key sent as bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// A schema (object type) registered in the object store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub reference: String,
    pub title: String,
}

/// A declarative field-mapping definition, evaluated by [`super::MappingEvaluator`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingDescriptor {
    pub reference: String,
    /// Opaque mapping definition, interpreted by the evaluator only.
    pub definition: Value,
}

/// A registered HTTP endpoint, used to compute canonical download references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub reference: String,
    /// Path segments; a segment equal to `id`, `[id]` or `{id}` is substituted
    /// with the record id when a download reference is generated.
    pub path: Vec<String>,
}

/// Resolves configuration references to descriptors.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    async fn get_source(&self, reference: &str) -> Option<SourceDescriptor>;

    async fn get_schema(&self, reference: &str) -> Option<SchemaDescriptor>;

    async fn get_mapping(&self, reference: &str) -> Option<MappingDescriptor>;

    async fn get_endpoint(&self, reference: &str) -> Option<EndpointDescriptor>;
}
