//! In-memory fakes for the capability traits.
//!
//! Every external collaborator the core depends on is faked here so the
//! handlers can be exercised end to end without a store or network.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use zaaksync_common::Result;

use zaaksync_core::capabilities::{
    Capabilities, EndpointDescriptor, MappingDescriptor, MappingEvaluator, ObjectStore, Record,
    ResourceLookup, SchemaDescriptor, SearchIndex, SourceDescriptor, Transport,
};
use zaaksync_core::sync::SynchronizationLink;

/// Resource lookup over fixed in-memory maps.
#[derive(Default)]
pub struct FakeResources {
    pub sources: HashMap<String, SourceDescriptor>,
    pub schemas: HashMap<String, SchemaDescriptor>,
    pub mappings: HashMap<String, MappingDescriptor>,
    pub endpoints: HashMap<String, EndpointDescriptor>,
}

impl FakeResources {
    pub fn with_source(mut self, reference: &str, location: &str) -> Self {
        self.sources.insert(
            reference.to_string(),
            SourceDescriptor {
                reference: reference.to_string(),
                location: location.to_string(),
                api_key: None,
            },
        );
        self
    }

    pub fn with_schema(mut self, reference: &str) -> Self {
        self.schemas.insert(
            reference.to_string(),
            SchemaDescriptor {
                reference: reference.to_string(),
                title: reference.rsplit('/').next().unwrap_or(reference).to_string(),
            },
        );
        self
    }

    pub fn with_mapping(mut self, reference: &str, definition: Value) -> Self {
        self.mappings.insert(
            reference.to_string(),
            MappingDescriptor {
                reference: reference.to_string(),
                definition,
            },
        );
        self
    }

    pub fn with_endpoint(mut self, reference: &str, path: &[&str]) -> Self {
        self.endpoints.insert(
            reference.to_string(),
            EndpointDescriptor {
                reference: reference.to_string(),
                path: path.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }
}

#[async_trait]
impl ResourceLookup for FakeResources {
    async fn get_source(&self, reference: &str) -> Option<SourceDescriptor> {
        self.sources.get(reference).cloned()
    }

    async fn get_schema(&self, reference: &str) -> Option<SchemaDescriptor> {
        self.schemas.get(reference).cloned()
    }

    async fn get_mapping(&self, reference: &str) -> Option<MappingDescriptor> {
        self.mappings.get(reference).cloned()
    }

    async fn get_endpoint(&self, reference: &str) -> Option<EndpointDescriptor> {
        self.endpoints.get(reference).cloned()
    }
}

/// Object store and search index sharing one record set.
#[derive(Default)]
pub struct FakeStore {
    pub records: Mutex<HashMap<Uuid, Record>>,
    pub links: Mutex<Vec<SynchronizationLink>>,
}

impl FakeStore {
    pub fn insert(&self, record: Record) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn record(&self, id: Uuid) -> Option<Record> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn persist(&self, record: &Record) -> Result<()> {
        self.records.lock().unwrap().insert(record.id, record.clone());
        Ok(())
    }

    async fn find_link(
        &self,
        record_id: Uuid,
        schema_ref: &str,
    ) -> Result<Option<SynchronizationLink>> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|link| link.record_id == record_id && link.schema_ref == schema_ref)
            .cloned())
    }

    async fn persist_link(&self, link: &SynchronizationLink) -> Result<()> {
        let mut links = self.links.lock().unwrap();
        if let Some(existing) = links.iter_mut().find(|candidate| candidate.id == link.id) {
            *existing = link.clone();
        } else {
            links.push(link.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for FakeStore {
    async fn search(&self, schema_refs: &[String], filter: &Map<String, Value>) -> Result<Vec<Value>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|record| schema_refs.contains(&record.schema_ref))
            .map(Record::to_value)
            .filter(|indexed| {
                filter
                    .iter()
                    .all(|(key, expected)| indexed.get(key) == Some(expected))
            })
            .collect())
    }
}

/// Minimal declarative evaluator: definition values starting with `$.` are
/// dotted paths into the input, everything else is a literal.
pub struct PathMappingEvaluator;

impl MappingEvaluator for PathMappingEvaluator {
    fn apply(&self, mapping: &MappingDescriptor, input: &Value) -> Result<Value> {
        let Value::Object(definition) = &mapping.definition else {
            return Ok(mapping.definition.clone());
        };

        let mut output = Map::new();
        for (key, rule) in definition {
            let value = match rule.as_str() {
                Some(path) if path.starts_with("$.") => path[2..]
                    .split('.')
                    .try_fold(input, |current, segment| current.get(segment))
                    .cloned()
                    .unwrap_or(Value::Null),
                _ => rule.clone(),
            };
            output.insert(key.clone(), value);
        }
        Ok(Value::Object(output))
    }
}

/// Transport returning a programmed response and recording every push.
pub struct FakeTransport {
    pub response: Option<Value>,
    pub sent: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn replying(response: Value) -> Self {
        Self {
            response: Some(response),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_payloads(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post(
        &self,
        source: &SourceDescriptor,
        location: &str,
        payload: &Value,
    ) -> Result<Option<Value>> {
        let target = format!("{}{}", source.location, location);
        self.sent.lock().unwrap().push((target, payload.clone()));
        Ok(self.response.clone())
    }
}

/// Assemble a `Capabilities` bundle from fakes.
pub fn capabilities(
    resources: Arc<FakeResources>,
    store: Arc<FakeStore>,
    transport: Arc<FakeTransport>,
) -> Capabilities {
    Capabilities {
        resources,
        search: store.clone(),
        mapping: Arc::new(PathMappingEvaluator),
        store,
        transport,
    }
}
