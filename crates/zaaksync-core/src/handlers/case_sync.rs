//! Case synchronization entry point
//!
//! Resolves the authoritative case record for the event's identification,
//! extracts its flat value set, maps it to the target payload shape, and
//! pushes it to the target system.

use serde_json::{Map, Value};
use tracing::info;
use zaaksync_common::{BridgeError, Result};

use super::{degrade, identification_from_event};
use crate::capabilities::Capabilities;
use crate::config::CaseSyncConfig;
use crate::extract::{CaseType, CaseValueExtractor};
use crate::resolve::RecordResolver;
use crate::response::{HandlerOutcome, ResponseEnvelope};
use crate::sync::SyncCoordinator;

/// Payload key carrying the mapped documents of a case.
const DOCUMENTS_KEY: &str = "documenten";

/// Synchronize a case to the target system.
pub async fn sync_case_to_target(
    event: Value,
    config: &Value,
    caps: &Capabilities,
) -> HandlerOutcome {
    match run(&event, config, caps).await {
        Ok(Some(envelope)) => HandlerOutcome::Synced(envelope),
        Ok(None) => HandlerOutcome::Unchanged(event),
        Err(err) => degrade(event, "sync_case_to_target", &err),
    }
}

async fn run(
    event: &Value,
    config: &Value,
    caps: &Capabilities,
) -> Result<Option<ResponseEnvelope>> {
    let config = CaseSyncConfig::from_value(config)?;

    let source = caps
        .resources
        .get_source(&config.source)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.source.clone()))?;
    let schema = caps
        .resources
        .get_schema(&config.schema)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.schema.clone()))?;
    let document_schema = caps
        .resources
        .get_schema(&config.document_schema)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.document_schema.clone()))?;
    let values_mapping = caps
        .resources
        .get_mapping(&config.values_mapping)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.values_mapping.clone()))?;
    let documents_mapping = caps
        .resources
        .get_mapping(&config.documents_mapping)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.documents_mapping.clone()))?;

    let identification = identification_from_event(event)
        .ok_or_else(|| BridgeError::Config("event carries no identification".to_string()))?
        .to_string();

    info!(identification = %identification, "Syncing case to target");

    let resolver = RecordResolver::new(caps.search.clone(), caps.store.clone());
    let mut filter = Map::new();
    filter.insert("identificatie".to_string(), Value::String(identification.clone()));
    let case = resolver.resolve(&schema, &filter).await?;

    let case_type = CaseType::from_value(case.get("zaaktype").unwrap_or(&Value::Null));
    let values = CaseValueExtractor::extract(&case_type, &case);

    let mut payload = caps
        .mapping
        .apply(&values_mapping, &Value::Object(values))?;

    // Attached documents travel with the case, each run through its own
    // mapping.
    let mut document_filter = Map::new();
    document_filter.insert("zaak".to_string(), Value::String(identification));
    let documents = caps
        .search
        .search(std::slice::from_ref(&document_schema.reference), &document_filter)
        .await?;
    if !documents.is_empty() {
        let mapped: Result<Vec<Value>> = documents
            .iter()
            .map(|document| caps.mapping.apply(&documents_mapping, document))
            .collect();
        if let Value::Object(ref mut map) = payload {
            map.insert(DOCUMENTS_KEY.to_string(), Value::Array(mapped?));
        }
    }

    let coordinator = SyncCoordinator::new(caps.store.clone(), caps.transport.clone());
    coordinator
        .push(&case, &source, &schema, &payload, &config.location)
        .await
}
