//! Document synchronization entry point
//!
//! Resolves the document record for the event's identification and pushes
//! its full representation to the target system under the configured
//! synchronization schema.

use serde_json::{Map, Value};
use tracing::info;
use zaaksync_common::{BridgeError, Result};

use super::{degrade, identification_from_event};
use crate::capabilities::Capabilities;
use crate::config::DocumentSyncConfig;
use crate::resolve::RecordResolver;
use crate::response::{HandlerOutcome, ResponseEnvelope};
use crate::sync::SyncCoordinator;

/// Synchronize a document to the target system.
pub async fn sync_document_to_target(
    event: Value,
    config: &Value,
    caps: &Capabilities,
) -> HandlerOutcome {
    match run(&event, config, caps).await {
        Ok(Some(envelope)) => HandlerOutcome::Synced(envelope),
        Ok(None) => HandlerOutcome::Unchanged(event),
        Err(err) => degrade(event, "sync_document_to_target", &err),
    }
}

async fn run(
    event: &Value,
    config: &Value,
    caps: &Capabilities,
) -> Result<Option<ResponseEnvelope>> {
    let config = DocumentSyncConfig::from_value(config)?;

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
    let synchronization_schema = caps
        .resources
        .get_schema(&config.synchronization_entity)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.synchronization_entity.clone()))?;

    let identification = identification_from_event(event)
        .ok_or_else(|| BridgeError::Config("event carries no identification".to_string()))?
        .to_string();

    info!(identification = %identification, "Syncing document to target");

    let resolver = RecordResolver::new(caps.search.clone(), caps.store.clone());
    let mut filter = Map::new();
    filter.insert("identificatie".to_string(), Value::String(identification));
    let document = resolver.resolve(&schema, &filter).await?;

    let payload = document.to_value();

    let coordinator = SyncCoordinator::new(caps.store.clone(), caps.transport.clone());
    coordinator
        .push(
            &document,
            &source,
            &synchronization_schema,
            &payload,
            &config.location,
        )
        .await
}
