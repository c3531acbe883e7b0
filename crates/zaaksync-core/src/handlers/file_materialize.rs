//! File materialization entry point
//!
//! Resolves the document record behind an inbound registry event and
//! materializes its file state: inline content, a content pointer, or a
//! chunk-pending part plan with an advisory lock.

use serde_json::{Map, Value};
use tracing::info;
use zaaksync_common::{BridgeError, Result};

use super::{degrade, value_at_path};
use crate::capabilities::Capabilities;
use crate::config::{AppConfig, FileMaterializeConfig};
use crate::materialize::DocumentMaterializer;
use crate::resolve::RecordResolver;
use crate::response::{HandlerOutcome, ResponseEnvelope};

/// Schema of the single-document ("enkelvoudig informatieobject") records
/// this handler materializes files for.
pub const DOCUMENT_SCHEMA_REF: &str =
    "https://vng.opencatalogi.nl/schemas/drc.enkelvoudigInformatieObject.schema.json";

/// Materialize the file state of the document named by the inbound event.
pub async fn materialize_document_file(
    event: Value,
    config: &Value,
    app: &AppConfig,
    caps: &Capabilities,
) -> HandlerOutcome {
    match run(&event, config, app, caps).await {
        Ok(Some(envelope)) => HandlerOutcome::Synced(envelope),
        Ok(None) => HandlerOutcome::Unchanged(event),
        Err(err) => degrade(event, "materialize_document_file", &err),
    }
}

async fn run(
    event: &Value,
    config: &Value,
    app: &AppConfig,
    caps: &Capabilities,
) -> Result<Option<ResponseEnvelope>> {
    let config = FileMaterializeConfig::from_value(config)?;

    let endpoint = caps
        .resources
        .get_endpoint(&config.endpoint)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(config.endpoint.clone()))?;
    let schema = caps
        .resources
        .get_schema(DOCUMENT_SCHEMA_REF)
        .await
        .ok_or_else(|| BridgeError::UnresolvedReference(DOCUMENT_SCHEMA_REF.to_string()))?;

    let identification = value_at_path(event, &config.identification_path)
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::Config("event carries no identification".to_string()))?
        .to_string();

    info!(identification = %identification, "Materializing document file");

    let resolver = RecordResolver::new(caps.search.clone(), caps.store.clone());
    let mut filter = Map::new();
    filter.insert("identificatie".to_string(), Value::String(identification));
    let mut document = resolver.resolve(&schema, &filter).await?;

    let method = event.get("method").and_then(Value::as_str).unwrap_or("POST");
    let inbound_size = value_at_path(event, "body.bestandsomvang").and_then(Value::as_u64);
    let submitted = document.data.clone();

    let materializer = DocumentMaterializer::new(caps.store.clone(), app.base_url.clone());
    materializer
        .materialize(
            &mut document,
            &submitted,
            &endpoint,
            inbound_size,
            method,
            config.set_response,
        )
        .await
}
