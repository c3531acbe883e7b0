//! Document file materialization
//!
//! Decides from submitted data whether a document's content is inline
//! (base64), a pointer (URL/link), or chunk-pending, drives the chunk
//! planner accordingly, and always leaves the record with a canonical
//! download reference.

use base64::Engine;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;
use zaaksync_common::Result;

use crate::capabilities::{EndpointDescriptor, ObjectStore, Record};
use crate::chunk::FileChunkPlanner;
use crate::response::ResponseEnvelope;

/// Default mime type for documents submitted without a `formaat`.
const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// File metadata attached to a record on every materialization; `base64` and
/// `size` stay empty until inline content arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub base64: String,
    pub size: u64,
}

/// How the submitted content is to be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentDisposition {
    /// Non-empty, non-URL content: decode and attach inline.
    Inline,
    /// Content absent or a bare URL, no link, declared size present:
    /// delegate to the chunk planner.
    ChunkPending,
    /// A link is present, or content and size are both absent: content
    /// untouched, only the download reference is recomputed.
    Passthrough,
}

pub struct DocumentMaterializer {
    store: Arc<dyn ObjectStore>,
    base_url: String,
}

impl DocumentMaterializer {
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    /// Materialize a document's file state from `submitted` data, persist the
    /// record, and optionally produce a response envelope (201 for creation,
    /// 200 for update).
    ///
    /// `inbound_size` is the declared total size taken from the inbound
    /// submission; its absence skips chunk planning entirely.
    pub async fn materialize(
        &self,
        record: &mut Record,
        submitted: &Map<String, Value>,
        endpoint: &EndpointDescriptor,
        inbound_size: Option<u64>,
        method: &str,
        set_response: bool,
    ) -> Result<Option<ResponseEnvelope>> {
        let is_create = method.eq_ignore_ascii_case("POST");

        // Name and mime type follow every submission; previously attached
        // content survives until new inline content replaces it.
        let mut file = build_file_meta(submitted);
        if let Some(existing) = attached_file_meta(record) {
            file.base64 = existing.base64;
            file.size = existing.size;
        }
        apply_version(record, submitted);

        match classify_content(submitted, inbound_size) {
            ContentDisposition::Inline => {
                // Guarded by the classifier: inline content is always present here.
                let content = submitted
                    .get("inhoud")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                file.size = decoded_length(content);
                file.base64 = content.to_string();
                debug!(record_id = %record.id, size = file.size, "Attached inline content");
            }
            ContentDisposition::ChunkPending => {
                let declared = submitted
                    .get("bestandsomvang")
                    .and_then(Value::as_u64)
                    .or(inbound_size)
                    .unwrap_or(0);
                let existing = FileChunkPlanner::existing_parts(record);
                let plan = FileChunkPlanner::plan(record, declared, existing);

                if !plan.already_complete {
                    record.hydrate(json!({ "bestandsdelen": plan.parts }));
                    // Only the initial, creating request sets the locked flag;
                    // updates must not re-lock.
                    if is_create {
                        record.locked = true;
                        record.hydrate(json!({
                            "lock": plan.lock.map(|lock| lock.to_string()),
                            "locked": true,
                        }));
                    }
                } else if FileChunkPlanner::all_parts_completed(record) {
                    // Every planned part has been received; the upload session
                    // is finalized and the lock released.
                    FileChunkPlanner::release(record);
                }
            }
            ContentDisposition::Passthrough => {
                debug!(record_id = %record.id, "No content mutation, refreshing download reference only");
            }
        }

        record.hydrate(json!({ "bestand": &file }));

        // Terminal step regardless of branch: the canonical download reference.
        let reference = download_reference(&self.base_url, endpoint, &record.id.to_string());
        record.hydrate(json!({ "inhoud": reference }));

        self.store.persist(record).await?;

        if set_response {
            let status = if is_create {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            return Ok(Some(ResponseEnvelope::json(status, record.to_value())));
        }

        Ok(None)
    }
}

/// Classify the submitted content into one of the three materialization
/// branches.
fn classify_content(submitted: &Map<String, Value>, inbound_size: Option<u64>) -> ContentDisposition {
    let content = submitted.get("inhoud").and_then(Value::as_str);
    let link = submitted.get("link").and_then(Value::as_str);

    if let Some(content) = content {
        if !content.is_empty() && !is_url(content) {
            return ContentDisposition::Inline;
        }
    }

    let content_unusable = match content {
        None => true,
        Some(content) => is_url(content),
    };
    let link_absent = link.map_or(true, str::is_empty);

    if content_unusable && link_absent && inbound_size.is_some() {
        return ContentDisposition::ChunkPending;
    }

    ContentDisposition::Passthrough
}

fn is_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

/// Byte length of the decoded inline content. Undecodable content counts as
/// empty rather than failing the materialization.
fn decoded_length(content: &str) -> u64 {
    match base64::engine::general_purpose::STANDARD.decode(content) {
        Ok(decoded) => decoded.len() as u64,
        Err(err) => {
            warn!(error = %err, "Inline content is not valid base64");
            0
        }
    }
}

/// The file metadata already attached to the record, if any.
fn attached_file_meta(record: &Record) -> Option<FileMeta> {
    record
        .get("bestand")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// File metadata from submitted data: `titel` names the file, `formaat`
/// carries the mime type.
fn build_file_meta(submitted: &Map<String, Value>) -> FileMeta {
    FileMeta {
        name: submitted
            .get("titel")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        mime_type: submitted
            .get("formaat")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string(),
        base64: String::new(),
        size: 0,
    }
}

/// Version counter: absent becomes 1, present increments.
fn apply_version(record: &mut Record, submitted: &Map<String, Value>) {
    let next = match submitted.get("versie").and_then(Value::as_u64) {
        Some(version) => version + 1,
        None => 1,
    };
    record.hydrate(json!({ "versie": next }));
}

/// Compute the canonical download reference by substituting the record id
/// into the endpoint's path. Any path segment literally equal to `id`,
/// `[id]` or `{id}` is replaced; the base URL's trailing slash is stripped.
pub fn download_reference(base_url: &str, endpoint: &EndpointDescriptor, id: &str) -> String {
    let path: Vec<&str> = endpoint
        .path
        .iter()
        .map(|segment| match segment.as_str() {
            "id" | "[id]" | "{id}" => id,
            other => other,
        })
        .collect();

    format!("{}/api/{}", base_url.trim_end_matches('/'), path.join("/"))
}
