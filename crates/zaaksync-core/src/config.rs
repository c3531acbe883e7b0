//! Configuration management
//!
//! `AppConfig` is the process-level configuration loaded from the
//! environment. The per-handler action configs deserialize from the inbound
//! configuration JSON and are validated structurally before the core runs;
//! a missing or empty reference degrades the operation to a no-op.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zaaksync_common::{BridgeError, Result};

/// Default public base URL used in canonical download references.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default remote push timeout in seconds.
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;

/// Process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public base URL of this gateway, prefixing download references.
    pub base_url: String,
    /// Timeout for pushes to target systems.
    pub push_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig {
            base_url: std::env::var("ZAAKSYNC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            push_timeout_secs: std::env::var("ZAAKSYNC_PUSH_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("Base URL cannot be empty");
        }

        if url::Url::parse(&self.base_url).is_err() {
            anyhow::bail!("Base URL is not a valid URL: {}", self.base_url);
        }

        if self.push_timeout_secs == 0 {
            anyhow::bail!("Push timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            push_timeout_secs: DEFAULT_PUSH_TIMEOUT_SECS,
        }
    }
}

/// Configuration for the case synchronization handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSyncConfig {
    /// Reference of the target source to push to.
    pub source: String,
    /// Endpoint on the source, e.g. `/api/first-registrants`.
    pub location: String,
    /// Reference of the case schema.
    pub schema: String,
    /// Reference of the document schema.
    pub document_schema: String,
    /// Reference of the case-values mapping.
    pub values_mapping: String,
    /// Reference of the documents mapping.
    pub documents_mapping: String,
}

impl CaseSyncConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|err| BridgeError::Config(format!("invalid case sync config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        require(&self.source, "source")?;
        require(&self.location, "location")?;
        require(&self.schema, "schema")?;
        require(&self.document_schema, "documentSchema")?;
        require(&self.values_mapping, "valuesMapping")?;
        require(&self.documents_mapping, "documentsMapping")?;
        Ok(())
    }
}

/// Configuration for the document synchronization handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSyncConfig {
    pub source: String,
    pub location: String,
    /// Reference of the document schema to resolve against.
    pub schema: String,
    /// Reference of the schema the synchronization link is kept under.
    pub synchronization_entity: String,
}

impl DocumentSyncConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|err| BridgeError::Config(format!("invalid document sync config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        require(&self.source, "source")?;
        require(&self.location, "location")?;
        require(&self.schema, "schema")?;
        require(&self.synchronization_entity, "synchronizationEntity")?;
        Ok(())
    }
}

/// Configuration for the file materialization handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMaterializeConfig {
    /// Reference of the registered download endpoint.
    pub endpoint: String,
    /// Dotted path to the identification in the inbound event body.
    #[serde(default = "default_identification_path")]
    pub identification_path: String,
    /// Whether the handler should produce a response envelope.
    #[serde(default)]
    pub set_response: bool,
}

/// The inbound document events arrive in a SOAP envelope; this is where the
/// upstream registry puts the identification.
fn default_identification_path() -> String {
    "body.SOAP-ENV:Body.ns2:edcLk01.ns2:object.ns2:identificatie".to_string()
}

impl FileMaterializeConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|err| BridgeError::Config(format!("invalid file materialize config: {err}")))?;
        require(&config.endpoint, "endpoint")?;
        require(&config.identification_path, "identificationPath")?;
        Ok(config)
    }
}

fn require(value: &str, key: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BridgeError::Config(format!("missing required key: {key}")));
    }
    Ok(())
}
