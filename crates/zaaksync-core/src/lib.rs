//! Zaaksync Core Library
//!
//! Synchronizes case-management records ("zaak") and their attached
//! documents between a source registry and a target back-office system, and
//! materializes large binary document content as resumable, lockable file
//! parts.
//!
//! # Architecture
//!
//! - **resolve**: identification-based record resolution (exactly-one-or-abort)
//! - **extract**: flattening a case's properties and roles into a value set
//! - **chunk**: deterministic part plans with advisory locking
//! - **materialize**: inline / pointer / chunk-pending file state machine
//! - **sync**: synchronization links and the best-effort push
//! - **handlers**: the three entry points consuming all of the above
//! - **capabilities**: injected traits over the external collaborators
//!   (resource lookup, search, mapping evaluation, object store, transport)
//!
//! Every handler degrades to a no-op on failure: errors are logged at
//! warning level and the inbound payload is returned unchanged. The bridge
//! is a best-effort integration, not a transactional ledger; retry is the
//! responsibility of the event source re-delivering the event.
//!
//! # Example
//!
//! ```no_run
//! use zaaksync_core::{config::AppConfig, handlers};
//! # async fn example(caps: zaaksync_core::capabilities::Capabilities) -> anyhow::Result<()> {
//! let app = AppConfig::load()?;
//! let event = serde_json::json!({"response": {"identificatie": "Z-001"}});
//! let config = serde_json::json!({
//!     "source": "https://vrijbrp.nl/source/vrijbrp.dossiers.source.json",
//!     "location": "/api/first-registrants",
//!     "schema": "https://vng.opencatalogi.nl/schemas/zrc.zaak.schema.json",
//!     "documentSchema": "https://vng.opencatalogi.nl/schemas/drc.enkelvoudigInformatieObject.schema.json",
//!     "valuesMapping": "https://vrijbrp.nl/mapping/vrijbrp.zaakEigenschappen.mapping.json",
//!     "documentsMapping": "https://vrijbrp.nl/mapping/vrijbrp.documenten.mapping.json",
//! });
//! let outcome = handlers::sync_case_to_target(event, &config, &caps).await;
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod chunk;
pub mod config;
pub mod extract;
pub mod handlers;
pub mod materialize;
pub mod resolve;
pub mod response;
pub mod sync;

pub use capabilities::Capabilities;
pub use chunk::{FileChunkPlanner, FilePart, PlanResult, NOMINAL_CHUNK_SIZE};
pub use extract::{CaseType, CaseValueExtractor, CaseValueSet};
pub use materialize::DocumentMaterializer;
pub use resolve::RecordResolver;
pub use response::{HandlerOutcome, ResponseEnvelope};
pub use sync::{SyncCoordinator, SynchronizationLink};
