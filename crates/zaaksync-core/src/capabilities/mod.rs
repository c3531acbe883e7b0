//! External capability interfaces
//!
//! The bridge core never talks to its collaborators directly. Every external
//! capability (resource lookup, search, mapping evaluation, object store,
//! remote transport) is an injected trait object, so handlers stay testable
//! against in-memory fakes.

pub mod mapping;
pub mod resources;
pub mod search;
pub mod store;
pub mod transport;

pub use mapping::MappingEvaluator;
pub use resources::{
    EndpointDescriptor, MappingDescriptor, ResourceLookup, SchemaDescriptor, SourceDescriptor,
};
pub use search::SearchIndex;
pub use store::{ObjectStore, Record};
pub use transport::{HttpTransport, Transport};

use std::sync::Arc;

/// Bundle of all injected capabilities.
///
/// Constructed once at wiring time and handed to every handler invocation.
#[derive(Clone)]
pub struct Capabilities {
    pub resources: Arc<dyn ResourceLookup>,
    pub search: Arc<dyn SearchIndex>,
    pub mapping: Arc<dyn MappingEvaluator>,
    pub store: Arc<dyn ObjectStore>,
    pub transport: Arc<dyn Transport>,
}
