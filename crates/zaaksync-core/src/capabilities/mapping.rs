//! Mapping evaluation capability
//!
//! Applies a declarative mapping definition to an input record. The mapping
//! language itself is opaque to this core; the evaluator is a pure function
//! supplied at wiring time.

use serde_json::Value;
use zaaksync_common::Result;

use super::resources::MappingDescriptor;

pub trait MappingEvaluator: Send + Sync {
    /// Apply `mapping` to `input` and return the mapped output.
    ///
    /// Must be pure: identical inputs always produce identical output.
    fn apply(&self, mapping: &MappingDescriptor, input: &Value) -> Result<Value>;
}
