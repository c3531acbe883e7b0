//! Chunked file materialization planning
//!
//! Computes a deterministic part plan for a declared content size and
//! guards the upload session with an advisory lock on the owning record.
//! The lock is cooperative: planning treats "lock already present" as
//! authoritative and never overwrites it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::capabilities::Record;

/// Nominal chunk size in bytes used to derive the part count.
pub const NOMINAL_CHUNK_SIZE: u64 = 1_000_000;

/// One contiguous byte range of a document's content.
///
/// Serialized with the upstream wire field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// 1-based, contiguous sequence number.
    #[serde(rename = "volgnummer")]
    pub sequence: u32,
    /// Declared size of this part in bytes.
    #[serde(rename = "omvang")]
    pub size: u64,
    /// Whether this part's content has been received.
    #[serde(rename = "voltooid")]
    pub completed: bool,
    /// Lock token of the upload session that created this part.
    pub lock: String,
}

/// Outcome of a planning call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    /// Ordered part descriptors, empty when the plan was already complete.
    pub parts: Vec<FilePart>,
    /// Lock token for the session, when one is held.
    pub lock: Option<Uuid>,
    /// Whether this call minted the lock (the initial, creating request).
    pub lock_created: bool,
    /// Re-submission of a completed plan; nothing was issued.
    pub already_complete: bool,
}

pub struct FileChunkPlanner;

impl FileChunkPlanner {
    /// Number of parts for a declared total size.
    pub fn part_count(declared_total_size: u64) -> u64 {
        declared_total_size.div_ceil(NOMINAL_CHUNK_SIZE)
    }

    /// Size of every part. The upstream arithmetic applies
    /// `ceil(total / part_count)` uniformly instead of a fixed size with a
    /// short last part; preserved exactly for compatibility.
    pub fn part_size(declared_total_size: u64, part_count: u64) -> u64 {
        declared_total_size.div_ceil(part_count)
    }

    /// Compute the part plan for `record`, locking it for the session.
    ///
    /// Idempotent: when `existing_parts` already covers the computed part
    /// count, nothing is issued and the record's lock state is untouched.
    pub fn plan(record: &mut Record, declared_total_size: u64, existing_parts: usize) -> PlanResult {
        let part_count = Self::part_count(declared_total_size);

        if existing_parts as u64 >= part_count {
            debug!(
                record_id = %record.id,
                existing_parts,
                part_count,
                "Part plan already complete, not re-issuing"
            );
            return PlanResult {
                parts: Vec::new(),
                lock: record.lock,
                lock_created: false,
                already_complete: true,
            };
        }

        // Re-read the current lock state immediately before deciding to mint
        // one; an existing token is authoritative for the whole session.
        let lock_created = record.lock.is_none();
        let lock = *record.lock.get_or_insert_with(Uuid::new_v4);

        let part_size = Self::part_size(declared_total_size, part_count);
        let parts = (1..=part_count)
            .map(|sequence| FilePart {
                sequence: sequence as u32,
                size: part_size,
                completed: false,
                lock: lock.to_string(),
            })
            .collect();

        debug!(
            record_id = %record.id,
            part_count,
            part_size,
            lock_created,
            "Issued part plan"
        );

        PlanResult {
            parts,
            lock: Some(lock),
            lock_created,
            already_complete: false,
        }
    }

    /// Whether every recorded part has been completed.
    pub fn all_parts_completed(record: &Record) -> bool {
        record
            .get("bestandsdelen")
            .and_then(Value::as_array)
            .map(|parts| {
                !parts.is_empty()
                    && parts
                        .iter()
                        .all(|part| part.get("voltooid").and_then(Value::as_bool) == Some(true))
            })
            .unwrap_or(false)
    }

    /// Release the upload session: clear the lock and the locked flag.
    ///
    /// There is no automatic expiry; a session ends only when the upload is
    /// explicitly finalized or abandoned through this call.
    pub fn release(record: &mut Record) {
        record.lock = None;
        record.locked = false;
        record.hydrate(serde_json::json!({ "lock": Value::Null, "locked": false }));
        debug!(record_id = %record.id, "Released upload lock");
    }

    /// Number of parts already recorded on a document's `bestandsdelen`.
    pub fn existing_parts(record: &Record) -> usize {
        record
            .get("bestandsdelen")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
