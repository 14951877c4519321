//! Session-scoped id generation.
//!
//! Ids are `<unix-millis>-<seq>`. The sequence number is what guarantees
//! uniqueness; the timestamp only keeps ids roughly sortable and readable.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Issues ids that are unique for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fresh id. Never repeats for this generator.
    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{seq}", Utc::now().timestamp_millis())
    }

    /// Return a fresh id with a suffix, e.g. `...-bot`.
    pub fn next_id_with(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.next_id())
    }
}
