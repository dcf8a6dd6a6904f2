//! Append-only log of committed events.

use chrono::{DateTime, Utc};
use escrowdex_types::{EventRecord, ExchangeEvent, Result};

use crate::determinism::{HashRoot, compute_event_digest};

/// Committed events, in order. Sequence numbers keep counting across
/// [`drain`](Self::drain).
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    next_sequence: u64,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one operation's staged events, stamped `at`.
    pub fn commit(&mut self, staged: Vec<ExchangeEvent>, at: DateTime<Utc>) {
        for event in staged {
            self.records.push(EventRecord {
                sequence: self.next_sequence,
                at,
                event,
            });
            self.next_sequence += 1;
        }
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Take every retained record, leaving the log empty.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Digest of the retained records.
    pub fn digest(&self) -> Result<HashRoot> {
        compute_event_digest(&self.records)
    }
}
