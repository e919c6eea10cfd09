//! Bounded storage for trace records.
//!
//! Keeps the newest records and counts how many each chain still owns, so
//! one traversal can be pulled out of an interleaved trace.

use std::collections::{BTreeMap, HashMap, VecDeque};

use semantium_recording::ChainId;

use super::record::{TraceEvent, TraceRecord};

/// Records kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Holds at most `capacity` records; the oldest go first.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_id: u64,
    // chain -> number of its records still buffered
    owners: BTreeMap<ChainId, usize>,
}

impl TraceBuffer {
    /// An empty buffer holding up to `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 0,
            owners: BTreeMap::new(),
        }
    }

    /// Stores `event` for `chain` and returns the id it was given.
    ///
    /// Ids start at zero and are never reused, even after eviction or
    /// [`TraceBuffer::clear`].
    pub fn push(&mut self, chain: ChainId, timestamp_ns: u64, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.records
            .push_back(TraceRecord::new(id, chain, timestamp_ns, event));
        *self.owners.entry(chain).or_default() += 1;

        while self.records.len() > self.capacity {
            let Some(evicted) = self.records.pop_front() else {
                break;
            };
            if let Some(count) = self.owners.get_mut(&evicted.chain) {
                *count -= 1;
                if *count == 0 {
                    self.owners.remove(&evicted.chain);
                }
            }
        }

        id
    }

    /// Buffered record count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record without resetting the id counter.
    pub fn clear(&mut self) {
        self.records.clear();
        self.owners.clear();
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Looks a record up by id, if it has not been evicted.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&TraceRecord> {
        let oldest = self.records.front()?.id;
        let offset = usize::try_from(id.checked_sub(oldest)?).ok()?;
        self.records.get(offset)
    }

    /// Everything one chain recorded, in order.
    #[must_use]
    pub fn records_for_chain(&self, chain: ChainId) -> Vec<&TraceRecord> {
        if self.owners.contains_key(&chain) {
            self.matching(|r| r.chain == chain)
        } else {
            Vec::new()
        }
    }

    /// The newest `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Records for which `predicate` holds.
    pub fn matching<F>(&self, predicate: F) -> Vec<&TraceRecord>
    where
        F: Fn(&TraceRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Records whose event tag is `event_type`, e.g. `"chain-forked"`.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.matching(|r| r.event_type() == event_type)
    }

    /// Chains that still own at least one record, by id.
    #[must_use]
    pub fn chains(&self) -> Vec<ChainId> {
        self.owners.keys().copied().collect()
    }

    /// A snapshot of sizes and per-event counts.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let event_counts = self.records.iter().fold(HashMap::new(), |mut counts, r| {
            *counts.entry(r.event_type()).or_insert(0) += 1;
            counts
        });

        TraceBufferStats {
            record_count: self.records.len(),
            capacity: self.capacity,
            chain_count: self.owners.len(),
            event_counts,
        }
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// What a [`TraceBuffer`] holds at one moment.
#[derive(Clone, Debug)]
pub struct TraceBufferStats {
    /// Buffered records.
    pub record_count: usize,
    /// Most records the buffer will hold.
    pub capacity: usize,
    /// Chains owning at least one record.
    pub chain_count: usize,
    /// Records per event tag.
    pub event_counts: HashMap<&'static str, usize>,
}

// =============================================================================
// Tests
// =============================================================================
