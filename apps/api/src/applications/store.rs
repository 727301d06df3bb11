use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;

use crate::models::{ApplicationDraft, ApplicationRecord, Status};

/// In-memory application store shared by all request handlers.
///
/// Records live in a sharded `DashMap`, so reads and writes on one id only
/// touch that id's shard. Ids come from an atomic counter that only moves
/// forward; a deleted id is never handed out again.
///
/// `list` walks the shards one at a time and may observe a mix of states
/// when other callers mutate concurrently. Single-record operations are
/// always consistent.
#[derive(Debug)]
pub struct ApplicationStore {
    records: DashMap<u64, ApplicationRecord>,
    next_id: AtomicU64,
}

impl Default for ApplicationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Stores a new record under a freshly allocated id.
    /// `last_update` starts out equal to `applied_on`.
    pub fn create(&self, draft: ApplicationDraft) -> ApplicationRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let applied_on = draft.applied_on;
        let record = ApplicationRecord::from_draft(id, draft, Some(applied_on));
        self.records.insert(id, record.clone());
        debug!("Created application {id}");
        record
    }

    pub fn get(&self, id: u64) -> Option<ApplicationRecord> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    /// Replaces every field of an existing record. When `last_update` is
    /// `None` the stored record's value is kept. Returns `None` for unknown ids.
    pub fn update(
        &self,
        id: u64,
        draft: ApplicationDraft,
        last_update: Option<NaiveDate>,
    ) -> Option<ApplicationRecord> {
        let mut entry = self.records.get_mut(&id)?;
        let last_update = last_update.or(entry.last_update);
        let record = ApplicationRecord::from_draft(id, draft, last_update);
        *entry = record.clone();
        debug!("Updated application {id}");
        Some(record)
    }

    /// Returns whether a record was actually removed.
    pub fn delete(&self, id: u64) -> bool {
        let removed = self.records.remove(&id).is_some();
        if removed {
            debug!("Deleted application {id}");
        }
        removed
    }

    /// Records matching both filters, most recently applied first.
    ///
    /// A blank `query` or a `None` status disables that filter. The query is
    /// a case-insensitive substring match on company, role or notes.
    pub fn list(&self, query: Option<&str>, status: Option<Status>) -> Vec<ApplicationRecord> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<ApplicationRecord> = self
            .records
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .filter(|entry| needle.as_deref().map_or(true, |n| matches_query(entry, n)))
            .map(|entry| entry.value().clone())
            .collect();

        matches.sort_by_key(|r| Reverse((r.applied_on, r.id)));
        matches
    }

    /// Every record, ordered by id ascending.
    pub fn snapshot(&self) -> Vec<ApplicationRecord> {
        let mut all: Vec<ApplicationRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by_key(|r| r.id);
        all
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// `needle` must already be lowercased.
fn matches_query(record: &ApplicationRecord, needle: &str) -> bool {
    let contains = |hay: &str| hay.to_lowercase().contains(needle);
    contains(&record.company)
        || contains(&record.role)
        || record.notes.as_deref().is_some_and(contains)
}
