use std::collections::{HashSet, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{EntryId, LedgerEntry, LedgerEntryInput, LedgerSnapshot};

/// Source of creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Entry not found: {0}")]
pub struct NotFound(pub EntryId);

#[derive(Default)]
struct Entries {
    /// Most recent first
    items: VecDeque<LedgerEntry>,
    /// Every id ever handed out, including those of deleted entries
    issued: HashSet<EntryId>,
    last_sequence: u64,
}

impl Entries {
    /// Draw ids until one has never been issued by this store.
    fn fresh_id(&self, mut draw: impl FnMut() -> EntryId) -> EntryId {
        loop {
            let id = draw();
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }
}

/// In-memory store owning the ordered collection of ledger entries.
///
/// The collection is kept most-recent-first at all times: `create` pushes to
/// the front and `list` copies it out as is. A single lock guards it, so
/// reads share access while every mutation is exclusive.
pub struct LedgerStore {
    entries: RwLock<Entries>,
    clock: Box<dyn Clock>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    /// Create an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty store with a custom clock.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            clock: Box::new(clock),
        }
    }

    // No operation panics while holding the lock, so a poisoned guard still
    // wraps a consistent collection.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new entry and return it with its generated fields filled in.
    /// Identical inputs always produce distinct entries.
    pub fn create(&self, input: LedgerEntryInput) -> LedgerEntry {
        let mut entries = self.write();

        let id = entries.fresh_id(Uuid::new_v4);
        entries.issued.insert(id);

        // Never stamp earlier than the current head, even if the clock steps back.
        let now = self.clock.now();
        let created_at = match entries.items.front() {
            Some(head) if head.created_at > now => head.created_at,
            _ => now,
        };

        entries.last_sequence += 1;
        let entry = LedgerEntry {
            id,
            sequence: entries.last_sequence,
            description: input.description,
            amount_cents: input.amount_cents,
            kind: input.kind,
            created_at,
        };

        entries.items.push_front(entry.clone());
        tracing::debug!(
            id = %entry.id,
            sequence = entry.sequence,
            kind = %entry.kind,
            amount_cents = entry.amount_cents,
            "created ledger entry"
        );
        entry
    }

    /// Fresh copy of every entry, most recent first.
    /// Entries created at the same instant keep most-recently-inserted-first order.
    pub fn list(&self) -> LedgerSnapshot {
        self.read().items.iter().cloned().collect()
    }

    /// Get an entry by ID.
    pub fn get(&self, id: EntryId) -> Option<LedgerEntry> {
        self.read().items.iter().find(|e| e.id == id).cloned()
    }

    /// Remove an entry by ID and return it.
    /// Deleting an ID twice reports `NotFound` the second time.
    pub fn delete_by_id(&self, id: EntryId) -> Result<LedgerEntry, NotFound> {
        let mut entries = self.write();

        let position = entries
            .items
            .iter()
            .position(|e| e.id == id)
            .ok_or(NotFound(id))?;

        // VecDeque::remove shifts the tail, keeping relative order intact.
        let removed = entries.items.remove(position).ok_or(NotFound(id))?;
        tracing::debug!(id = %removed.id, sequence = removed.sequence, "deleted ledger entry");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }
}
