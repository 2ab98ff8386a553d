use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{compute_totals, validate, EntryId, LedgerEntry, LedgerSnapshot, Totals};
use crate::storage::LedgerStore;

use super::AppError;

/// Application service providing the operations the UI boundary calls.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    store: LedgerStore,
}

/// Entry list and the totals computed from that same list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub entries: LedgerSnapshot,
    pub totals: Totals,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LedgerService {
    /// Create a new ledger service with the given store.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Create a service over a fresh store using the system clock.
    pub fn in_memory() -> Self {
        Self::new(LedgerStore::new())
    }

    /// Validate raw input and record it.
    /// Rejected input never reaches the store.
    pub fn submit_entry(&self, raw: &Value) -> Result<LedgerEntry, AppError> {
        let input = validate(raw).inspect_err(|errors| {
            tracing::warn!(problems = errors.len(), "rejected ledger entry: {}", errors);
        })?;

        Ok(self.store.create(input))
    }

    /// Current entries, most recent first.
    /// Callers needing totals should compute them from this same list.
    pub fn list_entries(&self) -> LedgerSnapshot {
        self.store.list()
    }

    /// Get a single entry by ID.
    pub fn get_entry(&self, id: EntryId) -> Result<LedgerEntry, AppError> {
        self.store.get(id).ok_or(AppError::EntryNotFound(id))
    }

    /// Delete an entry, returning what was removed.
    pub fn remove_entry(&self, id: EntryId) -> Result<LedgerEntry, AppError> {
        self.store.delete_by_id(id).map_err(|err| {
            tracing::warn!(%id, "delete requested for unknown entry");
            AppError::from(err)
        })
    }

    /// Take one snapshot and derive the totals from it.
    pub fn dashboard(&self) -> Dashboard {
        let entries = self.store.list();
        let totals = compute_totals(&entries);
        Dashboard { entries, totals }
    }

    /// Record the sample entries a fresh installation starts with.
    pub fn seed_sample_entries(&self) -> Result<Vec<LedgerEntry>, AppError> {
        let samples = [
            json!({ "description": "Salário Mensal", "amount": 5000, "kind": "income" }),
            json!({ "description": "Aluguel", "amount": 1250, "kind": "expense" }),
        ];

        let created = samples
            .iter()
            .map(|raw| self.submit_entry(raw))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = created.len(), "seeded sample entries");
        Ok(created)
    }
}
