use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type EntryId = Uuid;

/// An owned, point-in-time copy of the ledger, most recent entry first.
pub type LedgerSnapshot = Vec<LedgerEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (rent, groceries, ...)
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, EntryKind::Income)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated payload for creating an entry. Only the validator and tests build these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntryInput {
    pub description: String,
    pub amount_cents: Cents,
    pub kind: EntryKind,
}

impl LedgerEntryInput {
    pub fn new(description: impl Into<String>, amount_cents: Cents, kind: EntryKind) -> Self {
        Self {
            description: description.into(),
            amount_cents,
            kind,
        }
    }
}

/// A recorded income or expense. Entries are immutable once stored;
/// corrections are made by deleting and recording again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Insertion counter assigned by the store, strictly increasing
    pub sequence: u64,
    pub description: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Amount with the kind's sign applied: positive for income, negative for expense.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            EntryKind::Income => self.amount_cents,
            EntryKind::Expense => -self.amount_cents,
        }
    }
}
