use serde::{Deserialize, Serialize};

use super::{EntryKind, LedgerEntry, TotalCents};

/// Income, expense and balance derived from a set of entries, in cents.
/// Never stored; always recomputed from a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: TotalCents,
    pub expense: TotalCents,
    pub balance: TotalCents,
}

/// Compute totals for a list of entries in a single pass.
/// Balance = sum of income - sum of expense
pub fn compute_totals(entries: &[LedgerEntry]) -> Totals {
    let (income, expense) = entries
        .iter()
        .fold((0, 0), |(income, expense): (TotalCents, TotalCents), entry| {
            let cents = TotalCents::from(entry.amount_cents);
            match entry.kind {
                EntryKind::Income => (income + cents, expense),
                EntryKind::Expense => (income, expense + cents),
            }
        });

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}
