use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, LedgerSnapshot, Totals};

/// Entries plus the totals derived from them, as written by a dashboard export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub entries: LedgerSnapshot,
    pub totals: Totals,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export entries to CSV format, most recent first.
    /// Amounts are written as decimals so the file can be imported again.
    pub fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_entries();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "sequence",
            "created_at",
            "description",
            "amount",
            "kind",
        ])?;

        for entry in &entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.sequence.to_string(),
                entry.created_at.to_rfc3339(),
                entry.description.clone(),
                format_cents(entry.amount_cents),
                entry.kind.as_str().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export entries as a JSON array
    pub fn export_entries_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let entries = self.service.list_entries();

        let json = serde_json::to_string_pretty(&entries)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(entries.len())
    }

    /// Export entries and totals from a single snapshot as JSON
    pub fn export_dashboard_json<W: Write>(&self, mut writer: W) -> Result<DashboardExport> {
        let dashboard = self.service.dashboard();

        let export = DashboardExport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            entries: dashboard.entries,
            totals: dashboard.totals,
        };

        let json = serde_json::to_string_pretty(&export)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(export)
    }
}
