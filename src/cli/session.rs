use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use uuid::Uuid;

use crate::application::{AppError, LedgerService};
use crate::domain::{format_cents, format_signed, LedgerEntry, Totals};
use crate::io::{DataFormat, Exporter, ImportOptions, Importer};

/// One line of a ledger session
#[derive(Parser, Debug)]
#[command(name = "finanzero", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SessionCommand {
    /// Record an income or expense
    Add {
        /// What the money was for (at least 3 characters)
        #[arg(allow_hyphen_values = true)]
        description: String,

        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Entry kind: income or expense
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show the history, most recent first
    List,

    /// Show income, expense and balance
    Totals,

    /// Show totals and history together
    Dashboard,

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// Import entries from a JSON or CSV file
    Import {
        /// Input file
        input: String,

        /// Format: json, csv (guessed from the extension if omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Validate without storing
        #[arg(long)]
        dry_run: bool,
    },

    /// Export entries or the dashboard
    Export {
        /// What to export: entries, dashboard
        export_type: String,

        /// Output file (session output if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv for entries, json for dashboard)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Leave the session
    #[command(alias = "quit")]
    Exit,
}

/// Whether the session keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// A line-oriented ledger session writing its output to `out`.
pub struct Session<'a, W: Write> {
    service: &'a LedgerService,
    out: W,
    prompt: bool,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(service: &'a LedgerService, out: W) -> Self {
        Self {
            service,
            out,
            prompt: false,
        }
    }

    /// Print a prompt before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run commands until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read session input")?;

            if self.handle_line(&line)? == LoopControl::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and run one line. Command failures are reported on the output
    /// and do not end the session; only output errors are returned.
    pub fn handle_line(&mut self, line: &str) -> Result<LoopControl> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let tokens = match shell_words::split(trimmed) {
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(self.out, "error: {}", e)?;
                return Ok(LoopControl::Continue);
            }
        };

        let command = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Also covers `help`, which clap reports as an "error"
                write!(self.out, "{}", e.render())?;
                return Ok(LoopControl::Continue);
            }
        };

        tracing::debug!(?command, "running session command");
        match self.execute(command) {
            Ok(control) => Ok(control),
            Err(e) => {
                writeln!(self.out, "error: {:#}", e)?;
                Ok(LoopControl::Continue)
            }
        }
    }

    fn execute(&mut self, command: SessionCommand) -> Result<LoopControl> {
        match command {
            SessionCommand::Add {
                description,
                amount,
                kind,
            } => self.run_add(description, amount, kind)?,

            SessionCommand::List => {
                let entries = self.service.list_entries();
                self.print_entries(&entries)?;
            }

            SessionCommand::Totals => {
                let dashboard = self.service.dashboard();
                self.print_totals(&dashboard.totals)?;
            }

            SessionCommand::Dashboard => {
                let dashboard = self.service.dashboard();
                self.print_totals(&dashboard.totals)?;
                writeln!(self.out)?;
                self.print_entries(&dashboard.entries)?;
            }

            SessionCommand::Delete { id } => {
                let entry_id =
                    Uuid::parse_str(&id).context("Invalid entry ID format (expected UUID)")?;
                let removed = self.service.remove_entry(entry_id)?;
                writeln!(
                    self.out,
                    "Deleted entry: {} {} ({})",
                    removed.description,
                    format_signed(removed.amount_cents, removed.kind.is_income()),
                    removed.id
                )?;
            }

            SessionCommand::Import {
                input,
                format,
                dry_run,
            } => self.run_import(&input, format.as_deref(), dry_run)?,

            SessionCommand::Export {
                export_type,
                output,
                format,
            } => self.run_export(&export_type, output.as_deref(), format.as_deref())?,

            SessionCommand::Exit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }

    fn run_add(&mut self, description: String, amount: String, kind: Option<String>) -> Result<()> {
        // Form fields arrive as text; numeric coercion is the validator's job.
        let mut fields = Map::new();
        fields.insert("description".into(), Value::String(description));
        fields.insert("amount".into(), Value::String(amount));
        if let Some(kind) = kind {
            fields.insert("kind".into(), Value::String(kind));
        }

        match self.service.submit_entry(&Value::Object(fields)) {
            Ok(entry) => {
                writeln!(
                    self.out,
                    "Recorded {}: {} {} ({})",
                    entry.kind,
                    entry.description,
                    format_cents(entry.amount_cents),
                    entry.id
                )?;
            }
            Err(AppError::Validation(errors)) => {
                writeln!(self.out, "Entry rejected:")?;
                for error in errors.errors() {
                    writeln!(self.out, "  - {}", error)?;
                }
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn run_import(&mut self, input: &str, format: Option<&str>, dry_run: bool) -> Result<()> {
        let format = match format {
            Some(f) => DataFormat::from_str(f)
                .with_context(|| format!("Unknown format '{}'. Use: json, csv", f))?,
            None => DataFormat::from_path(input),
        };

        let file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
        let reader = BufReader::new(file);
        let options = ImportOptions { dry_run };

        let importer = Importer::new(self.service);
        let result = match format {
            DataFormat::Json => importer.import_json(reader, options)?,
            DataFormat::Csv => importer.import_csv(reader, options)?,
        };

        if dry_run {
            writeln!(self.out, "DRY RUN - nothing was stored")?;
            writeln!(self.out, "Valid entries: {}", result.imported)?;
        } else {
            writeln!(self.out, "Imported {} entries", result.imported)?;
        }

        if !result.errors.is_empty() {
            writeln!(self.out, "Errors: {}", result.errors.len())?;
            for error in &result.errors {
                writeln!(self.out, "  record {}: {}", error.record, error.error)?;
            }
        }
        Ok(())
    }

    fn run_export(
        &mut self,
        export_type: &str,
        output: Option<&str>,
        format: Option<&str>,
    ) -> Result<()> {
        // Resolve before touching the output file so a bad request leaves it alone.
        let target = ExportTarget::resolve(export_type, format)?;

        match output {
            Some(path) => {
                let file =
                    File::create(path).with_context(|| format!("Failed to create {}", path))?;
                let count = target.write(self.service, file)?;
                writeln!(self.out, "Exported {} entries to {}", count, path)?;
            }
            None => {
                target.write(self.service, &mut self.out)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn print_entries(&mut self, entries: &[LedgerEntry]) -> Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "No entries yet.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:<36}  {:<16}  {:<24}  {:>14}  {:<8}",
            "ID", "DATE", "DESCRIPTION", "AMOUNT", "KIND"
        )?;
        writeln!(self.out, "{}", "-".repeat(106))?;
        for entry in entries {
            writeln!(
                self.out,
                "{:<36}  {:<16}  {:<24}  {:>14}  {:<8}",
                entry.id,
                entry.created_at.format("%Y-%m-%d %H:%M"),
                truncate(&entry.description, 24),
                format_signed(entry.amount_cents, entry.kind.is_income()),
                entry.kind
            )?;
        }
        Ok(())
    }

    fn print_totals(&mut self, totals: &Totals) -> Result<()> {
        writeln!(self.out, "Income:   {:>14}", format_cents(totals.income))?;
        writeln!(self.out, "Expense:  {:>14}", format_cents(totals.expense))?;
        writeln!(self.out, "Balance:  {:>14}", format_cents(totals.balance))?;
        Ok(())
    }
}

/// A supported combination of export type and format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportTarget {
    EntriesCsv,
    EntriesJson,
    DashboardJson,
}

impl ExportTarget {
    fn resolve(export_type: &str, format: Option<&str>) -> Result<Self> {
        let format = match format {
            Some(f) => DataFormat::from_str(f)
                .with_context(|| format!("Unknown format '{}'. Use: csv, json", f))?,
            None if export_type == "dashboard" => DataFormat::Json,
            None => DataFormat::Csv,
        };

        match (export_type, format) {
            ("entries", DataFormat::Csv) => Ok(ExportTarget::EntriesCsv),
            ("entries", DataFormat::Json) => Ok(ExportTarget::EntriesJson),
            ("dashboard", DataFormat::Json) => Ok(ExportTarget::DashboardJson),
            ("dashboard", DataFormat::Csv) => bail!("Dashboard export is only available as JSON"),
            (other, _) => bail!("Unknown export type '{}'. Use: entries, dashboard", other),
        }
    }

    /// Write the export and return how many entries it holds.
    fn write<W: Write>(self, service: &LedgerService, writer: W) -> Result<usize> {
        let exporter = Exporter::new(service);
        match self {
            ExportTarget::EntriesCsv => exporter.export_entries_csv(writer),
            ExportTarget::EntriesJson => exporter.export_entries_json(writer),
            ExportTarget::DashboardJson => {
                Ok(exporter.export_dashboard_json(writer)?.entries.len())
            }
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
