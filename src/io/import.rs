use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::io::Read;

use crate::application::LedgerService;
use crate::domain::validate;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// A record that could not be imported
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    /// 1-based position of the record in the input
    pub record: usize,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every record without storing anything
    pub dry_run: bool,
}

/// Importer feeding raw records through the validated submit path
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import a JSON array of raw entry objects
    pub fn import_json<R: Read>(&self, reader: R, options: ImportOptions) -> Result<ImportResult> {
        let value: Value = serde_json::from_reader(reader).context("Invalid JSON input")?;
        let Value::Array(records) = value else {
            bail!("Expected a JSON array of entries");
        };

        let mut result = ImportResult::default();
        for (index, raw) in records.iter().enumerate() {
            self.submit_record(index + 1, raw, &options, &mut result);
        }
        Ok(result)
    }

    /// Import CSV with a `description,amount,kind` header.
    /// Cells are passed on as text so amounts are parsed by the validator.
    pub fn import_csv<R: Read>(&self, reader: R, options: ImportOptions) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let mut result = ImportResult::default();
        for (index, record) in csv_reader.records().enumerate() {
            let number = index + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    result.errors.push(ImportError {
                        record: number,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            // Empty cells count as missing fields
            let fields: Map<String, Value> = headers
                .iter()
                .zip(record.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
                .collect();

            self.submit_record(number, &Value::Object(fields), &options, &mut result);
        }
        Ok(result)
    }

    fn submit_record(
        &self,
        record: usize,
        raw: &Value,
        options: &ImportOptions,
        result: &mut ImportResult,
    ) {
        let outcome = if options.dry_run {
            validate(raw).map(|_| ()).map_err(|e| e.to_string())
        } else {
            self.service
                .submit_entry(raw)
                .map(|_| ())
                .map_err(|e| e.to_string())
        };

        match outcome {
            Ok(()) => result.imported += 1,
            Err(error) => result.errors.push(ImportError { record, error }),
        }
    }
}
