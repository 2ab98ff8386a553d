mod common;

use std::fs;

use anyhow::Result;
use common::{run_session, test_service};
use finanzero::domain::EntryKind;
use finanzero::io::DashboardExport;
use tempfile::TempDir;

#[test]
fn test_add_list_and_totals() -> Result<()> {
    let service = test_service();

    let output = run_session(
        &service,
        r#"
        add "Salário Mensal" 5000 --kind income
        add Aluguel 1250.50 -k expense
        totals
        list
        "#,
    );

    assert!(output.contains("Recorded income: Salário Mensal 5000.00"));
    assert!(output.contains("Recorded expense: Aluguel 1250.50"));
    assert!(output.contains("Income:          5000.00"));
    assert!(output.contains("Expense:         1250.50"));
    assert!(output.contains("Balance:         3749.50"));
    assert!(output.contains("- 1250.50"));
    assert!(output.contains("+ 5000.00"));

    // History is most recent first
    let rent = output.find("Aluguel    ").unwrap();
    let salary = output.rfind("Salário Mensal").unwrap();
    assert!(rent < salary);
    Ok(())
}

#[test]
fn test_rejected_add_lists_every_problem() -> Result<()> {
    let service = test_service();

    let output = run_session(&service, "add Al abc\n");

    assert!(output.contains("Entry rejected:"));
    assert!(output.contains("  - description: must be at least 3 characters"));
    assert!(output.contains("  - amount: must be a number"));
    assert!(output.contains("  - kind: this field is required"));
    assert!(service.list_entries().is_empty());
    Ok(())
}

#[test]
fn test_delete_by_id() -> Result<()> {
    let service = test_service();
    let seeded = service.seed_sample_entries()?;
    let salary_id = seeded[0].id;

    let output = run_session(&service, &format!("delete {}\ndelete {}\n", salary_id, salary_id));

    assert!(output.contains(&format!("Deleted entry: Salário Mensal + 5000.00 ({})", salary_id)));
    assert!(output.contains(&format!("error: Entry not found: {}", salary_id)));

    let entries = service.list_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Expense);
    Ok(())
}

#[test]
fn test_delete_with_malformed_id() -> Result<()> {
    let service = test_service();
    let output = run_session(&service, "delete 42\n");

    assert!(output.contains("error: Invalid entry ID format (expected UUID)"));
    Ok(())
}

#[test]
fn test_session_survives_bad_lines() -> Result<()> {
    let service = test_service();

    let output = run_session(
        &service,
        "# comment\n\nfrobnicate\nadd \"unterminated\nadd Mercado 80 -k expense\n",
    );

    assert!(output.contains("error:"));
    assert!(output.contains("Recorded expense: Mercado 80.00"));
    assert_eq!(service.list_entries().len(), 1);
    Ok(())
}

#[test]
fn test_exit_stops_reading() -> Result<()> {
    let service = test_service();

    run_session(&service, "add Mercado 80 -k expense\nexit\nadd Padaria 12 -k expense\n");

    assert_eq!(service.list_entries().len(), 1);
    Ok(())
}

#[test]
fn test_empty_history() -> Result<()> {
    let service = test_service();
    let output = run_session(&service, "dashboard\n");

    assert!(output.contains("Balance:            0.00"));
    assert!(output.contains("No entries yet."));
    Ok(())
}

#[test]
fn test_help_is_printed() -> Result<()> {
    let service = test_service();
    let output = run_session(&service, "help\n");

    assert!(output.contains("add"));
    assert!(output.contains("Record an income or expense"));
    Ok(())
}

#[test]
fn test_import_then_export_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("entries.csv");
    let export_path = temp_dir.path().join("dashboard.json");

    fs::write(
        &csv_path,
        "description,amount,type\nSalário,5000,income\nAl,10,expense\nAluguel,1250,expense\n",
    )?;

    let service = test_service();
    let output = run_session(
        &service,
        &format!(
            "import '{}'\nexport dashboard -o '{}'\n",
            csv_path.display(),
            export_path.display()
        ),
    );

    assert!(output.contains("Imported 2 entries"));
    assert!(output.contains("record 2: invalid entry: description: must be at least 3 characters"));
    assert!(output.contains("Exported 2 entries to"));

    let export: DashboardExport = serde_json::from_str(&fs::read_to_string(&export_path)?)?;
    assert_eq!(export.entries.len(), 2);
    assert_eq!(export.totals.balance, 375000);
    Ok(())
}

#[test]
fn test_import_dry_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let json_path = temp_dir.path().join("entries.json");
    fs::write(
        &json_path,
        r#"[{"description": "Salário", "amount": 5000, "kind": "income"}]"#,
    )?;

    let service = test_service();
    let output = run_session(&service, &format!("import '{}' --dry-run\n", json_path.display()));

    assert!(output.contains("DRY RUN - nothing was stored"));
    assert!(output.contains("Valid entries: 1"));
    assert!(service.list_entries().is_empty());
    Ok(())
}

#[test]
fn test_export_entries_to_session_output() -> Result<()> {
    let service = test_service();
    service.seed_sample_entries()?;

    let output = run_session(&service, "export entries\nexport dashboard --format csv\n");

    assert!(output.contains("id,sequence,created_at,description,amount,kind"));
    assert!(output.contains(",Aluguel,1250.00,expense"));
    assert!(output.contains("error: Dashboard export is only available as JSON"));
    Ok(())
}

#[test]
fn test_missing_import_file() -> Result<()> {
    let service = test_service();
    let output = run_session(&service, "import /definitely/not/here.json\n");

    assert!(output.contains("error: Failed to open /definitely/not/here.json"));
    Ok(())
}

#[test]
fn test_failed_export_leaves_existing_file_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("report.json");
    fs::write(&path, "IMPORTANT")?;

    let service = test_service();
    service.seed_sample_entries()?;
    let output = run_session(
        &service,
        &format!(
            "export dashboard -f csv -o '{0}'\nexport bogus -o '{0}'\nexport entries -f xml -o '{0}'\n",
            path.display()
        ),
    );

    assert!(output.contains("error: Dashboard export is only available as JSON"));
    assert!(output.contains("error: Unknown export type 'bogus'"));
    assert!(output.contains("error: Unknown format 'xml'"));
    assert_eq!(fs::read_to_string(&path)?, "IMPORTANT");
    Ok(())
}

#[test]
fn test_add_description_starting_with_hyphen() -> Result<()> {
    let service = test_service();

    let output = run_session(&service, "add \"- Uber\" 10 -k expense\n");

    assert!(output.contains("Recorded expense: - Uber 10.00"));
    assert_eq!(service.list_entries()[0].description, "- Uber");
    Ok(())
}

#[test]
fn test_exported_csv_imports_back() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("entries.csv");

    let source = test_service();
    run_session(&source, "add Padaria 0.10 -k expense\nadd Freela 1250.75 -k income\n");
    run_session(&source, &format!("export entries -o '{}'\n", csv_path.display()));

    let target = test_service();
    let output = run_session(&target, &format!("import '{}'\n", csv_path.display()));

    assert!(output.contains("Imported 2 entries"));
    assert_eq!(target.dashboard().totals, source.dashboard().totals);
    assert_eq!(target.dashboard().totals.balance, 125065);
    Ok(())
}
