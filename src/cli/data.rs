//! Export, import and clear commands

use std::io::Write;
use std::path::PathBuf;

use crate::config::{ImportMode, PocketPaths, Settings};
use crate::error::{PocketError, PocketResult};
use crate::export;
use crate::storage::Storage;

/// Write the JSON export to `finance_backup.json`, or to stdout
pub fn handle_export(storage: &Storage, paths: &PocketPaths, stdout: bool) -> PocketResult<()> {
    if stdout {
        let out = std::io::stdout();
        let mut lock = out.lock();
        export::export_json(storage, &mut lock)?;
        lock.flush()
            .map_err(|e| PocketError::Export(e.to_string()))?;
        return Ok(());
    }

    let path = export::export_to_file(storage, paths)?;
    println!("Data exported to: {}", path.display());
    Ok(())
}

/// Import from `file`, defaulting to `finance_backup.json`
pub fn handle_import(
    storage: &Storage,
    paths: &PocketPaths,
    settings: &Settings,
    file: Option<PathBuf>,
    replace: bool,
) -> PocketResult<()> {
    let path = file.unwrap_or_else(|| paths.backup_file());
    let mode = if replace {
        ImportMode::Replace
    } else {
        settings.import_mode
    };

    let summary = export::import_from_file(storage, &path, mode)?;
    if mode == ImportMode::Replace {
        // The document may not carry a default currency or any categories
        storage.bootstrap(settings)?;
    }
    println!("Imported {}", summary);
    if summary.reused_categories + summary.reused_currencies > 0 {
        println!(
            "Matched {} existing categories and {} existing currencies",
            summary.reused_categories, summary.reused_currencies
        );
    }
    Ok(())
}

/// Delete all data; refuses without `--yes`
pub fn handle_clear(storage: &Storage, yes: bool) -> PocketResult<()> {
    if !yes {
        println!("This deletes every transaction, budget, category and currency.");
        println!("Use --yes to confirm");
        return Ok(());
    }

    let removed = storage.clear_all()?;
    println!("Cleared all data ({} rows removed)", removed);
    Ok(())
}
