/*!
 * Common test utilities for the obsidian2anki test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use obsidian2anki::app_config::Config;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent folders
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Vault and export directories for one test run
pub struct TestVault {
    pub root: TempDir,
    pub vault: PathBuf,
    pub export_dir: PathBuf,
}

impl TestVault {
    pub fn new() -> Result<Self> {
        init_logging();
        let root = create_temp_dir()?;
        let vault = root.path().join("vault");
        let export_dir = root.path().join("export");
        fs::create_dir_all(&vault)?;
        Ok(Self { root, vault, export_dir })
    }

    /// Add a note to the vault
    pub fn note(&self, relative_path: &str, content: &str) -> Result<PathBuf> {
        create_test_file(&self.vault, relative_path, content)
    }

    /// Config pointing at this vault with defaults for everything else
    pub fn config(&self) -> Config {
        Config {
            vault_path: self.vault.clone(),
            export_dir: self.export_dir.clone(),
            ..Config::default()
        }
    }

    /// Files written to the export directory
    pub fn exported_files(&self) -> Result<Vec<PathBuf>> {
        if !self.export_dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.export_dir)? {
            files.push(entry?.path());
        }
        Ok(files)
    }
}

/// Parse an export file into records
pub fn read_export(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(|field| field.to_string()).collect());
    }
    Ok(records)
}

/// A tagged note holding one four-column vocabulary table
pub fn vocabulary_note(rows: &[[&str; 4]]) -> String {
    let mut note = String::from("#anki/export #spanish\n\n# Vocabulary\n\n| Texto | Contexto | Traducción | Notas |\n|---|---|---|---|\n");
    for row in rows {
        note.push_str(&format!("| {} | {} | {} | {} |\n", row[0], row[1], row[2], row[3]));
    }
    note
}
