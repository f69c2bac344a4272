use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::card_schema::{self, NormalizedRow};
use crate::errors::{ExportError, ExtractError};
use crate::export::{batch_id_at, ExportBatch};
use crate::file_utils::{Document, FileManager};
use crate::table_extractor::TableExtractor;
use crate::tag_matcher::TagMatcher;
use crate::transform::TextTransformer;

/// Counters and result of one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Note files found in the vault
    pub files_scanned: usize,
    /// Files that could not be read
    pub unreadable: usize,
    /// Notes carrying the export tag
    pub tagged: usize,
    /// Tagged notes processed successfully
    pub succeeded: usize,
    /// Tagged notes that produced nothing usable
    pub failed: usize,
    /// Malformed tables skipped across all notes
    pub tables_skipped: usize,
    /// Cards written
    pub rows: usize,
    /// Export file, when one was written
    pub output: Option<PathBuf>,
}

impl RunSummary {
    /// One-line description for the end-of-run log
    pub fn summary(&self) -> String {
        format!(
            "{} files scanned, {} tagged ({} ok, {} failed), {} unreadable, {} tables skipped, {} cards",
            self.files_scanned,
            self.tagged,
            self.succeeded,
            self.failed,
            self.unreadable,
            self.tables_skipped,
            self.rows
        )
    }
}

/// Cards pulled from a single note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Cards in table order
    pub rows: Vec<NormalizedRow>,
    /// Tables found in the note
    pub tables: usize,
    /// Tables that did not fit the card schema
    pub tables_skipped: usize,
}

impl DocumentOutcome {
    /// A note succeeds when it has no tables or at least one usable table
    pub fn succeeded(&self) -> bool {
        self.tables == 0 || self.tables_skipped < self.tables
    }
}

/// Main application controller for exporting cards
pub struct Controller {
    /// App configuration
    config: Config,
    /// Compiled export tag
    matcher: TagMatcher,
    /// Markdown to tables
    extractor: TableExtractor,
    /// Field rewrites
    transformer: TextTransformer,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_extractor(config, TableExtractor::default())
    }

    /// Create a controller with a custom table extractor
    pub fn with_extractor(config: Config, extractor: TableExtractor) -> Result<Self> {
        let matcher = TagMatcher::new(&config.export_tag)
            .with_context(|| format!("Invalid export tag: {}", config.export_tag))?;
        let transformer = config.text_transformer();

        Ok(Self {
            config,
            matcher,
            extractor,
            transformer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the export, stamping the batch with the current local time
    pub fn run(&self) -> Result<RunSummary, ExportError> {
        self.run_at(&Local::now())
    }

    /// Run the export for a batch started at `now`.
    ///
    /// Notes are handled one at a time in walk order. Per-note and
    /// per-table failures are logged and counted; the run only fails when
    /// tagged notes exist but none of them could be processed, or when the
    /// export file cannot be written.
    pub fn run_at(&self, now: &DateTime<Local>) -> Result<RunSummary, ExportError> {
        let start_time = std::time::Instant::now();
        let vault = &self.config.vault_path;

        if !FileManager::dir_exists(vault) {
            return Err(ExportError::Vault(format!("Vault directory does not exist: {:?}", vault)));
        }

        info!("Begin export from {:?} (tag {})", vault, self.matcher.tag());

        let files = FileManager::find_files(vault, &self.config.markdown_extension, &self.config.skip_dirs)
            .map_err(|e| ExportError::Vault(format!("{:#}", e)))?;

        let mut summary = RunSummary {
            files_scanned: files.len(),
            ..RunSummary::default()
        };
        let mut rows = Vec::new();

        let progress_bar = Self::create_progress_bar(files.len() as u64);

        for path in &files {
            progress_bar.inc(1);

            let document = match Document::read(path) {
                Ok(document) => document,
                Err(e) => {
                    warn!("{}", e);
                    summary.unreadable += 1;
                    continue;
                }
            };

            if !self.matcher.is_match(&document.text) {
                continue;
            }

            summary.tagged += 1;
            debug!("Processing {:?}", document.path);

            match self.process_document(&document) {
                Ok(outcome) if outcome.succeeded() => {
                    summary.succeeded += 1;
                    summary.tables_skipped += outcome.tables_skipped;
                    rows.extend(outcome.rows);
                }
                Ok(outcome) => {
                    error!("No usable table in {:?}", document.path);
                    summary.failed += 1;
                    summary.tables_skipped += outcome.tables_skipped;
                }
                Err(e) => {
                    error!("Error processing {:?}: {}", document.path, e);
                    summary.failed += 1;
                }
            }
        }

        progress_bar.finish_and_clear();

        if summary.tagged == 0 {
            info!("No notes tagged with {} in {:?}, nothing to export", self.matcher.tag(), vault);
            return Ok(summary);
        }

        if summary.succeeded == 0 {
            return Err(ExportError::NoSucceededDocuments {
                tagged: summary.tagged,
            });
        }

        if rows.is_empty() {
            warn!("Tagged notes contained no cards, no file written");
            info!("{}", summary.summary());
            return Ok(summary);
        }

        let batch = ExportBatch::new(batch_id_at(now), rows);
        let output = batch.save(&self.config.export_dir, &self.config.file_prefix, self.config.force_overwrite)?;

        info!("File {} successfully written", output.display());
        summary.rows = batch.len();
        summary.output = Some(output);

        info!("{} in {}", summary.summary(), Self::format_duration(start_time.elapsed()));

        Ok(summary)
    }

    /// Turn every table of a note into cards.
    ///
    /// Malformed tables are logged and skipped; their siblings are still
    /// processed.
    pub fn process_document(&self, document: &Document) -> Result<DocumentOutcome, ExtractError> {
        let tables = self.extractor.extract(&document.text)?;

        let mut outcome = DocumentOutcome {
            tables: tables.len(),
            ..DocumentOutcome::default()
        };

        for (index, table) in tables.into_iter().enumerate() {
            match card_schema::process_table(table, &self.transformer) {
                Ok(cards) => {
                    debug!("Table {} of {:?}: {} cards", index + 1, document.path, cards.len());
                    outcome.rows.extend(cards);
                }
                Err(e) => {
                    warn!("Skipping table {} of {:?}: {}", index + 1, document.path, e);
                    outcome.tables_skipped += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Progress bar over the vault files
    fn create_progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} notes ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Scanning vault");
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
