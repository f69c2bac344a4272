/*!
 * Error types for the obsidian2anki application.
 *
 * Per-document and per-table failures are plain values that the controller
 * collects and logs; only `ExportError` ends a run.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading a note from the vault
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read or is not valid UTF-8
    #[error("Unreadable document {path:?}: {source}")]
    Unreadable {
        /// Path of the note
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while pulling tables out of a rendered note
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The rendered markup could not be scanned for tables
    #[error("Failed to scan rendered markup: {0}")]
    Markup(String),
}

/// Errors that can occur when mapping a table onto the card schema
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The table has too few columns to fill the card fields
    #[error("Malformed table: expected at least {expected} columns, found {columns}")]
    Malformed {
        /// Number of columns the table has
        columns: usize,
        /// Minimum number of columns required
        expected: usize,
    },

    /// A column referenced by name does not exist
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

/// Run-level errors that abort an export
#[derive(Error, Debug)]
pub enum ExportError {
    /// The vault root is missing or could not be walked
    #[error("Vault error: {0}")]
    Vault(String),

    /// Tagged notes were found but none of them could be processed
    #[error("None of the {tagged} tagged documents could be processed")]
    NoSucceededDocuments {
        /// Number of tagged documents
        tagged: usize,
    },

    /// The output file already exists and overwriting is disabled
    #[error("Output file already exists: {0:?} (use -f to force overwrite)")]
    OutputExists(PathBuf),

    /// The output file could not be written
    #[error("Failed to write output {path:?}: {message}")]
    OutputWrite {
        /// Destination path
        path: PathBuf,
        /// Error message from the writer
        message: String,
    },
}
