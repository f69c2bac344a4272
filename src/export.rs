/*!
 * Export batches and the CSV file handed to Anki.
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use log::debug;
use tempfile::NamedTempFile;

use crate::card_schema::NormalizedRow;
use crate::errors::ExportError;

/// Timestamp format of batch identifiers
pub const BATCH_ID_FORMAT: &str = "%Y%m%d_%H%M";

/// Extension of the export file
pub const EXPORT_EXTENSION: &str = "csv";

/// Batch identifier for a run started at `now`
pub fn batch_id_at<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(BATCH_ID_FORMAT).to_string()
}

/// All cards produced by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBatch {
    batch_id: String,
    rows: Vec<NormalizedRow>,
}

impl ExportBatch {
    pub fn new(batch_id: impl Into<String>, rows: Vec<NormalizedRow>) -> Self {
        Self {
            batch_id: batch_id.into(),
            rows,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// File name for this batch, e.g. `obsidian2anki_export__20240101_0930.csv`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}{}.{}", prefix, self.batch_id, EXPORT_EXTENSION)
    }

    /// Write the batch as header-less CSV records: the card fields followed
    /// by the batch id
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        for row in &self.rows {
            let [text, context, translation, notes] = row.fields();
            csv_writer.write_record([text, context, translation, notes, self.batch_id.as_str()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the batch into `export_dir`, returning the path of the new file.
    ///
    /// The file is written to a temporary file in the same directory first
    /// and moved into place once complete.
    pub fn save(&self, export_dir: &Path, prefix: &str, force_overwrite: bool) -> Result<PathBuf, ExportError> {
        let path = export_dir.join(self.file_name(prefix));
        if path.exists() && !force_overwrite {
            return Err(ExportError::OutputExists(path));
        }

        let write_error = |message: String| ExportError::OutputWrite {
            path: path.clone(),
            message,
        };

        fs::create_dir_all(export_dir).map_err(|e| write_error(e.to_string()))?;

        let mut temp_file = NamedTempFile::new_in(export_dir).map_err(|e| write_error(e.to_string()))?;
        self.write_csv(temp_file.as_file_mut())
            .map_err(|e| write_error(e.to_string()))?;

        if force_overwrite {
            temp_file.persist(&path).map_err(|e| write_error(e.error.to_string()))?;
        } else {
            temp_file
                .persist_noclobber(&path)
                .map_err(|e| write_error(e.error.to_string()))?;
        }

        debug!("Wrote {} rows to {:?}", self.len(), path);
        Ok(path)
    }
}
