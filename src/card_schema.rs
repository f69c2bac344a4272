/*!
 * Card schema for exported notes.
 *
 * Tables are mapped onto the card fields by position, never by header
 * text: the first four columns are Text, Context, Translation and Notes,
 * and an optional fifth column flags rows to leave out of the export.
 */

use crate::errors::TableError;
use crate::table::Table;
use crate::transform::TextTransformer;

pub const TEXT: &str = "Text";
pub const CONTEXT: &str = "Context";
pub const TRANSLATION: &str = "Translation";
pub const NOTES: &str = "Notes";
pub const OMIT: &str = "Omit";

/// Card fields in output order
pub const CARD_COLUMNS: [&str; 4] = [TEXT, CONTEXT, TRANSLATION, NOTES];

/// Card fields plus the exclusion flag
pub const SCHEMA_COLUMNS: [&str; 5] = [TEXT, CONTEXT, TRANSLATION, NOTES, OMIT];

/// One flashcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub text: String,
    pub context: String,
    pub translation: String,
    pub notes: String,
}

impl NormalizedRow {
    pub fn new(
        text: impl Into<String>,
        context: impl Into<String>,
        translation: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
            translation: translation.into(),
            notes: notes.into(),
        }
    }

    /// Fields in `CARD_COLUMNS` order
    pub fn fields(&self) -> [&str; 4] {
        [&self.text, &self.context, &self.translation, &self.notes]
    }
}

/// Map a table onto `SCHEMA_COLUMNS`.
///
/// Four columns get an empty Omit column, anything past the fifth column
/// is dropped, and fewer than four columns is an error.
pub fn normalize(table: Table) -> Result<Table, TableError> {
    let width = table.width();
    if width < CARD_COLUMNS.len() {
        return Err(TableError::Malformed {
            columns: width,
            expected: CARD_COLUMNS.len(),
        });
    }

    let table = table.select_first(SCHEMA_COLUMNS.len());
    let table = if table.width() == CARD_COLUMNS.len() {
        table.with_column(OMIT, "")
    } else {
        table
    };

    table.set_axis(&SCHEMA_COLUMNS)
}

/// Drop the rows flagged in Omit, then the Omit column itself
pub fn filter_omitted(table: Table) -> Result<Table, TableError> {
    let omit = table.column_index(OMIT)?;
    table
        .filter_rows(|row| row[omit].trim().is_empty())
        .drop_column(OMIT)
}

/// Apply the field rewrites to a filtered table
pub fn transform(table: Table, transformer: &TextTransformer) -> Result<Table, TableError> {
    table
        .map_column(TEXT, |text| transformer.cloze(text))?
        .map_column(TRANSLATION, |text| transformer.highlight(text))
}

/// Full per-table pass: normalize, filter, rewrite, then build the cards
pub fn process_table(table: Table, transformer: &TextTransformer) -> Result<Vec<NormalizedRow>, TableError> {
    let table = transform(filter_omitted(normalize(table)?)?, transformer)?;

    let rows = table
        .into_rows()
        .into_iter()
        .map(|row| {
            let mut fields = row.into_iter();
            NormalizedRow {
                text: fields.next().unwrap_or_default(),
                context: fields.next().unwrap_or_default(),
                translation: fields.next().unwrap_or_default(),
                notes: fields.next().unwrap_or_default(),
            }
        })
        .collect();

    Ok(rows)
}
