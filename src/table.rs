/*!
 * In-memory table of string cells.
 *
 * A `Table` is a list of column names plus rows of cells. Every row always
 * has exactly one cell per column: short rows are padded with empty cells
 * when the table is built. The operations consume the table and return the
 * reshaped one so they can be chained.
 */

use crate::errors::TableError;

/// Ordered rows of positioned, named string fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, widening header and rows to the widest of them
    pub fn new(mut columns: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(columns.len()))
            .max()
            .unwrap_or(0);

        // Unnamed columns get their position as name
        while columns.len() < width {
            columns.push(columns.len().to_string());
        }
        for row in &mut rows {
            row.resize(width, String::new());
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Keep only the first `count` columns
    pub fn select_first(mut self, count: usize) -> Self {
        self.columns.truncate(count);
        for row in &mut self.rows {
            row.truncate(count);
        }
        self
    }

    /// Append a column with `fill` in every row
    pub fn with_column(mut self, name: &str, fill: &str) -> Self {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.to_string());
        }
        self
    }

    /// Replace the column names positionally; `names` must match the width
    pub fn set_axis(mut self, names: &[&str]) -> Result<Self, TableError> {
        if names.len() != self.width() {
            return Err(TableError::Malformed {
                columns: self.width(),
                expected: names.len(),
            });
        }
        self.columns = names.iter().map(|n| n.to_string()).collect();
        Ok(self)
    }

    /// Keep the rows for which `keep` returns true
    pub fn filter_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Rewrite every cell of the column called `name`
    pub fn map_column<F>(mut self, name: &str, f: F) -> Result<Self, TableError>
    where
        F: Fn(&str) -> String,
    {
        let index = self.column_index(name)?;
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
        Ok(self)
    }

    /// Remove the column called `name`
    pub fn drop_column(mut self, name: &str) -> Result<Self, TableError> {
        let index = self.column_index(name)?;
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        Ok(self)
    }
}
