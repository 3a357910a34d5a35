//! In-memory table snapshots handed over by the host
//!
//! A [`Table`] is an ordered list of rows keyed by column name. Row position
//! is the only row identity; there is no primary key. Composite natural keys
//! are stored as tab-joined strings (`"supplierA\tCAT123"`).

use crate::error::{Result, SheetMetaError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator used for multi-column composite option strings
pub const COMPOSITE_SEPARATOR: char = '\t';

/// One row: column name to cell text
pub type Row = IndexMap<String, String>;

/// Header plus rows of one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in sheet order
    #[serde(default)]
    pub columns: Vec<String>,
    /// Data rows, header excluded
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from positional records
    ///
    /// Short records are padded with blanks; extra cells are ignored.
    pub fn from_records<S: AsRef<str>>(columns: &[S], records: &[&[&str]]) -> Self {
        let mut table = Self::new(columns);
        for record in records {
            let row = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = record.get(i).copied().unwrap_or("");
                    (column.clone(), value.to_string())
                })
                .collect();
            table.rows.push(row);
        }
        table
    }

    /// Add any column that appears in a row but not in the header
    ///
    /// Snapshots deserialized from JSON may omit the header.
    pub fn normalize(&mut self) {
        for row in &self.rows {
            for column in row.keys() {
                if !self.columns.iter().any(|c| c == column) {
                    self.columns.push(column.clone());
                }
            }
        }
    }

    /// Append a row from `(column, value)` pairs
    pub fn push_row<K: AsRef<str>, V: AsRef<str>>(&mut self, cells: &[(K, V)]) {
        let row = cells
            .iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        self.rows.push(row);
        self.normalize();
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the header contains a column
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Zero-based position of a column in the header
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell text; `None` when the row or the column does not exist
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        if !self.has_column(column) {
            return None;
        }
        let row = self.rows.get(row)?;
        Some(row.get(column).map_or("", String::as_str))
    }

    /// Cell text with absent cells read as blank
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> &str {
        self.cell(row, column).unwrap_or("")
    }

    /// Whether a cell is blank (absent cells count as blank)
    #[must_use]
    pub fn is_blank(&self, row: usize, column: &str) -> bool {
        self.value(row, column).trim().is_empty()
    }

    /// Overwrite a cell
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) -> Result<()> {
        let len = self.rows.len();
        let target = self.rows.get_mut(row).ok_or_else(|| SheetMetaError::RowOutOfRange {
            sheet: String::new(),
            row,
            len,
        })?;
        target.insert(column.to_string(), value.into());
        if !self.has_column(column) {
            debug!(column, "column added to table header");
            self.columns.push(column.to_string());
        }
        Ok(())
    }

    /// Iterate rows in order
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

/// Join cells of several columns into one composite option string
///
/// Returns `None` when any of the columns is missing from the row's table.
#[must_use]
pub fn join_columns(table: &Table, row: usize, columns: &[&str]) -> Option<String> {
    let mut parts = Vec::with_capacity(columns.len());
    for column in columns {
        parts.push(table.cell(row, column)?);
    }
    Some(parts.join(&COMPOSITE_SEPARATOR.to_string()))
}

/// Last segment of a composite option string (the supplier-assigned part)
#[must_use]
pub fn composite_tail(value: &str) -> &str {
    value.rsplit(COMPOSITE_SEPARATOR).next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        Table::from_records(
            &["concept_id", "supplier", "catalog_number"],
            &[&["c1", "acme", "CAT1"], &["c2", "globex"]],
        )
    }

    #[test]
    fn test_cells_and_missing_columns() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "catalog_number"), Some("CAT1"));
        assert_eq!(table.cell(1, "catalog_number"), Some(""));
        assert_eq!(table.cell(0, "missing"), None);
        assert_eq!(table.cell(5, "concept_id"), None);
        assert!(table.is_blank(1, "catalog_number"));
    }

    #[test]
    fn test_composite_join_and_tail() {
        let table = sample();
        assert_eq!(
            join_columns(&table, 0, &["supplier", "catalog_number"]).as_deref(),
            Some("acme\tCAT1")
        );
        assert_eq!(join_columns(&table, 0, &["supplier", "nope"]), None);
        assert_eq!(composite_tail("acme\tCAT1"), "CAT1");
        assert_eq!(composite_tail("CAT1"), "CAT1");
    }

    #[test]
    fn test_set_cell_out_of_range() {
        let mut table = sample();
        table.set_cell(1, "catalog_number", "CAT2").expect("row exists");
        assert_eq!(table.value(1, "catalog_number"), "CAT2");
        assert!(matches!(
            table.set_cell(9, "catalog_number", "x"),
            Err(SheetMetaError::RowOutOfRange { row: 9, len: 2, .. })
        ));
    }

    #[test]
    fn test_normalize_header_from_rows() -> Result<()> {
        let mut table: Table =
            serde_json::from_str(r#"{"rows":[{"lot_number":"L1","action":"x"}]}"#)?;
        table.normalize();
        assert_eq!(table.columns, vec!["lot_number", "action"]);
        Ok(())
    }
}
