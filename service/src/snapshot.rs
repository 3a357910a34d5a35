//! Snapshots of every sheet at one point in time

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sheetmeta_core::error::{Result, SheetMetaError};
use sheetmeta_core::table::Table;
use sheetmeta_core::traits::TableSource;
use sheetmeta_core::types::SheetKind;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

static EMPTY_TABLE: Lazy<Table> = Lazy::new(Table::default);

/// Tables of all sheets; sheets that do not exist read as empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSnapshot {
    tables: BTreeMap<SheetKind, Table>,
}

impl TableSnapshot {
    /// Read every sheet from a host
    pub fn from_source<S: TableSource + ?Sized>(source: &S) -> Self {
        let mut snapshot = Self::default();
        for kind in SheetKind::all() {
            match source.table(kind) {
                Some(table) => snapshot.insert(kind, table),
                None => debug!(sheet = %kind, "sheet not provisioned"),
            }
        }
        snapshot
    }

    /// Parse a JSON object keyed by sheet kind (`concept`, `material`, ...)
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        for table in snapshot.tables.values_mut() {
            table.normalize();
        }
        Ok(snapshot)
    }

    /// Load a JSON snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            SheetMetaError::SerializationError(message) => {
                SheetMetaError::parse_at(message, path.display().to_string())
            }
            other => other,
        })
    }

    /// Table of a sheet, empty when the sheet is missing
    pub fn table(&self, sheet: SheetKind) -> &Table {
        self.tables.get(&sheet).unwrap_or_else(|| {
            debug!(sheet = %sheet, "sheet missing from snapshot, reading as empty");
            &*EMPTY_TABLE
        })
    }

    pub fn table_mut(&mut self, sheet: SheetKind) -> Option<&mut Table> {
        self.tables.get_mut(&sheet)
    }

    pub fn contains(&self, sheet: SheetKind) -> bool {
        self.tables.contains_key(&sheet)
    }

    pub fn insert(&mut self, sheet: SheetKind, table: Table) {
        self.tables.insert(sheet, table);
    }
}

impl TableSource for TableSnapshot {
    fn table(&self, sheet: SheetKind) -> Option<Table> {
        self.tables.get(&sheet).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_json_keys_by_sheet_kind() -> Result<()> {
        let json = r#"{
            "concept": {
                "columns": ["concept_id", "concept_type"],
                "rows": [{"concept_id": "P1", "concept_type": "person"}, {"concept_id": "O1"}]
            }
        }"#;
        let snapshot = TableSnapshot::from_json(json)?;
        let concepts = snapshot.table(SheetKind::Concept);
        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts.value(1, "concept_type"), "");
        assert!(snapshot.table(SheetKind::Workflow).is_empty());
        assert!(!snapshot.contains(SheetKind::Workflow));
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(TableSnapshot::from_json("[1, 2").is_err());
    }
}
