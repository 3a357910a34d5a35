//! Mini-table bookkeeping
//!
//! A multi-valued attribute spreads over consecutive rows: the entity's own
//! row (the header) and continuation rows below it, whose key and
//! discriminator columns are blank.
//! All rows of such a group share a generated id in the first column; the
//! header row is flagged `TRUE` in the second.

use indexmap::IndexMap;
use serde::Serialize;
use sheetmeta_core::discriminators::Flag;
use sheetmeta_core::error::{Result, SheetMetaError};
use sheetmeta_core::table::Table;
use sheetmeta_core::types::AttributeRequirement;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::sheets::{GROUP_HEADER_COLUMN, GROUP_ID_COLUMN, SheetSchema};

/// Source of new group ids
pub type GroupIdSource = Box<dyn Fn() -> String + Send + Sync>;

/// Rows linked by one group id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiniTableGroup {
    pub group_id: String,
    pub header_row_index: usize,
    pub member_row_indexes: Vec<usize>,
}

impl MiniTableGroup {
    /// Header and members, in row order
    pub fn rows(&self) -> Vec<usize> {
        let mut rows = vec![self.header_row_index];
        rows.extend(&self.member_row_indexes);
        rows.sort_unstable();
        rows
    }
}

/// Cell the host must overwrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellWrite {
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl CellWrite {
    fn new(row: usize, column: &str, value: impl Into<String>) -> Self {
        Self {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }
}

/// What an entry did to the grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MiniTableOutcome {
    /// A new group over the predecessor and the edited row
    Started {
        group_id: String,
        header_row: usize,
        member_row: usize,
    },
    /// The edited row joined the predecessor's group
    Extended { group_id: String, member_row: usize },
    /// No grouping applies
    Ungrouped,
    /// Single value entered inside a group; the cell was cleared
    Rejected { row: usize, column: String },
}

impl MiniTableOutcome {
    /// Cell writes the host has to mirror
    pub fn writes(&self) -> Vec<CellWrite> {
        match self {
            Self::Started {
                group_id,
                header_row,
                member_row,
            } => vec![
                CellWrite::new(*header_row, GROUP_ID_COLUMN, group_id.as_str()),
                CellWrite::new(*header_row, GROUP_HEADER_COLUMN, Flag::True.as_ref()),
                CellWrite::new(*member_row, GROUP_ID_COLUMN, group_id.as_str()),
                CellWrite::new(*member_row, GROUP_HEADER_COLUMN, Flag::False.as_ref()),
            ],
            Self::Extended {
                group_id,
                member_row,
            } => vec![
                CellWrite::new(*member_row, GROUP_ID_COLUMN, group_id.as_str()),
                CellWrite::new(*member_row, GROUP_HEADER_COLUMN, Flag::False.as_ref()),
            ],
            Self::Rejected { row, column } => vec![CellWrite::new(*row, column, "")],
            Self::Ungrouped => Vec::new(),
        }
    }
}

/// Assigns group ids and header flags as values are entered
pub struct MiniTableTracker {
    next_id: GroupIdSource,
}

impl fmt::Debug for MiniTableTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniTableTracker").finish_non_exhaustive()
    }
}

impl Default for MiniTableTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniTableTracker {
    /// Tracker generating random v4 group ids
    pub fn new() -> Self {
        Self::with_id_source(|| Uuid::new_v4().to_string())
    }

    /// Tracker with a custom id source
    pub fn with_id_source(source: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            next_id: Box::new(source),
        }
    }

    /// Record a non-blank value entered in `column` of `row`
    ///
    /// The snapshot is updated in place; the returned outcome lists the same
    /// changes as cell writes.
    ///
    /// # Errors
    ///
    /// Returns [`SheetMetaError::RowOutOfRange`] when `row` is not in the
    /// table.
    pub fn record_entry(
        &self,
        schema: &SheetSchema,
        table: &mut Table,
        row: usize,
        column: &str,
        requirement: Option<&AttributeRequirement>,
    ) -> Result<MiniTableOutcome> {
        if row >= table.len() {
            return Err(SheetMetaError::RowOutOfRange {
                sheet: schema.kind.sheet_name().to_string(),
                row,
                len: table.len(),
            });
        }

        let outcome = if requirement.is_some_and(AttributeRequirement::supports_multiple_values) {
            self.multi_valued_entry(schema, table, row)
        } else {
            single_valued_entry(table, row, column)
        };

        for write in outcome.writes() {
            table.set_cell(write.row, &write.column, write.value)?;
        }
        if !matches!(outcome, MiniTableOutcome::Ungrouped) {
            debug!(sheet = %schema.kind, row, column, ?outcome, "mini-table entry");
        }
        Ok(outcome)
    }

    fn multi_valued_entry(&self, schema: &SheetSchema, table: &Table, row: usize) -> MiniTableOutcome {
        if row == 0 || !schema.is_continuation_row(table, row) {
            return MiniTableOutcome::Ungrouped;
        }

        let predecessor = row - 1;
        let existing = table.value(predecessor, GROUP_ID_COLUMN).trim();
        if existing.is_empty() {
            let group_id = (self.next_id)();
            info!(sheet = %schema.kind, header_row = predecessor, group_id = group_id.as_str(), "started mini-table");
            MiniTableOutcome::Started {
                group_id,
                header_row: predecessor,
                member_row: row,
            }
        } else {
            MiniTableOutcome::Extended {
                group_id: existing.to_string(),
                member_row: row,
            }
        }
    }
}

fn single_valued_entry(table: &Table, row: usize, column: &str) -> MiniTableOutcome {
    let grouped = !table.is_blank(row, GROUP_ID_COLUMN);
    if grouped && !is_header(table, row) {
        MiniTableOutcome::Rejected {
            row,
            column: column.to_string(),
        }
    } else {
        MiniTableOutcome::Ungrouped
    }
}

fn is_header(table: &Table, row: usize) -> bool {
    matches!(
        Flag::from_str(table.value(row, GROUP_HEADER_COLUMN).trim()),
        Ok(Flag::True)
    )
}

/// Reconstruct the groups present in a table
///
/// A group without a flagged header row uses its first row as header.
pub fn groups(table: &Table) -> Vec<MiniTableGroup> {
    let mut by_id: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for row in 0..table.len() {
        let id = table.value(row, GROUP_ID_COLUMN).trim();
        if !id.is_empty() {
            by_id.entry(id).or_default().push(row);
        }
    }

    by_id
        .into_iter()
        .map(|(id, rows)| {
            let header = rows
                .iter()
                .copied()
                .find(|r| is_header(table, *r))
                .unwrap_or(rows[0]);
            MiniTableGroup {
                group_id: id.to_string(),
                header_row_index: header,
                member_row_indexes: rows.into_iter().filter(|r| *r != header).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::schema;
    use pretty_assertions::assert_eq;
    use sheetmeta_core::types::SheetKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tracker() -> MiniTableTracker {
        let counter = AtomicUsize::new(0);
        MiniTableTracker::with_id_source(move || {
            format!("group-{}", counter.fetch_add(1, Ordering::SeqCst))
        })
    }

    fn medium() -> Table {
        Table::from_records(
            &["mini_table_id", "mini_table_header", "concept_id", "component_cas"],
            &[&["", "", "C1", "50-99-7"], &["", "", "", ""], &["", "", "", ""]],
        )
    }

    #[test]
    fn test_second_value_starts_group() -> Result<()> {
        let tracker = counting_tracker();
        let concept = schema(SheetKind::Concept);
        let mut table = medium();
        let multi = AttributeRequirement::multi(false);

        let outcome = tracker.record_entry(concept, &mut table, 1, "component_cas", Some(&multi))?;
        assert_eq!(
            outcome,
            MiniTableOutcome::Started {
                group_id: "group-0".to_string(),
                header_row: 0,
                member_row: 1,
            }
        );
        assert_eq!(table.value(0, GROUP_HEADER_COLUMN), "TRUE");
        assert_eq!(table.value(1, GROUP_HEADER_COLUMN), "FALSE");

        let outcome = tracker.record_entry(concept, &mut table, 2, "component_cas", Some(&multi))?;
        assert_eq!(
            outcome,
            MiniTableOutcome::Extended {
                group_id: "group-0".to_string(),
                member_row: 2,
            }
        );
        assert_eq!(
            groups(&table),
            vec![MiniTableGroup {
                group_id: "group-0".to_string(),
                header_row_index: 0,
                member_row_indexes: vec![1, 2],
            }]
        );
        Ok(())
    }

    #[test]
    fn test_keyed_row_and_first_row_stay_ungrouped() -> Result<()> {
        let tracker = counting_tracker();
        let concept = schema(SheetKind::Concept);
        let mut table = medium();
        let multi = AttributeRequirement::multi(false);
        assert_eq!(
            tracker.record_entry(concept, &mut table, 0, "component_cas", Some(&multi))?,
            MiniTableOutcome::Ungrouped
        );
        table.set_cell(1, "concept_id", "C2")?;
        assert_eq!(
            tracker.record_entry(concept, &mut table, 1, "component_cas", Some(&multi))?,
            MiniTableOutcome::Ungrouped
        );
        assert!(groups(&table).is_empty());
        Ok(())
    }

    #[test]
    fn test_single_value_inside_group_rejected() -> Result<()> {
        let tracker = counting_tracker();
        let concept = schema(SheetKind::Concept);
        let mut table = medium();
        let multi = AttributeRequirement::multi(false);
        tracker.record_entry(concept, &mut table, 1, "component_cas", Some(&multi))?;

        table.set_cell(1, "concept_name", "glucose")?;
        let single = AttributeRequirement::single(true);
        let outcome = tracker.record_entry(concept, &mut table, 1, "concept_name", Some(&single))?;
        assert_eq!(
            outcome,
            MiniTableOutcome::Rejected {
                row: 1,
                column: "concept_name".to_string(),
            }
        );
        assert_eq!(table.value(1, "concept_name"), "");

        table.set_cell(0, "concept_name", "medium")?;
        let header = tracker.record_entry(concept, &mut table, 0, "concept_name", Some(&single))?;
        assert_eq!(header, MiniTableOutcome::Ungrouped);
        assert_eq!(table.value(0, "concept_name"), "medium");
        Ok(())
    }

    #[test]
    fn test_row_out_of_range() {
        let tracker = MiniTableTracker::new();
        let mut table = medium();
        let result = tracker.record_entry(
            schema(SheetKind::Concept),
            &mut table,
            7,
            "component_cas",
            None,
        );
        assert!(matches!(result, Err(SheetMetaError::RowOutOfRange { .. })));
    }

    #[test]
    fn test_random_ids_are_uuids() -> Result<()> {
        let tracker = MiniTableTracker::new();
        let mut table = medium();
        let multi = AttributeRequirement::multi(false);
        let outcome = tracker.record_entry(
            schema(SheetKind::Concept),
            &mut table,
            1,
            "component_cas",
            Some(&multi),
        )?;
        let MiniTableOutcome::Started { group_id, .. } = outcome else {
            panic!("expected a new group");
        };
        assert!(Uuid::parse_str(&group_id).is_ok());
        Ok(())
    }
}
