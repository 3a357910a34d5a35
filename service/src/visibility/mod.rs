//! Visibility resolution
//!
//! Walks the discriminator chain of an edited row and turns the matching
//! entity objects into show/hide sets for the host.

use serde::Serialize;
use sheetmeta_core::table::Table;
use sheetmeta_core::traits::VisibilitySink;
use sheetmeta_core::types::{AttributeRequirement, EntityObject, SheetKind};
use std::collections::BTreeSet;
use tracing::debug;

use crate::registry::EntityObjectRegistry;
use crate::sheets::{SheetSchema, schema};

/// The edited row within its table snapshot
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub table: &'a Table,
    /// Zero-based data row index
    pub row: usize,
}

impl<'a> RowContext<'a> {
    pub const fn new(table: &'a Table, row: usize) -> Self {
        Self { table, row }
    }

    /// Value governing `column` for this row
    ///
    /// The row's own cell wins. On row-scoped sheets a blank cell is read
    /// from the row directly above, one row only, as long as the row does
    /// not start an entity of its own: its key and every ancestor of
    /// `column` must be blank too.
    pub fn governing_value(&self, schema: &SheetSchema, column: &str) -> Option<&'a str> {
        let own = self.table.value(self.row, column).trim();
        if !own.is_empty() {
            return Some(own);
        }
        if schema.row_scoped && self.row > 0 && self.inherits(schema, column) {
            let above = self.table.value(self.row - 1, column).trim();
            if !above.is_empty() {
                return Some(above);
            }
        }
        None
    }

    fn inherits(&self, schema: &SheetSchema, column: &str) -> bool {
        self.table.is_blank(self.row, schema.key_column)
            && schema
                .ancestors(column)
                .iter()
                .all(|ancestor| self.table.is_blank(self.row, ancestor))
    }
}

/// Columns to show and columns that may need hiding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisibilityChange {
    pub to_show: BTreeSet<String>,
    pub to_hide_candidates: BTreeSet<String>,
}

impl VisibilityChange {
    /// Nothing to show and nothing to hide
    pub fn is_empty(&self) -> bool {
        self.to_show.is_empty() && self.to_hide_candidates.is_empty()
    }

    /// Hand the change to a sink, which hides before it shows
    pub fn apply<S: VisibilitySink + ?Sized>(&self, sheet: SheetKind, sink: &mut S) {
        if !self.is_empty() {
            sink.apply_visibility(sheet, &self.to_show, &self.to_hide_candidates);
        }
    }
}

/// Computes visibility changes against one registry
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'r> {
    registry: &'r EntityObjectRegistry,
}

impl<'r> VisibilityResolver<'r> {
    pub const fn new(registry: &'r EntityObjectRegistry) -> Self {
        Self { registry }
    }

    /// Visibility after `edited_column` of a row was set to `edited_value`
    ///
    /// Edits outside the sheet's discriminator columns are no-ops.
    pub fn compute_visibility(
        &self,
        sheet: SheetKind,
        edited_column: &str,
        edited_value: &str,
        row: Option<RowContext<'_>>,
    ) -> VisibilityChange {
        let schema = schema(sheet);
        if !schema.is_discriminator(edited_column) {
            return VisibilityChange::default();
        }

        let path = self.discriminator_path(schema, edited_column, edited_value, row);
        let to_show: BTreeSet<String> = self
            .registry
            .resolve_chain(sheet, &path)
            .into_iter()
            .flat_map(|entity| entity.attribute_names().map(str::to_string))
            .collect();
        let to_hide_candidates = schema.hide_candidates(edited_column);

        debug!(
            sheet = %sheet,
            column = edited_column,
            value = edited_value,
            path = ?path,
            show = to_show.len(),
            hide = to_hide_candidates.len(),
            "computed visibility"
        );

        VisibilityChange {
            to_show,
            to_hide_candidates,
        }
    }

    /// Ancestor values of the edited row followed by the edited pair
    pub fn discriminator_path(
        &self,
        schema: &SheetSchema,
        edited_column: &str,
        edited_value: &str,
        row: Option<RowContext<'_>>,
    ) -> Vec<(String, String)> {
        let mut path: Vec<(String, String)> = schema
            .ancestors(edited_column)
            .into_iter()
            .filter_map(|ancestor| {
                row.and_then(|ctx| ctx.governing_value(schema, ancestor))
                    .map(|value| (ancestor.to_string(), value.to_string()))
            })
            .collect();
        path.push((edited_column.to_string(), edited_value.trim().to_string()));
        path
    }

    /// Entity objects selected by every discriminator of a row
    pub fn row_entities(&self, sheet: SheetKind, row: RowContext<'_>) -> Vec<&'r EntityObject> {
        let schema = schema(sheet);
        let path: Vec<(&str, &str)> = schema
            .discriminators
            .iter()
            .filter_map(|d| row.governing_value(schema, d.name).map(|v| (d.name, v)))
            .collect();
        self.registry.resolve_chain(sheet, &path)
    }

    /// Requirement governing `column` in a row
    ///
    /// Continuation rows belong to the nearest entity row above them, so
    /// their discriminators are read from that row.
    pub fn attribute_requirement(
        &self,
        sheet: SheetKind,
        column: &str,
        row: RowContext<'_>,
    ) -> Option<AttributeRequirement> {
        let schema = schema(sheet);
        let entity_row = RowContext::new(row.table, entity_row_index(schema, row));
        self.row_entities(sheet, entity_row)
            .into_iter()
            .find_map(|entity| entity.requirement(column).cloned())
    }
}

/// Nearest row at or above `row` that is not a continuation row
fn entity_row_index(schema: &SheetSchema, row: RowContext<'_>) -> usize {
    (0..=row.row)
        .rev()
        .find(|r| !schema.is_continuation_row(row.table, *r))
        .unwrap_or(row.row)
}
