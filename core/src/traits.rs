//! Host collaborator interfaces
//!
//! The spreadsheet host supplies table snapshots and receives the results of
//! a resolution through these sinks. All calls are synchronous.

use std::collections::BTreeSet;

use crate::table::Table;
use crate::types::SheetKind;
use crate::validation::ValidationRuleDescriptor;

/// Read access to current sheet contents
pub trait TableSource {
    /// Full snapshot of a sheet, or `None` when the sheet does not exist yet
    fn table(&self, sheet: SheetKind) -> Option<Table>;
}

/// Shows and hides physical columns
pub trait VisibilitySink {
    /// Apply a visibility change
    ///
    /// Implementations must hide `hide` before showing `show`; a column in
    /// both sets ends up visible.
    fn apply_visibility(&mut self, sheet: SheetKind, show: &BTreeSet<String>, hide: &BTreeSet<String>);
}

/// Applies validation rules to a column's cell range
pub trait ValidationSink {
    /// Apply a rule; never called with [`ValidationRuleDescriptor::None`]
    fn apply_validation_rule(
        &mut self,
        sheet: SheetKind,
        column: &str,
        descriptor: &ValidationRuleDescriptor,
    );
}

/// Writes single cells (mini-table bookkeeping)
pub trait CellSink {
    /// Overwrite one cell; `row` is the zero-based data row index
    fn write_cell(&mut self, sheet: SheetKind, row: usize, column: &str, value: &str);
}

/// Everything the service needs from the host
pub trait Host: TableSource + VisibilitySink + ValidationSink + CellSink {}

impl<T> Host for T where T: TableSource + VisibilitySink + ValidationSink + CellSink {}
