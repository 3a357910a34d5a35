//! Edit handling facade
//!
//! [`SheetMetaService`] processes host events end to end: visibility after a
//! discriminator edit, mini-table bookkeeping after a value entry and
//! column revalidation.

use serde::{Deserialize, Serialize};
use sheetmeta_core::config::SheetMetaConfig;
use sheetmeta_core::error::Result;
use sheetmeta_core::table::Table;
use sheetmeta_core::traits::{Host, TableSource, ValidationSink};
use sheetmeta_core::types::{ResolutionContext, SheetKind};
use sheetmeta_core::validation::ValidationRuleDescriptor;
use std::sync::Arc;
use tracing::{debug, info};

use crate::minitable::{MiniTableOutcome, MiniTableTracker};
use crate::registry::{EntityObjectRegistry, RegistryCache};
use crate::rules::ValidationRuleCompiler;
use crate::sheets::{SheetSchema, schema};
use crate::snapshot::TableSnapshot;
use crate::visibility::{RowContext, VisibilityChange, VisibilityResolver};

/// One cell edited by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEdit {
    pub sheet: SheetKind,
    /// Zero-based data row index
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl CellEdit {
    pub fn new(sheet: SheetKind, row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            sheet,
            row,
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Everything an edit changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub visibility: VisibilityChange,
    pub mini_table: Option<MiniTableOutcome>,
}

/// Schema resolution service for one host
#[derive(Debug)]
pub struct SheetMetaService {
    config: SheetMetaConfig,
    registries: RegistryCache,
    tracker: MiniTableTracker,
}

impl SheetMetaService {
    /// Create a service with a validated configuration
    pub fn new(config: SheetMetaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registries: RegistryCache::new(),
            tracker: MiniTableTracker::new(),
        })
    }

    /// Replace the mini-table tracker (e.g. to control group ids)
    #[must_use]
    pub fn with_tracker(mut self, tracker: MiniTableTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn config(&self) -> &SheetMetaConfig {
        &self.config
    }

    /// Resolution context described by the configuration
    pub fn context(&self) -> Result<ResolutionContext> {
        self.config.context()
    }

    /// Registry of a context, built once and cached
    pub fn registry(&self, context: &ResolutionContext) -> Result<Arc<EntityObjectRegistry>> {
        self.registries.get_or_build(context)
    }

    /// Handle one cell edit
    ///
    /// Visibility is applied first (hide, then show), then mini-table cell
    /// writes. A value rejected inside a mini-table changes no visibility.
    /// Edits beyond the working rows are ignored.
    pub fn handle_edit<H: Host + ?Sized>(
        &self,
        context: &ResolutionContext,
        host: &mut H,
        edit: &CellEdit,
    ) -> Result<EditOutcome> {
        if edit.row >= self.config.sheets.max_rows {
            debug!(row = edit.row, max_rows = self.config.sheets.max_rows, "edit outside working rows");
            return Ok(EditOutcome::default());
        }

        let registry = self.registry(context)?;
        let resolver = VisibilityResolver::new(&registry);
        let schema = schema(edit.sheet);

        let mut table = host
            .table(edit.sheet)
            .unwrap_or_else(|| Table::new(&schema.layout_columns()));
        while table.len() <= edit.row {
            table.push_row::<&str, &str>(&[]);
        }
        table.set_cell(edit.row, &edit.column, edit.value.as_str())?;

        let mini_table = if SheetSchema::is_bookkeeping(&edit.column) || edit.value.trim().is_empty() {
            None
        } else {
            let requirement = resolver.attribute_requirement(
                edit.sheet,
                &edit.column,
                RowContext::new(&table, edit.row),
            );
            Some(self.tracker.record_entry(
                schema,
                &mut table,
                edit.row,
                &edit.column,
                requirement.as_ref(),
            )?)
        };

        // A rejected value never reaches the row, so it selects nothing.
        let visibility = if matches!(mini_table, Some(MiniTableOutcome::Rejected { .. })) {
            VisibilityChange::default()
        } else {
            resolver.compute_visibility(
                edit.sheet,
                &edit.column,
                &edit.value,
                Some(RowContext::new(&table, edit.row)),
            )
        };
        visibility.apply(edit.sheet, host);
        for write in mini_table.iter().flat_map(MiniTableOutcome::writes) {
            host.write_cell(edit.sheet, write.row, &write.column, &write.value);
        }

        info!(
            sheet = %edit.sheet,
            row = edit.row,
            column = edit.column.as_str(),
            shown = visibility.to_show.len(),
            grouped = ?mini_table,
            "handled edit"
        );
        Ok(EditOutcome {
            visibility,
            mini_table,
        })
    }

    /// Compile the rule of one column against the host's current tables
    pub fn compile_rule<S: TableSource + ?Sized>(
        &self,
        context: &ResolutionContext,
        source: &S,
        sheet: SheetKind,
        column: &str,
    ) -> ValidationRuleDescriptor {
        let snapshot = TableSnapshot::from_source(source);
        ValidationRuleCompiler::new(context, &self.config).compile(sheet, column, &snapshot)
    }

    /// Recompile one column's rule and apply it unless it is `None`
    pub fn revalidate_column<H: Host + ?Sized>(
        &self,
        context: &ResolutionContext,
        host: &mut H,
        sheet: SheetKind,
        column: &str,
    ) -> ValidationRuleDescriptor {
        let descriptor = self.compile_rule(context, &*host, sheet, column);
        apply_rule(host, sheet, column, &descriptor);
        descriptor
    }

    /// Recompile and apply the rules of every column in a sheet's header
    ///
    /// Returns the number of rules applied.
    pub fn revalidate_sheet<H: Host + ?Sized>(
        &self,
        context: &ResolutionContext,
        host: &mut H,
        sheet: SheetKind,
    ) -> usize {
        let snapshot = TableSnapshot::from_source(&*host);
        let compiler = ValidationRuleCompiler::new(context, &self.config);
        let columns = snapshot.table(sheet).columns.clone();

        let mut applied = 0;
        for column in &columns {
            let descriptor = compiler.compile(sheet, column, &snapshot);
            if apply_rule(host, sheet, column, &descriptor) {
                applied += 1;
            }
        }
        info!(sheet = %sheet, columns = columns.len(), applied, "revalidated sheet");
        applied
    }
}

fn apply_rule<S: ValidationSink + ?Sized>(
    sink: &mut S,
    sheet: SheetKind,
    column: &str,
    descriptor: &ValidationRuleDescriptor,
) -> bool {
    if descriptor.is_none() {
        return false;
    }
    sink.apply_validation_rule(sheet, column, descriptor);
    true
}
