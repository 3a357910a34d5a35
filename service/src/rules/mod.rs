//! Validation rule compilation
//!
//! Turns a column's [`RuleSpec`] into a concrete
//! [`ValidationRuleDescriptor`] against current table contents.

pub mod spec;

pub use spec::{OptionQuery, RuleSpec};

use sheetmeta_core::config::SheetMetaConfig;
use sheetmeta_core::types::{ResolutionContext, SheetKind};
use sheetmeta_core::validation::{ValidationRuleDescriptor, column_index_to_letter};
use std::ops::RangeInclusive;
use tracing::{debug, warn};

use crate::options::{OptionListResolver, normalize_options};
use crate::sheets::schema;
use crate::snapshot::TableSnapshot;

/// Compiles column rules for one resolution context
#[derive(Debug, Clone, Copy)]
pub struct ValidationRuleCompiler<'a> {
    context: &'a ResolutionContext,
    config: &'a SheetMetaConfig,
}

impl<'a> ValidationRuleCompiler<'a> {
    pub const fn new(context: &'a ResolutionContext, config: &'a SheetMetaConfig) -> Self {
        Self { context, config }
    }

    /// Rule for `column` of `sheet`; [`ValidationRuleDescriptor::None`] for
    /// columns without one
    pub fn compile(
        &self,
        sheet: SheetKind,
        column: &str,
        snapshot: &TableSnapshot,
    ) -> ValidationRuleDescriptor {
        let Some(spec) = schema(sheet).rule(column) else {
            debug!(sheet = %sheet, column, "no rule for column");
            return ValidationRuleDescriptor::None;
        };

        let descriptor = match spec {
            RuleSpec::Fixed(descriptor) => descriptor,
            RuleSpec::Choices(choices) => {
                ValidationRuleDescriptor::list(normalize_options(choices(self.context)))
            }
            RuleSpec::Range {
                sheet: target,
                column: target_column,
            } => {
                if snapshot.table(target).has_column(target_column) {
                    ValidationRuleDescriptor::ListFromRange {
                        sheet_name: target.sheet_name().to_string(),
                        column_name: target_column.to_string(),
                        start_row: self.config.sheets.data_start_row,
                    }
                } else {
                    warn!(
                        sheet = %target,
                        column = target_column,
                        "range source column missing, offering no options"
                    );
                    ValidationRuleDescriptor::list(Vec::<String>::new())
                }
            }
            RuleSpec::Query(query) => {
                let resolver = OptionListResolver::new(snapshot, &self.config.options);
                let options = resolver.resolve(&query, self.context.provenance);
                ValidationRuleDescriptor::list(normalize_options(options))
            }
        };

        debug!(sheet = %sheet, column, rule = %descriptor, "compiled rule");
        descriptor
    }

    /// One-based sheet rows a rule covers
    pub fn row_range(&self) -> RangeInclusive<u32> {
        let first = self.config.sheets.data_start_row;
        let rows = u32::try_from(self.config.sheets.max_rows).unwrap_or(u32::MAX);
        first..=first.saturating_add(rows.saturating_sub(1))
    }

    /// A1-style range of a column, e.g. `D2:D51`
    pub fn cell_range(&self, column_index: u16) -> String {
        let letter = column_index_to_letter(column_index);
        let rows = self.row_range();
        format!("{letter}{}:{letter}{}", rows.start(), rows.end())
    }
}
