//! Dependent dropdown option lists
//!
//! Option lists are computed by scanning other sheets' rows. A missing sheet
//! or column always yields an empty list.

pub mod lots;
pub mod select;

pub use lots::{LotFilter, filter_lot_numbers_by_subtype_and_provenance, narrow_lot_numbers};
pub use select::{
    SelectOptions, filter_list_by_starts_with, normalize_options, select_distinct_no_filter,
    select_where,
};

use sheetmeta_core::config::OptionListConfig;
use sheetmeta_core::types::{ProvenanceType, SheetKind};

use crate::rules::spec::OptionQuery;
use crate::snapshot::TableSnapshot;

/// Evaluates option queries against a snapshot of every sheet
#[derive(Debug, Clone, Copy)]
pub struct OptionListResolver<'s> {
    snapshot: &'s TableSnapshot,
    config: &'s OptionListConfig,
}

impl<'s> OptionListResolver<'s> {
    pub const fn new(snapshot: &'s TableSnapshot, config: &'s OptionListConfig) -> Self {
        Self { snapshot, config }
    }

    /// Raw option strings of a query, in row order
    pub fn resolve(&self, query: &OptionQuery, provenance: Option<ProvenanceType>) -> Vec<String> {
        match query {
            OptionQuery::Where {
                sheet,
                filter_column,
                filter_value,
                source_columns,
                equals,
            } => select_where(
                filter_column,
                filter_value,
                self.snapshot.table(*sheet),
                &SelectOptions::new(*source_columns, *equals),
            ),
            OptionQuery::Distinct {
                sheet,
                source_columns,
            } => select_distinct_no_filter(*source_columns, self.snapshot.table(*sheet)),
            OptionQuery::Lots {
                subtype,
                allowed,
                internal_only,
            } => {
                let filter = LotFilter::new(
                    subtype.map(|s| s.as_ref().to_string()),
                    allowed.iter().copied(),
                    provenance,
                );
                let lots = filter_lot_numbers_by_subtype_and_provenance(
                    self.snapshot.table(SheetKind::Concept),
                    self.snapshot.table(SheetKind::Material),
                    &filter,
                );
                match (&self.config.internal_lot_prefix, internal_only) {
                    (Some(prefix), true) => filter_list_by_starts_with(prefix, &lots, true),
                    _ => lots,
                }
            }
        }
    }
}
