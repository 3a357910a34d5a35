//! Lot number pickers
//!
//! Lots are narrowed in a fixed order: by the material subtype of their
//! catalog item, by registration type, then (summary provenance only) by
//! the presence of a lineage summary.

use sheetmeta_core::discriminators::{MaterialAction, RegistrationType};
use sheetmeta_core::table::{Table, composite_tail};
use sheetmeta_core::types::ProvenanceType;
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use super::select::{SelectOptions, select_where};
use crate::sheets::material::{
    ACTION, CATALOG_NUMBER_INHOUSE, CATALOG_NUMBER_NONINHOUSE, INHOUSE_REGISTRATION_TYPE,
    LOT_NUMBER, PROVENANCE_SUMMARY_COLUMN,
};

/// Criteria of a lot number picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotFilter {
    /// `material_type` the lot's catalog item must have
    pub subtype: Option<String>,
    /// Registration types to keep
    pub allowed_types: BTreeSet<RegistrationType>,
    /// Provenance mode of the session
    pub provenance: Option<ProvenanceType>,
}

impl LotFilter {
    pub fn new(
        subtype: Option<impl Into<String>>,
        allowed_types: impl IntoIterator<Item = RegistrationType>,
        provenance: Option<ProvenanceType>,
    ) -> Self {
        Self {
            subtype: subtype.map(Into::into),
            allowed_types: allowed_types.into_iter().collect(),
            provenance,
        }
    }

    /// Every lot, no subtype restriction
    pub fn any(provenance: Option<ProvenanceType>) -> Self {
        Self::new(None::<String>, RegistrationType::iter(), provenance)
    }
}

/// Lot numbers offered for a picker
///
/// `concepts` is the concept sheet, `lots` the material sheet.
pub fn filter_lot_numbers_by_subtype_and_provenance(
    concepts: &Table,
    lots: &Table,
    filter: &LotFilter,
) -> Vec<String> {
    let candidates = filter.subtype.as_deref().map(|subtype| {
        select_where(
            "material_type",
            subtype,
            concepts,
            &SelectOptions::matching(&["catalog_number"]),
        )
    });
    narrow_lot_numbers(lots, candidates.as_deref(), filter)
}

/// Stages after candidate selection: catalog membership, registration
/// type and lineage summary
///
/// `candidates == None` skips the catalog stage.
pub fn narrow_lot_numbers(lots: &Table, candidates: Option<&[String]>, filter: &LotFilter) -> Vec<String> {
    if !lots.has_column(LOT_NUMBER) {
        warn!(column = LOT_NUMBER, "lot sheet has no lot number column");
        return Vec::new();
    }

    let candidates: Option<HashSet<&str>> =
        candidates.map(|c| c.iter().map(String::as_str).collect());

    let mut rows: Vec<usize> = (0..lots.len())
        .filter(|&row| !lots.is_blank(row, LOT_NUMBER))
        .collect();

    if let Some(candidates) = &candidates {
        rows.retain(|&row| candidates.contains(lot_catalog_number(lots, row)));
    }

    rows.retain(|&row| {
        registration_type(lots, row).is_some_and(|t| filter.allowed_types.contains(&t))
    });

    if filter.provenance == Some(ProvenanceType::Summary) {
        rows.retain(|&row| {
            let lineage = registration_type(lots, row).is_some_and(RegistrationType::has_lineage);
            !lineage || !lots.is_blank(row, PROVENANCE_SUMMARY_COLUMN)
        });
    }

    let lot_numbers: Vec<String> = rows
        .into_iter()
        .map(|row| lots.value(row, LOT_NUMBER).trim().to_string())
        .collect();
    debug!(subtype = ?filter.subtype, offered = lot_numbers.len(), "filtered lot numbers");
    lot_numbers
}

/// Catalog number of a lot: the in-house item, else the supplier-assigned
/// part of the external item
pub fn lot_catalog_number(lots: &Table, row: usize) -> &str {
    let inhouse = lots.value(row, CATALOG_NUMBER_INHOUSE).trim();
    if inhouse.is_empty() {
        composite_tail(lots.value(row, CATALOG_NUMBER_NONINHOUSE)).trim()
    } else {
        inhouse
    }
}

/// Registration type of a lot; externally sourced lots are `external`
pub fn registration_type(lots: &Table, row: usize) -> Option<RegistrationType> {
    let action = lots.value(row, ACTION).trim();
    if matches!(MaterialAction::from_str(action), Ok(MaterialAction::RegisterExternal)) {
        return Some(RegistrationType::External);
    }
    RegistrationType::from_str(lots.value(row, INHOUSE_REGISTRATION_TYPE).trim()).ok()
}
