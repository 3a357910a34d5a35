//! Material definitions: one row per lot, generated in house or bought.

use sheetmeta_core::discriminators::{ConceptType, MaterialAction, RegistrationType};
use sheetmeta_core::error::Result;
use sheetmeta_core::types::{ProvenanceType, SheetKind};
use sheetmeta_core::validation::ValidationRuleDescriptor;

use super::{DiscriminatorColumn, SheetSchema};
use crate::registry::fragments::{
    COMPOSED_LINEAGE, DERIVED_LINEAGE, EXTERNAL_REGISTRATION, INHOUSE_ITEM, INHOUSE_REGISTRATION,
    LOT_STORAGE, PROVENANCE_ACTIVITY, PROVENANCE_SUMMARY,
};
use crate::registry::{Fragment, SheetRegistrar};
use crate::rules::spec::{ANY_LOT, RuleSpec, all_choices, inhouse_registration_choices};

pub const ACTION: &str = "action";
pub const INHOUSE_REGISTRATION_TYPE: &str = "inhouse_material_registration_type";
pub const LOT_NUMBER: &str = "lot_number";
pub const CATALOG_NUMBER_INHOUSE: &str = "catalog_number_inhouse_item";
pub const CATALOG_NUMBER_NONINHOUSE: &str = "catalog_number_noninhouse_item";
pub const PROVENANCE_SUMMARY_COLUMN: &str = "provenance_summary";

const INHOUSE_COLUMNS: &[&str] = &[
    "catalog_number_inhouse_item",
    "production_date",
    "parent_lot_number",
    "component_lot_number",
    "component_quantity",
    "provenance_summary",
    "generating_process_execution_id",
];

const LOT_COLUMNS: &[&str] = &[
    "inhouse_material_registration_type",
    "catalog_number_noninhouse_item",
    "supplier_lot_number",
    "date_received",
    "quantity",
    "quantity_unit_id",
    "storage_location",
    "expiration_date",
];

pub static SCHEMA: SheetSchema = SheetSchema {
    kind: SheetKind::Material,
    key_column: LOT_NUMBER,
    base_columns: &[LOT_NUMBER, ACTION],
    row_scoped: false,
    discriminators: &[
        DiscriminatorColumn {
            name: ACTION,
            parent: None,
            hides: &[LOT_COLUMNS, INHOUSE_COLUMNS],
        },
        DiscriminatorColumn {
            name: INHOUSE_REGISTRATION_TYPE,
            parent: Some(ACTION),
            hides: &[INHOUSE_COLUMNS],
        },
    ],
    register,
    rules,
};

fn register(sheet: &mut SheetRegistrar<'_, '_>) -> Result<()> {
    let provenance: &[Fragment] = match sheet.context().provenance {
        Some(ProvenanceType::Summary) => &[PROVENANCE_SUMMARY],
        Some(ProvenanceType::Activity) => &[PROVENANCE_ACTIVITY],
        None => &[],
    };

    sheet.core(
        ACTION,
        MaterialAction::RegisterInternal,
        &[INHOUSE_REGISTRATION, LOT_STORAGE],
    )?;
    sheet.core(
        ACTION,
        MaterialAction::RegisterExternal,
        &[EXTERNAL_REGISTRATION, LOT_STORAGE],
    )?;

    sheet.core(INHOUSE_REGISTRATION_TYPE, RegistrationType::Orphan, &[INHOUSE_ITEM])?;
    let derived = [&[INHOUSE_ITEM, DERIVED_LINEAGE][..], provenance].concat();
    sheet.core(INHOUSE_REGISTRATION_TYPE, RegistrationType::Derived, &derived)?;
    let composed = [&[INHOUSE_ITEM, COMPOSED_LINEAGE][..], provenance].concat();
    sheet.core(INHOUSE_REGISTRATION_TYPE, RegistrationType::Composed, &composed)?;
    Ok(())
}

fn rules(column: &str) -> Option<RuleSpec> {
    use ValidationRuleDescriptor as V;

    let spec = match column {
        LOT_NUMBER | "supplier_lot_number" | "storage_location" => RuleSpec::text(255),
        PROVENANCE_SUMMARY_COLUMN => RuleSpec::text(1000),
        ACTION => RuleSpec::Choices(all_choices::<MaterialAction>),
        INHOUSE_REGISTRATION_TYPE => RuleSpec::Choices(inhouse_registration_choices),
        CATALOG_NUMBER_INHOUSE => RuleSpec::Range {
            sheet: SheetKind::Concept,
            column: "catalog_number",
        },
        CATALOG_NUMBER_NONINHOUSE => RuleSpec::concept_columns(
            ConceptType::Material,
            &["supplier_organization_id", "catalog_number"],
        ),
        "date_received" | "expiration_date" | "production_date" => RuleSpec::fixed(V::Date),
        "quantity" | "component_quantity" => RuleSpec::fixed(V::float_unbounded(10, 4)),
        "quantity_unit_id" => RuleSpec::concept_ids(ConceptType::Unit),
        "parent_lot_number" | "component_lot_number" => RuleSpec::lots(None, ANY_LOT, false),
        "generating_process_execution_id" => {
            RuleSpec::distinct(SheetKind::Execution, &["execution_id"])
        }
        _ => return None,
    };
    Some(spec)
}
