//! Process definitions: reusable descriptions of lab procedures.

use sheetmeta_core::discriminators::{ConceptType, Flag, ProcessType};
use sheetmeta_core::error::Result;
use sheetmeta_core::types::SheetKind;
use sheetmeta_core::validation::ValidationRuleDescriptor;

use super::{DiscriminatorColumn, PH_COLUMNS, SheetSchema};
use crate::registry::SheetRegistrar;
use crate::registry::fragments::{
    CULTIVATION_CONDITIONS, FIXED_PH, INCUBATION, MEASUREMENT, MIXING, ORGANISM_TAXONOMY,
    PH_CONTROL, PH_RANGE, TRANSFORMATION,
};
use crate::rules::spec::{RuleSpec, all_choices, scoped_choices};

pub const PROCESS_TYPE: &str = "process_type";
pub const HAS_FIXED_PH: &str = "has_fixed_pH";

const PROCESS_SUBTYPE_COLUMNS: &[&str] = &[
    "instrument_concept_id",
    "measured_property_id",
    "output_unit_id",
    "input_material_concept_id",
    "output_material_concept_id",
    "temperature_celsius",
    "duration_minutes",
    "has_fixed_pH",
    "mixing_speed_rpm",
    "species",
    "strain",
    "genotype",
    "growth_temperature_celsius",
];

const TEMPERATURE: ValidationRuleDescriptor =
    ValidationRuleDescriptor::float_bounded(5, 2, -273.15, 1000.0);

pub static SCHEMA: SheetSchema = SheetSchema {
    kind: SheetKind::Process,
    key_column: "process_id",
    base_columns: &["process_id", "process_name", "description", PROCESS_TYPE],
    row_scoped: false,
    discriminators: &[
        DiscriminatorColumn {
            name: PROCESS_TYPE,
            parent: None,
            hides: &[PROCESS_SUBTYPE_COLUMNS, PH_COLUMNS],
        },
        DiscriminatorColumn {
            name: HAS_FIXED_PH,
            parent: Some(PROCESS_TYPE),
            hides: &[PH_COLUMNS],
        },
    ],
    register,
    rules,
};

fn register(sheet: &mut SheetRegistrar<'_, '_>) -> Result<()> {
    sheet.scoped(PROCESS_TYPE, ProcessType::Measurement, &[MEASUREMENT])?;
    sheet.scoped(PROCESS_TYPE, ProcessType::Transformation, &[TRANSFORMATION])?;
    sheet.scoped(PROCESS_TYPE, ProcessType::Incubation, &[INCUBATION, PH_CONTROL])?;
    sheet.scoped(PROCESS_TYPE, ProcessType::Mixing, &[MIXING])?;
    sheet.scoped(
        PROCESS_TYPE,
        ProcessType::Cultivation,
        &[ORGANISM_TAXONOMY, CULTIVATION_CONDITIONS],
    )?;

    sheet.core(HAS_FIXED_PH, Flag::True, &[FIXED_PH])?;
    sheet.core(HAS_FIXED_PH, Flag::False, &[PH_RANGE])?;
    Ok(())
}

fn rules(column: &str) -> Option<RuleSpec> {
    use ValidationRuleDescriptor as V;

    let spec = match column {
        "process_id" | "process_name" | "species" | "strain" | "genotype" => RuleSpec::text(255),
        "description" => RuleSpec::text(1000),
        PROCESS_TYPE => RuleSpec::Choices(scoped_choices::<ProcessType>),
        HAS_FIXED_PH => RuleSpec::Choices(all_choices::<Flag>),
        "instrument_concept_id" => RuleSpec::concept_ids(ConceptType::Instrument),
        "measured_property_id" => RuleSpec::concept_ids(ConceptType::Property),
        "output_unit_id" => RuleSpec::concept_ids(ConceptType::Unit),
        "input_material_concept_id" | "output_material_concept_id" => {
            RuleSpec::concept_ids(ConceptType::Material)
        }
        "temperature_celsius" | "growth_temperature_celsius" => RuleSpec::fixed(TEMPERATURE),
        "duration_minutes" => RuleSpec::fixed(V::integer(0, 1_000_000_000_000)),
        "mixing_speed_rpm" => RuleSpec::fixed(V::integer(0, 100_000)),
        "pH" | "pH_range_min" | "pH_range_max" => {
            RuleSpec::fixed(V::float_bounded(4, 2, 0.0, 14.0))
        }
        _ => return None,
    };
    Some(spec)
}
