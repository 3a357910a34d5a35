//! Concept definitions: people, organizations, material kinds, instruments
//! and the other things lots and processes refer to.

use sheetmeta_core::discriminators::{ConceptType, Flag, MaterialType};
use sheetmeta_core::error::Result;
use sheetmeta_core::types::SheetKind;
use sheetmeta_core::validation::ValidationRuleDescriptor;

use super::{DiscriminatorColumn, PH_COLUMNS, SheetSchema};
use crate::registry::SheetRegistrar;
use crate::registry::fragments::{
    BIOSPECIMEN_DETAILS, BUFFER_COMPONENTS, CELL_LINE_DETAILS, CHEMICAL_IDENTITY, CLINICAL_TRIAL,
    COMPONENT_CONCENTRATIONS, CONSUMABLE_DETAILS, FIXED_PH, INSTRUMENT_DETAILS, MATERIAL_CONCEPT,
    MEDIUM_COMPONENTS, ORGANISM_TAXONOMY, ORGANIZATION_DETAILS, PERSON_CONTACT, PH_CONTROL,
    PH_RANGE, PROPERTY_DETAILS, SOFTWARE_DETAILS, UNIT_DETAILS,
};
use crate::rules::spec::{RuleSpec, all_choices, scoped_choices};

pub const CONCEPT_TYPE: &str = "concept_type";
pub const MATERIAL_TYPE: &str = "material_type";
pub const HAS_FIXED_PH: &str = "has_fixed_pH";

const CONCEPT_SUBTYPE_COLUMNS: &[&str] = &[
    "email",
    "phone",
    "affiliation_organization_id",
    "orcid",
    "organization_website",
    "organization_address",
    "ror_id",
    "material_type",
    "supplier_organization_id",
    "catalog_number",
    "manufacturer_organization_id",
    "model_number",
    "serial_number",
    "software_version",
    "software_url",
    "property_unit_id",
    "measurement_method",
    "unit_symbol",
    "si_conversion_factor",
    "trial_id",
    "trial_phase",
];

const MATERIAL_SUBTYPE_COLUMNS: &[&str] = &[
    "cas_number",
    "molecular_weight",
    "chemical_formula",
    "has_fixed_pH",
    "component_common_name",
    "component_cas",
    "component_concentration",
    "buffer_component",
    "consumable_material",
    "species",
    "strain",
    "genotype",
    "cell_line_name",
    "tissue_of_origin",
    "specimen_type",
    "collection_site",
    "anatomical_site",
];

pub static SCHEMA: SheetSchema = SheetSchema {
    kind: SheetKind::Concept,
    key_column: "concept_id",
    base_columns: &["concept_id", "concept_name", "description", CONCEPT_TYPE],
    row_scoped: false,
    discriminators: &[
        DiscriminatorColumn {
            name: CONCEPT_TYPE,
            parent: None,
            hides: &[CONCEPT_SUBTYPE_COLUMNS, MATERIAL_SUBTYPE_COLUMNS, PH_COLUMNS],
        },
        DiscriminatorColumn {
            name: MATERIAL_TYPE,
            parent: Some(CONCEPT_TYPE),
            hides: &[MATERIAL_SUBTYPE_COLUMNS, PH_COLUMNS],
        },
        DiscriminatorColumn {
            name: HAS_FIXED_PH,
            parent: Some(MATERIAL_TYPE),
            hides: &[PH_COLUMNS],
        },
    ],
    register,
    rules,
};

fn register(sheet: &mut SheetRegistrar<'_, '_>) -> Result<()> {
    sheet.scoped(CONCEPT_TYPE, ConceptType::Person, &[PERSON_CONTACT])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Organization, &[ORGANIZATION_DETAILS])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Material, &[MATERIAL_CONCEPT])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Instrument, &[INSTRUMENT_DETAILS])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Software, &[SOFTWARE_DETAILS])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Property, &[PROPERTY_DETAILS])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::Unit, &[UNIT_DETAILS])?;
    sheet.scoped(CONCEPT_TYPE, ConceptType::ClinicalTrial, &[CLINICAL_TRIAL])?;

    sheet.scoped(MATERIAL_TYPE, MaterialType::Chemical, &[CHEMICAL_IDENTITY])?;
    sheet.scoped(
        MATERIAL_TYPE,
        MaterialType::CultureMedium,
        &[PH_CONTROL, MEDIUM_COMPONENTS, COMPONENT_CONCENTRATIONS],
    )?;
    sheet.scoped(MATERIAL_TYPE, MaterialType::Buffer, &[PH_CONTROL, BUFFER_COMPONENTS])?;
    sheet.scoped(MATERIAL_TYPE, MaterialType::Consumable, &[CONSUMABLE_DETAILS])?;
    sheet.scoped(MATERIAL_TYPE, MaterialType::Organism, &[ORGANISM_TAXONOMY])?;
    sheet.scoped(MATERIAL_TYPE, MaterialType::CellLine, &[CELL_LINE_DETAILS])?;
    sheet.scoped(MATERIAL_TYPE, MaterialType::Biospecimen, &[BIOSPECIMEN_DETAILS])?;

    sheet.core(HAS_FIXED_PH, Flag::True, &[FIXED_PH])?;
    sheet.core(HAS_FIXED_PH, Flag::False, &[PH_RANGE])?;
    Ok(())
}

fn rules(column: &str) -> Option<RuleSpec> {
    use ValidationRuleDescriptor as V;

    let spec = match column {
        "concept_id" | "concept_name" | "organization_address" | "ror_id" | "catalog_number"
        | "model_number" | "serial_number" | "software_version" | "trial_id" | "trial_phase"
        | "chemical_formula" | "component_common_name" | "consumable_material" | "species"
        | "strain" | "genotype" | "cell_line_name" | "tissue_of_origin" | "specimen_type"
        | "collection_site" | "anatomical_site" => RuleSpec::text(255),
        "description" | "measurement_method" => RuleSpec::text(1000),
        "orcid" => RuleSpec::text(19),
        "unit_symbol" => RuleSpec::text(20),
        "cas_number" | "component_cas" => RuleSpec::text(12),
        CONCEPT_TYPE => RuleSpec::Choices(scoped_choices::<ConceptType>),
        MATERIAL_TYPE => RuleSpec::Choices(scoped_choices::<MaterialType>),
        HAS_FIXED_PH => RuleSpec::Choices(all_choices::<Flag>),
        "email" => RuleSpec::fixed(V::Email),
        "phone" => RuleSpec::fixed(V::Phone),
        "organization_website" | "software_url" => RuleSpec::fixed(V::Url),
        "affiliation_organization_id" | "supplier_organization_id" | "manufacturer_organization_id" => {
            RuleSpec::concept_ids(ConceptType::Organization)
        }
        "property_unit_id" => RuleSpec::concept_ids(ConceptType::Unit),
        "buffer_component" => RuleSpec::concept_ids(ConceptType::Material),
        "si_conversion_factor" => RuleSpec::fixed(V::float_unbounded(15, 10)),
        "molecular_weight" | "component_concentration" => RuleSpec::fixed(V::float_unbounded(10, 4)),
        "pH" | "pH_range_min" | "pH_range_max" => {
            RuleSpec::fixed(V::float_bounded(4, 2, 0.0, 14.0))
        }
        _ => return None,
    };
    Some(spec)
}
