//! Reusable attribute fragments
//!
//! Each fragment is a small, named attribute-requirement map. Sheet schemas
//! compose entity objects from these.

use super::compose::{Fragment, attributes};
use sheetmeta_core::types::{AttributeMap, AttributeRequirement};

const fn required() -> AttributeRequirement {
    AttributeRequirement::single(true)
}

const fn optional() -> AttributeRequirement {
    AttributeRequirement::single(false)
}

fn linked(is_required: bool, column: &str) -> AttributeRequirement {
    AttributeRequirement::multi_depending_on(is_required, column)
}

macro_rules! fragment {
    ($(#[$doc:meta])* $ident:ident = $name:literal { $($attr:literal => $req:expr),+ $(,)? }) => {
        $(#[$doc])*
        pub const $ident: Fragment = {
            fn build() -> AttributeMap {
                attributes([$(($attr, $req)),+])
            }
            Fragment::new($name, build)
        };
    };
}

// Concept definitions

fragment!(
    /// People
    PERSON_CONTACT = "person_contact" {
        "email" => required(),
        "phone" => optional(),
        "affiliation_organization_id" => optional(),
        "orcid" => optional(),
    }
);

fragment!(
    ORGANIZATION_DETAILS = "organization_details" {
        "organization_website" => optional(),
        "organization_address" => optional(),
        "ror_id" => optional(),
    }
);

fragment!(
    /// Material kinds; `material_type` selects the subtype
    MATERIAL_CONCEPT = "material_concept" {
        "material_type" => required(),
        "supplier_organization_id" => optional(),
        "catalog_number" => required(),
    }
);

fragment!(
    INSTRUMENT_DETAILS = "instrument_details" {
        "manufacturer_organization_id" => optional(),
        "model_number" => optional(),
        "serial_number" => optional(),
    }
);

fragment!(
    SOFTWARE_DETAILS = "software_details" {
        "software_version" => required(),
        "software_url" => optional(),
    }
);

fragment!(
    PROPERTY_DETAILS = "property_details" {
        "property_unit_id" => optional(),
        "measurement_method" => optional(),
    }
);

fragment!(
    UNIT_DETAILS = "unit_details" {
        "unit_symbol" => required(),
        "si_conversion_factor" => optional(),
    }
);

fragment!(
    CLINICAL_TRIAL = "clinical_trial" {
        "trial_id" => required(),
        "trial_phase" => optional(),
    }
);

fragment!(
    CHEMICAL_IDENTITY = "chemical_identity" {
        "cas_number" => optional(),
        "molecular_weight" => optional(),
        "chemical_formula" => optional(),
    }
);

fragment!(
    /// Switch between a fixed pH and a pH range
    PH_CONTROL = "ph_control" {
        "has_fixed_pH" => required(),
    }
);

fragment!(
    FIXED_PH = "fixed_ph" {
        "pH" => required(),
    }
);

fragment!(
    PH_RANGE = "ph_range" {
        "pH_range_min" => required(),
        "pH_range_max" => required(),
    }
);

fragment!(
    /// Medium components identified by common name and CAS number, one
    /// component per row
    MEDIUM_COMPONENTS = "medium_components" {
        "component_common_name" => linked(true, "component_cas"),
        "component_cas" => linked(false, "component_common_name"),
    }
);

fragment!(
    /// Concentrations aligned with the medium components
    COMPONENT_CONCENTRATIONS = "component_concentrations" {
        "component_common_name" => linked(true, "component_cas"),
        "component_concentration" => linked(false, "component_common_name"),
    }
);

fragment!(
    BUFFER_COMPONENTS = "buffer_components" {
        "buffer_component" => AttributeRequirement::multi(true),
    }
);

fragment!(
    CONSUMABLE_DETAILS = "consumable_details" {
        "consumable_material" => optional(),
    }
);

fragment!(
    ORGANISM_TAXONOMY = "organism_taxonomy" {
        "species" => required(),
        "strain" => optional(),
        "genotype" => optional(),
    }
);

fragment!(
    CELL_LINE_DETAILS = "cell_line_details" {
        "species" => required(),
        "cell_line_name" => required(),
        "tissue_of_origin" => optional(),
    }
);

fragment!(
    BIOSPECIMEN_DETAILS = "biospecimen_details" {
        "specimen_type" => required(),
        "collection_site" => optional(),
        "anatomical_site" => optional(),
    }
);

// Material definitions

fragment!(
    INHOUSE_REGISTRATION = "inhouse_registration" {
        "inhouse_material_registration_type" => required(),
        "lot_number" => required(),
    }
);

fragment!(
    EXTERNAL_REGISTRATION = "external_registration" {
        "catalog_number_noninhouse_item" => required(),
        "lot_number" => required(),
        "supplier_lot_number" => optional(),
        "date_received" => optional(),
    }
);

fragment!(
    /// Storage bookkeeping shared by every lot
    LOT_STORAGE = "lot_storage" {
        "quantity" => optional(),
        "quantity_unit_id" => optional(),
        "storage_location" => optional(),
        "expiration_date" => optional(),
    }
);

fragment!(
    INHOUSE_ITEM = "inhouse_item" {
        "catalog_number_inhouse_item" => required(),
        "production_date" => optional(),
    }
);

fragment!(
    DERIVED_LINEAGE = "derived_lineage" {
        "parent_lot_number" => AttributeRequirement::multi(true),
    }
);

fragment!(
    COMPOSED_LINEAGE = "composed_lineage" {
        "component_lot_number" => linked(true, "component_quantity"),
        "component_quantity" => linked(true, "component_lot_number"),
    }
);

fragment!(
    PROVENANCE_SUMMARY = "provenance_summary" {
        "provenance_summary" => required(),
    }
);

fragment!(
    PROVENANCE_ACTIVITY = "provenance_activity" {
        "generating_process_execution_id" => required(),
    }
);

// Process definitions

fragment!(
    MEASUREMENT = "measurement" {
        "instrument_concept_id" => required(),
        "measured_property_id" => required(),
        "output_unit_id" => optional(),
    }
);

fragment!(
    TRANSFORMATION = "transformation" {
        "input_material_concept_id" => AttributeRequirement::multi(true),
        "output_material_concept_id" => required(),
    }
);

fragment!(
    INCUBATION = "incubation" {
        "temperature_celsius" => required(),
        "duration_minutes" => required(),
    }
);

fragment!(
    MIXING = "mixing" {
        "input_material_concept_id" => AttributeRequirement::multi(true),
        "mixing_speed_rpm" => optional(),
        "duration_minutes" => required(),
    }
);

fragment!(
    CULTIVATION_CONDITIONS = "cultivation_conditions" {
        "growth_temperature_celsius" => required(),
        "duration_minutes" => required(),
    }
);

// Workflow definitions

fragment!(
    PROCESS_STEP = "process_step" {
        "step_process_id" => required(),
        "step_input" => AttributeRequirement::multi(false),
        "parameter_source" => optional(),
    }
);

fragment!(
    SUB_WORKFLOW_STEP = "sub_workflow_step" {
        "step_workflow_id" => required(),
    }
);

fragment!(
    DECISION_STEP = "decision_step" {
        "decision_criterion" => required(),
        "next_step_if_true" => required(),
        "next_step_if_false" => required(),
    }
);

fragment!(
    /// Parameter name/value pairs, one pair per row
    FIXED_PARAMETERS = "fixed_parameters" {
        "parameter_name" => linked(true, "parameter_value"),
        "parameter_value" => linked(true, "parameter_name"),
    }
);

fragment!(
    EXECUTION_PARAMETERS = "execution_parameters" {
        "parameter_name" => AttributeRequirement::multi(true),
    }
);

// Process executions

fragment!(
    /// Who ran an execution and when
    EXECUTION_TIMING = "execution_timing" {
        "operator_person_id" => optional(),
        "start_date" => required(),
        "start_time" => optional(),
        "end_date" => optional(),
        "end_time" => optional(),
        "has_deviation" => optional(),
    }
);

fragment!(
    PROCESS_EXECUTION = "process_execution" {
        "executed_process_id" => required(),
        "input_lot_number" => AttributeRequirement::multi(false),
        "output_lot_number" => AttributeRequirement::multi(false),
    }
);

fragment!(
    WORKFLOW_EXECUTION = "workflow_execution" {
        "executed_workflow_id" => required(),
    }
);

fragment!(
    SPECIMEN_COLLECTION = "specimen_collection" {
        "participant_id" => required(),
        "collection_site" => optional(),
        "collected_specimen_lot" => AttributeRequirement::multi(true),
    }
);

fragment!(
    /// Deviations from the planned parameters, one parameter per row
    DEVIATION = "deviation" {
        "deviation_description" => required(),
        "deviation_parameter_name" => linked(false, "deviation_parameter_value"),
        "deviation_parameter_value" => linked(false, "deviation_parameter_name"),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_component_name_is_identical() {
        let components = MEDIUM_COMPONENTS.attributes();
        let concentrations = COMPONENT_CONCENTRATIONS.attributes();
        assert_eq!(
            components.get("component_common_name"),
            concentrations.get("component_common_name")
        );
    }

    #[test]
    fn test_fragment_names() {
        assert_eq!(PH_RANGE.name(), "ph_range");
        assert_eq!(DEVIATION.attributes().len(), 3);
    }
}
