//! Process executions: runs of processes and workflows on concrete lots.

use sheetmeta_core::discriminators::{ConceptType, ExecutionType, Flag, MaterialType};
use sheetmeta_core::error::Result;
use sheetmeta_core::types::SheetKind;
use sheetmeta_core::validation::ValidationRuleDescriptor;

use super::{DiscriminatorColumn, SheetSchema};
use crate::registry::SheetRegistrar;
use crate::registry::fragments::{
    DEVIATION, EXECUTION_TIMING, PROCESS_EXECUTION, SPECIMEN_COLLECTION, WORKFLOW_EXECUTION,
};
use crate::rules::spec::{ANY_LOT, RuleSpec, all_choices, scoped_choices};

pub const EXECUTION_TYPE: &str = "execution_type";
pub const HAS_DEVIATION: &str = "has_deviation";

const EXECUTION_COLUMNS: &[&str] = &[
    "executed_process_id",
    "input_lot_number",
    "output_lot_number",
    "executed_workflow_id",
    "operator_person_id",
    "start_date",
    "start_time",
    "end_date",
    "end_time",
    "has_deviation",
    "participant_id",
    "collection_site",
    "collected_specimen_lot",
];

const DEVIATION_COLUMNS: &[&str] = &[
    "deviation_description",
    "deviation_parameter_name",
    "deviation_parameter_value",
];

pub static SCHEMA: SheetSchema = SheetSchema {
    kind: SheetKind::Execution,
    key_column: "execution_id",
    base_columns: &["execution_id", "description", EXECUTION_TYPE],
    row_scoped: true,
    discriminators: &[
        DiscriminatorColumn {
            name: EXECUTION_TYPE,
            parent: None,
            hides: &[EXECUTION_COLUMNS, DEVIATION_COLUMNS],
        },
        DiscriminatorColumn {
            name: HAS_DEVIATION,
            parent: Some(EXECUTION_TYPE),
            hides: &[DEVIATION_COLUMNS],
        },
    ],
    register,
    rules,
};

fn register(sheet: &mut SheetRegistrar<'_, '_>) -> Result<()> {
    sheet.scoped(
        EXECUTION_TYPE,
        ExecutionType::ProcessExecution,
        &[PROCESS_EXECUTION, EXECUTION_TIMING],
    )?;
    sheet.scoped(
        EXECUTION_TYPE,
        ExecutionType::WorkflowExecution,
        &[WORKFLOW_EXECUTION, EXECUTION_TIMING],
    )?;
    sheet.scoped(
        EXECUTION_TYPE,
        ExecutionType::SpecimenCollection,
        &[SPECIMEN_COLLECTION, EXECUTION_TIMING],
    )?;

    sheet.core(HAS_DEVIATION, Flag::True, &[DEVIATION])?;
    Ok(())
}

fn rules(column: &str) -> Option<RuleSpec> {
    use ValidationRuleDescriptor as V;

    let spec = match column {
        "execution_id" | "participant_id" | "collection_site" | "deviation_parameter_name"
        | "deviation_parameter_value" => RuleSpec::text(255),
        "description" | "deviation_description" => RuleSpec::text(1000),
        EXECUTION_TYPE => RuleSpec::Choices(scoped_choices::<ExecutionType>),
        HAS_DEVIATION => RuleSpec::Choices(all_choices::<Flag>),
        "executed_process_id" => RuleSpec::distinct(SheetKind::Process, &["process_id"]),
        "executed_workflow_id" => RuleSpec::distinct(SheetKind::Workflow, &["workflow_id"]),
        "operator_person_id" => RuleSpec::concept_ids(ConceptType::Person),
        "start_date" | "end_date" => RuleSpec::fixed(V::Date),
        "start_time" | "end_time" => RuleSpec::fixed(V::Time),
        "input_lot_number" => RuleSpec::lots(None, ANY_LOT, false),
        "output_lot_number" => RuleSpec::lots(None, ANY_LOT, true),
        "collected_specimen_lot" => {
            RuleSpec::lots(Some(MaterialType::Biospecimen), ANY_LOT, false)
        }
        _ => return None,
    };
    Some(spec)
}
