//! Workflow definitions: ordered steps, each step one row.
//!
//! Steps continue over several rows when they list inputs or parameters, so
//! a blank discriminator is inherited from the row above.

use sheetmeta_core::discriminators::{ConceptType, ParameterSource, StepType};
use sheetmeta_core::error::Result;
use sheetmeta_core::types::SheetKind;
use sheetmeta_core::validation::ValidationRuleDescriptor;

use super::{DiscriminatorColumn, SheetSchema};
use crate::registry::SheetRegistrar;
use crate::registry::fragments::{
    DECISION_STEP, EXECUTION_PARAMETERS, FIXED_PARAMETERS, PROCESS_STEP, SUB_WORKFLOW_STEP,
};
use crate::rules::spec::{RuleSpec, all_choices};

pub const STEP_TYPE: &str = "step_type";
pub const PARAMETER_SOURCE: &str = "parameter_source";

const STEP_COLUMNS: &[&str] = &[
    "step_process_id",
    "step_input",
    "parameter_source",
    "step_workflow_id",
    "decision_criterion",
    "next_step_if_true",
    "next_step_if_false",
];

const PARAMETER_COLUMNS: &[&str] = &["parameter_name", "parameter_value"];

pub static SCHEMA: SheetSchema = SheetSchema {
    kind: SheetKind::Workflow,
    key_column: "workflow_id",
    base_columns: &["workflow_id", "workflow_name", "step_number", STEP_TYPE],
    row_scoped: true,
    discriminators: &[
        DiscriminatorColumn {
            name: STEP_TYPE,
            parent: None,
            hides: &[STEP_COLUMNS, PARAMETER_COLUMNS],
        },
        DiscriminatorColumn {
            name: PARAMETER_SOURCE,
            parent: Some(STEP_TYPE),
            hides: &[PARAMETER_COLUMNS],
        },
    ],
    register,
    rules,
};

fn register(sheet: &mut SheetRegistrar<'_, '_>) -> Result<()> {
    sheet.core(STEP_TYPE, StepType::Process, &[PROCESS_STEP])?;
    sheet.core(STEP_TYPE, StepType::SubWorkflow, &[SUB_WORKFLOW_STEP])?;
    sheet.core(STEP_TYPE, StepType::Decision, &[DECISION_STEP])?;

    sheet.core(PARAMETER_SOURCE, ParameterSource::Fixed, &[FIXED_PARAMETERS])?;
    sheet.core(
        PARAMETER_SOURCE,
        ParameterSource::FromExecution,
        &[EXECUTION_PARAMETERS],
    )?;
    Ok(())
}

fn rules(column: &str) -> Option<RuleSpec> {
    use ValidationRuleDescriptor as V;

    let spec = match column {
        "workflow_id" | "workflow_name" | "parameter_name" | "parameter_value" => {
            RuleSpec::text(255)
        }
        "decision_criterion" => RuleSpec::text(1000),
        "step_number" | "next_step_if_true" | "next_step_if_false" => {
            RuleSpec::fixed(V::integer(1, 1000))
        }
        STEP_TYPE => RuleSpec::Choices(all_choices::<StepType>),
        PARAMETER_SOURCE => RuleSpec::Choices(all_choices::<ParameterSource>),
        "step_process_id" => RuleSpec::distinct(SheetKind::Process, &["process_id"]),
        "step_workflow_id" => RuleSpec::distinct(SheetKind::Workflow, &["workflow_id"]),
        "step_input" => RuleSpec::concept_ids(ConceptType::Material),
        _ => return None,
    };
    Some(spec)
}
