//! Mini-table grouping driven by resolved attribute requirements

use pretty_assertions::assert_eq;
use sheetmeta_core::prelude::*;
use sheetmeta_service::minitable::{MiniTableOutcome, MiniTableTracker, groups};
use sheetmeta_service::registry::EntityObjectRegistry;
use sheetmeta_service::sheets::{GROUP_HEADER_COLUMN, GROUP_ID_COLUMN, schema};
use sheetmeta_service::visibility::{RowContext, VisibilityResolver};
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting_tracker() -> MiniTableTracker {
    let counter = AtomicUsize::new(0);
    MiniTableTracker::with_id_source(move || format!("g{}", counter.fetch_add(1, Ordering::SeqCst)))
}

fn enter(
    tracker: &MiniTableTracker,
    resolver: &VisibilityResolver<'_>,
    sheet: SheetKind,
    table: &mut Table,
    row: usize,
    column: &str,
    value: &str,
) -> MiniTableOutcome {
    table.set_cell(row, column, value).expect("row exists");
    let requirement = resolver.attribute_requirement(sheet, column, RowContext::new(table, row));
    tracker
        .record_entry(schema(sheet), table, row, column, requirement.as_ref())
        .expect("row exists")
}

#[test]
fn test_components_share_one_group() {
    let registry = EntityObjectRegistry::build(&ResolutionContext::default()).expect("registry");
    let resolver = VisibilityResolver::new(&registry);
    let tracker = counting_tracker();
    let components = ["50-99-7", "7647-14-5", "7758-98-7", "7447-40-7"];

    let mut table = Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "concept_id", "concept_type", "material_type", "component_cas"],
        &[&["", "", "MED", "material", "culture medium", components[0]]],
    );
    for _ in 1..components.len() {
        table.push_row(&[("concept_id", "")]);
    }

    for (row, cas) in components.iter().enumerate().skip(1) {
        let outcome = enter(&tracker, &resolver, SheetKind::Concept, &mut table, row, "component_cas", cas);
        assert!(!matches!(outcome, MiniTableOutcome::Ungrouped | MiniTableOutcome::Rejected { .. }));
    }

    let ids: Vec<&str> = (0..table.len()).map(|r| table.value(r, GROUP_ID_COLUMN)).collect();
    assert!(ids.iter().all(|id| *id == "g0"));
    let headers = (0..table.len())
        .filter(|r| table.value(*r, GROUP_HEADER_COLUMN) == "TRUE")
        .count();
    assert_eq!(headers, 1);
    assert_eq!(table.value(0, GROUP_HEADER_COLUMN), "TRUE");

    let found = groups(&table);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rows(), vec![0, 1, 2, 3]);
}

#[test]
fn test_next_entity_starts_new_group() {
    let registry = EntityObjectRegistry::build(&ResolutionContext::default()).expect("registry");
    let resolver = VisibilityResolver::new(&registry);
    let tracker = counting_tracker();
    let mut table = Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "concept_id", "concept_type", "material_type", "component_cas"],
        &[
            &["", "", "MED1", "material", "culture medium", "50-99-7"],
            &["", "", "", "", "", ""],
            &["", "", "MED2", "material", "culture medium", "7647-14-5"],
            &["", "", "", "", "", ""],
        ],
    );

    enter(&tracker, &resolver, SheetKind::Concept, &mut table, 1, "component_cas", "7758-98-7");
    let second = enter(&tracker, &resolver, SheetKind::Concept, &mut table, 3, "component_cas", "7447-40-7");

    assert_eq!(
        second,
        MiniTableOutcome::Started {
            group_id: "g1".to_string(),
            header_row: 2,
            member_row: 3,
        }
    );
    assert_eq!(groups(&table).len(), 2);
}

#[test]
fn test_single_valued_entry_in_member_row_is_cleared() {
    let registry = EntityObjectRegistry::build(&ResolutionContext::default()).expect("registry");
    let resolver = VisibilityResolver::new(&registry);
    let tracker = counting_tracker();
    let mut table = Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "concept_id", "concept_type", "material_type", "component_cas", "catalog_number"],
        &[
            &["", "", "MED", "material", "culture medium", "50-99-7", "CAT-1"],
            &["", "", "", "", "", "", ""],
        ],
    );
    enter(&tracker, &resolver, SheetKind::Concept, &mut table, 1, "component_cas", "7647-14-5");

    let outcome = enter(&tracker, &resolver, SheetKind::Concept, &mut table, 1, "catalog_number", "CAT-2");
    assert_eq!(
        outcome,
        MiniTableOutcome::Rejected {
            row: 1,
            column: "catalog_number".to_string(),
        }
    );
    assert_eq!(table.value(1, "catalog_number"), "");
    assert_eq!(table.value(0, "catalog_number"), "CAT-1");
}

#[test]
fn test_workflow_steps_with_own_type_stay_separate() {
    let registry = EntityObjectRegistry::build(&ResolutionContext::default()).expect("registry");
    let resolver = VisibilityResolver::new(&registry);
    let tracker = counting_tracker();
    let mut table = Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "workflow_id", "step_type", "step_input"],
        &[
            &["", "", "W1", "process", "M1"],
            &["", "", "", "process", ""],
        ],
    );
    let outcome = enter(&tracker, &resolver, SheetKind::Workflow, &mut table, 1, "step_input", "M2");
    assert_eq!(outcome, MiniTableOutcome::Ungrouped);
    assert!(groups(&table).is_empty());
}

#[test]
fn test_decision_step_does_not_group_previous_parameters() {
    let registry = EntityObjectRegistry::build(&ResolutionContext::default()).expect("registry");
    let resolver = VisibilityResolver::new(&registry);
    let tracker = counting_tracker();
    let mut table = Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "workflow_id", "step_type", "parameter_source", "parameter_name"],
        &[
            &["", "", "W1", "process", "fixed", "speed"],
            &["", "", "", "decision", "", ""],
            &["", "", "", "", "", ""],
        ],
    );
    let outcome = enter(&tracker, &resolver, SheetKind::Workflow, &mut table, 2, "parameter_name", "x");
    assert_eq!(outcome, MiniTableOutcome::Ungrouped);
    assert!(groups(&table).is_empty());
}
