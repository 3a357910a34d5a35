//! Show/hide sets for discriminator edits

use pretty_assertions::assert_eq;
use sheetmeta_core::prelude::*;
use sheetmeta_service::registry::EntityObjectRegistry;
use sheetmeta_service::visibility::{RowContext, VisibilityResolver};

const INTERNAL: &str = "Register internally generated material";

fn build(ctx: &ResolutionContext) -> EntityObjectRegistry {
    EntityObjectRegistry::build(ctx).expect("registry should compose")
}

#[test]
fn test_derived_lot_shows_action_and_registration_columns() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let lots = Table::from_records(
        &["lot_number", "action", "inhouse_material_registration_type"],
        &[&["L1", INTERNAL, "derived"]],
    );

    let change = resolver.compute_visibility(
        SheetKind::Material,
        "inhouse_material_registration_type",
        "derived",
        Some(RowContext::new(&lots, 0)),
    );

    for column in [
        "inhouse_material_registration_type",
        "lot_number",
        "catalog_number_inhouse_item",
        "parent_lot_number",
        "quantity",
    ] {
        assert!(change.to_show.contains(column), "{column} should be shown");
    }
    assert!(!change.to_show.contains("catalog_number_noninhouse_item"));
    assert!(!change.to_show.contains("component_lot_number"));
    assert!(change.to_hide_candidates.contains("component_lot_number"));
    assert!(!change.to_hide_candidates.contains("quantity"));
}

#[test]
fn test_external_action_shows_supplier_columns() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let change = resolver.compute_visibility(
        SheetKind::Material,
        "action",
        "Register externally sourced material",
        None,
    );
    assert!(change.to_show.contains("catalog_number_noninhouse_item"));
    assert!(change.to_show.contains("supplier_lot_number"));
    assert!(!change.to_show.contains("inhouse_material_registration_type"));
    assert!(change.to_hide_candidates.contains("inhouse_material_registration_type"));
}

#[test]
fn test_three_level_concept_chain() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let concepts = Table::from_records(
        &["concept_id", "concept_type", "material_type", "has_fixed_pH"],
        &[&["M1", "material", "culture medium", "TRUE"]],
    );

    let change = resolver.compute_visibility(
        SheetKind::Concept,
        "has_fixed_pH",
        "TRUE",
        Some(RowContext::new(&concepts, 0)),
    );

    for column in ["catalog_number", "component_common_name", "has_fixed_pH", "pH"] {
        assert!(change.to_show.contains(column), "{column} should be shown");
    }
    assert!(!change.to_show.contains("pH_range_min"));
    assert_eq!(
        change.to_hide_candidates.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["pH", "pH_range_max", "pH_range_min"]
    );
}

#[test]
fn test_flag_values_are_exact() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let concepts = Table::from_records(
        &["concept_id", "concept_type", "material_type", "has_fixed_pH"],
        &[&["M1", "material", "culture medium", "true"]],
    );

    let change = resolver.compute_visibility(
        SheetKind::Concept,
        "has_fixed_pH",
        "true",
        Some(RowContext::new(&concepts, 0)),
    );
    assert!(!change.to_show.contains("pH"));
    assert!(change.to_hide_candidates.contains("pH"));
}

#[test]
fn test_inactive_package_value_only_hides() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let change = resolver.compute_visibility(SheetKind::Concept, "material_type", "organism", None);
    assert!(change.to_show.is_empty());
    assert!(change.to_hide_candidates.contains("species"));

    let with_organisms = build(&ResolutionContext::default().with_package(Package::OrganismItems));
    let resolver = VisibilityResolver::new(&with_organisms);
    let change = resolver.compute_visibility(SheetKind::Concept, "material_type", "organism", None);
    assert!(change.to_show.contains("species"));
}

#[test]
fn test_unknown_value_shows_nothing() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let change = resolver.compute_visibility(SheetKind::Concept, "concept_type", "spaceship", None);
    assert!(change.to_show.is_empty());
    assert!(!change.to_hide_candidates.is_empty());
}

#[test]
fn test_workflow_continuation_uses_row_above() {
    let registry = build(&ResolutionContext::default());
    let resolver = VisibilityResolver::new(&registry);
    let steps = Table::from_records(
        &["workflow_id", "step_type", "parameter_source"],
        &[&["W1", "process", ""], &["", "", "fixed"]],
    );

    let change = resolver.compute_visibility(
        SheetKind::Workflow,
        "parameter_source",
        "fixed",
        Some(RowContext::new(&steps, 1)),
    );
    let without_row =
        resolver.compute_visibility(SheetKind::Workflow, "parameter_source", "fixed", None);

    assert!(change.to_show.contains("step_process_id"));
    assert!(!without_row.to_show.contains("step_process_id"));
    assert!(change.to_show.is_superset(&without_row.to_show));
}
