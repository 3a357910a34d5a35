//! End-to-end edit handling against an in-memory host

use pretty_assertions::assert_eq;
use sheetmeta_core::prelude::*;
use sheetmeta_service::minitable::{MiniTableOutcome, MiniTableTracker};
use sheetmeta_service::sheets::{GROUP_HEADER_COLUMN, GROUP_ID_COLUMN};
use sheetmeta_service::{CellEdit, SheetMetaService};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Hide(String),
    Show(String),
    Rule(String, String),
    Write(usize, String, String),
}

#[derive(Debug, Default)]
struct MockHost {
    tables: BTreeMap<SheetKind, Table>,
    visible: BTreeSet<String>,
    events: Vec<Event>,
}

impl MockHost {
    fn with_table(sheet: SheetKind, table: Table) -> Self {
        let mut host = Self::default();
        host.tables.insert(sheet, table);
        host
    }

    /// Mirror a user edit, as the host does before notifying the service
    fn type_value(&mut self, sheet: SheetKind, row: usize, column: &str, value: &str) -> CellEdit {
        if let Some(table) = self.tables.get_mut(&sheet) {
            table.set_cell(row, column, value).expect("row exists");
        }
        CellEdit::new(sheet, row, column, value)
    }

    fn writes(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| matches!(e, Event::Write(..))).collect()
    }
}

impl TableSource for MockHost {
    fn table(&self, sheet: SheetKind) -> Option<Table> {
        self.tables.get(&sheet).cloned()
    }
}

impl VisibilitySink for MockHost {
    fn apply_visibility(&mut self, _sheet: SheetKind, show: &BTreeSet<String>, hide: &BTreeSet<String>) {
        for column in hide {
            self.visible.remove(column);
            self.events.push(Event::Hide(column.clone()));
        }
        for column in show {
            self.visible.insert(column.clone());
            self.events.push(Event::Show(column.clone()));
        }
    }
}

impl ValidationSink for MockHost {
    fn apply_validation_rule(&mut self, _sheet: SheetKind, column: &str, descriptor: &ValidationRuleDescriptor) {
        assert!(!descriptor.is_none(), "None rules must not reach the host");
        self.events.push(Event::Rule(column.to_string(), descriptor.kind().to_string()));
    }
}

impl CellSink for MockHost {
    fn write_cell(&mut self, sheet: SheetKind, row: usize, column: &str, value: &str) {
        if let Some(table) = self.tables.get_mut(&sheet) {
            table.set_cell(row, column, value).expect("row exists");
        }
        self.events.push(Event::Write(row, column.to_string(), value.to_string()));
    }
}

fn service() -> SheetMetaService {
    SheetMetaService::new(SheetMetaConfig::default())
        .expect("default config is valid")
        .with_tracker(MiniTableTracker::with_id_source(|| "group-1".to_string()))
}

fn concepts() -> Table {
    Table::from_records(
        &[GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, "concept_id", "concept_type", "material_type", "component_cas"],
        &[&["", "", "MED", "material", "", ""], &["", "", "", "", "", ""]],
    )
}

#[test]
fn test_discriminator_edit_hides_then_shows() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut host = MockHost::with_table(SheetKind::Concept, concepts());
    host.visible.insert("email".to_string());

    let edit = host.type_value(SheetKind::Concept, 0, "material_type", "culture medium");
    let outcome = service.handle_edit(&ctx, &mut host, &edit).expect("edit handled");

    assert!(outcome.visibility.to_show.contains("component_cas"));
    assert!(host.visible.contains("component_cas"));
    assert!(host.visible.contains("has_fixed_pH"));
    assert!(host.visible.contains("email"));
    assert!(!host.visible.contains("species"));

    let first_show = host.events.iter().position(|e| matches!(e, Event::Show(_)));
    let last_hide = host.events.iter().rposition(|e| matches!(e, Event::Hide(_)));
    assert!(last_hide < first_show);
}

#[test]
fn test_second_component_writes_group_cells() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut table = concepts();
    table.set_cell(0, "material_type", "culture medium").expect("row exists");
    table.set_cell(0, "component_cas", "50-99-7").expect("row exists");
    let mut host = MockHost::with_table(SheetKind::Concept, table);

    let edit = host.type_value(SheetKind::Concept, 1, "component_cas", "7647-14-5");
    let outcome = service.handle_edit(&ctx, &mut host, &edit).expect("edit handled");

    assert!(outcome.visibility.is_empty());
    assert_eq!(
        outcome.mini_table,
        Some(MiniTableOutcome::Started {
            group_id: "group-1".to_string(),
            header_row: 0,
            member_row: 1,
        })
    );
    assert_eq!(
        host.writes(),
        vec![
            &Event::Write(0, GROUP_ID_COLUMN.to_string(), "group-1".to_string()),
            &Event::Write(0, GROUP_HEADER_COLUMN.to_string(), "TRUE".to_string()),
            &Event::Write(1, GROUP_ID_COLUMN.to_string(), "group-1".to_string()),
            &Event::Write(1, GROUP_HEADER_COLUMN.to_string(), "FALSE".to_string()),
        ]
    );
    let table = &host.tables[&SheetKind::Concept];
    assert_eq!(table.value(1, GROUP_ID_COLUMN), "group-1");
}

#[test]
fn test_type_change_inside_group_shows_nothing() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut table = concepts();
    table.set_cell(0, "material_type", "culture medium").expect("row exists");
    table.set_cell(0, GROUP_ID_COLUMN, "group-1").expect("row exists");
    table.set_cell(0, GROUP_HEADER_COLUMN, "TRUE").expect("row exists");
    table.set_cell(1, GROUP_ID_COLUMN, "group-1").expect("row exists");
    table.set_cell(1, GROUP_HEADER_COLUMN, "FALSE").expect("row exists");
    let mut host = MockHost::with_table(SheetKind::Concept, table);

    let edit = host.type_value(SheetKind::Concept, 1, "concept_type", "person");
    let outcome = service.handle_edit(&ctx, &mut host, &edit).expect("edit handled");

    assert_eq!(
        outcome.mini_table,
        Some(MiniTableOutcome::Rejected {
            row: 1,
            column: "concept_type".to_string(),
        })
    );
    assert!(outcome.visibility.is_empty());
    assert!(!host.visible.contains("email"));
    assert!(
        !host
            .events
            .iter()
            .any(|e| matches!(e, Event::Show(_) | Event::Hide(_)))
    );
    assert_eq!(
        host.writes(),
        vec![&Event::Write(1, "concept_type".to_string(), String::new())]
    );
    assert_eq!(host.tables[&SheetKind::Concept].value(1, "concept_type"), "");
}

#[test]
fn test_edit_on_missing_sheet_uses_layout() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut host = MockHost::default();

    let edit = CellEdit::new(SheetKind::Concept, 3, "concept_type", "person");
    let outcome = service.handle_edit(&ctx, &mut host, &edit).expect("edit handled");
    assert!(outcome.visibility.to_show.contains("email"));
    assert_eq!(outcome.mini_table, Some(MiniTableOutcome::Ungrouped));
    assert!(host.writes().is_empty());
}

#[test]
fn test_edits_beyond_working_rows_ignored() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut host = MockHost::with_table(SheetKind::Concept, concepts());

    let edit = CellEdit::new(SheetKind::Concept, 50, "concept_type", "person");
    let outcome = service.handle_edit(&ctx, &mut host, &edit).expect("edit handled");
    assert!(outcome.visibility.is_empty());
    assert!(outcome.mini_table.is_none());
    assert!(host.events.is_empty());
}

#[test]
fn test_revalidation_skips_columns_without_rules() {
    let service = service();
    let ctx = service.context().expect("context");
    let mut host = MockHost::with_table(SheetKind::Concept, concepts());

    let none = service.revalidate_column(&ctx, &mut host, SheetKind::Concept, "favourite_colour");
    assert!(none.is_none());
    assert!(host.events.is_empty());

    let applied = service.revalidate_sheet(&ctx, &mut host, SheetKind::Concept);
    assert_eq!(applied, 4);
    assert_eq!(
        host.events,
        vec![
            Event::Rule("concept_id".to_string(), "text".to_string()),
            Event::Rule("concept_type".to_string(), "list_inline".to_string()),
            Event::Rule("material_type".to_string(), "list_inline".to_string()),
            Event::Rule("component_cas".to_string(), "text".to_string()),
        ]
    );
}

#[test]
fn test_registries_are_cached_per_context() {
    let service = service();
    let core = service.registry(&ResolutionContext::default()).expect("core registry");
    let again = service.registry(&ResolutionContext::default()).expect("core registry");
    assert!(std::sync::Arc::ptr_eq(&core, &again));
}
