//! Sheet schemas
//!
//! One schema per sheet kind: its key column, its discriminator columns with
//! their parent links, the subtype columns each discriminator may hide, the
//! entity registrations and the per-column rule table.

pub mod concept;
pub mod execution;
pub mod material;
pub mod process;
pub mod workflow;

use sheetmeta_core::error::Result;
use sheetmeta_core::table::Table;
use sheetmeta_core::types::SheetKind;
use std::collections::BTreeSet;

use crate::registry::SheetRegistrar;
use crate::rules::spec::RuleSpec;

/// First column of every sheet: the mini-table group id
pub const GROUP_ID_COLUMN: &str = "mini_table_id";

/// Second column of every sheet: `TRUE` on a group's header row
pub const GROUP_HEADER_COLUMN: &str = "mini_table_header";

/// A column whose value selects attribute sets
#[derive(Debug, Clone, Copy)]
pub struct DiscriminatorColumn {
    pub name: &'static str,
    /// Discriminator this one refines
    pub parent: Option<&'static str>,
    /// Columns that may belong to any value of this discriminator or its
    /// descendants
    pub hides: &'static [&'static [&'static str]],
}

/// Static description of one sheet
#[derive(Debug)]
pub struct SheetSchema {
    pub kind: SheetKind,
    pub key_column: &'static str,
    /// Columns shown regardless of discriminator values
    pub base_columns: &'static [&'static str],
    /// Continuation rows inherit blank discriminators from the row above
    pub row_scoped: bool,
    pub discriminators: &'static [DiscriminatorColumn],
    register: fn(&mut SheetRegistrar<'_, '_>) -> Result<()>,
    rules: fn(&str) -> Option<RuleSpec>,
}

impl SheetSchema {
    /// Register this sheet's entities
    ///
    /// # Errors
    ///
    /// Propagates composition and duplicate-key errors.
    pub fn register(&self, registrar: &mut SheetRegistrar<'_, '_>) -> Result<()> {
        (self.register)(registrar)
    }

    /// Rule specification of a column, `None` for unknown columns
    pub fn rule(&self, column: &str) -> Option<RuleSpec> {
        (self.rules)(column)
    }

    pub fn discriminator(&self, column: &str) -> Option<&DiscriminatorColumn> {
        self.discriminators.iter().find(|d| d.name == column)
    }

    pub fn is_discriminator(&self, column: &str) -> bool {
        self.discriminator(column).is_some()
    }

    /// Ancestor discriminators of `column`, root first
    pub fn ancestors(&self, column: &str) -> Vec<&'static str> {
        let mut chain = Vec::new();
        let mut current = self.discriminator(column).and_then(|d| d.parent);
        while let Some(name) = current {
            if chain.contains(&name) || chain.len() > self.discriminators.len() {
                break;
            }
            chain.push(name);
            current = self.discriminator(name).and_then(|d| d.parent);
        }
        chain.reverse();
        chain
    }

    /// Columns to hide before showing a new value's attributes
    pub fn hide_candidates(&self, column: &str) -> BTreeSet<String> {
        self.discriminator(column)
            .map(|d| {
                d.hides
                    .iter()
                    .flat_map(|group| group.iter())
                    .map(|c| (*c).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Leading columns of the sheet layout
    pub fn layout_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![GROUP_ID_COLUMN, GROUP_HEADER_COLUMN, self.key_column];
        columns.extend(
            self.base_columns
                .iter()
                .copied()
                .filter(|c| *c != self.key_column),
        );
        columns
    }

    /// Whether a row continues the entity above it: key and discriminators
    /// are all blank
    pub fn is_continuation_row(&self, table: &Table, row: usize) -> bool {
        table.is_blank(row, self.key_column)
            && self
                .discriminators
                .iter()
                .all(|d| table.is_blank(row, d.name))
    }

    /// Whether a column is mini-table bookkeeping
    pub fn is_bookkeeping(column: &str) -> bool {
        column == GROUP_ID_COLUMN || column == GROUP_HEADER_COLUMN
    }
}

/// Schema of a sheet kind
pub fn schema(kind: SheetKind) -> &'static SheetSchema {
    match kind {
        SheetKind::Concept => &concept::SCHEMA,
        SheetKind::Material => &material::SCHEMA,
        SheetKind::Process => &process::SCHEMA,
        SheetKind::Workflow => &workflow::SCHEMA,
        SheetKind::Execution => &execution::SCHEMA,
    }
}

/// Columns of the pH fragments
pub const PH_COLUMNS: &[&str] = &["pH", "pH_range_min", "pH_range_max"];
