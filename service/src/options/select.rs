//! Row filters producing dropdown option strings

use sheetmeta_core::table::{COMPOSITE_SEPARATOR, Table};
use std::collections::HashSet;
use tracing::warn;

/// Output columns and match polarity of a filtered selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions {
    /// Columns joined per row with the composite separator
    pub source_columns: Vec<String>,
    /// Keep matching rows (`true`) or their complement (`false`)
    pub equals: bool,
}

impl SelectOptions {
    pub fn new<S: AsRef<str>>(source_columns: &[S], equals: bool) -> Self {
        Self {
            source_columns: source_columns.iter().map(|c| c.as_ref().to_string()).collect(),
            equals,
        }
    }

    /// Keep rows whose filter column matches
    pub fn matching<S: AsRef<str>>(source_columns: &[S]) -> Self {
        Self::new(source_columns, true)
    }
}

/// `SELECT source_columns FROM table WHERE filter_column = filter_value`
///
/// With `equals == false` the complement is returned. A missing filter or
/// source column yields an empty list.
pub fn select_where(
    filter_column: &str,
    filter_value: &str,
    table: &Table,
    options: &SelectOptions,
) -> Vec<String> {
    if !table.has_column(filter_column) || !has_columns(table, &options.source_columns) {
        warn!(filter_column, sources = ?options.source_columns, "option source column missing");
        return Vec::new();
    }

    (0..table.len())
        .filter(|&row| (table.value(row, filter_column) == filter_value) == options.equals)
        .filter_map(|row| join_row(table, row, &options.source_columns))
        .collect()
}

/// One joined string per row, without filtering or de-duplication
pub fn select_distinct_no_filter<S: AsRef<str>>(source_columns: &[S], table: &Table) -> Vec<String> {
    let columns: Vec<String> = source_columns.iter().map(|c| c.as_ref().to_string()).collect();
    if !has_columns(table, &columns) {
        warn!(sources = ?columns, "option source column missing");
        return Vec::new();
    }
    (0..table.len())
        .filter_map(|row| join_row(table, row, &columns))
        .collect()
}

/// Keep options that start (or, with `matches == false`, do not start)
/// with `prefix`
pub fn filter_list_by_starts_with(prefix: &str, options: &[String], matches: bool) -> Vec<String> {
    options
        .iter()
        .filter(|option| option.starts_with(prefix) == matches)
        .cloned()
        .collect()
}

/// Drop blank options and repeated values, first occurrence wins
pub fn normalize_options(options: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|option| !is_blank_option(option))
        .filter(|option| seen.insert(option.clone()))
        .collect()
}

fn is_blank_option(option: &str) -> bool {
    option.split(COMPOSITE_SEPARATOR).all(|part| part.trim().is_empty())
}

fn has_columns(table: &Table, columns: &[String]) -> bool {
    !columns.is_empty() && columns.iter().all(|c| table.has_column(c))
}

fn join_row(table: &Table, row: usize, columns: &[String]) -> Option<String> {
    let parts: Vec<&str> = columns.iter().map(String::as_str).collect();
    sheetmeta_core::table::join_columns(table, row, &parts)
}
