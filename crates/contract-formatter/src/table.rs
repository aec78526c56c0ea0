//! Pipe tables
//!
//! Rows are collected while lines keep containing `|`. Separator rows are
//! dropped, then the columns are trimmed to the range that holds any
//! content: generated contracts often pad tables with empty trailing (or
//! leading) columns.

use crate::node::Table;
use crate::patterns;

/// Index one past the last consecutive line containing `|`
pub fn block_end(lines: &[&str], start: usize) -> usize {
    lines[start..]
        .iter()
        .position(|line| !line.contains('|'))
        .map_or(lines.len(), |offset| start + offset)
}

/// Build a table from raw pipe rows.
///
/// Returns `None` when no cell holds any content.
pub fn parse_table(rows: &[&str]) -> Option<Table> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| !patterns::is_table_separator_row(row))
        .map(|row| split_row(row))
        .collect();

    let width = cells.iter().map(Vec::len).max()?;
    let filled = |col: usize| cells.iter().any(|row| row.get(col).is_some_and(|c| !c.is_empty()));
    let first = (0..width).find(|&col| filled(col))?;
    let last = (0..width).rev().find(|&col| filled(col))?;

    let mut trimmed = cells.into_iter().filter_map(|mut row| {
        row.resize(width, String::new());
        let row: Vec<String> = row.drain(first..=last).collect();
        row.iter().any(|c| !c.is_empty()).then_some(row)
    });

    let header = trimmed.next()?;
    Some(Table {
        header,
        rows: trimmed.collect(),
    })
}

fn split_row(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(|cell| cell.trim().to_string()).collect()
}
