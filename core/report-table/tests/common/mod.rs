//! FILENAME: tests/common/mod.rs
//! Fixtures and helpers for report-table integration tests.

#![allow(dead_code)]

use report_data::ReportData;
use report_table::{Cell, Table, ZValueLayout};
use serde::Deserialize;

/// Layout recorded with a fixture.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureParams {
    pub n_extra_row_header_col: usize,
    pub n_extra_col_header_row: usize,
    pub row_header_scale: usize,
    pub col_header_scale: usize,
}

impl FixtureParams {
    pub fn layout(&self) -> ZValueLayout {
        ZValueLayout {
            n_extra_row_header_col: self.n_extra_row_header_col,
            n_extra_col_header_row: self.n_extra_col_header_row,
            row_header_scale: self.row_header_scale,
            col_header_scale: self.col_header_scale,
        }
    }
}

/// Label and spans of one cell, as recorded in a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanSummary {
    pub label: String,
    pub col_span: usize,
    pub row_span: usize,
}

/// A report together with the grids a correct builder produces for it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub params: FixtureParams,
    pub report: ReportData,
    /// Column header block, before placement.
    pub x_headers: Vec<Vec<SpanSummary>>,
    /// Row header block, before transposition.
    pub y_headers: Vec<Vec<SpanSummary>>,
    /// The dense grid drawn by `ascii_table`.
    pub table_structure: Vec<String>,
    /// The grid after covered cells are removed.
    pub spanned_cells: Vec<Vec<SpanSummary>>,
}

impl Fixture {
    pub fn load(name: &str) -> Fixture {
        let json = match name {
            "testcase01" => include_str!("../fixtures/testcase01.json"),
            "testcase02" => include_str!("../fixtures/testcase02.json"),
            "testcase03" => include_str!("../fixtures/testcase03.json"),
            other => panic!("unknown fixture: {}", other),
        };
        serde_json::from_str(json).expect("fixture should parse")
    }

    pub fn all() -> Vec<(&'static str, Fixture)> {
        ["testcase01", "testcase02", "testcase03"]
            .into_iter()
            .map(|name| (name, Fixture::load(name)))
            .collect()
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

pub fn summarize<D>(cells: &[Vec<Cell<D>>]) -> Vec<Vec<SpanSummary>> {
    cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| SpanSummary {
                    label: cell.label.to_string(),
                    col_span: cell.col_span,
                    row_span: cell.row_span,
                })
                .collect()
        })
        .collect()
}

/// Draws a dense table as text: one line per row, each column padded to
/// its widest label, framed top and bottom.
pub fn ascii_table<D>(table: &Table<D>) -> Vec<String> {
    let labels: Vec<Vec<String>> = table
        .cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.label.to_string()).collect())
        .collect();
    let ncols = labels.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..ncols)
        .map(|j| {
            labels
                .iter()
                .filter_map(|row| row.get(j))
                .map(|label| label.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines: Vec<String> = labels
        .iter()
        .map(|row| {
            let padded: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(label, &width)| format!("{:<width$}", label, width = width))
                .collect();
            format!("| {} |", padded.join(" | "))
        })
        .collect();

    let width = lines.first().map_or(2, |line| line.chars().count());
    let rule = "-".repeat(width.saturating_sub(2));
    lines.insert(0, format!(".{}.", rule));
    lines.push(format!("'{}'", rule));
    lines
}
