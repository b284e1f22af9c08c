//! FILENAME: core/report-table/src/engine.rs
//! Report Engine - Turns a pivot report into a renderable table.
//!
//! This module takes a `ReportData` (data points + x/y index forests) and a
//! `ZValueLayout` and produces a `ReportTable`.
//!
//! Algorithm:
//! 1. Map every leaf of each index forest to its logical offset
//! 2. Build the column header block from the x forest (on top)
//! 3. Build the row header block from the y forest and transpose it (left)
//! 4. Assemble the grid: headers, header corner, blank data cells
//! 5. Route every data point to the anchor cell of its logical (y, x) cell

use crate::definition::{HighlightMode, RenderOptions, ZValueLayout, ZValueStyle};
use crate::error::{Result, TableError};
use crate::header::{build_index_header, transpose_header, HeaderGrid};
use crate::highlight::highlight_report;
use crate::impute::impute_cell_data;
use crate::view::{Cell, Table};
use log::{debug, warn};
use report_data::{Index, IndexElement, ReportData, ReportDataPoint};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell of a pivot report table: carries the data points routed to it.
pub type ReportCell = Cell<Vec<ReportDataPoint>>;

/// A pivot report table.
pub type ReportTable = Table<Vec<ReportDataPoint>>;

/// Index element key -> logical offset along one axis.
pub type IndexMap = FxHashMap<String, usize>;

/// The two pivot axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Columns.
    X,
    /// Rows.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Maps every leaf of a forest to its offset: depth-first, insertion order,
/// later trees continuing after earlier ones.
pub fn build_index_map(indices: &[Index]) -> IndexMap {
    let mut map = IndexMap::default();
    let mut offset = 0;
    for index in indices {
        for element in index.leaf_elements() {
            map.insert(element.key(), offset);
            offset += 1;
        }
    }
    map
}

// ============================================================================
// TABLE BUILDER
// ============================================================================

/// Builds the dense grid of a pivot report.
pub struct TableBuilder<'a> {
    data: &'a ReportData,

    /// Column offsets of x leaves.
    x_index_map: IndexMap,

    /// Row offsets of y leaves.
    y_index_map: IndexMap,
}

impl<'a> TableBuilder<'a> {
    pub fn new(data: &'a ReportData) -> Self {
        TableBuilder {
            data,
            x_index_map: build_index_map(&data.x_index),
            y_index_map: build_index_map(&data.y_index),
        }
    }

    pub fn data(&self) -> &ReportData {
        self.data
    }

    pub fn index_map(&self, axis: Axis) -> &IndexMap {
        match axis {
            Axis::X => &self.x_index_map,
            Axis::Y => &self.y_index_map,
        }
    }

    /// Horizontal header block of one axis, before placement.
    pub fn build_header(&self, axis: Axis, scale: usize) -> HeaderGrid<Vec<ReportDataPoint>> {
        match axis {
            Axis::X => build_index_header(&self.data.x_index, scale),
            Axis::Y => build_index_header(&self.data.y_index, scale),
        }
    }

    /// Assembles the grid and routes the data points into it.
    ///
    /// Fails with `TableError::UnknownIndexElement` when a data point's x or
    /// y coordinate is not a leaf of the corresponding index.
    pub fn build(&self, layout: &ZValueLayout) -> Result<ReportTable> {
        let row_scale = layout.row_header_scale.max(1);
        let col_scale = layout.col_header_scale.max(1);

        let col_headers = self.build_header(Axis::X, col_scale);
        let row_headers = transpose_header(&self.build_header(Axis::Y, row_scale));

        let col_header_rows = col_headers.len();
        let row_header_cols = row_headers.first().map_or(0, Vec::len);
        let rowstart = col_header_rows + layout.n_extra_col_header_row;
        let colstart = row_header_cols + layout.n_extra_row_header_col;
        let nrows = rowstart + row_headers.len();
        let ncols = colstart + col_headers.first().map_or(0, Vec::len);

        let mut col_headers = into_slots(col_headers);
        let mut row_headers = into_slots(row_headers);

        let mut cells: Vec<Vec<ReportCell>> = Vec::with_capacity(nrows);
        for i in 0..nrows {
            let mut row = Vec::with_capacity(ncols);
            for j in 0..ncols {
                let header = if i < col_header_rows && j >= colstart {
                    take_slot(&mut col_headers, i, j - colstart)
                } else if i >= rowstart && j < row_header_cols {
                    take_slot(&mut row_headers, i - rowstart, j)
                } else {
                    None
                };
                let cell = match header {
                    Some(cell) => cell.at(i, j),
                    None => {
                        let mut cell = Cell::new(i, j);
                        cell.th = i < rowstart || j < colstart;
                        cell
                    }
                };
                row.push(cell);
            }
            cells.push(row);
        }

        for point in &self.data.data {
            let y = self.lookup(Axis::Y, &point.y)?;
            let x = self.lookup(Axis::X, &point.x)?;
            let i = y * row_scale + rowstart;
            let j = x * col_scale + colstart;
            if let Some(cell) = cells.get_mut(i).and_then(|r| r.get_mut(j)) {
                cell.data.push(point.clone());
            }
        }

        debug!(
            "Built report table {}x{} (rowstart={}, colstart={}, {} data points)",
            nrows,
            ncols,
            rowstart,
            colstart,
            self.data.data.len()
        );

        let layout = ZValueLayout {
            row_header_scale: row_scale,
            col_header_scale: col_scale,
            ..*layout
        };
        Ok(Table::new(cells, rowstart, colstart, layout))
    }

    fn lookup(&self, axis: Axis, element: &IndexElement) -> Result<usize> {
        let key = element.key();
        match self.index_map(axis).get(&key) {
            Some(&offset) => Ok(offset),
            None => {
                warn!("Cannot route data point: {} element '{}' is not an index leaf", axis, key);
                Err(TableError::UnknownIndexElement { axis, element: key })
            }
        }
    }
}

fn into_slots(grid: HeaderGrid<Vec<ReportDataPoint>>) -> Vec<Vec<Option<ReportCell>>> {
    grid.into_iter()
        .map(|row| row.into_iter().map(Some).collect())
        .collect()
}

fn take_slot(slots: &mut [Vec<Option<ReportCell>>], row: usize, col: usize) -> Option<ReportCell> {
    slots.get_mut(row).and_then(|r| r.get_mut(col)).and_then(Option::take)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Builds the base table of a report: grid, data points and cell labels.
///
/// The result is not span-fixed; it is the input of `apply_highlight`,
/// which can be re-run for every highlight mode without rebuilding.
pub fn render_report(data: &ReportData, options: &RenderOptions) -> Result<ReportTable> {
    let z_labels = data.z_labels();
    let layout = ZValueLayout::new(options.zvalue_style, z_labels.len());
    let mut table = TableBuilder::new(data).build(&layout)?;
    impute_cell_data(&mut table, &z_labels, options.zvalue_style);
    Ok(table)
}

/// Parses a report payload and builds its base table.
pub fn render_report_json(json: &str, options: &RenderOptions) -> Result<ReportTable> {
    let data = ReportData::from_json(json)?;
    render_report(&data, options)
}

/// Highlights a copy of the base table and removes covered cells, giving
/// the table a renderer emits.
pub fn apply_highlight(base: &ReportTable, mode: HighlightMode) -> ReportTable {
    highlight_report(base.clone(), mode).fix_spanning()
}

/// Layout a report would use for the given style.
pub fn report_layout(data: &ReportData, style: ZValueStyle) -> ZValueLayout {
    ZValueLayout::new(style, data.z_attributes().len())
}
