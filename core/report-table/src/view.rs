//! FILENAME: core/report-table/src/view.rs
//! Report Table View - Renderable output for a renderer.
//!
//! A `Table` is a dense grid of `Cell`s while it is being built and
//! decorated, and a ragged grid after `fix_spanning` has removed every cell
//! covered by another cell's span. Cells remember their original
//! coordinates in `row`/`col`, so lookups after span-fixing go through
//! `find_cell` rather than positional indexing.

use crate::definition::{SortOrder, ZValueLayout};
use crate::impute::CellStats;
use report_data::AttrValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a data cell that received no data points.
pub const PLACEHOLDER_LABEL: &str = "-";

/// Label of a cell whose values cannot be summarized.
pub const MIXED_LABEL: &str = "can't render mixed-typed or multi non-numeric values";

// ============================================================================
// CELL LABELS AND HIGHLIGHTS
// ============================================================================

/// What a cell displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellLabel {
    Empty,
    Text(String),
    /// An index value, kept typed.
    Value(AttrValue),
    /// Data cell without data points.
    Placeholder,
    /// Values that are neither all numeric nor a single value.
    Mixed,
    /// A header that can be clicked to sort, with its current order.
    Sortable {
        label: Box<CellLabel>,
        order: Option<SortOrder>,
    },
}

impl CellLabel {
    pub fn text(s: impl Into<String>) -> Self {
        CellLabel::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellLabel::Empty => true,
            CellLabel::Text(s) => s.is_empty(),
            CellLabel::Sortable { label, .. } => label.is_empty(),
            _ => false,
        }
    }
}

impl Default for CellLabel {
    fn default() -> Self {
        CellLabel::Empty
    }
}

impl fmt::Display for CellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellLabel::Empty => Ok(()),
            CellLabel::Text(s) => f.write_str(s),
            CellLabel::Value(v) => write!(f, "{}", v),
            CellLabel::Placeholder => f.write_str(PLACEHOLDER_LABEL),
            CellLabel::Mixed => f.write_str(MIXED_LABEL),
            CellLabel::Sortable { label, .. } => write!(f, "{}", label),
        }
    }
}

impl From<&str> for CellLabel {
    fn from(value: &str) -> Self {
        CellLabel::Text(value.to_string())
    }
}

impl From<String> for CellLabel {
    fn from(value: String) -> Self {
        CellLabel::Text(value)
    }
}

/// How a highlight color is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightStyle {
    /// A colored marker next to the value.
    Dot,
    /// Colored text.
    Text,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        HighlightStyle::Dot
    }
}

/// Visual emphasis assigned by a highlight pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellHighlight {
    /// `#rrggbb`, lowercase.
    pub color: Option<String>,
    pub bold: bool,
    pub style: HighlightStyle,
}

// ============================================================================
// CELL
// ============================================================================

/// A single cell of a report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell<D> {
    /// Original row coordinate. Survives span-fixing and sorting.
    pub row: usize,
    /// Original column coordinate.
    pub col: usize,

    pub label: CellLabel,

    pub row_span: usize,
    pub col_span: usize,

    /// Header cell.
    pub th: bool,
    /// Header that names a dimension rather than a value of it.
    pub meta_th: bool,

    /// Payload: the data points (pivot report) or records (auto table).
    pub data: D,

    /// Summary of the values the label was computed from.
    pub stats: Option<CellStats>,

    /// Numeric value used by highlighting.
    pub highlight_value: Option<f64>,

    pub highlight: Option<CellHighlight>,
}

impl<D: Default> Cell<D> {
    /// Creates a blank, non-header 1x1 cell.
    pub fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            label: CellLabel::Empty,
            row_span: 1,
            col_span: 1,
            th: false,
            meta_th: false,
            data: D::default(),
            stats: None,
            highlight_value: None,
            highlight: None,
        }
    }

    /// Creates an empty header cell.
    pub fn header(row: usize, col: usize) -> Self {
        Cell {
            th: true,
            ..Cell::new(row, col)
        }
    }

    /// Creates an empty meta header cell.
    pub fn meta_header(row: usize, col: usize) -> Self {
        Cell {
            th: true,
            meta_th: true,
            ..Cell::new(row, col)
        }
    }
}

impl<D> Cell<D> {
    pub fn with_label(mut self, label: impl Into<CellLabel>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_row_span(mut self, span: usize) -> Self {
        self.row_span = span;
        self
    }

    pub fn with_col_span(mut self, span: usize) -> Self {
        self.col_span = span;
        self
    }

    /// Moves the cell to new coordinates.
    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.row = row;
        self.col = col;
        self
    }

    /// True when the cell covers more than itself.
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Region and stride of the cells a highlight pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub rowstart: usize,
    /// Exclusive. `None` means the last row.
    pub rowend: Option<usize>,
    pub rowstep: usize,
    pub colstart: usize,
    /// Exclusive. `None` means the last column.
    pub colend: Option<usize>,
    pub colstep: usize,
}

impl HighlightRange {
    pub fn new(rowstart: usize, colstart: usize) -> Self {
        HighlightRange {
            rowstart,
            rowend: None,
            rowstep: 1,
            colstart,
            colend: None,
            colstep: 1,
        }
    }

    pub fn with_steps(mut self, rowstep: usize, colstep: usize) -> Self {
        self.rowstep = rowstep.max(1);
        self.colstep = colstep.max(1);
        self
    }
}

/// Direction along which cells are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupAxis {
    /// Cells of one physical row.
    Row,
    /// Cells of one physical column.
    Column,
}

/// A set of cells compared with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGroup {
    /// The physical row (row axis) or column (column axis).
    pub line: usize,
    /// Offset inside a logical cell: cells of different lanes belong to
    /// different metrics and are never compared.
    pub lane: usize,
    /// `(row, col)` positions in the grid.
    pub cells: Vec<(usize, usize)>,
}

// ============================================================================
// TABLE
// ============================================================================

/// A report table: column headers on top, row headers on the left, data in
/// `[rowstart, nrows) x [colstart, ncols)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<D> {
    /// Cells by row. Dense until `fix_spanning` is applied.
    pub cells: Vec<Vec<Cell<D>>>,
    pub nrows: usize,
    pub ncols: usize,
    /// First data row.
    pub rowstart: usize,
    /// First data column.
    pub colstart: usize,
    pub n_extra_row_header_col: usize,
    pub n_extra_col_header_row: usize,
    pub row_header_scale: usize,
    pub col_header_scale: usize,
    /// Set once covered cells have been removed.
    #[serde(default)]
    pub spanning_fixed: bool,
}

impl<D> Table<D> {
    /// Wraps a dense grid.
    pub fn new(cells: Vec<Vec<Cell<D>>>, rowstart: usize, colstart: usize, layout: ZValueLayout) -> Self {
        let nrows = cells.len();
        let ncols = cells.first().map_or(0, Vec::len);
        Table {
            cells,
            nrows,
            ncols,
            rowstart,
            colstart,
            n_extra_row_header_col: layout.n_extra_row_header_col,
            n_extra_col_header_row: layout.n_extra_col_header_row,
            row_header_scale: layout.row_header_scale,
            col_header_scale: layout.col_header_scale,
            spanning_fixed: false,
        }
    }

    pub fn layout(&self) -> ZValueLayout {
        ZValueLayout {
            n_extra_row_header_col: self.n_extra_row_header_col,
            n_extra_col_header_row: self.n_extra_col_header_row,
            row_header_scale: self.row_header_scale,
            col_header_scale: self.col_header_scale,
        }
    }

    /// Cell at a grid position.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell<D>> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell<D>> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Cell by its original coordinates. Works after span-fixing and
    /// sorting.
    pub fn find_cell(&self, row: usize, col: usize) -> Option<&Cell<D>> {
        if !self.spanning_fixed {
            if let Some(cell) = self.get(row, col) {
                if cell.row == row && cell.col == col {
                    return Some(cell);
                }
            }
        }
        self.cells
            .iter()
            .flat_map(|r| r.iter())
            .find(|c| c.row == row && c.col == col)
    }

    pub fn clear_highlights(&mut self) {
        for cell in self.cells.iter_mut().flat_map(|r| r.iter_mut()) {
            cell.highlight = None;
        }
    }

    /// Removes every cell covered by another cell's span so that each row
    /// holds exactly the cells a renderer must emit.
    ///
    /// Spans are processed bottom-right first; a span reaching past the
    /// grid edge is clipped. Calling this on an already fixed table does
    /// nothing.
    pub fn fix_spanning(mut self) -> Self {
        if self.spanning_fixed || self.cells.is_empty() {
            self.spanning_fixed = true;
            return self;
        }

        let mut keep: Vec<Vec<bool>> = self.cells.iter().map(|r| vec![true; r.len()]).collect();
        for i in (0..self.cells.len()).rev() {
            for j in (0..self.cells[i].len()).rev() {
                let cell = &self.cells[i][j];
                if !cell.is_spanning() {
                    continue;
                }
                for u in 0..cell.row_span.max(1) {
                    let Some(flags) = keep.get_mut(i + u) else {
                        break;
                    };
                    for v in 0..cell.col_span.max(1) {
                        if let Some(flag) = flags.get_mut(j + v) {
                            *flag = false;
                        }
                    }
                }
                keep[i][j] = true;
            }
        }

        for (row, flags) in self.cells.iter_mut().zip(&keep) {
            let mut flags = flags.iter();
            row.retain(|_| flags.next().copied().unwrap_or(true));
        }
        self.spanning_fixed = true;
        self
    }

    /// Splits the range into groups of comparable cells.
    ///
    /// Along `GroupAxis::Row` each physical row of the range yields
    /// `colstep` groups, one per lane; along `GroupAxis::Column` each
    /// physical column yields `rowstep` groups.
    pub fn grouping(&self, axis: GroupAxis, range: &HighlightRange) -> Vec<CellGroup> {
        let rowend = range.rowend.unwrap_or(self.nrows).min(self.nrows);
        let colend = range.colend.unwrap_or(self.ncols).min(self.ncols);
        let rowstep = range.rowstep.max(1);
        let colstep = range.colstep.max(1);

        let mut groups = Vec::new();
        match axis {
            GroupAxis::Row => {
                for i in range.rowstart..rowend {
                    for lane in 0..colstep {
                        let cells: Vec<(usize, usize)> = (range.colstart + lane..colend)
                            .step_by(colstep)
                            .filter(|&j| self.get(i, j).is_some())
                            .map(|j| (i, j))
                            .collect();
                        if !cells.is_empty() {
                            groups.push(CellGroup { line: i, lane, cells });
                        }
                    }
                }
            }
            GroupAxis::Column => {
                for j in range.colstart..colend {
                    for lane in 0..rowstep {
                        let cells: Vec<(usize, usize)> = (range.rowstart + lane..rowend)
                            .step_by(rowstep)
                            .filter(|&i| self.get(i, j).is_some())
                            .map(|i| (i, j))
                            .collect();
                        if !cells.is_empty() {
                            groups.push(CellGroup { line: j, lane, cells });
                        }
                    }
                }
            }
        }
        groups
    }
}
