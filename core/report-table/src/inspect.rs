//! FILENAME: core/report-table/src/inspect.rs
//! Interaction helpers: what a cell is, what clicking it does, and what
//! data sits behind it.

use crate::definition::{HighlightMode, ZValueStyle};
use crate::engine::ReportTable;
use crate::impute::{zvalue_offset, NumericStats};
use crate::view::{Cell, Table};
use report_data::ReportDataPoint;
use serde::{Deserialize, Serialize};

// ============================================================================
// CELL ROLES
// ============================================================================

/// Styling role of a cell, from its original coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellRole {
    /// Top-left block above the row headers and left of the column headers.
    Corner,
    /// Column header naming a dimension.
    MetaColumnHeader,
    /// Column header in the row right above the data.
    LastColumnHeader,
    ColumnHeader,
    /// Row header naming a dimension.
    MetaRowHeader,
    RowHeader,
    Data,
}

pub fn cell_role<D>(table: &Table<D>, cell: &Cell<D>) -> CellRole {
    let in_col_headers = cell.row < table.rowstart;
    let in_row_headers = cell.col < table.colstart;
    match (in_col_headers, in_row_headers) {
        (true, true) => CellRole::Corner,
        (true, false) if cell.meta_th => CellRole::MetaColumnHeader,
        (true, false) if cell.row + 1 == table.rowstart => CellRole::LastColumnHeader,
        (true, false) => CellRole::ColumnHeader,
        (false, true) if cell.meta_th => CellRole::MetaRowHeader,
        (false, true) => CellRole::RowHeader,
        (false, false) => CellRole::Data,
    }
}

// ============================================================================
// HEADER CLICKS
// ============================================================================

/// Highlight mode after a click on `cell`.
///
/// A click on a leaf column header (one whose span reaches the data) makes
/// its column the pivot, a click on a leaf row header does the same for
/// rows, and clicking the current pivot again restores `default`. Any
/// other cell leaves `current` unchanged.
pub fn toggle_header_highlight<D>(
    table: &Table<D>,
    cell: &Cell<D>,
    current: HighlightMode,
    default: HighlightMode,
) -> HighlightMode {
    if cell.row < table.rowstart && cell.col < table.colstart {
        return current;
    }
    let is_leaf = cell.th
        && (cell.row + cell.row_span == table.rowstart || cell.col + cell.col_span == table.colstart);
    if !is_leaf {
        return current;
    }

    let clicked = if cell.row < table.rowstart {
        HighlightMode::PivotColumn(cell.col)
    } else if cell.col < table.colstart {
        HighlightMode::PivotRow(cell.row)
    } else {
        return current;
    };
    if clicked == current {
        default
    } else {
        clicked
    }
}

// ============================================================================
// CELL INSPECTION
// ============================================================================

/// Mean, min and max of the numeric values behind a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Data behind one metric slot of a report table.
#[derive(Debug, Clone, PartialEq)]
pub struct CellInspection<'a> {
    /// Coordinates of the anchor cell holding the data points.
    pub anchor: (usize, usize),
    /// Label of the metric shown in the slot.
    pub z_label: String,
    pub datapoints: Vec<&'a ReportDataPoint>,
    /// `None` when some value is not a number.
    pub summary: Option<ValueSummary>,
}

/// Resolves a data cell of a report table to its logical cell and metric,
/// and collects the data points of that metric.
///
/// Returns `None` for header cells and for slots that hold no metric.
pub fn inspect_cell<'a>(
    table: &'a ReportTable,
    row: usize,
    col: usize,
    z_labels: &[String],
    style: ZValueStyle,
) -> Option<CellInspection<'a>> {
    if row < table.rowstart || col < table.colstart || row >= table.nrows || col >= table.ncols {
        return None;
    }
    let row_scale = table.row_header_scale.max(1);
    let col_scale = table.col_header_scale.max(1);
    let di = (row - table.rowstart) % row_scale;
    let dj = (col - table.colstart) % col_scale;

    let k = (0..z_labels.len()).find(|&k| zvalue_offset(style, k, col_scale) == (di, dj))?;
    let z_label = z_labels[k].clone();
    let anchor = (row - di, col - dj);
    let anchor_cell = table.find_cell(anchor.0, anchor.1)?;

    let datapoints: Vec<&ReportDataPoint> = anchor_cell
        .data
        .iter()
        .filter(|p| p.z.label() == z_label)
        .collect();

    let numbers: Option<Vec<f64>> = datapoints.iter().map(|p| p.record_value.as_f64()).collect();
    let summary = numbers
        .as_deref()
        .and_then(NumericStats::from_numbers)
        .map(|s| ValueSummary {
            mean: s.mean,
            min: s.min,
            max: s.max,
        });

    Some(CellInspection {
        anchor,
        z_label,
        datapoints,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RenderOptions;
    use crate::engine::render_report;
    use report_data::{AttrValue, Attribute, Index, IndexElement, ReportData};

    fn point(x: &str, y: &str, z: &str, id: i64, value: AttrValue) -> ReportDataPoint {
        ReportDataPoint::new(
            IndexElement::new([AttrValue::from(x)]),
            IndexElement::new([AttrValue::from(y)]),
            Attribute::from(["metrics", z]),
            id,
            value,
        )
    }

    fn create_test_report() -> ReportData {
        ReportData::new(
            vec![
                point("bm25", "wt250", "mrr", 1, AttrValue::Number(0.5)),
                point("bm25", "wt250", "mrr", 2, AttrValue::Number(0.7)),
                point("bm25", "wt250", "recall", 3, AttrValue::Number(0.9)),
                point("dense", "wt250", "recall", 4, AttrValue::from("oom")),
            ],
            vec![Index::leaf(Attribute::from(["params", "method"]), ["bm25", "dense"])],
            vec![Index::leaf(Attribute::from(["params", "dataset"]), ["wt250", "biotable"])],
        )
    }

    fn render(style: ZValueStyle) -> (ReportTable, Vec<String>) {
        let report = create_test_report();
        let options = RenderOptions {
            zvalue_style: style,
            ..RenderOptions::default()
        };
        (render_report(&report, &options).unwrap(), report.z_labels())
    }

    #[test]
    fn test_cell_roles() {
        let (table, _) = render(ZValueStyle::Column);
        // rowstart = 3 (2 header rows + z-label row), colstart = 2
        let role = |i: usize, j: usize| cell_role(&table, &table.cells[i][j]);
        assert_eq!(role(0, 0), CellRole::Corner);
        assert_eq!(role(0, 2), CellRole::MetaColumnHeader);
        assert_eq!(role(1, 2), CellRole::ColumnHeader);
        assert_eq!(role(2, 3), CellRole::LastColumnHeader);
        assert_eq!(role(3, 0), CellRole::MetaRowHeader);
        assert_eq!(role(4, 1), CellRole::RowHeader);
        assert_eq!(role(4, 4), CellRole::Data);
    }

    #[test]
    fn test_toggle_header_highlight() {
        let (table, _) = render(ZValueStyle::Column);
        let default = HighlightMode::RowBest;
        let z_header = &table.cells[2][3];
        let mode = toggle_header_highlight(&table, z_header, default, default);
        assert_eq!(mode, HighlightMode::PivotColumn(3));
        assert_eq!(toggle_header_highlight(&table, z_header, mode, default), default);

        let row_header = &table.cells[4][1];
        assert_eq!(
            toggle_header_highlight(&table, row_header, default, default),
            HighlightMode::PivotRow(4)
        );

        // the method value spans two slots and stops above the z-label row
        assert_eq!(toggle_header_highlight(&table, &table.cells[1][2], default, default), default);
        assert_eq!(toggle_header_highlight(&table, &table.cells[0][0], default, default), default);
        assert_eq!(toggle_header_highlight(&table, &table.cells[3][2], default, default), default);
    }

    #[test]
    fn test_inspect_column_style() {
        let (table, z_labels) = render(ZValueStyle::Column);
        let mrr = inspect_cell(&table, 3, 2, &z_labels, ZValueStyle::Column).unwrap();
        assert_eq!(mrr.anchor, (3, 2));
        assert_eq!(mrr.z_label, "mrr");
        assert_eq!(mrr.datapoints.len(), 2);
        let summary = mrr.summary.unwrap();
        assert!((summary.mean - 0.6).abs() < 1e-12);
        assert_eq!((summary.min, summary.max), (0.5, 0.7));

        let recall = inspect_cell(&table, 3, 5, &z_labels, ZValueStyle::Column).unwrap();
        assert_eq!(recall.anchor, (3, 4));
        assert_eq!(recall.z_label, "recall");
        assert_eq!(recall.datapoints[0].record_id, 4);
        assert_eq!(recall.summary, None);

        assert!(inspect_cell(&table, 1, 2, &z_labels, ZValueStyle::Column).is_none());
    }

    #[test]
    fn test_inspect_row_and_embedded_styles() {
        let (table, z_labels) = render(ZValueStyle::Row);
        let recall = inspect_cell(&table, table.rowstart + 1, table.colstart, &z_labels, ZValueStyle::Row).unwrap();
        assert_eq!(recall.anchor, (table.rowstart, table.colstart));
        assert_eq!(recall.z_label, "recall");
        assert_eq!(recall.datapoints.len(), 1);

        let (table, z_labels) = render(ZValueStyle::Embedded);
        let (r, c) = (table.rowstart, table.colstart);
        let recall = inspect_cell(&table, r, c + 1, &z_labels, ZValueStyle::Embedded).unwrap();
        assert_eq!(recall.z_label, "recall");
        assert_eq!(recall.anchor, (r, c));
        assert!(inspect_cell(&table, r + 1, c, &z_labels, ZValueStyle::Embedded).is_none());
    }

    #[test]
    fn test_inspect_after_fix_spanning() {
        let (table, z_labels) = render(ZValueStyle::Column);
        let fixed = crate::engine::apply_highlight(&table, HighlightMode::None);
        let recall = inspect_cell(&fixed, 3, 3, &z_labels, ZValueStyle::Column).unwrap();
        assert_eq!(recall.anchor, (3, 2));
        assert_eq!(recall.z_label, "recall");
        assert_eq!(recall.datapoints.len(), 1);
    }
}
