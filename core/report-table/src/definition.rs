//! FILENAME: core/report-table/src/definition.rs
//! Report Table Definition - The serializable render configuration.
//!
//! This module contains the types that DESCRIBE how a report is rendered:
//! where the z-values go, which highlighting policy applies, and how an
//! auto table is sorted. Everything here is plain data threaded through the
//! engine by the caller.

use serde::{Deserialize, Serialize};

/// Number of decimal places used for numeric cell labels.
pub const LABEL_PRECISION: usize = 3;

/// Standard deviations at or below this are treated as zero when deciding
/// whether to show a confidence interval.
pub const STD_EPSILON: f64 = 1e-9;

// ============================================================================
// Z-VALUE LAYOUT
// ============================================================================

/// Where multiple metrics (z-values) of one logical cell are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZValueStyle {
    /// Side by side, one physical column per metric.
    Column,
    /// Stacked, one physical row per metric.
    Row,
    /// In a square block inside the logical cell.
    Embedded,
}

impl Default for ZValueStyle {
    fn default() -> Self {
        ZValueStyle::Column
    }
}

/// Extra header strips and scale factors of a report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZValueLayout {
    /// Extra header columns between the row headers and the data.
    pub n_extra_row_header_col: usize,
    /// Extra header rows between the column headers and the data.
    pub n_extra_col_header_row: usize,
    /// Physical rows per logical row.
    pub row_header_scale: usize,
    /// Physical columns per logical column.
    pub col_header_scale: usize,
}

impl Default for ZValueLayout {
    fn default() -> Self {
        ZValueLayout {
            n_extra_row_header_col: 0,
            n_extra_col_header_row: 0,
            row_header_scale: 1,
            col_header_scale: 1,
        }
    }
}

impl ZValueLayout {
    /// Layout for `n_zvalues` metrics rendered in `style`.
    pub fn new(style: ZValueStyle, n_zvalues: usize) -> Self {
        if n_zvalues <= 1 {
            return ZValueLayout::default();
        }
        match style {
            ZValueStyle::Column => ZValueLayout {
                n_extra_col_header_row: 1,
                col_header_scale: n_zvalues,
                ..ZValueLayout::default()
            },
            ZValueStyle::Row => ZValueLayout {
                n_extra_row_header_col: 1,
                row_header_scale: n_zvalues,
                ..ZValueLayout::default()
            },
            ZValueStyle::Embedded => {
                let side = embedded_side(n_zvalues);
                ZValueLayout {
                    row_header_scale: side,
                    col_header_scale: side,
                    ..ZValueLayout::default()
                }
            }
        }
    }
}

/// Smallest `side` with `side * side >= n`.
fn embedded_side(n: usize) -> usize {
    let mut side = (n as f64).sqrt().ceil() as usize;
    while side * side < n {
        side += 1;
    }
    while side > 1 && (side - 1) * (side - 1) >= n {
        side -= 1;
    }
    side.max(1)
}

// ============================================================================
// HIGHLIGHTING
// ============================================================================

/// Highlighting policy.
///
/// Wire form: `"none" | "row" | "col" | "row-best" | "col-best"` or
/// `{"type": "row" | "col", "value": n}` for pivot modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HighlightModeWire", into = "HighlightModeWire")]
pub enum HighlightMode {
    None,
    /// Color gradient within each row.
    Row,
    /// Color gradient within each column.
    Column,
    /// Bold the maximum of each row.
    RowBest,
    /// Bold the maximum of each column.
    ColumnBest,
    /// Compare every row against the given physical row.
    PivotRow(usize),
    /// Compare every column against the given physical column.
    PivotColumn(usize),
}

impl Default for HighlightMode {
    fn default() -> Self {
        HighlightMode::RowBest
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum NamedHighlight {
    None,
    Row,
    Col,
    RowBest,
    ColBest,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PivotAxis {
    Row,
    Col,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum HighlightModeWire {
    Named(NamedHighlight),
    Pivot {
        #[serde(rename = "type")]
        axis: PivotAxis,
        value: usize,
    },
}

impl From<HighlightModeWire> for HighlightMode {
    fn from(wire: HighlightModeWire) -> Self {
        match wire {
            HighlightModeWire::Named(NamedHighlight::None) => HighlightMode::None,
            HighlightModeWire::Named(NamedHighlight::Row) => HighlightMode::Row,
            HighlightModeWire::Named(NamedHighlight::Col) => HighlightMode::Column,
            HighlightModeWire::Named(NamedHighlight::RowBest) => HighlightMode::RowBest,
            HighlightModeWire::Named(NamedHighlight::ColBest) => HighlightMode::ColumnBest,
            HighlightModeWire::Pivot { axis: PivotAxis::Row, value } => HighlightMode::PivotRow(value),
            HighlightModeWire::Pivot { axis: PivotAxis::Col, value } => HighlightMode::PivotColumn(value),
        }
    }
}

impl From<HighlightMode> for HighlightModeWire {
    fn from(mode: HighlightMode) -> Self {
        match mode {
            HighlightMode::None => HighlightModeWire::Named(NamedHighlight::None),
            HighlightMode::Row => HighlightModeWire::Named(NamedHighlight::Row),
            HighlightMode::Column => HighlightModeWire::Named(NamedHighlight::Col),
            HighlightMode::RowBest => HighlightModeWire::Named(NamedHighlight::RowBest),
            HighlightMode::ColumnBest => HighlightModeWire::Named(NamedHighlight::ColBest),
            HighlightMode::PivotRow(value) => HighlightModeWire::Pivot { axis: PivotAxis::Row, value },
            HighlightMode::PivotColumn(value) => HighlightModeWire::Pivot { axis: PivotAxis::Col, value },
        }
    }
}

// ============================================================================
// RENDER OPTIONS
// ============================================================================

/// Render options of a pivot report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default)]
    pub zvalue_style: ZValueStyle,
    #[serde(default)]
    pub highlight: HighlightMode,
}

/// Sort direction of an auto table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One sort key: a physical column and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: usize,
    pub order: SortOrder,
}

/// Render options of an auto table. Sort keys apply in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutoTableRenderOptions {
    #[serde(default)]
    pub highlight: HighlightMode,
    #[serde(default)]
    pub sorts: Vec<SortSpec>,
}

impl AutoTableRenderOptions {
    pub fn new(highlight: HighlightMode, sorts: Vec<SortSpec>) -> Self {
        AutoTableRenderOptions { highlight, sorts }
    }

    /// Cycles a column through descending, ascending and unsorted.
    pub fn toggle_sort_column(&mut self, column: usize) {
        match self.sorts.iter().position(|s| s.column == column) {
            Some(pos) if self.sorts[pos].order == SortOrder::Desc => {
                self.sorts[pos].order = SortOrder::Asc;
            }
            Some(_) => self.sorts.retain(|s| s.column != column),
            None => self.sorts.push(SortSpec {
                column,
                order: SortOrder::Desc,
            }),
        }
    }

    pub fn sorted_order(&self, column: usize) -> Option<SortOrder> {
        self.sorts
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.order)
    }

    /// Compact identity of the sort state, e.g. `"3:desc,5:asc"`.
    pub fn sort_key(&self) -> String {
        self.sorts
            .iter()
            .map(|s| format!("{}:{}", s.column, s.order.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zvalue_layout() {
        assert_eq!(ZValueLayout::new(ZValueStyle::Column, 1), ZValueLayout::default());
        assert_eq!(ZValueLayout::new(ZValueStyle::Row, 0), ZValueLayout::default());

        let column = ZValueLayout::new(ZValueStyle::Column, 3);
        assert_eq!(column.n_extra_col_header_row, 1);
        assert_eq!(column.col_header_scale, 3);
        assert_eq!(column.row_header_scale, 1);

        let row = ZValueLayout::new(ZValueStyle::Row, 2);
        assert_eq!(row.n_extra_row_header_col, 1);
        assert_eq!(row.row_header_scale, 2);

        let embedded = ZValueLayout::new(ZValueStyle::Embedded, 3);
        assert_eq!((embedded.row_header_scale, embedded.col_header_scale), (2, 2));
        assert_eq!(embedded.n_extra_col_header_row, 0);
        assert_eq!(ZValueLayout::new(ZValueStyle::Embedded, 4).row_header_scale, 2);
        assert_eq!(ZValueLayout::new(ZValueStyle::Embedded, 5).row_header_scale, 3);
    }

    #[test]
    fn test_highlight_mode_wire_form() {
        let modes: Vec<HighlightMode> = serde_json::from_str(
            r#"["none", "row", "col", "row-best", "col-best",
                {"type": "row", "value": 4}, {"type": "col", "value": 7}]"#,
        )
        .unwrap();
        assert_eq!(
            modes,
            vec![
                HighlightMode::None,
                HighlightMode::Row,
                HighlightMode::Column,
                HighlightMode::RowBest,
                HighlightMode::ColumnBest,
                HighlightMode::PivotRow(4),
                HighlightMode::PivotColumn(7),
            ]
        );
        assert_eq!(
            serde_json::to_string(&HighlightMode::ColumnBest).unwrap(),
            r#""col-best""#
        );
        assert_eq!(
            serde_json::to_value(HighlightMode::PivotColumn(2)).unwrap(),
            serde_json::json!({"type": "col", "value": 2})
        );
    }

    #[test]
    fn test_render_options_defaults() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.zvalue_style, ZValueStyle::Column);
        assert_eq!(options.highlight, HighlightMode::RowBest);

        let options: RenderOptions =
            serde_json::from_str(r#"{"zvalueStyle": "embedded", "highlight": "col"}"#).unwrap();
        assert_eq!(options.zvalue_style, ZValueStyle::Embedded);
        assert_eq!(options.highlight, HighlightMode::Column);
    }

    #[test]
    fn test_toggle_sort_column() {
        let mut options = AutoTableRenderOptions::default();
        options.toggle_sort_column(3);
        assert_eq!(options.sorted_order(3), Some(SortOrder::Desc));
        options.toggle_sort_column(5);
        options.toggle_sort_column(3);
        assert_eq!(options.sorted_order(3), Some(SortOrder::Asc));
        assert_eq!(options.sort_key(), "3:asc,5:desc");
        options.toggle_sort_column(3);
        assert_eq!(options.sorted_order(3), None);
        assert_eq!(options.sort_key(), "5:desc");
    }
}
