//! FILENAME: core/report-table/src/impute.rs
//! Cell statistics and label imputation.
//!
//! After the builder has routed data points into anchor cells, every
//! logical data cell is summarized per metric: numeric values become a
//! mean, a lone value is shown as is, anything else is joined or flagged.

use crate::definition::{ZValueStyle, LABEL_PRECISION, STD_EPSILON};
use crate::engine::ReportTable;
use crate::view::CellLabel;
use report_data::AttrValue;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// STATISTICS
// ============================================================================

/// Summary of a set of numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Half-width of the 95% confidence interval of the mean.
    pub ci: f64,
    pub size: usize,
    pub min: f64,
    pub max: f64,
}

impl NumericStats {
    pub fn from_numbers(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(NumericStats {
            mean,
            std,
            ci: 1.96 * std / n.sqrt(),
            size: values.len(),
            min,
            max,
        })
    }

    /// True when the values differ enough to report a confidence interval.
    pub fn has_spread(&self) -> bool {
        self.size > 1 && self.std > STD_EPSILON
    }
}

/// What the values of one cell look like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellStats {
    /// All values are numbers.
    Number(NumericStats),
    /// Exactly one value that is not a number.
    Single(AttrValue),
    /// Several values, not all numbers.
    Mixed,
}

impl CellStats {
    /// Classifies a set of values. `None` for an empty set.
    pub fn from_values(values: &[AttrValue]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let numbers: Option<Vec<f64>> = values.iter().map(AttrValue::as_f64).collect();
        if let Some(stats) = numbers.as_deref().and_then(NumericStats::from_numbers) {
            return Some(CellStats::Number(stats));
        }
        if values.len() == 1 {
            return Some(CellStats::Single(values[0].clone()));
        }
        Some(CellStats::Mixed)
    }

    pub fn numeric(&self) -> Option<&NumericStats> {
        match self {
            CellStats::Number(stats) => Some(stats),
            _ => None,
        }
    }

    /// Label with a confidence interval when the values spread, as used by
    /// auto tables.
    pub fn summary_label(&self) -> CellLabel {
        match self {
            CellStats::Number(stats) if stats.has_spread() => CellLabel::Text(format!(
                "{} ± {}",
                format_number(stats.mean),
                format_number(stats.ci)
            )),
            CellStats::Number(stats) => CellLabel::Text(format_number(stats.mean)),
            CellStats::Single(value) => CellLabel::Value(value.clone()),
            CellStats::Mixed => CellLabel::Mixed,
        }
    }
}

pub fn format_number(value: f64) -> String {
    format!("{:.*}", LABEL_PRECISION, value)
}

// ============================================================================
// IMPUTATION
// ============================================================================

/// Offset of the `k`-th metric inside a logical cell of `col_scale`
/// physical columns.
pub fn zvalue_offset(style: ZValueStyle, k: usize, col_scale: usize) -> (usize, usize) {
    match style {
        ZValueStyle::Column => (0, k),
        ZValueStyle::Row => (k, 0),
        ZValueStyle::Embedded => {
            let side = col_scale.max(1);
            (k / side, k % side)
        }
    }
}

/// Labels every data cell of a freshly built table.
///
/// Each logical cell is visited at its anchor. An anchor without data
/// points becomes a placeholder spanning the whole logical cell. Otherwise
/// its points are grouped by metric label and each metric's slot (placed
/// by `zvalue_offset`) receives the summary; a metric with no points in
/// the cell gets a placeholder. With several metrics in `column` or `row`
/// style, the extra header strip is filled with the metric labels.
pub fn impute_cell_data(table: &mut ReportTable, z_labels: &[String], style: ZValueStyle) {
    let row_scale = table.row_header_scale.max(1);
    let col_scale = table.col_header_scale.max(1);

    if z_labels.len() > 1 {
        fill_zvalue_headers(table, z_labels, style);
    }

    for i in (table.rowstart..table.nrows).step_by(row_scale) {
        for j in (table.colstart..table.ncols).step_by(col_scale) {
            let Some(anchor) = table.get_mut(i, j) else {
                continue;
            };
            if anchor.data.is_empty() {
                anchor.row_span = row_scale;
                anchor.col_span = col_scale;
                anchor.label = CellLabel::Placeholder;
                continue;
            }

            let mut by_metric: FxHashMap<String, Vec<AttrValue>> = FxHashMap::default();
            for point in &anchor.data {
                by_metric
                    .entry(point.z.label())
                    .or_default()
                    .push(point.record_value.clone());
            }

            for (k, z_label) in z_labels.iter().enumerate() {
                let (di, dj) = zvalue_offset(style, k, col_scale);
                let Some(slot) = table.get_mut(i + di, j + dj) else {
                    continue;
                };
                match by_metric.get(z_label).and_then(|values| CellStats::from_values(values)) {
                    Some(stats) => {
                        slot.label = impute_label(&stats, by_metric.get(z_label));
                        slot.highlight_value = stats.numeric().map(|s| s.mean);
                        slot.stats = Some(stats);
                    }
                    None => slot.label = CellLabel::Placeholder,
                }
            }
        }
    }
}

/// A lone null reads "null"; inside a mixed list a null is left blank.
fn impute_label(stats: &CellStats, values: Option<&Vec<AttrValue>>) -> CellLabel {
    match stats {
        CellStats::Number(n) => CellLabel::Text(format_number(n.mean)),
        CellStats::Single(value) => CellLabel::Text(value.to_string()),
        CellStats::Mixed => CellLabel::Text(
            values
                .map(|vs| vs.iter().map(AttrValue::key_segment).collect::<Vec<_>>().join(", "))
                .unwrap_or_default(),
        ),
    }
}

fn fill_zvalue_headers(table: &mut ReportTable, z_labels: &[String], style: ZValueStyle) {
    match style {
        ZValueStyle::Column if table.rowstart > 0 => {
            let row = table.rowstart - 1;
            for j in (table.colstart..table.ncols).step_by(table.col_header_scale.max(1)) {
                for (k, z_label) in z_labels.iter().enumerate() {
                    if let Some(cell) = table.get_mut(row, j + k) {
                        cell.label = CellLabel::Text(z_label.clone());
                    }
                }
            }
        }
        ZValueStyle::Row if table.colstart > 0 => {
            let col = table.colstart - 1;
            for i in (table.rowstart..table.nrows).step_by(table.row_header_scale.max(1)) {
                for (k, z_label) in z_labels.iter().enumerate() {
                    if let Some(cell) = table.get_mut(i + k, col) {
                        cell.label = CellLabel::Text(z_label.clone());
                    }
                }
            }
        }
        _ => {}
    }
}
