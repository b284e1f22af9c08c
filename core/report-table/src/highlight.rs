//! FILENAME: core/report-table/src/highlight.rs
//! Highlighting policies.
//!
//! A highlight pass splits the data region into groups of comparable cells
//! (see `Table::grouping`) and decorates the numeric cells of each group:
//! a color gradient plus a bold maximum, only the bold maximum ("best"
//! modes), or a red/green/blue comparison against a pivot cell.
//!
//! Passes must run on a dense table, before `fix_spanning`.

use crate::definition::HighlightMode;
use crate::engine::ReportTable;
use crate::view::{CellGroup, CellHighlight, GroupAxis, HighlightRange, HighlightStyle, Table};
use log::debug;

/// Gradient endpoints, light green to dark green.
pub const GRADIENT_START: [u8; 3] = [0xb7, 0xeb, 0x8f];
pub const GRADIENT_END: [u8; 3] = [0x23, 0x78, 0x04];

/// Gradient positions run over `0..=GRADIENT_RANGE`.
pub const GRADIENT_RANGE: f64 = 1000.0;

/// Pivot comparison colors.
pub const HIGHER_COLOR: &str = "#ff4d4f";
pub const LOWER_COLOR: &str = "#52c41a";
pub const EQUAL_COLOR: &str = "#1890ff";

/// Color at `position` (clamped to `0..=GRADIENT_RANGE`) as `#rrggbb`.
pub fn gradient_color(position: f64) -> String {
    let t = if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, GRADIENT_RANGE) / GRADIENT_RANGE
    };
    let channel = |k: usize| -> u8 {
        let start = GRADIENT_START[k] as f64;
        let end = GRADIENT_END[k] as f64;
        (start + (end - start) * t).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// Applies `mode` to the cells of `range`. Highlights from earlier passes
/// are cleared first, so passes never accumulate.
pub fn highlight<D>(mut table: Table<D>, mode: HighlightMode, range: &HighlightRange) -> Table<D> {
    table.clear_highlights();

    let (axis, pivot) = match mode {
        HighlightMode::None => return table,
        HighlightMode::Row | HighlightMode::RowBest => (GroupAxis::Row, None),
        HighlightMode::Column | HighlightMode::ColumnBest => (GroupAxis::Column, None),
        HighlightMode::PivotColumn(col) => (GroupAxis::Row, Some(col)),
        HighlightMode::PivotRow(row) => (GroupAxis::Column, Some(row)),
    };

    let groups = table.grouping(axis, range);
    debug!("Highlight pass {:?}: {} groups", mode, groups.len());

    match pivot {
        None => {
            let best_only = matches!(mode, HighlightMode::RowBest | HighlightMode::ColumnBest);
            for group in &groups {
                highlight_group(&mut table, group, best_only);
            }
        }
        Some(position) => {
            let (start, step) = match axis {
                GroupAxis::Row => (range.colstart, range.colstep.max(1)),
                GroupAxis::Column => (range.rowstart, range.rowstep.max(1)),
            };
            if position < start {
                debug!("Pivot {} lies outside the data region, nothing to compare", position);
                return table;
            }
            let lane = (position - start) % step;
            let index = (position - start) / step;
            for group in groups.iter().filter(|g| g.lane == lane) {
                if let Some(&pivot_cell) = group.cells.get(index) {
                    highlight_pivot_group(&mut table, group, pivot_cell);
                }
            }
        }
    }
    table
}

/// Highlights the data region of a pivot report, one lane per metric.
pub fn highlight_report(table: ReportTable, mode: HighlightMode) -> ReportTable {
    let range = HighlightRange::new(table.rowstart, table.colstart)
        .with_steps(table.row_header_scale, table.col_header_scale);
    highlight(table, mode, &range)
}

/// Values of the numeric cells of a group, with their positions.
fn numeric_cells<D>(table: &Table<D>, group: &CellGroup) -> Vec<((usize, usize), f64)> {
    group
        .cells
        .iter()
        .filter_map(|&(i, j)| {
            table
                .get(i, j)
                .and_then(|c| c.highlight_value)
                .map(|v| ((i, j), v))
        })
        .collect()
}

/// Color range of a group, or `None` when the group is not worth
/// highlighting. Values that all lie in `[0, 1]` are mapped onto `[0, 1]`,
/// so a group of equal values inside that range is still shaded and its
/// members are all bold.
fn color_range(values: &[((usize, usize), f64)]) -> Option<(f64, f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let real_min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let real_max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let (min, max) = if real_max <= 1.0 && real_min >= 0.0 {
        (0.0, 1.0)
    } else {
        (real_min, real_max)
    };
    if max - min == 0.0 {
        return None;
    }
    Some((min, max, real_max))
}

fn highlight_group<D>(table: &mut Table<D>, group: &CellGroup, best_only: bool) {
    let values = numeric_cells(table, group);
    let Some((min, max, real_max)) = color_range(&values) else {
        return;
    };
    let interval = max - min;

    for ((i, j), value) in values {
        let Some(cell) = table.get_mut(i, j) else {
            continue;
        };
        let bold = value == real_max;
        if best_only {
            if bold {
                cell.highlight = Some(CellHighlight {
                    color: None,
                    bold: true,
                    style: HighlightStyle::Text,
                });
            }
        } else {
            let position = (value - min) / interval * GRADIENT_RANGE;
            cell.highlight = Some(CellHighlight {
                color: Some(gradient_color(position)),
                bold,
                style: HighlightStyle::Dot,
            });
        }
    }
}

fn highlight_pivot_group<D>(table: &mut Table<D>, group: &CellGroup, pivot: (usize, usize)) {
    let Some(pivot_value) = table.get(pivot.0, pivot.1).and_then(|c| c.highlight_value) else {
        return;
    };
    let values = numeric_cells(table, group);
    if color_range(&values).is_none() {
        return;
    }

    for ((i, j), value) in values {
        let Some(cell) = table.get_mut(i, j) else {
            continue;
        };
        let color = if value > pivot_value {
            HIGHER_COLOR
        } else if value < pivot_value {
            LOWER_COLOR
        } else {
            EQUAL_COLOR
        };
        cell.highlight = Some(CellHighlight {
            color: Some(color.to_string()),
            bold: true,
            style: HighlightStyle::Text,
        });
    }
}
