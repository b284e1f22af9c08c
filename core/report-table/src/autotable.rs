//! FILENAME: core/report-table/src/autotable.rs
//! Auto tables: pre-grouped records laid out without a pivot step.
//!
//! Layout, top to bottom:
//! - the value header block (metric paths), with a corner cell spanning the
//!   attribute columns;
//! - for each group: a title row, the group's attribute header block, then
//!   one data row per distinct combination of attribute values.
//!
//! Rows sharing the same attribute values are merged; their value cells
//! aggregate every merged record.

use crate::definition::{AutoTableRenderOptions, SortOrder, SortSpec, ZValueLayout};
use crate::header::build_attribute_header;
use crate::highlight::highlight;
use crate::impute::CellStats;
use crate::view::{Cell, CellLabel, HighlightRange, Table};
use log::debug;
use report_data::{AttrValue, AutoTableReportData, AutoTableRow};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label of a null attribute value.
pub const NULL_LABEL: &str = "<null>";

/// Records behind one value cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellData {
    pub record_ids: Vec<i64>,
    pub values: Vec<AttrValue>,
}

impl CellData {
    pub fn new(record_ids: Vec<i64>, values: Vec<AttrValue>) -> Self {
        CellData { record_ids, values }
    }
}

pub type AutoTableCell = Cell<CellData>;

/// Data rows of one group: `start..end` in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRange {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoTable {
    pub table: Table<CellData>,
    /// Number of attribute columns, the widest group's.
    pub attr_header_width: usize,
    /// Number of value header rows.
    pub value_header_height: usize,
    pub group_ranges: Vec<GroupRange>,
}

/// Merges rows with identical header values, keeping the order in which
/// each combination first appears. Values are compared by their JSON form,
/// so `1` and `"1"` stay apart.
pub fn group_rows(rows: &[AutoTableRow]) -> Vec<Vec<&AutoTableRow>> {
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<Vec<&AutoTableRow>> = Vec::new();
    for row in rows {
        let key = serde_json::to_string(&row.headers).unwrap_or_else(|_| format!("{:?}", row.headers));
        match positions.get(&key) {
            Some(&pos) => groups[pos].push(row),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}

impl AutoTable {
    /// Lays out a payload. The result is dense and undecorated; see
    /// `render`.
    pub fn build(report: &AutoTableReportData) -> Self {
        let value_header = build_attribute_header::<CellData>(&report.value_headers);
        let attr_headers: Vec<_> = report
            .groups
            .iter()
            .map(|g| build_attribute_header::<CellData>(&g.data.attr_headers))
            .collect();
        let merged_rows: Vec<_> = report.groups.iter().map(|g| group_rows(&g.data.rows)).collect();

        let attr_w = report
            .groups
            .iter()
            .map(|g| g.data.attr_headers.len())
            .max()
            .unwrap_or(0);
        let width = attr_w + report.value_headers.len();
        let value_h = value_header.len();
        let height = value_h
            + merged_rows.iter().map(Vec::len).sum::<usize>()
            + attr_headers.iter().map(Vec::len).sum::<usize>()
            + report.groups.len();

        let mut cells: Vec<Vec<AutoTableCell>> = (0..height)
            .map(|i| (0..width).map(|j| Cell::new(i, j)).collect())
            .collect();

        if value_h > 0 {
            if let Some(corner) = cells.get_mut(0).and_then(|r| r.get_mut(0)) {
                corner.th = true;
                corner.col_span = attr_w.max(1);
                corner.row_span = value_h;
            }
        }
        for (i, row) in value_header.into_iter().enumerate() {
            for (j, cell) in row.into_iter().enumerate() {
                cells[i][j + attr_w] = cell.at(i, j + attr_w);
            }
        }

        let mut startrow = value_h;
        let mut group_ranges = Vec::with_capacity(report.groups.len());
        for ((group, attr_header), rows) in report.groups.iter().zip(attr_headers).zip(&merged_rows) {
            if let Some(title) = cells[startrow].get_mut(0) {
                title.label = CellLabel::Text(group.name.clone());
                title.th = true;
                title.meta_th = true;
                title.col_span = attr_w.max(1);
            }
            if let Some(rest) = cells[startrow].get_mut(attr_w) {
                rest.th = true;
                rest.meta_th = true;
                rest.col_span = (width - attr_w).max(1);
            }
            startrow += 1;

            let header_h = attr_header.len();
            for (i, header_row) in attr_header.into_iter().enumerate() {
                let row = startrow + i;
                for cell in cells[row].iter_mut().skip(attr_w) {
                    cell.th = true;
                }
                for (j, cell) in header_row.into_iter().enumerate() {
                    cells[row][j] = cell.at(row, j);
                }
            }
            startrow += header_h;

            for (i, merged) in rows.iter().enumerate() {
                let row = startrow + i;
                let record_ids: Vec<i64> = merged.iter().map(|r| r.record_id).collect();
                for (j, value) in merged[0].headers.iter().enumerate() {
                    if let Some(cell) = cells[row].get_mut(j) {
                        cell.label = match value {
                            AttrValue::Null => CellLabel::text(NULL_LABEL),
                            other => CellLabel::Value(other.clone()),
                        };
                    }
                }
                for j in attr_w..width {
                    let values: Vec<AttrValue> = merged
                        .iter()
                        .map(|r| r.values.get(j - attr_w).cloned().unwrap_or_default())
                        .collect();
                    let stats = CellStats::from_values(&values);
                    let cell = &mut cells[row][j];
                    cell.label = stats.as_ref().map_or(CellLabel::Empty, CellStats::summary_label);
                    cell.highlight_value = stats.as_ref().and_then(|s| s.numeric()).map(|s| s.mean);
                    cell.stats = stats;
                    cell.data = CellData::new(record_ids.clone(), values);
                }
            }
            startrow += rows.len();
            group_ranges.push(GroupRange {
                start: startrow - rows.len(),
                end: startrow,
                name: group.name.clone(),
            });
        }

        debug!(
            "Built auto table {}x{} ({} groups, attribute width {})",
            height,
            width,
            group_ranges.len(),
            attr_w
        );

        AutoTable {
            table: Table::new(cells, value_h, attr_w, ZValueLayout::default()),
            attr_header_width: attr_w,
            value_header_height: value_h,
            group_ranges,
        }
    }

    /// True for the lowest value header cell of a column: the one a user
    /// clicks to sort.
    pub fn is_leaf_value_header(&self, cell: &AutoTableCell) -> bool {
        cell.th
            && cell.row < self.value_header_height
            && cell.col >= self.attr_header_width
            && (cell.row_span > 1 || cell.row + 1 == self.value_header_height)
    }

    /// Wraps each column's leaf value header in a sortable label carrying
    /// the column's current sort order.
    pub fn mark_sortable_headers(&mut self, options: &AutoTableRenderOptions) {
        for j in self.attr_header_width..self.table.ncols {
            for i in 0..self.value_header_height {
                let is_leaf = self.table.get(i, j).map_or(false, |c| self.is_leaf_value_header(c));
                if !is_leaf {
                    continue;
                }
                if let Some(cell) = self.table.get_mut(i, j) {
                    let label = std::mem::take(&mut cell.label);
                    cell.label = CellLabel::Sortable {
                        label: Box::new(label),
                        order: options.sorted_order(j),
                    };
                }
                break;
            }
        }
    }

    /// Reorders the data rows of each group by the numeric means of the
    /// sort columns, keys applied in order. Cells without a numeric value
    /// go last whatever the direction. Rows keep their original
    /// coordinates.
    pub fn sort(&mut self, sorts: &[SortSpec]) {
        if sorts.is_empty() {
            return;
        }
        debug!("Sorting auto table by {:?}", sorts);
        for range in &self.group_ranges {
            let Some(rows) = self.table.cells.get_mut(range.start..range.end) else {
                continue;
            };
            rows.sort_by(|a, b| compare_rows(a, b, sorts));
        }
    }

    /// Decorates a copy of this table: sortable headers, highlights,
    /// sorting, then removal of covered cells.
    pub fn render(&self, options: &AutoTableRenderOptions) -> AutoTable {
        let mut rendered = self.clone();
        rendered.mark_sortable_headers(options);
        let range = HighlightRange::new(rendered.value_header_height, rendered.attr_header_width);
        rendered.table = highlight(rendered.table, options.highlight, &range);
        rendered.sort(&options.sorts);
        rendered.table = rendered.table.fix_spanning();
        rendered
    }
}

fn compare_rows(a: &[AutoTableCell], b: &[AutoTableCell], sorts: &[SortSpec]) -> Ordering {
    for spec in sorts {
        let va = a.get(spec.column).and_then(|c| c.highlight_value);
        let vb = b.get(spec.column).and_then(|c| c.highlight_value);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match spec.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Builds and renders an auto table in one go.
pub fn render_autotable(report: &AutoTableReportData, options: &AutoTableRenderOptions) -> AutoTable {
    AutoTable::build(report).render(options)
}
