//! FILENAME: core/report-table/src/header.rs
//! Header builders.
//!
//! Two kinds of header blocks are produced here:
//! - index headers: a forest of `Index` trees laid out horizontally, two
//!   rows per tree level (the attribute name, then its values);
//! - attribute headers: a flat list of attribute paths, one row per path
//!   segment, with equal prefixes of neighbouring paths merged.
//!
//! Both return a dense grid with header-local coordinates; the caller
//! moves the cells into place.

use crate::view::{Cell, CellLabel};
use log::debug;
use report_data::{Attribute, Index};

pub type HeaderGrid<D> = Vec<Vec<Cell<D>>>;

// ============================================================================
// INDEX HEADERS
// ============================================================================

/// Builds the header block of an index forest, `scale` physical columns per
/// leaf.
///
/// The block has `2 * max_level` rows. A meta cell names each tree level
/// and spans every leaf below it; a value cell sits underneath and spans
/// its own leaves. A leaf value spans down to the bottom of the block.
/// An empty forest gives an empty block.
pub fn build_index_header<D: Default>(indices: &[Index], scale: usize) -> HeaderGrid<D> {
    let Some(height) = indices.iter().map(Index::max_level).max() else {
        return Vec::new();
    };
    let scale = scale.max(1);
    let widths: Vec<usize> = indices.iter().map(Index::size).collect();
    let total: usize = widths.iter().sum();
    let width = if total == 0 { 1 } else { total * scale };

    let mut headers: HeaderGrid<D> = (0..height * 2)
        .map(|i| (0..width).map(|j| Cell::meta_header(i, j)).collect())
        .collect();

    let mut offset = 0;
    for (index, &size) in indices.iter().zip(&widths) {
        if size == 0 && total > 0 {
            continue;
        }
        build_index_header_main(index, 0, offset, &mut headers, scale);
        offset += size * scale;
    }
    headers
}

fn build_index_header_main<D>(
    index: &Index,
    rowoffset: usize,
    mut coloffset: usize,
    headers: &mut HeaderGrid<D>,
    scale: usize,
) {
    let height = headers.len();
    if let Some(cell) = cell_mut(headers, rowoffset, coloffset) {
        cell.th = true;
        cell.meta_th = true;
        cell.label = CellLabel::Text(index.attr.label());
        cell.col_span = (index.size() * scale).max(1);
    }

    for (value, subtrees) in &index.children {
        let span: usize = subtrees.iter().map(Index::size).sum();
        if let Some(cell) = cell_mut(headers, rowoffset + 1, coloffset) {
            cell.th = true;
            cell.meta_th = false;
            cell.label = CellLabel::Value(value.clone());
            if subtrees.is_empty() {
                cell.col_span = scale;
                cell.row_span = height - rowoffset - 1;
            } else {
                cell.col_span = (span * scale).max(1);
            }
        }

        if subtrees.is_empty() {
            coloffset += scale;
        } else {
            for subtree in subtrees {
                build_index_header_main(subtree, rowoffset + 2, coloffset, headers, scale);
                coloffset += subtree.size() * scale;
            }
        }
    }
}

fn cell_mut<D>(headers: &mut HeaderGrid<D>, row: usize, col: usize) -> Option<&mut Cell<D>> {
    headers.get_mut(row).and_then(|r| r.get_mut(col))
}

/// Turns a horizontal header block into a vertical one: rows become
/// columns and row/col spans are swapped.
pub fn transpose_header<D: Clone>(cells: &HeaderGrid<D>) -> HeaderGrid<D> {
    let Some(first) = cells.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|j| {
            cells
                .iter()
                .filter_map(|row| row.get(j))
                .map(|cell| Cell {
                    row: cell.col,
                    col: cell.row,
                    row_span: cell.col_span,
                    col_span: cell.row_span,
                    ..cell.clone()
                })
                .collect()
        })
        .collect()
}

// ============================================================================
// ATTRIBUTE HEADERS
// ============================================================================

/// Builds a header block for a flat list of attributes: one column per
/// attribute and one row per path segment.
///
/// Neighbouring attributes sharing a path prefix get their prefix cells
/// merged into one column-spanning cell; a path shorter than the block
/// spans down to the bottom. Merging is skipped entirely when some
/// attribute is nested under its left neighbour, since spans would then
/// hide the parent.
pub fn build_attribute_header<D: Default>(attrs: &[Attribute]) -> HeaderGrid<D> {
    let Some(height) = attrs.iter().map(Attribute::len).max() else {
        return Vec::new();
    };
    let mut headers: HeaderGrid<D> = (0..height)
        .map(|i| (0..attrs.len()).map(|j| Cell::header(i, j)).collect())
        .collect();

    for (j, attr) in attrs.iter().enumerate() {
        for (i, segment) in attr.path().iter().enumerate() {
            headers[i][j].label = CellLabel::Text(segment.clone());
        }
    }

    if attrs.windows(2).any(|pair| pair[1].is_child_of(&pair[0])) {
        debug!("Attribute header merging disabled: an attribute is nested under its neighbour");
        return headers;
    }

    // Column of the cell currently absorbing matches at each level, or
    // `None` after a shorter path cut the level off.
    let mut anchors: Vec<Option<usize>> = vec![Some(0); height];
    span_to_bottom(&mut headers, &attrs[0], 0, height);

    for (j, attr) in attrs.iter().enumerate().skip(1) {
        let mut matched = true;
        for (i, segment) in attr.path().iter().enumerate() {
            let anchor = anchors[i].filter(|&a| {
                matched && attrs[a].path().get(i).map_or(false, |s| s == segment)
            });
            match anchor {
                Some(a) => headers[i][a].col_span += 1,
                None => {
                    anchors[i] = Some(j);
                    matched = false;
                }
            }
        }
        for level in anchors.iter_mut().skip(attr.len()) {
            *level = None;
        }
        span_to_bottom(&mut headers, attr, j, height);
    }
    headers
}

fn span_to_bottom<D>(headers: &mut HeaderGrid<D>, attr: &Attribute, col: usize, height: usize) {
    let len = attr.len();
    if len == 0 || len >= height {
        return;
    }
    if let Some(cell) = cell_mut(headers, len - 1, col) {
        cell.row_span = height - len + 1;
    }
}
