//! FILENAME: tests/test_table_builder.rs
//! Integration tests for the pivot table builder against recorded layouts.

mod common;

use common::{ascii_table, summarize, Fixture};
use report_table::header::transpose_header;
use report_table::{build_index_map, Axis, TableBuilder};

// ============================================================================
// HEADER TESTS
// ============================================================================

#[test]
fn test_column_headers_match_fixtures() {
    for (name, fixture) in Fixture::all() {
        let builder = TableBuilder::new(&fixture.report);
        let headers = builder.build_header(Axis::X, fixture.params.col_header_scale);
        assert_eq!(summarize(&headers), fixture.x_headers, "x headers of {}", name);
    }
}

#[test]
fn test_row_headers_match_fixtures() {
    for (name, fixture) in Fixture::all() {
        let builder = TableBuilder::new(&fixture.report);
        let headers = builder.build_header(Axis::Y, fixture.params.row_header_scale);
        assert_eq!(summarize(&headers), fixture.y_headers, "y headers of {}", name);
    }
}

#[test]
fn test_transposed_row_headers_swap_spans() {
    let fixture = Fixture::load("testcase01");
    let builder = TableBuilder::new(&fixture.report);
    let transposed = transpose_header(&builder.build_header(Axis::Y, 1));
    assert_eq!(transposed.len(), 7);
    assert!(transposed.iter().all(|row| row.len() == 2));
    assert_eq!(transposed[0][0].label.to_string(), "dataset");
    assert_eq!((transposed[0][0].row_span, transposed[0][0].col_span), (7, 1));
    assert_eq!(transposed[6][1].label.to_string(), "wt250:shuffle:72");
}

#[test]
fn test_index_map_covers_every_leaf() {
    for (name, fixture) in Fixture::all() {
        let builder = TableBuilder::new(&fixture.report);
        let width = fixture.x_headers.first().map_or(0, Vec::len) / fixture.params.col_header_scale;
        let map = build_index_map(&fixture.report.x_index);
        assert_eq!(builder.index_map(Axis::X).len(), width, "x leaves of {}", name);
        let mut offsets: Vec<usize> = map.values().copied().collect();
        offsets.sort_unstable();
        assert_eq!(offsets, (0..width).collect::<Vec<_>>());
    }
}

// ============================================================================
// TABLE TESTS
// ============================================================================

#[test]
fn test_dense_table_matches_fixtures() {
    for (name, fixture) in Fixture::all() {
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap();
        assert_eq!(ascii_table(&table), fixture.table_structure, "table of {}", name);
    }
}

#[test]
fn test_dense_table_coordinates() {
    for (_, fixture) in Fixture::all() {
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap();
        assert_eq!(table.cells.len(), table.nrows);
        for (i, row) in table.cells.iter().enumerate() {
            assert_eq!(row.len(), table.ncols);
            for (j, cell) in row.iter().enumerate() {
                assert_eq!((cell.row, cell.col), (i, j));
            }
        }
    }
}

#[test]
fn test_table_starts() {
    let expected = [("testcase01", 4, 2), ("testcase02", 6, 2), ("testcase03", 5, 2)];
    for (name, rowstart, colstart) in expected {
        let fixture = Fixture::load(name);
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap();
        assert_eq!((table.rowstart, table.colstart), (rowstart, colstart), "{}", name);
    }
}

#[test]
fn test_every_data_point_is_routed() {
    for (name, fixture) in Fixture::all() {
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap();
        let routed: usize = table.cells.iter().flatten().map(|c| c.data.len()).sum();
        assert_eq!(routed, fixture.report.data.len(), "{}", name);
        for cell in table.cells.iter().flatten().filter(|c| !c.data.is_empty()) {
            assert!(cell.row >= table.rowstart && cell.col >= table.colstart);
            assert_eq!((cell.col - table.colstart) % table.col_header_scale, 0);
        }
    }
}

// ============================================================================
// SPAN FIXING TESTS
// ============================================================================

#[test]
fn test_spanned_cells_match_fixtures() {
    for (name, fixture) in Fixture::all() {
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap()
            .fix_spanning();
        assert_eq!(summarize(&table.cells), fixture.spanned_cells, "spans of {}", name);
    }
}

#[test]
fn test_spanned_row_lengths() {
    let expected: [(&str, &[usize]); 3] = [
        ("testcase01", &[3, 4, 4, 4, 4, 3, 3, 3, 3, 3, 3]),
        ("testcase02", &[3, 4, 4, 6, 4, 6, 8, 7]),
        ("testcase03", &[3, 4, 4, 4, 6, 6, 5]),
    ];
    for (name, lengths) in expected {
        let fixture = Fixture::load(name);
        let table = TableBuilder::new(&fixture.report)
            .build(&fixture.params.layout())
            .unwrap()
            .fix_spanning();
        let actual: Vec<usize> = table.cells.iter().map(Vec::len).collect();
        assert_eq!(actual, lengths, "{}", name);
    }
}

#[test]
fn test_fix_spanning_is_idempotent() {
    let fixture = Fixture::load("testcase02");
    let once = TableBuilder::new(&fixture.report)
        .build(&fixture.params.layout())
        .unwrap()
        .fix_spanning();
    let twice = once.clone().fix_spanning();
    assert_eq!(once, twice);
    assert!(twice.spanning_fixed);
}

#[test]
fn test_coordinates_survive_span_fixing() {
    let fixture = Fixture::load("testcase02");
    let table = TableBuilder::new(&fixture.report)
        .build(&fixture.params.layout())
        .unwrap()
        .fix_spanning();
    let exp2 = table.find_cell(1, 6).unwrap();
    assert_eq!(exp2.label.to_string(), "exp2");
    assert_eq!(exp2.col_span, 2);
    assert!(table.find_cell(1, 7).is_none());
    for row in &table.cells {
        assert!(row.windows(2).all(|w| w[0].col < w[1].col));
    }
}
