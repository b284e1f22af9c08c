//! FILENAME: core/report-table/src/lib.rs
//! Report table engine.
//!
//! This crate turns the payloads of the `report-data` crate into renderable
//! tables: a pivot grid with merged headers for pivot reports, and a flat
//! grouped table for auto-table reports. Both carry per-cell summaries and
//! highlight colors; a renderer only has to walk the rows and emit cells.
//!
//! Layers:
//! - `definition`: Render options (how the user wants the table)
//! - `view`: Cells and tables (WHAT we display)
//! - `header`: Merged header blocks for index forests and attribute lists
//! - `engine`: Pivot table builder (HOW data points land in the grid)
//! - `impute`: Cell statistics and labels
//! - `highlight`: Gradient and pivot coloring
//! - `autotable`: Flat grouped tables, sorting included
//! - `inspect`: Cell roles, header clicks and per-cell data

pub mod definition;
pub mod view;
pub mod header;
pub mod engine;
pub mod impute;
pub mod highlight;
pub mod autotable;
pub mod inspect;
pub mod error;

pub use definition::*;
pub use view::*;
pub use error::{Result, TableError};
pub use engine::{
    apply_highlight, build_index_map, render_report, render_report_json, report_layout,
    Axis, IndexMap, ReportCell, ReportTable, TableBuilder,
};
pub use impute::{CellStats, NumericStats};
pub use highlight::{highlight, highlight_report};
pub use autotable::{render_autotable, AutoTable, AutoTableCell, CellData, GroupRange};
pub use inspect::{cell_role, inspect_cell, toggle_header_highlight, CellInspection, CellRole, ValueSummary};
