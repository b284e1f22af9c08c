//! FILENAME: core/report-data/src/lib.rs
//! Report data model for experiment reports.
//!
//! This crate holds the serializable payloads that the report server sends
//! to a renderer: attribute paths, hierarchical indices, and the flat list
//! of data points that the table engine places into a grid. It performs no
//! layout; see the `report-table` crate for that.
//!
//! Layers:
//! - `attribute`: Attribute paths, attribute values and index elements
//! - `index`: Hierarchical dimension trees (what the axes of a report ARE)
//! - `report`: Pivot report payload (data points + x/y indices + z-values)
//! - `autotable`: Flat "auto table" payload (grouped rows of records)

pub mod attribute;
pub mod autotable;
pub mod error;
pub mod index;
pub mod report;

pub use attribute::{AttrValue, Attribute, IndexElement};
pub use autotable::{AutoTableGroup, AutoTableGroupData, AutoTableReportData, AutoTableRow};
pub use error::{ReportDataError, Result};
pub use index::Index;
pub use report::{ReportData, ReportDataPoint, ZValueGroup};
