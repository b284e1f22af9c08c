//! FILENAME: core/report-table/src/error.rs

use crate::engine::Axis;
use report_data::ReportDataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Malformed report data: {axis} element '{element}' is not in the {axis} index")]
    UnknownIndexElement { axis: Axis, element: String },

    #[error(transparent)]
    Data(#[from] ReportDataError),
}

pub type Result<T> = std::result::Result<T, TableError>;
