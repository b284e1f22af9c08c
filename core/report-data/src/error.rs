//! FILENAME: core/report-data/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportDataError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid report payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, ReportDataError>;
