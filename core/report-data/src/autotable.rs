//! FILENAME: core/report-data/src/autotable.rs
//! "Auto table" payload: rows pre-grouped by the server.
//!
//! Unlike a pivot report there is no x/y index here. Each group carries its
//! own attribute headers (the columns that identify a row) and a list of
//! rows; every table shares one list of value headers (the metrics).

use crate::attribute::{AttrValue, Attribute};
use crate::error::{ReportDataError, Result};
use serde::{Deserialize, Serialize};

/// One record of an auto table group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTableRow {
    pub record_id: i64,
    /// Values of the group's attribute headers, in header order.
    pub headers: Vec<AttrValue>,
    /// Values of the report's value headers, in header order.
    pub values: Vec<AttrValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTableGroupData {
    pub attr_headers: Vec<Attribute>,
    pub rows: Vec<AutoTableRow>,
}

/// A named group. Serialized as a `[name, {attrHeaders, rows}]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(String, AutoTableGroupData)",
    into = "(String, AutoTableGroupData)"
)]
pub struct AutoTableGroup {
    pub name: String,
    pub data: AutoTableGroupData,
}

impl From<(String, AutoTableGroupData)> for AutoTableGroup {
    fn from((name, data): (String, AutoTableGroupData)) -> Self {
        AutoTableGroup { name, data }
    }
}

impl From<AutoTableGroup> for (String, AutoTableGroupData) {
    fn from(group: AutoTableGroup) -> Self {
        (group.name, group.data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTableReportData {
    pub groups: Vec<AutoTableGroup>,
    pub value_headers: Vec<Attribute>,
}

impl AutoTableReportData {
    /// Parses and validates a payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let report: AutoTableReportData = serde_json::from_str(json)?;
        report.validate()?;
        Ok(report)
    }

    /// Checks that every row has one header value per attribute header and
    /// one value per value header.
    pub fn validate(&self) -> Result<()> {
        for group in &self.groups {
            for row in &group.data.rows {
                if row.headers.len() != group.data.attr_headers.len() {
                    return Err(ReportDataError::InvalidPayload(format!(
                        "record {} in group '{}' has {} header values, expected {}",
                        row.record_id,
                        group.name,
                        row.headers.len(),
                        group.data.attr_headers.len()
                    )));
                }
                if row.values.len() != self.value_headers.len() {
                    return Err(ReportDataError::InvalidPayload(format!(
                        "record {} in group '{}' has {} values, expected {}",
                        row.record_id,
                        group.name,
                        row.values.len(),
                        self.value_headers.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "groups": [
            ["baseline", {
                "attrHeaders": [["params", "method"], ["params", "k"]],
                "rows": [
                    {"recordId": 1, "headers": ["bm25", 10], "values": [0.5, 0.9]},
                    {"recordId": 2, "headers": ["bm25", null], "values": [0.4, null]}
                ]
            }]
        ],
        "valueHeaders": [["metrics", "mrr"], ["metrics", "recall"]]
    }"#;

    #[test]
    fn test_from_json() {
        let report = AutoTableReportData::from_json(SAMPLE).unwrap();
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, "baseline");
        assert_eq!(report.groups[0].data.rows[1].headers[1], AttrValue::Null);
        assert_eq!(report.value_headers[1].label(), "recall");
    }

    #[test]
    fn test_validate_rejects_short_rows() {
        let json = SAMPLE.replace(r#""values": [0.4, null]"#, r#""values": [0.4]"#);
        let err = AutoTableReportData::from_json(&json).unwrap_err();
        assert!(matches!(err, ReportDataError::InvalidPayload(_)));
    }
}
