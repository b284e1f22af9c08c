//! FILENAME: core/report-data/src/report.rs
//! Pivot report payload.
//!
//! A report is a flat list of data points, each addressed by an x
//! coordinate (column index element), a y coordinate (row index element)
//! and a z attribute (which metric the value belongs to). The x and y
//! indices describe the full set of coordinates the table lays out.

use crate::attribute::{AttrValue, Attribute, IndexElement};
use crate::error::Result;
use crate::index::Index;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// DATA POINT
// ============================================================================

/// One metric value of one experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDataPoint {
    /// Column coordinate.
    pub x: IndexElement,
    /// Row coordinate.
    pub y: IndexElement,
    /// The metric this value belongs to.
    pub z: Attribute,
    /// Id of the run that produced the value.
    pub record_id: i64,
    pub record_value: AttrValue,
}

impl ReportDataPoint {
    pub fn new(
        x: IndexElement,
        y: IndexElement,
        z: Attribute,
        record_id: i64,
        record_value: AttrValue,
    ) -> Self {
        ReportDataPoint {
            x,
            y,
            z,
            record_id,
            record_value,
        }
    }
}

// ============================================================================
// Z-VALUES
// ============================================================================

/// The metrics shown in a report, optionally tagged with a group id.
/// Serialized as a `[group, [attr, ...]]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(Option<i64>, Vec<Attribute>)",
    into = "(Option<i64>, Vec<Attribute>)"
)]
pub struct ZValueGroup {
    pub group: Option<i64>,
    pub attrs: Vec<Attribute>,
}

impl From<(Option<i64>, Vec<Attribute>)> for ZValueGroup {
    fn from((group, attrs): (Option<i64>, Vec<Attribute>)) -> Self {
        ZValueGroup { group, attrs }
    }
}

impl From<ZValueGroup> for (Option<i64>, Vec<Attribute>) {
    fn from(value: ZValueGroup) -> Self {
        (value.group, value.attrs)
    }
}

// ============================================================================
// REPORT DATA
// ============================================================================

/// A complete pivot report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ReportDataWire")]
pub struct ReportData {
    pub data: Vec<ReportDataPoint>,
    /// Column dimension trees. Accepts a single tree or a list on input.
    #[serde(rename = "xindex")]
    pub x_index: Vec<Index>,
    /// Row dimension trees. Accepts a single tree or a list on input.
    #[serde(rename = "yindex")]
    pub y_index: Vec<Index>,
    /// Metric groups. A payload without them gets a single `null` group
    /// holding the distinct `z` attributes of the data.
    pub zvalues: Vec<ZValueGroup>,
}

#[derive(Deserialize)]
struct ReportDataWire {
    data: Vec<ReportDataPoint>,
    #[serde(rename = "xindex", deserialize_with = "one_or_many")]
    x_index: Vec<Index>,
    #[serde(rename = "yindex", deserialize_with = "one_or_many")]
    y_index: Vec<Index>,
    #[serde(default)]
    zvalues: Vec<ZValueGroup>,
}

impl From<ReportDataWire> for ReportData {
    fn from(wire: ReportDataWire) -> Self {
        let zvalues = if wire.zvalues.is_empty() {
            derive_zvalues(&wire.data)
        } else {
            wire.zvalues
        };
        ReportData {
            data: wire.data,
            x_index: wire.x_index,
            y_index: wire.y_index,
            zvalues,
        }
    }
}

/// Distinct `z` attributes of `data` in order of first appearance, as one
/// ungrouped entry. Empty data has no groups.
fn derive_zvalues(data: &[ReportDataPoint]) -> Vec<ZValueGroup> {
    let mut attrs: Vec<Attribute> = Vec::new();
    for point in data {
        if !attrs.contains(&point.z) {
            attrs.push(point.z.clone());
        }
    }
    if attrs.is_empty() {
        Vec::new()
    } else {
        vec![ZValueGroup { group: None, attrs }]
    }
}

impl ReportData {
    /// Report whose metrics are taken from `data`.
    pub fn new(data: Vec<ReportDataPoint>, x_index: Vec<Index>, y_index: Vec<Index>) -> Self {
        let zvalues = derive_zvalues(&data);
        ReportData {
            data,
            x_index,
            y_index,
            zvalues,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let report: ReportData = serde_json::from_str(json)?;
        debug!(
            "Deserialized report: {} data points, {} x trees, {} y trees, {} z groups",
            report.data.len(),
            report.x_index.len(),
            report.y_index.len(),
            report.zvalues.len()
        );
        Ok(report)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The metrics of this report in display order: every group's
    /// attributes flattened. A metric listed in two groups takes two slots.
    pub fn z_attributes(&self) -> Vec<&Attribute> {
        self.zvalues.iter().flat_map(|group| group.attrs.iter()).collect()
    }

    /// Display labels of `z_attributes`.
    pub fn z_labels(&self) -> Vec<String> {
        self.z_attributes().into_iter().map(Attribute::label).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "data": [
            {"record_id": 2, "record_value": 0.72, "x": ["pyserini", "fuzzy"],
             "y": ["wt250"], "z": ["aggregated_primitive_outputs", "mrr"]},
            {"record_id": 3, "record_value": null, "x": ["pyserini", "fuzzy"],
             "y": ["wt250"], "z": ["aggregated_primitive_outputs", "recall"]},
            {"record_id": 4, "record_value": 0.5, "x": ["pyserini", "fuzzy"],
             "y": ["wt250"], "z": ["aggregated_primitive_outputs", "mrr"]}
        ],
        "xindex": {"attr": ["params", "cg_method"], "children": [["pyserini", [
            {"attr": ["params", "pyserini", "query_types"], "children": [["fuzzy", []]]}
        ]]]},
        "yindex": [{"attr": ["params", "dataset"], "children": [["wt250", []]]}]
    }"#;

    #[test]
    fn test_from_json_accepts_single_and_list_indices() {
        let report = ReportData::from_json(SAMPLE).unwrap();
        assert_eq!(report.data.len(), 3);
        assert_eq!(report.x_index.len(), 1);
        assert_eq!(report.y_index.len(), 1);
        assert_eq!(report.x_index[0].size(), 1);
        assert_eq!(report.data[1].record_value, AttrValue::Null);
        assert_eq!(report.data[0].x.key(), "pyserini.fuzzy");
    }

    #[test]
    fn test_z_labels_derived_from_data() {
        let report = ReportData::from_json(SAMPLE).unwrap();
        assert_eq!(report.zvalues.len(), 1);
        assert_eq!(report.zvalues[0].group, None);
        assert_eq!(report.z_labels(), vec!["mrr", "recall"]);
    }

    #[test]
    fn test_new_derives_zvalues_from_data() {
        let loaded = ReportData::from_json(SAMPLE).unwrap();
        let report = ReportData::new(loaded.data.clone(), loaded.x_index.clone(), Vec::new());
        assert_eq!(report.zvalues, loaded.zvalues);

        let empty = ReportData::new(Vec::new(), Vec::new(), Vec::new());
        assert!(empty.zvalues.is_empty());
        assert!(empty.z_labels().is_empty());
    }

    #[test]
    fn test_derived_zvalues_survive_serialization() {
        let report = ReportData::from_json(SAMPLE).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["zvalues"],
            serde_json::json!([[null, [["aggregated_primitive_outputs", "mrr"], ["aggregated_primitive_outputs", "recall"]]]])
        );
        let reloaded = ReportData::from_value(json).unwrap();
        assert_eq!(reloaded.zvalues, report.zvalues);
    }

    #[test]
    fn test_z_labels_from_declared_zvalues() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["zvalues"] = serde_json::json!([
            [null, [["aggregated_primitive_outputs", "recall"]]],
            [1, [["aggregated_primitive_outputs", "mrr"], ["aggregated_primitive_outputs", "recall"]]]
        ]);
        let report = ReportData::from_value(value).unwrap();
        assert_eq!(report.zvalues.len(), 2);
        assert_eq!(report.zvalues[1].group, Some(1));
        assert_eq!(report.z_labels(), vec!["recall", "mrr", "recall"]);
    }

    #[test]
    fn test_metric_shared_by_two_groups_keeps_both_slots() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["zvalues"] = serde_json::json!([
            [1, [["out", "mrr"]]],
            [2, [["out", "mrr"]]]
        ]);
        let report = ReportData::from_value(value).unwrap();
        assert_eq!(report.z_labels(), vec!["mrr", "mrr"]);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(ReportData::from_json(r#"{"data": []}"#).is_err());
        assert!(ReportData::from_json("not json").is_err());
    }
}
