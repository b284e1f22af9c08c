//! FILENAME: core/report-data/src/attribute.rs
//! Attribute paths, attribute values and index elements.
//!
//! An `Attribute` names one dimension of a report, e.g.
//! `["params", "cg_method"]`. The first segment is a scope tag
//! (`params`, `aggregated_primitive_outputs`, ...) and is dropped when the
//! attribute is shown to a user.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// ATTRIBUTE
// ============================================================================

/// A dotted attribute path. Equality, ordering and hashing use the joined
/// canonical string, so `["a", "b"]` and `["a.b"]` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Attribute {
    path: Vec<String>,
    /// Cached `path.join(".")`.
    value: String,
}

impl Attribute {
    /// Creates an attribute from its path segments. Segments are kept as
    /// given; a segment may itself contain dots.
    pub fn new(path: Vec<String>) -> Self {
        let value = path.join(".");
        Attribute { path, value }
    }

    /// Parses a dotted string, splitting on every `.`.
    pub fn from_string(s: &str) -> Self {
        Attribute::new(s.split('.').map(str::to_string).collect())
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The canonical dotted form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Inserts a segment at the front of the path.
    pub fn prepend(&mut self, name: &str) -> &mut Self {
        self.value = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.value)
        };
        self.path.insert(0, name.to_string());
        self
    }

    /// Adds a segment at the end of the path.
    pub fn append(&mut self, name: &str) -> &mut Self {
        if self.path.is_empty() {
            self.value = name.to_string();
        } else {
            self.value.push('.');
            self.value.push_str(name);
        }
        self.path.push(name.to_string());
        self
    }

    /// Display label: the path without its scope segment. A single-segment
    /// path is shown as is.
    pub fn label(&self) -> String {
        match self.path.len() {
            0 => String::new(),
            1 => self.path[0].clone(),
            _ => self.path[1..].join("."),
        }
    }

    /// True when this attribute is nested strictly below `other`.
    pub fn is_child_of(&self, other: &Attribute) -> bool {
        self.value.len() > other.value.len()
            && self.value.starts_with(other.value.as_str())
            && self.value.as_bytes()[other.value.len()] == b'.'
    }
}

impl From<Vec<String>> for Attribute {
    fn from(path: Vec<String>) -> Self {
        Attribute::new(path)
    }
}

impl From<Attribute> for Vec<String> {
    fn from(attr: Attribute) -> Self {
        attr.path
    }
}

impl From<&[&str]> for Attribute {
    fn from(path: &[&str]) -> Self {
        Attribute::new(path.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Attribute {
    fn from(path: [&str; N]) -> Self {
        Attribute::from(&path[..])
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ============================================================================
// ATTRIBUTE VALUE
// ============================================================================

/// A value an attribute takes in one experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, AttrValue::Number(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Text used when the value is one segment of an index element key.
    /// Null contributes an empty segment.
    pub fn key_segment(&self) -> Cow<'_, str> {
        match self {
            AttrValue::Null => Cow::Borrowed(""),
            AttrValue::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl Default for AttrValue {
    fn default() -> Self {
        AttrValue::Null
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => f.write_str("null"),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

// ============================================================================
// INDEX ELEMENT
// ============================================================================

/// A coordinate along one axis: the sequence of values picked at each
/// level of an index, root first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexElement {
    values: SmallVec<[AttrValue; 4]>,
}

impl IndexElement {
    pub fn new(values: impl IntoIterator<Item = AttrValue>) -> Self {
        IndexElement {
            values: values.into_iter().collect(),
        }
    }

    pub fn values(&self) -> &[AttrValue] {
        &self.values
    }

    pub fn push(&mut self, value: AttrValue) {
        self.values.push(value);
    }

    /// Canonical key: values joined by `.`.
    pub fn key(&self) -> String {
        let mut key = String::new();
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                key.push('.');
            }
            key.push_str(&value.key_segment());
        }
        key
    }
}

impl fmt::Display for IndexElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
