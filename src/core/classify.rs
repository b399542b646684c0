//! Shape-based classification of assistant response payloads.
//!
//! The assistant service answers every query with a JSON payload whose shape,
//! not an explicit tag, determines how it should be presented: a bare string,
//! an array of records, or a two-entry object whose values are both records.
//! [`classify`] maps each of those shapes onto one [`DisplayStructure`]
//! variant and rejects everything else.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cell value substituted when a comparison side is missing a feature or
/// carries a falsy value for it.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of a two-way comparison: a feature name and the cell shown for
/// each side, with the [`NOT_AVAILABLE`] sentinel already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub name: String,
    pub side_a: String,
    pub side_b: String,
}

impl FeatureRow {
    pub fn new(
        name: impl Into<String>,
        side_a: impl Into<String>,
        side_b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            side_a: side_a.into(),
            side_b: side_b.into(),
        }
    }
}

/// The classified, renderer-ready form of a bot response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayStructure {
    Plain {
        text: String,
    },
    /// `columns` holds the first row's field names in the order the service
    /// sent them; it is empty when there are no rows.
    Table {
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
    Comparison {
        label_a: String,
        label_b: String,
        features: Vec<FeatureRow>,
    },
}

impl DisplayStructure {
    pub fn plain(text: impl Into<String>) -> Self {
        DisplayStructure::Plain { text: text.into() }
    }
}

/// Payload shape did not match any of the three recognized variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Top-level value was a number, boolean, or null.
    UnsupportedShape(&'static str),
    /// A sequence element was not a record.
    MixedSequence,
    /// A mapping payload did not have exactly two entries.
    NotAComparison(usize),
    /// A mapping entry's value was not itself a record.
    SideNotARecord(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::UnsupportedShape(kind) => {
                write!(f, "unsupported top-level payload shape: {kind}")
            }
            ClassifyError::MixedSequence => {
                write!(f, "sequence payload contains a non-record element")
            }
            ClassifyError::NotAComparison(len) => {
                write!(f, "mapping payload has {len} entries, expected exactly 2")
            }
            ClassifyError::SideNotARecord(label) => {
                write!(f, "comparison entry '{label}' is not a record")
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Classifies a raw response payload into exactly one [`DisplayStructure`]
/// variant.
///
/// This is a closed, total function over the three accepted shapes; any
/// other shape reports a [`ClassifyError`] rather than falling through to a
/// default presentation.
pub fn classify(payload: &Value) -> Result<DisplayStructure, ClassifyError> {
    match payload {
        Value::String(text) => Ok(DisplayStructure::plain(text.clone())),
        Value::Array(items) => classify_sequence(items),
        Value::Object(entries) => classify_comparison(entries),
        Value::Null => Err(ClassifyError::UnsupportedShape("null")),
        Value::Bool(_) => Err(ClassifyError::UnsupportedShape("boolean")),
        Value::Number(_) => Err(ClassifyError::UnsupportedShape("number")),
    }
}

/// Any sequence of records is tabular, whatever its field names. An empty
/// sequence yields an empty table.
fn classify_sequence(items: &[Value]) -> Result<DisplayStructure, ClassifyError> {
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(record) => rows.push(record.clone()),
            _ => return Err(ClassifyError::MixedSequence),
        }
    }

    // Header derivation looks at the first row only; columns present in
    // later rows but absent from the first are dropped at render time.
    let columns = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    Ok(DisplayStructure::Table { columns, rows })
}

fn classify_comparison(entries: &Map<String, Value>) -> Result<DisplayStructure, ClassifyError> {
    if entries.len() != 2 {
        return Err(ClassifyError::NotAComparison(entries.len()));
    }

    let mut sides = entries.iter();
    let (label_a, value_a) = sides.next().expect("mapping has two entries");
    let (label_b, value_b) = sides.next().expect("mapping has two entries");

    let record_a = value_a
        .as_object()
        .ok_or_else(|| ClassifyError::SideNotARecord(label_a.clone()))?;
    let record_b = value_b
        .as_object()
        .ok_or_else(|| ClassifyError::SideNotARecord(label_b.clone()))?;

    // Feature order: all of A's fields first, then whatever B adds.
    let mut features = Vec::with_capacity(record_a.len());
    for name in record_a.keys() {
        features.push(FeatureRow::new(
            name.clone(),
            side_cell(record_a, name),
            side_cell(record_b, name),
        ));
    }
    for name in record_b.keys() {
        if !record_a.contains_key(name) {
            features.push(FeatureRow::new(
                name.clone(),
                side_cell(record_a, name),
                side_cell(record_b, name),
            ));
        }
    }

    Ok(DisplayStructure::Comparison {
        label_a: label_a.clone(),
        label_b: label_b.clone(),
        features,
    })
}

/// Any falsy value, not only a missing one, collapses to the sentinel.
fn side_cell(record: &Map<String, Value>, name: &str) -> String {
    match record.get(name) {
        Some(value) if !is_falsy(value) => cell_text(value),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Textual form of a scalar cell. Strings pass through unquoted; nested
/// structures fall back to compact JSON.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
