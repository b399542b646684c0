//! Renderers mapping each [`DisplayStructure`] variant onto a
//! presentation-layer view.
//!
//! Each renderer is a pure transform and never fails: input that violates a
//! variant's invariants (an empty table, a comparison with no features)
//! renders as an empty view rather than an error. The terminal presenter in
//! [`crate::ui`] owns the actual text layout.

use serde_json::{Map, Value};

use crate::core::classify::{cell_text, DisplayStructure, FeatureRow};

/// Column header shown over the feature-name column of a comparison.
const FEATURE_HEADER: &str = "Feature";

/// Display-ready form of one bot message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageView {
    /// Literal text, no markup.
    Text(String),
    /// A header row plus zero or more cell rows.
    Grid(GridView),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl GridView {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Dispatches a classified structure to the matching renderer.
pub fn render(display: &DisplayStructure) -> MessageView {
    match display {
        DisplayStructure::Plain { text } => render_plain(text),
        DisplayStructure::Table { columns, rows } => MessageView::Grid(render_table(columns, rows)),
        DisplayStructure::Comparison {
            label_a,
            label_b,
            features,
        } => MessageView::Grid(render_comparison(label_a, label_b, features)),
    }
}

fn render_plain(text: &str) -> MessageView {
    MessageView::Text(text.to_string())
}

/// Headers come from the first row's columns only; a column that first
/// appears in a later row is dropped, and a cell missing from a later row
/// renders empty.
fn render_table(columns: &[String], rows: &[Map<String, Value>]) -> GridView {
    if rows.is_empty() {
        return GridView::default();
    }

    let headers = columns.iter().map(|name| capitalize_first(name)).collect();
    let rows = rows
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|name| record.get(name).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    GridView { headers, rows }
}

/// Three columns: feature name, then one column per compared record, labeled
/// with the mapping keys in their original order. Sentinel substitution has
/// already happened during classification.
fn render_comparison(label_a: &str, label_b: &str, features: &[FeatureRow]) -> GridView {
    let headers = vec![
        FEATURE_HEADER.to_string(),
        label_a.to_string(),
        label_b.to_string(),
    ];
    let rows = features
        .iter()
        .map(|feature| {
            vec![
                capitalize_first(&feature.name),
                feature.side_a.clone(),
                feature.side_b.clone(),
            ]
        })
        .collect();

    GridView { headers, rows }
}

/// Uppercases only the first character, leaving the rest of the label as the
/// service sent it.
fn capitalize_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
