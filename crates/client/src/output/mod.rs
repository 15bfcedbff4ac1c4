//! Output formatting functions.

pub mod pretty;

use serde_json::{json, Number, Value};

use dynamap::{Document, Page};

use crate::cli::OutputFormat;

/// The result of a command, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// A single item lookup.
    Item(Option<Document>),
    /// One page of a query.
    Page(Page<Document>),
    /// Every item of a query.
    Items(Vec<Document>),
    /// New value of an incremented field.
    Counter { field: String, value: Option<Number> },
    /// Plain lines such as a table plan.
    Lines(Vec<String>),
    /// Confirmation of a write.
    Message(String),
}

impl Report {
    /// JSON form of the report.
    pub fn to_json(&self) -> Value {
        match self {
            Report::Item(item) => item.clone().map(Value::Object).unwrap_or(Value::Null),
            Report::Page(page) => json!({
                "items": page.items,
                "nextPage": page.next_page,
            }),
            Report::Items(items) => json!(items),
            Report::Counter { field, value } => {
                Value::Object(Document::from_iter([(field.clone(), json!(value))]))
            }
            Report::Lines(lines) => json!(lines),
            Report::Message(message) => json!({ "message": message }),
        }
    }
}

/// Format a report for output.
///
/// Returns `None` when there is nothing to print, which is the case for
/// confirmation messages under `--quiet`.
pub fn render(report: &Report, format: OutputFormat, quiet: bool) -> Option<String> {
    if quiet && matches!(report, Report::Message(_)) {
        return None;
    }
    Some(match format {
        OutputFormat::Json => report.to_json().to_string(),
        OutputFormat::Pretty => pretty::format_report(report),
    })
}
