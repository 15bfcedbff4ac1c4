//! Rendered DynamoDB expressions.

use std::collections::BTreeMap;

use crate::document::Document;

/// An expression string together with its placeholder maps.
///
/// Attribute names always go through `#` placeholders and values through `:`
/// placeholders, so field names never clash with reserved words.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub expression: String,
    pub names: BTreeMap<String, String>,
    pub values: Document,
}
