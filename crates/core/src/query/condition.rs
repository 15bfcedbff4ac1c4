use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::expression::Expression;

const PARTITION_NAME: &str = "#key";
const PARTITION_VALUE: &str = ":key";
const SORT_NAME: &str = "#sort";
const SORT_VALUE: &str = ":sort";
const SORT_END_VALUE: &str = ":sort_end";

/// Direction in which a query walks the sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Value of `ScanIndexForward` for this order.
    pub fn is_forward(self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// Bound applied to the sort key of a query.
///
/// Independent of [`SortOrder`]: the condition selects which items match, the
/// order selects the direction they are returned in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    GreaterThan(String),
    LessThan(String),
    BeginsWith(String),
    /// Inclusive on both ends.
    Between(String, String),
}

impl SortCondition {
    /// Interprets a sort key value the way callers of the untyped API pass it.
    ///
    /// `"ASC"` selects items whose sort key is greater than the literal string
    /// `"ASC"`; any other value selects items whose sort key is less than that
    /// value. Prefer constructing the variant directly.
    pub fn from_hint(hint: &str) -> Self {
        if hint == "ASC" {
            SortCondition::GreaterThan(hint.to_string())
        } else {
            SortCondition::LessThan(hint.to_string())
        }
    }

    /// Evaluates the condition against a sort key value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            SortCondition::GreaterThan(bound) => value > bound.as_str(),
            SortCondition::LessThan(bound) => value < bound.as_str(),
            SortCondition::BeginsWith(prefix) => value.starts_with(prefix.as_str()),
            SortCondition::Between(low, high) => value >= low.as_str() && value <= high.as_str(),
        }
    }

    fn render(&self, expression: &mut Expression) -> String {
        let mut bind = |placeholder: &str, value: &str| {
            expression
                .values
                .insert(placeholder.to_string(), Value::String(value.to_string()));
        };
        match self {
            SortCondition::GreaterThan(bound) => {
                bind(SORT_VALUE, bound);
                format!("{SORT_NAME} > {SORT_VALUE}")
            }
            SortCondition::LessThan(bound) => {
                bind(SORT_VALUE, bound);
                format!("{SORT_NAME} < {SORT_VALUE}")
            }
            SortCondition::BeginsWith(prefix) => {
                bind(SORT_VALUE, prefix);
                format!("begins_with({SORT_NAME}, {SORT_VALUE})")
            }
            SortCondition::Between(low, high) => {
                bind(SORT_VALUE, low);
                bind(SORT_END_VALUE, high);
                format!("{SORT_NAME} BETWEEN {SORT_VALUE} AND {SORT_END_VALUE}")
            }
        }
    }
}

/// A condition on the sort key attribute of the queried key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeyCondition {
    pub attribute: String,
    pub condition: SortCondition,
}

/// Structured key condition of a query.
///
/// Executors either render it with [`KeyCondition::render`] or evaluate it
/// directly with [`KeyCondition::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub partition_key: String,
    pub partition_value: String,
    pub sort: Option<SortKeyCondition>,
}

impl KeyCondition {
    /// Renders the `KeyConditionExpression` and its placeholders.
    pub fn render(&self) -> Expression {
        let mut expression = Expression::default();
        expression
            .names
            .insert(PARTITION_NAME.to_string(), self.partition_key.clone());
        expression.values.insert(
            PARTITION_VALUE.to_string(),
            Value::String(self.partition_value.clone()),
        );

        let mut text = format!("{PARTITION_NAME} = {PARTITION_VALUE}");
        if let Some(sort) = &self.sort {
            expression
                .names
                .insert(SORT_NAME.to_string(), sort.attribute.clone());
            let clause = sort.condition.render(&mut expression);
            text.push_str(" AND ");
            text.push_str(&clause);
        }

        expression.expression = text;
        expression
    }

    /// Returns true if the document satisfies the key condition.
    pub fn matches(&self, document: &Document) -> bool {
        let partition_matches = document
            .get(&self.partition_key)
            .and_then(Value::as_str)
            .is_some_and(|value| value == self.partition_value);

        partition_matches
            && self.sort.as_ref().is_none_or(|sort| {
                document
                    .get(&sort.attribute)
                    .and_then(Value::as_str)
                    .is_some_and(|value| sort.condition.matches(value))
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn condition(sort: Option<SortCondition>) -> KeyCondition {
        KeyCondition {
            partition_key: "userId".to_string(),
            partition_value: "u1".to_string(),
            sort: sort.map(|condition| SortKeyCondition {
                attribute: "ts".to_string(),
                condition,
            }),
        }
    }

    #[test]
    fn test_render_partition_only() {
        let expression = condition(None).render();

        assert_eq!(expression.expression, "#key = :key");
        assert_eq!(expression.names.len(), 1);
        assert_eq!(expression.names["#key"], "userId");
        assert_eq!(Value::Object(expression.values), json!({ ":key": "u1" }));
    }

    #[test]
    fn test_render_greater_than() {
        let expression = condition(Some(SortCondition::GreaterThan("t1".to_string()))).render();

        assert_eq!(expression.expression, "#key = :key AND #sort > :sort");
        assert_eq!(expression.names["#sort"], "ts");
        assert_eq!(
            Value::Object(expression.values),
            json!({ ":key": "u1", ":sort": "t1" })
        );
    }

    #[test]
    fn test_render_between() {
        let expression = condition(Some(SortCondition::Between(
            "a".to_string(),
            "m".to_string(),
        )))
        .render();

        assert_eq!(
            expression.expression,
            "#key = :key AND #sort BETWEEN :sort AND :sort_end"
        );
        assert_eq!(
            Value::Object(expression.values),
            json!({ ":key": "u1", ":sort": "a", ":sort_end": "m" })
        );
    }

    #[test]
    fn test_render_begins_with() {
        let expression = condition(Some(SortCondition::BeginsWith("2024-".to_string()))).render();
        assert_eq!(
            expression.expression,
            "#key = :key AND begins_with(#sort, :sort)"
        );
    }

    #[test]
    fn test_from_hint_ascending_sentinel() {
        assert_eq!(
            SortCondition::from_hint("ASC"),
            SortCondition::GreaterThan("ASC".to_string())
        );
    }

    #[test]
    fn test_from_hint_other_value_is_upper_bound() {
        assert_eq!(
            SortCondition::from_hint("2024-06-01"),
            SortCondition::LessThan("2024-06-01".to_string())
        );
    }

    #[test]
    fn test_sort_condition_matches() {
        assert!(SortCondition::GreaterThan("b".to_string()).matches("c"));
        assert!(!SortCondition::GreaterThan("b".to_string()).matches("b"));
        assert!(SortCondition::LessThan("b".to_string()).matches("a"));
        assert!(SortCondition::BeginsWith("ab".to_string()).matches("abc"));
        assert!(SortCondition::Between("a".to_string(), "c".to_string()).matches("c"));
        assert!(!SortCondition::Between("a".to_string(), "c".to_string()).matches("d"));
    }

    #[test]
    fn test_key_condition_matches_document() {
        let key = condition(Some(SortCondition::LessThan("t5".to_string())));

        let matching = json!({ "userId": "u1", "ts": "t1" });
        let other_partition = json!({ "userId": "u2", "ts": "t1" });
        let out_of_range = json!({ "userId": "u1", "ts": "t9" });
        let missing_sort = json!({ "userId": "u1" });

        for (doc, expected) in [
            (matching, true),
            (other_partition, false),
            (out_of_range, false),
            (missing_sort, false),
        ] {
            let Value::Object(doc) = doc else { unreachable!() };
            assert_eq!(key.matches(&doc), expected);
        }
    }

    #[test]
    fn test_sort_order_default_is_ascending() {
        assert_eq!(SortOrder::default(), SortOrder::Asc);
        assert!(SortOrder::Asc.is_forward());
        assert!(!SortOrder::Desc.is_forward());
    }
}
