//! Typed values for OData filter expressions

use serde::{Deserialize, Serialize};

/// A value carried by a filter condition.
///
/// Covers the scalar types the Web API accepts in `$filter` expressions, plus
/// lists for the query functions that take a value set (e.g. `Between`, `In`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Render the value as an OData literal for a comparison expression.
    ///
    /// Text is wrapped in single quotes. Embedded single quotes are not
    /// escaped, so text containing `'` must be pre-escaped by the caller.
    /// Numbers and booleans render bare. Lists render as `['10','20']` with
    /// every element quoted, even elements that started out numeric.
    pub fn odata_literal(&self) -> String {
        match self {
            Self::Text(text) => format!("'{}'", text),
            Self::List(values) => format!("[{}]", Self::quoted_elements(values)),
            other => other.raw_text(),
        }
    }

    /// The bare string form of the value, without any quoting.
    pub fn raw_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::List(values) => values
                .iter()
                .map(Self::raw_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Every element individually quoted and comma-joined, the form used both
    /// inside bracketed list literals and in `PropertyValues=[...]`.
    pub(crate) fn quoted_elements(values: &[FilterValue]) -> String {
        values
            .iter()
            .map(|value| format!("'{}'", value.raw_text()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_quoted() {
        assert_eq!(FilterValue::from("bar").odata_literal(), "'bar'");
    }

    #[test]
    fn test_numbers_and_booleans_are_bare() {
        assert_eq!(FilterValue::from(10).odata_literal(), "10");
        assert_eq!(FilterValue::from(2.5).odata_literal(), "2.5");
        assert_eq!(FilterValue::from(true).odata_literal(), "true");
    }

    #[test]
    fn test_list_elements_are_always_quoted() {
        // Numeric elements still render quoted inside a list literal.
        assert_eq!(
            FilterValue::from(vec![10, 20]).odata_literal(),
            "['10','20']"
        );
        assert_eq!(
            FilterValue::from(vec!["a", "b"]).odata_literal(),
            "['a','b']"
        );
    }

    #[test]
    fn test_raw_text_never_quotes() {
        assert_eq!(FilterValue::from("bar").raw_text(), "bar");
        assert_eq!(FilterValue::from(10).raw_text(), "10");
    }

    #[test]
    fn test_deserializes_from_bare_json_values() {
        let value: FilterValue = serde_json::from_str("\"bar\"").unwrap();
        assert_eq!(value, FilterValue::Text("bar".to_string()));

        let value: FilterValue = serde_json::from_str("[10, 20]").unwrap();
        assert_eq!(
            value,
            FilterValue::List(vec![FilterValue::Integer(10), FilterValue::Integer(20)])
        );
    }
}
