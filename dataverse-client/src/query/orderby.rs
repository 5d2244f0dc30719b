//! Ordering clauses for `$orderby`

use serde::{Deserialize, Serialize};

/// Sort direction of an [`OrderBy`] entry.
///
/// OData requires an explicit direction token, so unspecified directions
/// render as `asc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One `$orderby` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub attribute: String,
    #[serde(default)]
    pub order: Order,
}

impl OrderBy {
    pub fn new(attribute: impl Into<String>, order: Order) -> Self {
        Self {
            attribute: attribute.into(),
            order,
        }
    }

    /// Ascending order on the given attribute.
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Order::Asc)
    }

    /// Descending order on the given attribute.
    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Order::Desc)
    }

    /// Compile to the `attribute direction` fragment.
    pub fn to_odata(&self) -> String {
        format!("{} {}", self.attribute, self.order.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_attribute_and_direction() {
        assert_eq!(OrderBy::desc("foo").to_odata(), "foo desc");
        assert_eq!(OrderBy::asc("bar").to_odata(), "bar asc");
    }

    #[test]
    fn test_direction_defaults_to_asc() {
        let order: OrderBy = serde_json::from_str(r#"{"attribute": "foo"}"#).unwrap();
        assert_eq!(order.to_odata(), "foo asc");
    }
}
