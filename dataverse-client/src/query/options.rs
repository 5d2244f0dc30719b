//! Query option shapes and their compilation to a query string

use serde::{Deserialize, Serialize};

use super::filters::Filter;
use super::orderby::OrderBy;
use crate::error::{Error, Result};

/// One navigation-property expansion with its own projected field list.
///
/// Expansions are single level: an expanded property carries a `$select` but
/// no nested filters or further expansions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expand {
    /// Navigation property to expand, e.g. "primarycontactid".
    pub attribute: String,
    /// Fields projected from the related entity.
    pub select: Vec<String>,
}

impl Expand {
    pub fn new<S: Into<String>>(
        attribute: impl Into<String>,
        select: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            select: select.into_iter().map(Into::into).collect(),
        }
    }

    fn to_odata(&self) -> String {
        format!("{}({})", self.attribute, select_clause(&self.select))
    }
}

/// Query options for single-record retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Fields to project, in output order. Empty means no `$select` clause.
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expands: Vec<Expand>,
}

impl QueryOptions {
    /// Compile to a query string with a leading `?`, or an empty string when
    /// no clause applies.
    pub fn to_query_string(&self) -> String {
        MultipleQueryOptions {
            select: self.select.clone(),
            expands: self.expands.clone(),
            ..Default::default()
        }
        .to_query_string()
    }
}

/// Query options for collection retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleQueryOptions {
    /// Fields to project, in output order. Empty means no `$select` clause.
    #[serde(default)]
    pub select: Vec<String>,
    /// Filter groups. Each group compiles to its own parenthesized expression
    /// and the groups are joined with `and`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<OrderBy>,
    /// Maximum record count. `None` and `Some(0)` both omit the clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expands: Vec<Expand>,
}

impl MultipleQueryOptions {
    /// Compile to a query string with a leading `?`, or an empty string when
    /// no clause applies.
    ///
    /// Clause order is fixed: `$select`, `$filter`, `$top`, `$expand`,
    /// `$orderby`. The order carries no OData meaning but is kept stable so
    /// compiled output is byte-for-byte reproducible.
    pub fn to_query_string(&self) -> String {
        let clauses = [
            select_clause(&self.select),
            filter_clause(&self.filters),
            top_clause(self.top),
            expand_clause(&self.expands),
            orderby_clause(&self.orders),
        ];

        let parts: Vec<&str> = clauses
            .iter()
            .map(String::as_str)
            .filter(|clause| !clause.is_empty())
            .collect();

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

fn select_clause(select: &[String]) -> String {
    if select.is_empty() {
        String::new()
    } else {
        format!("$select={}", select.join(","))
    }
}

fn filter_clause(filters: &[Filter]) -> String {
    if filters.is_empty() {
        String::new()
    } else {
        let compiled: Vec<String> = filters.iter().map(Filter::to_odata).collect();
        format!("$filter={}", compiled.join(" and "))
    }
}

fn top_clause(top: Option<u32>) -> String {
    match top {
        Some(n) if n > 0 => format!("$top={}", n),
        _ => String::new(),
    }
}

fn expand_clause(expands: &[Expand]) -> String {
    if expands.is_empty() {
        String::new()
    } else {
        let compiled: Vec<String> = expands.iter().map(Expand::to_odata).collect();
        format!("$expand={}", compiled.join(","))
    }
}

fn orderby_clause(orders: &[OrderBy]) -> String {
    if orders.is_empty() {
        String::new()
    } else {
        let compiled: Vec<String> = orders.iter().map(OrderBy::to_odata).collect();
        format!("$orderby={}", compiled.join(","))
    }
}

/// Options accepted by single-record retrieval: a structured query or a raw
/// pre-encoded query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrieveOptions {
    /// A pre-built query string. Must start with `?`; the caller is trusted to
    /// have encoded it correctly.
    Raw(String),
    Query(QueryOptions),
}

impl RetrieveOptions {
    /// Normalize to the query-string fragment appended to the resource path.
    pub fn to_query_string(&self) -> Result<String> {
        match self {
            Self::Raw(raw) => checked_raw_query(raw),
            Self::Query(options) => Ok(options.to_query_string()),
        }
    }
}

impl From<&str> for RetrieveOptions {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for RetrieveOptions {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<QueryOptions> for RetrieveOptions {
    fn from(options: QueryOptions) -> Self {
        Self::Query(options)
    }
}

/// Options accepted by collection retrieval: a structured query or a raw
/// pre-encoded query string (e.g. the next link of a previous page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrieveMultipleOptions {
    /// A pre-built query string. Must start with `?`; the caller is trusted to
    /// have encoded it correctly.
    Raw(String),
    Query(MultipleQueryOptions),
}

impl RetrieveMultipleOptions {
    /// Normalize to the query-string fragment appended to the resource path.
    pub fn to_query_string(&self) -> Result<String> {
        match self {
            Self::Raw(raw) => checked_raw_query(raw),
            Self::Query(options) => Ok(options.to_query_string()),
        }
    }
}

impl From<&str> for RetrieveMultipleOptions {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for RetrieveMultipleOptions {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<MultipleQueryOptions> for RetrieveMultipleOptions {
    fn from(options: MultipleQueryOptions) -> Self {
        Self::Query(options)
    }
}

fn checked_raw_query(raw: &str) -> Result<String> {
    if !raw.starts_with('?') {
        return Err(Error::InvalidQueryOptions(
            "query option must start with ?".to_string(),
        ));
    }
    Ok(raw.to_string())
}
