//! Filter conditions and filter groups for `$filter` expressions

use serde::{Deserialize, Serialize};

use super::value::FilterValue;

/// Standard OData comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOperator {
    /// The lowercase token used in the compiled expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }
}

/// Dataverse query functions usable in place of a comparison operator.
///
/// These compile to the namespaced call form
/// `Microsoft.Dynamics.CRM.<Function>(PropertyName='...')` rather than an
/// infix expression. The set covers the date, fiscal-period and hierarchy
/// predicates of the Web API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryFunction {
    Above,
    AboveOrEqual,
    Between,
    Contains,
    ContainValues,
    DoesNotContainValues,
    EqualBusinessId,
    EqualUserId,
    EqualUserLanguage,
    EqualUserOrUserHierarchy,
    EqualUserOrHierarchyAndTeams,
    EqualUserOrUserTeams,
    EqualUserTeams,
    In,
    InFiscalPeriod,
    InFiscalPeriodAndYear,
    InFiscalYear,
    InOrAfterFiscalPeriodAndYear,
    InOrBeforeFiscalPeriodAndYear,
    Last7Days,
    LastFiscalPeriod,
    LastFiscalYear,
    LastMonth,
    LastWeek,
    LastXDays,
    LastXFiscalPeriods,
    LastXFiscalYears,
    LastXHours,
    LastXMonths,
    LastXWeeks,
    LastXYears,
    LastYear,
    Next7Days,
    NextFiscalPeriod,
    NextFiscalYear,
    NextMonth,
    NextWeek,
    NextXDays,
    NextXFiscalPeriods,
    NextXFiscalYears,
    NextXHours,
    NextXMonths,
    NextXWeeks,
    NextXYears,
    NextYear,
    NotBetween,
    NotEqualBusinessId,
    NotEqualUserId,
    NotIn,
    NotUnder,
    OlderThanXDays,
    OlderThanXHours,
    OlderThanXMinutes,
    OlderThanXMonths,
    OlderThanXWeeks,
    OlderThanXYears,
    On,
    OnOrAfter,
    OnOrBefore,
    ThisFiscalPeriod,
    ThisFiscalYear,
    ThisMonth,
    ThisWeek,
    ThisYear,
    Today,
    Tomorrow,
    Under,
    UnderOrEqual,
    Yesterday,
}

impl QueryFunction {
    /// Function name as it appears after the `Microsoft.Dynamics.CRM.` prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Above => "Above",
            Self::AboveOrEqual => "AboveOrEqual",
            Self::Between => "Between",
            Self::Contains => "Contains",
            Self::ContainValues => "ContainValues",
            Self::DoesNotContainValues => "DoesNotContainValues",
            Self::EqualBusinessId => "EqualBusinessId",
            Self::EqualUserId => "EqualUserId",
            Self::EqualUserLanguage => "EqualUserLanguage",
            Self::EqualUserOrUserHierarchy => "EqualUserOrUserHierarchy",
            Self::EqualUserOrHierarchyAndTeams => "EqualUserOrHierarchyAndTeams",
            Self::EqualUserOrUserTeams => "EqualUserOrUserTeams",
            Self::EqualUserTeams => "EqualUserTeams",
            Self::In => "In",
            Self::InFiscalPeriod => "InFiscalPeriod",
            Self::InFiscalPeriodAndYear => "InFiscalPeriodAndYear",
            Self::InFiscalYear => "InFiscalYear",
            Self::InOrAfterFiscalPeriodAndYear => "InOrAfterFiscalPeriodAndYear",
            Self::InOrBeforeFiscalPeriodAndYear => "InOrBeforeFiscalPeriodAndYear",
            Self::Last7Days => "Last7Days",
            Self::LastFiscalPeriod => "LastFiscalPeriod",
            Self::LastFiscalYear => "LastFiscalYear",
            Self::LastMonth => "LastMonth",
            Self::LastWeek => "LastWeek",
            Self::LastXDays => "LastXDays",
            Self::LastXFiscalPeriods => "LastXFiscalPeriods",
            Self::LastXFiscalYears => "LastXFiscalYears",
            Self::LastXHours => "LastXHours",
            Self::LastXMonths => "LastXMonths",
            Self::LastXWeeks => "LastXWeeks",
            Self::LastXYears => "LastXYears",
            Self::LastYear => "LastYear",
            Self::Next7Days => "Next7Days",
            Self::NextFiscalPeriod => "NextFiscalPeriod",
            Self::NextFiscalYear => "NextFiscalYear",
            Self::NextMonth => "NextMonth",
            Self::NextWeek => "NextWeek",
            Self::NextXDays => "NextXDays",
            Self::NextXFiscalPeriods => "NextXFiscalPeriods",
            Self::NextXFiscalYears => "NextXFiscalYears",
            Self::NextXHours => "NextXHours",
            Self::NextXMonths => "NextXMonths",
            Self::NextXWeeks => "NextXWeeks",
            Self::NextXYears => "NextXYears",
            Self::NextYear => "NextYear",
            Self::NotBetween => "NotBetween",
            Self::NotEqualBusinessId => "NotEqualBusinessId",
            Self::NotEqualUserId => "NotEqualUserId",
            Self::NotIn => "NotIn",
            Self::NotUnder => "NotUnder",
            Self::OlderThanXDays => "OlderThanXDays",
            Self::OlderThanXHours => "OlderThanXHours",
            Self::OlderThanXMinutes => "OlderThanXMinutes",
            Self::OlderThanXMonths => "OlderThanXMonths",
            Self::OlderThanXWeeks => "OlderThanXWeeks",
            Self::OlderThanXYears => "OlderThanXYears",
            Self::On => "On",
            Self::OnOrAfter => "OnOrAfter",
            Self::OnOrBefore => "OnOrBefore",
            Self::ThisFiscalPeriod => "ThisFiscalPeriod",
            Self::ThisFiscalYear => "ThisFiscalYear",
            Self::ThisMonth => "ThisMonth",
            Self::ThisWeek => "ThisWeek",
            Self::ThisYear => "ThisYear",
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Under => "Under",
            Self::UnderOrEqual => "UnderOrEqual",
            Self::Yesterday => "Yesterday",
        }
    }
}

/// Effective operator of a condition.
///
/// Either a plain comparison or a namespaced query function; the two compile
/// to different expression shapes, so the dispatch is explicit instead of a
/// runtime membership check on operator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operator {
    Comparison(ComparisonOperator),
    Function(QueryFunction),
}

impl Default for Operator {
    /// Conditions without an explicit operator compare with `eq`.
    fn default() -> Self {
        Self::Comparison(ComparisonOperator::Eq)
    }
}

impl From<ComparisonOperator> for Operator {
    fn from(operator: ComparisonOperator) -> Self {
        Self::Comparison(operator)
    }
}

impl From<QueryFunction> for Operator {
    fn from(function: QueryFunction) -> Self {
        Self::Function(function)
    }
}

/// One attribute/operator/value triple of a filter group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Logical name of the attribute, e.g. "lastname".
    pub attribute: String,
    /// Omitted operators resolve to `eq` during deserialization.
    #[serde(default)]
    pub operator: Operator,
    /// Absent for zero-argument query functions like `Today`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl Condition {
    /// Create a condition with an explicit operator and value.
    pub fn new(
        attribute: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    /// Create an equality condition.
    pub fn equals(attribute: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(attribute, ComparisonOperator::Eq, value)
    }

    /// Create a zero-argument query function condition, e.g. `Today`.
    pub fn function(attribute: impl Into<String>, function: QueryFunction) -> Self {
        Self {
            attribute: attribute.into(),
            operator: Operator::Function(function),
            value: None,
        }
    }

    /// Compile to the textual fragment used inside a filter group.
    pub fn to_odata(&self) -> String {
        match self.operator {
            Operator::Comparison(operator) => {
                let literal = match &self.value {
                    Some(value) => value.odata_literal(),
                    None => "null".to_string(),
                };
                format!("{} {} {}", self.attribute, operator.as_str(), literal)
            }
            Operator::Function(function) => {
                // Function arguments are always quoted, even numeric ones.
                let value_suffix = match &self.value {
                    None => String::new(),
                    Some(FilterValue::List(values)) => {
                        format!(",PropertyValues=[{}]", FilterValue::quoted_elements(values))
                    }
                    Some(value) => format!(",PropertyValue='{}'", value.raw_text()),
                };
                format!(
                    "Microsoft.Dynamics.CRM.{}(PropertyName='{}'{})",
                    function.name(),
                    self.attribute,
                    value_suffix
                )
            }
        }
    }
}

/// Boolean connective joining the conditions of a single filter group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    And,
    Or,
    Not,
}

impl FilterType {
    /// The lowercase token used between conditions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

/// One parenthesized group of filter conditions.
///
/// Groups do not nest. `MultipleQueryOptions::filters` is the only level of
/// grouping, and every group listed there is combined with `and` regardless of
/// the connective used inside each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Connective between this group's conditions. Defaults to `and`.
    #[serde(rename = "type", default)]
    pub filter_type: FilterType,
    pub conditions: Vec<Condition>,
}

impl Filter {
    /// Create a group with an explicit connective.
    pub fn new(filter_type: FilterType, conditions: Vec<Condition>) -> Self {
        Self {
            filter_type,
            conditions,
        }
    }

    /// Create an `and` group.
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self::new(FilterType::And, conditions)
    }

    /// Create an `or` group.
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self::new(FilterType::Or, conditions)
    }

    /// Compile to a parenthesized boolean expression.
    ///
    /// An empty group compiles to `()`.
    pub fn to_odata(&self) -> String {
        let joined = self
            .conditions
            .iter()
            .map(Condition::to_odata)
            .collect::<Vec<_>>()
            .join(&format!(" {} ", self.filter_type.as_str()));
        format!("({})", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_with_text_value() {
        let filter = Filter::and(vec![Condition::equals("foo", "bar")]);
        assert_eq!(filter.to_odata(), "(foo eq 'bar')");
    }

    #[test]
    fn test_comparison_with_numeric_value() {
        let filter = Filter::and(vec![Condition::new("foo", ComparisonOperator::Gt, 10)]);
        assert_eq!(filter.to_odata(), "(foo gt 10)");
    }

    #[test]
    fn test_function_with_value_list() {
        let filter = Filter::and(vec![Condition::new(
            "foo",
            QueryFunction::Between,
            vec![10, 20],
        )]);
        assert_eq!(
            filter.to_odata(),
            "(Microsoft.Dynamics.CRM.Between(PropertyName='foo',PropertyValues=['10','20']))"
        );
    }

    #[test]
    fn test_function_without_value() {
        let filter = Filter::and(vec![Condition::function("foo", QueryFunction::Tomorrow)]);
        assert_eq!(
            filter.to_odata(),
            "(Microsoft.Dynamics.CRM.Tomorrow(PropertyName='foo'))"
        );
    }

    #[test]
    fn test_function_scalar_value_is_quoted() {
        // Scalar function arguments are quoted even when numeric, unlike the
        // comparison path.
        let filter = Filter::and(vec![Condition::new("foo", QueryFunction::LastXDays, 7)]);
        assert_eq!(
            filter.to_odata(),
            "(Microsoft.Dynamics.CRM.LastXDays(PropertyName='foo',PropertyValue='7'))"
        );
    }

    #[test]
    fn test_or_connective_joins_conditions() {
        let filter = Filter::or(vec![
            Condition::equals("firstname", "Ann"),
            Condition::equals("firstname", "Bob"),
        ]);
        assert_eq!(
            filter.to_odata(),
            "(firstname eq 'Ann' or firstname eq 'Bob')"
        );
    }

    #[test]
    fn test_empty_group_compiles_to_bare_parentheses() {
        assert_eq!(Filter::default().to_odata(), "()");
    }

    #[test]
    fn test_operator_defaults_to_eq() {
        let condition: Condition =
            serde_json::from_str(r#"{"attribute": "foo", "value": "bar"}"#).unwrap();
        assert_eq!(condition.to_odata(), "foo eq 'bar'");
    }

    #[test]
    fn test_operator_deserializes_from_plain_names() {
        let condition: Condition =
            serde_json::from_str(r#"{"attribute": "foo", "operator": "Between", "value": [1, 2]}"#)
                .unwrap();
        assert_eq!(
            condition.operator,
            Operator::Function(QueryFunction::Between)
        );

        let condition: Condition =
            serde_json::from_str(r#"{"attribute": "foo", "operator": "le", "value": 3}"#).unwrap();
        assert_eq!(
            condition.operator,
            Operator::Comparison(ComparisonOperator::Le)
        );
    }
}
