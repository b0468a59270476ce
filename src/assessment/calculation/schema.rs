use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoring artifact driving automatic indicator validation.
///
/// Persisted as JSON alongside the indicator definition; the engine treats it
/// as read-only input. Intra-group logic is configurable (AND/OR), groups are
/// always AND-combined at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSchema {
    pub condition_groups: Vec<ConditionGroup>,
    pub output_status_on_pass: OutputStatus,
    pub output_status_on_fail: OutputStatus,
}

impl CalculationSchema {
    /// Save-time invariant: at least one group, and no group without rules.
    pub fn is_saveable(&self) -> bool {
        !self.condition_groups.is_empty()
            && self.condition_groups.iter().all(|group| !group.rules.is_empty())
    }
}

/// A set of rules combined by one logical operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub const fn label(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Status assigned to the indicator once the schema resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputStatus {
    Pass,
    Fail,
}

impl OutputStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

/// A single comparison against one submitted field (or, for checklist rules,
/// a set of checklist item fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_type: RuleKind,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Comparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_field_ids: Vec<String>,
}

/// Closed set of rule types the authoring UI can persist. Anything else is a
/// deserialization error, surfaced at authoring time rather than evaluation
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    MatchValue,
    PercentageThreshold,
    CountThreshold,
    CurrencyThreshold,
    AllItemsRequired,
    AnyItemRequired,
}

impl RuleKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MatchValue => "MATCH_VALUE",
            Self::PercentageThreshold => "PERCENTAGE_THRESHOLD",
            Self::CountThreshold => "COUNT_THRESHOLD",
            Self::CurrencyThreshold => "CURRENCY_THRESHOLD",
            Self::AllItemsRequired => "ALL_ITEMS_REQUIRED",
            Self::AnyItemRequired => "ANY_ITEM_REQUIRED",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparison operators, serialized with the spellings the authoring UI
/// persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<")]
    Lt,
}

impl Comparison {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Lt => "<",
        }
    }

    /// Exact floating-point comparison, matching the authoring UI preview.
    pub(crate) fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Ge => lhs >= rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Lt => lhs < rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
