//! Indicator calculation rule engine.
//!
//! Evaluates nested condition groups against dynamically-typed submitted
//! form values and derives the indicator's output status. The engine is a
//! pure function of (schema, responses): no I/O, no shared state, identical
//! inputs always produce identical results, so the authoring test panel, the
//! submission-time validation pass, and the batch re-validation job all call
//! the same `CalculationEngine::evaluate`.

mod resolver;
mod rules;
pub mod schema;
mod value;

#[cfg(test)]
mod tests;

pub use schema::{
    CalculationSchema, Comparison, ConditionGroup, GroupOperator, OutputStatus, Rule, RuleKind,
};
pub use value::FieldValue;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw submitted form values, keyed by field id.
pub type FieldResponses = BTreeMap<String, Value>;

/// Stateless evaluator applying one calculation schema to submitted values.
pub struct CalculationEngine {
    schema: CalculationSchema,
}

impl CalculationEngine {
    pub fn new(schema: CalculationSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &CalculationSchema {
        &self.schema
    }

    /// Evaluate every condition group and resolve the output status.
    ///
    /// Groups combine with implicit AND regardless of their internal
    /// operator. A group with no rules evaluates vacuously true; a schema
    /// with no groups is refused outright, since the authoring layer never
    /// saves one.
    pub fn evaluate(&self, responses: &FieldResponses) -> Result<CalculationOutcome, CalculationError> {
        if self.schema.condition_groups.is_empty() {
            return Err(CalculationError::EmptySchema);
        }

        let mut groups = Vec::with_capacity(self.schema.condition_groups.len());
        for group in &self.schema.condition_groups {
            let mut outcomes = Vec::with_capacity(group.rules.len());
            for rule in &group.rules {
                outcomes.push(rules::evaluate_rule(rule, responses)?);
            }

            let passed = if outcomes.is_empty() {
                true
            } else {
                match group.operator {
                    GroupOperator::And => outcomes.iter().all(|rule| rule.verdict.satisfied()),
                    GroupOperator::Or => outcomes.iter().any(|rule| rule.verdict.satisfied()),
                }
            };

            groups.push(GroupOutcome {
                operator: group.operator,
                passed,
                rules: outcomes,
            });
        }

        let passed = groups.iter().all(|group| group.passed);
        let status = resolver::resolve(passed, &self.schema);

        Ok(CalculationOutcome {
            passed,
            status,
            groups,
        })
    }
}

/// Per-rule outcome. `Rejected` is reserved for input the rule refuses to
/// judge (a currency amount above the configured maximum); it is an input
/// validity problem, distinct from compliance failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    Passed,
    Considered,
    Failed,
    Rejected,
}

impl RuleVerdict {
    /// Whether the rule counts as satisfied for group aggregation.
    /// Considered is conditional compliance and still satisfies.
    pub const fn satisfied(self) -> bool {
        matches!(self, Self::Passed | Self::Considered)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Considered => "considered",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
        }
    }
}

/// Single rule result with the resolved comparison value, kept for the
/// authoring test panel and audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub field_id: String,
    pub rule_type: RuleKind,
    pub verdict: RuleVerdict,
    pub resolved: FieldValue,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub operator: GroupOperator,
    pub passed: bool,
    pub rules: Vec<RuleOutcome>,
}

/// Engine output: overall boolean, resolved status, and the full trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub passed: bool,
    pub status: OutputStatus,
    pub groups: Vec<GroupOutcome>,
}

impl CalculationOutcome {
    /// Rules whose input was rejected outright, for surfacing as validation
    /// problems rather than compliance failures.
    pub fn rejected_inputs(&self) -> Vec<&RuleOutcome> {
        self.groups
            .iter()
            .flat_map(|group| &group.rules)
            .filter(|rule| rule.verdict == RuleVerdict::Rejected)
            .collect()
    }

    pub fn has_rejected_inputs(&self) -> bool {
        !self.rejected_inputs().is_empty()
    }
}

/// Contract violations in the authored schema. Data-shape problems in the
/// submitted values never raise; they degrade to conservative fail results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("calculation schema has no condition groups")]
    EmptySchema,
    #[error("{rule_type} rule on '{field_id}' is missing required operand '{operand}'")]
    MissingOperand {
        rule_type: RuleKind,
        field_id: String,
        operand: &'static str,
    },
    #[error("{rule_type} rule on '{field_id}' does not support operator '{operator}'")]
    UnsupportedComparison {
        rule_type: RuleKind,
        field_id: String,
        operator: Comparison,
    },
}
