use std::collections::BTreeMap;

use serde_json::Value;

use super::schema::{Comparison, Rule, RuleKind};
use super::value::FieldValue;
use super::{CalculationError, RuleOutcome, RuleVerdict};

pub(crate) fn evaluate_rule(
    rule: &Rule,
    responses: &BTreeMap<String, Value>,
) -> Result<RuleOutcome, CalculationError> {
    match rule.rule_type {
        RuleKind::MatchValue => match_value(rule, responses),
        RuleKind::PercentageThreshold | RuleKind::CountThreshold => {
            numeric_threshold(rule, responses)
        }
        RuleKind::CurrencyThreshold => currency_threshold(rule, responses),
        RuleKind::AllItemsRequired | RuleKind::AnyItemRequired => checklist(rule, responses),
    }
}

fn match_value(
    rule: &Rule,
    responses: &BTreeMap<String, Value>,
) -> Result<RuleOutcome, CalculationError> {
    let operator = require_operator(rule, &[Comparison::Eq, Comparison::Ne])?;
    let expected = rule
        .expected_value
        .as_deref()
        .ok_or_else(|| missing_operand(rule, "expected_value"))?;

    let resolved = FieldValue::text(responses.get(&rule.field_id));
    let outcome = match &resolved {
        FieldValue::Text(actual) => {
            let equal = if rule.case_insensitive {
                actual.eq_ignore_ascii_case(expected)
            } else {
                actual == expected
            };
            let matched = match operator {
                Comparison::Ne => !equal,
                _ => equal,
            };
            let verdict = verdict_from(matched);
            let detail = format!("submitted '{actual}' {operator} expected '{expected}'");
            (verdict, detail)
        }
        _ => fail_missing(rule),
    };

    Ok(rule_outcome(rule, resolved, outcome))
}

fn numeric_threshold(
    rule: &Rule,
    responses: &BTreeMap<String, Value>,
) -> Result<RuleOutcome, CalculationError> {
    let operator = require_operator(
        rule,
        &[Comparison::Ge, Comparison::Gt, Comparison::Le, Comparison::Lt],
    )?;
    let threshold = rule
        .threshold
        .ok_or_else(|| missing_operand(rule, "threshold"))?;

    let resolved = FieldValue::number(responses.get(&rule.field_id));
    let outcome = match resolved {
        FieldValue::Number(actual) => {
            let verdict = verdict_from(operator.compare(actual, threshold));
            let qualifier = if verdict.satisfied() { "satisfies" } else { "misses" };
            let detail = format!("{actual} {qualifier} {operator} {threshold}");
            (verdict, detail)
        }
        _ => fail_missing(rule),
    };

    Ok(rule_outcome(rule, resolved, outcome))
}

/// Three-band currency semantics. The ordering matters: an amount above the
/// configured maximum is rejected as invalid input before any banding, and
/// the Considered band only exists when both `min_value` and `threshold` are
/// configured.
fn currency_threshold(
    rule: &Rule,
    responses: &BTreeMap<String, Value>,
) -> Result<RuleOutcome, CalculationError> {
    let threshold = rule
        .threshold
        .ok_or_else(|| missing_operand(rule, "threshold"))?;

    let resolved = FieldValue::number(responses.get(&rule.field_id));
    let outcome = match resolved {
        FieldValue::Number(amount) => match rule.max_value {
            Some(max) if amount > max => (
                RuleVerdict::Rejected,
                format!("amount {amount} exceeds configured maximum {max}"),
            ),
            _ => band_amount(amount, threshold, rule.min_value),
        },
        _ => fail_missing(rule),
    };

    Ok(rule_outcome(rule, resolved, outcome))
}

fn band_amount(amount: f64, threshold: f64, min_value: Option<f64>) -> (RuleVerdict, String) {
    if amount >= threshold {
        return (
            RuleVerdict::Passed,
            format!("amount {amount} meets threshold {threshold}"),
        );
    }

    match min_value {
        Some(min) if amount >= min => (
            RuleVerdict::Considered,
            format!("amount {amount} within considered band [{min}, {threshold})"),
        ),
        Some(min) => (
            RuleVerdict::Failed,
            format!("amount {amount} below minimum {min}"),
        ),
        None => (
            RuleVerdict::Failed,
            format!("amount {amount} below threshold {threshold}"),
        ),
    }
}

fn checklist(
    rule: &Rule,
    responses: &BTreeMap<String, Value>,
) -> Result<RuleOutcome, CalculationError> {
    if rule.item_field_ids.is_empty() {
        return Err(missing_operand(rule, "item_field_ids"));
    }

    let total = rule.item_field_ids.len();
    let checked = rule
        .item_field_ids
        .iter()
        .filter(|item| FieldValue::affirmative(responses.get(item.as_str())))
        .count();

    let required = match rule.rule_type {
        RuleKind::AnyItemRequired => 1,
        _ => total,
    };

    let verdict = verdict_from(checked >= required);
    let detail = format!("{checked}/{total} checklist items affirmed, {required} required");

    Ok(rule_outcome(
        rule,
        FieldValue::Number(checked as f64),
        (verdict, detail),
    ))
}

fn require_operator(rule: &Rule, supported: &[Comparison]) -> Result<Comparison, CalculationError> {
    let operator = rule
        .operator
        .ok_or_else(|| missing_operand(rule, "operator"))?;
    if !supported.contains(&operator) {
        return Err(CalculationError::UnsupportedComparison {
            rule_type: rule.rule_type,
            field_id: rule.field_id.clone(),
            operator,
        });
    }
    Ok(operator)
}

fn missing_operand(rule: &Rule, operand: &'static str) -> CalculationError {
    CalculationError::MissingOperand {
        rule_type: rule.rule_type,
        field_id: rule.field_id.clone(),
        operand,
    }
}

const fn verdict_from(passed: bool) -> RuleVerdict {
    if passed {
        RuleVerdict::Passed
    } else {
        RuleVerdict::Failed
    }
}

// Missing data is conservatively non-compliant, never an error.
fn fail_missing(rule: &Rule) -> (RuleVerdict, String) {
    (
        RuleVerdict::Failed,
        format!("no usable value submitted for '{}'", rule.field_id),
    )
}

fn rule_outcome(
    rule: &Rule,
    resolved: FieldValue,
    (verdict, detail): (RuleVerdict, String),
) -> RuleOutcome {
    RuleOutcome {
        field_id: rule.field_id.clone(),
        rule_type: rule.rule_type,
        verdict,
        resolved,
        detail,
    }
}
