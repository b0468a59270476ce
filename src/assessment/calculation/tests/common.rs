use serde_json::Value;

use crate::assessment::calculation::{
    CalculationEngine, CalculationSchema, Comparison, ConditionGroup, FieldResponses,
    GroupOperator, OutputStatus, Rule, RuleKind,
};

pub(super) fn single_rule_schema(rule: Rule) -> CalculationSchema {
    grouped_schema(vec![ConditionGroup {
        operator: GroupOperator::And,
        rules: vec![rule],
    }])
}

pub(super) fn grouped_schema(condition_groups: Vec<ConditionGroup>) -> CalculationSchema {
    CalculationSchema {
        condition_groups,
        output_status_on_pass: OutputStatus::Pass,
        output_status_on_fail: OutputStatus::Fail,
    }
}

pub(super) fn engine(schema: CalculationSchema) -> CalculationEngine {
    CalculationEngine::new(schema)
}

pub(super) fn responses(entries: &[(&str, Value)]) -> FieldResponses {
    entries
        .iter()
        .map(|(field_id, value)| (field_id.to_string(), value.clone()))
        .collect()
}

pub(super) fn match_rule(field_id: &str, operator: Comparison, expected: &str) -> Rule {
    Rule {
        rule_type: RuleKind::MatchValue,
        field_id: field_id.to_string(),
        operator: Some(operator),
        expected_value: Some(expected.to_string()),
        case_insensitive: false,
        threshold: None,
        min_value: None,
        max_value: None,
        item_field_ids: Vec::new(),
    }
}

pub(super) fn threshold_rule(
    rule_type: RuleKind,
    field_id: &str,
    operator: Comparison,
    threshold: f64,
) -> Rule {
    Rule {
        rule_type,
        field_id: field_id.to_string(),
        operator: Some(operator),
        expected_value: None,
        case_insensitive: false,
        threshold: Some(threshold),
        min_value: None,
        max_value: None,
        item_field_ids: Vec::new(),
    }
}

pub(super) fn currency_rule(
    field_id: &str,
    threshold: f64,
    min_value: Option<f64>,
    max_value: Option<f64>,
) -> Rule {
    Rule {
        rule_type: RuleKind::CurrencyThreshold,
        field_id: field_id.to_string(),
        operator: None,
        expected_value: None,
        case_insensitive: false,
        threshold: Some(threshold),
        min_value,
        max_value,
        item_field_ids: Vec::new(),
    }
}

pub(super) fn checklist_rule(rule_type: RuleKind, field_id: &str, items: &[&str]) -> Rule {
    Rule {
        rule_type,
        field_id: field_id.to_string(),
        operator: None,
        expected_value: None,
        case_insensitive: false,
        threshold: None,
        min_value: None,
        max_value: None,
        item_field_ids: items.iter().map(|item| item.to_string()).collect(),
    }
}
