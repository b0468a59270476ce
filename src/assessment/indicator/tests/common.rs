use std::sync::Arc;

use serde_json::Value;

use crate::assessment::calculation::{
    CalculationSchema, Comparison, ConditionGroup, FieldResponses, GroupOperator, OutputStatus,
    Rule, RuleKind,
};
use crate::assessment::indicator::repository::InMemoryIndicatorRepository;
use crate::assessment::indicator::router::indicator_router;
use crate::assessment::indicator::service::IndicatorValidationService;
use crate::assessment::indicator::{IndicatorDefinition, IndicatorId};

pub(super) fn budget_schema() -> CalculationSchema {
    CalculationSchema {
        condition_groups: vec![ConditionGroup {
            operator: GroupOperator::And,
            rules: vec![
                Rule {
                    rule_type: RuleKind::CurrencyThreshold,
                    field_id: "annual_budget".to_string(),
                    operator: None,
                    expected_value: None,
                    case_insensitive: false,
                    threshold: Some(500000.0),
                    min_value: Some(100000.0),
                    max_value: Some(1000000.0),
                    item_field_ids: Vec::new(),
                },
                Rule {
                    rule_type: RuleKind::MatchValue,
                    field_id: "report_submitted".to_string(),
                    operator: Some(Comparison::Eq),
                    expected_value: Some("yes".to_string()),
                    case_insensitive: false,
                    threshold: None,
                    min_value: None,
                    max_value: None,
                    item_field_ids: Vec::new(),
                },
            ],
        }],
        output_status_on_pass: OutputStatus::Pass,
        output_status_on_fail: OutputStatus::Fail,
    }
}

pub(super) fn budget_indicator(id: &str) -> IndicatorDefinition {
    IndicatorDefinition {
        id: IndicatorId(id.to_string()),
        code: "FA-1.1".to_string(),
        name: "Approved annual budget".to_string(),
        calculation: budget_schema(),
    }
}

pub(super) fn responses(entries: &[(&str, Value)]) -> FieldResponses {
    entries
        .iter()
        .map(|(field_id, value)| (field_id.to_string(), value.clone()))
        .collect()
}

pub(super) fn build_service() -> (
    IndicatorValidationService<InMemoryIndicatorRepository>,
    Arc<InMemoryIndicatorRepository>,
) {
    let repository = Arc::new(InMemoryIndicatorRepository::default());
    let service = IndicatorValidationService::new(repository.clone());
    (service, repository)
}

pub(super) fn build_router() -> axum::Router {
    let (service, _) = build_service();
    indicator_router(Arc::new(service))
}
