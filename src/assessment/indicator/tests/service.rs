use serde_json::json;

use super::common::*;
use crate::assessment::calculation::{OutputStatus, RuleVerdict};
use crate::assessment::indicator::repository::{IndicatorRepository, RepositoryError};
use crate::assessment::indicator::{IndicatorId, ValidationServiceError};

#[test]
fn register_persists_a_saveable_definition() {
    let (service, repository) = build_service();
    service
        .register(budget_indicator("ind-001"))
        .expect("registration succeeds");

    let stored = repository
        .fetch(&IndicatorId("ind-001".to_string()))
        .expect("repo fetch")
        .expect("definition present");
    assert_eq!(stored.code, "FA-1.1");
}

#[test]
fn register_refuses_schema_without_groups() {
    let (service, _) = build_service();
    let mut definition = budget_indicator("ind-002");
    definition.calculation.condition_groups.clear();

    match service.register(definition) {
        Err(ValidationServiceError::SchemaWithoutGroups) => {}
        other => panic!("expected save-time refusal, got {other:?}"),
    }
}

#[test]
fn register_refuses_group_without_rules() {
    let (service, _) = build_service();
    let mut definition = budget_indicator("ind-003");
    definition.calculation.condition_groups[0].rules.clear();

    match service.register(definition) {
        Err(ValidationServiceError::GroupWithoutRules { index: 0 }) => {}
        other => panic!("expected save-time refusal, got {other:?}"),
    }
}

#[test]
fn duplicate_registration_surfaces_conflict() {
    let (service, _) = build_service();
    service
        .register(budget_indicator("ind-004"))
        .expect("first registration succeeds");

    match service.register(budget_indicator("ind-004")) {
        Err(ValidationServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn update_replaces_a_stored_definition() {
    let (service, repository) = build_service();
    service
        .register(budget_indicator("ind-010"))
        .expect("registration succeeds");

    let mut revised = budget_indicator("ind-010");
    revised.name = "Approved and posted annual budget".to_string();
    service.update(revised).expect("update succeeds");

    let stored = repository
        .fetch(&IndicatorId("ind-010".to_string()))
        .expect("repo fetch")
        .expect("definition present");
    assert_eq!(stored.name, "Approved and posted annual budget");
}

#[test]
fn update_of_unknown_indicator_is_not_found() {
    let (service, _) = build_service();
    match service.update(budget_indicator("ghost")) {
        Err(ValidationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn validate_reports_the_resolved_status_and_trace() {
    let (service, _) = build_service();
    service
        .register(budget_indicator("ind-005"))
        .expect("registration succeeds");

    let report = service
        .validate(
            &IndicatorId("ind-005".to_string()),
            &responses(&[
                ("annual_budget", json!(600000.0)),
                ("report_submitted", json!("yes")),
            ]),
        )
        .expect("validation succeeds");

    assert!(report.passed);
    assert_eq!(report.status, OutputStatus::Pass);
    assert!(report.rejected_field_ids.is_empty());
    assert_eq!(report.outcome.groups.len(), 1);
    assert_eq!(report.status_view().stage, "SUBMITTED");
}

#[test]
fn validate_surfaces_rejected_inputs_separately() {
    let (service, _) = build_service();
    service
        .register(budget_indicator("ind-006"))
        .expect("registration succeeds");

    let report = service
        .validate(
            &IndicatorId("ind-006".to_string()),
            &responses(&[
                ("annual_budget", json!(1500000.0)),
                ("report_submitted", json!("yes")),
            ]),
        )
        .expect("rejected input is a result, not an error");

    assert!(!report.passed);
    assert_eq!(report.rejected_field_ids, vec!["annual_budget".to_string()]);
    assert_eq!(
        report.outcome.groups[0].rules[0].verdict,
        RuleVerdict::Rejected
    );
}

#[test]
fn validate_unknown_indicator_is_not_found() {
    let (service, _) = build_service();
    match service.validate(&IndicatorId("ghost".to_string()), &responses(&[])) {
        Err(ValidationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn test_calculation_matches_validation_semantics() {
    let (service, _) = build_service();
    service
        .register(budget_indicator("ind-007"))
        .expect("registration succeeds");

    let values = responses(&[
        ("annual_budget", json!("300000")),
        ("report_submitted", json!("yes")),
    ]);

    let preview = service
        .test_calculation(budget_schema(), &values)
        .expect("test calculation succeeds");
    let report = service
        .validate(&IndicatorId("ind-007".to_string()), &values)
        .expect("validation succeeds");

    // The test panel must show exactly what production evaluation decides.
    assert_eq!(preview, report.outcome);
    assert_eq!(
        preview.groups[0].rules[0].verdict,
        RuleVerdict::Considered
    );
}
