use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{AssessmentStage, IndicatorDefinition, IndicatorId, ValidationReport};
use super::repository::{IndicatorRepository, RepositoryError};
use crate::assessment::calculation::{
    CalculationEngine, CalculationError, CalculationOutcome, CalculationSchema, FieldResponses,
};

/// Service composing the indicator registry and the calculation engine.
///
/// Validation at submission time, the authoring "Test Calculation" panel,
/// and batch re-validation all route through the same engine invocation;
/// there is no divergent preview path.
pub struct IndicatorValidationService<R> {
    repository: Arc<R>,
}

impl<R> IndicatorValidationService<R>
where
    R: IndicatorRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new indicator, enforcing the save-time structural
    /// invariant the authoring UI relies on.
    pub fn register(
        &self,
        definition: IndicatorDefinition,
    ) -> Result<(), ValidationServiceError> {
        ensure_saveable(&definition.calculation)?;
        let id = definition.id.clone();
        self.repository.insert(definition)?;
        info!(indicator = %id.0, "indicator registered");
        Ok(())
    }

    /// Replace a stored indicator definition, same invariant as `register`.
    pub fn update(
        &self,
        definition: IndicatorDefinition,
    ) -> Result<(), ValidationServiceError> {
        ensure_saveable(&definition.calculation)?;
        self.repository.update(definition)?;
        Ok(())
    }

    pub fn get(&self, id: &IndicatorId) -> Result<IndicatorDefinition, ValidationServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ValidationServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list(&self) -> Result<Vec<IndicatorDefinition>, ValidationServiceError> {
        Ok(self.repository.list()?)
    }

    /// Evaluate a stored indicator against submitted responses. Validation
    /// runs when an assessment is submitted; the stage on the report is
    /// display context, not a transition.
    pub fn validate(
        &self,
        id: &IndicatorId,
        responses: &FieldResponses,
    ) -> Result<ValidationReport, ValidationServiceError> {
        let definition = self.get(id)?;
        let outcome = CalculationEngine::new(definition.calculation).evaluate(responses)?;

        let rejected_field_ids = outcome
            .rejected_inputs()
            .iter()
            .map(|rule| rule.field_id.clone())
            .collect();

        Ok(ValidationReport {
            indicator_id: id.clone(),
            stage: AssessmentStage::Submitted,
            status: outcome.status,
            passed: outcome.passed,
            rejected_field_ids,
            outcome,
            validated_at: Utc::now(),
        })
    }

    /// Stateless test-panel evaluation of an unsaved schema. Deliberately
    /// the same code path as `validate`, so the preview an author trusts is
    /// the evaluation production performs.
    pub fn test_calculation(
        &self,
        schema: CalculationSchema,
        responses: &FieldResponses,
    ) -> Result<CalculationOutcome, CalculationError> {
        CalculationEngine::new(schema).evaluate(responses)
    }
}

fn ensure_saveable(schema: &CalculationSchema) -> Result<(), ValidationServiceError> {
    if schema.condition_groups.is_empty() {
        return Err(ValidationServiceError::SchemaWithoutGroups);
    }
    if let Some(index) = schema
        .condition_groups
        .iter()
        .position(|group| group.rules.is_empty())
    {
        return Err(ValidationServiceError::GroupWithoutRules { index });
    }
    Ok(())
}

/// Error raised by the indicator validation service.
#[derive(Debug, thiserror::Error)]
pub enum ValidationServiceError {
    #[error("calculation schema must contain at least one condition group")]
    SchemaWithoutGroups,
    #[error("condition group {index} contains no rules")]
    GroupWithoutRules { index: usize },
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
