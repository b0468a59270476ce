use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::calculation::{CalculationOutcome, CalculationSchema, OutputStatus};

/// Identifier wrapper for registered indicators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorId(pub String);

/// A single compliance criterion with its authored calculation schema.
///
/// The form schema that declares the referenced field ids lives outside this
/// service; the engine fails closed on dangling references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    pub id: IndicatorId,
    pub code: String,
    pub name: String,
    pub calculation: CalculationSchema,
}

/// Assessment lifecycle stage, carried on validation reports as display
/// context. Transitions are owned by the surrounding assessment workflow,
/// never by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    Draft,
    Submitted,
    InReview,
    Rework,
    AwaitingFinalValidation,
    Completed,
}

impl AssessmentStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::InReview => "IN_REVIEW",
            Self::Rework => "REWORK",
            Self::AwaitingFinalValidation => "AWAITING_FINAL_VALIDATION",
            Self::Completed => "COMPLETED",
        }
    }
}

/// Validation output for one indicator against one set of submitted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub indicator_id: IndicatorId,
    pub stage: AssessmentStage,
    pub status: OutputStatus,
    pub passed: bool,
    pub rejected_field_ids: Vec<String>,
    pub outcome: CalculationOutcome,
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn status_view(&self) -> ValidationStatusView {
        ValidationStatusView {
            indicator_id: self.indicator_id.clone(),
            stage: self.stage.label(),
            status: self.status.label(),
            passed: self.passed,
            rejected_field_ids: self.rejected_field_ids.clone(),
            validated_at: self.validated_at,
        }
    }
}

/// Sanitized summary of a validation for API responses that do not need the
/// full trace.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationStatusView {
    pub indicator_id: IndicatorId,
    pub stage: &'static str,
    pub status: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_field_ids: Vec<String>,
    pub validated_at: DateTime<Utc>,
}
