//! Batch re-validation of submitted responses against one calculation
//! schema, fed from a CSV export. Uses the same engine invocation as the
//! HTTP validation path.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::assessment::calculation::{
    CalculationEngine, CalculationError, CalculationSchema, OutputStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum BatchRevalidationError {
    #[error("failed to read responses export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid responses CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not evaluate calculation schema: {0}")]
    Calculation(#[from] CalculationError),
}

/// Per-submission result row.
#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub submission_id: String,
    pub status: OutputStatus,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_field_ids: Vec<String>,
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub rejected_inputs: usize,
    pub rows: Vec<RowResult>,
}

pub struct BatchRevalidator;

impl BatchRevalidator {
    pub fn from_path<P: AsRef<Path>>(
        schema: &CalculationSchema,
        path: P,
    ) -> Result<BatchReport, BatchRevalidationError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(schema, file)
    }

    pub fn from_reader<R: Read>(
        schema: &CalculationSchema,
        reader: R,
    ) -> Result<BatchReport, BatchRevalidationError> {
        let engine = CalculationEngine::new(schema.clone());
        let mut report = BatchReport::default();

        for row in parser::parse_rows(reader)? {
            let outcome = engine.evaluate(&row.responses)?;
            let rejected_field_ids: Vec<String> = outcome
                .rejected_inputs()
                .iter()
                .map(|rule| rule.field_id.clone())
                .collect();

            report.total += 1;
            if outcome.passed {
                report.passed += 1;
            } else {
                report.failed += 1;
            }
            if !rejected_field_ids.is_empty() {
                report.rejected_inputs += 1;
            }

            report.rows.push(RowResult {
                submission_id: row.submission_id,
                status: outcome.status,
                passed: outcome.passed,
                rejected_field_ids,
            });
        }

        Ok(report)
    }
}
