use super::schema::{CalculationSchema, OutputStatus};

/// Maps the aggregate boolean result to the configured output status.
///
/// Inverted configurations (pass mapped to `Fail` for negatively-phrased
/// indicators) and degenerate ones (both statuses identical) are honored
/// verbatim; the resolver never second-guesses the authored mapping.
pub(crate) fn resolve(passed: bool, schema: &CalculationSchema) -> OutputStatus {
    if passed {
        schema.output_status_on_pass
    } else {
        schema.output_status_on_fail
    }
}
