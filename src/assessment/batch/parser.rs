use std::collections::BTreeMap;
use std::io::Read;

use serde_json::Value;

/// One CSV row of submitted responses.
#[derive(Debug)]
pub(crate) struct SubmissionRow {
    pub(crate) submission_id: String,
    pub(crate) responses: BTreeMap<String, Value>,
}

/// Parses a wide-format export: first column is `submission_id`, every
/// remaining header is a field id. Blank cells are treated as not submitted,
/// so the engine's fail-closed path applies downstream.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<SubmissionRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let submission_id = record.get(0).unwrap_or_default().to_string();

        let mut responses = BTreeMap::new();
        for (field_id, cell) in headers.iter().zip(record.iter()).skip(1) {
            if cell.is_empty() {
                continue;
            }
            responses.insert(field_id.to_string(), Value::String(cell.to_string()));
        }

        rows.push(SubmissionRow {
            submission_id,
            responses,
        });
    }

    Ok(rows)
}
