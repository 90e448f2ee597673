use std::path::Path;

use log::info;

use crate::models::{EvaluationRecord, EvaluationReport};
use crate::utils::MrzEvalError;

const CSV_HEADER: &str = "country,filename,status,expectedMRZ,recognizedMRZ";

/// Render the report in the delimited export format: one line per record,
/// status `Matched` / `Mismatched` / `Failed: <message>`.
pub fn to_csv_string(report: &EvaluationReport) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in &report.records {
        out.push_str(&record_line(record));
        out.push('\n');
    }
    out
}

fn record_line(record: &EvaluationRecord) -> String {
    let status = match &record.failure {
        // Commas would shift the columns, so they become spaces
        Some(message) => format!("Failed: {}", message.replace(',', " ")),
        None if record.is_match => "Matched".to_string(),
        None => "Mismatched".to_string(),
    };
    format!(
        "{},{},{},{},{}",
        record.group_label,
        record.filename,
        status,
        quote_mrz(record.expected_raw.as_deref()),
        quote_mrz(record.detected_raw.as_deref()),
    )
}

/// Quote an MRZ column, swapping inner quotes for apostrophes.
fn quote_mrz(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or_default().replace('"', "'"))
}

/// Write the CSV export to disk.
pub fn write_csv<P: AsRef<Path>>(report: &EvaluationReport, path: P) -> Result<(), MrzEvalError> {
    let path = path.as_ref();
    std::fs::write(path, to_csv_string(report))?;
    info!("Wrote {} records to {}", report.records.len(), path.display());
    Ok(())
}
