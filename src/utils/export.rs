//! CSV and JSON export of a finished run

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::core::runner::OperationResult;
use crate::core::BenchmarkReport;
use crate::error::Result;
use crate::utils::config::Settings;

/// One CSV row per operation result, header from the field names
pub fn write_operations_csv<W: Write>(results: &[OperationResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_json<W: Write>(report: &BenchmarkReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Write whichever exports the settings ask for
pub fn export_report(report: &BenchmarkReport, settings: &Settings) -> Result<()> {
    if let Some(path) = &settings.csv_export {
        write_operations_csv(&report.operations, create(path)?)?;
        info!(path = %path.display(), rows = report.operations.len(), "wrote CSV export");
    }
    if let Some(path) = &settings.json_export {
        let mut writer = create(path)?;
        write_report_json(report, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "wrote JSON export");
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::InstanceReuse;

    fn results() -> Vec<OperationResult> {
        vec![
            OperationResult {
                label: "Class creation".to_string(),
                iterations: 5_000,
                warmup: 100,
                total_elapsed_ns: 250_000,
                per_call_ns: 50.0,
                instance: InstanceReuse::PerIteration,
            },
            OperationResult {
                label: "String operations".to_string(),
                iterations: 1_000,
                warmup: 100,
                total_elapsed_ns: 90_000,
                per_call_ns: 90.0,
                instance: InstanceReuse::NotApplicable,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_operations_csv(&results(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "label,iterations,warmup,total_elapsed_ns,per_call_ns,instance"
        );
        assert_eq!(lines[1], "Class creation,5000,100,250000,50.0,per_iteration");
        assert_eq!(lines[2], "String operations,1000,100,90000,90.0,not_applicable");
    }
}
