use crate::error::{Result, ScanError};
use crate::rules::{ScanResult, REPORT_COLUMNS};

/// Render results as CSV with the report column header. Context newlines
/// are written as a literal `\n` so each result stays on one record line.
pub fn render(results: &[ScanResult]) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;
    for r in results {
        let mut row = r.row();
        row[9] = row[9].replace('\n', "\\n");
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ScanError::Output(format!("csv flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ScanError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::{spawn_result, url_result};

    #[test]
    fn header_and_escaped_context() {
        let out = render(&[spawn_result(), url_result()]).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Package,File,Line,Category,Match,Address,Domain/IP,Domain Status,URI,Context"
        );
        assert_eq!(
            lines.next().unwrap(),
            r"Demo.mpackage,scripts/init.lua,2,Process Spawning,os.execute(,,,,,local cmd = x\nos.execute(cmd)\nreturn"
        );
        assert!(lines.next().unwrap().contains(",Publicly Writable,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_results_still_have_header() {
        assert_eq!(render(&[]).unwrap().lines().count(), 1);
    }
}
