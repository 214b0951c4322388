use crate::error::Result;
use crate::rules::policy::PolicyVerdict;
use crate::rules::ScanResult;

use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [ScanResult],
    verdict: &'a PolicyVerdict,
}

/// Render results as a JSON report.
pub fn render(results: &[ScanResult], verdict: &PolicyVerdict) -> Result<String> {
    let report = JsonReport { results, verdict };
    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::url_result;
    use crate::rules::policy::Policy;

    #[test]
    fn status_uses_report_text() {
        let results = vec![url_result()];
        let verdict = Policy::default().evaluate(&results, 1);
        let value: serde_json::Value = serde_json::from_str(&render(&results, &verdict).unwrap()).unwrap();
        assert_eq!(value["results"][0]["domain_status"], "Publicly Writable");
        assert_eq!(value["verdict"]["pass"], false);
    }
}
