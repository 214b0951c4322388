use crate::rules::policy::PolicyVerdict;
use crate::rules::ScanResult;

/// Render results as plain console output in scan order.
pub fn render(results: &[ScanResult], verdict: &PolicyVerdict) -> String {
    let mut output = String::new();

    if results.is_empty() {
        output.push_str(&format!(
            "\n  No matches found in {} package(s).\n\n",
            verdict.packages_scanned
        ));
        return output;
    }

    output.push_str(&format!(
        "\n  {} match(es) in {} package(s):\n\n",
        results.len(),
        verdict.packages_scanned
    ));

    for r in results {
        output.push_str(&format!(
            "  [{}] {}!/{}:{}\n",
            r.category, r.package, r.file, r.line_number
        ));
        output.push_str(&format!("           match: {}\n", r.matched));
        if r.domain_status.is_applicable() || !r.domain.is_empty() {
            output.push_str(&format!(
                "           domain: {} ({})\n",
                r.domain,
                if r.domain_status.is_applicable() {
                    r.domain_status.to_string()
                } else {
                    "n/a".into()
                }
            ));
        }
        output.push('\n');
    }

    let summary: Vec<String> = verdict
        .by_category
        .iter()
        .map(|(cat, n)| format!("{cat}: {n}"))
        .collect();
    let status = if verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!("  {}\n", summary.join(", ")));
    output.push_str(&format!(
        "  Result: {} ({} of {} result(s) after policy)\n\n",
        status, verdict.effective_results, verdict.total_results
    ));

    output
}
