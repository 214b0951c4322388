use std::collections::BTreeSet;

use crate::error::Result;
use crate::rules::ScanResult;

use serde_json::{json, Value};

/// Render results as SARIF 2.1.0, one rule per category.
pub fn render(results: &[ScanResult], target_name: &str) -> Result<String> {
    let rules: Vec<Value> = results
        .iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|category| {
            json!({
                "id": rule_id(category),
                "name": category,
                "shortDescription": { "text": category },
                "defaultConfiguration": { "level": "warning" },
            })
        })
        .collect();

    let sarif_results: Vec<Value> = results
        .iter()
        .map(|r| {
            let mut result = json!({
                "ruleId": rule_id(&r.category),
                "level": "warning",
                "message": { "text": format!("{}: {}", r.category, r.matched) },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": format!("{}!/{}", r.package, r.file),
                        },
                        "region": {
                            "startLine": r.line_number,
                            "snippet": { "text": r.context },
                        },
                    },
                }],
            });
            if !r.domain.is_empty() {
                result["properties"] = json!({
                    "address": r.address,
                    "domain": r.domain,
                    "domainStatus": r.domain_status.to_string(),
                    "uri": r.uri,
                });
            }
            result
        })
        .collect();

    let sarif = json!({
        "$schema": "https://docs.oasis-open.org/sarif/sarif/v2.1.0/errata01/os/schemas/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "PkgShield",
                    "informationUri": "https://github.com/limaronaldo/pkgshield",
                    "version": env!("CARGO_PKG_VERSION"),
                    "semanticVersion": env!("CARGO_PKG_VERSION"),
                    "rules": rules,
                },
            },
            "results": sarif_results,
            "automationDetails": {
                "id": format!("pkgshield/{}", target_name),
                "guid": uuid::Uuid::new_v4().to_string(),
            },
        }],
    });

    let output = serde_json::to_string_pretty(&sarif)?;
    Ok(output)
}

/// Stable rule id derived from the category name, e.g. `process-spawning`.
fn rule_id(category: &str) -> String {
    category
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::{spawn_result, url_result};

    #[test]
    fn one_rule_per_category_and_archive_uri() {
        let out = render(&[spawn_result(), url_result(), spawn_result()], "packages").unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        let run = &v["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 2);
        assert_eq!(run["results"].as_array().unwrap().len(), 3);
        assert_eq!(run["results"][0]["ruleId"], "process-spawning");
        assert_eq!(
            run["results"][0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "Demo.mpackage!/scripts/init.lua"
        );
        assert_eq!(run["results"][1]["properties"]["domainStatus"], "Publicly Writable");
        assert!(run["results"][0].get("properties").is_none());
        assert!(uuid::Uuid::parse_str(run["automationDetails"]["guid"].as_str().unwrap()).is_ok());
    }
}
