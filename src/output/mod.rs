pub mod console;
pub mod csv;
pub mod html;
pub mod json;
pub mod sarif;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::policy::PolicyVerdict;
use crate::rules::ScanResult;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Html,
    Csv,
    Sarif,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            "html" => Some(Self::Html),
            "csv" => Some(Self::Csv),
            "sarif" => Some(Self::Sarif),
            _ => None,
        }
    }
}

/// Render results into the specified format.
pub fn render(
    results: &[ScanResult],
    verdict: &PolicyVerdict,
    format: OutputFormat,
    target_name: &str,
) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(results, verdict)),
        OutputFormat::Json => json::render(results, verdict),
        OutputFormat::Html => html::render(results, verdict, target_name),
        OutputFormat::Csv => csv::render(results),
        OutputFormat::Sarif => sarif::render(results, target_name),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::rules::{DomainStatus, ScanResult};

    pub fn spawn_result() -> ScanResult {
        ScanResult {
            package: "Demo.mpackage".into(),
            file: "scripts/init.lua".into(),
            line_number: 2,
            context: "local cmd = x\nos.execute(cmd)\nreturn".into(),
            matched: "os.execute(".into(),
            category: "Process Spawning".into(),
            address: String::new(),
            domain: String::new(),
            domain_status: DomainStatus::NotApplicable,
            uri: String::new(),
        }
    }

    pub fn url_result() -> ScanResult {
        ScanResult {
            package: "Demo.mpackage".into(),
            file: "scripts/net.lua".into(),
            line_number: 9,
            context: "getHTTP(\"https://x.github.io/a?b=<c>\")".into(),
            matched: "https://x.github.io/a?b=<c>".into(),
            category: "Network Identifiers".into(),
            address: "x.github.io".into(),
            domain: "x.github.io".into(),
            domain_status: DomainStatus::PubliclyWritable,
            uri: "https://x.github.io/a?b=<c>".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_format_names() {
        assert_eq!(OutputFormat::from_str_lenient("HTML"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::from_str_lenient("text"), Some(OutputFormat::Console));
        assert_eq!(OutputFormat::from_str_lenient("xml"), None);
    }
}
