use serde::{Deserialize, Serialize};

/// Column order every tabular reporter emits. Changing it breaks report
/// consumers.
pub const REPORT_COLUMNS: [&str; 10] = [
    "Package",
    "File",
    "Line",
    "Category",
    "Match",
    "Address",
    "Domain/IP",
    "Domain Status",
    "URI",
    "Context",
];

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Package archive file name.
    pub package: String,
    /// Member path inside the package.
    pub file: String,
    /// 1-based line number in the member.
    pub line_number: usize,
    /// Up to `2 * radius + 1` normalized lines around the match.
    pub context: String,
    /// The matched text.
    pub matched: String,
    /// Name of the pattern category that matched.
    pub category: String,
    /// Address part of a network identifier; empty for other categories.
    pub address: String,
    /// Domain or IP of a network identifier; empty for other categories.
    pub domain: String,
    pub domain_status: DomainStatus,
    /// Full URI when the identifier carried a scheme.
    pub uri: String,
}

impl ScanResult {
    /// Cells in [`REPORT_COLUMNS`] order.
    pub fn row(&self) -> [String; 10] {
        [
            self.package.clone(),
            self.file.clone(),
            self.line_number.to_string(),
            self.category.clone(),
            self.matched.clone(),
            self.address.clone(),
            self.domain.clone(),
            self.domain_status.to_string(),
            self.uri.clone(),
            self.context.clone(),
        ]
    }
}

/// Classification of a domain found in a network identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DomainStatus {
    /// The resolver answered NXDOMAIN.
    Unregistered,
    /// Hosted on a platform where anyone can publish content.
    #[serde(rename = "Publicly Writable")]
    PubliclyWritable,
    Resolved,
    /// Resolution failed for a reason other than NXDOMAIN.
    Unknown,
    /// Not a network identifier, or no domain to look up.
    #[default]
    #[serde(rename = "")]
    NotApplicable,
}

impl DomainStatus {
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unregistered => write!(f, "Unregistered"),
            Self::PubliclyWritable => write!(f, "Publicly Writable"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Unknown => write!(f, "Unknown"),
            Self::NotApplicable => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_report_text() {
        let json = serde_json::to_string(&[
            DomainStatus::PubliclyWritable,
            DomainStatus::NotApplicable,
            DomainStatus::Unregistered,
        ])
        .unwrap();
        assert_eq!(json, r#"["Publicly Writable","","Unregistered"]"#);
    }

    #[test]
    fn row_follows_column_order() {
        let result = ScanResult {
            package: "pkg.mpackage".into(),
            file: "script.lua".into(),
            line_number: 7,
            context: "ctx".into(),
            matched: "https://a.io/x".into(),
            category: "Network Identifiers".into(),
            address: "a.io".into(),
            domain: "a.io".into(),
            domain_status: DomainStatus::Resolved,
            uri: "https://a.io/x".into(),
        };
        let row = result.row();
        assert_eq!(row[2], "7");
        assert_eq!(row[4], "https://a.io/x");
        assert_eq!(row[7], "Resolved");
        assert_eq!(row[9], "ctx");
    }
}
