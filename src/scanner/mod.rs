//! Line scanner: applies the pattern catalog to normalized text.

pub mod context;

use crate::parser::split_lines;
use crate::rules::PatternCatalog;

pub use context::{extract_context, DEFAULT_CONTEXT_LINES};

/// A raw detector hit, before context and classification are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// 1-based line number.
    pub line_number: usize,
    pub category: String,
    pub matched_text: String,
    /// The matching line, trimmed.
    pub raw_line: String,
    /// Set when the category feeds the network classifier.
    pub network_identifier: bool,
}

/// Scan normalized text line by line.
///
/// Each (line, category, detector) reports at most its leftmost match, so a
/// line may produce several records across categories and detectors.
pub fn scan_lines(normalized: &str, catalog: &PatternCatalog) -> Vec<MatchRecord> {
    let mut records = Vec::new();

    for (idx, line) in split_lines(normalized).into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        for category in catalog.categories() {
            for detector in &category.detectors {
                if let Some(m) = detector.find(line) {
                    records.push(MatchRecord {
                        line_number: idx + 1,
                        category: category.name.clone(),
                        matched_text: m.as_str().to_string(),
                        raw_line: line.trim().to_string(),
                        network_identifier: category.is_network_identifiers(),
                    });
                }
            }
        }
    }

    records
}
