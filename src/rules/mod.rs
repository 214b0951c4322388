pub mod builtin;
pub mod finding;
pub mod policy;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

pub use finding::{DomainStatus, ScanResult, REPORT_COLUMNS};

/// Category whose matches are handed to the network classifier.
pub const NETWORK_IDENTIFIERS: &str = "Network Identifiers";

/// One pattern plus the identifier whose *definition* on the same line
/// cancels a match.
#[derive(Debug, Clone)]
pub struct Detector {
    pattern: Regex,
    suppression: Option<Suppression>,
}

impl Detector {
    /// Compile a detector. An empty `token` means the detector is never
    /// suppressed.
    pub fn new(category: &str, pattern: &str, token: &str) -> Result<Self> {
        let compiled = compile(category, pattern)?;
        let suppression = if token.is_empty() {
            None
        } else {
            Some(Suppression::new(category, token)?)
        };
        Ok(Self {
            pattern: compiled,
            suppression,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn token(&self) -> Option<&str> {
        self.suppression.as_ref().map(|s| s.token.as_str())
    }

    /// Leftmost match on `line`, unless the line defines the suppression
    /// token instead of calling it.
    pub fn find<'l>(&self, line: &'l str) -> Option<regex::Match<'l>> {
        let m = self.pattern.find(line)?;
        match &self.suppression {
            Some(s) if s.suppresses(line) => None,
            _ => Some(m),
        }
    }
}

/// Recognizes the two shapes that define a function named after the token:
/// `[local] function TOKEN` and `TOKEN = function`.
///
/// Pure text heuristic: it looks at one line only and does not know about
/// strings or scopes.
#[derive(Debug, Clone)]
pub struct Suppression {
    token: String,
    definition: Regex,
    assignment: Regex,
}

impl Suppression {
    fn new(category: &str, token: &str) -> Result<Self> {
        let escaped = regex::escape(token);
        Ok(Self {
            token: token.to_string(),
            definition: compile(
                category,
                &format!(r"(?:^|\s)(?:local\s+)?function\s+{escaped}\b"),
            )?,
            assignment: compile(category, &format!(r"{escaped}\s*=\s*function\b"))?,
        })
    }

    pub fn suppresses(&self, line: &str) -> bool {
        self.definition.is_match(line) || self.assignment.is_match(line)
    }
}

fn compile(category: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScanError::Rule {
        category: category.to_string(),
        message: format!("invalid pattern '{pattern}': {e}"),
    })
}

/// A named, ordered group of detectors sharing a risk theme.
#[derive(Debug, Clone)]
pub struct PatternCategory {
    pub name: String,
    pub detectors: Vec<Detector>,
}

impl PatternCategory {
    pub fn is_network_identifiers(&self) -> bool {
        self.name == NETWORK_IDENTIFIERS
    }
}

/// Detector definition as written in `.pkgshield.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectorSpec {
    pub pattern: String,
    #[serde(default)]
    pub token: String,
}

/// Category definition as written in `.pkgshield.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub detectors: Vec<DetectorSpec>,
}

impl CategorySpec {
    pub fn compile(&self) -> Result<PatternCategory> {
        let detectors = self
            .detectors
            .iter()
            .map(|d| Detector::new(&self.name, &d.pattern, &d.token))
            .collect::<Result<Vec<_>>>()?;
        Ok(PatternCategory {
            name: self.name.clone(),
            detectors,
        })
    }
}

/// Immutable, ordered set of categories. Built once per run and passed to
/// the scanner.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    categories: Vec<PatternCategory>,
}

impl PatternCatalog {
    /// The built-in categories, in matching order.
    pub fn builtin() -> Self {
        Self {
            categories: builtin::all_categories(),
        }
    }

    /// Built-ins followed by user-defined categories in declaration order.
    pub fn with_extra(extra: &[CategorySpec]) -> Result<Self> {
        let mut categories = builtin::all_categories();
        for spec in extra {
            categories.push(spec.compile()?);
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[PatternCategory] {
        &self.categories
    }

    /// Describe every category for `list-rules` output.
    pub fn describe(&self) -> Vec<CategorySpec> {
        self.categories
            .iter()
            .map(|c| CategorySpec {
                name: c.name.clone(),
                detectors: c
                    .detectors
                    .iter()
                    .map(|d| DetectorSpec {
                        pattern: d.pattern().as_str().to_string(),
                        token: d.token().unwrap_or_default().to_string(),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
