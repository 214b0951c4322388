use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ScanResult;

/// Policy verdict: the final pass/fail decision after applying the
/// category ignore list to raw results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub pass: bool,
    pub total_results: usize,
    pub effective_results: usize,
    /// Effective result count per category.
    pub by_category: BTreeMap<String, usize>,
    pub packages_scanned: usize,
}

/// Policy configuration loaded from `.pkgshield.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Fail the run when any result survives the ignore list.
    #[serde(default = "default_fail_on_match")]
    pub fail_on_match: bool,
    /// Category names to drop from reports and the verdict.
    #[serde(default)]
    pub ignore_categories: HashSet<String>,
}

fn default_fail_on_match() -> bool {
    true
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_on_match: true,
            ignore_categories: HashSet::new(),
        }
    }
}

impl Policy {
    /// Evaluate results against this policy and produce a verdict.
    pub fn evaluate(&self, results: &[ScanResult], packages_scanned: usize) -> PolicyVerdict {
        let mut by_category = BTreeMap::new();
        for r in results.iter().filter(|r| self.keeps(r)) {
            *by_category.entry(r.category.clone()).or_insert(0) += 1;
        }
        let effective: usize = by_category.values().sum();

        PolicyVerdict {
            pass: !(self.fail_on_match && effective > 0),
            total_results: results.len(),
            effective_results: effective,
            by_category,
            packages_scanned,
        }
    }

    /// Filter results: remove ignored categories, keep order.
    pub fn apply(&self, results: &[ScanResult]) -> Vec<ScanResult> {
        results.iter().filter(|r| self.keeps(r)).cloned().collect()
    }

    fn keeps(&self, result: &ScanResult) -> bool {
        !self.ignore_categories.contains(&result.category)
    }
}
