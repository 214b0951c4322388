use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::LookupLimits;
use crate::error::{Result, ScanError};
use crate::rules::policy::Policy;
use crate::rules::CategorySpec;
use crate::scanner::DEFAULT_CONTEXT_LINES;

/// Top-level configuration from `.pkgshield.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// What to read and how much context to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Member extensions to scan inside archives (case-insensitive).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Package file names skipped during discovery.
    #[serde(default = "default_ignored_packages")]
    pub ignored_packages: Vec<String>,
    /// Lines of context on each side of a match.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    /// Optional cap on results kept per member.
    #[serde(default)]
    pub max_results_per_member: Option<usize>,
}

fn default_extensions() -> Vec<String> {
    vec!["lua".into()]
}

fn default_ignored_packages() -> Vec<String> {
    vec!["MudletBusted.mpackage".into()]
}

fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignored_packages: default_ignored_packages(),
            context_lines: default_context_lines(),
            max_results_per_member: None,
        }
    }
}

/// Domain resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Perform live DNS lookups. When false every domain resolves as a
    /// failed lookup.
    #[serde(default = "default_true")]
    pub resolve: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_attempts")]
    pub attempts: usize,
    /// Memoize lookups per distinct domain within a run.
    #[serde(default = "default_true")]
    pub cache: bool,
    /// Extra public-hosting domain patterns (regex).
    #[serde(default)]
    pub public_hosts: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_attempts() -> usize {
    2
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            resolve: true,
            timeout_ms: default_timeout_ms(),
            attempts: default_attempts(),
            cache: true,
            public_hosts: Vec::new(),
        }
    }
}

impl NetworkConfig {
    pub fn limits(&self) -> LookupLimits {
        LookupLimits {
            timeout: Duration::from_millis(self.timeout_ms),
            attempts: self.attempts.max(1),
        }
    }
}

/// User-defined categories appended after the built-ins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(ScanError::Config("scan.extensions must not be empty".into()));
        }
        if self.network.timeout_ms == 0 {
            return Err(ScanError::Config("network.timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# PkgShield configuration
# See https://github.com/limaronaldo/pkgshield for documentation.

[scan]
# Member extensions scanned inside package archives.
extensions = ["lua"]

# Package file names skipped during discovery.
ignored_packages = ["MudletBusted.mpackage"]

# Lines of context on each side of a match.
context_lines = 2

# Cap results per archive member (unset = unlimited).
# max_results_per_member = 500

[network]
# Live DNS lookups for discovered domains (false = offline).
resolve = true
timeout_ms = 2000
attempts = 2
cache = true

# Extra public-hosting domain patterns.
# public_hosts = ['\.neocities\.org$']

[policy]
# Exit non-zero when any result remains after filtering.
fail_on_match = true

# Categories to drop from reports.
# ignore_categories = ["Network Identifiers"]

# Extra categories, matched after the built-ins.
# [[rules.categories]]
# name = "Timers"
# detectors = [{ pattern = '\btempTimer\s*\(', token = "tempTimer" }]
"#
    }
}
