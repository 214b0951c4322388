//! PkgShield: security scanner for Lua script packages.
//!
//! Offline-capable, pattern-driven, CSV/HTML/SARIF output. Scans `.mpackage`
//! and `.zip` archives for process spawning, package management, unsafe
//! inputs and network identifiers, grading every discovered domain.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use pkgshield::{scan, ScanOptions};
//!
//! let options = ScanOptions { offline: true, ..ScanOptions::default() };
//! let report = scan(Path::new("./packages"), &options).unwrap();
//! println!("Pass: {}, Results: {}", report.verdict.pass, report.results.len());
//! ```

pub mod adapter;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod ir;
pub mod ledger;
pub mod output;
pub mod parser;
pub mod rules;
pub mod scanner;

use std::path::{Path, PathBuf};

use config::Config;
use engine::{resolver_from_config, ScanEngine};
use error::Result;
use ledger::{digest_file, ScanLedger};
use output::OutputFormat;
use rules::policy::PolicyVerdict;
use rules::ScanResult;

/// Options for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.pkgshield.toml` in the scan dir).
    pub config_path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Skip live DNS regardless of config.
    pub offline: bool,
    /// Ledger file to record scanned packages in.
    pub ledger_path: Option<PathBuf>,
    /// Only scan packages the ledger hasn't seen with their current content.
    pub only_new: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            format: OutputFormat::Console,
            offline: false,
            ledger_path: None,
            only_new: false,
        }
    }
}

/// Complete scan report.
#[derive(Debug)]
pub struct ScanReport {
    pub target_name: String,
    /// Results left after the policy filter, in scan order.
    pub results: Vec<ScanResult>,
    pub verdict: PolicyVerdict,
}

/// Config file used when none is given: next to the packages.
pub fn default_config_path(path: &Path) -> PathBuf {
    let dir = if path.is_file() {
        path.parent().unwrap_or_else(|| Path::new("."))
    } else {
        path
    };
    dir.join(".pkgshield.toml")
}

/// Run a complete scan: discover packages, scan each, evaluate policy.
pub fn scan(path: &Path, options: &ScanOptions) -> Result<ScanReport> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| default_config_path(path));
    let config = Config::load(&config_path)?;

    let resolver = resolver_from_config(&config.network, options.offline);
    let engine = ScanEngine::from_config(&config, resolver)?;

    let mut packages = adapter::discover_packages(path, &config.scan.ignored_packages)?;
    let mut ledger = match &options.ledger_path {
        Some(p) => Some(ScanLedger::load(p)?),
        None => None,
    };

    if options.only_new {
        match &ledger {
            Some(l) => {
                let before = packages.len();
                packages = l.pending(&packages);
                tracing::info!(skipped = before - packages.len(), "skipping unchanged packages");
            }
            None => tracing::warn!("--only-new has no effect without a ledger"),
        }
    }

    let mut all_results: Vec<ScanResult> = Vec::new();
    for package in &packages {
        let found = engine.scan_package(package, &config.scan.extensions);
        tracing::debug!(package = %package.display(), results = found.len(), "scanned package");

        if let Some(l) = ledger.as_mut() {
            match digest_file(package) {
                Ok(digest) => l.record(&ir::package_name(package), &digest, found.len()),
                Err(e) => tracing::warn!(package = %package.display(), error = %e, "cannot hash package"),
            }
        }
        all_results.extend(found);
    }

    if let (Some(l), Some(p)) = (&ledger, &options.ledger_path) {
        l.save(p)?;
    }

    let verdict = config.policy.evaluate(&all_results, packages.len());
    let results = config.policy.apply(&all_results);

    tracing::info!(
        packages = packages.len(),
        results = results.len(),
        pass = verdict.pass,
        "scan finished"
    );

    Ok(ScanReport {
        target_name: ir::package_name(path),
        results,
        verdict,
    })
}

/// Render a scan report in the specified format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    output::render(
        &report.results,
        &report.verdict,
        format,
        &report.target_name,
    )
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_package(dir: &Path, name: &str, members: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (member, text) in members {
            zip.start_file(*member, SimpleFileOptions::default()).unwrap();
            zip.write_all(text.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    fn offline() -> ScanOptions {
        ScanOptions {
            offline: true,
            ..ScanOptions::default()
        }
    }

    #[test]
    fn clean_directory_passes() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "Clean.mpackage", &[("init.lua", "local x = 1\n")]);
        let report = scan(dir.path(), &offline()).unwrap();
        assert!(report.results.is_empty());
        assert!(report.verdict.pass);
        assert_eq!(report.verdict.packages_scanned, 1);
    }

    #[test]
    fn results_follow_package_then_member_order() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "b.zip", &[("z.lua", "spawn(x)")]);
        write_package(
            dir.path(),
            "A.mpackage",
            &[
                ("readme.txt", "os.execute(1)"),
                ("b.lua", "-- os.execute(1)\nlocal u = \"https://me.github.io/x\""),
                ("a.lua", "installPackage(p)"),
            ],
        );
        write_package(dir.path(), "MudletBusted.mpackage", &[("t.lua", "spawn(x)")]);

        let report = scan(dir.path(), &offline()).unwrap();
        let seen: Vec<_> = report
            .results
            .iter()
            .map(|r| (r.package.as_str(), r.file.as_str(), r.category.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("A.mpackage", "b.lua", "Network Identifiers"),
                ("A.mpackage", "a.lua", "Package Management"),
                ("b.zip", "z.lua", "Process Spawning"),
            ]
        );
        assert_eq!(report.results[0].line_number, 2);
        assert_eq!(report.results[0].domain_status, rules::DomainStatus::PubliclyWritable);
        assert_eq!(report.verdict.packages_scanned, 2);
        assert!(!report.verdict.pass);
    }

    #[test]
    fn policy_from_config_drops_categories() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            "Net.mpackage",
            &[("n.lua", "local u = 'http://10.1.2.3/x'\nspawn(u)")],
        );
        std::fs::write(
            dir.path().join(".pkgshield.toml"),
            "[policy]\nignore_categories = [\"Network Identifiers\"]\n",
        )
        .unwrap();

        let report = scan(dir.path(), &offline()).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].category, "Process Spawning");
        assert_eq!(report.verdict.total_results, 3);
        assert_eq!(report.verdict.effective_results, 1);
    }

    #[test]
    fn ledger_skips_unchanged_packages() {
        let dir = tempfile::tempdir().unwrap();
        let pkgs = dir.path().join("pkgs");
        std::fs::create_dir(&pkgs).unwrap();
        write_package(&pkgs, "One.mpackage", &[("a.lua", "spawn(x)")]);
        let ledger_path = dir.path().join("ledger.json");

        let options = ScanOptions {
            ledger_path: Some(ledger_path.clone()),
            only_new: true,
            ..offline()
        };
        let first = scan(&pkgs, &options).unwrap();
        assert_eq!(first.results.len(), 1);
        assert!(ScanLedger::load(&ledger_path).unwrap().packages.contains_key("One.mpackage"));

        let second = scan(&pkgs, &options).unwrap();
        assert!(second.results.is_empty());
        assert_eq!(second.verdict.packages_scanned, 0);

        write_package(&pkgs, "Two.mpackage", &[("b.lua", "loadstring(s)")]);
        let third = scan(&pkgs, &options).unwrap();
        assert_eq!(third.results.len(), 1);
        assert_eq!(third.results[0].package, "Two.mpackage");
    }

    #[test]
    fn missing_target_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(&dir.path().join("nope"), &offline()).is_err());
    }

    #[test]
    fn report_renders_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "P.mpackage", &[("a.lua", "spawn(x)")]);
        let report = scan(dir.path(), &offline()).unwrap();
        let csv = render_report(&report, OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Package,File,Line,Category"));
        assert!(lines.next().unwrap().starts_with("P.mpackage,a.lua,1,Process Spawning,spawn("));
    }
}
