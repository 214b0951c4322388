//! Scan pipeline: normalize, match, attach context and network
//! classification, append results in processing order.

use std::path::Path;

use crate::adapter;
use crate::analysis::{CachingResolver, DomainResolver, NetworkClassifier, OfflineResolver};
use crate::config::{Config, NetworkConfig};
use crate::error::Result;
use crate::ir::SourceUnit;
use crate::parser::{normalize, split_lines};
use crate::rules::{DomainStatus, PatternCatalog, ScanResult};
use crate::scanner::{extract_context, scan_lines, DEFAULT_CONTEXT_LINES};

/// Runs the catalog and the network classifier over source units.
pub struct ScanEngine {
    catalog: PatternCatalog,
    classifier: NetworkClassifier,
    context_lines: usize,
    max_results_per_member: Option<usize>,
}

impl ScanEngine {
    pub fn new(catalog: PatternCatalog, classifier: NetworkClassifier) -> Self {
        Self {
            catalog,
            classifier,
            context_lines: DEFAULT_CONTEXT_LINES,
            max_results_per_member: None,
        }
    }

    /// Build the catalog and classifier described by `config`.
    pub fn from_config(config: &Config, resolver: Box<dyn DomainResolver>) -> Result<Self> {
        let catalog = PatternCatalog::with_extra(&config.rules.categories)?;
        let classifier =
            NetworkClassifier::new(resolver).with_public_hosts(&config.network.public_hosts)?;
        Ok(Self::new(catalog, classifier)
            .with_context_lines(config.scan.context_lines)
            .with_max_results_per_member(config.scan.max_results_per_member))
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_max_results_per_member(mut self, cap: Option<usize>) -> Self {
        self.max_results_per_member = cap;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Scan one decoded member.
    pub fn scan_unit(&self, unit: &SourceUnit) -> Vec<ScanResult> {
        let normalized = normalize(&unit.text);
        let lines = split_lines(&normalized);
        let records = scan_lines(&normalized, &self.catalog);
        let cap = self.max_results_per_member.unwrap_or(usize::MAX);

        if records.len() > cap {
            tracing::debug!(
                package = %unit.package,
                member = %unit.member,
                found = records.len(),
                cap,
                "result cap reached, truncating"
            );
        }

        records
            .into_iter()
            .take(cap)
            .map(|record| {
                let context = extract_context(&lines, record.line_number, self.context_lines);
                let mut result = ScanResult {
                    package: unit.package.clone(),
                    file: unit.member.clone(),
                    line_number: record.line_number,
                    context,
                    matched: record.matched_text,
                    category: record.category,
                    address: String::new(),
                    domain: String::new(),
                    domain_status: DomainStatus::NotApplicable,
                    uri: String::new(),
                };
                if record.network_identifier {
                    let identity = self.classifier.classify(&result.matched);
                    result.address = identity.address;
                    result.domain = identity.domain;
                    result.domain_status = identity.domain_status;
                    result.uri = identity.uri;
                }
                result
            })
            .collect()
    }

    /// Scan every matching member of one package. A package that cannot be
    /// read contributes no results.
    pub fn scan_package(&self, path: &Path, extensions: &[String]) -> Vec<ScanResult> {
        let units = match adapter::load_package(path, extensions) {
            Ok(units) => units,
            Err(e) => {
                tracing::warn!(package = %path.display(), error = %e, "skipping unreadable package");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for unit in &units {
            let found = self.scan_unit(unit);
            tracing::debug!(package = %unit.package, member = %unit.member, results = found.len(), "scanned member");
            results.extend(found);
        }
        results
    }
}

/// Pick the resolver for a run: live DNS when enabled and available,
/// otherwise offline. Wrapped in a per-run cache when configured.
pub fn resolver_from_config(network: &NetworkConfig, offline: bool) -> Box<dyn DomainResolver> {
    let inner = live_resolver(network, offline).unwrap_or_else(|| Box::new(OfflineResolver));
    if network.cache {
        Box::new(CachingResolver::new(inner))
    } else {
        inner
    }
}

#[cfg(feature = "dns")]
fn live_resolver(network: &NetworkConfig, offline: bool) -> Option<Box<dyn DomainResolver>> {
    if offline || !network.resolve {
        return None;
    }
    match crate::analysis::DnsResolver::new(network.limits()) {
        Ok(resolver) => Some(Box::new(resolver)),
        Err(e) => {
            tracing::warn!(error = %e, "DNS resolver unavailable, classifying offline");
            None
        }
    }
}

#[cfg(not(feature = "dns"))]
fn live_resolver(network: &NetworkConfig, offline: bool) -> Option<Box<dyn DomainResolver>> {
    if !offline && network.resolve {
        tracing::warn!("built without the `dns` feature, classifying offline");
    }
    None
}
