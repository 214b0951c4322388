//! Network identifier classification: split a matched URL or IPv4 literal
//! into address/domain/URI and grade the domain by resolution outcome.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::resolver::{DomainResolver, ResolutionOutcome};
use crate::error::{Result, ScanError};
use crate::rules::DomainStatus;

const SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Hosts where anyone can publish content.
const PUBLIC_HOST_PATTERNS: &[&str] = &[
    r"\.github\.io$",
    r"\.gitlab\.io$",
    r"\.bitbucket\.io$",
    r"gist\.github\.com$",
    r"pastebin\.com$",
    r"raw\.githubusercontent\.com$",
    r"\.amazonaws\.com$",
    r"\.cloudfront\.net$",
    r"\.azurewebsites\.net$",
    r"\.pages\.dev$",
];

static BUILTIN_PUBLIC_HOSTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PUBLIC_HOST_PATTERNS
        .iter()
        .map(|p| host_regex(p).unwrap())
        .collect()
});

fn host_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Address parts and status of one network identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkIdentity {
    pub address: String,
    pub domain: String,
    pub uri: String,
    pub domain_status: DomainStatus,
}

/// Split a matched identifier without resolving it.
///
/// With an `http`/`https`/`ftp` scheme the whole match is the URI and the
/// domain is everything between `://` and the first `/`. Anything else is
/// taken as a bare address.
pub fn split_identifier(matched: &str) -> NetworkIdentity {
    let after_scheme = matched.split_once("://").and_then(|(scheme, rest)| {
        SCHEMES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
            .then_some(rest)
    });

    match after_scheme {
        Some(rest) => {
            let domain = rest.split('/').next().unwrap_or_default().to_string();
            NetworkIdentity {
                address: domain.clone(),
                domain,
                uri: matched.to_string(),
                domain_status: DomainStatus::NotApplicable,
            }
        }
        None => NetworkIdentity {
            address: matched.to_string(),
            domain: matched.to_string(),
            uri: String::new(),
            domain_status: DomainStatus::NotApplicable,
        },
    }
}

/// Classifies network identifiers using a resolver and the public-hosting
/// suffix list.
pub struct NetworkClassifier {
    resolver: Box<dyn DomainResolver>,
    public_hosts: Vec<Regex>,
}

impl NetworkClassifier {
    pub fn new(resolver: Box<dyn DomainResolver>) -> Self {
        Self {
            resolver,
            public_hosts: BUILTIN_PUBLIC_HOSTS.clone(),
        }
    }

    /// Append extra public-hosting patterns (regexes matched against the
    /// domain, case-insensitively).
    pub fn with_public_hosts(mut self, patterns: &[String]) -> Result<Self> {
        for p in patterns {
            let re = host_regex(p)
                .map_err(|e| ScanError::Config(format!("invalid public host pattern '{p}': {e}")))?;
            self.public_hosts.push(re);
        }
        Ok(self)
    }

    pub fn classify(&self, matched: &str) -> NetworkIdentity {
        let mut identity = split_identifier(matched);
        identity.domain_status = self.domain_status(&identity.domain);
        identity
    }

    /// First applicable rule wins: empty domain, NXDOMAIN, public host,
    /// then resolved/unknown.
    pub fn domain_status(&self, domain: &str) -> DomainStatus {
        if domain.is_empty() {
            return DomainStatus::NotApplicable;
        }

        let resolved = match self.resolver.resolve(domain) {
            ResolutionOutcome::NameDoesNotExist => return DomainStatus::Unregistered,
            ResolutionOutcome::AddressFound => true,
            ResolutionOutcome::OtherFailure => false,
        };

        if self.is_public_host(domain) {
            DomainStatus::PubliclyWritable
        } else if resolved {
            DomainStatus::Resolved
        } else {
            DomainStatus::Unknown
        }
    }

    pub fn is_public_host(&self, domain: &str) -> bool {
        self.public_hosts.iter().any(|re| re.is_match(domain))
    }
}
