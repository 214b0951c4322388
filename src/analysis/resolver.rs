//! Domain resolution boundary used by the network classifier.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What a resolver observed for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionOutcome {
    AddressFound,
    /// NXDOMAIN: the name does not exist.
    NameDoesNotExist,
    /// Timeout, unreachable server, empty answer, malformed response.
    OtherFailure,
}

/// Resolves a domain to an outcome. Implementations absorb every error;
/// nothing escapes as a panic or `Err`.
pub trait DomainResolver: Send + Sync {
    fn resolve(&self, domain: &str) -> ResolutionOutcome;
}

/// Resolver for runs without network access. Every lookup is an
/// `OtherFailure`, so domains classify as `Unknown` or `Publicly Writable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl DomainResolver for OfflineResolver {
    fn resolve(&self, _domain: &str) -> ResolutionOutcome {
        ResolutionOutcome::OtherFailure
    }
}

/// Table-backed resolver. Unlisted domains fall back to `default`.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    answers: HashMap<String, ResolutionOutcome>,
    default: ResolutionOutcome,
}

impl StaticResolver {
    pub fn new(default: ResolutionOutcome) -> Self {
        Self {
            answers: HashMap::new(),
            default,
        }
    }

    pub fn with(mut self, domain: &str, outcome: ResolutionOutcome) -> Self {
        self.answers.insert(domain.to_string(), outcome);
        self
    }
}

impl DomainResolver for StaticResolver {
    fn resolve(&self, domain: &str) -> ResolutionOutcome {
        self.answers.get(domain).copied().unwrap_or(self.default)
    }
}

/// Memoizes outcomes per distinct domain for the lifetime of one run.
pub struct CachingResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, ResolutionOutcome>>,
}

impl<R: DomainResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct domains looked up so far.
    #[cfg(test)]
    pub fn cached_domains(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl<R: DomainResolver> DomainResolver for CachingResolver<R> {
    fn resolve(&self, domain: &str) -> ResolutionOutcome {
        if let Ok(cache) = self.cache.lock() {
            if let Some(outcome) = cache.get(domain) {
                return *outcome;
            }
        }
        let outcome = self.inner.resolve(domain);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(domain.to_string(), outcome);
        }
        outcome
    }
}

impl DomainResolver for Box<dyn DomainResolver> {
    fn resolve(&self, domain: &str) -> ResolutionOutcome {
        (**self).resolve(domain)
    }
}

/// Lookup limits for live DNS.
#[derive(Debug, Clone, Copy)]
pub struct LookupLimits {
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for LookupLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            attempts: 2,
        }
    }
}

#[cfg(feature = "dns")]
pub use dns::DnsResolver;

#[cfg(feature = "dns")]
mod dns {
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};
    use hickory_resolver::error::{ResolveError, ResolveErrorKind};
    use hickory_resolver::proto::op::ResponseCode;
    use hickory_resolver::Resolver;

    use super::{DomainResolver, LookupLimits, ResolutionOutcome};
    use crate::error::Result;

    /// Live A-record lookups through `hickory-resolver`.
    pub struct DnsResolver {
        resolver: Resolver,
    }

    impl DnsResolver {
        /// Build from the system resolver configuration, falling back to the
        /// library default when the system configuration is unreadable.
        pub fn new(limits: LookupLimits) -> Result<Self> {
            let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
                Ok(conf) => conf,
                Err(e) => {
                    tracing::warn!(error = %e, "system resolver config unreadable, using defaults");
                    (ResolverConfig::default(), ResolverOpts::default())
                }
            };
            opts.timeout = limits.timeout;
            opts.attempts = limits.attempts;
            let resolver = Resolver::new(config, opts)?;
            Ok(Self { resolver })
        }
    }

    impl DomainResolver for DnsResolver {
        fn resolve(&self, domain: &str) -> ResolutionOutcome {
            match self.resolver.ipv4_lookup(domain) {
                Ok(_) => ResolutionOutcome::AddressFound,
                Err(e) => {
                    let outcome = outcome_for_error(&e);
                    tracing::debug!(domain, error = %e, ?outcome, "lookup failed");
                    outcome
                }
            }
        }
    }

    fn outcome_for_error(err: &ResolveError) -> ResolutionOutcome {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NXDomain =>
            {
                ResolutionOutcome::NameDoesNotExist
            }
            _ => ResolutionOutcome::OtherFailure,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
    }

    impl DomainResolver for CountingResolver {
        fn resolve(&self, domain: &str) -> ResolutionOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if domain.ends_with(".invalid") {
                ResolutionOutcome::NameDoesNotExist
            } else {
                ResolutionOutcome::AddressFound
            }
        }
    }

    #[test]
    fn cache_queries_each_domain_once() {
        let caching = CachingResolver::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });
        for _ in 0..3 {
            assert_eq!(caching.resolve("a.com"), ResolutionOutcome::AddressFound);
            assert_eq!(
                caching.resolve("x.invalid"),
                ResolutionOutcome::NameDoesNotExist
            );
        }
        assert_eq!(caching.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(caching.cached_domains(), 2);
    }

    #[test]
    fn static_resolver_falls_back_to_default() {
        let r = StaticResolver::new(ResolutionOutcome::OtherFailure)
            .with("ok.com", ResolutionOutcome::AddressFound);
        assert_eq!(r.resolve("ok.com"), ResolutionOutcome::AddressFound);
        assert_eq!(r.resolve("other.com"), ResolutionOutcome::OtherFailure);
    }

    #[test]
    fn offline_never_resolves() {
        assert_eq!(
            OfflineResolver.resolve("example.com"),
            ResolutionOutcome::OtherFailure
        );
    }
}
