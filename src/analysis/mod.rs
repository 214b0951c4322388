pub mod network;
pub mod resolver;

pub use network::{split_identifier, NetworkClassifier, NetworkIdentity};
pub use resolver::{
    CachingResolver, DomainResolver, LookupLimits, OfflineResolver, ResolutionOutcome,
    StaticResolver,
};

#[cfg(feature = "dns")]
pub use resolver::DnsResolver;
