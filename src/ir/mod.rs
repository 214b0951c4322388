//! Units handed from the package adapters to the scan engine.
//!
//! Adapters produce `SourceUnit`s; the engine consumes them. Neither side
//! knows how the other reads or reports.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Decoded text of one scanned entry of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Package file name, e.g. `Foo.mpackage`.
    pub package: String,
    /// Member path inside the package.
    pub member: String,
    pub text: String,
}

impl SourceUnit {
    /// Decode raw bytes; invalid UTF-8 becomes U+FFFD, never an error.
    pub fn from_bytes(package: &str, member: &str, bytes: &[u8]) -> Self {
        Self {
            package: package.to_string(),
            member: member.to_string(),
            text: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// How a package is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    /// `.mpackage` / `.zip` archive.
    Archive,
    /// A lone script file.
    Script,
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Script => write!(f, "script"),
        }
    }
}

/// File name used as the package identity in reports.
pub fn package_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
