//! Scan ledger: remembers which package contents were already scanned so a
//! repository run can skip unchanged packages and list pending ones.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, ScanError};
use crate::ir::package_name;

/// Record of one scanned package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Hex SHA-256 of the package file.
    pub sha256: String,
    pub scanned_at: DateTime<Utc>,
    pub result_count: usize,
}

/// Package file name → last scan, persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLedger {
    #[serde(default)]
    pub packages: BTreeMap<String, LedgerEntry>,
}

impl ScanLedger {
    /// Load a ledger. Returns an empty ledger if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ScanError::Ledger(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// True when `name` was scanned with exactly this content digest.
    pub fn is_current(&self, name: &str, sha256: &str) -> bool {
        self.packages
            .get(name)
            .is_some_and(|entry| entry.sha256 == sha256)
    }

    pub fn record(&mut self, name: &str, sha256: &str, result_count: usize) {
        self.packages.insert(
            name.to_string(),
            LedgerEntry {
                sha256: sha256.to_string(),
                scanned_at: Utc::now(),
                result_count,
            },
        );
    }

    /// Packages never scanned, or whose content changed since the last scan.
    /// Unreadable packages count as pending.
    pub fn pending(&self, packages: &[PathBuf]) -> Vec<PathBuf> {
        packages
            .iter()
            .filter(|p| match digest_file(p) {
                Ok(digest) => !self.is_current(&package_name(p), &digest),
                Err(e) => {
                    tracing::warn!(package = %p.display(), error = %e, "cannot hash package");
                    true
                }
            })
            .cloned()
            .collect()
    }
}

/// Hex SHA-256 of a file's bytes.
pub fn digest_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
