use std::path::Path;

use crate::error::Result;
use crate::ir::{package_name, PackageKind, SourceUnit};

use super::has_extension;

/// A lone script file, scanned as a one-member package named after itself.
pub struct ScriptAdapter;

impl super::Adapter for ScriptAdapter {
    fn kind(&self) -> PackageKind {
        PackageKind::Script
    }

    fn detect(&self, path: &Path, extensions: &[String]) -> bool {
        path.is_file() && has_extension(&path.to_string_lossy(), extensions)
    }

    fn load(&self, path: &Path, _extensions: &[String]) -> Result<Vec<SourceUnit>> {
        let bytes = std::fs::read(path)?;
        let name = package_name(path);
        Ok(vec![SourceUnit::from_bytes(&name, &name, &bytes)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapter;

    #[test]
    fn loads_single_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trigger.lua");
        std::fs::write(&path, "io.popen('id')").unwrap();

        assert!(ScriptAdapter.detect(&path, &["lua".into()]));
        let units = ScriptAdapter.load(&path, &["lua".into()]).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].package, "trigger.lua");
        assert_eq!(units[0].member, "trigger.lua");
    }
}
