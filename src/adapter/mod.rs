pub mod archive;
pub mod script;

use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};
use crate::ir::{package_name, PackageKind, SourceUnit};

/// An adapter recognizes one package layout and reads its scannable members.
pub trait Adapter: Send + Sync {
    /// The layout this adapter handles.
    fn kind(&self) -> PackageKind;

    /// Check if this adapter can read the given path.
    fn detect(&self, path: &Path, extensions: &[String]) -> bool;

    /// Read members whose extension is in `extensions`, in stored order.
    fn load(&self, path: &Path, extensions: &[String]) -> Result<Vec<SourceUnit>>;
}

/// All registered adapters, archive first.
pub fn all_adapters() -> Vec<Box<dyn Adapter>> {
    vec![
        Box::new(archive::ArchiveAdapter),
        Box::new(script::ScriptAdapter),
    ]
}

/// Load one package with the first adapter that recognizes it.
pub fn load_package(path: &Path, extensions: &[String]) -> Result<Vec<SourceUnit>> {
    let adapters = all_adapters();
    let adapter = adapters
        .iter()
        .find(|a| a.detect(path, extensions))
        .ok_or_else(|| ScanError::Archive {
            package: package_name(path),
            message: "not a recognized package or script".into(),
        })?;
    tracing::debug!(package = %path.display(), kind = %adapter.kind(), "loading package");
    adapter.load(path, extensions)
}

/// Archive suffixes searched when scanning a directory, in scan order.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["mpackage", "zip"];

/// Enumerate packages under `root`.
///
/// A file is returned as-is. A directory yields its `*.mpackage` files, then
/// its `*.zip` files, each group sorted by name. Names listed in `ignored`
/// are skipped.
pub fn discover_packages(root: &Path, ignored: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ScanError::NoPackages(root.display().to_string()));
    }

    let is_ignored = |p: &Path| ignored.iter().any(|name| *name == package_name(p));

    if root.is_file() {
        return Ok(if is_ignored(root) {
            vec![]
        } else {
            vec![root.to_path_buf()]
        });
    }

    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut packages = Vec::new();
    for ext in ARCHIVE_EXTENSIONS {
        let pattern = format!("{base}/*.{ext}");
        let entries =
            glob::glob(&pattern).map_err(|e| ScanError::Internal(format!("glob '{pattern}': {e}")))?;
        let mut group: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable directory entry, skipping");
                    None
                }
            })
            .filter(|p| p.is_file() && !is_ignored(p))
            .collect();
        group.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        packages.extend(group);
    }

    Ok(packages)
}

/// Case-insensitive extension check against the configured list.
pub fn has_extension<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .any(|e| e.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn lua() -> Vec<String> {
        vec!["lua".into()]
    }

    #[test]
    fn extension_match_ignores_case_and_dot() {
        assert!(has_extension("scripts/Init.LUA", &lua()));
        assert!(has_extension("a.xml", &[".xml"]));
        assert!(!has_extension("README", &lua()));
        assert!(!has_extension("lua", &lua()));
    }

    #[test]
    fn discovers_mpackage_before_zip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.zip", "z.mpackage", "a.mpackage", "a.zip", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let found: Vec<_> = discover_packages(dir.path(), &[])
            .unwrap()
            .iter()
            .map(|p| package_name(p))
            .collect();
        assert_eq!(found, vec!["a.mpackage", "z.mpackage", "a.zip", "b.zip"]);
    }

    #[test]
    fn ignored_packages_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("MudletBusted.mpackage"), b"x").unwrap();
        fs::write(dir.path().join("Good.mpackage"), b"x").unwrap();
        let found = discover_packages(dir.path(), &["MudletBusted.mpackage".into()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(package_name(&found[0]), "Good.mpackage");
    }

    #[test]
    fn missing_root_is_error() {
        let err = discover_packages(Path::new("/definitely/not/here"), &[]).unwrap_err();
        assert!(matches!(err, ScanError::NoPackages(_)));
    }

    #[test]
    fn unknown_file_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        fs::write(&path, b"\x89PNG").unwrap();
        assert!(matches!(
            load_package(&path, &lua()),
            Err(ScanError::Archive { .. })
        ));
    }
}
