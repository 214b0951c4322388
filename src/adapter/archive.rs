use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, ScanError};
use crate::ir::{package_name, PackageKind, SourceUnit};

use super::{has_extension, ARCHIVE_EXTENSIONS};

/// `.mpackage` / `.zip` archive adapter.
///
/// Detects by file extension; reads members in central-directory order.
pub struct ArchiveAdapter;

impl super::Adapter for ArchiveAdapter {
    fn kind(&self) -> PackageKind {
        PackageKind::Archive
    }

    fn detect(&self, path: &Path, _extensions: &[String]) -> bool {
        path.is_file() && has_extension(&path.to_string_lossy(), &ARCHIVE_EXTENSIONS)
    }

    fn load(&self, path: &Path, extensions: &[String]) -> Result<Vec<SourceUnit>> {
        let package = package_name(path);
        let file = File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|e| ScanError::Archive {
                package: package.clone(),
                message: e.to_string(),
            })?;

        let mut units = Vec::new();
        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(package = %package, index, error = %e, "unreadable archive entry, skipping");
                    continue;
                }
            };
            if entry.is_dir() || !has_extension(entry.name(), extensions) {
                continue;
            }

            let member = entry.name().to_string();
            let declared = entry.size();
            match read_member(&mut entry, declared, MAX_MEMBER_BYTES) {
                Ok(Some(bytes)) => units.push(SourceUnit::from_bytes(&package, &member, &bytes)),
                Ok(None) => {
                    tracing::warn!(package = %package, member = %member, limit = MAX_MEMBER_BYTES, "member too large, skipping");
                }
                Err(e) => {
                    tracing::warn!(package = %package, member = %member, error = %e, "failed to read member, skipping");
                }
            }
        }

        Ok(units)
    }
}

/// Members larger than this are skipped.
pub const MAX_MEMBER_BYTES: u64 = 64 * 1024 * 1024;

const PREALLOC_LIMIT: u64 = 1 << 20;

/// Read at most `limit` bytes of one member. `None` means the member is
/// larger than `limit`. The declared size only sizes the first allocation.
fn read_member<R: Read>(reader: R, declared: u64, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut bytes = Vec::with_capacity(declared.min(limit).min(PREALLOC_LIMIT) as usize);
    reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapter;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, members: &[(&str, &[u8])]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn reads_only_matching_members_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Demo.mpackage");
        write_archive(
            &path,
            &[
                ("config.lua", b"spawn(x)"),
                ("Demo.xml", b"<MudletPackage/>"),
                ("lib/util.LUA", b"\xfe ok"),
            ],
        );

        let units = ArchiveAdapter.load(&path, &["lua".into()]).unwrap();
        let members: Vec<_> = units.iter().map(|u| u.member.as_str()).collect();
        assert_eq!(members, vec!["config.lua", "lib/util.LUA"]);
        assert_eq!(units[0].package, "Demo.mpackage");
        assert_eq!(units[1].text, "\u{FFFD} ok");
    }

    #[test]
    fn not_a_zip_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Broken.mpackage");
        std::fs::write(&path, b"this is not a zip").unwrap();
        let err = ArchiveAdapter.load(&path, &["lua".into()]).unwrap_err();
        assert!(matches!(err, ScanError::Archive { ref package, .. } if package == "Broken.mpackage"));
    }

    #[test]
    fn declared_size_does_not_drive_allocation() {
        let bytes = read_member(Cursor::new(b"spawn(x)".to_vec()), u64::MAX, MAX_MEMBER_BYTES)
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"spawn(x)");
    }

    #[test]
    fn oversized_member_is_rejected() {
        assert_eq!(read_member(Cursor::new(b"1234".to_vec()), 4, 4).unwrap(), Some(b"1234".to_vec()));
        assert_eq!(read_member(Cursor::new(b"12345".to_vec()), 4, 4).unwrap(), None);
    }

    #[test]
    fn detects_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Pkg.ZIP");
        std::fs::write(&path, b"").unwrap();
        assert!(ArchiveAdapter.detect(&path, &[]));
        assert!(!ArchiveAdapter.detect(&dir.path().join("missing.zip"), &[]));
    }
}
