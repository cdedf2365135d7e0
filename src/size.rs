//! Byte counts for single files and whole folder trees.
//!
//! Folder sizes come from a serial `jwalk` walk on the calling thread. Symbolic
//! links found inside the tree are never descended into, which keeps a walk
//! finite even when links form a cycle; a link to a regular file still counts
//! with its target's length. Only the root is resolved, so sizing a link that
//! points at a folder sizes that folder.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use tracing::debug;

use crate::error::{Error, Result};

/// Entry that was skipped while walking a folder tree
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub path: Option<PathBuf>,
    pub message: String,
}

/// What a walk had to leave out of its total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub skipped: Vec<SkippedEntry>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn merge(&mut self, other: ScanReport) {
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, path: Option<&Path>, message: String) {
        debug!(path = ?path, %message, "skipping entry");
        self.skipped.push(SkippedEntry {
            path: path.map(Path::to_path_buf),
            message,
        });
    }
}

/// Byte length of a regular file. A link at `path` is followed.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    fs::metadata(path)
        .map(|md| md.len())
        .map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })
}

/// Total size of every regular file under `path`. Unreadable entries count as 0.
pub fn folder_size<P: AsRef<Path>>(path: P) -> u64 {
    folder_size_with_report(path).0
}

/// Walk `path` and return both the total and what was skipped
pub fn folder_size_with_report<P: AsRef<Path>>(path: P) -> (u64, ScanReport) {
    let mut report = ScanReport::default();
    let Some(root) = resolve_root(path.as_ref(), &mut report) else {
        return (0, report);
    };

    let walker = WalkDir::new(&root)
        .parallelism(Parallelism::Serial)
        .follow_links(false)
        .skip_hidden(false);

    let total = tally(walker.into_iter().map(visit), &mut report);

    debug!(
        root = %root.display(),
        total,
        skipped = report.skipped.len(),
        "folder walk finished"
    );
    (total, report)
}

/// What the walk found at one position.
#[derive(Debug)]
enum Visited {
    /// Bytes to add: a regular file, or a link that resolves to one.
    Size(u64),
    /// Something that could not be read and contributes nothing.
    Unreadable(Option<PathBuf>, String),
    /// Folders (descended by the walker), linked folders and anything else.
    Ignored,
}

fn visit(entry: jwalk::Result<jwalk::DirEntry<((), ())>>) -> Visited {
    let entry = match entry {
        Ok(entry) => entry,
        Err(e) => return Visited::Unreadable(e.path().map(Path::to_path_buf), e.to_string()),
    };

    let file_type = entry.file_type();
    if file_type.is_file() {
        match entry.metadata() {
            Ok(md) => Visited::Size(md.len()),
            Err(e) => Visited::Unreadable(Some(entry.path()), e.to_string()),
        }
    } else if file_type.is_symlink() {
        // Linked files count; linked folders are never descended.
        match fs::metadata(entry.path()) {
            Ok(md) if md.is_file() => Visited::Size(md.len()),
            _ => Visited::Ignored,
        }
    } else {
        Visited::Ignored
    }
}

fn tally<I: IntoIterator<Item = Visited>>(visited: I, report: &mut ScanReport) -> u64 {
    let mut total = 0u64;
    for item in visited {
        match item {
            Visited::Size(len) => total = total.saturating_add(len),
            Visited::Unreadable(path, message) => report.skip(path.as_deref(), message),
            Visited::Ignored => {}
        }
    }
    total
}

fn resolve_root(path: &Path, report: &mut ScanReport) -> Option<PathBuf> {
    let md = match fs::symlink_metadata(path) {
        Ok(md) => md,
        Err(e) => {
            report.skip(Some(path), e.to_string());
            return None;
        }
    };
    if !md.file_type().is_symlink() {
        return Some(path.to_path_buf());
    }
    match fs::canonicalize(path) {
        Ok(target) => Some(target),
        Err(e) => {
            report.skip(Some(path), e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_bytes(path: &Path, len: usize) {
        fs::write(path, vec![0u8; len]).unwrap();
    }

    #[test]
    fn test_file_size() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.bin");
        write_bytes(&file, 1234);
        assert_eq!(file_size(&file).unwrap(), 1234);
    }

    #[test]
    fn test_file_size_missing() {
        let dir = tempdir().unwrap();
        let err = file_size(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
    }

    #[test]
    fn test_empty_folder_is_zero() {
        let dir = tempdir().unwrap();
        let (total, report) = folder_size_with_report(dir.path());
        assert_eq!(total, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_folder_size_sums_nested_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("one").join("two");
        fs::create_dir_all(&nested).unwrap();
        write_bytes(&dir.path().join("top.txt"), 10);
        write_bytes(&dir.path().join("one").join("mid.txt"), 200);
        write_bytes(&nested.join("deep.txt"), 3000);
        write_bytes(&nested.join(".hidden"), 4);

        let expected: u64 = [
            dir.path().join("top.txt"),
            dir.path().join("one").join("mid.txt"),
            nested.join("deep.txt"),
            nested.join(".hidden"),
        ]
        .iter()
        .map(|p| file_size(p).unwrap())
        .sum();

        assert_eq!(folder_size(dir.path()), expected);
        assert_eq!(expected, 3214);
    }

    #[test]
    fn test_missing_folder_is_zero_with_report() {
        let dir = tempdir().unwrap();
        let (total, report) = folder_size_with_report(dir.path().join("gone"));
        assert_eq!(total, 0);
        assert_eq!(report.skipped.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_folders_are_not_descended() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();
        write_bytes(&inner.join("data"), 500);
        // A loop back to the root must not add anything or recurse.
        symlink(dir.path(), inner.join("loop")).unwrap();

        assert_eq!(folder_size(dir.path()), 500);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_files_count_their_target() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let store = dir.path().join("store");
        let view = dir.path().join("view");
        fs::create_dir(&store).unwrap();
        fs::create_dir(&view).unwrap();
        write_bytes(&store.join("big"), 500);
        symlink(store.join("big"), view.join("big-link")).unwrap();
        symlink(store.join("missing"), view.join("dangling")).unwrap();

        let (total, report) = folder_size_with_report(&view);
        assert_eq!(total, 500);
        assert!(report.is_clean());
        assert_eq!(folder_size(dir.path()), 1000);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_is_resolved() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        write_bytes(&target.join("f"), 77);
        let link = dir.path().join("link");
        symlink(&target, &link).unwrap();

        assert_eq!(folder_size(&link), 77);
    }

    #[test]
    fn test_tally_skips_unreadable_entries() {
        let mut report = ScanReport::default();
        let visited = vec![
            Visited::Size(100),
            Visited::Unreadable(Some(PathBuf::from("locked.bin")), "permission denied".into()),
            Visited::Ignored,
            Visited::Size(20),
        ];

        assert_eq!(tally(visited, &mut report), 120);
        assert_eq!(
            report.skipped,
            vec![SkippedEntry {
                path: Some(PathBuf::from("locked.bin")),
                message: "permission denied".to_string(),
            }]
        );
    }

    #[test]
    fn test_tally_saturates() {
        let mut report = ScanReport::default();
        let visited = vec![Visited::Size(u64::MAX), Visited::Size(1)];
        assert_eq!(tally(visited, &mut report), u64::MAX);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_folder_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write_bytes(&dir.path().join("ok-1"), 100);
        write_bytes(&dir.path().join("ok-2"), 20);
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        write_bytes(&locked.join("secret"), 9999);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the permission bits; nothing to check then.
        let bypassed = fs::read_dir(&locked).is_ok();
        let (total, report) = folder_size_with_report(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if bypassed {
            return;
        }

        assert_eq!(total, 120);
        assert!(!report.is_clean());
    }
}
