//! One level of a folder, with a size for every child.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::size::{folder_size_with_report, ScanReport};

/// Appended to folder names so they stand out from files in the Name column.
pub const FOLDER_MARKER: char = '/';

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name; folders end with [`FOLDER_MARKER`].
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub is_dir: bool,
}

impl Entry {
    fn file(name: String, path: PathBuf, size: u64) -> Self {
        Self {
            name,
            path,
            size,
            is_dir: false,
        }
    }

    fn folder(mut name: String, path: PathBuf, size: u64) -> Self {
        name.push(FOLDER_MARKER);
        Self {
            name,
            path,
            size,
            is_dir: true,
        }
    }
}

/// List the immediate children of `folder` in enumeration order.
pub fn list_directory<P: AsRef<Path>>(folder: P) -> Result<Vec<Entry>> {
    Ok(list_directory_with_report(folder)?.0)
}

/// List `folder` and collect what the folder walks had to skip.
///
/// Every child folder is walked in full on each call. Children that are
/// neither a file nor a folder once links are resolved are left out, as are
/// children whose metadata cannot be read.
pub fn list_directory_with_report<P: AsRef<Path>>(folder: P) -> Result<(Vec<Entry>, ScanReport)> {
    let folder = folder.as_ref();
    let read_dir_err = |source| Error::ReadDir {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    let mut report = ScanReport::default();

    for child in fs::read_dir(folder).map_err(read_dir_err)? {
        let child = child.map_err(read_dir_err)?;
        let path = child.path();
        let name = child.file_name().to_string_lossy().into_owned();

        let Ok(md) = fs::metadata(&path) else {
            continue;
        };

        if md.is_file() {
            entries.push(Entry::file(name, path, md.len()));
        } else if md.is_dir() {
            let (size, walk_report) = folder_size_with_report(&path);
            report.merge(walk_report);
            entries.push(Entry::folder(name, path, size));
        }
    }

    debug!(
        folder = %folder.display(),
        entries = entries.len(),
        skipped = report.skipped.len(),
        "listed folder"
    );
    Ok((entries, report))
}

/// Largest first. Stable, so equal sizes keep their listing order, which is
/// whatever order the filesystem enumerated them in.
pub fn sort_by_size_desc(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.size.cmp(&a.size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_bytes(path: &Path, len: usize) {
        fs::write(path, vec![1u8; len]).unwrap();
    }

    fn entry(name: &str, size: u64) -> Entry {
        Entry::file(name.to_string(), PathBuf::from(name), size)
    }

    #[test]
    fn test_list_files_sorted_by_size() {
        let dir = tempdir().unwrap();
        write_bytes(&dir.path().join("a"), 100);
        write_bytes(&dir.path().join("b"), 300);
        write_bytes(&dir.path().join("c"), 200);

        let mut entries = list_directory(dir.path()).unwrap();
        sort_by_size_desc(&mut entries);

        let sizes: Vec<u64> = entries.iter().map(|e| e.size).collect();
        assert_eq!(sizes, vec![300, 200, 100]);
        assert_eq!(entries[0].name, "b");
        assert_eq!(entries[0].path, dir.path().join("b"));
        assert!(entries.iter().all(|e| !e.is_dir));
    }

    #[test]
    fn test_folders_get_marker_and_recursive_size() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("photos");
        fs::create_dir_all(sub.join("2024")).unwrap();
        write_bytes(&sub.join("a.jpg"), 40);
        write_bytes(&sub.join("2024").join("b.jpg"), 60);
        write_bytes(&dir.path().join("notes.txt"), 5);

        let entries = list_directory(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);

        let folder = entries.iter().find(|e| e.is_dir).unwrap();
        assert_eq!(folder.name, "photos/");
        assert_eq!(folder.path, sub);
        assert_eq!(folder.size, 100);

        let file = entries.iter().find(|e| !e.is_dir).unwrap();
        assert_eq!(file.name, "notes.txt");
    }

    #[test]
    fn test_sizes_are_recomputed_on_every_listing() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_bytes(&sub.join("one"), 10);
        assert_eq!(list_directory(dir.path()).unwrap()[0].size, 10);

        write_bytes(&sub.join("two"), 15);
        assert_eq!(list_directory(dir.path()).unwrap()[0].size, 25);
    }

    #[test]
    fn test_missing_folder_fails() {
        let dir = tempdir().unwrap();
        let err = list_directory(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::ReadDir { .. }));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_listing_a_file_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        write_bytes(&file, 1);
        assert!(matches!(list_directory(&file), Err(Error::ReadDir { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_omitted() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        write_bytes(&dir.path().join("real"), 3);
        symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

        let entries = list_directory(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "real");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folder_lists_as_folder() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        write_bytes(&target.join("x"), 8);
        symlink(&target, dir.path().join("alias")).unwrap();

        let entries = list_directory(dir.path()).unwrap();
        let alias = entries.iter().find(|e| e.name == "alias/").unwrap();
        assert!(alias.is_dir);
        assert_eq!(alias.size, 8);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut entries = vec![entry("first", 5), entry("big", 9), entry("second", 5)];
        sort_by_size_desc(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["big", "first", "second"]);
    }
}
