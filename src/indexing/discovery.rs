use crate::core::error::{Error, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A directory or note file found under the root
#[derive(Debug, Clone)]
pub struct DiscoveredEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub is_dir: bool,
}

/// Walk the note hierarchy rooted at `root`, returning every directory and
/// every note file, parents before children. Only regular files matching the
/// note-file glob (`[!.]*.txt`) are returned.
pub fn discover(root: &Path) -> Result<Vec<DiscoveredEntry>> {
    if !root.exists() {
        return Err(Error::RootDir(format!(
            "directory does not exist: {}",
            root.display()
        )));
    }

    if !root.is_dir() {
        return Err(Error::RootDir(format!(
            "path is not a directory: {}",
            root.display()
        )));
    }

    let mut entries = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(true) // skip dot files and dot directories
        .git_ignore(true)
        .git_exclude(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                let is_dir = path.is_dir();
                if !is_dir && !is_note_file(path) {
                    continue;
                }
                let relative_path = path
                    .strip_prefix(root)
                    .map_err(|e| {
                        Error::RootDir(format!("failed to get relative path: {}", e))
                    })?
                    .to_path_buf();
                entries.push(DiscoveredEntry {
                    path: path.to_path_buf(),
                    relative_path,
                    is_dir,
                });
            }
            Err(err) => {
                // Some entries may be inaccessible; keep walking
                tracing::warn!("failed to access entry: {}", err);
            }
        }
    }

    Ok(entries)
}

/// Check whether a file matches the note-file glob: non-hidden, `.txt` suffix
pub fn is_note_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(true);
    let txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "txt")
        .unwrap_or(false);
    !hidden && txt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_note_file() {
        assert!(is_note_file(Path::new("test.txt")));
        assert!(is_note_file(Path::new("dir/notes.txt")));
        assert!(!is_note_file(Path::new(".hidden.txt")));
        assert!(!is_note_file(Path::new("test.md")));
        assert!(!is_note_file(Path::new("test")));
    }

    #[test]
    fn test_discover_parents_before_children() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/notes.txt"), "+ t\n").unwrap();
        fs::write(dir.path().join("a/skipped.md"), "nope").unwrap();

        let entries = discover(dir.path()).unwrap();
        let rels: Vec<_> = entries
            .iter()
            .map(|e| e.relative_path.to_string_lossy().into_owned())
            .collect();
        let a = rels.iter().position(|r| r == "a").unwrap();
        let b = rels.iter().position(|r| r == "a/b").unwrap();
        let f = rels.iter().position(|r| r == "a/b/notes.txt").unwrap();
        assert!(a < b && b < f);
        assert!(!rels.iter().any(|r| r.ends_with(".md")));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(matches!(discover(&missing), Err(Error::RootDir(_))));
    }
}
