//! Locate prefs.js snapshots under a directory tree
//!
//! Useful for extracted home directories or distribution images, where
//! profiles sit at arbitrary depths (`home/<user>/.mozilla/firefox/<salt>.<name>/prefs.js`).

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name the browser uses for the snapshot
pub const PREFS_FILE_NAME: &str = "prefs.js";

/// Find every regular file named `prefs.js` below `root`, sorted by path
///
/// `max_depth` limits how far to descend (`None` for unlimited). Directories
/// that cannot be read are logged and skipped; a missing or unreadable `root`
/// is an error.
pub fn find_prefs_files(root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(err
                    .into_io_error()
                    .map(Error::Io)
                    .unwrap_or_else(|| Error::NotADirectory(root.to_path_buf())));
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == PREFS_FILE_NAME {
            found.push(entry.into_path());
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "scanned for prefs.js");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_finds_nested_profiles() {
        let dir = TempDir::new().unwrap();
        let firefox = dir.path().join("home/kodachi/.mozilla/firefox");
        touch(&firefox.join("y19yqyp3.KodachiBrowserLight/prefs.js"));
        touch(&firefox.join("2083wll8.KodachiBrowserGhacks/prefs.js"));
        touch(&firefox.join("2083wll8.KodachiBrowserGhacks/user.js"));
        fs::create_dir_all(firefox.join("empty.profile/prefs.js")).unwrap();

        let found = find_prefs_files(dir.path(), None).unwrap();
        assert_eq!(
            found,
            vec![
                firefox.join("2083wll8.KodachiBrowserGhacks/prefs.js"),
                firefox.join("y19yqyp3.KodachiBrowserLight/prefs.js"),
            ]
        );
    }

    #[test]
    fn test_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("prefs.js"));
        touch(&dir.path().join("a/b/prefs.js"));

        let shallow = find_prefs_files(dir.path(), Some(1)).unwrap();
        assert_eq!(shallow, vec![dir.path().join("prefs.js")]);
        assert_eq!(find_prefs_files(dir.path(), None).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent");
        match find_prefs_files(&absent, None) {
            Err(Error::NotADirectory(path)) => assert_eq!(path, absent),
            other => panic!("unexpected {:?}", other),
        }

        let file = dir.path().join("prefs.js");
        touch(&file);
        assert!(matches!(
            find_prefs_files(&file, None),
            Err(Error::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let readable = dir.path().join("readable/prefs.js");
        let locked = dir.path().join("locked");
        touch(&readable);
        touch(&locked.join("prefs.js"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits, so the locked file may still show up
        let locked_is_readable = fs::read_dir(&locked).is_ok();
        let result = find_prefs_files(dir.path(), None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let found = result.unwrap();
        assert!(found.contains(&readable));
        let expected = if locked_is_readable { 2 } else { 1 };
        assert_eq!(found.len(), expected);
    }
}
