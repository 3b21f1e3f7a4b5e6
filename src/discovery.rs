//! Directory listing filtered by file extension.
//!
//! Only the top level of the directory is scanned. Entries are matched on the
//! end of their file name, so `clip.MP4` matches `mp4` when the filter is
//! case-insensitive and a bare `.mp4` file name matches too.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{AviconvError, Result};

/// Set of file extensions a directory entry is matched against
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
    case_sensitive: bool,
}

impl ExtensionFilter {
    /// Case-insensitive filter. Extensions may be given with or without the dot.
    pub fn case_insensitive<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(extensions, false)
    }

    /// Case-sensitive filter. Extensions may be given with or without the dot.
    pub fn case_sensitive<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(extensions, true)
    }

    fn build<I, S>(extensions: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim_start_matches('.');
                let suffix = format!(".{}", ext);
                if case_sensitive {
                    suffix
                } else {
                    suffix.to_lowercase()
                }
            })
            .collect();

        Self {
            suffixes,
            case_sensitive,
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        if self.case_sensitive {
            self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
        } else {
            let lowered = file_name.to_lowercase();
            self.suffixes.iter().any(|s| lowered.ends_with(s.as_str()))
        }
    }
}

/// Find regular files directly inside `dir` whose names match `filter`.
///
/// Results are sorted by file name. A missing or unreadable directory is an
/// error. Names that are not valid UTF-8 are matched and returned unchanged.
pub fn find_matching_files(dir: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        if dir.exists() {
            return Err(AviconvError::NotADirectory(dir.to_path_buf()));
        }
        return Err(AviconvError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No such directory: {}", dir.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();

        // Extensions are ASCII, so a lossy name still matches its suffix
        let name = entry.file_name().to_string_lossy();

        if path.is_file() && filter.matches(&name) {
            files.push(path.to_path_buf());
        }
    }

    debug!("Found {} matching files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_case_insensitive_match() {
        let filter = ExtensionFilter::case_insensitive(["mp4", ".avi", "mov", "mkv"]);
        assert!(filter.matches("CLIP.MP4"));
        assert!(filter.matches("holiday.Mkv"));
        assert!(filter.matches("a.avi"));
        assert!(!filter.matches("notes.txt"));
        assert!(!filter.matches("mp4"));
    }

    #[test]
    fn test_case_sensitive_match() {
        let filter = ExtensionFilter::case_sensitive(["avi"]);
        assert!(filter.matches("a.avi"));
        assert!(!filter.matches("A.AVI"));
    }

    #[test]
    fn test_find_matching_files_top_level_only() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.MOV").touch().unwrap();
        temp.child("a.mp4").touch().unwrap();
        temp.child("readme.txt").touch().unwrap();
        temp.child("nested/c.mp4").touch().unwrap();
        temp.child("dir.mkv").create_dir_all().unwrap();

        let filter = ExtensionFilter::case_insensitive(["mp4", "avi", "mov", "mkv"]);
        let files = find_matching_files(temp.path(), &filter).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.mp4", "b.MOV"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = assert_fs::TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.MP4");
        std::fs::write(temp.path().join(name), b"").unwrap();
        std::fs::write(temp.path().join(OsStr::from_bytes(b"caf\xe9.txt")), b"").unwrap();

        let filter = ExtensionFilter::case_insensitive(["mp4", "avi", "mov", "mkv"]);
        let files = find_matching_files(temp.path(), &filter).unwrap();

        assert_eq!(files, vec![temp.path().join(name)]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let filter = ExtensionFilter::case_insensitive(["mp4"]);
        assert!(find_matching_files(&temp.path().join("absent"), &filter).is_err());
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("video.mp4");
        file.touch().unwrap();

        let filter = ExtensionFilter::case_insensitive(["mp4"]);
        let err = find_matching_files(file.path(), &filter).unwrap_err();
        assert!(matches!(err, AviconvError::NotADirectory(_)));
    }
}
