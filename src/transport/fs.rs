use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::ActivityError;
use crate::types::SampleId;

/// List files carrying `extension` directly under `root`, sorted by file name.
///
/// Non-recursive: subdirectories are ignored. Directory iteration order is
/// platform-dependent, so the explicit sort is what keeps compiled row order
/// reproducible.
pub fn report_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ActivityError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// True if the path carries `extension` (case-insensitive, without the dot).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Sample identifier for a report path: the file stem, lossily decoded.
pub fn file_stem_string(path: &Path) -> SampleId {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Copy every file carrying `extension` under `src` (recursively) into the
/// flat directory `dest`, creating it if needed.
///
/// Name collisions overwrite the earlier copy; permissions travel with
/// `fs::copy`. Unreadable directory entries are skipped. Returns the number
/// of files copied.
pub fn flatten_directory(src: &Path, dest: &Path, extension: &str) -> Result<usize, ActivityError> {
    fs::create_dir_all(dest)?;
    let mut copied = 0;
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        if !has_extension(path, extension) {
            continue;
        }
        let target = dest.join(entry.file_name());
        fs::copy(path, &target)?;
        copied += 1;
        debug!(from = %path.display(), to = %target.display(), "copied report file");
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn report_files_are_sorted_and_non_recursive() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("notes.md"), "skip").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("c.txt"), "c").unwrap();

        let files = report_files(root, "txt").unwrap();
        let names: Vec<SampleId> = files.iter().map(|path| file_stem_string(path)).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_extension(Path::new("r.TXT"), "txt"));
        assert!(has_extension(Path::new("r.txt"), "TXT"));
        assert!(!has_extension(Path::new("r.tsv"), "txt"));
        assert!(!has_extension(Path::new("bare"), "txt"));
    }

    #[test]
    fn missing_root_propagates_io_error() {
        let temp = tempdir().unwrap();
        let err = report_files(&temp.path().join("gone"), "txt").unwrap_err();
        assert!(matches!(err, ActivityError::Io(_)));
    }

    #[test]
    fn flatten_copies_recursively_and_overwrites() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest");
        fs::create_dir_all(src.join("deep")).unwrap();
        fs::write(src.join("one.txt"), "top").unwrap();
        fs::write(src.join("deep").join("two.txt"), "deep").unwrap();
        fs::write(src.join("deep").join("skip.log"), "log").unwrap();

        let copied = flatten_directory(&src, &dest, "txt").unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dest.join("one.txt")).unwrap(), "top");
        assert_eq!(fs::read_to_string(dest.join("two.txt")).unwrap(), "deep");
        assert!(!dest.join("skip.log").exists());

        // A second flatten with changed content overwrites in place.
        fs::write(src.join("one.txt"), "updated").unwrap();
        flatten_directory(&src, &dest, "txt").unwrap();
        assert_eq!(fs::read_to_string(dest.join("one.txt")).unwrap(), "updated");
    }
}
