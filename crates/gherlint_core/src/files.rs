//! Input file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::LinterError;

const FEATURE_EXTENSION: &str = "feature";

/// Resolves `path` to the ordered list of feature files to process.
///
/// A single file must carry the `.feature` extension; a directory is
/// walked recursively in stable name order.
pub fn feature_files(path: &Path) -> Result<Vec<PathBuf>, LinterError> {
    if path.is_file() {
        return if has_feature_extension(path) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err(LinterError::UnsupportedFileType(path.display().to_string()))
        };
    }
    if !path.is_dir() {
        return Err(LinterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|error| {
            LinterError::Io(error.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("walk failed without an io error")
            }))
        })?;
        if entry.file_type().is_file() && has_feature_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    debug!(path = %path.display(), count = files.len(), "discovered feature files");
    Ok(files)
}

fn has_feature_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == FEATURE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_single_feature_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.feature");
        fs::write(&file, "Feature: One\n").unwrap();
        assert_eq!(feature_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_other_file_types_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "nope").unwrap();
        let error = feature_files(&file).unwrap_err();
        assert!(matches!(error, LinterError::UnsupportedFileType(_)));
        assert!(error.to_string().ends_with("is not a .feature file"));
    }

    #[test]
    fn test_directory_is_walked_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.feature"), "").unwrap();
        fs::write(dir.path().join("a.feature"), "").unwrap();
        fs::write(dir.path().join("nested/c.feature"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        let names: Vec<String> = feature_files(dir.path())
            .unwrap()
            .iter()
            .map(|file| {
                file.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.feature", "b.feature", "nested/c.feature"]);
    }

    #[test]
    fn test_missing_path_is_an_io_error() {
        let error = feature_files(Path::new("/no/such/path")).unwrap_err();
        assert!(matches!(error, LinterError::Io(_)));
    }
}
