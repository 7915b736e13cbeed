//! Adds or fixes `# language:` tags in feature files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use gherlint_parser::resolve_language;
use tracing::{info, warn};

use crate::error::LinterError;
use crate::files::feature_files;

pub struct LanguageFixer {
    path: PathBuf,
}

impl LanguageFixer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves every feature file under the path and writes repaired
    /// content back when `modify` is set. Returns the files that were
    /// (or, on a dry run, would have been) changed.
    pub fn run(&self, modify: bool) -> Result<Vec<PathBuf>, LinterError> {
        if !modify {
            warn!("dry run enabled, no files will be modified");
        }
        let mut changed = Vec::new();
        for file in feature_files(&self.path)? {
            if self.fix_file(&file, modify)? {
                changed.push(file);
            }
        }
        Ok(changed)
    }

    fn fix_file(&self, file: &Path, modify: bool) -> Result<bool, LinterError> {
        let content = fs::read_to_string(file)?;
        let resolution = resolve_language(&content);
        if !resolution.added_language_tag && !resolution.fixed_language_tag {
            return Ok(false);
        }
        let reason = if resolution.added_language_tag {
            "no"
        } else {
            "wrong"
        };
        info!(file = %file.display(), "patching, reason: {reason} language tag");
        if modify {
            fs::write(file, resolution.content)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_tag_is_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("de.feature");
        fs::write(&file, "Funktionalität: Test\n").unwrap();
        let changed = LanguageFixer::new(dir.path()).run(true).unwrap();
        assert_eq!(changed, vec![file.clone()]);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "# language: de\nFunktionalität: Test\n"
        );
    }

    #[test]
    fn test_dry_run_reports_but_leaves_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("de.feature");
        fs::write(&file, "Funktionalität: Test\n").unwrap();
        let changed = LanguageFixer::new(dir.path()).run(false).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "Funktionalität: Test\n");
    }

    #[test]
    fn test_wrong_tag_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("de.feature");
        fs::write(&file, "# language: es\nFunktionalität: Test\n").unwrap();
        LanguageFixer::new(dir.path()).run(true).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "# language: de\nFunktionalität: Test\n"
        );
    }

    #[test]
    fn test_correct_files_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.feature"), "Feature: Test\n").unwrap();
        fs::write(
            dir.path().join("de.feature"),
            "# language: de\nFunktionalität: Test\n",
        )
        .unwrap();
        let changed = LanguageFixer::new(dir.path()).run(true).unwrap();
        assert_eq!(changed, Vec::<std::path::PathBuf>::new());
    }

    #[test]
    fn test_fixing_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("de.feature");
        fs::write(&file, "Funktionalität: Test\n").unwrap();
        let fixer = LanguageFixer::new(dir.path());
        assert_eq!(fixer.run(true).unwrap().len(), 1);
        assert_eq!(fixer.run(true).unwrap().len(), 0);
    }
}
