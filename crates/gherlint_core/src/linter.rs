//! The linting run orchestrator.
//!
//! Wires language resolution, parsing, tree building and the checker walk
//! together for every discovered feature file. Problems in an analyzed
//! document become diagnostics and the run continues with the next file;
//! problems in the engine or its configuration abort the run.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use gherlint_parser::{GherkinParser, ParseError, resolve_language};
use regex::Regex;
use tracing::{debug, info};

use crate::builder::build_tree;
use crate::checkers::Checker;
use crate::config::LinterConfig;
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::files::feature_files;
use crate::messages::{MessageDef, MessageStore};
use crate::registry::CheckerRegistry;
use crate::reporting::Reporter;
use crate::walker::walk;

/// Messages owned by the engine itself rather than by a checker.
const MESSAGES: &[MessageDef] = &[
    MessageDef {
        id: "E001",
        name: "unparseable-file",
        text: "File could not be parsed: {error_msg}",
    },
    MessageDef {
        id: "E002",
        name: "missing-language-tag",
        text: "A feature file which uses an other language than English should declare \
               this with a '# language: <lang>' tag at the beginning of the file.",
    },
    MessageDef {
        id: "E003",
        name: "wrong-language-tag",
        text: "Language tag does not match the language used",
    },
];

/// `(line:column): <description>, got '<token>'` segments of a parser
/// error, one per offending line. The first line of the error text is the
/// summary and carries no position.
fn parse_issue_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\((\d+):(\d+)\): (.+), got ").expect("issue pattern is valid")
    })
}

pub struct GherkinLinter<'r> {
    parser: GherkinParser,
    store: MessageStore,
    checkers: Vec<Box<dyn Checker>>,
    reporter: &'r mut dyn Reporter,
    diagnostics: usize,
}

impl<'r> GherkinLinter<'r> {
    /// Builds the checkers for one run. Fails fast on configuration
    /// errors and message identity collisions, before any file is read.
    pub fn new(
        config: &LinterConfig,
        registry: &CheckerRegistry,
        reporter: &'r mut dyn Reporter,
    ) -> Result<Self, LinterError> {
        let mut store = MessageStore::new();
        store.register_all(MESSAGES)?;
        let checkers = registry.build(config, &mut store)?;
        Ok(Self {
            parser: GherkinParser::new(),
            store,
            checkers,
            reporter,
            diagnostics: 0,
        })
    }

    /// Lints `path` (one file or a directory tree) and returns the number
    /// of diagnostics emitted.
    ///
    /// Files are processed strictly in order: the consistency checker
    /// accumulates feature names across the whole run.
    pub fn run(&mut self, path: &Path) -> Result<usize, LinterError> {
        for file in feature_files(path)? {
            self.lint_file(&file)?;
        }
        info!(diagnostics = self.diagnostics, "run finished");
        Ok(self.diagnostics)
    }

    pub fn lint_file(&mut self, file: &Path) -> Result<(), LinterError> {
        debug!(file = %file.display(), "linting");
        let content = fs::read_to_string(file)?;
        let path = file.display().to_string();
        let resolution = resolve_language(&content);
        let value = match self.parser.parse(&resolution.content) {
            Ok(value) => value,
            Err(error) => {
                return self.report_parser_error(&path, &error, resolution.offset);
            }
        };
        let tree = build_tree(&value, &path, resolution.offset)?;
        let Self {
            checkers,
            store,
            reporter,
            diagnostics,
            ..
        } = self;
        let mut ctx = CheckContext::new(&tree, &path, store, &mut **reporter);
        if resolution.added_language_tag {
            ctx.add_message("missing-language-tag", tree.root(), &[])?;
        } else if resolution.fixed_language_tag {
            ctx.add_message("wrong-language-tag", tree.root(), &[])?;
        }
        let mut refs: Vec<&mut dyn Checker> = checkers
            .iter_mut()
            .map(|checker| -> &mut dyn Checker { &mut **checker })
            .collect();
        walk(&tree, &mut refs, &mut ctx)?;
        *diagnostics += ctx.emitted();
        Ok(())
    }

    /// One `unparseable-file` diagnostic per positioned segment of the
    /// parser error text, at the segment's own position.
    fn report_parser_error(
        &mut self,
        path: &str,
        error: &ParseError,
        offset: u32,
    ) -> Result<(), LinterError> {
        let tree = build_tree(&serde_json::json!({ "comments": [] }), path, offset)?;
        let Self {
            store,
            reporter,
            diagnostics,
            ..
        } = self;
        let mut ctx = CheckContext::new(&tree, path, store, &mut **reporter);
        let text = error.to_string();
        for segment in text.lines().skip(1) {
            let Some(captures) = parse_issue_re().captures(segment) else {
                continue;
            };
            let line: u32 = captures[1].parse().unwrap_or(0);
            let column: u32 = captures[2].parse().unwrap_or(0);
            ctx.add_message_at(
                "unparseable-file",
                line.saturating_sub(offset),
                column,
                &[("error_msg", captures[3].to_string())],
            )?;
        }
        *diagnostics += ctx.emitted();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reporting::CollectingReporter;

    /// Runs the full pipeline over `content` with the built-in checkers
    /// and returns the emitted message names in order.
    pub(crate) fn check_content_with_config(content: &str, config: &LinterConfig) -> Vec<String> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("test.feature");
        std::fs::write(&file, content).unwrap();
        let mut reporter = CollectingReporter::new();
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut linter = GherkinLinter::new(config, &registry, &mut reporter).unwrap();
        linter.run(&file).unwrap();
        reporter
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.message_name.clone())
            .collect()
    }

    pub(crate) fn check_content(content: &str) -> Vec<String> {
        check_content_with_config(content, &LinterConfig::default())
    }

    #[test]
    fn test_unparseable_file_reports_every_offending_line() {
        let names = check_content("Given homeless one\nGiven homeless two\n");
        assert_eq!(names, vec!["unparseable-file", "unparseable-file"]);
    }

    #[test]
    fn test_unparseable_file_positions_come_from_the_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.feature");
        std::fs::write(&file, "Feature: Broken\n  Given a homeless step\n").unwrap();
        let mut reporter = CollectingReporter::new();
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut linter =
            GherkinLinter::new(&LinterConfig::default(), &registry, &mut reporter).unwrap();
        let count = linter.run(&file).unwrap();
        assert_eq!(count, 1);
        let diagnostic = &reporter.diagnostics[0];
        assert_eq!(diagnostic.message_id, "E001");
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.column, 3);
        assert!(diagnostic.text.starts_with("File could not be parsed:"));
    }

    #[test]
    fn test_missing_language_tag_is_reported_at_the_root() {
        let names = check_content("Funktionalität: Test\n  Szenario: Eins\n    Angenommen es läuft\n");
        assert_eq!(names, vec!["missing-language-tag"]);
    }

    #[test]
    fn test_wrong_language_tag_is_reported() {
        let names = check_content(
            "# language: es\nFunktionalität: Test\n  Szenario: Eins\n    Angenommen es läuft\n",
        );
        assert_eq!(names, vec!["wrong-language-tag"]);
    }

    #[test]
    fn test_correct_language_tag_is_quiet() {
        let names = check_content(
            "# language: de\nFunktionalität: Test\n  Szenario: Eins\n    Angenommen es läuft\n",
        );
        assert_eq!(names, Vec::<String>::new());
    }

    #[test]
    fn test_run_counts_diagnostics_across_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.feature"), "Feature: Same\n  Scenario: One\n    Given a step\n")
            .unwrap();
        std::fs::write(dir.path().join("b.feature"), "Feature: Same\n  Scenario: One\n    Given a step\n")
            .unwrap();
        let mut reporter = CollectingReporter::new();
        let registry = CheckerRegistry::with_builtin_checkers();
        let mut linter =
            GherkinLinter::new(&LinterConfig::default(), &registry, &mut reporter).unwrap();
        let count = linter.run(dir.path()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(reporter.diagnostics[0].message_name, "duplicated-feature-name");
        assert_eq!(reporter.diagnostics[0].path, dir.path().join("b.feature").display().to_string());
    }
}
