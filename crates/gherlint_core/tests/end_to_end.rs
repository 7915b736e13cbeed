//! End-to-end runs over real files on disk.

use std::fs;
use std::path::Path;

use gherlint_core::{
    CheckerRegistry, CollectingReporter, GherkinLinter, LanguageFixer, LinterConfig, TextReporter,
};
use pretty_assertions::assert_eq;

fn lint(path: &Path) -> CollectingReporter {
    let mut reporter = CollectingReporter::new();
    let registry = CheckerRegistry::with_builtin_checkers();
    let mut linter =
        GherkinLinter::new(&LinterConfig::default(), &registry, &mut reporter).unwrap();
    linter.run(path).unwrap();
    reporter
}

#[test]
fn unnamed_single_row_outline_is_flagged_without_tag_noise() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("outline.feature");
    fs::write(
        &file,
        "\
@smoke
Feature: Payments
  @wip
  Scenario Outline:
    Given a payment of <amount>
    Then it is accepted

    Examples:
      | amount |
      | 100    |
",
    )
    .unwrap();
    let reporter = lint(&file);
    let names = reporter.names();
    assert!(names.contains(&"outline-could-be-a-scenario"));
    assert!(names.contains(&"missing-scenario-name"));
    assert!(!names.contains(&"duplicated-tag"));
}

#[test]
fn german_file_without_declaration_gets_a_language_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("de.feature");
    fs::write(
        &file,
        "Funktionalität: Anmeldung\n  Szenario: Erfolg\n    Angenommen ich bin registriert\n",
    )
    .unwrap();
    let reporter = lint(&file);
    assert_eq!(reporter.names(), vec!["missing-language-tag"]);
    // Positions refer to the original file, not the patched content.
    assert_eq!(reporter.diagnostics[0].line, 0);
}

#[test]
fn unparseable_file_produces_one_diagnostic_per_segment() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.feature");
    fs::write(&file, "Given nothing\nWhen still nothing\n").unwrap();
    let reporter = lint(&file);
    assert_eq!(reporter.names(), vec!["unparseable-file", "unparseable-file"]);
    assert_eq!(reporter.diagnostics[0].line, 1);
    assert_eq!(reporter.diagnostics[1].line, 2);
}

#[test]
fn feature_names_are_checked_across_the_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.feature"),
        "Feature: Checkout\n  Scenario: Pay\n    Given a cart\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.feature"),
        "Feature: Checkout\n  Scenario: Refund\n    Given an order\n",
    )
    .unwrap();
    let reporter = lint(dir.path());
    assert_eq!(reporter.names(), vec!["duplicated-feature-name"]);
    assert!(reporter.diagnostics[0].path.ends_with("b.feature"));
}

#[test]
fn text_report_groups_diagnostics_by_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bare.feature");
    fs::write(&file, "Feature:\n  Scenario:\n    Given a step\n").unwrap();
    let mut reporter = TextReporter::new(Vec::new());
    let registry = CheckerRegistry::with_builtin_checkers();
    let mut linter =
        GherkinLinter::new(&LinterConfig::default(), &registry, &mut reporter).unwrap();
    let count = linter.run(&file).unwrap();
    assert_eq!(count, 2);
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let path = file.display().to_string();
    assert_eq!(output.matches(&format!("************* {path}")).count(), 1);
    assert!(output.contains(&format!("{path}:1:1: Feature has no name (missing-feature-name)")));
    assert!(output.contains(&format!("{path}:2:3: Scenario has no name (missing-scenario-name)")));
}

#[test]
fn fixed_files_lint_clean_afterwards() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("de.feature");
    fs::write(
        &file,
        "Funktionalität: Anmeldung\n  Szenario: Erfolg\n    Angenommen ich bin registriert\n",
    )
    .unwrap();
    let changed = LanguageFixer::new(dir.path()).run(true).unwrap();
    assert_eq!(changed.len(), 1);
    let reporter = lint(&file);
    assert_eq!(reporter.names(), Vec::<&str>::new());
}

#[test]
fn configured_tag_patterns_apply_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config_file = dir.path().join("gherlint.jsonc");
    fs::write(
        &config_file,
        r#"{
            // enforce lowercase feature tags
            "convention": { "feature_tags_pattern": "@[a-z]+$" }
        }"#,
    )
    .unwrap();
    let file = dir.path().join("tagged.feature");
    fs::write(
        &file,
        "@Smoke\nFeature: Tagged\n  Scenario: One\n    Given a step\n",
    )
    .unwrap();
    let config = LinterConfig::load(None, dir.path()).unwrap();
    let mut reporter = CollectingReporter::new();
    let registry = CheckerRegistry::with_builtin_checkers();
    let mut linter = GherkinLinter::new(&config, &registry, &mut reporter).unwrap();
    linter.run(&file).unwrap();
    assert_eq!(reporter.names(), vec!["feature-tags-pattern-mismatch"]);
    assert_eq!(
        reporter.diagnostics[0].text,
        "Feature tag @Smoke do not follow the pattern: @[a-z]+$"
    );
}
