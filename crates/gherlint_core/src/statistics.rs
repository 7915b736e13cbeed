//! Not a checker in the complaining sense; it counts features, scenarios
//! and steps and renders them as a small table.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use gherlint_ast::{Feature, Node, Scenario, ScenarioOutline, Step};
use gherlint_parser::{GherkinParser, resolve_language};
use tracing::warn;

use crate::builder::build_tree;
use crate::checkers::Checker;
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::files::feature_files;
use crate::messages::MessageStore;
use crate::reporting::CollectingReporter;
use crate::walker::walk;

#[derive(Debug, Default)]
pub struct Statistics {
    pub features: usize,
    pub scenario_outlines: usize,
    pub scenarios: usize,
    pub steps: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        let rows = [
            ("Features", self.features),
            ("Scenario Outlines", self.scenario_outlines),
            ("Scenarios", self.scenarios),
            ("Steps", self.steps),
        ];
        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let count_width = rows
            .iter()
            .map(|(_, count)| count.to_string().len())
            .max()
            .unwrap_or(1);
        let separator = "-".repeat(label_width + count_width + 7);
        let mut out = String::new();
        for (label, count) in rows {
            let _ = writeln!(out, "{separator}");
            let _ = writeln!(out, "| {label:<label_width$} | {count:>count_width$} |");
        }
        let _ = writeln!(out, "{separator}");
        out
    }
}

/// Counts the model elements of every feature file under `path`.
/// Unparseable files are skipped with a warning.
pub fn compute_statistics(path: &Path) -> Result<Statistics, LinterError> {
    let parser = GherkinParser::new();
    let mut statistics = Statistics::new();
    let store = MessageStore::new();
    for file in feature_files(path)? {
        let content = fs::read_to_string(&file)?;
        let resolution = resolve_language(&content);
        let value = match parser.parse(&resolution.content) {
            Ok(value) => value,
            Err(error) => {
                warn!(file = %file.display(), "skipping unparseable file: {error}");
                continue;
            }
        };
        let name = file.display().to_string();
        let tree = build_tree(&value, &name, resolution.offset)?;
        let mut reporter = CollectingReporter::new();
        let mut ctx = CheckContext::new(&tree, &name, &store, &mut reporter);
        walk(&tree, &mut [&mut statistics], &mut ctx)?;
    }
    Ok(statistics)
}

impl Checker for Statistics {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn visit_feature(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Feature,
    ) -> Result<(), LinterError> {
        self.features += 1;
        Ok(())
    }

    fn visit_scenario(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Scenario,
    ) -> Result<(), LinterError> {
        self.scenarios += 1;
        Ok(())
    }

    fn visit_scenario_outline(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &ScenarioOutline,
    ) -> Result<(), LinterError> {
        self.scenario_outlines += 1;
        Ok(())
    }

    fn visit_step(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Step,
    ) -> Result<(), LinterError> {
        self.steps += 1;
        Ok(())
    }
}
