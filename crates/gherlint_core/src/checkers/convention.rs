//! Checker enforcing project conventions, currently tag naming patterns.

use gherlint_ast::{Node, NodeKind, Tag};
use regex::Regex;
use serde::Deserialize;

use crate::checkers::Checker;
use crate::config::{CheckerOptions, LinterConfig};
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::messages::MessageDef;

const MESSAGES: &[MessageDef] = &[
    MessageDef {
        id: "C401",
        name: "feature-tags-pattern-mismatch",
        text: "Feature tag {tag} do not follow the pattern: {pattern}",
    },
    MessageDef {
        id: "C402",
        name: "scenario-tags-pattern-mismatch",
        text: "Scenario tag {tag} do not follow the pattern: {pattern}",
    },
];

#[derive(Debug, Default, Deserialize)]
pub struct ConventionOptions {
    #[serde(default)]
    pub feature_tags_pattern: Option<String>,
    #[serde(default)]
    pub scenario_tags_pattern: Option<String>,
}

impl CheckerOptions for ConventionOptions {
    const CONFIG_SECTION: &'static str = "convention";
}

pub struct ConventionChecker {
    feature_tags_pattern: Option<Regex>,
    scenario_tags_pattern: Option<Regex>,
}

impl ConventionChecker {
    /// An invalid pattern is a configuration error and aborts the run
    /// before any file is linted.
    pub fn new(config: &LinterConfig) -> Result<Self, LinterError> {
        let options = ConventionOptions::from_config(config)?;
        Ok(Self {
            feature_tags_pattern: compile(options.feature_tags_pattern.as_deref())?,
            scenario_tags_pattern: compile(options.scenario_tags_pattern.as_deref())?,
        })
    }

    fn check_tag(
        ctx: &mut CheckContext<'_>,
        node: &Node,
        tag: &Tag,
        pattern: &Regex,
        message: &str,
    ) -> Result<(), LinterError> {
        if !matches_at_start(pattern, &tag.name) {
            ctx.add_message(
                message,
                node,
                &[
                    ("tag", tag.name.clone()),
                    ("pattern", pattern.as_str().to_string()),
                ],
            )?;
        }
        Ok(())
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, LinterError> {
    pattern
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|error| LinterError::config(format!("invalid tag pattern: {error}")))
        })
        .transpose()
}

/// Pattern match anchored at the start of the tag, not a substring search.
fn matches_at_start(pattern: &Regex, text: &str) -> bool {
    pattern
        .find(text)
        .is_some_and(|found| found.start() == 0)
}

impl Checker for ConventionChecker {
    fn name(&self) -> &'static str {
        "convention"
    }

    fn messages(&self) -> &'static [MessageDef] {
        MESSAGES
    }

    fn visit_tag(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Tag,
    ) -> Result<(), LinterError> {
        let Some(parent) = node.parent.map(|id| ctx.tree().node(id)) else {
            return Ok(());
        };
        match &parent.kind {
            NodeKind::Feature(_) => {
                if let Some(pattern) = &self.feature_tags_pattern {
                    Self::check_tag(ctx, node, data, pattern, "feature-tags-pattern-mismatch")?;
                }
            }
            NodeKind::Scenario(_) | NodeKind::ScenarioOutline(_) => {
                if let Some(pattern) = &self.scenario_tags_pattern {
                    Self::check_tag(ctx, node, data, pattern, "scenario-tags-pattern-mismatch")?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
