//! Checker focussing on completeness of feature files, e.g. that every
//! scenario has a name and that every parameter used in a scenario
//! outline is defined in an examples table.

use gherlint_ast::{Background, Document, Examples, Feature, Node, NodeKind, Scenario, ScenarioOutline};

use crate::checkers::Checker;
use crate::config::LinterConfig;
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::messages::MessageDef;

const MESSAGES: &[MessageDef] = &[
    MessageDef {
        id: "W101",
        name: "missing-feature-name",
        text: "Feature has no name",
    },
    MessageDef {
        id: "W102",
        name: "missing-scenario-name",
        text: "Scenario has no name",
    },
    MessageDef {
        id: "W103",
        name: "file-has-no-feature",
        text: "File contains no feature",
    },
    MessageDef {
        id: "W104",
        name: "empty-feature",
        text: "Feature has no scenarios",
    },
    MessageDef {
        id: "W105",
        name: "empty-scenario",
        text: "Scenario has no steps",
    },
    MessageDef {
        id: "W106",
        name: "empty-background",
        text: "Background has no steps",
    },
    MessageDef {
        id: "W107",
        name: "missing-parameter",
        text: "Parameter {parameter} is not defined in any examples table",
    },
];

#[derive(Debug, Default)]
pub struct CompletenessChecker;

impl CompletenessChecker {
    pub fn new(_config: &LinterConfig) -> Result<Self, LinterError> {
        Ok(Self)
    }
}

impl Checker for CompletenessChecker {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn messages(&self) -> &'static [MessageDef] {
        MESSAGES
    }

    fn visit_document(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Document,
    ) -> Result<(), LinterError> {
        if data.feature.is_none() {
            ctx.add_message("file-has-no-feature", node, &[])?;
        }
        Ok(())
    }

    fn visit_feature(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Feature,
    ) -> Result<(), LinterError> {
        if data.name.is_empty() {
            ctx.add_message("missing-feature-name", node, &[])?;
        }
        if data.scenarios.is_empty() {
            ctx.add_message("empty-feature", node, &[])?;
        }
        Ok(())
    }

    fn visit_background(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Background,
    ) -> Result<(), LinterError> {
        if data.steps.is_empty() {
            ctx.add_message("empty-background", node, &[])?;
        }
        Ok(())
    }

    fn visit_scenario(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Scenario,
    ) -> Result<(), LinterError> {
        if data.name.is_empty() {
            ctx.add_message("missing-scenario-name", node, &[])?;
        }
        if data.steps.is_empty() {
            ctx.add_message("empty-scenario", node, &[])?;
        }
        Ok(())
    }

    fn visit_scenario_outline(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &ScenarioOutline,
    ) -> Result<(), LinterError> {
        if data.name.is_empty() {
            ctx.add_message("missing-scenario-name", node, &[])?;
        }
        if data.steps.is_empty() {
            ctx.add_message("empty-scenario", node, &[])?;
        }
        // A parameter counts as defined when at least one examples table
        // declares it; not every table has to.
        for parameter in &data.parameters {
            let defined = data.examples.iter().any(|id| {
                matches!(
                    &ctx.tree().node(*id).kind,
                    NodeKind::Examples(Examples { parameters, .. })
                        if parameters.contains(parameter)
                )
            });
            if !defined {
                ctx.add_message(
                    "missing-parameter",
                    node,
                    &[("parameter", format!("<{parameter}>"))],
                )?;
            }
        }
        Ok(())
    }
}
