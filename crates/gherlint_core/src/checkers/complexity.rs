//! Checker focussing on complexity issues. These may be constructs that
//! could be simplified, or that make a feature harder to understand.

use gherlint_ast::{Feature, Node, NodeId, NodeKind, StepType};

use crate::checkers::Checker;
use crate::config::LinterConfig;
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::messages::MessageDef;

const MESSAGES: &[MessageDef] = &[
    MessageDef {
        id: "R201",
        name: "outline-could-be-a-scenario",
        text: "This outline contains no or only one example, consider using a normal scenario instead",
    },
    MessageDef {
        id: "R202",
        name: "consider-using-background",
        text: "All scenarios start with the same given step, consider moving it into a background",
    },
];

/// First given step of each scenario of the current feature, `None` when
/// a scenario does not start with one.
#[derive(Debug, Default)]
pub struct ComplexityChecker {
    first_given_steps: Vec<Option<String>>,
}

impl ComplexityChecker {
    pub fn new(_config: &LinterConfig) -> Result<Self, LinterError> {
        Ok(Self::default())
    }

    fn record_first_step(
        &mut self,
        ctx: &CheckContext<'_>,
        steps: &[NodeId],
    ) -> Result<(), LinterError> {
        let Some(first) = steps.first() else {
            self.first_given_steps.push(None);
            return Ok(());
        };
        let entry = match (&ctx.tree().node(*first).kind, ctx.tree().inferred_step_type(*first)?) {
            (NodeKind::Step(step), StepType::Given) => Some(step.text.clone()),
            _ => None,
        };
        self.first_given_steps.push(entry);
        Ok(())
    }
}

impl Checker for ComplexityChecker {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn messages(&self) -> &'static [MessageDef] {
        MESSAGES
    }

    fn visit_feature(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Feature,
    ) -> Result<(), LinterError> {
        self.first_given_steps.clear();
        Ok(())
    }

    fn leave_feature(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        _data: &Feature,
    ) -> Result<(), LinterError> {
        let steps = std::mem::take(&mut self.first_given_steps);
        if steps.len() < 2 {
            return Ok(());
        }
        let [first, rest @ ..] = steps.as_slice() else {
            return Ok(());
        };
        if first.is_some() && rest.iter().all(|step| step == first) {
            ctx.add_message("consider-using-background", node, &[])?;
        }
        Ok(())
    }

    fn visit_scenario(
        &mut self,
        ctx: &mut CheckContext<'_>,
        _node: &Node,
        data: &gherlint_ast::Scenario,
    ) -> Result<(), LinterError> {
        self.record_first_step(ctx, &data.steps)
    }

    fn visit_scenario_outline(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &gherlint_ast::ScenarioOutline,
    ) -> Result<(), LinterError> {
        self.record_first_step(ctx, &data.steps)?;
        let total_example_values: usize = data
            .examples
            .iter()
            .filter_map(|id| match &ctx.tree().node(*id).kind {
                NodeKind::Examples(examples) => Some(examples.number_of_entries()),
                _ => None,
            })
            .sum();
        if total_example_values < 2 {
            ctx.add_message("outline-could-be-a-scenario", node, &[])?;
        }
        Ok(())
    }
}
