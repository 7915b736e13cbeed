//! Checker focussing on consistency issues within and across files.

use std::collections::HashSet;

use gherlint_ast::{
    Background, Document, Feature, Node, NodeId, NodeKind, Scenario, ScenarioOutline, StepType,
};

use crate::checkers::Checker;
use crate::config::LinterConfig;
use crate::context::CheckContext;
use crate::error::LinterError;
use crate::messages::MessageDef;

const MESSAGES: &[MessageDef] = &[
    MessageDef {
        id: "E301",
        name: "examples-outside-scenario-outline",
        text: "Examples used outside a Scenario Outline",
    },
    MessageDef {
        id: "E302",
        name: "only-given-allowed-in-background",
        text: "A background can only contain given steps, found a {step_type} step",
    },
    MessageDef {
        id: "W301",
        name: "duplicated-tag",
        text: "Tag {tag} used multiple times on the same element",
    },
    MessageDef {
        id: "W302",
        name: "duplicated-scenario-name",
        text: "Scenario name {name} used multiple times in this feature",
    },
    MessageDef {
        id: "W303",
        name: "duplicated-feature-name",
        text: "Feature name {name} already used in another file of this run",
    },
];

/// The duplicated-feature-name set is deliberately never cleared; it is
/// the one piece of cross-file state in the run.
#[derive(Debug, Default)]
pub struct ConsistencyChecker {
    scenario_names: HashSet<String>,
    feature_names: HashSet<String>,
}

impl ConsistencyChecker {
    pub fn new(_config: &LinterConfig) -> Result<Self, LinterError> {
        Ok(Self::default())
    }

    fn check_duplicated_tags(
        &self,
        ctx: &mut CheckContext<'_>,
        tags: &[NodeId],
    ) -> Result<(), LinterError> {
        let mut seen = HashSet::new();
        for id in tags {
            let tag_node = ctx.tree().node(*id);
            let NodeKind::Tag(tag) = &tag_node.kind else {
                continue;
            };
            if !seen.insert(tag.name.clone()) {
                ctx.add_message("duplicated-tag", tag_node, &[("tag", tag.name.clone())])?;
            }
        }
        Ok(())
    }

    fn check_scenario_name(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        name: &str,
    ) -> Result<(), LinterError> {
        if name.is_empty() {
            return Ok(());
        }
        if !self.scenario_names.insert(name.to_string()) {
            ctx.add_message(
                "duplicated-scenario-name",
                node,
                &[("name", format!("'{name}'"))],
            )?;
        }
        Ok(())
    }

    fn check_background_steps(
        &self,
        ctx: &mut CheckContext<'_>,
        steps: &[NodeId],
    ) -> Result<(), LinterError> {
        for id in steps {
            let inferred = ctx.tree().inferred_step_type(*id)?;
            if inferred != StepType::Given {
                let step_node = ctx.tree().node(*id);
                ctx.add_message(
                    "only-given-allowed-in-background",
                    step_node,
                    &[("step_type", inferred.to_string())],
                )?;
            }
        }
        Ok(())
    }
}

impl Checker for ConsistencyChecker {
    fn name(&self) -> &'static str {
        "consistency"
    }

    fn messages(&self) -> &'static [MessageDef] {
        MESSAGES
    }

    fn visit_document(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Document,
    ) -> Result<(), LinterError> {
        self.scenario_names.clear();
        Ok(())
    }

    fn visit_feature(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Feature,
    ) -> Result<(), LinterError> {
        self.check_duplicated_tags(ctx, &data.tags)?;
        if !data.name.is_empty() && !self.feature_names.insert(data.name.clone()) {
            ctx.add_message(
                "duplicated-feature-name",
                node,
                &[("name", format!("'{}'", data.name))],
            )?;
        }
        Ok(())
    }

    fn leave_feature(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        _node: &Node,
        _data: &Feature,
    ) -> Result<(), LinterError> {
        self.scenario_names.clear();
        Ok(())
    }

    fn visit_background(
        &mut self,
        ctx: &mut CheckContext<'_>,
        _node: &Node,
        data: &Background,
    ) -> Result<(), LinterError> {
        self.check_background_steps(ctx, &data.steps)
    }

    fn visit_scenario(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &Scenario,
    ) -> Result<(), LinterError> {
        self.check_duplicated_tags(ctx, &data.tags)?;
        self.check_scenario_name(ctx, node, &data.name)?;
        for id in &data.examples {
            let examples_node = ctx.tree().node(*id);
            ctx.add_message("examples-outside-scenario-outline", examples_node, &[])?;
        }
        Ok(())
    }

    fn visit_scenario_outline(
        &mut self,
        ctx: &mut CheckContext<'_>,
        node: &Node,
        data: &ScenarioOutline,
    ) -> Result<(), LinterError> {
        self.check_duplicated_tags(ctx, &data.tags)?;
        self.check_scenario_name(ctx, node, &data.name)
    }

    fn visit_examples(
        &mut self,
        ctx: &mut CheckContext<'_>,
        _node: &Node,
        data: &gherlint_ast::Examples,
    ) -> Result<(), LinterError> {
        self.check_duplicated_tags(ctx, &data.tags)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::linter::tests::check_content;

    #[test]
    fn test_examples_on_a_plain_scenario() {
        let names = check_content(
            "Feature: Test\n  Scenario: Not an outline\n    Given a step\n\n    Examples:\n      | x |\n      | 1 |\n",
        );
        assert!(names.contains(&"examples-outside-scenario-outline".to_string()));
    }

    #[test]
    fn test_non_given_steps_in_a_background() {
        let names = check_content(
            "\
Feature: Test
  Background:
    Given the base
    And more base
    When something happens

  Scenario: One
    Then it works
",
        );
        let hits: Vec<_> = names
            .iter()
            .filter(|name| *name == "only-given-allowed-in-background")
            .collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_connective_steps_adopt_the_preceding_type() {
        let names = check_content(
            "Feature: Test\n  Background:\n    Given the base\n    And more base\n\n  Scenario: One\n    Then it works\n",
        );
        assert!(!names.contains(&"only-given-allowed-in-background".to_string()));
    }

    #[test]
    fn test_duplicated_tag_on_one_element() {
        let names = check_content(
            "@smoke @smoke\nFeature: Test\n  Scenario: One\n    Given a step\n",
        );
        let hits: Vec<_> = names.iter().filter(|name| *name == "duplicated-tag").collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_same_tag_on_different_elements_is_fine() {
        let names = check_content(
            "@smoke\nFeature: Test\n  @smoke\n  Scenario: One\n    Given a step\n",
        );
        assert!(!names.contains(&"duplicated-tag".to_string()));
    }

    #[test]
    fn test_duplicated_scenario_name_within_a_feature() {
        let names = check_content(
            "Feature: Test\n  Scenario: Same\n    Given a step\n  Scenario: Same\n    Given a step\n",
        );
        let hits: Vec<_> = names
            .iter()
            .filter(|name| *name == "duplicated-scenario-name")
            .collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_unnamed_scenarios_are_not_duplicates_of_each_other() {
        let names = check_content(
            "Feature: Test\n  Scenario:\n    Given a step\n  Scenario:\n    Given a step\n",
        );
        assert!(!names.contains(&"duplicated-scenario-name".to_string()));
    }
}
