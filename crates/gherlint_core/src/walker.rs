//! Pre/post-order tree walker dispatching to the checkers.

use gherlint_ast::{NodeId, NodeKind, Tree};
use tracing::trace;

use crate::checkers::Checker;
use crate::context::CheckContext;
use crate::error::LinterError;

/// Walks `tree` in document order. For every node, each checker's visit
/// callback runs in registration order, then the children are walked,
/// then each checker's leave callback runs in the same order.
pub fn walk(
    tree: &Tree,
    checkers: &mut [&mut dyn Checker],
    ctx: &mut CheckContext<'_>,
) -> Result<(), LinterError> {
    if tree.is_empty() {
        return Ok(());
    }
    walk_node(tree, tree.root().id, checkers, ctx)
}

fn walk_node(
    tree: &Tree,
    id: NodeId,
    checkers: &mut [&mut dyn Checker],
    ctx: &mut CheckContext<'_>,
) -> Result<(), LinterError> {
    let node = tree.node(id);
    trace!(kind = node.kind_name(), line = node.line, "visit");
    for checker in checkers.iter_mut() {
        dispatch(*checker, ctx, tree, id, true)?;
    }
    for child in tree.children(id) {
        walk_node(tree, child, checkers, ctx)?;
    }
    for checker in checkers.iter_mut() {
        dispatch(*checker, ctx, tree, id, false)?;
    }
    Ok(())
}

fn dispatch(
    checker: &mut dyn Checker,
    ctx: &mut CheckContext<'_>,
    tree: &Tree,
    id: NodeId,
    entering: bool,
) -> Result<(), LinterError> {
    let node = tree.node(id);
    match (&node.kind, entering) {
        (NodeKind::Document(data), true) => checker.visit_document(ctx, node, data),
        (NodeKind::Document(data), false) => checker.leave_document(ctx, node, data),
        (NodeKind::Feature(data), true) => checker.visit_feature(ctx, node, data),
        (NodeKind::Feature(data), false) => checker.leave_feature(ctx, node, data),
        (NodeKind::Background(data), true) => checker.visit_background(ctx, node, data),
        (NodeKind::Background(data), false) => checker.leave_background(ctx, node, data),
        (NodeKind::Scenario(data), true) => checker.visit_scenario(ctx, node, data),
        (NodeKind::Scenario(data), false) => checker.leave_scenario(ctx, node, data),
        (NodeKind::ScenarioOutline(data), true) => checker.visit_scenario_outline(ctx, node, data),
        (NodeKind::ScenarioOutline(data), false) => checker.leave_scenario_outline(ctx, node, data),
        (NodeKind::Step(data), true) => checker.visit_step(ctx, node, data),
        (NodeKind::Step(data), false) => checker.leave_step(ctx, node, data),
        (NodeKind::Examples(data), true) => checker.visit_examples(ctx, node, data),
        (NodeKind::Examples(data), false) => checker.leave_examples(ctx, node, data),
        (NodeKind::Tag(data), true) => checker.visit_tag(ctx, node, data),
        (NodeKind::Tag(data), false) => checker.leave_tag(ctx, node, data),
    }
}

#[cfg(test)]
mod tests {
    use gherlint_ast::{Document, Feature, Node, Scenario, Step, Tag};
    use gherlint_parser::GherkinParser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::build_tree;
    use crate::messages::MessageStore;
    use crate::reporting::CollectingReporter;

    /// Records every callback invocation as `"visit:kind"`/`"leave:kind"`.
    #[derive(Default)]
    struct RecordingChecker {
        events: Vec<String>,
    }

    impl RecordingChecker {
        fn record(&mut self, entering: bool, node: &Node) {
            let phase = if entering { "visit" } else { "leave" };
            self.events.push(format!("{phase}:{}", node.kind_name()));
        }
    }

    impl Checker for RecordingChecker {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn visit_document(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Document,
        ) -> Result<(), LinterError> {
            self.record(true, node);
            Ok(())
        }

        fn leave_document(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Document,
        ) -> Result<(), LinterError> {
            self.record(false, node);
            Ok(())
        }

        fn visit_feature(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Feature,
        ) -> Result<(), LinterError> {
            self.record(true, node);
            Ok(())
        }

        fn leave_feature(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Feature,
        ) -> Result<(), LinterError> {
            self.record(false, node);
            Ok(())
        }

        fn visit_scenario(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Scenario,
        ) -> Result<(), LinterError> {
            self.record(true, node);
            Ok(())
        }

        fn leave_scenario(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Scenario,
        ) -> Result<(), LinterError> {
            self.record(false, node);
            Ok(())
        }

        fn visit_step(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Step,
        ) -> Result<(), LinterError> {
            self.record(true, node);
            Ok(())
        }

        fn visit_tag(
            &mut self,
            _ctx: &mut CheckContext<'_>,
            node: &Node,
            _data: &Tag,
        ) -> Result<(), LinterError> {
            self.record(true, node);
            Ok(())
        }
    }

    #[test]
    fn test_walk_order_is_preorder_with_postorder_leaves() {
        let value = GherkinParser::new()
            .parse("@smoke\nFeature: Walked\n  Scenario: One\n    Given a step\n    When it runs\n")
            .unwrap();
        let tree = build_tree(&value, "walk.feature", 0).unwrap();
        let store = MessageStore::new();
        let mut reporter = CollectingReporter::new();
        let mut ctx = CheckContext::new(&tree, "walk.feature", &store, &mut reporter);
        let mut recording = RecordingChecker::default();
        let mut checkers: [&mut dyn Checker; 1] = [&mut recording];
        walk(&tree, &mut checkers, &mut ctx).unwrap();
        let events: Vec<&str> = recording.events.iter().map(String::as_str).collect();
        assert_eq!(
            events,
            vec![
                "visit:document",
                "visit:feature",
                "visit:tag",
                "visit:scenario",
                "visit:step",
                "visit:step",
                "leave:scenario",
                "leave:feature",
                "leave:document",
            ]
        );
    }

    #[test]
    fn test_walking_an_empty_tree_is_a_no_op() {
        let tree = Tree::new();
        let store = MessageStore::new();
        let mut reporter = CollectingReporter::new();
        let mut ctx = CheckContext::new(&tree, "none.feature", &store, &mut reporter);
        walk(&tree, &mut [], &mut ctx).unwrap();
    }
}
