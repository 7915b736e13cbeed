//! Lint checkers.
//!
//! A checker implements [`Checker`] and overrides the callbacks for the
//! node kinds it cares about; everything else defaults to a no-op. The
//! walker calls `visit_*` before descending into a node's children and
//! `leave_*` after all of them have been handled.

use gherlint_ast::{
    Background, Document, Examples, Feature, Node, Scenario, ScenarioOutline, Step, Tag,
};

use crate::context::CheckContext;
use crate::error::LinterError;
use crate::messages::MessageDef;

mod completeness;
mod complexity;
mod consistency;
mod convention;

pub use completeness::CompletenessChecker;
pub use complexity::ComplexityChecker;
pub use consistency::ConsistencyChecker;
pub use convention::ConventionChecker;

macro_rules! callbacks {
    ($($visit:ident, $leave:ident, $payload:ty;)*) => {
        $(
            #[allow(unused_variables)]
            fn $visit(
                &mut self,
                ctx: &mut CheckContext<'_>,
                node: &Node,
                data: &$payload,
            ) -> Result<(), LinterError> {
                Ok(())
            }

            #[allow(unused_variables)]
            fn $leave(
                &mut self,
                ctx: &mut CheckContext<'_>,
                node: &Node,
                data: &$payload,
            ) -> Result<(), LinterError> {
                Ok(())
            }
        )*
    };
}

pub trait Checker {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Messages this checker can emit. Registered when the checker is
    /// built for a run.
    fn messages(&self) -> &'static [MessageDef] {
        &[]
    }

    callbacks! {
        visit_document, leave_document, Document;
        visit_feature, leave_feature, Feature;
        visit_background, leave_background, Background;
        visit_scenario, leave_scenario, Scenario;
        visit_scenario_outline, leave_scenario_outline, ScenarioOutline;
        visit_step, leave_step, Step;
        visit_examples, leave_examples, Examples;
        visit_tag, leave_tag, Tag;
    }
}
