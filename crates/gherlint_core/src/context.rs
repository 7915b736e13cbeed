//! Per-file check context handed to every checker callback.

use gherlint_ast::{Node, Tree};

use crate::error::LinterError;
use crate::messages::MessageStore;
use crate::reporting::{Diagnostic, Reporter};

/// Everything a checker may touch while one file is walked. Holds the
/// tree read-only and routes messages through the run's store and
/// reporter.
pub struct CheckContext<'run> {
    tree: &'run Tree,
    path: &'run str,
    store: &'run MessageStore,
    reporter: &'run mut dyn Reporter,
    emitted: usize,
}

impl<'run> CheckContext<'run> {
    pub fn new(
        tree: &'run Tree,
        path: &'run str,
        store: &'run MessageStore,
        reporter: &'run mut dyn Reporter,
    ) -> Self {
        Self {
            tree,
            path,
            store,
            reporter,
            emitted: 0,
        }
    }

    /// The tree under check. Tied to the run, not to this borrow, so
    /// checkers can hold node references across an emit.
    pub fn tree(&self) -> &'run Tree {
        self.tree
    }

    pub fn path(&self) -> &'run str {
        self.path
    }

    /// Number of diagnostics emitted through this context so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Emit a message anchored at a node, addressed by id or name.
    pub fn add_message(
        &mut self,
        id_or_name: &str,
        node: &Node,
        args: &[(&str, String)],
    ) -> Result<(), LinterError> {
        self.add_message_at(id_or_name, node.line, node.column, args)
    }

    /// Emit a message at an explicit position. Used for file-level
    /// diagnostics that have no node to anchor to.
    pub fn add_message_at(
        &mut self,
        id_or_name: &str,
        line: u32,
        column: u32,
        args: &[(&str, String)],
    ) -> Result<(), LinterError> {
        let message = self.store.resolve(id_or_name)?;
        let text = message.format(args);
        let diagnostic = Diagnostic::new(message, self.path.to_string(), line, column, text);
        self.reporter.emit(&diagnostic);
        self.emitted += 1;
        Ok(())
    }
}
