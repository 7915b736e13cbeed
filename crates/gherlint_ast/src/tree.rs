//! Arena tree holding the nodes of one document.

use thiserror::Error;

use crate::node::{Node, NodeKind, StepType};

/// Handle of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised by tree operations that must never fail on a well-formed
/// tree. They indicate a bug in the engine, not a problem in the linted
/// document.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invariant violation at {line}:{column}: {detail}")]
    InvariantViolation { line: u32, column: u32, detail: String },
}

impl TreeError {
    fn invariant(node: &Node, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            line: node.line,
            column: node.column,
            detail: detail.into(),
        }
    }
}

/// Arena of [`Node`]s. Node 0 is always the document root.
///
/// The tree is built once per input document, is read-only afterwards and
/// is discarded when the walk over it finishes.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its handle. The payload's structural
    /// fields may still be patched through [`Tree::node_mut`] while the
    /// tree is under construction.
    pub fn push(&mut self, parent: Option<NodeId>, line: u32, column: u32, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            id,
            parent,
            line,
            column,
            kind,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The document root.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates every node in insertion order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.node(id).parent.map(|pid| self.node(pid))
    }

    /// Ordered ancestor chain from immediate parent to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Follows parent handles up to the node without a parent.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    /// Read-only traversal projection over the structural child fields,
    /// recomputed on every call, in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            NodeKind::Document(document) => document.feature.into_iter().collect(),
            NodeKind::Feature(feature) => {
                let mut children = feature.tags.clone();
                children.extend(feature.background);
                children.extend(feature.scenarios.iter().copied());
                children
            }
            NodeKind::Background(background) => background.steps.clone(),
            NodeKind::Scenario(scenario) => {
                let mut children = scenario.tags.clone();
                children.extend(scenario.steps.iter().copied());
                children.extend(scenario.examples.iter().copied());
                children
            }
            NodeKind::ScenarioOutline(outline) => {
                let mut children = outline.tags.clone();
                children.extend(outline.steps.iter().copied());
                children.extend(outline.examples.iter().copied());
                children
            }
            NodeKind::Examples(examples) => examples.tags.clone(),
            NodeKind::Step(_) | NodeKind::Tag(_) => Vec::new(),
        }
    }

    /// Resolves the effective type of a step: `And`/`But` adopt the type
    /// of the closest preceding non-connective sibling, or `Unknown` when
    /// no such sibling exists.
    ///
    /// Fails with an invariant violation when `id` is not a step or the
    /// step is not owned by a step-bearing parent; both cases can only be
    /// produced by a bug in the tree builder.
    pub fn inferred_step_type(&self, id: NodeId) -> Result<StepType, TreeError> {
        let node = self.node(id);
        let NodeKind::Step(step) = &node.kind else {
            return Err(TreeError::invariant(node, "inferred_step_type called on a non-step node"));
        };
        if !step.step_type.is_connective() {
            return Ok(step.step_type);
        }
        let Some(parent) = self.parent(id) else {
            return Err(TreeError::invariant(node, "step has no parent"));
        };
        let siblings = match &parent.kind {
            NodeKind::Background(background) => &background.steps,
            NodeKind::Scenario(scenario) => &scenario.steps,
            NodeKind::ScenarioOutline(outline) => &outline.steps,
            _ => {
                return Err(TreeError::invariant(node, "step parent holds no steps"));
            }
        };
        let Some(position) = siblings.iter().position(|sid| *sid == id) else {
            return Err(TreeError::invariant(node, "step is not a child of its parent"));
        };
        for sid in siblings[..position].iter().rev() {
            let NodeKind::Step(sibling) = &self.node(*sid).kind else {
                return Err(TreeError::invariant(node, "non-step node in a step list"));
            };
            if !sibling.step_type.is_connective() {
                return Ok(sibling.step_type);
            }
        }
        Ok(StepType::Unknown)
    }
}

/// Iterator over the ancestor chain of a node.
pub struct Ancestors<'t> {
    tree: &'t Tree,
    next: Option<NodeId>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = &'t Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.node(id);
        self.next = node.parent;
        Some(node)
    }
}
