//! Node definitions.
//!
//! Every element of a Gherkin document is a [`Node`] carrying its source
//! position, its parent handle and a [`NodeKind`] payload.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::tree::NodeId;

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Handle of this node in its [`crate::Tree`].
    pub id: NodeId,
    /// Handle of the parent node, `None` for the document root.
    pub parent: Option<NodeId>,
    /// Line in the original source file (1-indexed; 0 for the root).
    pub line: u32,
    /// Column in the original source file (1-indexed; 0 for the root).
    pub column: u32,
    /// Typed payload.
    pub kind: NodeKind,
}

impl Node {
    /// Lowercase kind name, used in log output and walker tracing.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Document(_) => "document",
            NodeKind::Feature(_) => "feature",
            NodeKind::Background(_) => "background",
            NodeKind::Scenario(_) => "scenario",
            NodeKind::ScenarioOutline(_) => "scenariooutline",
            NodeKind::Step(_) => "step",
            NodeKind::Examples(_) => "examples",
            NodeKind::Tag(_) => "tag",
        }
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Document(Document),
    Feature(Feature),
    Background(Background),
    Scenario(Scenario),
    ScenarioOutline(ScenarioOutline),
    Step(Step),
    Examples(Examples),
    Tag(Tag),
}

/// The file itself. Root of every tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path of the source file as given to the linter.
    pub filename: String,
    /// The single feature of the file, if any.
    pub feature: Option<NodeId>,
    /// Free-floating comment lines.
    pub comments: Vec<String>,
    /// Number of lines inserted ahead of the original content by the
    /// language resolver. Positions of all nodes below the root have
    /// already been shifted back by this amount.
    pub offset: u32,
}

/// A `Feature:` block.
#[derive(Debug, Clone)]
pub struct Feature {
    pub language: String,
    /// Feature name; empty string when the header has no name.
    pub name: String,
    pub description: String,
    pub tags: Vec<NodeId>,
    pub background: Option<NodeId>,
    /// Scenarios and scenario outlines in source order.
    pub scenarios: Vec<NodeId>,
}

/// A `Background:` block.
#[derive(Debug, Clone)]
pub struct Background {
    pub name: String,
    pub steps: Vec<NodeId>,
}

/// A concrete `Scenario:`.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub tags: Vec<NodeId>,
    pub steps: Vec<NodeId>,
    /// Examples blocks attached to this scenario. Valid Gherkin never has
    /// any here; the consistency checker reports them.
    pub examples: Vec<NodeId>,
    /// `<placeholder>` names found in the scenario name.
    pub parameters: Vec<String>,
}

/// A `Scenario Outline:` - a scenario templated over examples tables.
#[derive(Debug, Clone)]
pub struct ScenarioOutline {
    pub name: String,
    pub description: String,
    pub tags: Vec<NodeId>,
    pub steps: Vec<NodeId>,
    pub examples: Vec<NodeId>,
    /// `<placeholder>` names referenced in the outline name or any of its
    /// steps, in order of first appearance.
    pub parameters: Vec<String>,
}

/// One Given/When/Then/And/But line.
#[derive(Debug, Clone)]
pub struct Step {
    /// Raw keyword as written in the source, trailing space included.
    pub keyword: String,
    /// Canonical type resolved language-independently.
    pub step_type: StepType,
    pub text: String,
    /// `<placeholder>` names found in the step text.
    pub parameters: Vec<String>,
}

/// An `Examples:` table of a scenario outline.
#[derive(Debug, Clone)]
pub struct Examples {
    pub name: String,
    pub tags: Vec<NodeId>,
    /// Header row: ordered parameter names.
    pub parameters: Vec<String>,
    /// Column-major body: parameter name to its ordered row values.
    pub values: HashMap<String, Vec<String>>,
}

impl Examples {
    /// Number of body rows in the table.
    pub fn number_of_entries(&self) -> usize {
        self.values.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// A `@tag` marker. Two tags are equal if their names are equal,
/// regardless of where they appear.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
}

/// Canonical step type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Given,
    When,
    Then,
    And,
    But,
    Unknown,
}

impl StepType {
    /// Whether this type only connects to a preceding step.
    pub fn is_connective(self) -> bool {
        matches!(self, StepType::And | StepType::But)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Given => "given",
            StepType::When => "when",
            StepType::Then => "then",
            StepType::And => "and",
            StepType::But => "but",
            StepType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
