//! # gherlint_ast
//!
//! Document object model for Gherkin feature files.
//!
//! This crate provides:
//! - [`Tree`] - an arena holding every node of one parsed document
//! - [`Node`] / [`NodeKind`] - the closed set of node kinds with source
//!   positions and parent handles
//! - [`StepType`] - language-independent step classification
//! - [`extract_parameters`] - `<placeholder>` extraction from step and
//!   scenario text
//!
//! ## Architecture
//!
//! Ownership is strictly top-down: the arena owns all nodes, structural
//! container fields (e.g. a feature's scenario list) hold [`NodeId`]
//! handles, and a node's `parent` is an optional handle back into the
//! arena. There are no reference cycles and no shared ownership.
//!
//! A node's children are not stored anywhere; they are a read-only
//! projection recomputed from the structural fields on each
//! [`Tree::children`] call, in document order.

mod node;
mod params;
mod tree;

pub use node::{
    Background, Document, Examples, Feature, Node, NodeKind, Scenario, ScenarioOutline, Step,
    StepType, Tag,
};
pub use params::extract_parameters;
pub use tree::{NodeId, Tree, TreeError};
