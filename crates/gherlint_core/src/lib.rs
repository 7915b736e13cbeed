//! Rule engine and orchestration for gherlint.
//!
//! The pipeline per feature file: resolve the language and repair its
//! declaration, parse, build the typed tree, then walk it with the
//! registered checkers, emitting positioned diagnostics through a
//! [`Reporter`]. [`GherkinLinter`] drives a whole run over a file or a
//! directory tree.

pub mod builder;
pub mod checkers;
pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod fixer;
pub mod linter;
pub mod messages;
pub mod registry;
pub mod reporting;
pub mod statistics;
pub mod walker;

pub use builder::build_tree;
pub use checkers::Checker;
pub use config::{CheckerOptions, LinterConfig};
pub use context::CheckContext;
pub use error::LinterError;
pub use files::feature_files;
pub use fixer::LanguageFixer;
pub use linter::GherkinLinter;
pub use messages::{Message, MessageDef, MessageStore, is_message_id};
pub use registry::{CheckerFactory, CheckerRegistry};
pub use reporting::{CollectingReporter, Diagnostic, Reporter, Severity, TextReporter};
pub use statistics::{Statistics, compute_statistics};
pub use walker::walk;
