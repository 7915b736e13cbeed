//! # gherlint_parser
//!
//! Parser boundary for gherlint.
//!
//! This crate provides:
//! - [`Dialects`] - the multi-language keyword table
//! - [`resolve_language`] - language detection and `# language:` tag
//!   repair, including the line-offset bookkeeping the engine uses to
//!   report positions against the original file
//! - [`GherkinParser`] - the opaque text-to-nested-mapping parser
//!
//! The engine consumes the parser output as an untyped `serde_json::Value`
//! and builds its own typed model from it; see `gherlint_core`.

mod dialect;
mod error;
mod gherkin;
mod language;

pub use dialect::{Dialect, Dialects, Keyword};
pub use error::{ParseError, ParseIssue};
pub use gherkin::GherkinParser;
pub use language::{LanguageResolution, resolve_language};
