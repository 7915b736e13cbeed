//! Line-based Gherkin parser.
//!
//! Produces the nested mapping consumed by the tree builder:
//! `{feature?, comments[]}` at the root and, recursively,
//! `{tags[], location{line,column}, keyword, name, description,
//! children[]|steps[]|examples[]}`. The mapping is deliberately untyped -
//! the engine treats the parser as an opaque collaborator and owns the
//! typed model itself.
//!
//! Parsing is forgiving: structural problems are collected as
//! [`ParseIssue`]s and reported together, so one run surfaces every
//! offending line of a file.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::dialect::{Dialect, Dialects, Keyword};
use crate::error::{ParseError, ParseIssue};

/// Parser for one document. Stateless between [`GherkinParser::parse`]
/// calls; create one per file or reuse freely.
#[derive(Debug, Default)]
pub struct GherkinParser;

impl GherkinParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses `content` into the boundary mapping.
    pub fn parse(&self, content: &str) -> Result<Value, ParseError> {
        let mut state = ParserState::new();
        let mut in_docstring = false;
        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index as u32 + 1;
            let trimmed = raw_line.trim();
            if trimmed.starts_with("\"\"\"") || trimmed.starts_with("```") {
                in_docstring = !in_docstring;
                continue;
            }
            if in_docstring || trimmed.is_empty() {
                continue;
            }
            let column = char_indent(raw_line) + 1;
            if trimmed.starts_with('#') {
                state.comment(trimmed);
            } else if trimmed.starts_with('@') {
                state.tag_line(raw_line, line_no);
            } else if trimmed.starts_with('|') {
                state.table_row(raw_line, line_no);
            } else {
                state.keyword_line(trimmed, line_no, column);
            }
        }
        state.finish()
    }
}

/// Column (1-based, in characters) of the first non-whitespace character.
fn char_indent(line: &str) -> u32 {
    line.chars().take_while(|c| c.is_whitespace()).count() as u32
}

fn first_token(text: &str) -> String {
    text.split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(':')
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    None,
    Feature,
    Background,
    Scenario,
    Examples,
}

#[derive(Debug)]
struct RawTag {
    name: String,
    line: u32,
    column: u32,
}

#[derive(Debug)]
struct RawStep {
    keyword: String,
    text: String,
    line: u32,
    column: u32,
}

#[derive(Debug)]
struct RawCell {
    value: String,
    line: u32,
    column: u32,
}

#[derive(Debug)]
struct RawRow {
    line: u32,
    column: u32,
    cells: Vec<RawCell>,
}

#[derive(Debug)]
struct RawExamples {
    keyword: String,
    name: String,
    line: u32,
    column: u32,
    tags: Vec<RawTag>,
    header: Option<RawRow>,
    body: Vec<RawRow>,
}

/// A background, scenario or scenario outline block.
#[derive(Debug)]
struct RawBlock {
    keyword: String,
    name: String,
    description: String,
    line: u32,
    column: u32,
    tags: Vec<RawTag>,
    steps: Vec<RawStep>,
    examples: Vec<RawExamples>,
}

#[derive(Debug)]
enum RawChild {
    Background(RawBlock),
    Scenario(RawBlock),
}

#[derive(Debug)]
struct RawFeature {
    keyword: String,
    name: String,
    description: String,
    line: u32,
    column: u32,
    tags: Vec<RawTag>,
    children: Vec<RawChild>,
}

struct ParserState {
    language: String,
    feature: Option<RawFeature>,
    comments: Vec<String>,
    pending_tags: Vec<RawTag>,
    issues: Vec<ParseIssue>,
    context: Context,
}

impl ParserState {
    fn new() -> Self {
        Self {
            language: "en".to_string(),
            feature: None,
            comments: Vec::new(),
            pending_tags: Vec::new(),
            issues: Vec::new(),
            context: Context::None,
        }
    }

    fn dialect(&self) -> &'static Dialect {
        let dialects = Dialects::get();
        dialects
            .dialect(&self.language)
            .or_else(|| dialects.dialect("en"))
            .expect("English dialect is always present")
    }

    fn issue(&mut self, line: u32, column: u32, description: &str, token: &str) {
        self.issues.push(ParseIssue {
            line,
            column,
            description: description.to_string(),
            token: token.to_string(),
        });
    }

    fn comment(&mut self, trimmed: &str) {
        if self.feature.is_none() {
            if let Some(code) = language_directive(trimmed) {
                if Dialects::get().dialect(code).is_some() {
                    self.language = code.to_string();
                } else {
                    debug!(code, "unsupported language declaration, keeping '{}'", self.language);
                }
            }
        }
        self.comments.push(trimmed.to_string());
    }

    fn tag_line(&mut self, raw_line: &str, line_no: u32) {
        let mut column = 0u32;
        let mut current: Option<(u32, String)> = None;
        for ch in raw_line.chars() {
            column += 1;
            if ch.is_whitespace() {
                self.flush_tag(current.take(), line_no);
            } else {
                match &mut current {
                    Some((_, text)) => text.push(ch),
                    None => current = Some((column, String::from(ch))),
                }
            }
        }
        self.flush_tag(current.take(), line_no);
    }

    fn flush_tag(&mut self, token: Option<(u32, String)>, line_no: u32) {
        let Some((column, text)) = token else {
            return;
        };
        if text.starts_with('@') {
            self.pending_tags.push(RawTag {
                name: text,
                line: line_no,
                column,
            });
        } else {
            debug!(token = text, line = line_no, "ignoring non-tag token on tag line");
        }
    }

    fn table_row(&mut self, raw_line: &str, line_no: u32) {
        if self.context != Context::Examples {
            // Step data tables are not part of the model.
            debug!(line = line_no, "ignoring table row outside an examples block");
            return;
        }
        let row = parse_row(raw_line, line_no);
        let Some(examples) = self.current_examples() else {
            return;
        };
        if examples.header.is_none() {
            examples.header = Some(row);
        } else {
            examples.body.push(row);
        }
    }

    fn keyword_line(&mut self, trimmed: &str, line_no: u32, column: u32) {
        let dialect = self.dialect();
        if let Some((keyword, name)) = match_header(dialect.keywords(Keyword::Feature), trimmed) {
            self.start_feature(keyword, name, line_no, column);
        } else if let Some((keyword, name)) =
            match_header(dialect.keywords(Keyword::Background), trimmed)
        {
            self.start_background(keyword, name, line_no, column);
        } else if let Some((keyword, name)) = match_header(dialect.keywords(Keyword::ScenarioOutline), trimmed)
            .or_else(|| match_header(dialect.keywords(Keyword::Scenario), trimmed))
        {
            self.start_scenario(keyword, name, line_no, column);
        } else if let Some((keyword, name)) = match_header(dialect.keywords(Keyword::Examples), trimmed) {
            self.start_examples(keyword, name, line_no, column);
        } else if let Some((keyword, text)) = match_step(dialect, trimmed) {
            self.add_step(keyword, text, line_no, column);
        } else {
            self.free_text(trimmed, line_no, column);
        }
    }

    fn start_feature(&mut self, keyword: String, name: String, line_no: u32, column: u32) {
        if self.feature.is_some() {
            self.issue(line_no, column, "unexpected second feature", &keyword);
            return;
        }
        self.feature = Some(RawFeature {
            keyword,
            name,
            description: String::new(),
            line: line_no,
            column,
            tags: std::mem::take(&mut self.pending_tags),
            children: Vec::new(),
        });
        self.context = Context::Feature;
    }

    fn start_background(&mut self, keyword: String, name: String, line_no: u32, column: u32) {
        if !self.pending_tags.is_empty() {
            debug!(line = line_no, "dropping tags in front of a background");
            self.pending_tags.clear();
        }
        let block = RawBlock {
            keyword: keyword.clone(),
            name,
            description: String::new(),
            line: line_no,
            column,
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
        };
        match &mut self.feature {
            Some(feature) => {
                feature.children.push(RawChild::Background(block));
                self.context = Context::Background;
            }
            None => self.issue(line_no, column, "expected a feature", &keyword),
        }
    }

    fn start_scenario(&mut self, keyword: String, name: String, line_no: u32, column: u32) {
        let block = RawBlock {
            keyword: keyword.clone(),
            name,
            description: String::new(),
            line: line_no,
            column,
            tags: std::mem::take(&mut self.pending_tags),
            steps: Vec::new(),
            examples: Vec::new(),
        };
        match &mut self.feature {
            Some(feature) => {
                feature.children.push(RawChild::Scenario(block));
                self.context = Context::Scenario;
            }
            None => self.issue(line_no, column, "expected a feature", &keyword),
        }
    }

    fn start_examples(&mut self, keyword: String, name: String, line_no: u32, column: u32) {
        let tags = std::mem::take(&mut self.pending_tags);
        let Some(scenario) = self.current_scenario() else {
            self.issue(line_no, column, "examples outside a scenario", &keyword);
            return;
        };
        scenario.examples.push(RawExamples {
            keyword,
            name,
            line: line_no,
            column,
            tags,
            header: None,
            body: Vec::new(),
        });
        self.context = Context::Examples;
    }

    fn add_step(&mut self, keyword: String, text: String, line_no: u32, column: u32) {
        let token = first_token(&keyword);
        match self.context {
            Context::Background | Context::Scenario => {
                if let Some(block) = self.current_block() {
                    block.steps.push(RawStep {
                        keyword,
                        text,
                        line: line_no,
                        column,
                    });
                }
            }
            Context::Examples => {
                self.issue(line_no, column, "expected an examples table or a new scenario", &token);
            }
            Context::None | Context::Feature => {
                self.issue(line_no, column, "expected a scenario or background", &token);
            }
        }
    }

    fn free_text(&mut self, trimmed: &str, line_no: u32, column: u32) {
        match self.context {
            Context::Feature => {
                if let Some(feature) = &mut self.feature {
                    append_description(&mut feature.description, trimmed);
                }
            }
            Context::Background | Context::Scenario => {
                let stepless = self
                    .current_block()
                    .map(|block| block.steps.is_empty())
                    .unwrap_or(false);
                if stepless {
                    if let Some(block) = self.current_block() {
                        append_description(&mut block.description, trimmed);
                    }
                } else {
                    self.issue(line_no, column, "expected a step", &first_token(trimmed));
                }
            }
            Context::Examples | Context::None => {
                self.issue(line_no, column, "expected a step", &first_token(trimmed));
            }
        }
    }

    /// Last block of the feature, background or scenario alike.
    fn current_block(&mut self) -> Option<&mut RawBlock> {
        match self.feature.as_mut()?.children.last_mut()? {
            RawChild::Background(block) | RawChild::Scenario(block) => Some(block),
        }
    }

    /// Last block of the feature, only when it is a scenario.
    fn current_scenario(&mut self) -> Option<&mut RawBlock> {
        match self.feature.as_mut()?.children.last_mut()? {
            RawChild::Scenario(block) => Some(block),
            RawChild::Background(_) => None,
        }
    }

    fn current_examples(&mut self) -> Option<&mut RawExamples> {
        self.current_scenario()?.examples.last_mut()
    }

    fn finish(self) -> Result<Value, ParseError> {
        if !self.issues.is_empty() {
            return Err(ParseError { issues: self.issues });
        }
        let mut root = Map::new();
        root.insert("comments".to_string(), json!(self.comments));
        if let Some(feature) = self.feature {
            root.insert("feature".to_string(), feature_value(&feature, &self.language));
        }
        Ok(Value::Object(root))
    }
}

/// `# language: <code>` directive, lenient about spacing.
fn language_directive(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('#')?.trim_start();
    let code = rest.strip_prefix("language:")?.trim();
    (!code.is_empty()).then_some(code)
}

fn match_header(candidates: &[String], trimmed: &str) -> Option<(String, String)> {
    for keyword in candidates {
        if let Some(rest) = trimmed.strip_prefix(&format!("{keyword}:")) {
            return Some((keyword.clone(), rest.trim().to_string()));
        }
    }
    None
}

fn match_step(dialect: &Dialect, trimmed: &str) -> Option<(String, String)> {
    let mut candidates: Vec<&String> = [
        dialect.keywords(Keyword::Given),
        dialect.keywords(Keyword::When),
        dialect.keywords(Keyword::Then),
        dialect.keywords(Keyword::And),
        dialect.keywords(Keyword::But),
    ]
    .into_iter()
    .flatten()
    .collect();
    // Longest first so "Gegeben seien " is not shadowed by "Gegeben sei ".
    candidates.sort_by_key(|keyword| std::cmp::Reverse(keyword.len()));
    for keyword in candidates {
        if let Some(rest) = trimmed.strip_prefix(keyword.as_str()) {
            return Some((keyword.clone(), rest.trim().to_string()));
        }
    }
    None
}

fn append_description(description: &mut String, line: &str) {
    if !description.is_empty() {
        description.push('\n');
    }
    description.push_str(line);
}

fn parse_row(raw_line: &str, line_no: u32) -> RawRow {
    let mut cells = Vec::new();
    let mut column = 0u32;
    let mut row_column = 0u32;
    let mut seen_pipe = false;
    let mut cell_start = 0u32;
    let mut cell_text = String::new();
    for ch in raw_line.chars() {
        column += 1;
        if ch == '|' {
            if seen_pipe {
                cells.push(make_cell(&cell_text, cell_start, line_no));
            } else {
                seen_pipe = true;
                row_column = column;
            }
            cell_text.clear();
            cell_start = column + 1;
        } else if seen_pipe {
            cell_text.push(ch);
        }
    }
    RawRow {
        line: line_no,
        column: row_column,
        cells,
    }
}

fn make_cell(raw: &str, start_column: u32, line_no: u32) -> RawCell {
    let leading = raw.chars().take_while(|c| c.is_whitespace()).count() as u32;
    RawCell {
        value: raw.trim().to_string(),
        line: line_no,
        column: start_column + leading,
    }
}

fn location_value(line: u32, column: u32) -> Value {
    json!({ "line": line, "column": column })
}

fn tags_value(tags: &[RawTag]) -> Value {
    Value::Array(
        tags.iter()
            .map(|tag| {
                json!({
                    "name": tag.name,
                    "location": location_value(tag.line, tag.column),
                })
            })
            .collect(),
    )
}

fn steps_value(steps: &[RawStep]) -> Value {
    Value::Array(
        steps
            .iter()
            .map(|step| {
                json!({
                    "keyword": step.keyword,
                    "text": step.text,
                    "location": location_value(step.line, step.column),
                })
            })
            .collect(),
    )
}

fn row_value(row: &RawRow) -> Value {
    json!({
        "location": location_value(row.line, row.column),
        "cells": Value::Array(
            row.cells
                .iter()
                .map(|cell| {
                    json!({
                        "value": cell.value,
                        "location": location_value(cell.line, cell.column),
                    })
                })
                .collect(),
        ),
    })
}

fn examples_value(examples: &RawExamples) -> Value {
    let mut map = Map::new();
    map.insert("keyword".to_string(), json!(examples.keyword));
    map.insert("name".to_string(), json!(examples.name));
    map.insert("tags".to_string(), tags_value(&examples.tags));
    map.insert(
        "location".to_string(),
        location_value(examples.line, examples.column),
    );
    if let Some(header) = &examples.header {
        map.insert("tableHeader".to_string(), row_value(header));
    }
    map.insert(
        "tableBody".to_string(),
        Value::Array(examples.body.iter().map(row_value).collect()),
    );
    Value::Object(map)
}

fn child_value(child: &RawChild) -> Value {
    match child {
        RawChild::Background(block) => json!({
            "background": {
                "keyword": block.keyword,
                "name": block.name,
                "description": block.description,
                "location": location_value(block.line, block.column),
                "steps": steps_value(&block.steps),
            }
        }),
        RawChild::Scenario(block) => json!({
            "scenario": {
                "keyword": block.keyword,
                "name": block.name,
                "description": block.description,
                "location": location_value(block.line, block.column),
                "tags": tags_value(&block.tags),
                "steps": steps_value(&block.steps),
                "examples": Value::Array(block.examples.iter().map(examples_value).collect()),
            }
        }),
    }
}

fn feature_value(feature: &RawFeature, language: &str) -> Value {
    json!({
        "tags": tags_value(&feature.tags),
        "location": location_value(feature.line, feature.column),
        "language": language,
        "keyword": feature.keyword,
        "name": feature.name,
        "description": feature.description,
        "children": Value::Array(feature.children.iter().map(child_value).collect()),
    })
}
