//! Builds the typed tree from the parser's nested mapping.
//!
//! The parser output is untyped on purpose; this module is the single
//! place that knows its field names. Missing required fields are reported
//! as [`LinterError::MalformedInput`], never panicked on.

use gherlint_ast::{
    Background, Document, Examples, Feature, NodeId, NodeKind, Scenario, ScenarioOutline, Step,
    Tag, Tree, extract_parameters,
};
use gherlint_parser::Dialects;
use serde_json::Value;
use tracing::trace;

use crate::error::LinterError;

/// Builds the tree for one parsed document. `offset` is the number of
/// lines the language resolver inserted ahead of the original content;
/// every node position below the root is shifted back by it.
pub fn build_tree(value: &Value, filename: &str, offset: u32) -> Result<Tree, LinterError> {
    let mut tree = Tree::new();
    let comments = value
        .get("comments")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let document = tree.push(
        None,
        0,
        0,
        NodeKind::Document(Document {
            filename: filename.to_string(),
            feature: None,
            comments,
            offset,
        }),
    );
    if let Some(feature_value) = value.get("feature") {
        let feature = build_feature(&mut tree, document, feature_value, offset)?;
        match &mut tree.node_mut(document).kind {
            NodeKind::Document(data) => data.feature = Some(feature),
            _ => unreachable!(),
        }
    }
    trace!(filename, nodes = tree.len(), "built document tree");
    Ok(tree)
}

fn build_feature(
    tree: &mut Tree,
    document: NodeId,
    value: &Value,
    offset: u32,
) -> Result<NodeId, LinterError> {
    let (line, column) = location(value, "feature", offset)?;
    let feature = tree.push(
        Some(document),
        line,
        column,
        NodeKind::Feature(Feature {
            language: required_str(value, "language", "feature")?.to_string(),
            name: required_str(value, "name", "feature")?.to_string(),
            description: optional_str(value, "description"),
            tags: Vec::new(),
            background: None,
            scenarios: Vec::new(),
        }),
    );
    let tags = build_tags(tree, feature, value, offset)?;
    let mut background = None;
    let mut scenarios = Vec::new();
    for child in value
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        if let Some(block) = child.get("background") {
            background = Some(build_background(tree, feature, block, offset)?);
        } else if let Some(block) = child.get("scenario") {
            scenarios.push(build_scenario(tree, feature, block, offset)?);
        } else {
            return Err(LinterError::malformed("feature child is neither a background nor a scenario"));
        }
    }
    match &mut tree.node_mut(feature).kind {
        NodeKind::Feature(data) => {
            data.tags = tags;
            data.background = background;
            data.scenarios = scenarios;
        }
        _ => unreachable!(),
    }
    Ok(feature)
}

fn build_background(
    tree: &mut Tree,
    feature: NodeId,
    value: &Value,
    offset: u32,
) -> Result<NodeId, LinterError> {
    let (line, column) = location(value, "background", offset)?;
    let background = tree.push(
        Some(feature),
        line,
        column,
        NodeKind::Background(Background {
            name: required_str(value, "name", "background")?.to_string(),
            steps: Vec::new(),
        }),
    );
    let steps = build_steps(tree, background, value, offset)?;
    match &mut tree.node_mut(background).kind {
        NodeKind::Background(data) => data.steps = steps,
        _ => unreachable!(),
    }
    Ok(background)
}

fn build_scenario(
    tree: &mut Tree,
    feature: NodeId,
    value: &Value,
    offset: u32,
) -> Result<NodeId, LinterError> {
    let (line, column) = location(value, "scenario", offset)?;
    let keyword = required_str(value, "keyword", "scenario")?;
    let name = required_str(value, "name", "scenario")?.to_string();
    let description = optional_str(value, "description");
    let is_outline = Dialects::get().is_outline_keyword(keyword);
    let kind = if is_outline {
        NodeKind::ScenarioOutline(ScenarioOutline {
            name: name.clone(),
            description,
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
            parameters: Vec::new(),
        })
    } else {
        NodeKind::Scenario(Scenario {
            name: name.clone(),
            description,
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
            parameters: extract_parameters(&name),
        })
    };
    let scenario = tree.push(Some(feature), line, column, kind);
    let tags = build_tags(tree, scenario, value, offset)?;
    let steps = build_steps(tree, scenario, value, offset)?;
    let mut examples = Vec::new();
    for block in value
        .get("examples")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        examples.push(build_examples(tree, scenario, block, offset)?);
    }
    let parameters = if is_outline {
        outline_parameters(tree, &name, &steps)
    } else {
        Vec::new()
    };
    match &mut tree.node_mut(scenario).kind {
        NodeKind::Scenario(data) => {
            data.tags = tags;
            data.steps = steps;
            data.examples = examples;
        }
        NodeKind::ScenarioOutline(data) => {
            data.tags = tags;
            data.steps = steps;
            data.examples = examples;
            data.parameters = parameters;
        }
        _ => unreachable!(),
    }
    Ok(scenario)
}

/// `<placeholder>`s of the outline name and all of its steps, in order of
/// first appearance.
fn outline_parameters(tree: &Tree, name: &str, steps: &[NodeId]) -> Vec<String> {
    let mut parameters = extract_parameters(name);
    for step in steps {
        if let NodeKind::Step(data) = &tree.node(*step).kind {
            for parameter in &data.parameters {
                if !parameters.contains(parameter) {
                    parameters.push(parameter.clone());
                }
            }
        }
    }
    parameters
}

fn build_steps(
    tree: &mut Tree,
    parent: NodeId,
    value: &Value,
    offset: u32,
) -> Result<Vec<NodeId>, LinterError> {
    let mut steps = Vec::new();
    for step in value
        .get("steps")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let (line, column) = location(step, "step", offset)?;
        let keyword = required_str(step, "keyword", "step")?.to_string();
        let text = required_str(step, "text", "step")?.to_string();
        let step_type = Dialects::get().resolve_step_type(&keyword);
        let parameters = extract_parameters(&text);
        steps.push(tree.push(
            Some(parent),
            line,
            column,
            NodeKind::Step(Step {
                keyword,
                step_type,
                text,
                parameters,
            }),
        ));
    }
    Ok(steps)
}

fn build_examples(
    tree: &mut Tree,
    scenario: NodeId,
    value: &Value,
    offset: u32,
) -> Result<NodeId, LinterError> {
    let (line, column) = location(value, "examples", offset)?;
    let parameters = match value.get("tableHeader") {
        Some(header) => row_cells(header)?,
        None => Vec::new(),
    };
    let mut values = std::collections::HashMap::new();
    for parameter in &parameters {
        values.insert(parameter.clone(), Vec::new());
    }
    for row in value
        .get("tableBody")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let cells = row_cells(row)?;
        for (parameter, cell) in parameters.iter().zip(cells) {
            if let Some(column_values) = values.get_mut(parameter) {
                column_values.push(cell);
            }
        }
    }
    let examples = tree.push(
        Some(scenario),
        line,
        column,
        NodeKind::Examples(Examples {
            name: required_str(value, "name", "examples")?.to_string(),
            tags: Vec::new(),
            parameters,
            values,
        }),
    );
    let tags = build_tags(tree, examples, value, offset)?;
    match &mut tree.node_mut(examples).kind {
        NodeKind::Examples(data) => data.tags = tags,
        _ => unreachable!(),
    }
    Ok(examples)
}

fn build_tags(
    tree: &mut Tree,
    parent: NodeId,
    value: &Value,
    offset: u32,
) -> Result<Vec<NodeId>, LinterError> {
    let mut tags = Vec::new();
    for tag in value
        .get("tags")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let (line, column) = location(tag, "tag", offset)?;
        tags.push(tree.push(
            Some(parent),
            line,
            column,
            NodeKind::Tag(Tag {
                name: required_str(tag, "name", "tag")?.to_string(),
            }),
        ));
    }
    Ok(tags)
}

fn row_cells(row: &Value) -> Result<Vec<String>, LinterError> {
    row.get("cells")
        .and_then(Value::as_array)
        .ok_or_else(|| LinterError::malformed("table row without cells"))?
        .iter()
        .map(|cell| Ok(required_str(cell, "value", "table cell")?.to_string()))
        .collect()
}

fn required_str<'v>(value: &'v Value, field: &str, kind: &str) -> Result<&'v str, LinterError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| LinterError::malformed(format!("{kind} without a '{field}' field")))
}

fn optional_str(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn location(value: &Value, kind: &str, offset: u32) -> Result<(u32, u32), LinterError> {
    let location = value
        .get("location")
        .ok_or_else(|| LinterError::malformed(format!("{kind} without a location")))?;
    let line = location
        .get("line")
        .and_then(Value::as_u64)
        .ok_or_else(|| LinterError::malformed(format!("{kind} location without a line")))?;
    let column = location
        .get("column")
        .and_then(Value::as_u64)
        .ok_or_else(|| LinterError::malformed(format!("{kind} location without a column")))?;
    Ok(((line as u32).saturating_sub(offset), column as u32))
}
