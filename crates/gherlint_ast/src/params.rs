//! Placeholder parameter extraction.

/// Extracts `<name>` placeholders from a piece of text.
///
/// Spans are non-overlapping and matched non-greedily: the name runs from
/// a `<` to the next `>`. Names are returned in order of first appearance,
/// each one once. Empty placeholders (`<>`) are skipped.
pub fn extract_parameters(text: &str) -> Vec<String> {
    let mut parameters: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() && !parameters.iter().any(|p| p == name) {
            parameters.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    parameters
}
