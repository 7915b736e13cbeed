//! Parser error types.

use std::fmt;

/// One offending location reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub line: u32,
    pub column: u32,
    pub description: String,
    pub token: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{}): {}, got '{}'",
            self.line, self.column, self.description, self.token
        )
    }
}

/// Composite parse failure.
///
/// The rendered text is part of the parser boundary contract: one header
/// line, then one `(line:column): <description>, got '<token>'` line per
/// issue, which the engine splits and extracts positions from.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub issues: Vec<ParseIssue>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser errors:")?;
        for issue in &self.issues {
            write!(f, "\n{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_error_text_follows_the_boundary_pattern() {
        let error = ParseError {
            issues: vec![
                ParseIssue {
                    line: 3,
                    column: 5,
                    description: "expected a step".to_string(),
                    token: "Examples".to_string(),
                },
                ParseIssue {
                    line: 7,
                    column: 1,
                    description: "unexpected feature".to_string(),
                    token: "Feature".to_string(),
                },
            ],
        };
        let rendered = error.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Parser errors:");
        assert_eq!(lines[1], "(3:5): expected a step, got 'Examples'");
        assert_eq!(lines[2], "(7:1): unexpected feature, got 'Feature'");
    }
}
