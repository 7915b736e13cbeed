//! Language detection and `# language:` tag repair.

use tracing::debug;

use crate::dialect::Dialects;

const DECLARATION_PREFIX: &str = "# language: ";

/// Outcome of resolving the language of one document.
#[derive(Debug, Clone)]
pub struct LanguageResolution {
    /// Possibly patched document content. Writing it back to disk is the
    /// caller's responsibility.
    pub content: String,
    /// Detected language code, `"unknown"` when no keyword matched.
    pub language: String,
    /// Lines inserted ahead of the original content (0 or 1).
    pub offset: u32,
    /// A declaration was synthesized and prepended.
    pub added_language_tag: bool,
    /// An existing declaration named a different code and was replaced.
    pub fixed_language_tag: bool,
}

/// Detects the language of `content` and reconciles the `# language:`
/// declaration with it.
///
/// English and undetectable documents are returned unchanged. For any
/// other language: a missing declaration is prepended (shifting the
/// content down one line), a declaration with the wrong code is replaced
/// in place, and a matching one is left alone. The operation is
/// idempotent: applied to its own output it is a no-op.
pub fn resolve_language(content: &str) -> LanguageResolution {
    let dialects = Dialects::get();
    let language = dialects.detect_language(content).to_string();
    let mut resolution = LanguageResolution {
        content: content.to_string(),
        language: language.clone(),
        offset: 0,
        added_language_tag: false,
        fixed_language_tag: false,
    };
    if language == "en" || language == "unknown" {
        return resolution;
    }
    match find_declaration(content) {
        None => {
            debug!(language, "inserting missing language declaration");
            resolution.content = format!("{DECLARATION_PREFIX}{language}\n{content}");
            resolution.offset = 1;
            resolution.added_language_tag = true;
        }
        Some(declared) if declared != language => {
            debug!(declared, language, "replacing wrong language declaration");
            resolution.content = content.replacen(
                &format!("{DECLARATION_PREFIX}{declared}"),
                &format!("{DECLARATION_PREFIX}{language}"),
                1,
            );
            resolution.fixed_language_tag = true;
        }
        Some(_) => {}
    }
    resolution
}

/// First `# language: <code>` declaration in the content, canonical
/// spacing only. Anything else counts as missing.
fn find_declaration(content: &str) -> Option<String> {
    let start = content.find(DECLARATION_PREFIX)?;
    let code: String = content[start + DECLARATION_PREFIX.len()..]
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_english_content_is_untouched() {
        let resolution = resolve_language("Feature: Test\n");
        assert_eq!(resolution.language, "en");
        assert_eq!(resolution.content, "Feature: Test\n");
        assert_eq!(resolution.offset, 0);
        assert!(!resolution.added_language_tag);
        assert!(!resolution.fixed_language_tag);
    }

    #[test]
    fn test_missing_tag_is_added() {
        let resolution = resolve_language("Funktionalität: Test\n");
        assert_eq!(resolution.language, "de");
        assert_eq!(resolution.content, "# language: de\nFunktionalität: Test\n");
        assert_eq!(resolution.offset, 1);
        assert!(resolution.added_language_tag);
        assert!(!resolution.fixed_language_tag);
    }

    #[test]
    fn test_wrong_tag_is_replaced_in_place() {
        let content = "# language: es\nFunktionalität: Test\n";
        let resolution = resolve_language(content);
        assert_eq!(resolution.language, "de");
        assert_eq!(resolution.content, "# language: de\nFunktionalität: Test\n");
        assert_eq!(resolution.offset, 0);
        assert!(resolution.fixed_language_tag);
        assert!(!resolution.added_language_tag);
        assert_eq!(
            resolution.content.lines().count(),
            content.lines().count()
        );
    }

    #[test]
    fn test_matching_tag_round_trips_unchanged() {
        let content = "# language: de\nFunktionalität: Test\n";
        let resolution = resolve_language(content);
        assert_eq!(resolution.content, content);
        assert!(!resolution.added_language_tag);
        assert!(!resolution.fixed_language_tag);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve_language("Funktionalität: Test\n");
        let second = resolve_language(&first.content);
        assert_eq!(second.content, first.content);
        assert_eq!(second.offset, 0);
        assert!(!second.added_language_tag);
        assert!(!second.fixed_language_tag);
    }

    #[test]
    fn test_unknown_language_is_left_alone() {
        let resolution = resolve_language("nothing gherkin about this\n");
        assert_eq!(resolution.language, "unknown");
        assert!(!resolution.added_language_tag);
    }
}
