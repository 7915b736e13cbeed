//! Gherkin keyword dialects.
//!
//! The table maps a language code to the localized keyword variants of
//! every node kind. It is embedded at build time; the subset shipped here
//! covers the languages the linter can repair language tags for.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use gherlint_ast::StepType;

const DIALECTS_JSON: &str = include_str!("dialects.json");
static DIALECTS: OnceLock<Dialects> = OnceLock::new();

/// Node-kind key into a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Feature,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Given,
    When,
    Then,
    And,
    But,
}

/// Keyword variants of one language.
#[derive(Debug, Clone, Deserialize)]
pub struct Dialect {
    pub feature: Vec<String>,
    pub background: Vec<String>,
    pub scenario: Vec<String>,
    #[serde(rename = "scenarioOutline")]
    pub scenario_outline: Vec<String>,
    pub examples: Vec<String>,
    pub given: Vec<String>,
    pub when: Vec<String>,
    pub then: Vec<String>,
    pub and: Vec<String>,
    pub but: Vec<String>,
}

impl Dialect {
    pub fn keywords(&self, keyword: Keyword) -> &[String] {
        match keyword {
            Keyword::Feature => &self.feature,
            Keyword::Background => &self.background,
            Keyword::Scenario => &self.scenario,
            Keyword::ScenarioOutline => &self.scenario_outline,
            Keyword::Examples => &self.examples,
            Keyword::Given => &self.given,
            Keyword::When => &self.when,
            Keyword::Then => &self.then,
            Keyword::And => &self.and,
            Keyword::But => &self.but,
        }
    }
}

/// The full keyword table, ordered by language code.
#[derive(Debug, Clone, Deserialize)]
pub struct Dialects(BTreeMap<String, Dialect>);

impl Dialects {
    /// The embedded table. Parsed once per process.
    pub fn get() -> &'static Dialects {
        DIALECTS.get_or_init(|| {
            serde_json::from_str(DIALECTS_JSON).expect("embedded dialect table is valid JSON")
        })
    }

    pub fn dialect(&self, code: &str) -> Option<&Dialect> {
        self.0.get(code)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// All variants of a keyword across every supported language.
    pub fn keyword_candidates(&self, keyword: Keyword) -> impl Iterator<Item = &str> {
        self.0
            .values()
            .flat_map(move |dialect| dialect.keywords(keyword))
            .map(String::as_str)
    }

    /// Detects the natural language of a document from its keywords.
    ///
    /// The literal English `Feature:` wins; otherwise the first language
    /// (stable code order) whose feature keyword appears in the content;
    /// otherwise `"unknown"`.
    pub fn detect_language<'d>(&'d self, content: &str) -> &'d str {
        if content.contains("Feature:") {
            return "en";
        }
        for (code, dialect) in &self.0 {
            if dialect.feature.iter().any(|kw| content.contains(kw.as_str())) {
                return code;
            }
        }
        "unknown"
    }

    /// Whether `keyword` is a Scenario Outline synonym in any language.
    pub fn is_outline_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        self.keyword_candidates(Keyword::ScenarioOutline)
            .any(|candidate| candidate.trim() == keyword)
    }

    /// Resolves a raw step keyword to its canonical type, independent of
    /// the source language.
    pub fn resolve_step_type(&self, keyword: &str) -> StepType {
        let keyword = keyword.trim();
        let order = [
            (Keyword::Given, StepType::Given),
            (Keyword::When, StepType::When),
            (Keyword::Then, StepType::Then),
            (Keyword::And, StepType::And),
            (Keyword::But, StepType::But),
        ];
        for (kind, step_type) in order {
            if self
                .keyword_candidates(kind)
                .any(|candidate| candidate.trim() == keyword)
            {
                return step_type;
            }
        }
        StepType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Feature: Test", "en")]
    #[case("Funktionalität: Test", "de")]
    #[case("# language: es\nFunktionalität: Test", "de")]
    #[case("Característica: Prueba", "es")]
    #[case("just some text", "unknown")]
    fn test_detect_language(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(Dialects::get().detect_language(content), expected);
    }

    #[rstest]
    #[case("Given", StepType::Given)]
    #[case("Given ", StepType::Given)]
    #[case("Angenommen", StepType::Given)]
    #[case("Wenn", StepType::When)]
    #[case("Entonces", StepType::Then)]
    #[case("Und", StepType::And)]
    #[case("But", StepType::But)]
    #[case("*", StepType::Given)]
    #[case("Bogus", StepType::Unknown)]
    fn test_resolve_step_type(#[case] keyword: &str, #[case] expected: StepType) {
        assert_eq!(Dialects::get().resolve_step_type(keyword), expected);
    }

    #[rstest]
    #[case("Scenario Outline", true)]
    #[case("Szenariogrundriss", true)]
    #[case("Esquema del escenario", true)]
    #[case("Scenario", false)]
    #[case("Szenario", false)]
    fn test_is_outline_keyword(#[case] keyword: &str, #[case] expected: bool) {
        assert_eq!(Dialects::get().is_outline_keyword(keyword), expected);
    }

    #[test]
    fn test_every_dialect_has_english_entry() {
        assert!(Dialects::get().dialect("en").is_some());
        assert!(Dialects::get().languages().any(|code| code == "de"));
    }
}
