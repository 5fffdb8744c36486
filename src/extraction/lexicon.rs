//! Vocabulary the normalizer recognises in model output
//!
//! Field names and inline labels differ by locale and by model. Adding a new
//! spelling means extending a [`Lexicon`], never touching the resolvers.

use regex::Regex;

/// Explanation field names, highest priority first.
pub const DEFAULT_EXPLANATION_FIELDS: &[&str] = &[
    "explanation",
    "explain",
    "解説",
    "説明",
    "analysis",
    "comment",
    "commentary",
    "rationale",
];

/// Labels that introduce an explanation inside the question text.
pub const DEFAULT_EXPLANATION_LABELS: &[&str] = &["解説", "Explanation"];

/// Labels for a "correct answer" line that precedes an explanation.
pub const DEFAULT_CORRECT_ANSWER_LABELS: &[&str] = &["正解", "Correct answer"];

/// Stands in for a candidate without any question text.
pub const DEFAULT_PLACEHOLDER_QUESTION: &str = "問題文がありません";

/// A labelled pattern that finds an explanation embedded in question text.
///
/// The match start is where the question ends; the `body` group is the
/// explanation.
#[derive(Debug, Clone)]
pub struct EmbeddedMarker {
    pub label: String,
    pattern: Regex,
}

impl EmbeddedMarker {
    /// `label` at the start of a line, or `label` followed by a colon anywhere.
    /// The colon may be half-width or full-width.
    ///
    /// At the start of a line the label must be closed off by a bracket, a
    /// colon or the end of the line, so `Explanation-based …` or `解説文を…`
    /// stay part of the question.
    pub fn explanation_label(label: &str) -> Result<Self, regex::Error> {
        let token = regex::escape(label);
        let pattern = format!(
            r"(?i)(?:(?m:^)[ \t]*[【\[]?{token}(?:[】\]][ \t]*[:：]?|[ \t]*[:：]|(?m:[ \t]*\r?$))|{token}[ \t]*[:：])(?P<body>[\s\S]*)"
        );
        Self::new(label, &pattern)
    }

    /// `label` at the start of a line, optionally followed by a colon and the
    /// rest of its line (`正解: B`), then one or two line breaks, then the
    /// explanation.
    pub fn correct_answer_label(label: &str) -> Result<Self, regex::Error> {
        let token = regex::escape(label);
        let pattern = format!(
            r"(?i)(?m:^)[ \t]*[【\[]?{token}[】\]]?(?:[ \t]*[:：][^\n]*)?[ \t]*\r?\n(?:[ \t]*\r?\n)?(?P<body>[\s\S]+)"
        );
        Self::new(label, &pattern)
    }

    /// A custom pattern. It must define a `body` capture group.
    pub fn new(label: &str, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(pattern)?;
        if !pattern.capture_names().any(|name| name == Some("body")) {
            return Err(regex::Error::Syntax(format!(
                "marker pattern for '{label}' has no `body` group"
            )));
        }
        Ok(Self {
            label: label.to_string(),
            pattern,
        })
    }

    /// Splits `text` into `(question, explanation)` at the first usable match.
    ///
    /// A match is usable when both the text before it and its body are
    /// non-blank once trimmed.
    pub fn split<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        self.pattern.captures_iter(text).find_map(|caps| {
            let start = caps.get(0)?.start();
            let body = caps.name("body")?.as_str().trim();
            let question = text[..start].trim();
            (!question.is_empty() && !body.is_empty()).then_some((question, body))
        })
    }
}

/// Field names and embedded markers used to resolve explanations.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub explanation_fields: Vec<String>,
    /// Tried in order; explanation labels come before correct-answer labels.
    pub markers: Vec<EmbeddedMarker>,
    pub placeholder_question: String,
}

impl Lexicon {
    /// Appends extra explanation field names after the built-in ones.
    pub fn with_explanation_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            let field = field.trim();
            if !field.is_empty() && !self.explanation_fields.iter().any(|f| f == field) {
                self.explanation_fields.push(field.to_string());
            }
        }
        self
    }

    /// Appends an embedded marker after the existing ones.
    pub fn with_marker(mut self, marker: EmbeddedMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let labels = DEFAULT_EXPLANATION_LABELS
            .iter()
            .map(|label| EmbeddedMarker::explanation_label(label));
        let correct = DEFAULT_CORRECT_ANSWER_LABELS
            .iter()
            .map(|label| EmbeddedMarker::correct_answer_label(label));

        Self {
            explanation_fields: DEFAULT_EXPLANATION_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            markers: labels
                .chain(correct)
                .collect::<Result<_, _>>()
                .expect("built-in marker patterns are valid"),
            placeholder_question: DEFAULT_PLACEHOLDER_QUESTION.to_string(),
        }
    }
}
