//! Vocabulary Highlighting
//!
//! Marks occurrences of significant terms inside a text span. The result is
//! a sequence of [`EmphasisSegment`]s that reconstructs the input exactly
//! when concatenated; emphasis only marks characters, it never alters them.
//!
//! # Matching Rules
//!
//! - Case-insensitive
//! - Whole words only (`\b` on both sides of the term)
//! - Non-overlapping, one left-to-right pass
//! - At a given position the longest term wins
//!
//! All terms are compiled into one alternation, so text that was already
//! matched is never re-scanned by another term.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Security and risk terms emphasized when no configuration overrides them
const DEFAULT_TERMS: &[&str] = &[
    "vulnerabilities",
    "vulnerability",
    "CVE",
    "security",
    "threat",
    "malware",
    "risk",
    "critical",
    "high",
    "medium",
    "low",
    "attack",
    "exploit",
    "breach",
    "compromise",
    "infected",
    "suspicious",
    "malicious",
    "dangerous",
    "exposed",
    "unprotected",
    "outdated",
    "deprecated",
    "unpatched",
    "recommend",
    "immediate",
    "urgent",
    "priority",
    "patch",
    "update",
    "fix",
];

/// A run of text, either emphasized or plain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasisSegment {
    /// The text exactly as it appears in the input
    pub text: String,
    /// Whether this run matched a vocabulary term
    pub emphasized: bool,
}

impl EmphasisSegment {
    /// Create a plain segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    /// Create an emphasized segment
    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// Ordered set of significant terms
///
/// Terms are trimmed, empty terms are dropped, and duplicates are removed
/// case-insensitively (first spelling wins).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from any list of terms
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            let folded = term.to_lowercase();
            if kept.iter().any(|k| k.to_lowercase() == folded) {
                continue;
            }
            kept.push(term.to_string());
        }
        Self { terms: kept }
    }

    /// A vocabulary with no terms (highlighting becomes a no-op)
    #[must_use]
    pub fn empty() -> Self {
        Self { terms: Vec::new() }
    }

    /// Parse a comma-separated list (as used by environment overrides)
    #[must_use]
    pub fn from_csv(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// The terms in configuration order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_TERMS.iter().copied())
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Self::new(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Compiled matcher for a vocabulary
///
/// Build once per vocabulary and reuse it for every span.
#[derive(Clone, Debug)]
pub struct Highlighter {
    matcher: Option<Regex>,
}

impl Highlighter {
    /// Compile a highlighter for the given vocabulary
    #[must_use]
    pub fn new(vocabulary: &Vocabulary) -> Self {
        if vocabulary.is_empty() {
            return Self { matcher: None };
        }

        // Longest first so the alternation prefers "vulnerabilities" over "vulnerability"
        let mut terms: Vec<&str> = vocabulary.terms().iter().map(String::as_str).collect();
        terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let alternation = terms
            .iter()
            .map(|t| bounded_term(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("(?:{alternation})");

        // Escaped literals always compile; a failure here would only come from
        // the size limit, in which case we degrade to no emphasis.
        let matcher = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    terms = vocabulary.len(),
                    "Vocabulary matcher rejected, emphasis disabled"
                );
                None
            }
        };

        Self { matcher }
    }

    /// Split `text` into plain and emphasized segments
    #[must_use]
    pub fn highlight(&self, text: &str) -> Vec<EmphasisSegment> {
        let Some(matcher) = &self.matcher else {
            return vec![EmphasisSegment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;

        for found in matcher.find_iter(text) {
            if found.start() > cursor {
                segments.push(EmphasisSegment::plain(&text[cursor..found.start()]));
            }
            segments.push(EmphasisSegment::emphasized(found.as_str()));
            cursor = found.end();
        }

        if cursor < text.len() || segments.is_empty() {
            segments.push(EmphasisSegment::plain(&text[cursor..]));
        }

        segments
    }

    /// Whether this highlighter can ever emphasize anything
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.matcher.is_none()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

/// Escape `term` and anchor it at whole-word edges
///
/// A word-character edge gets `\b`. A symbol edge (as in `C++`) gets `\B`,
/// which requires the neighbouring character to be a symbol, whitespace or
/// the end of the text.
fn bounded_term(term: &str) -> String {
    let edge = |c: Option<char>| match c {
        Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
        _ => r"\B",
    };
    format!(
        "{}{}{}",
        edge(term.chars().next()),
        regex::escape(term),
        edge(term.chars().next_back())
    )
}

/// One-shot convenience: compile `vocabulary` and highlight `text`
#[must_use]
pub fn highlight(text: &str, vocabulary: &Vocabulary) -> Vec<EmphasisSegment> {
    Highlighter::new(vocabulary).highlight(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(segments: &[EmphasisSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn emphasized(segments: &[EmphasisSegment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.emphasized)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn test_empty_vocabulary_is_single_plain_segment() {
        let text = "Critical risk on port 22";
        let segments = highlight(text, &Vocabulary::empty());
        assert_eq!(segments, vec![EmphasisSegment::plain(text)]);
    }

    #[test]
    fn test_empty_text_is_single_segment() {
        let segments = highlight("", &Vocabulary::default());
        assert_eq!(segments, vec![EmphasisSegment::plain("")]);
    }

    #[test]
    fn test_no_match_is_single_plain_segment() {
        let segments = highlight("all quiet here", &Vocabulary::default());
        assert_eq!(segments, vec![EmphasisSegment::plain("all quiet here")]);
    }

    #[test]
    fn test_case_insensitive_whole_words() {
        let text = "CRITICAL issue, Highway is not high";
        let segments = highlight(text, &Vocabulary::default());

        assert_eq!(emphasized(&segments), vec!["CRITICAL", "high"]);
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_longest_term_wins() {
        let segments = highlight(
            "Two vulnerabilities and one vulnerability",
            &Vocabulary::default(),
        );
        assert_eq!(emphasized(&segments), vec!["vulnerabilities", "vulnerability"]);
    }

    #[test]
    fn test_matches_are_not_rewrapped() {
        // "high" appears inside the emphasized run "high risk" only once
        let vocab = Vocabulary::new(["high risk", "risk", "high"]);
        let segments = highlight("a high risk host", &vocab);

        assert_eq!(emphasized(&segments), vec!["high risk"]);
        assert_eq!(concat(&segments), "a high risk host");
    }

    #[test]
    fn test_terms_with_regex_metacharacters() {
        let vocab = Vocabulary::new(["c++", "v1.2"]);
        let segments = highlight("uses v1.2 and v1x2", &vocab);
        assert_eq!(emphasized(&segments), vec!["v1.2"]);
    }

    #[test]
    fn test_terms_with_symbol_edges() {
        let vocab = Vocabulary::new(["c++", "#ioc"]);
        let segments = highlight("C++, c++x, abc++ and #ioc but a#ioc, end c++", &vocab);
        assert_eq!(emphasized(&segments), vec!["C++", "#ioc", "c++"]);
        assert_eq!(
            concat(&segments),
            "C++, c++x, abc++ and #ioc but a#ioc, end c++"
        );
    }

    #[test]
    fn test_bounded_term_edges() {
        assert_eq!(bounded_term("risk"), r"\brisk\b");
        assert_eq!(bounded_term("c++"), r"\bc\+\+\B");
        assert_eq!(bounded_term(".net"), r"\B\.net\b");
    }

    #[test]
    fn test_lossless_reconstruction() {
        let samples = [
            "",
            "patch",
            "Patch now! Update, fix, and patch.",
            "naïve threat—analysis of CVE-2021-44228 (critical)",
            "\n\nRisk\n\nrisk\n",
            "lowlow low_low low-low",
        ];
        let highlighter = Highlighter::default();

        for text in samples {
            assert_eq!(concat(&highlighter.highlight(text)), text, "input: {text:?}");
        }
    }

    #[test]
    fn test_vocabulary_dedup_and_trim() {
        let vocab = Vocabulary::new([" Risk ", "risk", "", "  ", "CVE"]);
        assert_eq!(vocab.terms(), &["Risk".to_string(), "CVE".to_string()]);
    }

    #[test]
    fn test_vocabulary_from_csv() {
        let vocab = Vocabulary::from_csv("patch, exploit ,,breach");
        assert_eq!(vocab.len(), 3);
        assert!(!vocab.is_empty());
    }

    #[test]
    fn test_noop_highlighter() {
        assert!(Highlighter::new(&Vocabulary::empty()).is_noop());
        assert!(!Highlighter::default().is_noop());
    }
}
