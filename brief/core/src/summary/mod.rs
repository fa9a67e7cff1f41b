//! Report Parsing
//!
//! Splits a raw AI-generated report into an ordered list of bullet items
//! and a cleaned narrative paragraph.
//!
//! # Input Format
//!
//! ```text
//! ## Bullet Point Summary
//! - IP: 203.0.113.7
//! - **Services**: Port 22 (SSH), Port 443 (HTTPS)
//!
//! ## Paragraph Summary
//! The host exposes an outdated SSH daemon.
//!
//! Apply the vendor patch.
//! ```
//!
//! Parsing never fails. Any section that cannot be located degrades to its
//! empty default, so input without headers yields an empty [`ParsedSummary`].
//! Emphasis markers (`**`, `*`) are structural noise here; real emphasis is
//! recomputed later by the [`crate::highlight`] module.

mod normalize;

pub use normalize::normalize_sub_bullets;

use serde::{Deserialize, Serialize};

/// Header line that opens the bullet section
pub const BULLET_HEADER: &str = "## Bullet Point Summary";

/// Header line that opens the paragraph section
pub const PARAGRAPH_HEADER: &str = "## Paragraph Summary";

/// Paragraph-break token preserved inside the cleaned paragraph
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// One categorized line from the bullet section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletItem {
    /// Text before the first colon (never empty)
    pub category: String,
    /// Text after the first colon (may be empty)
    pub description: String,
}

impl BulletItem {
    /// Create a new bullet item
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
        }
    }

    /// Whether the item carries a description
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

/// A piece of the paragraph as the presentation layer should lay it out
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParagraphBlock<'a> {
    /// Running text
    Text(&'a str),
    /// A visual gap between two runs of text
    Break,
}

/// Structured result of parsing one report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSummary {
    /// Bullet items in source order
    pub bullet_items: Vec<BulletItem>,
    /// Cleaned paragraph, empty only when the report had no paragraph section
    pub paragraph: String,
}

impl ParsedSummary {
    /// Whether nothing could be extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bullet_items.is_empty() && self.paragraph.is_empty()
    }

    /// Split the paragraph at its break tokens
    #[must_use]
    pub fn paragraph_blocks(&self) -> Vec<ParagraphBlock<'_>> {
        split_blocks(&self.paragraph)
    }
}

/// Split text at [`PARAGRAPH_BREAK`] tokens, keeping the breaks as blocks
#[must_use]
pub fn split_blocks(text: &str) -> Vec<ParagraphBlock<'_>> {
    let mut blocks = Vec::new();
    for (i, piece) in text.split(PARAGRAPH_BREAK).enumerate() {
        if i > 0 {
            blocks.push(ParagraphBlock::Break);
        }
        if !piece.is_empty() {
            blocks.push(ParagraphBlock::Text(piece));
        }
    }
    blocks
}

/// Parse a raw report
#[must_use]
pub fn parse(raw: &str) -> ParsedSummary {
    let text = raw.replace("\r\n", "\n");
    let lines: Vec<&str> = text.split('\n').collect();

    let bullet_items = find_header(&lines, BULLET_HEADER)
        .map(|start| {
            let end = lines[start..]
                .iter()
                .position(|l| is_header(l))
                .map_or(lines.len(), |offset| start + offset);
            parse_bullets(&lines[start..end])
        })
        .unwrap_or_default();

    let paragraph = find_header(&lines, PARAGRAPH_HEADER)
        .map(|start| clean_paragraph(&lines[start..].join("\n")))
        .unwrap_or_default();

    tracing::debug!(
        items = bullet_items.len(),
        paragraph_chars = paragraph.chars().count(),
        "Parsed report"
    );

    ParsedSummary {
        bullet_items,
        paragraph,
    }
}

/// Fold nested sub-bullets, then parse
#[must_use]
pub fn parse_normalized(raw: &str) -> ParsedSummary {
    parse(&normalize_sub_bullets(raw))
}

/// Index of the first line after the given header, if present
fn find_header(lines: &[&str], header: &str) -> Option<usize> {
    lines
        .iter()
        .position(|l| l.trim_end() == header)
        .map(|i| i + 1)
}

fn is_header(line: &str) -> bool {
    let line = line.trim_end();
    line == BULLET_HEADER || line == PARAGRAPH_HEADER
}

fn parse_bullets(lines: &[&str]) -> Vec<BulletItem> {
    lines.iter().filter_map(|line| parse_bullet_line(line)).collect()
}

/// Parse one line; `None` for continuation lines and empty bullets
fn parse_bullet_line(line: &str) -> Option<BulletItem> {
    let rest = line.trim_start().strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let content = strip_emphasis(rest);
    let (before, after) = split_first_colon(&content);

    let item = match after {
        Some(description) if !before.trim().is_empty() => {
            BulletItem::new(before.trim(), description.trim())
        }
        // No usable category before the colon: the whole line is the category
        _ => BulletItem::new(unescape_colons(content.trim()), String::new()),
    };

    (!item.category.is_empty()).then_some(item)
}

/// Split at the first colon not preceded by a backslash
///
/// Escaped colons in either half are unescaped.
fn split_first_colon(content: &str) -> (String, Option<String>) {
    let mut prev = None;
    for (idx, ch) in content.char_indices() {
        if ch == ':' && prev != Some('\\') {
            let before = unescape_colons(&content[..idx]);
            let after = unescape_colons(&content[idx + 1..]);
            return (before, Some(after));
        }
        prev = Some(ch);
    }
    (unescape_colons(content), None)
}

fn unescape_colons(text: &str) -> String {
    text.replace("\\:", ":")
}

/// Remove `**` and `*` markers literally
fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "")
}

fn clean_paragraph(section: &str) -> String {
    if section.trim().is_empty() {
        return String::new();
    }

    let stripped = strip_emphasis(section);
    let trimmed = stripped.trim();

    // Drop decorative trailing artifacts, keeping a terminal period
    let cleaned = trimmed
        .trim_end_matches(|c: char| !(c.is_alphanumeric() || c.is_whitespace() || c == '.'))
        .trim_end();

    let mut paragraph = cleaned.to_string();
    if !paragraph.ends_with('.') {
        paragraph.push('.');
    }
    paragraph
}
