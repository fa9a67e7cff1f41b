//! Sub-bullet Folding
//!
//! Report generators are asked to keep every value on its category line,
//! but they regularly emit nested sub-bullets anyway:
//!
//! ```text
//! - Services:
//!   - Port 22 (SSH)
//!   - Port 443 (HTTPS)
//! ```
//!
//! [`normalize_sub_bullets`] folds the three categories known to do this
//! back into one line (`- Services: Port 22 (SSH), Port 443 (HTTPS)`) so the
//! parser, which discards continuation lines, keeps their values.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SERVICES_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*- Services:[^\n]*\n((?:(?:[ \t]*\n)*[ \t]+- Port[^\n]*\n?)+)")
});
static VULNERABILITIES_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*- Vulnerabilities:[^\n]*\n((?:(?:[ \t]*\n)*[ \t]+- CVE-[^\n]*\n?)+)")
});
static THREAT_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*- Threat Intelligence:[^\n]*\n((?:(?:[ \t]*\n)*[ \t]+- [^\n]*\n?)+)")
});

static PORT_VALUE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"Port [^\n]+"));
static CVE_VALUE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"CVE-\S+ \([^)]+\)"));
static SUB_BULLET_VALUE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?m)^[ \t]+- ([^\n]+)"));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern, error = %e, "Invalid fold pattern");
            None
        }
    }
}

/// The categories whose sub-bullets get folded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FoldKind {
    /// `- Port ...` sub-bullets
    Services,
    /// `- CVE-... (severity)` sub-bullets
    Vulnerabilities,
    /// Any sub-bullet
    ThreatIntelligence,
}

impl FoldKind {
    const ALL: [Self; 3] = [Self::Services, Self::Vulnerabilities, Self::ThreatIntelligence];

    fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::Vulnerabilities => "Vulnerabilities",
            Self::ThreatIntelligence => "Threat Intelligence",
        }
    }

    /// Header line plus the run of sub-bullets under it
    fn block(self) -> Option<&'static Regex> {
        match self {
            Self::Services => SERVICES_BLOCK.as_ref(),
            Self::Vulnerabilities => VULNERABILITIES_BLOCK.as_ref(),
            Self::ThreatIntelligence => THREAT_BLOCK.as_ref(),
        }
    }

    /// Values carried by a run of sub-bullets, in order
    fn values(self, sub_bullets: &str) -> Vec<String> {
        match self {
            Self::Services => find_all(PORT_VALUE.as_ref(), sub_bullets),
            Self::Vulnerabilities => cve_mentions(sub_bullets),
            Self::ThreatIntelligence => SUB_BULLET_VALUE
                .as_ref()
                .map(|re| {
                    re.captures_iter(sub_bullets)
                        .map(|caps| caps[1].trim_end().to_string())
                        .filter(|v| !v.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn fold(self, text: &str) -> String {
        let Some(block) = self.block() else {
            return text.to_string();
        };

        block
            .replace_all(text, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let values = self.values(&caps[1]);
                if values.is_empty() {
                    return whole.to_string();
                }

                tracing::debug!(
                    category = self.label(),
                    folded = values.len(),
                    "Folded nested sub-bullets"
                );
                let newline = if whole.ends_with('\n') { "\n" } else { "" };
                format!("- {}: {}{newline}", self.label(), values.join(", "))
            })
            .into_owned()
    }
}

fn find_all(re: Option<&Regex>, text: &str) -> Vec<String> {
    re.map(|re| {
        re.find_iter(text)
            .map(|m| m.as_str().trim_end().to_string())
            .collect()
    })
    .unwrap_or_default()
}

/// Find `CVE-<id> (<severity>)` mentions in order
fn cve_mentions(text: &str) -> Vec<String> {
    find_all(CVE_VALUE.as_ref(), text)
}

/// Fold known nested sub-bullets into their parent line
///
/// Text without foldable sub-bullets is returned unchanged apart from
/// `\r\n` line endings, which become `\n`. Blank lines between the
/// sub-bullets of one category do not end the run.
#[must_use]
pub fn normalize_sub_bullets(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    FoldKind::ALL
        .into_iter()
        .fold(text, |text, kind| kind.fold(&text))
}
