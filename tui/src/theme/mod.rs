//! Theme and Colors
//!
//! A terminal-friendly security palette: cool greys for structure, a
//! signal amber for emphasis, and a cyan accent for interactive state.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Text
// ============================================================================

/// Body text
pub const TEXT: Color = Color::Rgb(210, 214, 220);

/// Emphasized vocabulary terms
pub const EMPHASIS: Color = Color::Rgb(255, 196, 92);

/// Bullet categories at rest
pub const CATEGORY: Color = Color::Rgb(120, 200, 255);

// ============================================================================
// Chrome
// ============================================================================

/// Pane borders and titles
pub const BORDER: Color = Color::Rgb(70, 80, 95);

/// Hovered item marker
pub const ACCENT: Color = Color::Cyan;

/// Status line and hints
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Pointer field lines
pub const FIELD_LINE: Color = Color::Rgb(150, 160, 175);

/// Style for an emphasized run
#[must_use]
pub fn emphasis_style() -> Style {
    Style::default().fg(EMPHASIS).add_modifier(Modifier::BOLD)
}

/// Style for plain body text
#[must_use]
pub fn text_style() -> Style {
    Style::default().fg(TEXT)
}

/// Style for pane borders
#[must_use]
pub fn border_style() -> Style {
    Style::default().fg(BORDER)
}
