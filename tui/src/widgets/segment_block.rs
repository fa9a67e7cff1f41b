//! SegmentBlock Widget
//!
//! A borderless, scrollable region of emphasis segments. Text is wrapped
//! to the area width; each wrapped line keeps the emphasis of the
//! characters it came from. Blank source lines stay blank, so paragraph
//! breaks render as gaps.

use brief_core::EmphasisSegment;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// One wrapped line as `(text, emphasized)` runs
pub type StyledLine = Vec<(String, bool)>;

/// State for a scrollable segment block
#[derive(Debug, Default)]
pub struct SegmentBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
}

impl SegmentBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Scroll to top
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Wrap segments to `width`, preserving emphasis per character
#[must_use]
pub fn wrap_segments(segments: &[EmphasisSegment], width: usize) -> Vec<StyledLine> {
    let mut text = String::new();
    let mut mask: Vec<bool> = Vec::new();
    for segment in segments {
        text.push_str(&segment.text);
        mask.extend(std::iter::repeat(segment.emphasized).take(segment.text.len()));
    }

    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line_start = 0;

    for source_line in text.split('\n') {
        if source_line.trim().is_empty() {
            lines.push(Vec::new());
        } else {
            let mut cursor = 0;
            for wrapped in wrap(source_line, width) {
                let Some(found) = source_line[cursor..].find(wrapped.as_ref()) else {
                    lines.push(vec![(wrapped.into_owned(), false)]);
                    continue;
                };
                let start = cursor + found;
                let end = start + wrapped.len();
                lines.push(runs(
                    &source_line[start..end],
                    &mask[line_start + start..line_start + end],
                ));
                cursor = end;
            }
        }
        line_start += source_line.len() + 1;
    }

    lines
}

/// Group consecutive characters with the same emphasis
fn runs(text: &str, mask: &[bool]) -> StyledLine {
    let mut out: StyledLine = Vec::new();
    for (idx, ch) in text.char_indices() {
        let emphasized = mask[idx];
        match out.last_mut() {
            Some((run, flag)) if *flag == emphasized => run.push(ch),
            _ => out.push((ch.to_string(), emphasized)),
        }
    }
    out
}

/// A borderless, scrollable block of emphasis segments
pub struct SegmentBlock<'a> {
    segments: &'a [EmphasisSegment],
    style: Style,
    emphasis: Style,
}

impl<'a> SegmentBlock<'a> {
    /// Render `segments` with default styles
    #[must_use]
    pub fn new(segments: &'a [EmphasisSegment]) -> Self {
        Self {
            segments,
            style: Style::default(),
            emphasis: Style::default(),
        }
    }

    /// Style for plain runs
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style for emphasized runs
    #[must_use]
    pub fn emphasis(mut self, style: Style) -> Self {
        self.emphasis = style;
        self
    }
}

impl StatefulWidget for SegmentBlock<'_> {
    type State = SegmentBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = wrap_segments(self.segments, usize::from(area.width));
        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(usize::from(area.height));
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (y, line) in (area.y..area.bottom()).zip(wrapped.iter().skip(state.scroll_offset)) {
            let mut x = area.x;
            for (text, emphasized) in line {
                let remaining = usize::from(area.right().saturating_sub(x));
                if remaining == 0 {
                    break;
                }
                let style = if *emphasized { self.emphasis } else { self.style };
                (x, _) = buf.set_stringn(x, y, text, remaining, style);
            }
        }
    }
}
