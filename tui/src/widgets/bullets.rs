//! BulletList Widget
//!
//! One row per bullet item: marker, category, then description. Rows that
//! do not fit the width are cut off rather than wrapped, so row `n` of the
//! area is always item `n` and mouse hover maps back with [`item_at_row`].

use brief_core::ItemView;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::theme::{self, ACCENT, CATEGORY};

const MARKER: &str = "- ";
const HOVER_MARKER: &str = "▸ ";

/// Renders presenter item views
pub struct BulletList<'a> {
    items: &'a [ItemView],
}

impl<'a> BulletList<'a> {
    /// List over the given views
    #[must_use]
    pub fn new(items: &'a [ItemView]) -> Self {
        Self { items }
    }
}

impl Widget for BulletList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (y, item) in (area.y..area.bottom()).zip(self.items) {
            let (marker, marker_style) = if item.hovered {
                (HOVER_MARKER, Style::default().fg(ACCENT))
            } else {
                (MARKER, theme::border_style())
            };

            let mut x = area.x;
            let mut put = |text: &str, style: Style, x: &mut u16| {
                let remaining = usize::from(area.right().saturating_sub(*x));
                if remaining > 0 {
                    (*x, _) = buf.set_stringn(*x, y, text, remaining, style);
                }
            };

            put(marker, marker_style, &mut x);
            for segment in &item.category {
                let style = if segment.emphasized {
                    theme::emphasis_style()
                } else {
                    Style::default().fg(CATEGORY)
                };
                put(&segment.text, style, &mut x);
            }

            if !item.description.is_empty() {
                put(" ", theme::text_style(), &mut x);
                for segment in &item.description {
                    let style = if segment.emphasized {
                        theme::emphasis_style()
                    } else {
                        theme::text_style()
                    };
                    put(&segment.text, style, &mut x);
                }
            }
        }
    }
}

/// Item index under a terminal row, if any
#[must_use]
pub fn item_at_row(area: Rect, item_count: usize, column: u16, row: u16) -> Option<usize> {
    if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
        return None;
    }
    let index = usize::from(row - area.y);
    (index < item_count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::EmphasisSegment;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn view(category: &str, description: &str, hovered: bool) -> ItemView {
        ItemView {
            category: vec![EmphasisSegment::plain(category)],
            description: if description.is_empty() {
                Vec::new()
            } else {
                vec![EmphasisSegment::plain(description)]
            },
            hovered,
        }
    }

    #[test]
    fn test_renders_one_row_per_item() {
        let items = vec![view("IP:", "10.0.0.1", false), view("Category2:", "", true)];
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);

        BulletList::new(&items).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0), "- IP: 10.0.0.1");
        assert_eq!(row_text(&buf, 1), "▸ Category2:");
        assert_eq!(row_text(&buf, 2), "");
    }

    #[test]
    fn test_long_rows_are_cut() {
        let items = vec![view("Services:", "Port 22 (SSH), Port 443 (HTTPS)", false)];
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);

        BulletList::new(&items).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "- Services:");
    }

    #[test]
    fn test_item_at_row() {
        let area = Rect::new(2, 5, 20, 4);
        assert_eq!(item_at_row(area, 3, 4, 5), Some(0));
        assert_eq!(item_at_row(area, 3, 4, 7), Some(2));
        assert_eq!(item_at_row(area, 3, 4, 8), None);
        assert_eq!(item_at_row(area, 3, 1, 5), None);
        assert_eq!(item_at_row(area, 3, 4, 4), None);
    }
}
