//! FieldView Widget
//!
//! Draws a pointer field as line glyphs. Terminal cells are roughly twice
//! as tall as they are wide, so field coordinates stretch rows by
//! [`CELL_ASPECT`] to keep angles looking right.

use brief_core::{Bounds, Point, PointerField};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::theme::FIELD_LINE;

/// Height of a terminal cell relative to its width
pub const CELL_ASPECT: f64 = 2.0;

/// Field coordinates of the center of a terminal cell
#[must_use]
pub fn to_field_point(column: u16, row: u16) -> Point {
    Point::new(f64::from(column) + 0.5, (f64::from(row) + 0.5) * CELL_ASPECT)
}

/// Field bounds covering a terminal area
#[must_use]
pub fn field_bounds(area: Rect) -> Bounds {
    Bounds::new(
        f64::from(area.x),
        f64::from(area.y) * CELL_ASPECT,
        f64::from(area.right()),
        f64::from(area.bottom()) * CELL_ASPECT,
    )
}

/// Line glyph closest to an angle in degrees (y grows downwards)
#[must_use]
pub fn glyph_for(angle: f64) -> char {
    let a = angle.rem_euclid(180.0);
    if !(22.5..157.5).contains(&a) {
        '─'
    } else if a < 67.5 {
        '╲'
    } else if a < 112.5 {
        '│'
    } else {
        '╱'
    }
}

/// Renders every cell of a field at its center
pub struct FieldView<'a> {
    field: &'a PointerField,
}

impl<'a> FieldView<'a> {
    /// View over `field`
    #[must_use]
    pub fn new(field: &'a PointerField) -> Self {
        Self { field }
    }
}

impl Widget for FieldView<'_> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(FIELD_LINE);

        for cell in self.field.cells() {
            let column = cell.center.x.floor();
            let row = (cell.center.y / CELL_ASPECT).floor();
            if column < 0.0 || row < 0.0 {
                continue;
            }
            let (x, y) = (column as u16, row as u16);
            if x < area.x || x >= area.right() || y < area.y || y >= area.bottom() {
                continue;
            }
            if let Some(target) = buf.cell_mut((x, y)) {
                target.set_char(glyph_for(cell.angle)).set_style(style);
            }
        }
    }
}
