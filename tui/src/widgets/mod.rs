//! Widgets
//!
//! Stateless renderers for presenter output. None of them own animation
//! state; they draw whatever the core reports for the current frame.

mod bullets;
mod field;
mod segment_block;

pub use bullets::{item_at_row, BulletList};
pub use field::{field_bounds, glyph_for, to_field_point, FieldView, CELL_ASPECT};
pub use segment_block::{wrap_segments, SegmentBlock, SegmentBlockState, StyledLine};
