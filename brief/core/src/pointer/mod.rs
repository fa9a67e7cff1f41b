//! Pointer Field - Cells That Turn Toward the Pointer
//!
//! A field is a set of cells, each with a center point and an angle. Feeding
//! a pointer sample that lies inside the field's bounds rotates every cell
//! toward it; a sample outside the bounds returns every cell to the base
//! angle.
//!
//! Samples arrive through a [`PointerBus`], a process-wide fan-out with an
//! explicit subscription per listener. A [`PointerFieldAnimator`] owns one
//! subscription and applies pending samples when its owner pumps it.
//!
//! ```text
//! terminal mouse ──publish──▶ PointerBus ──▶ subscription ──pump──▶ PointerField
//!                                        └─▶ subscription ──pump──▶ PointerField
//! ```

mod bus;
mod field;

pub use bus::{PointerBus, PointerSubscription, SubscriptionId};
pub use field::{grid_centers, PointerField, PointerFieldAnimator};

use serde::{Deserialize, Serialize};

/// A position in field coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, growing rightwards
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle with inclusive edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl Bounds {
    /// Create bounds from edges
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether `point` lies inside, edges included
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Horizontal extent
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite())
            && self.right >= self.left
            && self.bottom >= self.top
    }
}

/// One cell of a pointer field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldCell {
    /// Cell center in field coordinates
    pub center: Point,
    /// Current rotation in degrees
    pub angle: f64,
}

/// Rotation in degrees that points a cell at `center` toward `sample`
///
/// A sample exactly on the center is treated as one unit away, so the
/// result is always finite.
#[must_use]
pub fn angle_toward(center: Point, sample: Point) -> f64 {
    let dx = sample.x - center.x;
    let dy = sample.y - center.y;

    let mut dist = dx.hypot(dy);
    if dist == 0.0 {
        dist = 1.0;
    }

    let angle = (dx / dist).clamp(-1.0, 1.0).acos().to_degrees();
    if sample.y <= center.y {
        -angle
    } else {
        angle
    }
}
