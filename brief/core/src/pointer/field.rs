//! Pointer field state and its bus-driven animator

use super::{angle_toward, Bounds, FieldCell, Point, PointerBus, PointerSubscription};
use crate::animation::AnimatorError;

/// Evenly spaced cell centers for a `rows` x `columns` grid, row-major
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_centers(rows: usize, columns: usize, bounds: Bounds) -> Vec<Point> {
    if rows == 0 || columns == 0 {
        return Vec::new();
    }

    let (cell_w, cell_h) = (
        bounds.width() / columns as f64,
        bounds.height() / rows as f64,
    );

    let mut centers = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        for col in 0..columns {
            centers.push(Point::new(
                bounds.left + cell_w * (col as f64 + 0.5),
                bounds.top + cell_h * (row as f64 + 0.5),
            ));
        }
    }
    centers
}

/// Cells oriented by the most recent pointer sample
#[derive(Clone, Debug, PartialEq)]
pub struct PointerField {
    cells: Vec<FieldCell>,
    bounds: Bounds,
    base_angle: f64,
    last_sample: Option<Point>,
}

impl PointerField {
    /// Create a field from explicit cell centers
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::InvalidField`] when `centers` is empty,
    /// `bounds` is inverted or non-finite, or `base_angle` is not finite.
    pub fn new(
        centers: Vec<Point>,
        bounds: Bounds,
        base_angle: f64,
    ) -> Result<Self, AnimatorError> {
        if !base_angle.is_finite() {
            return Err(AnimatorError::InvalidField(format!(
                "base angle must be finite, got {base_angle}"
            )));
        }
        check_geometry(&centers, bounds)?;

        Ok(Self {
            cells: centers
                .into_iter()
                .map(|center| FieldCell {
                    center,
                    angle: base_angle,
                })
                .collect(),
            bounds,
            base_angle,
            last_sample: None,
        })
    }

    /// Create a `rows` x `columns` grid filling `bounds`
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::InvalidField`] for a zero dimension or any
    /// condition rejected by [`Self::new`].
    pub fn grid(
        rows: usize,
        columns: usize,
        bounds: Bounds,
        base_angle: f64,
    ) -> Result<Self, AnimatorError> {
        if rows == 0 || columns == 0 {
            return Err(AnimatorError::InvalidField(format!(
                "grid needs at least one row and column, got {rows}x{columns}"
            )));
        }
        Self::new(grid_centers(rows, columns, bounds), bounds, base_angle)
    }

    /// Orient every cell for a new pointer position
    pub fn apply(&mut self, sample: Point) {
        self.last_sample = Some(sample);
        self.orient(sample);
    }

    fn orient(&mut self, sample: Point) {
        if self.bounds.contains(sample) {
            for cell in &mut self.cells {
                cell.angle = angle_toward(cell.center, sample);
            }
        } else {
            self.reset_angles();
        }
    }

    fn reset_angles(&mut self) {
        for cell in &mut self.cells {
            cell.angle = self.base_angle;
        }
    }

    /// Replace the geometry and re-apply the last sample
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::InvalidField`] for empty centers or unusable
    /// bounds; the field is left unchanged.
    pub fn relayout(&mut self, centers: Vec<Point>, bounds: Bounds) -> Result<(), AnimatorError> {
        check_geometry(&centers, bounds)?;

        let base_angle = self.base_angle;
        self.cells = centers
            .into_iter()
            .map(|center| FieldCell {
                center,
                angle: base_angle,
            })
            .collect();
        self.bounds = bounds;

        if let Some(sample) = self.last_sample {
            self.orient(sample);
        }
        Ok(())
    }

    /// Apply a synthetic sample at the middle cell's center
    pub fn activate(&mut self) -> Point {
        let sample = self.cells[self.cells.len() / 2].center;
        self.apply(sample);
        sample
    }

    /// Cells in layout order
    #[must_use]
    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    /// Current angles in layout order
    #[must_use]
    pub fn angles(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.angle).collect()
    }

    /// Angle used when the pointer is outside the field
    #[must_use]
    pub fn base_angle(&self) -> f64 {
        self.base_angle
    }

    /// Field bounds
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Most recently applied sample
    #[must_use]
    pub fn last_sample(&self) -> Option<Point> {
        self.last_sample
    }
}

fn check_geometry(centers: &[Point], bounds: Bounds) -> Result<(), AnimatorError> {
    if centers.is_empty() {
        return Err(AnimatorError::InvalidField("field has no cells".to_string()));
    }
    if !bounds.is_valid() {
        return Err(AnimatorError::InvalidField(format!(
            "unusable bounds {bounds:?}"
        )));
    }
    Ok(())
}

/// A [`PointerField`] fed from a [`PointerBus`] subscription
#[derive(Debug)]
pub struct PointerFieldAnimator {
    field: PointerField,
    subscription: Option<PointerSubscription>,
}

impl PointerFieldAnimator {
    /// Wrap a field; it receives nothing until attached
    #[must_use]
    pub fn new(field: PointerField) -> Self {
        Self {
            field,
            subscription: None,
        }
    }

    /// Subscribe to `bus` and orient toward the middle cell
    ///
    /// Any previous subscription is released first.
    pub fn attach(&mut self, bus: &PointerBus) {
        self.detach();
        self.subscription = Some(bus.subscribe());
        let sample = self.field.activate();
        tracing::debug!(x = sample.x, y = sample.y, "Pointer field attached");
    }

    /// Apply every pending sample in arrival order, returning how many
    pub fn pump(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };

        let samples = subscription.drain();
        for sample in &samples {
            self.field.apply(*sample);
        }
        samples.len()
    }

    /// Release the subscription; returns false when not attached
    pub fn detach(&mut self) -> bool {
        self.subscription.take().is_some()
    }

    /// Whether a subscription is held
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The animated field
    #[must_use]
    pub fn field(&self) -> &PointerField {
        &self.field
    }

    /// Mutable access, e.g. to relayout after a resize
    pub fn field_mut(&mut self) -> &mut PointerField {
        &mut self.field
    }
}

impl Drop for PointerFieldAnimator {
    fn drop(&mut self) {
        self.detach();
    }
}
