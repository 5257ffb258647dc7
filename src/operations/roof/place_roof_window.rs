use crate::error::{GeometryError, Result};
use crate::math::Point3;
use crate::model::Ring;
use crate::spec::RoofFeature;

use super::RoofSlope;

/// A window lying in a roof plane.
#[derive(Debug, Clone)]
pub struct RoofWindow {
    /// Window pane, facing the same way as the roof.
    pub pane: Ring,
    /// Cut-out to subtract from the host roof surface.
    pub roof_hole: Ring,
}

impl RoofWindow {
    /// Corners of the pane.
    #[must_use]
    pub fn corners(&self) -> &[Point3] {
        self.pane.points()
    }
}

/// Places a roof window: `width` along the eave, `height` toward the ridge
/// in plan.
pub struct PlaceRoofWindow<'a> {
    slope: &'a RoofSlope,
    window: &'a RoofFeature,
}

impl<'a> PlaceRoofWindow<'a> {
    /// Creates a new `PlaceRoofWindow` operation.
    #[must_use]
    pub fn new(slope: &'a RoofSlope, window: &'a RoofFeature) -> Self {
        Self { slope, window }
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a non-positive size.
    pub fn execute(&self) -> Result<RoofWindow> {
        let w = self.window;
        if w.width <= 0.0 || w.height <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "roof window of size {} x {}",
                w.width, w.height
            ))
            .into());
        }
        let corners = window_corners(self.slope, w.origin.x, w.origin.y, w.width, w.height);
        let [r0, r1, r2, r3] = corners;
        Ok(RoofWindow {
            pane: Ring::from_points(corners),
            roof_hole: Ring::from_points([r0, r3, r2, r1]),
        })
    }
}

/// Corners of a local rectangle on a roof plane, counter-clockwise seen from
/// above the roof.
pub(crate) fn window_corners(slope: &RoofSlope, x: f64, y: f64, w: f64, h: f64) -> [Point3; 4] {
    [
        slope.point(x, y),
        slope.point(x + w, y),
        slope.point(x + w, y + h),
        slope.point(x, y + h),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::spec::{RoofSpec, Side};
    use approx::assert_relative_eq;

    #[test]
    fn pane_lies_in_the_roof_plane() {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::hipped(3.0, 2.0)).execute().unwrap();
        let slope = RoofSlope::new(&body, &shape, Side::South).unwrap();
        let feature = RoofFeature::new(Side::South, 2.0, 0.5, 1.0, 1.0);
        let window = PlaceRoofWindow::new(&slope, &feature).execute().unwrap();
        let n = window.pane.normal().unwrap();
        // south hip face: rise 3 over run 2
        let expected = crate::math::Vector3::new(0.0, -3.0, 2.0).normalize();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
        assert_relative_eq!(window.roof_hole.normal().unwrap(), -expected, epsilon = 1e-12);
        assert_relative_eq!(window.corners()[2].z, 5.0 + 1.5 * 1.5, epsilon = 1e-12);
    }
}
