use crate::error::SpecError;
use crate::math::{Point3, Vector3};
use crate::operations::creation::{BodyCorners, RoofShape};
use crate::spec::{PerSide, Side};

/// Local frame of one roof plane.
///
/// Local coordinates are `(X, Y)`: X along the eave from the side's start
/// corner, Y the plan distance from the wall line toward the ridge. Both are
/// anchored to the outer wall lines even when the plane is built on another
/// outline; `offsets` gives that outline's per-side distance from the walls
/// (positive outward).
#[derive(Debug, Clone)]
pub struct RoofSlope {
    side: Side,
    roof: &'static str,
    /// Start corner of the side on the frame outline, at the eave elevation.
    origin: Point3,
    along: Vector3,
    inward: Vector3,
    ratio: f64,
    along_shift: f64,
    inward_shift: f64,
    /// Extent of the frame outline along the eave and toward the ridge.
    length: f64,
    run: f64,
}

impl RoofSlope {
    /// Frame of the roof plane over `side`, anchored to the body walls.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NoRoofSlope`] if no roof plane rises from `side`.
    pub fn new(body: &BodyCorners, shape: &RoofShape, side: Side) -> Result<Self, SpecError> {
        Self::with_offsets(body, shape, side, PerSide::default())
    }

    /// Frame of the roof plane over `side` of a shape built on an outline
    /// that lies `offsets` outside the walls.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NoRoofSlope`] if no roof plane rises from `side`.
    pub fn with_offsets(
        body: &BodyCorners,
        shape: &RoofShape,
        side: Side,
        offsets: PerSide,
    ) -> Result<Self, SpecError> {
        let roof = shape.roof_type().name();
        let no_slope = || SpecError::NoRoofSlope {
            roof,
            side: side.name(),
        };
        let ratio = shape.slope_ratio(side).ok_or_else(no_slope)?;
        let run = shape.slope_run(side).ok_or_else(no_slope)?;
        let (start, _) = body.side_top(side);
        Ok(Self {
            side,
            roof,
            origin: Point3::new(start.x, start.y, shape.eave_z()),
            along: side.along(),
            inward: side.inward(),
            ratio,
            along_shift: offsets[side.preceding()],
            inward_shift: offsets[side],
            length: body.side_length(side),
            run,
        })
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Rise over run of the plane.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[must_use]
    pub fn along(&self) -> Vector3 {
        self.along
    }

    #[must_use]
    pub fn inward(&self) -> Vector3 {
        self.inward
    }

    /// Point of the plane at local `(x, y)`.
    #[must_use]
    pub fn point(&self, x: f64, y: f64) -> Point3 {
        let y = y + self.inward_shift;
        let mut p = self.origin + self.along * (x + self.along_shift) + self.inward * y;
        p.z += self.ratio * y;
        p
    }

    /// Elevation of the plane at plan distance `y` from the wall line.
    #[must_use]
    pub fn elevation(&self, y: f64) -> f64 {
        self.origin.z + self.ratio * (y + self.inward_shift)
    }

    /// Local X range covered by the frame outline.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (-self.along_shift, self.length - self.along_shift)
    }

    /// Local Y range from the frame's eave to the ridge.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (-self.inward_shift, self.run - self.inward_shift)
    }

    /// `true` if the local rectangle `[x, x + w] × [y, y + h]` lies on the
    /// frame's part of the plane.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        const SLACK: f64 = 1e-9;
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range();
        x >= x0 - SLACK && x + w <= x1 + SLACK && y >= y0 - SLACK && y + h <= y1 + SLACK
    }

    /// Error for a feature that needs a pitched plane on this side.
    #[must_use]
    pub fn no_slope(&self) -> SpecError {
        SpecError::NoRoofSlope {
            roof: self.roof,
            side: self.side.name(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::spec::RoofSpec;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn gabled() -> (BodyCorners, RoofShape) {
        let body = MakeBody::new(p(0.0, 0.0, 0.0), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::gabled(3.0)).execute().unwrap();
        (body, shape)
    }

    #[test]
    fn east_slope_points() {
        let (body, shape) = gabled();
        let slope = RoofSlope::new(&body, &shape, Side::East).unwrap();
        assert_relative_eq!(slope.point(0.0, 0.0), p(6.0, 0.0, 5.0));
        assert_relative_eq!(slope.point(2.0, 3.0), p(3.0, 2.0, 8.0));
    }

    #[test]
    fn west_slope_runs_north_to_south() {
        let (body, shape) = gabled();
        let slope = RoofSlope::new(&body, &shape, Side::West).unwrap();
        assert_relative_eq!(slope.point(0.0, 0.0), p(0.0, 8.0, 5.0));
        assert_relative_eq!(slope.point(1.0, 1.0), p(1.0, 7.0, 6.0));
    }

    #[test]
    fn gable_end_has_no_slope() {
        let (body, shape) = gabled();
        assert!(matches!(
            RoofSlope::new(&body, &shape, Side::North),
            Err(SpecError::NoRoofSlope { side: "north", .. })
        ));
    }

    #[test]
    fn inset_frame_keeps_wall_anchored_coordinates() {
        let (body, shape) = gabled();
        let outer = RoofSlope::new(&body, &shape, Side::East).unwrap();
        // plane lowered by 1 and built on an outline inset by 0.5
        let insets = PerSide::uniform(0.5);
        let inner_body = body.offset(insets.negated()).with_top(4.5);
        let inner_shape = MakeRoofShape::new(&inner_body, &RoofSpec::gabled(2.5))
            .execute()
            .unwrap();
        let inner =
            RoofSlope::with_offsets(&inner_body, &inner_shape, Side::East, insets.negated())
                .unwrap();
        let a = outer.point(2.0, 1.5);
        let b = inner.point(2.0, 1.5);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z - b.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(inner.y_range().0, 0.5);
    }
}
