use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::spec::{PerSide, Side};

/// How the top elevation of a body is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightMode {
    /// Fixed height above the base.
    Fixed(f64),
    /// Eave height plus a fraction of the roof rise, above the base.
    Fraction { eave: f64, rise: f64, fraction: f64 },
    /// Absolute top elevation.
    Override(f64),
}

impl HeightMode {
    /// Top elevation for a body whose base is at `base_z`.
    #[must_use]
    pub fn top(self, base_z: f64) -> f64 {
        match self {
            HeightMode::Fixed(h) => base_z + h,
            HeightMode::Fraction {
                eave,
                rise,
                fraction,
            } => base_z + eave + fraction * rise,
            HeightMode::Override(z) => z,
        }
    }
}

/// The eight corners of an axis-aligned box.
///
/// `0..4` are the base corners SW, SE, NE, NW; `4..8` the same corners at
/// the top elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyCorners {
    corners: [Point3; 8],
}

impl BodyCorners {
    fn from_extents(min: Point3, max: Point3) -> Self {
        let at = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        Self {
            corners: [
                at(min.x, min.y, min.z),
                at(max.x, min.y, min.z),
                at(max.x, max.y, min.z),
                at(min.x, max.y, min.z),
                at(min.x, min.y, max.z),
                at(max.x, min.y, max.z),
                at(max.x, max.y, max.z),
                at(min.x, max.y, max.z),
            ],
        }
    }

    /// All eight corners.
    #[must_use]
    pub fn corners(&self) -> &[Point3; 8] {
        &self.corners
    }

    /// Corner `i` (`0..8`).
    #[must_use]
    pub fn corner(&self, i: usize) -> Point3 {
        self.corners[i % 8]
    }

    #[must_use]
    pub fn base_z(&self) -> f64 {
        self.corners[0].z
    }

    #[must_use]
    pub fn top_z(&self) -> f64 {
        self.corners[4].z
    }

    /// South-west base corner.
    #[must_use]
    pub fn min(&self) -> Point3 {
        self.corners[0]
    }

    /// North-east top corner.
    #[must_use]
    pub fn max(&self) -> Point3 {
        self.corners[6]
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.corners[1].x - self.corners[0].x
    }

    #[must_use]
    pub fn depth(&self) -> f64 {
        self.corners[3].y - self.corners[0].y
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.top_z() - self.base_z()
    }

    /// Base corners in SW, SE, NE, NW order.
    #[must_use]
    pub fn base_ring(&self) -> [Point3; 4] {
        [self.corners[0], self.corners[1], self.corners[2], self.corners[3]]
    }

    /// Top corners in SW, SE, NE, NW order.
    #[must_use]
    pub fn top_ring(&self) -> [Point3; 4] {
        [self.corners[4], self.corners[5], self.corners[6], self.corners[7]]
    }

    /// The four footprint corners at elevation `z`.
    #[must_use]
    pub fn ring_at(&self, z: f64) -> [Point3; 4] {
        self.base_ring().map(|p| Point3::new(p.x, p.y, z))
    }

    /// Base corners where `side` starts and ends.
    #[must_use]
    pub fn side_base(&self, side: Side) -> (Point3, Point3) {
        (self.corners[side.start_corner()], self.corners[side.end_corner()])
    }

    /// Top corners where `side` starts and ends.
    #[must_use]
    pub fn side_top(&self, side: Side) -> (Point3, Point3) {
        (
            self.corners[side.start_corner() + 4],
            self.corners[side.end_corner() + 4],
        )
    }

    /// Length of the edge on `side`.
    #[must_use]
    pub fn side_length(&self, side: Side) -> f64 {
        if side.runs_along_width() {
            self.width()
        } else {
            self.depth()
        }
    }

    /// The same footprint with the top moved to elevation `z`.
    #[must_use]
    pub fn with_top(&self, z: f64) -> Self {
        let mut max = self.max();
        max.z = z;
        Self::from_extents(self.min(), max)
    }

    /// The same footprint with the base moved to elevation `z`.
    #[must_use]
    pub fn with_base(&self, z: f64) -> Self {
        let mut min = self.min();
        min.z = z;
        Self::from_extents(min, self.max())
    }

    /// Footprint moved outward by a per-side distance; negative values inset.
    #[must_use]
    pub fn offset(&self, by: PerSide) -> Self {
        let mut min = self.min();
        let mut max = self.max();
        min.x -= by[Side::West];
        max.x += by[Side::East];
        min.y -= by[Side::South];
        max.y += by[Side::North];
        Self::from_extents(min, max)
    }
}

/// Computes the eight corners of a building body.
pub struct MakeBody {
    origin: Point3,
    width: f64,
    depth: f64,
    height: HeightMode,
}

impl MakeBody {
    /// Creates a new `MakeBody` operation.
    #[must_use]
    pub fn new(origin: Point3, width: f64, depth: f64, height: HeightMode) -> Self {
        Self {
            origin,
            width,
            depth,
            height,
        }
    }

    /// Creates a body over an existing footprint.
    #[must_use]
    pub fn over(footprint: &BodyCorners, height: HeightMode) -> Self {
        Self::new(footprint.min(), footprint.width(), footprint.depth(), height)
    }

    /// Executes the operation, returning the corners.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the footprint has no area or
    /// the top lies below the base.
    pub fn execute(&self) -> Result<BodyCorners> {
        if self.width < TOLERANCE || self.depth < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "body footprint {} x {} has no area",
                self.width, self.depth
            ))
            .into());
        }
        let top = self.height.top(self.origin.z);
        if top < self.origin.z - TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "body top {top} lies below its base {}",
                self.origin.z
            ))
            .into());
        }
        let max = Point3::new(self.origin.x + self.width, self.origin.y + self.depth, top);
        Ok(BodyCorners::from_extents(self.origin, max))
    }
}
