use crate::error::Result;
use crate::math::{Point3, TOLERANCE};
use crate::model::{Facet, Ring, SemanticSurface};
use crate::spec::RoofFeature;

use super::RoofSlope;

/// A dormer standing on a roof plane.
#[derive(Debug, Clone)]
pub struct Dormer {
    /// Front bottom left/right, front top right/left, back left/right
    /// (where the top meets the roof).
    pub vertices: [Point3; 6],
    /// Vertical front, facing down the slope.
    pub front: Facet,
    /// Triangular cheeks, right then left.
    pub cheeks: [Facet; 2],
    /// Horizontal top.
    pub top: Facet,
    /// Cut-out to subtract from the host roof surface.
    pub roof_hole: Ring,
}

impl Dormer {
    /// Every face of the dormer.
    #[must_use]
    pub fn faces(&self) -> Vec<Facet> {
        let [right, left] = self.cheeks.clone();
        vec![self.front.clone(), right, left, self.top.clone()]
    }
}

/// Places a dormer on a roof plane.
///
/// The dormer front is vertical, `width` wide and `height` high; its flat
/// top runs back until it meets the roof, `height / ratio` behind the front
/// in plan.
pub struct PlaceDormer<'a> {
    slope: &'a RoofSlope,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl<'a> PlaceDormer<'a> {
    /// Creates a new `PlaceDormer` operation for a dormer record.
    #[must_use]
    pub fn new(slope: &'a RoofSlope, dormer: &RoofFeature) -> Self {
        Self::at(slope, dormer.origin.x, dormer.origin.y, dormer.width, dormer.height)
    }

    /// Creates a new `PlaceDormer` operation from explicit local coordinates.
    #[must_use]
    pub fn at(slope: &'a RoofSlope, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            slope,
            x,
            y,
            width,
            height,
        }
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NoRoofSlope`](crate::error::SpecError::NoRoofSlope)
    /// if the plane is horizontal.
    pub fn execute(&self) -> Result<Dormer> {
        let ratio = self.slope.ratio();
        if ratio < TOLERANCE {
            return Err(self.slope.no_slope().into());
        }
        let s = self.slope;
        let back = self.y + self.height / ratio;
        let up = |p: Point3| Point3::new(p.x, p.y, p.z + self.height);

        let bl = s.point(self.x, self.y);
        let br = s.point(self.x + self.width, self.y);
        let tr = up(br);
        let tl = up(bl);
        let kl = s.point(self.x, back);
        let kr = s.point(self.x + self.width, back);

        let wall = |points: [Point3; 4]| Facet::new(Ring::from_points(points), SemanticSurface::Wall);
        let cheek = |points: [Point3; 3]| Facet::new(Ring::from_points(points), SemanticSurface::Wall);

        Ok(Dormer {
            vertices: [bl, br, tr, tl, kl, kr],
            front: wall([bl, br, tr, tl]),
            cheeks: [cheek([br, kr, tr]), cheek([bl, tl, kl])],
            top: Facet::new(Ring::from_points([tl, tr, kr, kl]), SemanticSurface::Roof),
            roof_hole: Ring::from_points([bl, kl, kr, br]),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::spec::{RoofSpec, Side};
    use approx::assert_relative_eq;

    fn slope(side: Side) -> RoofSlope {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::gabled(3.0)).execute().unwrap();
        RoofSlope::new(&body, &shape, side).unwrap()
    }

    #[test]
    fn dormer_top_meets_the_roof() {
        let s = slope(Side::East);
        let feature = RoofFeature::new(Side::East, 2.0, 0.5, 1.5, 1.2);
        let dormer = PlaceDormer::new(&s, &feature).execute().unwrap();
        let [bl, br, tr, tl, kl, kr] = dormer.vertices;
        assert_relative_eq!(bl, Point3::new(5.5, 2.0, 5.5), epsilon = 1e-12);
        assert_relative_eq!(br.y - bl.y, 1.5, epsilon = 1e-12);
        assert_relative_eq!(tl.z, kl.z, epsilon = 1e-12);
        assert_relative_eq!(tr.z, kr.z, epsilon = 1e-12);
        // ratio 1, so the back is 1.2 behind the front in plan
        assert_relative_eq!(bl.x - kl.x, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn faces_point_outward() {
        let s = slope(Side::West);
        let dormer = PlaceDormer::at(&s, 1.0, 0.5, 1.0, 1.0).execute().unwrap();
        let front = dormer.front.exterior.normal().unwrap();
        assert_relative_eq!(front, Side::West.outward(), epsilon = 1e-12);
        let top = dormer.top.exterior.normal().unwrap();
        assert_relative_eq!(top.z, 1.0, epsilon = 1e-12);
        let right = dormer.cheeks[0].exterior.normal().unwrap();
        assert_relative_eq!(right, Side::West.along(), epsilon = 1e-12);
        // the hole runs against the roof plane's circulation
        let plane_normal = dormer.roof_hole.normal().unwrap();
        assert!(plane_normal.z < 0.0);
    }

    #[test]
    fn horizontal_plane_cannot_host_a_dormer() {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::flat()).execute().unwrap();
        let s = RoofSlope::new(&body, &shape, Side::South).unwrap();
        assert!(PlaceDormer::at(&s, 1.0, 1.0, 1.0, 1.0).execute().is_err());
    }
}
