use crate::error::{GeometryError, Result};
use crate::math::Point3;
use crate::model::{Facet, Ring, SemanticSurface};
use crate::spec::RoofFeature;

use super::RoofSlope;

/// A chimney standing on a roof plane.
#[derive(Debug, Clone)]
pub struct Chimney {
    /// Square base on the roof plane, counter-clockwise from above.
    pub base: [Point3; 4],
    /// Flat cap above the base.
    pub cap: [Point3; 4],
    /// Four sides followed by the cap.
    pub faces: Vec<Facet>,
    /// Cut-out to subtract from the host roof surface.
    pub roof_hole: Ring,
}

/// Places a square chimney on a roof plane.
///
/// The cap lies `height` above the highest base corner.
pub struct PlaceChimney<'a> {
    slope: &'a RoofSlope,
    chimney: &'a RoofFeature,
}

impl<'a> PlaceChimney<'a> {
    /// Creates a new `PlaceChimney` operation.
    #[must_use]
    pub fn new(slope: &'a RoofSlope, chimney: &'a RoofFeature) -> Self {
        Self { slope, chimney }
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a non-positive width or
    /// height.
    pub fn execute(&self) -> Result<Chimney> {
        let s = self.slope;
        let c = self.chimney;
        if c.width <= 0.0 || c.height <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "chimney of width {} and height {}",
                c.width, c.height
            ))
            .into());
        }
        let (x, y, w) = (c.origin.x, c.origin.y, c.width);
        let base = [
            s.point(x, y),
            s.point(x + w, y),
            s.point(x + w, y + w),
            s.point(x, y + w),
        ];
        let top_z = base.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max) + c.height;
        let cap = base.map(|p| Point3::new(p.x, p.y, top_z));

        let mut faces: Vec<Facet> = (0..4)
            .map(|i| {
                let j = (i + 1) % 4;
                Facet::new(
                    Ring::from_points([base[i], base[j], cap[j], cap[i]]),
                    SemanticSurface::Wall,
                )
            })
            .collect();
        faces.push(Facet::new(Ring::from_points(cap), SemanticSurface::Roof));

        Ok(Chimney {
            base,
            cap,
            faces,
            roof_hole: Ring::from_points([base[0], base[3], base[2], base[1]]),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::operations::query::CheckClosure;
    use crate::spec::{RoofSpec, Side};
    use approx::assert_relative_eq;

    #[test]
    fn cap_sits_above_highest_corner() {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::gabled(3.0)).execute().unwrap();
        let slope = RoofSlope::new(&body, &shape, Side::West).unwrap();
        let feature = RoofFeature::new(Side::West, 4.0, 2.6, 0.3, 1.0);
        let chimney = PlaceChimney::new(&slope, &feature).execute().unwrap();
        assert_relative_eq!(chimney.cap[0].z, 5.0 + 2.9 + 1.0, epsilon = 1e-12);
        assert_eq!(chimney.faces.len(), 5);
        assert!(chimney.faces[4].exterior.normal().unwrap().z > 0.999);
    }

    #[test]
    fn faces_and_hole_close_up() {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::hipped(3.0, 2.0)).execute().unwrap();
        let slope = RoofSlope::new(&body, &shape, Side::North).unwrap();
        let feature = RoofFeature::new(Side::North, 2.5, 0.5, 0.4, 0.8);
        let chimney = PlaceChimney::new(&slope, &feature).execute().unwrap();
        let hole = Facet::new(chimney.roof_hole.clone(), SemanticSurface::Roof);
        let mut shell = chimney.faces.clone();
        shell.push(hole);
        assert!(CheckClosure::facets(&shell).is_closed());
    }
}
