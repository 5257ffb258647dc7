use crate::error::Result;
use crate::math::{Point3, TOLERANCE};
use crate::model::{Facet, Ring, SemanticSurface};
use crate::operations::creation::BodyCorners;
use crate::spec::RoofFeature;

use super::place_roof_window::window_corners;
use super::{Dormer, PlaceDormer, RoofSlope};

/// Kind of roof feature seen from the attic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofFeatureKind {
    Dormer,
    RoofWindow,
    Chimney,
}

/// A roof feature as it bounds the attic room.
///
/// Faces are oriented away from the room, like the rest of the attic shell.
#[derive(Debug, Clone)]
pub enum InteriorFeature {
    /// The room extends into the dormer, inset by the roof thickness.
    Dormer(Dormer),
    /// The room reaches through the roof skin up to the pane.
    RoofWindow {
        ceiling_hole: Ring,
        reveals: Vec<Facet>,
        pane: Facet,
    },
    /// A chimney shaft crossing the room from floor to ceiling.
    Shaft {
        floor_hole: Ring,
        ceiling_hole: Ring,
        walls: Vec<Facet>,
    },
}

/// Places a roof feature on the inner roof plane of the attic.
///
/// Local coordinates stay those of the outer roof. Features that do not lie
/// over the attic (for example in the knee-wall zone) are dropped.
pub struct PlaceInteriorFeature<'a> {
    kind: RoofFeatureKind,
    feature: &'a RoofFeature,
    outer: &'a RoofSlope,
    inner: &'a RoofSlope,
    thickness: f64,
}

impl<'a> PlaceInteriorFeature<'a> {
    /// Creates a new `PlaceInteriorFeature` operation.
    ///
    /// * `thickness` - Roof skin thickness by which dormers are inset.
    #[must_use]
    pub fn new(
        kind: RoofFeatureKind,
        feature: &'a RoofFeature,
        outer: &'a RoofSlope,
        inner: &'a RoofSlope,
        thickness: f64,
    ) -> Self {
        Self {
            kind,
            feature,
            outer,
            inner,
            thickness,
        }
    }

    /// Executes the placement against the attic floor outline.
    ///
    /// Returns `None` if the feature does not reach into the attic.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner plane cannot host a dormer.
    pub fn execute(&self, floor: &BodyCorners) -> Result<Option<InteriorFeature>> {
        match self.kind {
            RoofFeatureKind::Dormer => self.dormer(),
            RoofFeatureKind::RoofWindow => Ok(self.roof_window()),
            RoofFeatureKind::Chimney => Ok(self.shaft(floor)),
        }
    }

    fn dormer(&self) -> Result<Option<InteriorFeature>> {
        let f = self.feature;
        let t = self.thickness;
        let ratio = self.inner.ratio();
        if ratio < TOLERANCE {
            return Ok(None);
        }
        let x = f.origin.x + t;
        let y = f.origin.y + t;
        let width = f.width - 2.0 * t;
        let top = self.outer.elevation(f.origin.y) + f.height - t;
        let height = top - self.inner.elevation(y);
        if width < TOLERANCE || height < TOLERANCE {
            return Ok(None);
        }
        if !self.inner.contains(x, y, width, height / ratio) {
            return Ok(None);
        }
        let dormer = PlaceDormer::at(self.inner, x, y, width, height).execute()?;
        Ok(Some(InteriorFeature::Dormer(dormer)))
    }

    fn roof_window(&self) -> Option<InteriorFeature> {
        let f = self.feature;
        let (x, y, w, h) = (f.origin.x, f.origin.y, f.width, f.height);
        if !self.inner.contains(x, y, w, h) {
            return None;
        }
        let outer = window_corners(self.outer, x, y, w, h);
        let inner = window_corners(self.inner, x, y, w, h);
        let reveals = (0..4)
            .map(|i| {
                let j = (i + 1) % 4;
                Facet::new(
                    Ring::from_points([inner[i], inner[j], outer[j], outer[i]]),
                    SemanticSurface::Wall,
                )
            })
            .collect();
        Some(InteriorFeature::RoofWindow {
            ceiling_hole: Ring::from_points([inner[0], inner[3], inner[2], inner[1]]),
            reveals,
            pane: Facet::new(Ring::from_points(outer), SemanticSurface::Roof),
        })
    }

    fn shaft(&self, floor: &BodyCorners) -> Option<InteriorFeature> {
        let f = self.feature;
        let (x, y, w) = (f.origin.x, f.origin.y, f.width);
        if !self.inner.contains(x, y, w, w) {
            return None;
        }
        let ceiling = window_corners(self.inner, x, y, w, w);
        let floor_z = floor.base_z();
        let on_floor = ceiling.map(|p| Point3::new(p.x, p.y, floor_z));
        let (min, max) = (floor.min(), floor.max());
        let inside = on_floor
            .iter()
            .all(|p| p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y);
        if !inside || ceiling.iter().any(|p| p.z <= floor_z + TOLERANCE) {
            return None;
        }
        let walls = (0..4)
            .map(|i| {
                let j = (i + 1) % 4;
                Facet::new(
                    Ring::from_points([on_floor[j], on_floor[i], ceiling[i], ceiling[j]]),
                    SemanticSurface::Wall,
                )
            })
            .collect();
        Some(InteriorFeature::Shaft {
            floor_hole: Ring::from_points(on_floor),
            ceiling_hole: Ring::from_points([ceiling[0], ceiling[3], ceiling[2], ceiling[1]]),
            walls,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::operations::query::CheckClosure;
    use crate::spec::{PerSide, RoofSpec, Side};
    use approx::assert_relative_eq;

    /// Gabled roof of ratio 1 and a parallel inner plane one unit lower,
    /// built on an outline inset by 0.5.
    fn slopes() -> (RoofSlope, RoofSlope, BodyCorners) {
        let body = MakeBody::new(Point3::origin(), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &RoofSpec::gabled(3.0)).execute().unwrap();
        let outer = RoofSlope::new(&body, &shape, Side::East).unwrap();
        let offsets = PerSide::uniform(-0.5);
        let inner_body = body.offset(offsets).with_top(4.5);
        let inner_shape = MakeRoofShape::new(&inner_body, &RoofSpec::gabled(2.5))
            .execute()
            .unwrap();
        let inner = RoofSlope::with_offsets(&inner_body, &inner_shape, Side::East, offsets).unwrap();
        let floor = inner_body.with_top(4.0).with_base(3.0);
        (outer, inner, floor)
    }

    #[test]
    fn dormer_is_inset_and_reseated() {
        let (outer, inner, floor) = slopes();
        let feature = RoofFeature::new(Side::East, 2.0, 1.0, 1.5, 1.0);
        let placed = PlaceInteriorFeature::new(RoofFeatureKind::Dormer, &feature, &outer, &inner, 0.2)
            .execute(&floor)
            .unwrap()
            .unwrap();
        let InteriorFeature::Dormer(dormer) = placed else {
            panic!("expected a dormer");
        };
        let [bl, br, _, tl, _, _] = dormer.vertices;
        assert_relative_eq!(br.y - bl.y, 1.1, epsilon = 1e-12);
        // outer top at 5 + 1 + 1, lowered by the thickness
        assert_relative_eq!(tl.z, 6.8, epsilon = 1e-12);
        assert_relative_eq!(bl.z, inner.elevation(1.2), epsilon = 1e-12);
    }

    #[test]
    fn roof_window_reveals_close_the_opening() {
        let (outer, inner, floor) = slopes();
        let feature = RoofFeature::new(Side::East, 2.0, 1.0, 1.0, 1.0);
        let placed =
            PlaceInteriorFeature::new(RoofFeatureKind::RoofWindow, &feature, &outer, &inner, 0.2)
                .execute(&floor)
                .unwrap()
                .unwrap();
        let InteriorFeature::RoofWindow {
            ceiling_hole,
            reveals,
            pane,
        } = placed
        else {
            panic!("expected a roof window");
        };
        let mut shell = reveals;
        shell.push(pane);
        shell.push(Facet::new(ceiling_hole, SemanticSurface::Roof));
        assert!(CheckClosure::facets(&shell).is_closed());
    }

    #[test]
    fn chimney_shaft_spans_floor_to_ceiling() {
        let (outer, inner, floor) = slopes();
        let feature = RoofFeature::new(Side::East, 4.0, 2.0, 0.4, 1.0);
        let placed =
            PlaceInteriorFeature::new(RoofFeatureKind::Chimney, &feature, &outer, &inner, 0.2)
                .execute(&floor)
                .unwrap()
                .unwrap();
        let InteriorFeature::Shaft {
            floor_hole,
            ceiling_hole,
            walls,
        } = placed
        else {
            panic!("expected a shaft");
        };
        assert!(floor_hole.normal().unwrap().z > 0.0);
        assert!(ceiling_hole.normal().unwrap().z < 0.0);
        let mut shell = walls;
        shell.push(Facet::new(floor_hole, SemanticSurface::Ground));
        shell.push(Facet::new(ceiling_hole, SemanticSurface::Roof));
        assert!(CheckClosure::facets(&shell).is_closed());
    }

    #[test]
    fn feature_in_knee_zone_is_dropped() {
        let (outer, inner, floor) = slopes();
        let feature = RoofFeature::new(Side::East, 2.0, 0.1, 0.3, 0.3);
        let placed =
            PlaceInteriorFeature::new(RoofFeatureKind::RoofWindow, &feature, &outer, &inner, 0.2)
                .execute(&floor)
                .unwrap();
        assert!(placed.is_none());
    }
}
