use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::model::{Facet, Opening, Ring, SemanticSurface};
use crate::operations::creation::BodyCorners;
use crate::spec::{OpeningKind, Side, WallOpening};

/// A door or window cut into a wall, with its optional reveal.
#[derive(Debug, Clone)]
pub struct OpeningGeometry {
    pub kind: OpeningKind,
    pub side: Side,
    /// Opening in the wall plane: bottom left, bottom right, top right, top
    /// left seen from outside.
    pub outer: [Point3; 4],
    /// Opening moved inward by the embrasure depth, if any.
    pub inner: Option<[Point3; 4]>,
    /// Reveal faces between the outer and inner rings: sill, right jamb,
    /// head, left jamb.
    pub reveals: Vec<Facet>,
}

impl OpeningGeometry {
    /// Hole ring to subtract from the host wall.
    #[must_use]
    pub fn wall_hole(&self) -> Ring {
        let [o0, o1, o2, o3] = self.outer;
        Ring::from_points([o0, o3, o2, o1])
    }

    /// Points to splice into the wall's bottom edge when the opening starts
    /// at the base, in wall circulation order.
    #[must_use]
    pub fn notch(&self) -> Vec<Point3> {
        let [o0, o1, o2, o3] = self.outer;
        vec![o0, o3, o2, o1]
    }

    /// `true` if the opening's sill lies on the wall's bottom edge.
    #[must_use]
    pub fn touches_base(&self, base_z: f64) -> bool {
        (self.outer[0].z - base_z).abs() < TOLERANCE
    }

    /// The door or window pane: the inner ring when there is a reveal.
    #[must_use]
    pub fn pane(&self) -> Opening {
        Opening {
            kind: self.kind,
            ring: Ring::from_points(self.inner.unwrap_or(self.outer)),
        }
    }

    /// The pane as a shell face closing the reveal.
    #[must_use]
    pub fn pane_facet(&self) -> Facet {
        Facet::new(self.pane().ring, SemanticSurface::Wall)
    }
}

/// Computes the ring of a door or window on a wall, and the reveal faces
/// when it sits in an embrasure.
pub struct MakeOpening<'a> {
    body: &'a BodyCorners,
    opening: &'a WallOpening,
    kind: OpeningKind,
    embrasure: f64,
}

impl<'a> MakeOpening<'a> {
    /// Creates a new `MakeOpening` operation.
    ///
    /// * `embrasure` - Depth of the reveal; `0` for an opening flush with
    ///   the wall.
    #[must_use]
    pub fn new(
        body: &'a BodyCorners,
        opening: &'a WallOpening,
        kind: OpeningKind,
        embrasure: f64,
    ) -> Self {
        Self {
            body,
            opening,
            kind,
            embrasure,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a non-positive opening size.
    pub fn execute(&self) -> Result<OpeningGeometry> {
        let o = self.opening;
        if o.width <= 0.0 || o.height <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "opening of size {} x {} on {} wall",
                o.width, o.height, o.side
            ))
            .into());
        }
        let (start, _) = self.body.side_base(o.side);
        let along = o.side.along();
        let up = Vector3::z();
        let o0 = start + along * o.origin.x + up * o.origin.y;
        let outer = [
            o0,
            o0 + along * o.width,
            o0 + along * o.width + up * o.height,
            o0 + up * o.height,
        ];

        let (inner, reveals) = if self.embrasure > TOLERANCE {
            let recess = o.side.inward() * self.embrasure;
            let inner = outer.map(|p| p + recess);
            let reveals = (0..4)
                .map(|i| {
                    let j = (i + 1) % 4;
                    Facet::new(
                        Ring::from_points([outer[i], outer[j], inner[j], inner[i]]),
                        SemanticSurface::Wall,
                    )
                })
                .collect();
            (Some(inner), reveals)
        } else {
            (None, Vec::new())
        };

        Ok(OpeningGeometry {
            kind: self.kind,
            side: o.side,
            outer,
            inner,
            reveals,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody};
    use crate::operations::query::CheckClosure;
    use approx::assert_relative_eq;

    fn body() -> BodyCorners {
        MakeBody::new(Point3::new(10.0, 20.0, 0.0), 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap()
    }

    #[test]
    fn window_ring_faces_outward_on_every_wall() {
        let body = body();
        for side in Side::ALL {
            let window = WallOpening::new(side, 1.0, 1.0, 1.5, 1.2);
            let geom = MakeOpening::new(&body, &window, OpeningKind::Window, 0.0)
                .execute()
                .unwrap();
            let n = geom.pane().ring.normal().unwrap();
            assert_relative_eq!(n, side.outward(), epsilon = 1e-12);
            assert!(geom.reveals.is_empty());
            assert!(geom.inner.is_none());
        }
    }

    #[test]
    fn north_wall_runs_from_east_to_west() {
        let window = WallOpening::new(Side::North, 1.0, 2.0, 1.5, 1.2);
        let body = body();
        let geom = MakeOpening::new(&body, &window, OpeningKind::Window, 0.0)
            .execute()
            .unwrap();
        assert_relative_eq!(geom.outer[0], Point3::new(15.0, 28.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(geom.outer[1], Point3::new(13.5, 28.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn embrasure_reveals_and_pane_close_the_hole() {
        let body = body();
        let door = WallOpening::new(Side::South, 2.0, 0.0, 1.0, 2.1);
        let geom = MakeOpening::new(&body, &door, OpeningKind::Door, 0.25)
            .execute()
            .unwrap();
        assert!(geom.touches_base(0.0));
        assert_eq!(geom.reveals.len(), 4);
        let inner = geom.inner.unwrap();
        assert_relative_eq!(inner[0].y - geom.outer[0].y, 0.25, epsilon = 1e-12);
        // sill faces up, head faces down
        assert!(geom.reveals[0].exterior.normal().unwrap().z > 0.999);
        assert!(geom.reveals[2].exterior.normal().unwrap().z < -0.999);

        let mut shell = geom.reveals.clone();
        shell.push(geom.pane_facet());
        shell.push(Facet::new(geom.wall_hole(), SemanticSurface::Wall));
        assert!(CheckClosure::facets(&shell).is_closed());
    }
}
