use crate::math::Point3;
use crate::model::ModelStore;

/// Rotates every stored polygon about a vertical axis.
///
/// Only `x` and `y` change; elevations are kept.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    origin: Point3,
    sin: f64,
    cos: f64,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `origin` - Point the vertical axis passes through.
    /// * `degrees` - Counter-clockwise angle seen from above.
    #[must_use]
    pub fn new(origin: Point3, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { origin, sin, cos }
    }

    /// Rotates a single point.
    #[must_use]
    pub fn point(&self, p: &Point3) -> Point3 {
        let dx = p.x - self.origin.x;
        let dy = p.y - self.origin.y;
        Point3::new(
            self.origin.x + dx * self.cos - dy * self.sin,
            self.origin.y + dx * self.sin + dy * self.cos,
            p.z,
        )
    }

    /// Executes the rotation over every surface of the store in place,
    /// opening rings included. Solids share their surfaces and need no
    /// separate pass.
    pub fn execute(&self, store: &mut ModelStore) {
        for (_, surface) in store.surfaces_mut() {
            for ring in surface.rings_mut() {
                ring.map_points(|p| self.point(p));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Ring, SurfaceData};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn quarter_turn_about_the_origin() {
        let rotate = Rotate::new(p(1.0, 1.0, 0.0), 90.0);
        assert_relative_eq!(rotate.point(&p(2.0, 1.0, 5.0)), p(1.0, 2.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(rotate.point(&p(1.0, 1.0, 3.0)), p(1.0, 1.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn store_rings_turn_and_keep_their_elevation() {
        let mut store = ModelStore::new();
        let id = store.add_surface(SurfaceData {
            gml_id: "poly_0".into(),
            exterior: Ring::from_points([p(0.0, 0.0, 2.0), p(1.0, 0.0, 2.0), p(1.0, 1.0, 3.0)]),
            holes: Vec::new(),
            semantic: None,
            openings: Vec::new(),
        });
        Rotate::new(Point3::origin(), 180.0).execute(&mut store);
        let ring = &store.surface(id).unwrap().exterior;
        assert_relative_eq!(ring.points()[1], p(-1.0, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(ring.points()[2], p(-1.0, -1.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn opposite_angles_cancel() {
        let origin = p(3.0, -2.0, 0.0);
        let q = p(7.5, 4.25, 1.0);
        let back = Rotate::new(origin, -37.0).point(&Rotate::new(origin, 37.0).point(&q));
        assert_relative_eq!(back, q, epsilon = 1e-12);
    }
}
