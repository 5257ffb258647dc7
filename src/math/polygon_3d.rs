use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// Newell sum of an open polygon loop (no repeated closing point).
///
/// The result is twice the vector area: its direction is the polygon normal
/// following the right-hand rule, its length twice the enclosed area.
#[must_use]
fn newell_sum(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut sum = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        sum.x += (curr.y - next.y) * (curr.z + next.z);
        sum.y += (curr.z - next.z) * (curr.x + next.x);
        sum.z += (curr.x - next.x) * (curr.y + next.y);
    }
    sum
}

/// Vector area of a planar polygon loop.
///
/// Points the same way as the polygon normal; its norm is the area.
#[must_use]
pub fn vector_area(points: &[Point3]) -> Vector3 {
    newell_sum(points) * 0.5
}

/// Computes the unit normal of a polygon loop using Newell's method.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the polygon has no area.
pub fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let sum = newell_sum(points);
    let len = sum.norm();
    if len < TOLERANCE {
        return Err(
            GeometryError::Degenerate("polygon has no area: cannot compute normal".into()).into(),
        );
    }
    Ok(sum / len)
}

/// Orthonormal frame of a plane, used to flatten planar rings to 2D.
#[derive(Debug, Clone)]
pub struct PlaneFrame {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl PlaneFrame {
    /// Creates a frame from an origin and a normal vector.
    ///
    /// The U and V directions are chosen so that `u × v = normal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u_dir = reference.cross(&normal).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Projects a point onto the frame, returning `(u, v)`.
    #[must_use]
    pub fn project(&self, point: &Point3) -> (f64, f64) {
        let d = point - self.origin;
        (d.dot(&self.u_dir), d.dot(&self.v_dir))
    }

    /// Lifts frame coordinates back into 3D.
    #[must_use]
    pub fn lift(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.u_dir * u + self.v_dir * v
    }

    /// Returns the unit normal of the frame.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }
}
