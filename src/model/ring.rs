use std::fmt::Write as _;

use crate::error::Result;
use crate::math::polygon_3d::{newell_normal, vector_area};
use crate::math::{coincident, Point3, Vector3, TOLERANCE};

/// A closed planar polygon loop.
///
/// Points are stored without the closing point; [`Ring::closed_points`] and
/// [`Ring::pos_list`] repeat the first point at the end. Consecutive
/// duplicates are removed on construction so that degenerate edges never
/// reach the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point3>,
}

impl Ring {
    /// Creates a ring from an open or closed point sequence.
    ///
    /// Repeated points and spikes (a point where the ring doubles back on
    /// itself) are removed.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        let mut points = dedupe(points);
        while let Some(i) = find_spike(&points) {
            points.remove(i);
            points = dedupe(points);
        }
        Self { points }
    }

    /// Creates a ring from a fixed-size point array.
    #[must_use]
    pub fn from_points<const N: usize>(points: [Point3; N]) -> Self {
        Self::new(points.to_vec())
    }

    /// Distinct points in circulation order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of distinct points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if the ring has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with the first point repeated at the end.
    #[must_use]
    pub fn closed_points(&self) -> Vec<Point3> {
        let mut pts = self.points.clone();
        if let Some(first) = self.points.first() {
            pts.push(*first);
        }
        pts
    }

    /// Directed edges `(from, to)` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point3, &Point3)> {
        let n = self.points.len();
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// The same loop traversed in the opposite direction, starting from the
    /// same point.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        if points.len() > 1 {
            points[1..].reverse();
        }
        Self { points }
    }

    /// Vector area; points along the ring normal, norm equals the area.
    #[must_use]
    pub fn vector_area(&self) -> Vector3 {
        vector_area(&self.points)
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.vector_area().norm()
    }

    /// Unit normal following the right-hand rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring encloses no area.
    pub fn normal(&self) -> Result<Vector3> {
        newell_normal(&self.points)
    }

    /// `true` if the ring cannot bound a polygon.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || self.area() < TOLERANCE
    }

    /// Applies `f` to every point in place.
    pub fn map_points(&mut self, mut f: impl FnMut(&Point3) -> Point3) {
        for p in &mut self.points {
            *p = f(p);
        }
    }

    /// Space-separated `x y z` triples with the first point repeated, each
    /// coordinate printed with `decimals` fraction digits.
    #[must_use]
    pub fn pos_list(&self, decimals: usize) -> String {
        let mut out = String::new();
        for (i, p) in self.closed_points().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(
                out,
                "{:.prec$} {:.prec$} {:.prec$}",
                p.x,
                p.y,
                p.z,
                prec = decimals
            );
        }
        out
    }
}

/// Drops consecutive duplicates and a repeated closing point.
fn dedupe(points: Vec<Point3>) -> Vec<Point3> {
    let mut deduped: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if deduped.last().is_some_and(|last| coincident(last, &p)) {
            continue;
        }
        deduped.push(p);
    }
    while deduped.len() > 1
        && deduped
            .first()
            .zip(deduped.last())
            .is_some_and(|(a, b)| coincident(a, b))
    {
        deduped.pop();
    }
    deduped
}

/// Index of a point where the incoming and outgoing edges are antiparallel.
fn find_spike(points: &[Point3]) -> Option<usize> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    (0..n).find(|&i| {
        let a = points[i] - points[(i + n - 1) % n];
        let b = points[(i + 1) % n] - points[i];
        a.dot(&b) < 0.0 && a.cross(&b).norm() <= 1e-9 * a.norm() * b.norm()
    })
}
