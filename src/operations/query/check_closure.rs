use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Facet, ModelStore, Ring, SolidId};

/// Grid on which ring points are matched, in model units.
const SNAP: f64 = 1e-6;

type Key = (i64, i64, i64);

/// Edge statistics of a set of rings that should form a closed shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureReport {
    /// Distinct undirected edges.
    pub edges: usize,
    /// Edges used by a single ring.
    pub boundary_edges: usize,
    /// Edges used by more than two rings.
    pub non_manifold_edges: usize,
    /// Edges used twice in the same direction.
    pub misoriented_edges: usize,
}

impl ClosureReport {
    /// `true` if every edge is shared by exactly two rings running in
    /// opposite directions.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.edges > 0
            && self.boundary_edges == 0
            && self.non_manifold_edges == 0
            && self.misoriented_edges == 0
    }
}

/// Checks that a shell is closed and consistently oriented.
///
/// Every ring of every polygon counts, holes included: a hole edge must be
/// matched by the faces that line the hole.
pub struct CheckClosure {
    solid: SolidId,
}

impl CheckClosure {
    /// Creates a new `CheckClosure` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its surfaces is missing.
    pub fn execute(&self, store: &ModelStore) -> Result<ClosureReport> {
        let surfaces = store.shell_surfaces(self.solid)?;
        Ok(Self::rings(surfaces.iter().flat_map(|s| s.rings())))
    }

    /// Checks facets that are not stored yet.
    #[must_use]
    pub fn facets(facets: &[Facet]) -> ClosureReport {
        Self::rings(facets.iter().flat_map(Facet::rings))
    }

    /// Checks an arbitrary collection of rings.
    pub fn rings<'r>(rings: impl IntoIterator<Item = &'r Ring>) -> ClosureReport {
        // (a -> b count, b -> a count) keyed by the ordered pair (a < b)
        let mut uses: HashMap<(Key, Key), (u32, u32)> = HashMap::new();
        for ring in rings {
            for (from, to) in ring.edges() {
                let (a, b) = (snap(from), snap(to));
                if a == b {
                    continue;
                }
                if a < b {
                    uses.entry((a, b)).or_default().0 += 1;
                } else {
                    uses.entry((b, a)).or_default().1 += 1;
                }
            }
        }

        let mut report = ClosureReport {
            edges: uses.len(),
            ..ClosureReport::default()
        };
        for &(forward, backward) in uses.values() {
            match forward + backward {
                1 => report.boundary_edges += 1,
                2 if forward != backward => report.misoriented_edges += 1,
                2 => {}
                _ => report.non_manifold_edges += 1,
            }
        }
        report
    }
}

#[allow(clippy::cast_possible_truncation)]
fn snap(p: &crate::math::Point3) -> Key {
    (
        (p.x / SNAP).round() as i64,
        (p.y / SNAP).round() as i64,
        (p.z / SNAP).round() as i64,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::model::SemanticSurface;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tetra() -> Vec<Facet> {
        let a = p(0.0, 0.0, 0.0);
        let b = p(1.0, 0.0, 0.0);
        let c = p(0.0, 1.0, 0.0);
        let d = p(0.0, 0.0, 1.0);
        [[a, c, b], [a, b, d], [b, c, d], [c, a, d]]
            .into_iter()
            .map(|t| Facet::new(Ring::from_points(t), SemanticSurface::Wall))
            .collect()
    }

    #[test]
    fn tetrahedron_is_closed() {
        let report = CheckClosure::facets(&tetra());
        assert_eq!(report.edges, 6);
        assert!(report.is_closed());
    }

    #[test]
    fn missing_face_leaves_boundary() {
        let mut faces = tetra();
        faces.pop();
        let report = CheckClosure::facets(&faces);
        assert_eq!(report.boundary_edges, 3);
        assert!(!report.is_closed());
    }

    #[test]
    fn flipped_face_is_misoriented() {
        let mut faces = tetra();
        faces[0] = Facet::new(faces[0].exterior.reversed(), SemanticSurface::Ground);
        let report = CheckClosure::facets(&faces);
        assert_eq!(report.misoriented_edges, 3);
    }

    #[test]
    fn rounding_noise_is_tolerated() {
        let mut faces = tetra();
        faces[1].exterior.map_points(|q| q + crate::math::Vector3::new(1e-9, 0.0, 0.0));
        assert!(CheckClosure::facets(&faces).is_closed());
    }
}
