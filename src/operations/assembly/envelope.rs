use crate::error::SpecError;
use crate::math::{Point3, TOLERANCE};
use crate::model::{Facet, Opening, Ring, SemanticSurface};
use crate::operations::creation::{BodyCorners, RoofShape};
use crate::operations::roof::RoofSlope;
use crate::spec::{PerSide, Side};

/// A cut into the bottom edge of a wall, such as a door at floor level or
/// the junction with an attached building part.
#[derive(Debug, Clone)]
pub struct Notch {
    /// Distance of the cut's first point from the wall's start corner.
    pub distance: f64,
    /// Points spliced into the wall's bottom edge, in wall order.
    pub wall: Vec<Point3>,
    /// Points spliced into the ground's edge under the wall, in ground
    /// order (from the wall's end toward its start).
    pub ground: Vec<Point3>,
}

/// An outer wall under construction.
#[derive(Debug, Clone)]
pub struct Wall {
    pub side: Side,
    /// `[bottom start, bottom end, top end, .., top start]`.
    outline: Vec<Point3>,
    pub notches: Vec<Notch>,
    pub holes: Vec<Ring>,
    pub openings: Vec<Opening>,
}

impl Wall {
    /// Creates a wall from its outline, bottom edge first.
    #[must_use]
    pub fn new(side: Side, outline: Vec<Point3>) -> Self {
        Self {
            side,
            outline,
            notches: Vec::new(),
            holes: Vec::new(),
            openings: Vec::new(),
        }
    }

    /// Creates a rectangular wall on `side` of a box.
    #[must_use]
    pub fn of_box(body: &BodyCorners, side: Side) -> Self {
        let (b0, b1) = body.side_base(side);
        let (t0, t1) = body.side_top(side);
        Self::new(side, vec![b0, b1, t1, t0])
    }

    /// Points of the outline, without notches.
    #[must_use]
    pub fn outline(&self) -> &[Point3] {
        &self.outline
    }

    /// Highest elevation of the wall.
    #[must_use]
    pub fn top_z(&self) -> f64 {
        self.outline
            .iter()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The wall as a polygon, notches spliced into its bottom edge.
    #[must_use]
    pub fn facet(&self) -> Facet {
        let mut notches: Vec<&Notch> = self.notches.iter().collect();
        notches.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let mut points = Vec::with_capacity(self.outline.len() + 4 * notches.len());
        points.extend(self.outline.first().copied());
        for notch in notches {
            points.extend_from_slice(&notch.wall);
        }
        points.extend(self.outline.iter().skip(1).copied());

        Facet {
            exterior: Ring::new(points),
            holes: self.holes.clone(),
            semantic: SemanticSurface::Wall,
            openings: self.openings.clone(),
        }
    }
}

/// A roof surface and the side whose eave it rests on.
#[derive(Debug, Clone)]
pub struct RoofFacet {
    /// `None` for a flat roof, which hosts features from every side.
    pub side: Option<Side>,
    pub facet: Facet,
}

impl RoofFacet {
    /// `true` if features given for `side` belong on this surface.
    #[must_use]
    pub fn hosts(&self, side: Side) -> bool {
        self.side.is_none_or(|s| s == side)
    }
}

/// The outline and roof shape that roof planes are built on.
#[derive(Debug, Clone)]
pub struct RoofFrame {
    pub outline: BodyCorners,
    pub shape: RoofShape,
    /// Distance of the outline outside the walls, per side.
    pub offsets: PerSide,
}

impl RoofFrame {
    /// Frame of the roof plane over `side`, in wall-anchored coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NoRoofSlope`] if no roof plane rises from `side`.
    pub fn slope(&self, side: Side) -> Result<RoofSlope, SpecError> {
        RoofSlope::with_offsets(&self.outline, &self.shape, side, self.offsets)
    }
}

/// The boundary of one building volume under construction.
///
/// Surfaces stay editable until the envelope is emitted: features cut holes
/// into walls and roofs and add their own faces to `extras`.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Footprint box; its base ring is the ground.
    pub body: BodyCorners,
    /// Walls in [`Side::ALL`] order.
    pub walls: Vec<Wall>,
    pub roof: Vec<RoofFacet>,
    /// Faces of features, reveals and the overhang.
    pub extras: Vec<Facet>,
    /// Surface sealing the body under an overhang; not part of the shell.
    pub closure: Option<Facet>,
    /// Holes cut into the ground, such as chimney shafts through a floor.
    pub ground_holes: Vec<Ring>,
    /// Closed volumes standing apart from the main one.
    pub detached: Vec<Vec<Facet>>,
    /// Set when the roof is modelled, for placing roof features.
    pub roof_frame: Option<RoofFrame>,
    /// `true` if the walls stand on the building's wall lines.
    pub body_walls: bool,
}

impl Envelope {
    /// The wall on `side`, if any.
    #[must_use]
    pub fn wall(&self, side: Side) -> Option<&Wall> {
        self.walls.iter().find(|w| w.side == side)
    }

    /// The wall on `side`, mutably.
    pub fn wall_mut(&mut self, side: Side) -> Option<&mut Wall> {
        self.walls.iter_mut().find(|w| w.side == side)
    }

    /// First roof surface hosting features given for `side`.
    pub fn roof_for_mut(&mut self, side: Side) -> Option<&mut RoofFacet> {
        self.roof.iter_mut().find(|r| r.hosts(side))
    }

    /// The ground polygon, facing down, with the walls' cuts spliced in.
    #[must_use]
    pub fn ground(&self) -> Facet {
        let base = self.body.base_ring();
        let mut points = Vec::with_capacity(4);
        for side in [Side::West, Side::North, Side::East, Side::South] {
            points.push(base[side.end_corner()]);
            if let Some(wall) = self.wall(side) {
                let mut notches: Vec<&Notch> = wall.notches.iter().collect();
                notches.sort_by(|a, b| b.distance.total_cmp(&a.distance));
                for notch in notches {
                    points.extend_from_slice(&notch.ground);
                }
            }
        }
        Facet {
            exterior: Ring::new(points),
            holes: self.ground_holes.clone(),
            semantic: SemanticSurface::Ground,
            openings: Vec::new(),
        }
    }

    /// Every face of the main shell: ground, walls, roof, then extras.
    #[must_use]
    pub fn shell(&self) -> Vec<Facet> {
        let mut out = Vec::with_capacity(1 + self.walls.len() + self.roof.len() + self.extras.len());
        out.push(self.ground());
        out.extend(self.walls.iter().map(Wall::facet));
        out.extend(self.roof.iter().map(|r| r.facet.clone()));
        out.extend(self.extras.iter().cloned());
        out.retain(|f| !f.exterior.is_degenerate());
        weld_edges(&mut out);
        out
    }

    /// Highest point of the main shell.
    #[must_use]
    pub fn top_z(&self) -> f64 {
        self.shell()
            .iter()
            .flat_map(|f| f.exterior.points().iter().map(|p| p.z))
            .fold(self.body.base_z(), f64::max)
    }
}

/// Distance below which a vertex counts as lying on an edge.
const WELD: f64 = 1e-7;

/// Inserts every vertex of the shell that lies inside an edge into that
/// edge, so that neighbouring faces share their edges vertex for vertex.
pub(crate) fn weld_edges(facets: &mut [Facet]) {
    let vertices: Vec<Point3> = facets
        .iter()
        .flat_map(|f| f.rings().flat_map(|r| r.points().iter().copied()))
        .collect();
    for facet in facets.iter_mut() {
        facet.exterior = split_edges(&facet.exterior, &vertices);
        for hole in &mut facet.holes {
            *hole = split_edges(hole, &vertices);
        }
    }
}

fn split_edges(ring: &Ring, vertices: &[Point3]) -> Ring {
    let mut points = Vec::with_capacity(ring.len());
    for (a, b) in ring.edges() {
        points.push(*a);
        let ab = b - a;
        let len = ab.norm();
        if len < 2.0 * WELD {
            continue;
        }
        let dir = ab / len;
        let mut inside: Vec<(f64, Point3)> = vertices
            .iter()
            .filter_map(|v| {
                let s = (v - a).dot(&dir);
                if s <= WELD || s >= len - WELD {
                    return None;
                }
                let off = (v - a) - dir * s;
                (off.norm() < WELD).then_some((s, *v))
            })
            .collect();
        inside.sort_by(|x, y| x.0.total_cmp(&y.0));
        points.extend(inside.into_iter().map(|(_, v)| v));
    }
    Ring::new(points)
}

/// `true` if `a` and `b` differ by less than the global tolerance.
pub(crate) fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{HeightMode, MakeBody};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn notches_are_spliced_in_order() {
        let body = MakeBody::new(p(0.0, 0.0, 0.0), 6.0, 4.0, HeightMode::Fixed(3.0))
            .execute()
            .unwrap();
        let mut wall = Wall::of_box(&body, Side::South);
        for x in [4.0, 1.0] {
            wall.notches.push(Notch {
                distance: x,
                wall: vec![p(x, 0.0, 0.0), p(x, 0.0, 2.0), p(x + 1.0, 0.0, 2.0), p(x + 1.0, 0.0, 0.0)],
                ground: vec![p(x + 1.0, 0.0, 0.0), p(x, 0.0, 0.0)],
            });
        }
        let facet = wall.facet();
        let pts = facet.exterior.points();
        assert_eq!(pts.len(), 12);
        assert_relative_eq!(pts[1], p(1.0, 0.0, 0.0));
        assert_relative_eq!(pts[5], p(4.0, 0.0, 0.0));
        assert_relative_eq!(facet.exterior.area(), 18.0 - 4.0, epsilon = 1e-9);
        assert_relative_eq!(wall.top_z(), 3.0);
    }

    #[test]
    fn vertices_on_an_edge_are_welded_in() {
        let big = Facet::new(
            Ring::from_points([p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 1.0, 0.0)]),
            SemanticSurface::Roof,
        );
        let small = Facet::new(
            Ring::from_points([p(3.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, -1.0, 0.0)]),
            SemanticSurface::Roof,
        );
        let mut facets = vec![big, small];
        weld_edges(&mut facets);
        let pts = facets[0].exterior.points();
        assert_eq!(pts.len(), 5);
        assert_relative_eq!(pts[1], p(1.0, 0.0, 0.0));
        assert_relative_eq!(pts[2], p(3.0, 0.0, 0.0));
        assert_eq!(facets[1].exterior.len(), 3);
    }
}
