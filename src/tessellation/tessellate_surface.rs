use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, TessellationError};
use crate::math::polygon_3d::PlaneFrame;
use crate::math::Point3;
use crate::model::{Ring, SurfaceData};

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Tessellates a planar polygon with holes into a triangle mesh.
///
/// Triangles are wound like the exterior ring, so their normals agree with
/// the polygon's.
pub struct TessellateSurface<'a> {
    exterior: &'a Ring,
    holes: &'a [Ring],
}

impl<'a> TessellateSurface<'a> {
    /// Creates a new `TessellateSurface` operation for a stored surface.
    #[must_use]
    pub fn new(surface: &'a SurfaceData) -> Self {
        Self::rings(&surface.exterior, &surface.holes)
    }

    /// Creates a new `TessellateSurface` operation from loose rings.
    #[must_use]
    pub fn rings(exterior: &'a Ring, holes: &'a [Ring]) -> Self {
        Self { exterior, holes }
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns an error if the exterior ring is degenerate or the rings
    /// cross each other.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let normal = self.exterior.normal()?;
        let origin = self.exterior.points()[0];
        let frame = PlaneFrame::from_normal(origin, normal)?;

        let mut cdt = Cdt::new();
        let mut lifted: HashMap<usize, Point3> = HashMap::new();
        insert_constraint_loop(&mut cdt, &frame, self.exterior, &mut lifted)?;
        for hole in self.holes {
            insert_constraint_loop(&mut cdt, &frame, hole, &mut lifted)?;
        }

        let interior = classify_interior_faces(&cdt);

        let mut mesh = TriangleMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (slot, vh) in face.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                tri[slot] = *vertex_map.entry(idx).or_insert_with(|| {
                    let pos = vh.position();
                    let p = lifted
                        .get(&idx)
                        .copied()
                        .unwrap_or_else(|| frame.lift(pos.x, pos.y));
                    mesh.vertices.push(p);
                    mesh.normals.push(normal);
                    (mesh.vertices.len() - 1) as u32
                });
            }
            mesh.indices.push(tri);
        }

        Ok(mesh)
    }
}

/// Inserts a ring's points and edges as constraints.
fn insert_constraint_loop(
    cdt: &mut Cdt,
    frame: &PlaneFrame,
    ring: &Ring,
    lifted: &mut HashMap<usize, Point3>,
) -> Result<()> {
    if ring.len() < 3 {
        return Err(
            TessellationError::Failed("constraint loop needs at least 3 points".into()).into(),
        );
    }

    let mut handles = Vec::with_capacity(ring.len());
    for p in ring.points() {
        let (u, v) = frame.project(p);
        let h = cdt
            .insert(SpadePoint2::new(u, v))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        lifted.entry(h.index()).or_insert(*p);
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed("polygon rings intersect".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Classifies which inner faces of the CDT are inside the polygon using
/// flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each
/// time a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                depth + 1
            } else {
                depth
            };
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}
