use crate::error::Result;
use crate::model::{ModelStore, SolidId};
use crate::tessellation::{TessellateSolid, TriangleMesh};

/// Computes the volume of a solid.
///
/// Uses tessellation and the signed tetrahedron method. For each triangle,
/// computes `(1/6) * v0 . (v1 x v2)` and sums over all triangles.
///
/// The mesh normals are used to correct for any winding inconsistencies
/// between surfaces, so a shell with a flipped surface still measures close
/// to its true volume.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be tessellated.
    pub fn execute(&self, store: &ModelStore) -> Result<f64> {
        let mesh = TessellateSolid::new(self.solid).execute(store)?;
        Ok(Self::of_mesh(&mesh))
    }

    /// Volume enclosed by a closed triangle mesh.
    #[must_use]
    pub fn of_mesh(mesh: &TriangleMesh) -> f64 {
        let mut signed_volume = 0.0;
        for tri in &mesh.indices {
            let [i0, i1, i2] = tri.map(|i| i as usize);
            let (v0, v1, v2) = (mesh.vertices[i0], mesh.vertices[i1], mesh.vertices[i2]);

            let cross = (v1 - v0).cross(&(v2 - v0));
            let det = v0.coords.dot(&v1.coords.cross(&v2.coords));

            let avg_normal = mesh.normals[i0] + mesh.normals[i1] + mesh.normals[i2];
            if avg_normal.dot(&cross) >= 0.0 {
                signed_volume += det;
            } else {
                signed_volume -= det;
            }
        }
        signed_volume.abs() / 6.0
    }
}
