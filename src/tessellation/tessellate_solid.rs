use crate::error::Result;
use crate::model::{ModelStore, SolidId};

use super::{TessellateSurface, TriangleMesh};

/// Tessellates all surfaces of a solid's shell into a combined triangle mesh.
pub struct TessellateSolid {
    solid: SolidId,
}

impl TessellateSolid {
    /// Creates a new `TessellateSolid` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the tessellation, returning a combined triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or any of its surfaces cannot be
    /// tessellated.
    pub fn execute(&self, store: &ModelStore) -> Result<TriangleMesh> {
        let mut combined = TriangleMesh::default();
        for surface in store.shell_surfaces(self.solid)? {
            let mesh = TessellateSurface::new(surface).execute()?;
            combined.merge(&mesh);
        }
        Ok(combined)
    }
}
