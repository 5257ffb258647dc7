pub mod ring;
pub mod solid;
pub mod surface;

pub use ring::Ring;
pub use solid::{SolidData, SolidId, SolidRole};
pub use surface::{Facet, Opening, OpeningData, SemanticSurface, SurfaceData, SurfaceId};

use crate::config::Representation;
use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns every surface and solid of one building.
///
/// Solids reference their surfaces via typed IDs (generational indices).
/// All LOD variants of a building share one store, so a single pass over it
/// transforms every variant.
#[derive(Debug, Default)]
pub struct ModelStore {
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    solids: SlotMap<SolidId, SolidData>,
}

impl ModelStore {
    /// Creates a new, empty model store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Surface operations ---

    /// Inserts a surface and returns its ID.
    pub fn add_surface(&mut self, data: SurfaceData) -> SurfaceId {
        self.surfaces.insert(data)
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, TopologyError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("surface".into()))
    }

    /// Returns a mutable reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut SurfaceData, TopologyError> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("surface".into()))
    }

    /// Iterates over every stored surface.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.surfaces.iter()
    }

    /// Iterates mutably over every stored surface.
    pub fn surfaces_mut(&mut self) -> impl Iterator<Item = (SurfaceId, &mut SurfaceData)> {
        self.surfaces.iter_mut()
    }

    /// Number of stored surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// Returns the surfaces of a solid's shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its surfaces is missing.
    pub fn shell_surfaces(&self, id: SolidId) -> Result<Vec<&SurfaceData>, TopologyError> {
        self.solid(id)?
            .shell
            .iter()
            .map(|&sid| self.surface(sid))
            .collect()
    }
}

/// Output of one LOD variant of a building.
#[derive(Debug, Clone)]
pub struct VariantModel {
    /// Variant name from the catalog, e.g. `LOD2.1`.
    pub name: String,
    pub representation: Representation,
    /// Closed shells (solid representation, and interior rooms).
    pub solids: Vec<SolidId>,
    /// Loose surfaces (plain and semantic representations).
    pub surfaces: Vec<SurfaceId>,
}

impl VariantModel {
    /// Every surface of the variant, including the shells of its solids.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced entity is missing from the store.
    pub fn all_surfaces<'a>(
        &self,
        store: &'a ModelStore,
    ) -> Result<Vec<&'a SurfaceData>, TopologyError> {
        let mut out = Vec::new();
        for &solid in &self.solids {
            out.extend(store.shell_surfaces(solid)?);
        }
        for &sid in &self.surfaces {
            out.push(store.surface(sid)?);
        }
        Ok(out)
    }
}
