use crate::error::Result;
use crate::math::Point3;
use crate::model::{ModelStore, SolidId, SurfaceData};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> crate::math::Vector3 {
        self.max - self.min
    }
}

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB, or `None` for an empty shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its surfaces is missing.
    pub fn execute(&self, store: &ModelStore) -> Result<Option<Aabb>> {
        Ok(Self::of_surfaces(store.shell_surfaces(self.solid)?))
    }

    /// Bounding box of loose surfaces.
    pub fn of_surfaces<'s>(surfaces: impl IntoIterator<Item = &'s SurfaceData>) -> Option<Aabb> {
        let mut points = surfaces
            .into_iter()
            .flat_map(|s| s.rings().flat_map(|r| r.points().iter()));
        let first = points.next()?;
        let mut aabb = Aabb {
            min: *first,
            max: *first,
        };
        for p in points {
            aabb.include(p);
        }
        Some(aabb)
    }
}
