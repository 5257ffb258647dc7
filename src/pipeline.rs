//! Whole-building builds: every configured variant of a building into one
//! store, followed by the rotation pass.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::context::BuildContext;
use crate::error::Result;
use crate::math::TOLERANCE;
use crate::model::{ModelStore, SurfaceId, VariantModel};
use crate::operations::assembly::{BuildVariant, GeometryContext};
use crate::operations::transform::Rotate;
use crate::spec::{BuildingSpec, ValidateSpec};

/// Every variant of one building, sharing a single store.
#[derive(Debug)]
pub struct BuildingModel {
    pub id: String,
    pub store: ModelStore,
    /// One entry per configured variant, in configuration order.
    pub variants: Vec<VariantModel>,
    /// Fraction digits for coordinate text, from the build configuration.
    pub decimals: usize,
}

impl BuildingModel {
    /// Looks up a variant by name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&VariantModel> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Coordinate lists of a surface's rings, exterior first, at the
    /// configured precision.
    ///
    /// # Errors
    ///
    /// Returns a topology error if the surface is not in the store.
    pub fn pos_lists(&self, id: SurfaceId) -> Result<Vec<String>> {
        let surface = self.store.surface(id)?;
        Ok(surface.rings().map(|r| r.pos_list(self.decimals)).collect())
    }
}

/// Builds all configured variants of one building.
pub struct BuildingPipeline<'a> {
    ctx: &'a BuildContext,
}

impl<'a> BuildingPipeline<'a> {
    /// Creates a new `BuildingPipeline`.
    #[must_use]
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self { ctx }
    }

    /// Executes the pipeline for one building.
    ///
    /// The rotation is applied once, after every variant has been built.
    ///
    /// # Errors
    ///
    /// Returns an error if validation is enabled and the building fails
    /// it, or if any variant's geometry is degenerate.
    #[instrument(skip_all, fields(building = %spec.id))]
    pub fn execute(&self, spec: &BuildingSpec) -> Result<BuildingModel> {
        let config = self.ctx.config();
        if config.validate {
            ValidateSpec::new(spec).execute()?;
        }

        let geometry = GeometryContext::new(spec)?;
        let mut store = ModelStore::new();
        let mut variants = Vec::with_capacity(config.variants.len());
        for variant in &config.variants {
            variants.push(BuildVariant::new(spec, &geometry, variant, self.ctx).execute(&mut store)?);
        }

        if spec.rotation.abs() > TOLERANCE {
            debug!(degrees = spec.rotation, "rotating building");
            Rotate::new(spec.origin, spec.rotation).execute(&mut store);
        }

        info!(
            variants = variants.len(),
            surfaces = store.surface_count(),
            "building complete"
        );
        Ok(BuildingModel {
            id: spec.id.clone(),
            store,
            variants,
            decimals: config.decimals,
        })
    }
}

/// Builds many buildings in parallel.
///
/// Each building succeeds or fails on its own; results are returned in
/// input order.
#[instrument(skip_all, fields(buildings = specs.len()))]
pub fn build_all(ctx: &BuildContext, specs: &[BuildingSpec]) -> Vec<Result<BuildingModel>> {
    specs
        .par_iter()
        .map(|spec| BuildingPipeline::new(ctx).execute(spec))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::error::CityLodError;
    use crate::math::Point3;
    use crate::spec::{RoofFeature, RoofSpec, Side, WallOpening};
    use approx::assert_relative_eq;

    fn house() -> BuildingSpec {
        let mut spec = BuildingSpec::new(Point3::new(10.0, 20.0, 0.0), 6.0, 8.0, 5.0, RoofSpec::gabled(3.0))
            .with_door(WallOpening::new(Side::South, 2.0, 0.0, 1.0, 2.1));
        spec.id = "b1".into();
        spec
    }

    #[test]
    fn every_catalog_variant_is_built() {
        let ctx = BuildContext::default();
        let model = BuildingPipeline::new(&ctx).execute(&house()).unwrap();
        assert_eq!(model.variants.len(), ctx.config().variants.len());
        assert_eq!(model.id, "b1");
        assert!(model.variant("LOD0.0").is_some());
    }

    #[test]
    fn rotation_turns_every_variant_about_the_origin() {
        let ctx = BuildContext::new(BuildConfig::default().with_variants(&["LOD0.0"]));
        let spec = house().with_rotation(90.0);
        let model = BuildingPipeline::new(&ctx).execute(&spec).unwrap();
        let footprint = &model.store.surface(model.variant("LOD0.0").unwrap().surfaces[0]).unwrap().exterior;
        // the south-east corner swings to the north of the origin
        assert_relative_eq!(footprint.points()[1], Point3::new(10.0, 26.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn coordinate_text_uses_the_configured_precision() {
        let config = BuildConfig {
            decimals: 1,
            ..BuildConfig::default().with_variants(&["LOD0.0"])
        };
        let ctx = BuildContext::new(config);
        let model = BuildingPipeline::new(&ctx).execute(&house()).unwrap();
        let lists = model.pos_lists(model.variant("LOD0.0").unwrap().surfaces[0]).unwrap();
        assert_eq!(lists.len(), 1);
        assert!(lists[0].starts_with("10.0 20.0 0.0 "));
        assert!(lists[0].split(' ').all(|c| c.split('.').nth(1).is_some_and(|d| d.len() == 1)));
    }

    #[test]
    fn invalid_buildings_fail_alone() {
        let ctx = BuildContext::default();
        let bad = house().with_dormer(RoofFeature::new(Side::North, 1.0, 1.0, 1.0, 1.0));
        let results = build_all(&ctx, &[house(), bad]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(CityLodError::Spec(_))));
    }
}
