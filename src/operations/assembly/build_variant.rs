use crate::config::{FootprintRule, HeightRule, LodVariant, Representation};
use crate::context::BuildContext;
use crate::error::Result;
use crate::model::{Facet, ModelStore, Ring, SemanticSurface, SolidRole, VariantModel};
use crate::operations::creation::{BodyCorners, HeightMode, MakeBody, MakeRoofShape, RoofShape};
use crate::operations::interior::{MakeAttic, MakeStoreys};
use crate::operations::roof::{Overhang, ProjectOverhang};
use crate::spec::BuildingSpec;

use super::{
    AttachBuildingPart, AttachOpenings, AttachRoofFeatures, EmitRepresentation, Envelope,
    MakeBlock, MakeEnvelope, PartPlacement,
};

/// Geometry shared by every variant of one building: the body up to the
/// eaves, its roof and the overhang projected from it.
#[derive(Debug, Clone)]
pub struct GeometryContext {
    pub body: BodyCorners,
    pub shape: RoofShape,
    /// `None` when every overhang length is zero.
    pub overhang: Option<Overhang>,
}

impl GeometryContext {
    /// Resolves the body, roof and overhang of a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or roof is degenerate.
    pub fn new(spec: &BuildingSpec) -> Result<Self> {
        let body = MakeBody::new(
            spec.origin,
            spec.width,
            spec.depth,
            HeightMode::Fixed(spec.eave_height),
        )
        .execute()?;
        let shape = MakeRoofShape::new(&body, &spec.roof).execute()?;
        let overhang = ProjectOverhang::new(&body, &shape, &spec.roof).execute()?;
        Ok(Self {
            body,
            shape,
            overhang,
        })
    }

    /// The box a footprint rule selects: the body, or the roof outline up to
    /// the corrected eave.
    #[must_use]
    pub fn frame(&self, rule: FootprintRule) -> BodyCorners {
        match (rule, &self.overhang) {
            (FootprintRule::RoofOutline, Some(ovh)) => ovh.outline,
            _ => self.body,
        }
    }
}

/// Builds one LOD variant of a building into a model store.
///
/// The variant's footprint rule picks the frame, its height rule the
/// volume raised over it, and its representation how the faces are
/// stored. Optional features are added in a fixed order: building part,
/// roof features, openings, then the interior.
pub struct BuildVariant<'a> {
    spec: &'a BuildingSpec,
    geometry: &'a GeometryContext,
    variant: &'a LodVariant,
    ctx: &'a BuildContext,
}

impl<'a> BuildVariant<'a> {
    /// Creates a new `BuildVariant` operation.
    #[must_use]
    pub fn new(
        spec: &'a BuildingSpec,
        geometry: &'a GeometryContext,
        variant: &'a LodVariant,
        ctx: &'a BuildContext,
    ) -> Self {
        Self {
            spec,
            geometry,
            variant,
            ctx,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the variant's geometry is degenerate.
    pub fn execute(&self, store: &mut ModelStore) -> Result<VariantModel> {
        let variant = self.variant;
        let representation = variant.representation;
        let emit = EmitRepresentation::new(self.ctx, representation);
        let mut out = VariantModel {
            name: variant.name.clone(),
            representation,
            solids: Vec::new(),
            surfaces: Vec::new(),
        };

        if variant.height == HeightRule::Footprint {
            emit.surfaces(&[self.footprint()], store, &mut out);
        } else {
            let mut envelope = self.envelope()?;
            self.attach_features(&mut envelope)?;
            emit.execute(&envelope, store, &mut out);
            if variant.features.interior {
                self.interior(&emit, store, &mut out)?;
            }
        }

        tracing::debug!(
            variant = %variant.name,
            solids = out.solids.len(),
            surfaces = out.surfaces.len(),
            "variant built"
        );
        Ok(out)
    }

    fn footprint(&self) -> Facet {
        let frame = self.geometry.frame(self.variant.footprint);
        match self.variant.footprint {
            FootprintRule::Walls => {
                Facet::new(Ring::from_points(frame.base_ring()), SemanticSurface::Ground)
            }
            FootprintRule::RoofOutline => {
                Facet::new(Ring::from_points(frame.top_ring()), SemanticSurface::Roof)
            }
        }
    }

    fn envelope(&self) -> Result<Envelope> {
        let geometry = self.geometry;
        let frame = geometry.frame(self.variant.footprint);
        let on_walls = frame == geometry.body;
        let block = |height: HeightMode| -> Result<Envelope> {
            let body = MakeBody::over(&frame, height).execute()?;
            Ok(MakeBlock::new(&body).with_body_walls(on_walls).execute())
        };

        match self.variant.height {
            HeightRule::Footprint | HeightRule::Eaves => {
                Ok(MakeBlock::new(&frame).with_body_walls(on_walls).execute())
            }
            HeightRule::RoofFraction(fraction) => block(HeightMode::Fraction {
                eave: self.spec.eave_height,
                rise: geometry.shape.rise(),
                fraction,
            }),
            HeightRule::Ridge => block(HeightMode::Override(geometry.shape.ridge_z())),
            HeightRule::Roof => {
                let overhang = match self.variant.footprint {
                    FootprintRule::RoofOutline => geometry.overhang.as_ref(),
                    FootprintRule::Walls => None,
                };
                MakeEnvelope::new(&geometry.body, &geometry.shape)
                    .with_overhang(overhang)
                    .execute()
            }
        }
    }

    fn attach_features(&self, envelope: &mut Envelope) -> Result<()> {
        let spec = self.spec;
        let features = self.variant.features;

        if let (true, Some(part)) = (features.building_part, &spec.part) {
            let cover = self.geometry.frame(self.variant.footprint).max().x;
            let placed = AttachBuildingPart::new(part, &self.geometry.body, envelope.body.max().x)
                .with_cover(cover)
                .execute(envelope)?;
            if placed == PartPlacement::Covered {
                tracing::warn!(building = %spec.id, variant = %self.variant.name, "building part lies under the roof outline");
            }
        }

        if features.roof_features {
            if self.variant.height == HeightRule::Roof {
                AttachRoofFeatures::new(spec)
                    .with_roof_windows(self.variant.representation == Representation::Semantic)
                    .execute(envelope)?;
            } else if !(spec.dormers.is_empty() && spec.roof_windows.is_empty() && spec.chimneys.is_empty()) {
                tracing::warn!(variant = %self.variant.name, "roof features need a modelled roof");
            }
        }

        if features.openings {
            let embrasure = if features.embrasures { spec.embrasure } else { 0.0 };
            AttachOpenings::new(spec, self.variant.representation)
                .with_embrasure(embrasure)
                .execute(envelope)?;
        }
        Ok(())
    }

    fn interior(
        &self,
        emit: &EmitRepresentation<'_>,
        store: &mut ModelStore,
        out: &mut VariantModel,
    ) -> Result<()> {
        let spec = self.spec;
        let geometry = self.geometry;
        let storeys = MakeStoreys::new(
            &geometry.body,
            spec.floors,
            spec.floor_height,
            spec.joist,
            spec.wall_thickness,
        )
        .execute()?;
        for storey in &storeys {
            emit.interior(&storey.shell, SolidRole::Storey(storey.number), store, out);
        }

        let thickness = self
            .ctx
            .config()
            .interior_thickness
            .unwrap_or(spec.wall_thickness);
        let attic = MakeAttic::new(spec, &geometry.body, &geometry.shape, thickness)
            .with_features(self.variant.features.roof_features)
            .execute()?;
        if let Some(attic) = attic {
            emit.interior(&attic.shell(), SolidRole::Attic, store, out);
        }
        Ok(())
    }
}
