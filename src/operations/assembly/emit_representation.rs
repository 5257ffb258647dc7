use crate::config::Representation;
use crate::context::BuildContext;
use crate::model::{
    Facet, ModelStore, OpeningData, SolidData, SolidId, SolidRole, SurfaceData, SurfaceId,
    VariantModel,
};
use crate::operations::query::CheckClosure;

use super::envelope::weld_edges;
use super::Envelope;

/// Stores the faces of an envelope in the requested representation.
///
/// - `Plain` keeps only exterior rings, untagged.
/// - `Solid` groups each closed volume into a solid; faces stay untagged
///   and openings are dropped.
/// - `Semantic` stores every face with its tag, holes and openings, plus
///   the closure surface of an overhang.
pub struct EmitRepresentation<'a> {
    ctx: &'a BuildContext,
    representation: Representation,
}

impl<'a> EmitRepresentation<'a> {
    /// Creates a new `EmitRepresentation` operation.
    #[must_use]
    pub fn new(ctx: &'a BuildContext, representation: Representation) -> Self {
        Self {
            ctx,
            representation,
        }
    }

    /// Emits the main shell and every detached volume of an envelope.
    pub fn execute(&self, envelope: &Envelope, store: &mut ModelStore, variant: &mut VariantModel) {
        let mut shells = vec![envelope.shell()];
        for detached in &envelope.detached {
            let mut shell: Vec<Facet> = detached
                .iter()
                .filter(|f| !f.exterior.is_degenerate())
                .cloned()
                .collect();
            weld_edges(&mut shell);
            shells.push(shell);
        }
        for shell in &shells {
            self.volume(shell, SolidRole::Building, store, variant);
        }
        if self.representation == Representation::Semantic {
            if let Some(closure) = &envelope.closure {
                variant.surfaces.push(self.surface(closure, store));
            }
        }
    }

    /// Emits one closed volume: a solid in the `Solid` representation, loose
    /// surfaces otherwise.
    pub fn volume(
        &self,
        shell: &[Facet],
        role: SolidRole,
        store: &mut ModelStore,
        variant: &mut VariantModel,
    ) {
        if self.representation == Representation::Solid {
            variant.solids.push(self.solid(shell, role, store));
        } else {
            variant
                .surfaces
                .extend(shell.iter().map(|f| self.surface(f, store)));
        }
    }

    /// Emits a room volume. Outside the `Solid` representation its faces
    /// are turned to face into the room and tagged as seen from inside.
    pub fn interior(
        &self,
        shell: &[Facet],
        role: SolidRole,
        store: &mut ModelStore,
        variant: &mut VariantModel,
    ) {
        if self.representation == Representation::Solid {
            variant.solids.push(self.solid(shell, role, store));
        } else {
            let inward: Vec<Facet> = shell.iter().map(Facet::flipped_inward).collect();
            self.surfaces(&inward, store, variant);
        }
    }

    /// Emits faces that do not bound a volume, such as a footprint.
    pub fn surfaces(&self, facets: &[Facet], store: &mut ModelStore, variant: &mut VariantModel) {
        variant
            .surfaces
            .extend(facets.iter().map(|f| self.surface(f, store)));
    }

    fn solid(&self, shell: &[Facet], role: SolidRole, store: &mut ModelStore) -> SolidId {
        let report = CheckClosure::facets(shell);
        if !report.is_closed() {
            tracing::warn!(
                ?role,
                boundary = report.boundary_edges,
                non_manifold = report.non_manifold_edges,
                misoriented = report.misoriented_edges,
                "shell is not closed"
            );
        }
        let surfaces = shell
            .iter()
            .map(|f| {
                store.add_surface(SurfaceData {
                    gml_id: self.ctx.next_id("poly"),
                    exterior: f.exterior.clone(),
                    holes: f.holes.clone(),
                    semantic: None,
                    openings: Vec::new(),
                })
            })
            .collect();
        store.add_solid(SolidData {
            gml_id: self.ctx.next_id("solid"),
            role,
            shell: surfaces,
        })
    }

    fn surface(&self, facet: &Facet, store: &mut ModelStore) -> SurfaceId {
        let data = match self.representation {
            Representation::Plain | Representation::Solid => SurfaceData {
                gml_id: self.ctx.next_id("poly"),
                exterior: facet.exterior.clone(),
                holes: Vec::new(),
                semantic: None,
                openings: Vec::new(),
            },
            Representation::Semantic => SurfaceData {
                gml_id: self.ctx.next_id("poly"),
                exterior: facet.exterior.clone(),
                holes: facet.holes.clone(),
                semantic: Some(facet.semantic),
                openings: facet
                    .openings
                    .iter()
                    .map(|o| OpeningData {
                        gml_id: self.ctx.next_id("opening"),
                        kind: o.kind,
                        ring: o.ring.clone(),
                    })
                    .collect(),
            },
        };
        store.add_surface(data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::model::{Ring, SemanticSurface};
    use crate::operations::assembly::{AttachBuildingPart, MakeBlock, MakeEnvelope};
    use crate::operations::creation::{BodyCorners, HeightMode, MakeBody, MakeRoofShape};
    use crate::operations::roof::ProjectOverhang;
    use crate::spec::{BuildingPart, PartType, RoofSpec};

    fn body() -> BodyCorners {
        MakeBody::new(Point3::origin(), 5.0, 4.0, HeightMode::Fixed(6.0))
            .execute()
            .unwrap()
    }

    fn variant(representation: Representation) -> VariantModel {
        VariantModel {
            name: "test".into(),
            representation,
            solids: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    #[test]
    fn solid_block_is_one_closed_solid() {
        let ctx = BuildContext::default();
        let mut store = ModelStore::new();
        let mut out = variant(Representation::Solid);
        let env = MakeBlock::new(&body()).execute();
        EmitRepresentation::new(&ctx, Representation::Solid).execute(&env, &mut store, &mut out);
        assert_eq!(out.solids.len(), 1);
        assert!(out.surfaces.is_empty());
        let report = CheckClosure::new(out.solids[0]).execute(&store).unwrap();
        assert!(report.is_closed());
        assert_eq!(store.solid(out.solids[0]).unwrap().role, SolidRole::Building);
        assert!(store.surfaces().all(|(_, s)| s.semantic.is_none()));
    }

    #[test]
    fn semantic_faces_keep_tags_and_closure() {
        let ctx = BuildContext::default();
        let mut store = ModelStore::new();
        let mut out = variant(Representation::Semantic);
        let body = body();
        let roof = RoofSpec::flat().with_overhangs(0.5, 0.5);
        let shape = MakeRoofShape::new(&body, &roof).execute().unwrap();
        let ovh = ProjectOverhang::new(&body, &shape, &roof).execute().unwrap();
        let env = MakeEnvelope::new(&body, &shape)
            .with_overhang(ovh.as_ref())
            .execute()
            .unwrap();
        EmitRepresentation::new(&ctx, Representation::Semantic).execute(&env, &mut store, &mut out);
        let tags: Vec<_> = out
            .surfaces
            .iter()
            .map(|&id| store.surface(id).unwrap().semantic.unwrap())
            .collect();
        assert_eq!(tags[0], SemanticSurface::Ground);
        assert_eq!(tags.iter().filter(|&&t| t == SemanticSurface::OuterCeiling).count(), 4);
        assert_eq!(tags.last(), Some(&SemanticSurface::Closure));
    }

    #[test]
    fn plain_surfaces_drop_holes_and_openings() {
        let ctx = BuildContext::default();
        let mut store = ModelStore::new();
        let mut out = variant(Representation::Plain);
        let hole = Ring::from_points([
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ]);
        let facet = Facet::new(Ring::from_points(body().base_ring()), SemanticSurface::Ground)
            .with_hole(hole);
        EmitRepresentation::new(&ctx, Representation::Plain).surfaces(&[facet], &mut store, &mut out);
        let stored = store.surface(out.surfaces[0]).unwrap();
        assert!(stored.holes.is_empty());
        assert!(stored.semantic.is_none());
    }

    #[test]
    fn detached_parts_become_their_own_solids() {
        let ctx = BuildContext::default();
        let mut store = ModelStore::new();
        let mut out = variant(Representation::Solid);
        let body = body();
        let mut env = MakeBlock::new(&body).execute();
        let part = BuildingPart {
            part_type: PartType::Alcove,
            offset: 1.0,
            width: 2.0,
            depth: 2.0,
            height: 6.0,
        };
        AttachBuildingPart::new(&part, &body, 5.0).execute(&mut env).unwrap();
        EmitRepresentation::new(&ctx, Representation::Solid).execute(&env, &mut store, &mut out);
        assert_eq!(out.solids.len(), 2);
        for &solid in &out.solids {
            assert!(CheckClosure::new(solid).execute(&store).unwrap().is_closed());
        }
    }
}
