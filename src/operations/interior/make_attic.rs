use crate::error::Result;
use crate::math::TOLERANCE;
use crate::operations::assembly::{Envelope, MakeEnvelope, RoofFrame};
use crate::operations::creation::{BodyCorners, HeightMode, MakeBody, MakeRoofShape, RoofShape};
use crate::operations::roof::{InteriorFeature, PlaceInteriorFeature, RoofFeatureKind, RoofSlope};
use crate::spec::{BuildingSpec, PerSide, RoofSpec, RoofType, Side};

/// Builds the room under a pitched roof.
///
/// Each sloped roof plane is lowered by the roof thickness measured
/// perpendicular to it, `t·√(1 + k²)` vertically for slope `k`. The attic
/// floor lies half a joist above the top storey; its knee walls rise to
/// where the highest lowered plane meets the wall inset, and every sloped
/// side is inset to where its plane meets that knee elevation. The inner
/// roof has the outer roof's slopes, so the attic ceiling stays parallel to
/// the roof skin.
pub struct MakeAttic<'a> {
    spec: &'a BuildingSpec,
    body: &'a BodyCorners,
    shape: &'a RoofShape,
    thickness: f64,
    features: bool,
}

impl<'a> MakeAttic<'a> {
    /// Creates a new `MakeAttic` operation.
    ///
    /// * `body` - Box on the outer wall lines, up to the eaves.
    /// * `shape` - Outer roof over `body`.
    /// * `thickness` - Thickness of walls and roof skin.
    #[must_use]
    pub fn new(spec: &'a BuildingSpec, body: &'a BodyCorners, shape: &'a RoofShape, thickness: f64) -> Self {
        Self {
            spec,
            body,
            shape,
            thickness,
            features: false,
        }
    }

    /// Extends the attic into the building's roof features.
    #[must_use]
    pub fn with_features(mut self, features: bool) -> Self {
        self.features = features;
        self
    }

    /// Executes the operation.
    ///
    /// Returns `None` for flat roofs and for roofs too low to leave
    /// headroom above the attic floor.
    ///
    /// # Errors
    ///
    /// Returns an error if the inset outline has no area.
    pub fn execute(&self) -> Result<Option<Envelope>> {
        let roof_type = self.shape.roof_type();
        if !roof_type.is_pitched() {
            return Ok(None);
        }
        let spec = self.spec;
        let t = self.thickness;
        let eave_z = self.body.top_z();
        let floor_z = self.body.base_z() + f64::from(spec.floors) * spec.floor_height + 0.5 * spec.joist;

        // vertical drop of each sloped plane
        let drop = |side: Side| {
            self.shape
                .slope_ratio(side)
                .filter(|k| *k > TOLERANCE)
                .map(|k| (k, t * (1.0 + k * k).sqrt()))
        };
        let knee_z = Side::ALL
            .iter()
            .filter_map(|&side| drop(side).map(|(k, d)| eave_z - d + k * t))
            .fold(floor_z, f64::max);
        let mut insets = PerSide::uniform(t);
        for side in Side::ALL {
            if let Some((k, d)) = drop(side) {
                insets[side] = (knee_z - (eave_z - d)) / k;
            }
        }

        let rise = self.shape.rise();
        let ew_drop = drop(Side::East).map_or(0.0, |(_, d)| d);
        let (ridge_z, ridge_offset) = match roof_type {
            RoofType::Shed => {
                let k = self.shape.slope_ratio(Side::East).unwrap_or(0.0);
                (eave_z - ew_drop + k * (self.body.width() - t), 0.0)
            }
            RoofType::Gabled => (eave_z + rise - ew_drop, 0.0),
            _ => {
                // the hip planes reach the inner ridge elevation this far in
                let offset = drop(Side::South)
                    .map_or(0.0, |(k, d)| (rise - ew_drop + d) / k - insets[Side::South]);
                (eave_z + rise - ew_drop, offset)
            }
        };
        let inner_rise = ridge_z - knee_z;
        if inner_rise <= TOLERANCE {
            tracing::warn!(building = %spec.id, "roof leaves no headroom for an attic");
            return Ok(None);
        }

        let footprint = self.body.offset(insets.negated()).with_base(floor_z);
        let inner = MakeBody::over(&footprint, HeightMode::Override(knee_z)).execute()?;
        let inner_roof = RoofSpec {
            roof_type,
            rise: inner_rise,
            ridge_offset: ridge_offset.clamp(0.0, 0.5 * inner.depth()),
            overhang_x: 0.0,
            overhang_y: 0.0,
        };
        let inner_shape = MakeRoofShape::new(&inner, &inner_roof).execute()?;
        let mut attic = MakeEnvelope::new(&inner, &inner_shape).execute()?;
        attic.roof_frame = Some(RoofFrame {
            outline: inner,
            shape: inner_shape,
            offsets: insets.negated(),
        });
        attic.body_walls = false;

        if self.features {
            self.attach_features(&mut attic)?;
        }
        Ok(Some(attic))
    }

    fn attach_features(&self, attic: &mut Envelope) -> Result<()> {
        let Some(frame) = attic.roof_frame.clone() else {
            return Ok(());
        };
        let spec = self.spec;
        let features = spec
            .dormers
            .iter()
            .map(|f| (RoofFeatureKind::Dormer, f))
            .chain(spec.roof_windows.iter().map(|f| (RoofFeatureKind::RoofWindow, f)))
            .chain(spec.chimneys.iter().map(|f| (RoofFeatureKind::Chimney, f)));

        for (kind, feature) in features {
            let (Ok(outer), Ok(inner)) = (
                RoofSlope::new(self.body, self.shape, feature.side),
                frame.slope(feature.side),
            ) else {
                continue;
            };
            let placed = PlaceInteriorFeature::new(kind, feature, &outer, &inner, self.thickness)
                .execute(&attic.body)?;
            let Some(placed) = placed else {
                tracing::debug!(?kind, side = %feature.side, "feature does not reach into the attic");
                continue;
            };
            let Some(host) = attic.roof_for_mut(feature.side) else {
                continue;
            };
            match placed {
                InteriorFeature::Dormer(dormer) => {
                    host.facet.holes.push(dormer.roof_hole.clone());
                    attic.extras.extend(dormer.faces());
                }
                InteriorFeature::RoofWindow {
                    ceiling_hole,
                    reveals,
                    pane,
                } => {
                    host.facet.holes.push(ceiling_hole);
                    attic.extras.extend(reveals);
                    attic.extras.push(pane);
                }
                InteriorFeature::Shaft {
                    floor_hole,
                    ceiling_hole,
                    walls,
                } => {
                    host.facet.holes.push(ceiling_hole);
                    attic.ground_holes.push(floor_hole);
                    attic.extras.extend(walls);
                }
            }
        }
        Ok(())
    }
}
