use crate::error::{CityLodError, Result};
use crate::model::{Opening, Ring};
use crate::operations::roof::{PlaceChimney, PlaceDormer, PlaceRoofWindow, RoofSlope};
use crate::spec::{BuildingSpec, OpeningKind, RoofFeature, Side};

use super::{Envelope, RoofFrame};

/// Places the dormers, roof windows and chimneys of a building on its roof.
///
/// Feature faces join the envelope's extras and their footprints are cut
/// from the host roof surface. Roof windows are only cut when they can be
/// carried as openings; a sealed shell has no face to put in their place.
pub struct AttachRoofFeatures<'a> {
    spec: &'a BuildingSpec,
    roof_windows: bool,
}

impl<'a> AttachRoofFeatures<'a> {
    /// Creates a new `AttachRoofFeatures` operation.
    #[must_use]
    pub fn new(spec: &'a BuildingSpec) -> Self {
        Self {
            spec,
            roof_windows: true,
        }
    }

    /// Sets whether roof windows are cut into the roof.
    #[must_use]
    pub fn with_roof_windows(mut self, roof_windows: bool) -> Self {
        self.roof_windows = roof_windows;
        self
    }

    /// Executes the operation, returning the number of features placed.
    ///
    /// Features whose side has no roof plane able to carry them are skipped
    /// with a warning; a validated building has none.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature has a non-positive size.
    pub fn execute(&self, envelope: &mut Envelope) -> Result<usize> {
        let spec = self.spec;
        let total = spec.dormers.len() + spec.roof_windows.len() + spec.chimneys.len();
        let Some(frame) = envelope.roof_frame.clone() else {
            if total > 0 {
                tracing::warn!(building = %spec.id, features = total, "roof features need a modelled roof");
            }
            return Ok(0);
        };

        let mut placed = 0;
        for dormer in &spec.dormers {
            let Some(slope) = hostable(&frame, dormer, "dormer")? else {
                continue;
            };
            let Some(geom) = skip_unhostable(PlaceDormer::new(&slope, dormer).execute(), "dormer")?
            else {
                continue;
            };
            if cut(envelope, dormer.side, geom.roof_hole.clone(), None) {
                envelope.extras.extend(geom.faces());
                placed += 1;
            }
        }
        if self.roof_windows {
            for window in &spec.roof_windows {
                let Some(slope) = hostable(&frame, window, "roof window")? else {
                    continue;
                };
                let geom = PlaceRoofWindow::new(&slope, window).execute()?;
                let pane = Opening {
                    kind: OpeningKind::Window,
                    ring: geom.pane,
                };
                if cut(envelope, window.side, geom.roof_hole, Some(pane)) {
                    placed += 1;
                }
            }
        }
        for chimney in &spec.chimneys {
            let Some(slope) = hostable(&frame, chimney, "chimney")? else {
                continue;
            };
            let geom = PlaceChimney::new(&slope, chimney).execute()?;
            if cut(envelope, chimney.side, geom.roof_hole, None) {
                envelope.extras.extend(geom.faces);
                placed += 1;
            }
        }
        Ok(placed)
    }
}

/// Slope frame for a feature, or `None` after a warning if the roof has no
/// plane on its side.
fn hostable(frame: &RoofFrame, feature: &RoofFeature, name: &'static str) -> Result<Option<RoofSlope>> {
    skip_unhostable(frame.slope(feature.side).map_err(CityLodError::from), name)
}

fn skip_unhostable<T>(result: Result<T>, name: &'static str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CityLodError::Spec(err)) => {
            tracing::warn!(feature = name, error = %err, "skipping roof feature");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Cuts `hole` into the roof surface hosting `side`.
fn cut(envelope: &mut Envelope, side: Side, hole: Ring, pane: Option<Opening>) -> bool {
    let Some(host) = envelope.roof_for_mut(side) else {
        tracing::warn!(side = %side, "no roof surface to host feature");
        return false;
    };
    host.facet.holes.push(hole);
    host.facet.openings.extend(pane);
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::assembly::{MakeBlock, MakeEnvelope};
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::operations::query::CheckClosure;
    use crate::operations::roof::ProjectOverhang;
    use crate::spec::RoofSpec;

    fn spec(roof: RoofSpec) -> BuildingSpec {
        BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, roof)
    }

    fn envelope(spec: &BuildingSpec) -> Envelope {
        let body = MakeBody::new(spec.origin, spec.width, spec.depth, HeightMode::Fixed(spec.eave_height))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &spec.roof).execute().unwrap();
        let ovh = ProjectOverhang::new(&body, &shape, &spec.roof).execute().unwrap();
        MakeEnvelope::new(&body, &shape)
            .with_overhang(ovh.as_ref())
            .execute()
            .unwrap()
    }

    #[test]
    fn dormer_and_chimney_keep_the_shell_closed() {
        let spec = spec(RoofSpec::gabled(3.0).with_overhangs(0.5, 0.3))
            .with_dormer(RoofFeature::new(Side::East, 2.0, 0.5, 1.5, 1.0))
            .with_chimney(RoofFeature::new(Side::West, 5.0, 1.0, 0.6, 1.0));
        let mut env = envelope(&spec);
        let placed = AttachRoofFeatures::new(&spec)
            .with_roof_windows(false)
            .execute(&mut env)
            .unwrap();
        assert_eq!(placed, 2);
        let shell = env.shell();
        assert!(CheckClosure::facets(&shell).is_closed());
        let east = env.roof.iter().find(|r| r.side == Some(Side::East)).unwrap();
        assert_eq!(east.facet.holes.len(), 1);
    }

    #[test]
    fn roof_windows_become_openings() {
        let spec = spec(RoofSpec::hipped(3.0, 2.0))
            .with_roof_window(RoofFeature::new(Side::South, 2.5, 0.5, 1.0, 0.8));
        let mut env = envelope(&spec);
        AttachRoofFeatures::new(&spec).execute(&mut env).unwrap();
        let south = env.roof.iter().find(|r| r.side == Some(Side::South)).unwrap();
        assert_eq!(south.facet.openings.len(), 1);
        assert_eq!(south.facet.openings[0].kind, OpeningKind::Window);
        assert_eq!(south.facet.holes.len(), 1);
    }

    #[test]
    fn sealed_shells_leave_roof_windows_out() {
        let spec = spec(RoofSpec::gabled(3.0))
            .with_roof_window(RoofFeature::new(Side::East, 1.0, 0.5, 1.0, 1.0));
        let mut env = envelope(&spec);
        let placed = AttachRoofFeatures::new(&spec)
            .with_roof_windows(false)
            .execute(&mut env)
            .unwrap();
        assert_eq!(placed, 0);
        assert!(env.roof.iter().all(|r| r.facet.holes.is_empty()));
    }

    #[test]
    fn flat_roof_hosts_chimneys_from_every_side() {
        let spec = spec(RoofSpec::flat())
            .with_chimney(RoofFeature::new(Side::North, 1.0, 1.0, 0.5, 1.2))
            .with_chimney(RoofFeature::new(Side::South, 1.0, 1.0, 0.5, 1.2));
        let mut env = envelope(&spec);
        let placed = AttachRoofFeatures::new(&spec).execute(&mut env).unwrap();
        assert_eq!(placed, 2);
        assert_eq!(env.roof[0].facet.holes.len(), 2);
        assert!(CheckClosure::facets(&env.shell()).is_closed());
    }

    #[test]
    fn unhostable_features_are_skipped() {
        // gabled roofs have no plane rising from the north wall
        let spec = spec(RoofSpec::gabled(3.0))
            .with_dormer(RoofFeature::new(Side::North, 1.0, 0.5, 1.0, 1.0))
            .with_dormer(RoofFeature::new(Side::East, 1.0, 0.5, 1.0, 1.0));
        let mut env = envelope(&spec);
        let placed = AttachRoofFeatures::new(&spec).execute(&mut env).unwrap();
        assert_eq!(placed, 1);
    }

    #[test]
    fn blocks_carry_no_roof_features() {
        let spec = spec(RoofSpec::gabled(3.0))
            .with_dormer(RoofFeature::new(Side::East, 1.0, 0.5, 1.0, 1.0));
        let body = MakeBody::new(spec.origin, 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let mut env = MakeBlock::new(&body).execute();
        assert_eq!(AttachRoofFeatures::new(&spec).execute(&mut env).unwrap(), 0);
        assert!(env.extras.is_empty());
    }
}
