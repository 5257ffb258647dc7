use crate::config::Representation;
use crate::error::Result;
use crate::math::TOLERANCE;
use crate::operations::creation::BodyCorners;
use crate::operations::opening::MakeOpening;
use crate::spec::{BuildingSpec, WallOpening};

use super::{Envelope, Notch};

/// Cuts the door and windows of a building into its walls.
///
/// Openings whose sill lies on the base are spliced into the wall's bottom
/// edge instead of becoming holes. In the semantic representation each cut
/// carries its pane as an opening. A sealed shell cannot carry openings, so
/// it is only cut where a reveal leads to a pane face that closes the hole;
/// without an embrasure the walls stay whole.
///
/// Openings that leave their wall, or whose reveals would meet a corner,
/// are skipped with a warning.
pub struct AttachOpenings<'a> {
    spec: &'a BuildingSpec,
    representation: Representation,
    embrasure: f64,
}

impl<'a> AttachOpenings<'a> {
    /// Creates a new `AttachOpenings` operation.
    #[must_use]
    pub fn new(spec: &'a BuildingSpec, representation: Representation) -> Self {
        Self {
            spec,
            representation,
            embrasure: 0.0,
        }
    }

    /// Sets the depth of the reveals.
    #[must_use]
    pub fn with_embrasure(mut self, depth: f64) -> Self {
        self.embrasure = depth.max(0.0);
        self
    }

    /// Executes the operation, returning the number of openings cut.
    ///
    /// # Errors
    ///
    /// Returns an error if an opening has a non-positive size.
    pub fn execute(&self, envelope: &mut Envelope) -> Result<usize> {
        let count = self.spec.wall_openings().count();
        if count == 0 {
            return Ok(0);
        }
        if !envelope.body_walls {
            tracing::warn!(building = %self.spec.id, openings = count, "walls off the wall lines carry no openings");
            return Ok(0);
        }
        let sealed = match self.representation {
            Representation::Plain => return Ok(0),
            Representation::Solid => true,
            Representation::Semantic => false,
        };
        if sealed && self.embrasure <= 0.0 {
            return Ok(0);
        }

        let body = envelope.body;
        let mut cut = 0;
        for (opening, kind) in self.spec.wall_openings() {
            let geom = MakeOpening::new(&body, opening, kind, self.embrasure).execute()?;
            if !self.fits(&body, opening) {
                tracing::warn!(
                    building = %self.spec.id,
                    side = %opening.side,
                    "opening does not fit its wall, skipped"
                );
                continue;
            }
            let Some(wall) = envelope.wall_mut(opening.side) else {
                continue;
            };
            let mut reveals = geom.reveals.clone();
            if geom.touches_base(body.base_z()) {
                let [o0, o1, ..] = geom.outer;
                let ground = match geom.inner {
                    // the recess floor is left open to the sill
                    Some([i0, i1, ..]) => {
                        reveals.remove(0);
                        vec![o1, i1, i0, o0]
                    }
                    None => vec![o1, o0],
                };
                wall.notches.push(Notch {
                    distance: opening.origin.x,
                    wall: geom.notch(),
                    ground,
                });
            } else {
                wall.holes.push(geom.wall_hole());
            }
            if sealed {
                reveals.push(geom.pane_facet());
            } else {
                wall.openings.push(geom.pane());
            }
            envelope.extras.extend(reveals);
            cut += 1;
        }
        Ok(cut)
    }

    fn fits(&self, body: &BodyCorners, opening: &WallOpening) -> bool {
        let length = body.side_length(opening.side);
        let x = opening.origin.x;
        let y = opening.origin.y;
        x >= self.embrasure - TOLERANCE
            && x + opening.width <= length - self.embrasure + TOLERANCE
            && y >= -TOLERANCE
            && body.base_z() + y + opening.height <= body.top_z() + TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::assembly::{MakeBlock, MakeEnvelope};
    use crate::operations::creation::{HeightMode, MakeBody, MakeRoofShape};
    use crate::operations::query::CheckClosure;
    use crate::spec::{OpeningKind, RoofSpec, Side, WallOpening};
    use approx::assert_relative_eq;

    fn spec() -> BuildingSpec {
        BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::gabled(3.0))
            .with_door(WallOpening::new(Side::South, 2.0, 0.0, 1.0, 2.1))
            .with_window(WallOpening::new(Side::East, 3.0, 1.0, 1.2, 1.4))
            .with_window(WallOpening::new(Side::North, 1.0, 1.0, 1.2, 1.4))
    }

    fn envelope(spec: &BuildingSpec) -> Envelope {
        let body = MakeBody::new(spec.origin, spec.width, spec.depth, HeightMode::Fixed(spec.eave_height))
            .execute()
            .unwrap();
        let shape = MakeRoofShape::new(&body, &spec.roof).execute().unwrap();
        MakeEnvelope::new(&body, &shape).execute().unwrap()
    }

    #[test]
    fn semantic_walls_carry_their_panes() {
        let spec = spec();
        let mut env = envelope(&spec);
        let cut = AttachOpenings::new(&spec, Representation::Semantic)
            .execute(&mut env)
            .unwrap();
        assert_eq!(cut, 3);
        let south = env.wall(Side::South).unwrap();
        assert!(south.holes.is_empty());
        assert_eq!(south.notches.len(), 1);
        assert_eq!(south.openings[0].kind, OpeningKind::Door);
        assert_eq!(env.wall(Side::East).unwrap().holes.len(), 1);
        assert!(env.extras.is_empty());
    }

    #[test]
    fn embrasures_seal_the_shell() {
        let spec = spec();
        let mut env = envelope(&spec);
        AttachOpenings::new(&spec, Representation::Solid)
            .with_embrasure(0.3)
            .execute(&mut env)
            .unwrap();
        // door: three reveals and a pane; windows: four reveals and a pane
        assert_eq!(env.extras.len(), 4 + 2 * 5);
        let shell = env.shell();
        assert!(CheckClosure::facets(&shell).is_closed());
        let ground = env.ground();
        assert_eq!(ground.exterior.len(), 8);
    }

    #[test]
    fn door_at_the_corner_keeps_simple_rings() {
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::flat())
            .with_door(WallOpening::new(Side::West, 0.0, 0.0, 1.0, 2.0));
        let body = MakeBody::new(spec.origin, 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let mut env = MakeBlock::new(&body).execute();
        AttachOpenings::new(&spec, Representation::Semantic)
            .execute(&mut env)
            .unwrap();
        // the wall's start corner is cut away
        let west = env.wall(Side::West).unwrap().facet();
        assert_eq!(west.exterior.len(), 6);
        assert_relative_eq!(west.exterior.area(), 8.0 * 5.0 - 2.0, epsilon = 1e-9);
        assert_eq!(env.ground().exterior.len(), 5);
    }

    #[test]
    fn sealed_shells_without_reveals_stay_whole() {
        let spec = spec();
        let mut env = envelope(&spec);
        let cut = AttachOpenings::new(&spec, Representation::Solid)
            .execute(&mut env)
            .unwrap();
        assert_eq!(cut, 0);
        assert!(env.walls.iter().all(|w| w.holes.is_empty() && w.notches.is_empty()));
    }

    #[test]
    fn openings_above_a_dropped_eave_are_skipped() {
        let roof = RoofSpec::gabled(3.0).with_overhangs(0.4, 0.4);
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 9.0, 6.0, roof)
            .with_window(WallOpening::new(Side::East, 2.0, 4.6, 1.0, 1.4))
            .with_window(WallOpening::new(Side::East, 5.0, 1.0, 1.0, 1.4));
        let body = MakeBody::new(spec.origin, 6.0, 9.0, HeightMode::Fixed(spec.wall_top()))
            .execute()
            .unwrap();
        let mut env = MakeBlock::new(&body).execute();
        let cut = AttachOpenings::new(&spec, Representation::Semantic)
            .execute(&mut env)
            .unwrap();
        assert_eq!(cut, 1);
        let east = env.wall(Side::East).unwrap();
        let top = east.holes[0].points().iter().map(|p| p.z).fold(f64::MIN, f64::max);
        assert!(top <= body.top_z() + 1e-9);
    }

    #[test]
    fn reveals_at_a_corner_are_skipped() {
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::flat())
            .with_window(WallOpening::new(Side::West, 0.0, 1.0, 1.0, 1.4))
            .with_window(WallOpening::new(Side::West, 3.0, 1.0, 1.0, 1.4));
        let body = MakeBody::new(spec.origin, 6.0, 8.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let mut env = MakeBlock::new(&body).execute();
        let cut = AttachOpenings::new(&spec, Representation::Solid)
            .with_embrasure(0.2)
            .execute(&mut env)
            .unwrap();
        assert_eq!(cut, 1);
        let report = CheckClosure::facets(&env.shell());
        assert!(report.is_closed(), "{report:?}");
    }

    #[test]
    fn outline_blocks_are_skipped() {
        let spec = spec();
        let body = MakeBody::new(Point3::origin(), 7.0, 9.0, HeightMode::Fixed(5.0))
            .execute()
            .unwrap();
        let mut env = MakeBlock::new(&body).with_body_walls(false).execute();
        let cut = AttachOpenings::new(&spec, Representation::Semantic)
            .execute(&mut env)
            .unwrap();
        assert_eq!(cut, 0);
    }
}
