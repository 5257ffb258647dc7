use crate::error::SpecError;
use crate::math::TOLERANCE;

use super::{BuildingSpec, RoofFeature, WallOpening};

/// Slack allowed when comparing feature extents against their host.
const SLACK: f64 = 1e-6;

/// Checks that openings, roof features and the building part fit their hosts.
///
/// Builds are allowed to skip this step; unchecked out-of-range features
/// then yield self-intersecting geometry instead of an error.
pub struct ValidateSpec<'a> {
    spec: &'a BuildingSpec,
}

impl<'a> ValidateSpec<'a> {
    /// Creates a new `ValidateSpec` operation.
    #[must_use]
    pub fn new(spec: &'a BuildingSpec) -> Self {
        Self { spec }
    }

    /// Runs every check, stopping at the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::FeatureOutOfBounds`] for a feature outside its
    /// host and [`SpecError::NoRoofSlope`] for a roof feature on a side the
    /// roof type cannot host it on.
    pub fn execute(&self) -> Result<(), SpecError> {
        for (opening, kind) in self.spec.wall_openings() {
            let name = match kind {
                super::OpeningKind::Door => "door",
                super::OpeningKind::Window => "window",
            };
            self.check_opening(name, opening)?;
        }
        for dormer in &self.spec.dormers {
            let ratio = self.ratio(dormer)?;
            if ratio < TOLERANCE {
                return Err(self.no_slope(dormer));
            }
            self.check_roof_feature("dormer", dormer, dormer.height / ratio)?;
        }
        for window in &self.spec.roof_windows {
            self.ratio(window)?;
            self.check_roof_feature("roof window", window, window.height)?;
        }
        for chimney in &self.spec.chimneys {
            self.ratio(chimney)?;
            self.check_roof_feature("chimney", chimney, chimney.width)?;
        }
        self.check_part()
    }

    fn check_opening(&self, name: &'static str, opening: &WallOpening) -> Result<(), SpecError> {
        let length = self.spec.side_length(opening.side);
        let x = opening.origin.x;
        let y = opening.origin.y;
        if opening.width <= 0.0 || opening.height <= 0.0 {
            return Err(out_of_bounds(name, format!("non-positive size on {} wall", opening.side)));
        }
        if x < -SLACK || x + opening.width > length + SLACK {
            return Err(out_of_bounds(
                name,
                format!("spans [{x}, {}] on {} wall of length {length}", x + opening.width, opening.side),
            ));
        }
        // a reveal flush with a corner would lie in the neighbouring wall
        let clearance = self.spec.embrasure.max(0.0);
        if clearance > 0.0 && (x < clearance - SLACK || x + opening.width > length - clearance + SLACK) {
            return Err(out_of_bounds(
                name,
                format!(
                    "spans [{x}, {}] on {} wall, reveals of depth {clearance} need [{clearance}, {}]",
                    x + opening.width,
                    opening.side,
                    length - clearance
                ),
            ));
        }
        let wall_top = self.spec.wall_top();
        if y < -SLACK || y + opening.height > wall_top + SLACK {
            return Err(out_of_bounds(
                name,
                format!("spans [{y}, {}] vertically, wall height is {wall_top}", y + opening.height),
            ));
        }
        Ok(())
    }

    fn ratio(&self, feature: &RoofFeature) -> Result<f64, SpecError> {
        self.spec
            .roof
            .slope_ratio(feature.side, self.spec.width, self.spec.depth)
            .ok_or_else(|| self.no_slope(feature))
    }

    fn no_slope(&self, feature: &RoofFeature) -> SpecError {
        SpecError::NoRoofSlope {
            roof: self.spec.roof.roof_type.name(),
            side: feature.side.name(),
        }
    }

    /// Checks the plan rectangle `[X, X + w] × [Y, Y + extent]` against the
    /// slope's trapezoid: run toward the ridge and eave length shortened by
    /// the hip lines.
    fn check_roof_feature(
        &self,
        name: &'static str,
        feature: &RoofFeature,
        extent: f64,
    ) -> Result<(), SpecError> {
        let spec = self.spec;
        let side = feature.side;
        let run = spec.roof.slope_run(side, spec.width, spec.depth).unwrap_or(0.0);
        let length = spec.side_length(side);
        let rate = spec.roof.hip_rate(side, spec.width);
        let x = feature.origin.x;
        let y = feature.origin.y;
        let top = y + extent;

        if feature.width <= 0.0 || extent <= 0.0 {
            return Err(out_of_bounds(name, format!("non-positive size on {side} roof side")));
        }
        if y < -SLACK || top > run + SLACK {
            return Err(out_of_bounds(
                name,
                format!("reaches [{y}, {top}] toward the ridge, run on {side} side is {run}"),
            ));
        }
        let inset = rate * top;
        if x < inset - SLACK || x + feature.width > length - inset + SLACK {
            return Err(out_of_bounds(
                name,
                format!(
                    "spans [{x}, {}] along {side} eave, usable range is [{inset}, {}]",
                    x + feature.width,
                    length - inset
                ),
            ));
        }
        Ok(())
    }

    fn check_part(&self) -> Result<(), SpecError> {
        let Some(part) = &self.spec.part else {
            return Ok(());
        };
        if part.width <= 0.0 || part.depth <= 0.0 || part.height <= 0.0 {
            return Err(out_of_bounds("building part", "non-positive size".into()));
        }
        if part.offset < -SLACK || part.offset + part.depth > self.spec.depth + SLACK {
            return Err(out_of_bounds(
                "building part",
                format!(
                    "spans [{}, {}] along the east wall of length {}",
                    part.offset,
                    part.offset + part.depth,
                    self.spec.depth
                ),
            ));
        }
        if part.height > self.spec.eave_height + SLACK {
            return Err(out_of_bounds(
                "building part",
                format!("height {} exceeds eave height {}", part.height, self.spec.eave_height),
            ));
        }
        Ok(())
    }
}

fn out_of_bounds(feature: &'static str, detail: String) -> SpecError {
    SpecError::FeatureOutOfBounds { feature, detail }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::spec::{BuildingPart, PartType, RoofSpec, Side};

    fn gabled() -> BuildingSpec {
        BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::gabled(3.0))
    }

    #[test]
    fn in_range_features_pass() {
        let spec = gabled()
            .with_door(WallOpening::new(Side::South, 2.0, 0.0, 1.0, 2.1))
            .with_window(WallOpening::new(Side::East, 1.0, 1.0, 1.2, 1.2))
            .with_dormer(RoofFeature::new(Side::East, 2.0, 0.5, 1.5, 1.0))
            .with_chimney(RoofFeature::new(Side::West, 4.0, 2.6, 0.3, 1.0));
        ValidateSpec::new(&spec).execute().unwrap();
    }

    #[test]
    fn window_past_wall_end_is_rejected() {
        let spec = gabled().with_window(WallOpening::new(Side::South, 5.5, 1.0, 1.0, 1.0));
        let err = ValidateSpec::new(&spec).execute().unwrap_err();
        assert!(matches!(err, SpecError::FeatureOutOfBounds { feature: "window", .. }));
    }

    #[test]
    fn window_under_the_dropped_eave_is_rejected() {
        // overhang 0.4 on a 3.0 run with rise 3.0 lowers the walls to 5.6
        let roof = RoofSpec::gabled(3.0).with_overhangs(0.4, 0.4);
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 9.0, 6.0, roof)
            .with_window(WallOpening::new(Side::East, 2.0, 4.6, 1.0, 1.4));
        assert!((spec.wall_top() - 5.6).abs() < 1e-12);
        let err = ValidateSpec::new(&spec).execute().unwrap_err();
        assert!(matches!(err, SpecError::FeatureOutOfBounds { feature: "window", .. }));

        let lowered = BuildingSpec {
            windows: vec![WallOpening::new(Side::East, 2.0, 4.2, 1.0, 1.4)],
            ..spec
        };
        ValidateSpec::new(&lowered).execute().unwrap();
    }

    #[test]
    fn reveals_must_clear_the_corners() {
        let spec = gabled()
            .with_embrasure(0.2)
            .with_window(WallOpening::new(Side::West, 0.0, 1.0, 1.0, 1.4));
        let err = ValidateSpec::new(&spec).execute().unwrap_err();
        assert!(matches!(err, SpecError::FeatureOutOfBounds { feature: "window", .. }));

        let flush = gabled().with_window(WallOpening::new(Side::West, 0.0, 1.0, 1.0, 1.4));
        ValidateSpec::new(&flush).execute().unwrap();
        let cleared = gabled()
            .with_embrasure(0.2)
            .with_window(WallOpening::new(Side::West, 0.2, 1.0, 1.0, 1.4));
        ValidateSpec::new(&cleared).execute().unwrap();
    }

    #[test]
    fn dormer_past_ridge_is_rejected() {
        // ratio 1.0, so a 2.5 high front needs 2.5 of run; only 3.0 - 1.0 is left
        let spec = gabled().with_dormer(RoofFeature::new(Side::East, 1.0, 1.0, 1.0, 2.5));
        let err = ValidateSpec::new(&spec).execute().unwrap_err();
        assert!(matches!(err, SpecError::FeatureOutOfBounds { feature: "dormer", .. }));
    }

    #[test]
    fn dormer_on_gable_end_has_no_slope() {
        let spec = gabled().with_dormer(RoofFeature::new(Side::South, 1.0, 0.5, 1.0, 1.0));
        let err = ValidateSpec::new(&spec).execute().unwrap_err();
        assert!(matches!(err, SpecError::NoRoofSlope { side: "south", .. }));
    }

    #[test]
    fn dormer_on_flat_roof_has_no_slope() {
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::flat())
            .with_dormer(RoofFeature::new(Side::East, 1.0, 0.5, 1.0, 1.0));
        assert!(matches!(
            ValidateSpec::new(&spec).execute(),
            Err(SpecError::NoRoofSlope { .. })
        ));
    }

    #[test]
    fn hip_lines_shorten_the_eave() {
        let spec = BuildingSpec::new(Point3::origin(), 6.0, 8.0, 5.0, RoofSpec::hipped(3.0, 2.0))
            .with_chimney(RoofFeature::new(Side::East, 0.2, 2.0, 0.3, 1.0));
        // at plan depth 2.3 the hip has moved 2.3 * 2/3 along the eave
        assert!(ValidateSpec::new(&spec).execute().is_err());
    }

    #[test]
    fn part_longer_than_wall_is_rejected() {
        let spec = gabled().with_part(BuildingPart {
            part_type: PartType::Alcove,
            offset: 6.0,
            width: 2.0,
            depth: 3.0,
            height: 2.5,
        });
        assert!(ValidateSpec::new(&spec).execute().is_err());
    }
}
