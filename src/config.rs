//! Build configuration and the LOD variant catalog.
//!
//! Each [`LodVariant`] is a `(FootprintRule, HeightRule, Representation)`
//! triple plus the feature set to model; one generic builder interprets it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which outline the variant's footprint follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FootprintRule {
    /// The walls of the building.
    Walls,
    /// The roof outline including overhangs, at the corrected eave.
    RoofOutline,
}

/// How the variant's height is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeightRule {
    /// A single horizontal footprint polygon.
    Footprint,
    /// A box up to the eaves.
    Eaves,
    /// A box up to the eaves plus a fraction of the roof rise.
    RoofFraction(f64),
    /// A box up to the ridge.
    Ridge,
    /// The modelled roof.
    Roof,
}

/// Output representation of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Representation {
    /// Untagged polygons, no holes.
    Plain,
    /// Closed shells.
    Solid,
    /// Tagged boundary surfaces with openings.
    Semantic,
}

/// Optional parts of the model included in a variant.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSet {
    /// Dormers, roof windows and chimneys.
    pub roof_features: bool,
    /// Doors and windows.
    pub openings: bool,
    /// Reveals around doors and windows.
    pub embrasures: bool,
    /// The garage or alcove.
    pub building_part: bool,
    /// Storeys and attic.
    pub interior: bool,
}

impl FeatureSet {
    /// No optional parts.
    pub const NONE: Self = Self {
        roof_features: false,
        openings: false,
        embrasures: false,
        building_part: false,
        interior: false,
    };

    /// Adds roof features.
    #[must_use]
    pub const fn roof_features(mut self) -> Self {
        self.roof_features = true;
        self
    }

    /// Adds doors and windows.
    #[must_use]
    pub const fn openings(mut self) -> Self {
        self.openings = true;
        self
    }

    /// Adds doors and windows with their reveals.
    #[must_use]
    pub const fn embrasures(mut self) -> Self {
        self.openings = true;
        self.embrasures = true;
        self
    }

    /// Adds the building part.
    #[must_use]
    pub const fn building_part(mut self) -> Self {
        self.building_part = true;
        self
    }

    /// Adds storeys and attic.
    #[must_use]
    pub const fn interior(mut self) -> Self {
        self.interior = true;
        self
    }
}

/// One entry of the LOD catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodVariant {
    pub name: String,
    pub footprint: FootprintRule,
    pub height: HeightRule,
    pub representation: Representation,
    #[serde(default)]
    pub features: FeatureSet,
}

impl LodVariant {
    /// Creates a variant without optional features.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        footprint: FootprintRule,
        height: HeightRule,
        representation: Representation,
    ) -> Self {
        Self {
            name: name.into(),
            footprint,
            height,
            representation,
            features: FeatureSet::NONE,
        }
    }

    /// Sets the optional features.
    #[must_use]
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }
}

/// Exclusive upper bound of [`HeightRule::RoofFraction`].
pub const MAX_ROOF_FRACTION: f64 = 1.5;

fn default_true() -> bool {
    true
}

/// Configuration shared by every build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Variants to produce for each building, in order.
    pub variants: Vec<LodVariant>,
    /// Reject buildings whose features do not fit their hosts.
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Thickness of the roof skin for the attic; the wall thickness when unset.
    #[serde(default)]
    pub interior_thickness: Option<f64>,
    /// Fraction digits used when rendering coordinate lists.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

fn default_decimals() -> usize {
    3
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            variants: default_catalog(),
            validate: true,
            interior_thickness: None,
            decimals: default_decimals(),
        }
    }
}

impl BuildConfig {
    /// Parses a configuration from JSON and checks it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if [`BuildConfig::check`] fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Restricts the catalog to the named variants, keeping catalog order.
    #[must_use]
    pub fn with_variants(mut self, names: &[&str]) -> Self {
        self.variants.retain(|v| names.contains(&v.name.as_str()));
        self
    }

    /// Sets whether buildings are validated before they are built.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Looks up a variant by name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&LodVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Checks for duplicate names and out-of-range parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn check(&self) -> Result<(), ConfigError> {
        for (i, variant) in self.variants.iter().enumerate() {
            if variant.name.is_empty() {
                return Err(ConfigError::Invalid(format!("variant {i} has no name")));
            }
            if self.variants[..i].iter().any(|v| v.name == variant.name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate variant name {}",
                    variant.name
                )));
            }
            // fractions past 1 raise the block above the ridge
            if let HeightRule::RoofFraction(f) = variant.height {
                if !(0.0..MAX_ROOF_FRACTION).contains(&f) {
                    return Err(ConfigError::Invalid(format!(
                        "{}: roof fraction {f} outside [0, {MAX_ROOF_FRACTION})",
                        variant.name
                    )));
                }
            }
        }
        if let Some(t) = self.interior_thickness {
            if t <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "interior thickness {t} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// The built-in catalog, from footprints (LOD0) to interiors (LOD3.3).
#[must_use]
pub fn default_catalog() -> Vec<LodVariant> {
    use FootprintRule::{RoofOutline, Walls};
    use HeightRule::{Eaves, Footprint, Ridge, Roof, RoofFraction};
    use Representation::{Plain, Semantic, Solid};

    let detailed = FeatureSet::NONE.roof_features().building_part();
    vec![
        LodVariant::new("LOD0.0", Walls, Footprint, Plain),
        LodVariant::new("LOD0.1", RoofOutline, Footprint, Plain),
        LodVariant::new("LOD1.0", Walls, Eaves, Solid),
        LodVariant::new("LOD1.1", Walls, RoofFraction(0.5), Solid),
        LodVariant::new("LOD1.2", RoofOutline, Eaves, Solid),
        LodVariant::new("LOD1.3", Walls, Ridge, Solid),
        LodVariant::new("LOD2.0", Walls, Roof, Solid),
        LodVariant::new("LOD2.1", RoofOutline, Roof, Solid),
        LodVariant::new("LOD2.2", RoofOutline, Roof, Semantic).with_features(detailed),
        LodVariant::new("LOD3.0", RoofOutline, Roof, Semantic).with_features(detailed.openings()),
        LodVariant::new("LOD3.1", RoofOutline, Roof, Semantic)
            .with_features(detailed.embrasures()),
        LodVariant::new("LOD3.2", RoofOutline, Roof, Solid).with_features(detailed.embrasures()),
        LodVariant::new("LOD3.3", Walls, Roof, Solid)
            .with_features(FeatureSet::NONE.roof_features().interior()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let config = BuildConfig::default();
        config.check().unwrap();
        assert_eq!(config.variants.len(), 13);
        assert!(config.validate);
    }

    #[test]
    fn parses_partial_config() {
        let json = r#"{
            "variants": [
                { "name": "block", "footprint": "Walls", "height": { "RoofFraction": 0.25 },
                  "representation": "Solid" },
                { "name": "full", "footprint": "RoofOutline", "height": "Roof",
                  "representation": "Semantic", "features": { "openings": true } }
            ],
            "validate": false
        }"#;
        let config = BuildConfig::from_json(json).unwrap();
        assert!(!config.validate);
        assert_eq!(config.variants[0].height, HeightRule::RoofFraction(0.25));
        assert!(config.variants[1].features.openings);
        assert!(!config.variants[1].features.embrasures);
        assert_eq!(config.decimals, 3);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut config = BuildConfig::default();
        config.variants.push(config.variants[0].clone());
        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn fraction_range_ends_below_one_and_a_half() {
        let config = |f: f64| BuildConfig {
            variants: vec![LodVariant::new("x", FootprintRule::Walls, HeightRule::RoofFraction(f), Representation::Solid)],
            ..BuildConfig::default()
        };
        config(0.0).check().unwrap();
        config(1.25).check().unwrap();
        assert!(matches!(config(1.5).check(), Err(ConfigError::Invalid(_))));
        assert!(matches!(config(-0.1).check(), Err(ConfigError::Invalid(_))));

        let json = r#"{ "variants": [
            { "name": "x", "footprint": "Walls", "height": { "RoofFraction": 1.5 }, "representation": "Solid" }
        ] }"#;
        assert!(BuildConfig::from_json(json).is_err());
    }

    #[test]
    fn variants_can_be_selected_by_name() {
        let config = BuildConfig::default().with_variants(&["LOD2.0", "LOD1.0"]);
        let names: Vec<_> = config.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["LOD1.0", "LOD2.0"]);
    }
}
