use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::math::Point3;

use super::{
    BuildingPart, BuildingSpec, RoofFeature, RoofSpec, RoofType, Side, WallOpening,
};

/// One building as produced by the random city generator.
///
/// Field names follow the generator's `<building>` records. Conversion into a
/// [`BuildingSpec`] validates enums and side indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    #[serde(default)]
    pub id: String,
    pub origin: [f64; 3],
    #[serde(default)]
    pub order: Option<[u32; 2]>,
    #[serde(default)]
    pub rotation: f64,
    pub x_size: f64,
    pub y_size: f64,
    pub z_size: f64,
    #[serde(default = "default_floors")]
    pub floors: u32,
    #[serde(default)]
    pub floor_height: Option<f64>,
    #[serde(default)]
    pub embrasure: f64,
    #[serde(default = "default_thickness")]
    pub wall_thickness: f64,
    #[serde(default = "default_thickness")]
    pub joist: f64,
    pub roof: RoofRecord,
    #[serde(default)]
    pub door: Option<OpeningRecord>,
    #[serde(default)]
    pub windows: Vec<OpeningRecord>,
    #[serde(default)]
    pub building_part: Option<PartRecord>,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
}

fn default_floors() -> u32 {
    1
}

fn default_thickness() -> f64 {
    0.2
}

/// The `<roof>` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofRecord {
    pub roof_type: String,
    #[serde(default)]
    pub h: Option<f64>,
    #[serde(default)]
    pub r: Option<f64>,
    #[serde(default)]
    pub overhangs: OverhangRecord,
    #[serde(default)]
    pub dormers: Vec<FeatureRecord>,
    #[serde(default)]
    pub roof_windows: Vec<FeatureRecord>,
    /// Single chimney as written by the generator.
    #[serde(default)]
    pub chimney: Option<FeatureRecord>,
    #[serde(default)]
    pub chimneys: Vec<FeatureRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverhangRecord {
    #[serde(default)]
    pub xlength: f64,
    #[serde(default)]
    pub ylength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalOrigin {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRecord {
    pub width: f64,
    pub height: f64,
}

/// A door or window record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRecord {
    pub wall: u8,
    /// Embrasure depth repeated per window by the generator; informational.
    #[serde(default)]
    pub depth: Option<f64>,
    pub origin: LocalOrigin,
    pub size: SizeRecord,
}

impl TryFrom<&OpeningRecord> for WallOpening {
    type Error = SpecError;

    fn try_from(record: &OpeningRecord) -> Result<Self, Self::Error> {
        Ok(WallOpening::new(
            Side::try_from(record.wall)?,
            record.origin.x,
            record.origin.y,
            record.size.width,
            record.size.height,
        ))
    }
}

/// A dormer, roof window or chimney record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub side: u8,
    pub origin: LocalOrigin,
    pub size: SizeRecord,
}

impl TryFrom<&FeatureRecord> for RoofFeature {
    type Error = SpecError;

    fn try_from(record: &FeatureRecord) -> Result<Self, Self::Error> {
        Ok(RoofFeature::new(
            Side::try_from(record.side)?,
            record.origin.x,
            record.origin.y,
            record.size.width,
            record.size.height,
        ))
    }
}

/// The `<buildingPart>` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub part_type: String,
    pub part_origin: f64,
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

fn features(records: &[FeatureRecord]) -> Result<Vec<RoofFeature>, SpecError> {
    records.iter().map(RoofFeature::try_from).collect()
}

impl TryFrom<BuildingRecord> for BuildingSpec {
    type Error = SpecError;

    fn try_from(record: BuildingRecord) -> Result<Self, Self::Error> {
        let roof_type: RoofType = record.roof.roof_type.parse()?;
        let rise = || {
            record.roof.h.ok_or(SpecError::MissingRoofParameter {
                roof: roof_type.name(),
                parameter: "h",
            })
        };
        let roof = match roof_type {
            RoofType::Flat => RoofSpec::flat(),
            RoofType::Shed => RoofSpec::shed(rise()?),
            RoofType::Gabled => RoofSpec::gabled(rise()?),
            RoofType::Hipped => {
                let r = record.roof.r.ok_or(SpecError::MissingRoofParameter {
                    roof: roof_type.name(),
                    parameter: "r",
                })?;
                RoofSpec::hipped(rise()?, r)
            }
            RoofType::Pyramidal => match record.roof.r {
                Some(r) => RoofSpec {
                    ridge_offset: r,
                    ..RoofSpec::pyramidal(rise()?, record.y_size)
                },
                None => RoofSpec::pyramidal(rise()?, record.y_size),
            },
        }
        .with_overhangs(record.roof.overhangs.xlength, record.roof.overhangs.ylength);

        let [x, y, z] = record.origin;
        let mut spec = BuildingSpec::new(
            Point3::new(x, y, z),
            record.x_size,
            record.y_size,
            record.z_size,
            roof,
        );
        spec.id = record.id;
        spec.order = record.order;
        spec.rotation = record.rotation;
        spec.floors = record.floors;
        spec.floor_height = record
            .floor_height
            .unwrap_or(record.z_size / f64::from(record.floors.max(1)));
        spec.embrasure = record.embrasure;
        spec.wall_thickness = record.wall_thickness;
        spec.joist = record.joist;
        spec.properties = record.properties;

        spec.door = record.door.as_ref().map(WallOpening::try_from).transpose()?;
        spec.windows = record
            .windows
            .iter()
            .map(WallOpening::try_from)
            .collect::<Result<_, _>>()?;
        spec.dormers = features(&record.roof.dormers)?;
        spec.roof_windows = features(&record.roof.roof_windows)?;
        spec.chimneys = record
            .roof
            .chimney
            .iter()
            .chain(&record.roof.chimneys)
            .map(RoofFeature::try_from)
            .collect::<Result<_, _>>()?;

        spec.part = record
            .building_part
            .map(|part| -> Result<BuildingPart, SpecError> {
                Ok(BuildingPart {
                    part_type: part.part_type.parse()?,
                    offset: part.part_origin,
                    width: part.width,
                    depth: part.length,
                    height: part.height,
                })
            })
            .transpose()?;

        Ok(spec)
    }
}
