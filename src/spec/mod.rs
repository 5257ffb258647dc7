//! Parametric description of one building.
//!
//! A [`BuildingSpec`] is immutable for the duration of a build. It is either
//! constructed directly or converted from a [`BuildingRecord`] parsed from
//! the generator's record format.

mod record;
mod side;
mod validate;

use std::fmt;
use std::str::FromStr;

pub use record::BuildingRecord;
pub use side::{PerSide, Side};
pub use validate::ValidateSpec;

use crate::error::SpecError;
use crate::math::{Point2, Point3, TOLERANCE};

/// Roof shapes supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoofType {
    Flat,
    Shed,
    Gabled,
    Hipped,
    Pyramidal,
}

impl RoofType {
    /// Name as used in the input records.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RoofType::Flat => "Flat",
            RoofType::Shed => "Shed",
            RoofType::Gabled => "Gabled",
            RoofType::Hipped => "Hipped",
            RoofType::Pyramidal => "Pyramidal",
        }
    }

    /// `true` for every roof type with a rise above the eaves.
    #[must_use]
    pub fn is_pitched(self) -> bool {
        !matches!(self, RoofType::Flat)
    }

    /// `true` for the roof types whose ridge is inset from the depth edges.
    #[must_use]
    pub fn is_hipped(self) -> bool {
        matches!(self, RoofType::Hipped | RoofType::Pyramidal)
    }

    /// Drop of the eave edge below the wall top for an east/west overhang
    /// of `overhang` on a body of the given width.
    #[must_use]
    pub fn eave_drop(self, rise: f64, overhang: f64, width: f64) -> f64 {
        match self {
            RoofType::Flat => 0.0,
            RoofType::Shed => rise * overhang / width,
            RoofType::Gabled | RoofType::Hipped | RoofType::Pyramidal => rise * overhang / (0.5 * width),
        }
    }
}

impl FromStr for RoofType {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Flat" => Ok(RoofType::Flat),
            "Shed" => Ok(RoofType::Shed),
            "Gabled" => Ok(RoofType::Gabled),
            "Hipped" => Ok(RoofType::Hipped),
            "Pyramidal" => Ok(RoofType::Pyramidal),
            other => Err(SpecError::InvalidRoofType(other.to_owned())),
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Roof parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofSpec {
    /// Shape of the roof.
    pub roof_type: RoofType,
    /// Vertical rise above the eaves (`0` for flat roofs).
    pub rise: f64,
    /// Horizontal distance from the north/south eave edge to the ridge end
    /// (hipped and pyramidal roofs only).
    pub ridge_offset: f64,
    /// Overhang length beyond the east/west walls.
    pub overhang_x: f64,
    /// Overhang length beyond the north/south walls, as given in the input.
    ///
    /// Hipped and pyramidal roofs derive their effective value from
    /// `overhang_x`; see [`ProjectOverhang`](crate::operations::roof::ProjectOverhang).
    pub overhang_y: f64,
}

impl RoofSpec {
    /// A flat roof.
    #[must_use]
    pub fn flat() -> Self {
        Self::new(RoofType::Flat, 0.0, 0.0)
    }

    /// A shed roof rising `rise` toward the west wall.
    #[must_use]
    pub fn shed(rise: f64) -> Self {
        Self::new(RoofType::Shed, rise, 0.0)
    }

    /// A gabled roof with the ridge along the depth axis.
    #[must_use]
    pub fn gabled(rise: f64) -> Self {
        Self::new(RoofType::Gabled, rise, 0.0)
    }

    /// A hipped roof whose ridge ends `ridge_offset` from the depth edges.
    #[must_use]
    pub fn hipped(rise: f64, ridge_offset: f64) -> Self {
        Self::new(RoofType::Hipped, rise, ridge_offset)
    }

    /// A pyramidal roof over a footprint of the given depth.
    #[must_use]
    pub fn pyramidal(rise: f64, depth: f64) -> Self {
        Self::new(RoofType::Pyramidal, rise, 0.5 * depth)
    }

    fn new(roof_type: RoofType, rise: f64, ridge_offset: f64) -> Self {
        Self {
            roof_type,
            rise,
            ridge_offset,
            overhang_x: 0.0,
            overhang_y: 0.0,
        }
    }

    /// Sets the overhang lengths.
    #[must_use]
    pub fn with_overhangs(mut self, x: f64, y: f64) -> Self {
        self.overhang_x = x;
        self.overhang_y = y;
        self
    }

    /// `true` if any overhang length is non-zero.
    #[must_use]
    pub fn has_overhangs(&self) -> bool {
        self.overhang_x > 0.0 || self.overhang_y > 0.0
    }

    /// Horizontal run of the roof plane over `side`, from the wall line to
    /// the ridge (or across the roof for flat and shed roofs).
    ///
    /// Returns `None` if the roof has no plane rising from that side.
    #[must_use]
    pub fn slope_run(&self, side: Side, width: f64, depth: f64) -> Option<f64> {
        let run = match (self.roof_type, side) {
            (RoofType::Flat, s) => {
                if s.runs_along_width() {
                    depth
                } else {
                    width
                }
            }
            (RoofType::Shed, Side::East) => width,
            (RoofType::Gabled, Side::East | Side::West) => 0.5 * width,
            (RoofType::Hipped | RoofType::Pyramidal, s) => {
                if s.runs_along_width() {
                    self.ridge_offset
                } else {
                    0.5 * width
                }
            }
            _ => return None,
        };
        (run > TOLERANCE).then_some(run)
    }

    /// Rise over run of the roof plane over `side`; `0` for flat roofs.
    #[must_use]
    pub fn slope_ratio(&self, side: Side, width: f64, depth: f64) -> Option<f64> {
        let run = self.slope_run(side, width, depth)?;
        Some(if self.roof_type.is_pitched() {
            self.rise / run
        } else {
            0.0
        })
    }

    /// Rate at which the usable eave length shrinks at each end per unit of
    /// plan distance toward the ridge (the hip lines).
    #[must_use]
    pub fn hip_rate(&self, side: Side, width: f64) -> f64 {
        if !self.roof_type.is_hipped() {
            return 0.0;
        }
        if side.runs_along_width() {
            if self.ridge_offset > TOLERANCE {
                0.5 * width / self.ridge_offset
            } else {
                0.0
            }
        } else {
            self.ridge_offset / (0.5 * width)
        }
    }
}

/// A door or window on one of the walls.
#[derive(Debug, Clone, PartialEq)]
pub struct WallOpening {
    /// Host wall.
    pub side: Side,
    /// Lower-left corner: distance along the wall from its start corner,
    /// height above the building base.
    pub origin: Point2,
    /// Width along the wall.
    pub width: f64,
    /// Vertical height.
    pub height: f64,
}

impl WallOpening {
    /// Creates a new wall opening.
    #[must_use]
    pub fn new(side: Side, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            side,
            origin: Point2::new(x, y),
            width,
            height,
        }
    }
}

/// A dormer, roof window or chimney placed on a roof side.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofFeature {
    /// Roof side hosting the feature.
    pub side: Side,
    /// Distance along the eave from the side's start corner, and plan
    /// distance from the wall line toward the ridge.
    pub origin: Point2,
    /// Width along the eave.
    pub width: f64,
    /// Dormers: vertical height of the front. Roof windows: plan extent
    /// toward the ridge. Chimneys: height of the cap above the highest
    /// base corner.
    pub height: f64,
}

impl RoofFeature {
    /// Creates a new roof feature.
    #[must_use]
    pub fn new(side: Side, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            side,
            origin: Point2::new(x, y),
            width,
            height,
        }
    }
}

/// Kind of building part attached to the east wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartType {
    Garage,
    Alcove,
}

impl FromStr for PartType {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Garage" => Ok(PartType::Garage),
            "Alcove" => Ok(PartType::Alcove),
            other => Err(SpecError::InvalidPartType(other.to_owned())),
        }
    }
}

/// A box-shaped part attached to the east wall.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPart {
    pub part_type: PartType,
    /// Offset of the part along the depth axis from the body's south edge.
    pub offset: f64,
    /// Extent beyond the east wall.
    pub width: f64,
    /// Extent along the depth axis.
    pub depth: f64,
    /// Height above the building base.
    pub height: f64,
}

/// Full parametric description of one building.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSpec {
    /// Identifier carried from the input record.
    pub id: String,
    /// South-west corner of the footprint at ground level.
    pub origin: Point3,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub depth: f64,
    /// Height of the eaves above the origin.
    pub eave_height: f64,
    pub roof: RoofSpec,
    pub wall_thickness: f64,
    pub joist: f64,
    pub floors: u32,
    pub floor_height: f64,
    pub door: Option<WallOpening>,
    pub windows: Vec<WallOpening>,
    pub dormers: Vec<RoofFeature>,
    pub roof_windows: Vec<RoofFeature>,
    pub chimneys: Vec<RoofFeature>,
    /// Depth of the reveal around doors and windows.
    pub embrasure: f64,
    pub part: Option<BuildingPart>,
    /// Rotation about the origin in degrees, counter-clockwise.
    pub rotation: f64,
    /// Position in the generator's grid, if any.
    pub order: Option<[u32; 2]>,
    /// Non-geometric attributes passed through untouched.
    pub properties: Option<serde_json::Value>,
}

impl BuildingSpec {
    /// Creates a building with a single storey and no openings or features.
    #[must_use]
    pub fn new(origin: Point3, width: f64, depth: f64, eave_height: f64, roof: RoofSpec) -> Self {
        Self {
            id: String::new(),
            origin,
            width,
            depth,
            eave_height,
            roof,
            wall_thickness: 0.2,
            joist: 0.2,
            floors: 1,
            floor_height: eave_height,
            door: None,
            windows: Vec::new(),
            dormers: Vec::new(),
            roof_windows: Vec::new(),
            chimneys: Vec::new(),
            embrasure: 0.0,
            part: None,
            rotation: 0.0,
            order: None,
            properties: None,
        }
    }

    /// Parses a single building record from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Parse`] for malformed JSON and the enum/index
    /// errors of [`BuildingSpec::try_from`] for invalid values.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let record: BuildingRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Parses an array of building records from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Parse`] if the document is not an array of
    /// records. Conversion errors are reported per building.
    pub fn batch_from_json(json: &str) -> Result<Vec<Result<Self, SpecError>>, SpecError> {
        let records: Vec<BuildingRecord> = serde_json::from_str(json)?;
        Ok(records.into_iter().map(Self::try_from).collect())
    }

    /// Sets the storey layout.
    #[must_use]
    pub fn with_storeys(mut self, floors: u32, floor_height: f64, joist: f64) -> Self {
        self.floors = floors;
        self.floor_height = floor_height;
        self.joist = joist;
        self
    }

    /// Sets the wall thickness.
    #[must_use]
    pub fn with_wall_thickness(mut self, thickness: f64) -> Self {
        self.wall_thickness = thickness;
        self
    }

    /// Sets the door.
    #[must_use]
    pub fn with_door(mut self, door: WallOpening) -> Self {
        self.door = Some(door);
        self
    }

    /// Adds a wall window.
    #[must_use]
    pub fn with_window(mut self, window: WallOpening) -> Self {
        self.windows.push(window);
        self
    }

    /// Adds a dormer.
    #[must_use]
    pub fn with_dormer(mut self, dormer: RoofFeature) -> Self {
        self.dormers.push(dormer);
        self
    }

    /// Adds a roof window.
    #[must_use]
    pub fn with_roof_window(mut self, window: RoofFeature) -> Self {
        self.roof_windows.push(window);
        self
    }

    /// Adds a chimney.
    #[must_use]
    pub fn with_chimney(mut self, chimney: RoofFeature) -> Self {
        self.chimneys.push(chimney);
        self
    }

    /// Sets the embrasure depth.
    #[must_use]
    pub fn with_embrasure(mut self, depth: f64) -> Self {
        self.embrasure = depth;
        self
    }

    /// Attaches a building part.
    #[must_use]
    pub fn with_part(mut self, part: BuildingPart) -> Self {
        self.part = Some(part);
        self
    }

    /// Sets the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Length of the footprint edge on `side`.
    #[must_use]
    pub fn side_length(&self, side: Side) -> f64 {
        if side.runs_along_width() {
            self.width
        } else {
            self.depth
        }
    }

    /// Top of the body walls: the eave height, lowered by the eave drop
    /// when the roof overhangs.
    #[must_use]
    pub fn wall_top(&self) -> f64 {
        let overhang = self.roof.overhang_x.max(0.0);
        if overhang < TOLERANCE && self.roof.overhang_y.max(0.0) < TOLERANCE {
            return self.eave_height;
        }
        self.eave_height - self.roof.roof_type.eave_drop(self.roof.rise, overhang, self.width)
    }

    /// Door followed by the windows, in input order.
    pub fn wall_openings(&self) -> impl Iterator<Item = (&WallOpening, OpeningKind)> {
        self.door
            .iter()
            .map(|d| (d, OpeningKind::Door))
            .chain(self.windows.iter().map(|w| (w, OpeningKind::Window)))
    }
}

/// Kind of an opening cut into a wall or roof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpeningKind {
    Door,
    Window,
}
