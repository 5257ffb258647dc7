use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::spec::{RoofSpec, RoofType, Side};

use super::BodyCorners;

/// Ridge geometry of a roof, south end first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ridge {
    /// Flat roofs.
    None,
    /// A horizontal ridge line from the south end to the north end.
    Line([Point3; 2]),
    /// A single apex, where both ridge ends coincide.
    Apex(Point3),
}

impl Ridge {
    /// South end of the ridge.
    #[must_use]
    pub fn south(&self) -> Option<Point3> {
        match *self {
            Ridge::None => None,
            Ridge::Line([s, _]) => Some(s),
            Ridge::Apex(a) => Some(a),
        }
    }

    /// North end of the ridge.
    #[must_use]
    pub fn north(&self) -> Option<Point3> {
        match *self {
            Ridge::None => None,
            Ridge::Line([_, n]) => Some(n),
            Ridge::Apex(a) => Some(a),
        }
    }

    /// Distinct ridge points (0, 1 or 2).
    #[must_use]
    pub fn points(&self) -> Vec<Point3> {
        match *self {
            Ridge::None => Vec::new(),
            Ridge::Line(pts) => pts.to_vec(),
            Ridge::Apex(a) => vec![a],
        }
    }
}

/// Roof parameters resolved against a body.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofShape {
    roof: RoofSpec,
    width: f64,
    depth: f64,
    eave_z: f64,
    ridge: Ridge,
}

impl RoofShape {
    #[must_use]
    pub fn roof_type(&self) -> RoofType {
        self.roof.roof_type
    }

    /// Vertical rise from the eaves to the ridge.
    #[must_use]
    pub fn rise(&self) -> f64 {
        self.roof.rise
    }

    /// Ridge end inset from the depth edges, clamped to half the depth.
    #[must_use]
    pub fn ridge_offset(&self) -> f64 {
        self.roof.ridge_offset
    }

    /// Elevation of the eaves the roof rests on.
    #[must_use]
    pub fn eave_z(&self) -> f64 {
        self.eave_z
    }

    /// Highest elevation of the roof.
    #[must_use]
    pub fn ridge_z(&self) -> f64 {
        self.eave_z + self.roof.rise
    }

    #[must_use]
    pub fn ridge(&self) -> &Ridge {
        &self.ridge
    }

    /// Rise over run of the roof plane over `side`, `None` if no plane rises
    /// from that side.
    #[must_use]
    pub fn slope_ratio(&self, side: Side) -> Option<f64> {
        self.roof.slope_ratio(side, self.width, self.depth)
    }

    /// Horizontal run of the roof plane over `side`.
    #[must_use]
    pub fn slope_run(&self, side: Side) -> Option<f64> {
        self.roof.slope_run(side, self.width, self.depth)
    }
}

/// Computes the ridge of a roof over a body.
pub struct MakeRoofShape<'a> {
    body: &'a BodyCorners,
    roof: &'a RoofSpec,
}

impl<'a> MakeRoofShape<'a> {
    /// Creates a new `MakeRoofShape` operation.
    #[must_use]
    pub fn new(body: &'a BodyCorners, roof: &'a RoofSpec) -> Self {
        Self { body, roof }
    }

    /// Executes the operation.
    ///
    /// The ridge rises `rise` above the body top, which is taken as the eave
    /// elevation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a negative rise or ridge
    /// offset.
    pub fn execute(&self) -> Result<RoofShape> {
        let mut roof = self.roof.clone();
        if roof.rise < 0.0 || roof.ridge_offset < 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "{} roof with rise {} and ridge offset {}",
                roof.roof_type, roof.rise, roof.ridge_offset
            ))
            .into());
        }

        let min = self.body.min();
        let max = self.body.max();
        let eave_z = self.body.top_z();
        let depth = self.body.depth();
        let mid_x = 0.5 * (min.x + max.x);
        let ridge_z = eave_z + roof.rise;
        let at = |x: f64, y: f64| Point3::new(x, y, ridge_z);

        let ridge = match roof.roof_type {
            RoofType::Flat => {
                roof.rise = 0.0;
                Ridge::None
            }
            RoofType::Shed => Ridge::Line([at(min.x, min.y), at(min.x, max.y)]),
            RoofType::Gabled => Ridge::Line([at(mid_x, min.y), at(mid_x, max.y)]),
            RoofType::Hipped | RoofType::Pyramidal => {
                roof.ridge_offset = roof.ridge_offset.min(0.5 * depth);
                if depth - 2.0 * roof.ridge_offset < TOLERANCE {
                    Ridge::Apex(at(mid_x, 0.5 * (min.y + max.y)))
                } else {
                    Ridge::Line([
                        at(mid_x, min.y + roof.ridge_offset),
                        at(mid_x, max.y - roof.ridge_offset),
                    ])
                }
            }
        };

        Ok(RoofShape {
            roof,
            width: self.body.width(),
            depth,
            eave_z,
            ridge,
        })
    }
}
