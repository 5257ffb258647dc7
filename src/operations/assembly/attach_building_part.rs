use crate::error::Result;
use crate::math::{Point3, TOLERANCE};
use crate::model::{Facet, Ring, SemanticSurface};
use crate::operations::creation::BodyCorners;
use crate::spec::{BuildingPart, PartType, Side};

use super::envelope::same;
use super::{Envelope, Notch};

/// Where a building part ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartPlacement {
    /// Merged into the envelope through a notch in the east wall.
    Attached,
    /// Added as a separate closed volume.
    Detached,
    /// Lies entirely under the roof outline; nothing was added.
    Covered,
}

/// Adds a garage or alcove to the east of an envelope.
///
/// The part spans from `x_start` to the building's east wall plus the part
/// width. When `x_start` is the envelope's east wall and the part is lower
/// than that wall, the wall is notched around the part and both share one
/// shell; otherwise the part gets its own west face and stands apart.
/// Parts that end within the roof outline are left out.
pub struct AttachBuildingPart<'a> {
    part: &'a BuildingPart,
    building: &'a BodyCorners,
    x_start: f64,
    cover_x: f64,
}

impl<'a> AttachBuildingPart<'a> {
    /// Creates a new `AttachBuildingPart` operation.
    ///
    /// * `building` - Box on the building's wall lines.
    /// * `x_start` - Where the part begins: the envelope's east wall.
    #[must_use]
    pub fn new(part: &'a BuildingPart, building: &'a BodyCorners, x_start: f64) -> Self {
        Self {
            part,
            building,
            x_start,
            cover_x: x_start,
        }
    }

    /// East edge of the roof outline; a part ending short of it is covered.
    #[must_use]
    pub fn with_cover(mut self, x: f64) -> Self {
        self.cover_x = x.max(self.x_start);
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the part's faces are degenerate.
    pub fn execute(&self, envelope: &mut Envelope) -> Result<PartPlacement> {
        let part = self.part;
        let base = self.building.base_z();
        let top = base + part.height;
        let y0 = self.building.min().y + part.offset;
        let y1 = y0 + part.depth;
        let xs = self.x_start;
        let xe = self.building.max().x + part.width;
        if xe <= self.cover_x + TOLERANCE {
            return Ok(PartPlacement::Covered);
        }

        let at = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let quad = |points: [Point3; 4], semantic| Facet::new(Ring::from_points(points), semantic);
        let top_tag = match part.part_type {
            PartType::Garage => SemanticSurface::Roof,
            PartType::Alcove => SemanticSurface::OuterFloor,
        };
        let mut faces = vec![
            quad(
                [at(xs, y0, base), at(xe, y0, base), at(xe, y0, top), at(xs, y0, top)],
                SemanticSurface::Wall,
            ),
            quad(
                [at(xe, y0, base), at(xe, y1, base), at(xe, y1, top), at(xe, y0, top)],
                SemanticSurface::Wall,
            ),
            quad(
                [at(xe, y1, base), at(xs, y1, base), at(xs, y1, top), at(xe, y1, top)],
                SemanticSurface::Wall,
            ),
            quad(
                [at(xs, y0, top), at(xe, y0, top), at(xe, y1, top), at(xs, y1, top)],
                top_tag,
            ),
            quad(
                [at(xs, y0, base), at(xs, y1, base), at(xe, y1, base), at(xe, y0, base)],
                SemanticSurface::Ground,
            ),
        ];
        for face in &faces {
            face.exterior.normal()?;
        }

        let wall = envelope.wall_mut(Side::East).filter(|w| {
            let wall_x = w.outline().first().map_or(f64::NAN, |p| p.x);
            same(wall_x, xs) && top < w.top_z() - TOLERANCE
        });
        match wall {
            Some(wall) => {
                wall.notches.push(Notch {
                    distance: part.offset,
                    wall: vec![at(xs, y0, base), at(xs, y0, top), at(xs, y1, top), at(xs, y1, base)],
                    ground: vec![at(xs, y1, base), at(xs, y0, base)],
                });
                envelope.extras.append(&mut faces);
                Ok(PartPlacement::Attached)
            }
            None => {
                faces.push(quad(
                    [at(xs, y1, base), at(xs, y0, base), at(xs, y0, top), at(xs, y1, top)],
                    SemanticSurface::Wall,
                ));
                envelope.detached.push(faces);
                Ok(PartPlacement::Detached)
            }
        }
    }
}
