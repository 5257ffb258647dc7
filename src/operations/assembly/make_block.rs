use crate::model::{Facet, Ring, SemanticSurface};
use crate::operations::creation::BodyCorners;
use crate::spec::Side;

use super::{Envelope, RoofFacet, Wall};

/// Builds the envelope of a flat-topped box.
pub struct MakeBlock<'a> {
    body: &'a BodyCorners,
    body_walls: bool,
}

impl<'a> MakeBlock<'a> {
    /// Creates a new `MakeBlock` operation for a box on the wall lines.
    #[must_use]
    pub fn new(body: &'a BodyCorners) -> Self {
        Self {
            body,
            body_walls: true,
        }
    }

    /// Marks whether the box stands on the building's wall lines.
    #[must_use]
    pub fn with_body_walls(mut self, body_walls: bool) -> Self {
        self.body_walls = body_walls;
        self
    }

    /// Executes the operation: four walls and a flat roof.
    #[must_use]
    pub fn execute(&self) -> Envelope {
        let walls = Side::ALL
            .iter()
            .map(|&side| Wall::of_box(self.body, side))
            .collect();
        let top = Facet::new(Ring::from_points(self.body.top_ring()), SemanticSurface::Roof);
        Envelope {
            body: *self.body,
            walls,
            roof: vec![RoofFacet {
                side: None,
                facet: top,
            }],
            extras: Vec::new(),
            closure: None,
            ground_holes: Vec::new(),
            detached: Vec::new(),
            roof_frame: None,
            body_walls: self.body_walls,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{HeightMode, MakeBody};
    use crate::operations::query::CheckClosure;

    #[test]
    fn block_is_six_closed_quads() {
        let body = MakeBody::new(Point3::origin(), 5.0, 4.0, HeightMode::Fixed(6.0))
            .execute()
            .unwrap();
        let shell = MakeBlock::new(&body).execute().shell();
        assert_eq!(shell.len(), 6);
        assert!(shell.iter().all(|f| f.exterior.len() == 4));
        assert!(CheckClosure::facets(&shell).is_closed());
        assert!(shell[0].exterior.normal().unwrap().z < -0.999);
    }
}
