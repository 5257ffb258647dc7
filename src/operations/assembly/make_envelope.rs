use crate::error::{GeometryError, Result};
use crate::math::Point3;
use crate::model::{Facet, Ring, SemanticSurface};
use crate::operations::creation::{BodyCorners, Ridge, RoofShape};
use crate::operations::roof::Overhang;
use crate::spec::{PerSide, RoofType, Side};

use super::{Envelope, RoofFacet, RoofFrame, Wall};

/// Builds the envelope of a building with its modelled roof.
///
/// Without an overhang the walls rise to the roof, with gable or shed
/// triangles where the roof type leaves them open. With an overhang the
/// walls stop at the corrected eave and the roof is built on the overhang
/// outline, closed underneath by the soffit and at the ends by the fascia.
pub struct MakeEnvelope<'a> {
    body: &'a BodyCorners,
    shape: &'a RoofShape,
    overhang: Option<&'a Overhang>,
}

impl<'a> MakeEnvelope<'a> {
    /// Creates a new `MakeEnvelope` operation.
    #[must_use]
    pub fn new(body: &'a BodyCorners, shape: &'a RoofShape) -> Self {
        Self {
            body,
            shape,
            overhang: None,
        }
    }

    /// Extends the roof over the given overhang.
    #[must_use]
    pub fn with_overhang(mut self, overhang: Option<&'a Overhang>) -> Self {
        self.overhang = overhang;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if a pitched roof has no ridge.
    pub fn execute(&self) -> Result<Envelope> {
        match self.overhang {
            None => self.without_overhang(),
            Some(ovh) => self.with_cap(ovh),
        }
    }

    fn without_overhang(&self) -> Result<Envelope> {
        let body = self.body;
        let roof_type = self.shape.roof_type();
        let ridge = self.shape.ridge();
        let [b0, b1, b2, b3] = body.base_ring();
        let [e0, e1, e2, e3] = body.top_ring();

        let walls = match (roof_type, ridge.south(), ridge.north()) {
            (RoofType::Gabled, Some(rs), Some(rn)) => vec![
                Wall::new(Side::North, vec![b2, b3, e3, rn, e2]),
                Wall::of_box(body, Side::East),
                Wall::new(Side::South, vec![b0, b1, e1, rs, e0]),
                Wall::of_box(body, Side::West),
            ],
            (RoofType::Shed, Some(rs), Some(rn)) => vec![
                Wall::new(Side::North, vec![b2, b3, rn, e2]),
                Wall::of_box(body, Side::East),
                Wall::new(Side::South, vec![b0, b1, e1, rs]),
                Wall::new(Side::West, vec![b3, b0, rs, rn]),
            ],
            _ => Side::ALL.iter().map(|&s| Wall::of_box(body, s)).collect(),
        };

        Ok(Envelope {
            body: *body,
            walls,
            roof: roof_facets(roof_type, [e0, e1, e2, e3], ridge)?,
            extras: Vec::new(),
            closure: None,
            ground_holes: Vec::new(),
            detached: Vec::new(),
            roof_frame: Some(RoofFrame {
                outline: *body,
                shape: self.shape.clone(),
                offsets: PerSide::default(),
            }),
            body_walls: true,
        })
    }

    fn with_cap(&self, ovh: &Overhang) -> Result<Envelope> {
        let body = self.body.with_top(ovh.eave_z);
        let walls = Side::ALL.iter().map(|&s| Wall::of_box(&body, s)).collect();
        let roof = roof_facets(ovh.shape.roof_type(), ovh.outline.top_ring(), &ovh.ridge)?;

        let mut extras = ovh.soffit.clone();
        extras.extend(ovh.fascia.iter().cloned());

        Ok(Envelope {
            body,
            walls,
            roof,
            extras,
            closure: ovh.closure.clone(),
            ground_holes: Vec::new(),
            detached: Vec::new(),
            roof_frame: Some(RoofFrame {
                outline: ovh.outline,
                shape: ovh.shape.clone(),
                offsets: ovh.lengths,
            }),
            body_walls: true,
        })
    }
}

/// Roof surfaces over an eave ring `[SW, SE, NE, NW]`.
fn roof_facets(roof_type: RoofType, eaves: [Point3; 4], ridge: &Ridge) -> Result<Vec<RoofFacet>> {
    let [e0, e1, e2, e3] = eaves;
    let facet = |side: Option<Side>, points: Vec<Point3>| RoofFacet {
        side,
        facet: Facet::new(Ring::new(points), SemanticSurface::Roof),
    };

    if roof_type == RoofType::Flat {
        return Ok(vec![facet(None, vec![e0, e1, e2, e3])]);
    }
    let (Some(rs), Some(rn)) = (ridge.south(), ridge.north()) else {
        return Err(GeometryError::Degenerate(format!("{roof_type} roof without a ridge")).into());
    };

    let east = facet(Some(Side::East), vec![e1, e2, rn, rs]);
    let west = facet(Some(Side::West), vec![e3, e0, rs, rn]);
    Ok(match roof_type {
        RoofType::Shed => vec![east],
        RoofType::Gabled => vec![east, west],
        _ => vec![
            east,
            west,
            facet(Some(Side::South), vec![e0, e1, rs]),
            facet(Some(Side::North), vec![e2, e3, rn]),
        ],
    })
}
