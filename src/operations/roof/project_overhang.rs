use crate::error::Result;
use crate::math::{Point3, TOLERANCE};
use crate::model::{Facet, Ring, SemanticSurface};
use crate::operations::creation::{BodyCorners, MakeRoofShape, Ridge, RoofShape};
use crate::spec::{PerSide, RoofSpec, RoofType, Side};

/// Roof extension beyond the walls.
#[derive(Debug, Clone)]
pub struct Overhang {
    /// Effective overhang per side. For hipped and pyramidal roofs the
    /// north/south value is derived from the east/west one.
    pub lengths: PerSide,
    /// Vertical drop of the eave edge below the wall-top elevation.
    pub drop: f64,
    /// Corrected eave elevation.
    pub eave_z: f64,
    /// Roof outline, base at the body base and top at the corrected eave.
    pub outline: BodyCorners,
    /// Roof resolved over the outline: same planes, extended to the eaves.
    pub shape: RoofShape,
    /// Ridge extended to the outline where the roof type requires it.
    pub ridge: Ridge,
    /// Underside of the overhang: one strip per side between the outline
    /// and the walls, mitred at the corners. Strips of zero width are left
    /// out.
    pub soffit: Vec<Facet>,
    /// Vertical faces closing the overhang where the roof edge lies above
    /// the corrected eave.
    pub fascia: Vec<Facet>,
    /// Surface over the body at the corrected eave, for flat and shed roofs.
    pub closure: Option<Facet>,
}

/// Projects the roof planes outward over the overhang lengths.
///
/// The eave drop follows from the roof's rise over run: an overhang of
/// length `l` on a slope `h / run` lowers the eave by `h · l / run`.
pub struct ProjectOverhang<'a> {
    body: &'a BodyCorners,
    shape: &'a RoofShape,
    roof: &'a RoofSpec,
}

impl<'a> ProjectOverhang<'a> {
    /// Creates a new `ProjectOverhang` operation.
    #[must_use]
    pub fn new(body: &'a BodyCorners, shape: &'a RoofShape, roof: &'a RoofSpec) -> Self {
        Self { body, shape, roof }
    }

    /// Executes the projection.
    ///
    /// Returns `None` when every effective overhang length is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if an overhang ring is degenerate.
    pub fn execute(&self) -> Result<Option<Overhang>> {
        let half_width = 0.5 * self.body.width();
        let rise = self.shape.rise();
        let ovh_x = self.roof.overhang_x.max(0.0);
        let mut ovh_y = self.roof.overhang_y.max(0.0);

        let roof_type = self.shape.roof_type();
        let drop = roof_type.eave_drop(rise, ovh_x, self.body.width());
        // how much the ridge rises above the outline's eave
        let raise = match roof_type {
            RoofType::Flat => 0.0,
            RoofType::Shed => 2.0 * drop,
            RoofType::Gabled => drop,
            RoofType::Hipped | RoofType::Pyramidal => {
                // keeps the eave edges coplanar with the hip faces
                ovh_y = ovh_x * self.shape.ridge_offset() / half_width;
                drop
            }
        };

        if ovh_x < TOLERANCE && ovh_y < TOLERANCE {
            return Ok(None);
        }

        let lengths = PerSide::axes(ovh_x, ovh_y);
        let eave_z = self.body.top_z() - drop;
        let outline = self.body.offset(lengths).with_top(eave_z);
        let extended = RoofSpec {
            roof_type: self.shape.roof_type(),
            rise: rise + raise,
            ridge_offset: self.shape.ridge_offset() + ovh_y,
            overhang_x: 0.0,
            overhang_y: 0.0,
        };
        let shape = MakeRoofShape::new(&outline, &extended).execute()?;
        let ridge = *shape.ridge();
        let eaves = outline.top_ring();
        let [e0, e1, e2, e3] = eaves;
        let body_ring = self.body.ring_at(eave_z);
        let soffit = Side::ALL
            .iter()
            .map(|side| {
                let (i, j) = (side.start_corner(), side.end_corner());
                Facet::new(
                    Ring::from_points([eaves[i], body_ring[i], body_ring[j], eaves[j]]),
                    SemanticSurface::OuterCeiling,
                )
            })
            .filter(|f| !f.exterior.is_degenerate())
            .collect();

        let wall = |points: Vec<Point3>| Facet::new(Ring::new(points), SemanticSurface::Wall);
        let fascia = match (self.shape.roof_type(), ridge.south(), ridge.north()) {
            (RoofType::Gabled, Some(rs), Some(rn)) => {
                vec![wall(vec![e0, e1, rs]), wall(vec![e2, e3, rn])]
            }
            (RoofType::Shed, Some(rs), Some(rn)) => vec![
                wall(vec![e3, e0, rs, rn]),
                wall(vec![e0, e1, rs]),
                wall(vec![e2, e3, rn]),
            ],
            _ => Vec::new(),
        };
        let fascia = fascia
            .into_iter()
            .filter(|f| !f.exterior.is_degenerate())
            .collect();

        let closure = matches!(self.shape.roof_type(), RoofType::Flat | RoofType::Shed).then(|| {
            Facet::new(Ring::from_points(body_ring), SemanticSurface::Closure)
        });

        Ok(Some(Overhang {
            lengths,
            drop,
            eave_z,
            outline,
            shape,
            ridge,
            soffit,
            fascia,
            closure,
        }))
    }
}
