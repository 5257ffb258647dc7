use crate::spec::OpeningKind;

use super::Ring;

slotmap::new_key_type! {
    /// Unique identifier for a surface in the model store.
    pub struct SurfaceId;
}

/// Semantic class of a boundary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticSurface {
    Wall,
    Roof,
    Ground,
    OuterFloor,
    /// Underside of a roof overhang.
    OuterCeiling,
    Closure,
    /// Interior surfaces, facing into the rooms.
    Floor,
    Ceiling,
    InteriorWall,
}

impl SemanticSurface {
    /// CityGML element name of the boundary surface.
    #[must_use]
    pub fn citygml_name(self) -> &'static str {
        match self {
            SemanticSurface::Wall => "WallSurface",
            SemanticSurface::Roof => "RoofSurface",
            SemanticSurface::Ground => "GroundSurface",
            SemanticSurface::OuterFloor => "OuterFloorSurface",
            SemanticSurface::OuterCeiling => "OuterCeilingSurface",
            SemanticSurface::Closure => "ClosureSurface",
            SemanticSurface::Floor => "FloorSurface",
            SemanticSurface::Ceiling => "CeilingSurface",
            SemanticSurface::InteriorWall => "InteriorWallSurface",
        }
    }

    /// Tag of the same surface seen from inside a room.
    #[must_use]
    pub fn interior(self) -> Self {
        match self {
            SemanticSurface::Ground | SemanticSurface::Floor => SemanticSurface::Floor,
            SemanticSurface::Roof | SemanticSurface::Ceiling | SemanticSurface::OuterCeiling => {
                SemanticSurface::Ceiling
            }
            _ => SemanticSurface::InteriorWall,
        }
    }
}

/// A door or window filling a hole in a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    pub kind: OpeningKind,
    /// Ring of the door or window pane, facing the same way as its host.
    pub ring: Ring,
}

/// A polygon under construction: not yet stored and without an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
    pub semantic: SemanticSurface,
    pub openings: Vec<Opening>,
}

impl Facet {
    /// Creates a facet without holes or openings.
    #[must_use]
    pub fn new(exterior: Ring, semantic: SemanticSurface) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
            semantic,
            openings: Vec::new(),
        }
    }

    /// Adds a hole ring.
    #[must_use]
    pub fn with_hole(mut self, hole: Ring) -> Self {
        self.holes.push(hole);
        self
    }

    /// Every ring of the facet, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(&self.holes)
    }

    /// The facet seen from the other side, with the interior tag.
    #[must_use]
    pub fn flipped_inward(&self) -> Self {
        Self {
            exterior: self.exterior.reversed(),
            holes: self.holes.iter().map(Ring::reversed).collect(),
            semantic: self.semantic.interior(),
            openings: self
                .openings
                .iter()
                .map(|o| Opening {
                    kind: o.kind,
                    ring: o.ring.reversed(),
                })
                .collect(),
        }
    }
}

/// A door or window stored with its surface.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningData {
    pub gml_id: String,
    pub kind: OpeningKind,
    pub ring: Ring,
}

/// A stored polygon with holes, optionally tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceData {
    pub gml_id: String,
    pub exterior: Ring,
    pub holes: Vec<Ring>,
    /// `None` for plain geometry and shell faces of solids.
    pub semantic: Option<SemanticSurface>,
    pub openings: Vec<OpeningData>,
}

impl SurfaceData {
    /// Every ring of the polygon, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(&self.holes)
    }

    /// Every ring including opening rings, for in-place transforms.
    pub fn rings_mut(&mut self) -> impl Iterator<Item = &mut Ring> {
        std::iter::once(&mut self.exterior)
            .chain(self.holes.iter_mut())
            .chain(self.openings.iter_mut().map(|o| &mut o.ring))
    }
}
