mod place_chimney;
mod place_dormer;
mod place_interior_feature;
mod place_roof_window;
mod project_overhang;
mod roof_slope;

pub use place_chimney::{Chimney, PlaceChimney};
pub use place_dormer::{Dormer, PlaceDormer};
pub use place_interior_feature::{InteriorFeature, PlaceInteriorFeature, RoofFeatureKind};
pub use place_roof_window::{PlaceRoofWindow, RoofWindow};
pub use project_overhang::{Overhang, ProjectOverhang};
pub use roof_slope::RoofSlope;
