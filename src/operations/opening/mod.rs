mod make_opening;

pub use make_opening::{MakeOpening, OpeningGeometry};
