mod make_body;
mod make_roof_shape;

pub use make_body::{BodyCorners, HeightMode, MakeBody};
pub use make_roof_shape::{MakeRoofShape, Ridge, RoofShape};
