mod bounding_box;
mod check_closure;
mod volume;

pub use bounding_box::{Aabb, BoundingBox};
pub use check_closure::{CheckClosure, ClosureReport};
pub use volume::Volume;
