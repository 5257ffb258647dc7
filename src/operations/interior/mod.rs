mod make_attic;
mod make_storeys;

pub use make_attic::MakeAttic;
pub use make_storeys::{MakeStoreys, Storey};
