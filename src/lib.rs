pub mod config;
pub mod context;
pub mod error;
pub mod math;
pub mod model;
pub mod operations;
pub mod pipeline;
pub mod spec;
pub mod tessellation;

pub use error::{CityLodError, Result};
