pub mod assembly;
pub mod creation;
pub mod interior;
pub mod opening;
pub mod query;
pub mod roof;
pub mod transform;
