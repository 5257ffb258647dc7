mod attach_building_part;
mod attach_openings;
mod attach_roof_features;
mod build_variant;
mod emit_representation;
mod envelope;
mod make_block;
mod make_envelope;

pub use attach_building_part::{AttachBuildingPart, PartPlacement};
pub use attach_openings::AttachOpenings;
pub use attach_roof_features::AttachRoofFeatures;
pub use build_variant::{BuildVariant, GeometryContext};
pub use emit_representation::EmitRepresentation;
pub use envelope::{Envelope, Notch, RoofFacet, RoofFrame, Wall};
pub use make_block::MakeBlock;
pub use make_envelope::MakeEnvelope;
