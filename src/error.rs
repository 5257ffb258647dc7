use thiserror::Error;

/// Top-level error type for the citylod geometry engine.
#[derive(Debug, Error)]
pub enum CityLodError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors in the building specification.
///
/// These abort the construction of the building they belong to.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unknown roof type: {0}")]
    InvalidRoofType(String),

    #[error("side index {0} is out of range [0, 3]")]
    InvalidSide(u8),

    #[error("unknown building part type: {0}")]
    InvalidPartType(String),

    #[error("{roof} roof requires parameter `{parameter}`")]
    MissingRoofParameter {
        roof: &'static str,
        parameter: &'static str,
    },

    #[error("{roof} roof has no slope on side {side}")]
    NoRoofSlope { roof: &'static str, side: &'static str },

    #[error("{feature} is out of bounds: {detail}")]
    FeatureOutOfBounds {
        feature: &'static str,
        detail: String,
    },

    #[error("malformed building record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the model store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors in the build configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`CityLodError`].
pub type Result<T> = std::result::Result<T, CityLodError>;
