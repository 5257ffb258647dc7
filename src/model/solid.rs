use super::surface::SurfaceId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the model store.
    pub struct SolidId;
}

/// What a solid stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidRole {
    /// Exterior envelope, including any attached building part.
    Building,
    /// Room volume of one storey (1-based).
    Storey(u32),
    /// Room volume under the roof.
    Attic,
}

/// A closed shell of surfaces.
///
/// Every edge of the shell is shared by exactly two of its surfaces,
/// traversed in opposite directions.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub gml_id: String,
    pub role: SolidRole,
    /// Surfaces of the shell, in emission order.
    pub shell: Vec<SurfaceId>,
}
