use crate::error::Result;
use crate::math::TOLERANCE;
use crate::model::Facet;
use crate::operations::assembly::MakeBlock;
use crate::operations::creation::{BodyCorners, HeightMode, MakeBody};
use crate::spec::PerSide;

/// Room volume of one storey.
#[derive(Debug, Clone)]
pub struct Storey {
    /// 1-based storey number, counted from the ground.
    pub number: u32,
    pub room: BodyCorners,
    /// Closed shell of the room, faces pointing out of it.
    pub shell: Vec<Facet>,
}

/// Builds one box-shaped room per storey inside the walls.
///
/// Storey `f` spans from `(f − 1)·h + j/2` to `f·h − j/2` above the base,
/// for floor height `h` and joist thickness `j`.
pub struct MakeStoreys<'a> {
    body: &'a BodyCorners,
    floors: u32,
    floor_height: f64,
    joist: f64,
    thickness: f64,
}

impl<'a> MakeStoreys<'a> {
    /// Creates a new `MakeStoreys` operation.
    ///
    /// * `body` - Box on the outer wall lines.
    /// * `thickness` - Wall thickness the rooms are inset by.
    #[must_use]
    pub fn new(body: &'a BodyCorners, floors: u32, floor_height: f64, joist: f64, thickness: f64) -> Self {
        Self {
            body,
            floors,
            floor_height,
            joist,
            thickness,
        }
    }

    /// Executes the operation.
    ///
    /// Storeys without headroom are left out.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`](crate::error::GeometryError::Degenerate)
    /// if the walls leave no floor area.
    pub fn execute(&self) -> Result<Vec<Storey>> {
        let inset = self.body.offset(PerSide::uniform(-self.thickness));
        let base = self.body.base_z();
        let half_joist = 0.5 * self.joist;

        let mut storeys = Vec::with_capacity(self.floors as usize);
        for number in 1..=self.floors {
            let floor_z = base + f64::from(number - 1) * self.floor_height + half_joist;
            let ceiling_z = base + f64::from(number) * self.floor_height - half_joist;
            if ceiling_z <= floor_z + TOLERANCE {
                tracing::warn!(storey = number, "storey has no headroom");
                continue;
            }
            let room = MakeBody::over(&inset.with_base(floor_z), HeightMode::Override(ceiling_z)).execute()?;
            let shell = MakeBlock::new(&room).execute().shell();
            storeys.push(Storey {
                number,
                room,
                shell,
            });
        }
        Ok(storeys)
    }
}
