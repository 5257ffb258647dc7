use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::SpecError;
use crate::math::Vector3;

/// One edge of the rectangular footprint, shared by walls and roof slopes.
///
/// The discriminants are the side indices of the input records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Back edge, `y = origin.y + depth`.
    North = 0,
    /// `x = origin.x + width`.
    East = 1,
    /// Front edge, `y = origin.y`.
    South = 2,
    /// `x = origin.x`.
    West = 3,
}

/// Geometric mapping of one side.
struct SideGeometry {
    /// Floor corner where the side starts, seen from outside (left).
    start: usize,
    /// Floor corner where the side ends (right).
    end: usize,
    /// Unit direction from start to end.
    along: [f64; 3],
    /// Unit outward normal, `along × ẑ`.
    outward: [f64; 3],
}

const SIDE_TABLE: [SideGeometry; 4] = [
    SideGeometry {
        start: 2,
        end: 3,
        along: [-1.0, 0.0, 0.0],
        outward: [0.0, 1.0, 0.0],
    },
    SideGeometry {
        start: 1,
        end: 2,
        along: [0.0, 1.0, 0.0],
        outward: [1.0, 0.0, 0.0],
    },
    SideGeometry {
        start: 0,
        end: 1,
        along: [1.0, 0.0, 0.0],
        outward: [0.0, -1.0, 0.0],
    },
    SideGeometry {
        start: 3,
        end: 0,
        along: [0.0, -1.0, 0.0],
        outward: [-1.0, 0.0, 0.0],
    },
];

impl Side {
    /// All sides in index order.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Returns the side index used by the input records.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    fn geometry(self) -> &'static SideGeometry {
        &SIDE_TABLE[self.index()]
    }

    /// Index of the floor corner where this side starts.
    #[must_use]
    pub fn start_corner(self) -> usize {
        self.geometry().start
    }

    /// Index of the floor corner where this side ends.
    #[must_use]
    pub fn end_corner(self) -> usize {
        self.geometry().end
    }

    /// Unit vector running along the side, from start to end corner.
    #[must_use]
    pub fn along(self) -> Vector3 {
        let [x, y, z] = self.geometry().along;
        Vector3::new(x, y, z)
    }

    /// Unit outward normal of the side.
    #[must_use]
    pub fn outward(self) -> Vector3 {
        let [x, y, z] = self.geometry().outward;
        Vector3::new(x, y, z)
    }

    /// Unit horizontal vector pointing from the side into the footprint.
    #[must_use]
    pub fn inward(self) -> Vector3 {
        -self.outward()
    }

    /// `true` for the sides running along the width (x) axis.
    #[must_use]
    pub fn runs_along_width(self) -> bool {
        matches!(self, Side::North | Side::South)
    }

    /// The side whose end corner is this side's start corner.
    #[must_use]
    pub fn preceding(self) -> Side {
        Side::ALL[(self.index() + 1) % 4]
    }

    /// The side opposite this one.
    #[must_use]
    pub fn opposite(self) -> Side {
        Side::ALL[(self.index() + 2) % 4]
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Side::North => "north",
            Side::East => "east",
            Side::South => "south",
            Side::West => "west",
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = SpecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Side::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(SpecError::InvalidSide(value))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per side, e.g. overhang lengths or attic insets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerSide(pub [f64; 4]);

impl PerSide {
    /// Same value on every side.
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self([value; 4])
    }

    /// Value `along_x` on the east/west sides and `along_y` on north/south.
    #[must_use]
    pub fn axes(along_x: f64, along_y: f64) -> Self {
        let mut values = [0.0; 4];
        for side in Side::ALL {
            values[side.index()] = if side.runs_along_width() { along_y } else { along_x };
        }
        Self(values)
    }

    /// Values negated, turning outward offsets into insets.
    #[must_use]
    pub fn negated(self) -> Self {
        Self(self.0.map(|v| -v))
    }
}

impl Index<Side> for PerSide {
    type Output = f64;

    fn index(&self, side: Side) -> &f64 {
        &self.0[side.index()]
    }
}

impl IndexMut<Side> for PerSide {
    fn index_mut(&mut self, side: Side) -> &mut f64 {
        &mut self.0[side.index()]
    }
}
