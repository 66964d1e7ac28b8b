use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in map space: (u, v) indexes the full rectangular tile grid,
/// including the padding around the playable area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MPos {
    pub u: i32,
    pub v: i32,
}

impl MPos {
    pub const fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }
}

/// Position in projected space, the space the visibility source tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PPos {
    pub u: i32,
    pub v: i32,
}

impl PPos {
    pub const fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }
}

/// Logical cell position used for neighbour arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CPos {
    pub x: i32,
    pub y: i32,
}

impl CPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Offset between two cell positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CVec {
    pub x: i32,
    pub y: i32,
}

impl CVec {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const TOP: CVec = CVec::new(0, -1);
    pub const RIGHT: CVec = CVec::new(1, 0);
    pub const BOTTOM: CVec = CVec::new(0, 1);
    pub const LEFT: CVec = CVec::new(-1, 0);

    /// The four cardinal directions, clockwise from top
    pub const CARDINALS: [CVec; 4] = [Self::TOP, Self::RIGHT, Self::BOTTOM, Self::LEFT];
}

impl Add<CVec> for CPos {
    type Output = CPos;

    fn add(self, rhs: CVec) -> CPos {
        CPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CPos {
    type Output = CVec;

    fn sub(self, rhs: CPos) -> CVec {
        CVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// How cell positions are laid out over the map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapGridType {
    /// Cells and map positions coincide
    #[default]
    Rectangular,
    /// Diamond cells packed into staggered rows
    RectangularIsometric,
}

impl MapGridType {
    pub fn to_cpos(self, uv: MPos) -> CPos {
        match self {
            MapGridType::Rectangular => CPos::new(uv.u, uv.v),
            MapGridType::RectangularIsometric => {
                // Odd rows are shifted half a cell to the right
                let offset = uv.v & 1;
                let y = (uv.v - offset) / 2 - uv.u;
                let x = uv.v - y;
                CPos::new(x, y)
            }
        }
    }

    pub fn to_mpos(self, cell: CPos) -> MPos {
        match self {
            MapGridType::Rectangular => MPos::new(cell.x, cell.y),
            MapGridType::RectangularIsometric => {
                MPos::new((cell.x - cell.y) / 2, cell.x + cell.y)
            }
        }
    }
}
