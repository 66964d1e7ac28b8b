use super::constants::{MAP_BORDER, TILE_SIZE};
use super::types::{CPos, CVec, MPos, MapGridType, PPos};
use bevy::prelude::*;
use serde::Deserialize;

/// Map description as read from the settings file
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub grid_type: MapGridType,
    /// Full grid size in tiles, padding included
    pub width: u32,
    pub height: u32,
    /// Padding tiles between the grid edge and the playable area
    pub border: u32,
    pub tile_size: [u32; 2],
    /// Editor worlds have no shroud
    pub editor: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_type: MapGridType::Rectangular,
            width: 64,
            height: 64,
            border: MAP_BORDER,
            tile_size: [TILE_SIZE, TILE_SIZE],
            editor: false,
        }
    }
}

/// Tile grid geometry: sizes, playable bounds and the conversions between
/// map, projected, cell and screen space
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Map {
    grid_type: MapGridType,
    size: UVec2,
    /// Playable area in map coordinates, `max` exclusive
    bounds: IRect,
    tile_size: Vec2,
}

impl Map {
    /// Create a map whose playable area covers the whole grid
    pub fn new(grid_type: MapGridType, size: UVec2, tile_size: UVec2) -> Self {
        Self {
            grid_type,
            size,
            bounds: IRect::new(0, 0, size.x as i32, size.y as i32),
            tile_size: tile_size.as_vec2(),
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(
            config.grid_type,
            UVec2::new(config.width, config.height),
            UVec2::from_array(config.tile_size),
        )
        .with_border(config.border)
    }

    /// Shrink the playable area by `border` tiles on every side
    pub fn with_border(mut self, border: u32) -> Self {
        let border = border as i32;
        let max_x = (self.size.x as i32 - border).max(border);
        let max_y = (self.size.y as i32 - border).max(border);
        self.bounds = IRect::new(border, border, max_x, max_y);
        self
    }

    pub fn grid_type(&self) -> MapGridType {
        self.grid_type
    }

    /// Full grid size in tiles, padding included
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.x as i32
    }

    pub fn height(&self) -> i32 {
        self.size.y as i32
    }

    pub fn bounds(&self) -> IRect {
        self.bounds
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn cell_count(&self) -> usize {
        (self.size.x * self.size.y) as usize
    }

    /// Every map position of the grid, padding included, row by row
    pub fn all_cells(&self) -> impl Iterator<Item = MPos> + '_ {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |v| (0..width).map(move |u| MPos::new(u, v)))
    }

    /// Every projected position of the grid, padding included
    pub fn projected_cells(&self) -> impl Iterator<Item = PPos> + '_ {
        self.all_cells().map(|uv| self.project(uv))
    }

    /// Projected positions of the playable area only
    pub fn projected_cell_bounds(&self) -> impl Iterator<Item = PPos> + '_ {
        let b = self.bounds;
        (b.min.y..b.max.y).flat_map(move |v| (b.min.x..b.max.x).map(move |u| PPos::new(u, v)))
    }

    /// True if the projected position lies inside the playable area
    pub fn contains(&self, puv: PPos) -> bool {
        puv.u >= self.bounds.min.x
            && puv.u < self.bounds.max.x
            && puv.v >= self.bounds.min.y
            && puv.v < self.bounds.max.y
    }

    /// True if the map position lies anywhere on the grid
    pub fn tiles_contain(&self, uv: MPos) -> bool {
        uv.u >= 0 && uv.v >= 0 && uv.u < self.width() && uv.v < self.height()
    }

    /// Flat maps project every cell onto itself
    pub fn project(&self, uv: MPos) -> PPos {
        PPos::new(uv.u, uv.v)
    }

    pub fn unproject(&self, puv: PPos) -> MPos {
        MPos::new(puv.u, puv.v)
    }

    pub fn to_cpos(&self, uv: MPos) -> CPos {
        self.grid_type.to_cpos(uv)
    }

    pub fn to_mpos(&self, cell: CPos) -> MPos {
        self.grid_type.to_mpos(cell)
    }

    /// Projected position one cell step away from `puv`
    pub fn neighbour(&self, puv: PPos, direction: CVec) -> PPos {
        let cell = self.to_cpos(self.unproject(puv));
        self.project(self.to_mpos(cell + direction))
    }

    /// Screen-space centre of a cell in pixels (y grows downward)
    pub fn screen_anchor(&self, uv: MPos) -> Vec3 {
        match self.grid_type {
            MapGridType::Rectangular => Vec3::new(
                (uv.u as f32 + 0.5) * self.tile_size.x,
                (uv.v as f32 + 0.5) * self.tile_size.y,
                0.0,
            ),
            MapGridType::RectangularIsometric => {
                let cell = self.to_cpos(uv);
                Vec3::new(
                    (cell.x - cell.y + 1) as f32 * self.tile_size.x / 2.0,
                    (cell.x + cell.y + 1) as f32 * self.tile_size.y / 2.0,
                    0.0,
                )
            }
        }
    }

    /// Map position of the cell covering a screen-space point
    pub fn cell_at_screen(&self, point: Vec2) -> MPos {
        match self.grid_type {
            MapGridType::Rectangular => MPos::new(
                (point.x / self.tile_size.x).floor() as i32,
                (point.y / self.tile_size.y).floor() as i32,
            ),
            MapGridType::RectangularIsometric => {
                let a = 2.0 * point.x / self.tile_size.x - 1.0;
                let b = 2.0 * point.y / self.tile_size.y - 1.0;
                let cell = CPos::new(((a + b) / 2.0).round() as i32, ((b - a) / 2.0).round() as i32);
                self.to_mpos(cell)
            }
        }
    }
}
