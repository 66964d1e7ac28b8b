use crate::tiles::{CellLayer, MPos, Map};
use bevy::prelude::*;
use rand::Rng;

/// Static per-cell render data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileInfo {
    /// Screen-space centre of the cell
    pub screen_position: Vec3,
    /// Cosmetic variant, fixed for the session so tiles don't flicker
    pub variant: u8,
}

/// Per-cell render data for the whole grid, padding included, so sprites
/// peeking over the map edge are covered too
#[derive(Debug, Clone, Default)]
pub struct TileCache {
    tiles: Option<CellLayer<TileInfo>>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the cache for every cell of `map`, choosing a variant per cell
    pub fn populate<R: Rng>(&mut self, map: &Map, variant_count: usize, rng: &mut R) {
        let mut tiles = CellLayer::new(map.size());
        for uv in map.all_cells() {
            let info = TileInfo {
                screen_position: map.screen_anchor(uv),
                variant: rng.random_range(0..variant_count) as u8,
            };
            tiles.set(uv, info);
        }
        self.tiles = Some(tiles);
    }

    pub fn is_populated(&self) -> bool {
        self.tiles.is_some()
    }

    pub fn get(&self, uv: MPos) -> Option<&TileInfo> {
        self.tiles.as_ref().and_then(|tiles| tiles.get(uv))
    }

    pub fn len(&self) -> usize {
        self.tiles.as_ref().map_or(0, |tiles| tiles.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
