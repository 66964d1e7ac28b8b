use crate::tiles::{CVec, Map, PPos};
use std::collections::HashSet;

/// Cells whose visibility changed since the last render pass.
///
/// Many cells change every tick, so changes are only recorded here and the
/// real work is deferred until render time.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    /// Raw changes
    dirty: HashSet<PPos>,
    /// Changes plus their cardinal neighbours
    expanded: HashSet<PPos>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record changed cells
    pub fn mark_dirty<I: IntoIterator<Item = PPos>>(&mut self, cells: I) {
        self.dirty.extend(cells);
    }

    /// Add every dirty cell and its four neighbours to the expanded set. A
    /// cell's edges depend on its neighbours, so a change touches all five.
    pub fn expand(&mut self, map: &Map) -> &HashSet<PPos> {
        for &puv in &self.dirty {
            self.expanded.insert(puv);
            for direction in CVec::CARDINALS {
                self.expanded.insert(map.neighbour(puv, direction));
            }
        }
        &self.expanded
    }

    /// Cells to reclassify, valid after [`DirtyTracker::expand`]
    pub fn expanded(&self) -> &HashSet<PPos> {
        &self.expanded
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
        self.expanded.clear();
    }

    pub fn is_dirty(&self, puv: PPos) -> bool {
        self.dirty.contains(&puv)
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty() && self.expanded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::MapGridType;
    use bevy::prelude::UVec2;

    fn map() -> Map {
        Map::new(MapGridType::Rectangular, UVec2::new(8, 8), UVec2::splat(32))
    }

    #[test]
    fn test_mark_dirty_deduplicates() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty([PPos::new(1, 1), PPos::new(2, 2)]);
        tracker.mark_dirty(vec![PPos::new(1, 1)]);

        assert_eq!(tracker.len(), 2);
        assert!(tracker.is_dirty(PPos::new(2, 2)));
        assert!(!tracker.is_dirty(PPos::new(3, 3)));
    }

    #[test]
    fn test_expansion_includes_neighbours() {
        let map = map();
        let mut tracker = DirtyTracker::new();
        let origin = [PPos::new(3, 3), PPos::new(6, 1)];
        tracker.mark_dirty(origin);

        let expanded = tracker.expand(&map).clone();
        for puv in origin {
            assert!(expanded.contains(&puv));
            for direction in CVec::CARDINALS {
                assert!(expanded.contains(&map.neighbour(puv, direction)));
            }
        }
        assert_eq!(expanded.len(), 10);
    }

    #[test]
    fn test_overlapping_expansion() {
        let map = map();
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty([PPos::new(3, 3), PPos::new(4, 3)]);

        // Two plus-shapes sharing their centres as neighbours
        assert_eq!(tracker.expand(&map).len(), 8);
    }

    #[test]
    fn test_expansion_reaches_outside_grid() {
        let map = map();
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty([PPos::new(0, 0)]);

        let expanded = tracker.expand(&map);
        assert!(expanded.contains(&PPos::new(-1, 0)));
        assert!(expanded.contains(&PPos::new(0, -1)));
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let map = map();
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty([PPos::new(2, 2)]);
        tracker.expand(&map);
        assert!(!tracker.is_empty());

        tracker.clear();
        assert!(tracker.is_empty());
        assert!(tracker.expanded().is_empty());
    }
}
