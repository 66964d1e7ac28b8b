use crate::tiles::{CVec, Map, PPos, BORDER_RING};

bitflags::bitflags! {
    /// Cardinal neighbours of a cell that lie on the hidden side of a
    /// visibility boundary
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const TOP = 0x1;
        const RIGHT = 0x2;
        const BOTTOM = 0x4;
        const LEFT = 0x8;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();

        /// The cell itself is hidden and takes the fully covered sprite
        const ALL = 0x0F;
    }
}

/// Number of distinct edge bitmasks, and so the size of an edge-indexed table
pub const EDGE_COMBINATIONS: usize = Edges::ALL.bits() as usize + 1;

const NEIGHBOURS: [(CVec, Edges); 4] = [
    (CVec::TOP, Edges::TOP),
    (CVec::RIGHT, Edges::RIGHT),
    (CVec::BOTTOM, Edges::BOTTOM),
    (CVec::LEFT, Edges::LEFT),
];

/// Classify the visibility boundary around `puv`.
///
/// A hidden cell is fully covered and returns [`Edges::ALL`] regardless of
/// its neighbours. A visible cell gets one bit for every cardinal neighbour
/// that is hidden. Unless `shroud_on_map_borders` is set, edges that only
/// face the map's own boundary are dropped: a single edge when the cell sits
/// in the border ring on that side, a corner pair only when it sits in the
/// ring on both sides. The ring test uses raw grid rows and columns and so
/// assumes a rectangular layout.
pub fn classify(
    map: &Map,
    puv: PPos,
    shroud_on_map_borders: bool,
    is_visible: impl Fn(PPos) -> bool,
) -> Edges {
    if !is_visible(puv) {
        return Edges::ALL;
    }

    let mut edges = Edges::empty();
    for (direction, edge) in NEIGHBOURS {
        if !is_visible(map.neighbour(puv, direction)) {
            edges |= edge;
        }
    }

    if shroud_on_map_borders || edges.is_empty() {
        return edges;
    }

    let uv = map.unproject(puv);
    let top = uv.v <= BORDER_RING;
    let left = uv.u <= BORDER_RING;
    let bottom = uv.v >= map.height() - 1 - BORDER_RING;
    let right = uv.u >= map.width() - 1 - BORDER_RING;

    let facing_border = (edges == Edges::TOP && top)
        || (edges == Edges::LEFT && left)
        || (edges == Edges::BOTTOM && bottom)
        || (edges == Edges::RIGHT && right)
        || (edges == Edges::TOP_LEFT && top && left)
        || (edges == Edges::TOP_RIGHT && top && right)
        || (edges == Edges::BOTTOM_LEFT && bottom && left)
        || (edges == Edges::BOTTOM_RIGHT && bottom && right);

    if facing_border {
        Edges::empty()
    } else {
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::MapGridType;
    use bevy::prelude::UVec2;
    use std::collections::HashSet;

    fn map(width: u32, height: u32) -> Map {
        Map::new(MapGridType::Rectangular, UVec2::new(width, height), UVec2::splat(32))
    }

    fn hidden(cells: &[(i32, i32)]) -> HashSet<PPos> {
        cells.iter().map(|&(u, v)| PPos::new(u, v)).collect()
    }

    #[test]
    fn test_hidden_cell_is_fully_covered() {
        let map = map(8, 8);
        let hidden = hidden(&[(3, 3)]);
        let edges = classify(&map, PPos::new(3, 3), false, |p| !hidden.contains(&p));
        assert_eq!(edges, Edges::ALL);

        // Neighbour state does not matter for a hidden cell
        let edges = classify(&map, PPos::new(3, 3), false, |p| p != PPos::new(3, 3) && p.u > 100);
        assert_eq!(edges, Edges::ALL);
    }

    #[test]
    fn test_fully_visible_surroundings_have_no_edges() {
        let map = map(8, 8);
        let edges = classify(&map, PPos::new(4, 4), false, |_| true);
        assert_eq!(edges, Edges::empty());
    }

    #[test]
    fn test_single_edges_point_at_hidden_neighbour() {
        let map = map(8, 8);
        let hidden = hidden(&[(4, 4)]);
        let visible = |p: PPos| !hidden.contains(&p);

        assert_eq!(classify(&map, PPos::new(4, 3), false, visible), Edges::BOTTOM);
        assert_eq!(classify(&map, PPos::new(5, 4), false, visible), Edges::LEFT);
        assert_eq!(classify(&map, PPos::new(4, 5), false, visible), Edges::TOP);
        assert_eq!(classify(&map, PPos::new(3, 4), false, visible), Edges::RIGHT);
    }

    #[test]
    fn test_combined_edges() {
        let map = map(8, 8);
        let hidden = hidden(&[(4, 3), (3, 4)]);
        let edges = classify(&map, PPos::new(4, 4), false, |p| !hidden.contains(&p));
        assert_eq!(edges, Edges::TOP_LEFT);
    }

    #[test]
    fn test_top_edge_on_border_row_is_suppressed() {
        let map = map(8, 8);
        let hidden = hidden(&[(3, -1)]);
        let visible = |p: PPos| !hidden.contains(&p);

        assert_eq!(classify(&map, PPos::new(3, 0), false, visible), Edges::empty());
        assert_eq!(classify(&map, PPos::new(3, 0), true, visible), Edges::TOP);
    }

    #[test]
    fn test_border_ring_covers_first_playable_row() {
        let map = map(8, 8);
        let hidden = hidden(&[(3, 0), (0, 5), (7, 5), (5, 7)]);
        let visible = |p: PPos| !hidden.contains(&p);

        assert_eq!(classify(&map, PPos::new(3, 1), false, visible), Edges::empty());
        assert_eq!(classify(&map, PPos::new(1, 5), false, visible), Edges::empty());
        assert_eq!(classify(&map, PPos::new(6, 5), false, visible), Edges::empty());
        assert_eq!(classify(&map, PPos::new(5, 6), false, visible), Edges::empty());

        // Two rows in, the edge is drawn
        let hidden = self::hidden(&[(3, 1)]);
        let edges = classify(&map, PPos::new(3, 2), false, |p| !hidden.contains(&p));
        assert_eq!(edges, Edges::TOP);
    }

    #[test]
    fn test_corner_needs_both_borders() {
        let map = map(8, 8);
        let hidden = hidden(&[(1, 0), (0, 1), (4, 0), (3, 1)]);
        let visible = |p: PPos| !hidden.contains(&p);

        // In the top-left corner of the ring: suppressed
        assert_eq!(classify(&map, PPos::new(1, 1), false, visible), Edges::empty());

        // Only on the top ring: kept
        assert_eq!(classify(&map, PPos::new(4, 1), false, visible), Edges::TOP_LEFT);
        assert_eq!(classify(&map, PPos::new(4, 1), true, visible), Edges::TOP_LEFT);
    }

    #[test]
    fn test_mixed_edges_on_border_are_kept() {
        let map = map(8, 8);
        let hidden = hidden(&[(3, -1), (3, 1)]);
        let edges = classify(&map, PPos::new(3, 0), false, |p| !hidden.contains(&p));
        assert_eq!(edges, Edges::TOP | Edges::BOTTOM);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let map = map(8, 8);
        let hidden = hidden(&[(2, 2), (5, 5), (2, 3)]);
        let visible = |p: PPos| !hidden.contains(&p);

        for puv in map.projected_cells() {
            let first = classify(&map, puv, false, visible);
            let second = classify(&map, puv, false, visible);
            assert_eq!(first, second, "classification changed for {:?}", puv);
        }
    }
}
