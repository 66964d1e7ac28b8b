use super::types::MPos;
use bevy::prelude::*;

/// Dense per-cell storage covering the full map grid, row-major in map space
#[derive(Debug, Clone)]
pub struct CellLayer<T> {
    size: UVec2,
    entries: Vec<T>,
}

impl<T: Clone + Default> CellLayer<T> {
    /// Create a layer with every cell set to the default value
    pub fn new(size: UVec2) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T: Clone> CellLayer<T> {
    /// Create a layer with every cell set to `value`
    pub fn filled(size: UVec2, value: T) -> Self {
        Self {
            size,
            entries: vec![value; (size.x * size.y) as usize],
        }
    }

    /// Reset every cell to `value`
    pub fn clear(&mut self, value: T) {
        self.entries.fill(value);
    }
}

impl<T> CellLayer<T> {
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, uv: MPos) -> bool {
        uv.u >= 0 && uv.v >= 0 && (uv.u as u32) < self.size.x && (uv.v as u32) < self.size.y
    }

    fn index(&self, uv: MPos) -> Option<usize> {
        if !self.contains(uv) {
            return None;
        }
        Some(uv.v as usize * self.size.x as usize + uv.u as usize)
    }

    pub fn get(&self, uv: MPos) -> Option<&T> {
        self.index(uv).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, uv: MPos) -> Option<&mut T> {
        match self.index(uv) {
            Some(i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Set the value at `uv`; returns false if the cell is outside the layer
    pub fn set(&mut self, uv: MPos, value: T) -> bool {
        match self.index(uv) {
            Some(i) => {
                self.entries[i] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate entries with their map position, row by row
    pub fn iter(&self) -> impl Iterator<Item = (MPos, &T)> + '_ {
        let width = self.size.x.max(1) as usize;
        self.entries.iter().enumerate().map(move |(i, value)| {
            (MPos::new((i % width) as i32, (i / width) as i32), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_layer_get_set() {
        let mut layer: CellLayer<u8> = CellLayer::new(UVec2::new(4, 3));

        assert!(layer.set(MPos::new(2, 1), 7));
        assert_eq!(layer.get(MPos::new(2, 1)), Some(&7));
        assert_eq!(layer.get(MPos::new(1, 2)), Some(&0));

        // Out of bounds
        assert!(!layer.set(MPos::new(4, 0), 1));
        assert_eq!(layer.get(MPos::new(-1, 0)), None);
        assert_eq!(layer.get(MPos::new(0, 3)), None);
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut layer: CellLayer<u8> = CellLayer::new(UVec2::new(3, 2));
        layer.set(MPos::new(0, 1), 5);

        let positions: Vec<MPos> = layer.iter().map(|(uv, _)| uv).collect();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[1], MPos::new(1, 0));
        assert_eq!(positions[3], MPos::new(0, 1));
        assert_eq!(layer.iter().nth(3).map(|(_, v)| *v), Some(5));
    }
}
