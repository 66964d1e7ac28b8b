pub mod cell_layer;
pub mod constants;
pub mod map;
pub mod types;

// Re-export commonly used items
pub use cell_layer::CellLayer;
pub use constants::*;
pub use map::{Map, MapConfig};
pub use types::{CPos, CVec, MPos, MapGridType, PPos};
