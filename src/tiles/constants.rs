/// Default pixel size of a map tile
pub const TILE_SIZE: u32 = 32;

/// Default number of padding tiles around the playable area
pub const MAP_BORDER: u32 = 1;

/// Depth of the ring along each map edge where border shroud is suppressed
/// (the padding tile plus the first playable tile)
pub const BORDER_RING: i32 = 1;

// Layer configuration
/// Z-positions for the overlay layers in world space; fog is drawn below shroud
pub const LAYER_Z_FOG: f32 = 10.0;
pub const LAYER_Z_SHROUD: f32 = 10.1;
