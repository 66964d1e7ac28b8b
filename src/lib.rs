pub mod shroud;
pub mod tiles;
pub mod world;
