pub mod loader;
pub mod vision;

// Re-export commonly used items
pub use loader::{MapLoaded, CAMERA_VISION_RADIUS, PLAYER_SOURCE};
pub use vision::Shroud;

use bevy::prelude::*;

/// Plugin for map loading and the player's shroud. Expects a
/// [`ShroudSettings`](crate::shroud::ShroudSettings) resource.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MapLoaded>()
            .add_systems(Startup, loader::load_map)
            .add_systems(
                Update,
                (
                    loader::reveal_around_camera,
                    loader::explore_on_key,
                    loader::flush_shroud
                        .after(loader::reveal_around_camera)
                        .after(loader::explore_on_key),
                ),
            );
    }
}
