pub mod config;
pub mod dirty;
pub mod edges;
pub mod error;
pub mod layer;
pub mod renderer;
pub mod sequences;
pub mod sprite_table;
pub mod systems;
pub mod tile_cache;
pub mod visibility;

// Re-export commonly used items
pub use config::{ShroudRendererConfig, ShroudSettings, SETTINGS_PATH};
pub use edges::{classify, Edges};
pub use error::{LayerKind, ShroudError};
pub use layer::{SpriteInstance, TerrainSpriteLayer};
pub use renderer::{RenderStats, ShroudRenderer, WorldType};
pub use sequences::{BlendMode, SequenceProvider, SequenceSet, SheetId, SpriteFrame, SpriteSequence};
pub use sprite_table::SpriteTable;
pub use systems::*;
pub use visibility::{SourceId, VisibilityRule, VisibilitySource};

use crate::world::loader;
use bevy::prelude::*;

/// Plugin for the shroud and fog overlay. Runs after
/// [`WorldPlugin`](crate::world::WorldPlugin) has loaded the map.
pub struct ShroudPlugin;

impl Plugin for ShroudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShroudSourceMode>()
            .init_resource::<ShroudSpritePool>()
            .init_resource::<LastRenderStats>()
            .add_systems(Startup, setup_shroud.after(loader::load_map))
            .add_systems(
                Update,
                (on_map_loaded, render_shroud, sync_shroud_sprites)
                    .chain()
                    .after(loader::flush_shroud),
            )
            .add_systems(Last, dispose_shroud);

        #[cfg(feature = "debug_shroud")]
        app.add_systems(Update, log_render_stats.after(render_shroud));
    }
}
