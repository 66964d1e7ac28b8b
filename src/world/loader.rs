use super::vision::Shroud;
use crate::shroud::{ShroudSettings, SourceId, WorldType};
use crate::tiles::{Map, PPos};
use bevy::prelude::*;

/// Shroud source owned by the local player
pub const PLAYER_SOURCE: SourceId = SourceId(1);

/// Sight radius around the camera, in cells
pub const CAMERA_VISION_RADIUS: u32 = 5;

/// Sent once the map geometry and the player shroud are in place
#[derive(Message, Debug, Clone, Copy)]
pub struct MapLoaded {
    pub world_type: WorldType,
}

/// Build the map from the settings file and announce it
pub fn load_map(
    mut commands: Commands,
    settings: Res<ShroudSettings>,
    mut loaded: MessageWriter<MapLoaded>,
) {
    let map = Map::from_config(&settings.map);
    let world_type = if settings.map.editor {
        WorldType::Editor
    } else {
        WorldType::Regular
    };

    info!(
        "Loaded {:?} map {}x{} with playable area {:?}",
        map.grid_type(),
        map.width(),
        map.height(),
        map.bounds()
    );

    commands.insert_resource(Shroud::new(PLAYER_SOURCE, &map));
    commands.insert_resource(map);
    loaded.write(MapLoaded { world_type });
}

/// Reveal the cells around the camera whenever it enters a new cell
pub fn reveal_around_camera(
    camera_query: Query<&Transform, With<Camera2d>>,
    map: Res<Map>,
    mut shroud: ResMut<Shroud>,
    mut last_cell: Local<Option<PPos>>,
) {
    let Ok(camera_transform) = camera_query.single() else {
        return;
    };

    // World space is y-up, the map is laid out y-down
    let position = camera_transform.translation.truncate() * Vec2::new(1.0, -1.0);
    let puv = map.project(map.cell_at_screen(position));

    if *last_cell != Some(puv) {
        *last_cell = Some(puv);
        shroud.update_vision(&[(puv, CAMERA_VISION_RADIUS)]);
        debug!("Camera moved to cell {:?}", puv);
    }
}

/// Explore the whole map when 'E' is pressed
pub fn explore_on_key(keyboard: Res<ButtonInput<KeyCode>>, mut shroud: ResMut<Shroud>) {
    if keyboard.just_pressed(KeyCode::KeyE) {
        shroud.explore_all();
    }
}

/// Deliver this frame's shroud changes to subscribers
pub fn flush_shroud(mut shroud: ResMut<Shroud>) {
    let sent = shroud.flush();
    if sent > 0 {
        debug!("Shroud changed in {} cells", sent);
    }
}
