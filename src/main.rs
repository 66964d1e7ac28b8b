use bevy::{input::mouse::MouseWheel, prelude::*};
use shroudseed::shroud::{ShroudPlugin, ShroudSettings, ShroudSourceMode, SETTINGS_PATH};
use shroudseed::tiles::{MPos, Map};
use shroudseed::world::{loader, WorldPlugin};

// Camera zoom configuration
const ZOOM_MIN: f32 = 0.5;  // Max zoom in (smaller = more zoomed in)
const ZOOM_MAX: f32 = 3.0;  // Max zoom out (larger = more zoomed out)
const ZOOM_SPEED: f32 = 0.1; // Zoom change per input

// Backdrop tile colours, alternating in a checkerboard
const GROUND_LIGHT: Color = Color::srgb(0.32, 0.48, 0.26);
const GROUND_DARK: Color = Color::srgb(0.27, 0.42, 0.22);
const GROUND_PADDING: Color = Color::srgb(0.2, 0.2, 0.25);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(ImagePlugin::default_nearest()))
        .insert_resource(ShroudSettings::load_or_default(SETTINGS_PATH))
        .add_plugins((WorldPlugin, ShroudPlugin))
        .add_systems(Startup, setup_world.after(loader::load_map))
        .add_systems(Update, (move_camera, zoom_camera, toggle_shroud_source))
        .run();
}

/// Spawn the camera over the centre of the map and a plain backdrop to reveal
fn setup_world(mut commands: Commands, map: Res<Map>) {
    let middle = map.bounds().center();
    let centre = map.screen_anchor(MPos::new(middle.x, middle.y));
    commands.spawn((Camera2d, Transform::from_xyz(centre.x, -centre.y, 999.0)));

    let tile_size = map.tile_size();
    for uv in map.all_cells() {
        let color = if !map.contains(map.project(uv)) {
            GROUND_PADDING
        } else if (uv.u + uv.v) % 2 == 0 {
            GROUND_LIGHT
        } else {
            GROUND_DARK
        };
        let anchor = map.screen_anchor(uv);
        commands.spawn((
            Sprite::from_color(color, tile_size),
            Transform::from_xyz(anchor.x, -anchor.y, 0.0),
        ));
    }

    info!("Backdrop for {} cells and camera setup complete", map.cell_count());
}

/// Switch between following the player's shroud and rendering without a
/// source when 'V' is pressed
fn toggle_shroud_source(keyboard: Res<ButtonInput<KeyCode>>, mut mode: ResMut<ShroudSourceMode>) {
    if keyboard.just_pressed(KeyCode::KeyV) {
        mode.use_shroud = !mode.use_shroud;
        info!("Shroud source {}", if mode.use_shroud { "enabled" } else { "disabled" });
    }
}

/// Camera movement system for exploring the map
fn move_camera(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    if let Ok(mut transform) = camera_query.single_mut() {
        let speed = 200.0; // pixels per second
        let delta = time.delta_secs();

        if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
            transform.translation.y += speed * delta;
        }
        if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
            transform.translation.y -= speed * delta;
        }
        if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
            transform.translation.x -= speed * delta;
        }
        if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
            transform.translation.x += speed * delta;
        }
    }
}

/// Camera zoom system - supports scroll wheel and keyboard (- and = keys)
fn zoom_camera(
    mut scroll_events: MessageReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<&mut Projection, With<Camera2d>>,
) {
    if let Ok(mut projection) = camera_query.single_mut() {
        let mut zoom_delta = 0.0;

        for event in scroll_events.read() {
            zoom_delta -= event.y * ZOOM_SPEED;
        }

        if keyboard.just_pressed(KeyCode::Minus) {
            zoom_delta += ZOOM_SPEED;
        }
        if keyboard.just_pressed(KeyCode::Equal) {
            zoom_delta -= ZOOM_SPEED;
        }

        if zoom_delta != 0.0 {
            if let Projection::Orthographic(ref mut ortho) = projection.as_mut() {
                ortho.scale = (ortho.scale + zoom_delta).clamp(ZOOM_MIN, ZOOM_MAX);
            }
        }
    }
}
