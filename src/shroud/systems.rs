use super::config::ShroudSettings;
use super::error::LayerKind;
use super::layer::{SpriteInstance, TerrainSpriteLayer};
use super::renderer::{RenderStats, ShroudRenderer};
use super::sequences::{BlendMode, SequenceSet, SheetId};
use super::visibility::VisibilitySource;
use crate::tiles::{Map, LAYER_Z_FOG, LAYER_Z_SHROUD};
use crate::world::{MapLoaded, Shroud};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Whether the renderer follows the player's shroud or runs without a source
#[derive(Resource, Debug)]
pub struct ShroudSourceMode {
    pub use_shroud: bool,
}

impl Default for ShroudSourceMode {
    fn default() -> Self {
        Self { use_shroud: true }
    }
}

/// Image and atlas layout for every sprite sheet
#[derive(Resource, Default)]
pub struct ShroudSheets {
    sheets: HashMap<SheetId, (Handle<Image>, Handle<TextureAtlasLayout>)>,
}

/// Entities drawing the current batches, one pool per layer
#[derive(Resource, Default)]
pub struct ShroudSpritePool {
    shroud: Vec<Entity>,
    fog: Vec<Entity>,
}

/// Stats of the most recent render pass
#[derive(Resource, Debug, Default)]
pub struct LastRenderStats(pub RenderStats);

/// Marker for a pooled overlay sprite
#[derive(Component, Debug)]
pub struct ShroudSprite {
    pub layer: LayerKind,
    pub slot: usize,
}

/// Build the renderer and load its sprite sheets. Any configuration error is
/// fatal and shuts the app down.
pub fn setup_shroud(
    mut commands: Commands,
    settings: Res<ShroudSettings>,
    map: Res<Map>,
    assets: Res<AssetServer>,
    mut texture_atlas_layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut exit: MessageWriter<AppExit>,
) {
    let renderer = SequenceSet::from_definitions(&settings.sheets, &settings.sequences)
        .and_then(|sequences| ShroudRenderer::new(settings.renderer.clone(), &map, &sequences));
    let renderer = match renderer {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Failed to set up the shroud renderer: {}", e);
            exit.write(AppExit::error());
            return;
        }
    };

    for table in [renderer.shroud_sprites(), renderer.fog_sprites()] {
        if table.blend() != BlendMode::Alpha {
            warn!(
                "{} sprites use {:?} blending, drawn as alpha by the sprite backend",
                table.layer(),
                table.blend()
            );
        }
    }

    let mut sheets = ShroudSheets::default();
    for sheet in &settings.sheets {
        let layout = TextureAtlasLayout::from_grid(
            UVec2::from_array(sheet.frame_size),
            sheet.columns,
            sheet.rows,
            None,
            None,
        );
        let handles = (assets.load(sheet.image.clone()), texture_atlas_layouts.add(layout));
        sheets.sheets.insert(sheet.id, handles);
        debug!("Loading shroud sheet {:?} from {}", sheet.id, sheet.image);
    }
    commands.insert_resource(sheets);

    // The renderer holds a channel receiver, so it lives on the main thread
    commands.queue(move |world: &mut World| world.insert_non_send_resource(renderer));
}

/// Populate the tile cache and create the layers once the map is in place
pub fn on_map_loaded(
    mut loaded: MessageReader<MapLoaded>,
    renderer: Option<NonSendMut<ShroudRenderer>>,
) {
    let Some(mut renderer) = renderer else {
        return;
    };

    for message in loaded.read() {
        let mut rng = match renderer.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        renderer.world_loaded(message.world_type, &mut rng);
    }
}

/// Per-frame render pass against the camera viewport
pub fn render_shroud(
    renderer: Option<NonSendMut<ShroudRenderer>>,
    mut shroud: Option<ResMut<Shroud>>,
    mode: Res<ShroudSourceMode>,
    mut last_stats: ResMut<LastRenderStats>,
    camera_query: Query<(&Transform, &Projection), With<Camera2d>>,
    window_query: Query<&Window>,
) {
    let Some(mut renderer) = renderer else {
        return;
    };
    let Some(viewport) = camera_viewport(&camera_query, &window_query) else {
        return;
    };

    let source = if mode.use_shroud {
        shroud
            .as_deref_mut()
            .map(|shroud| shroud as &mut dyn VisibilitySource)
    } else {
        None
    };

    last_stats.0 = renderer.render(source, viewport);
}

/// Mirror the layers' draw batches onto pooled sprite entities
pub fn sync_shroud_sprites(
    mut commands: Commands,
    renderer: Option<NonSend<ShroudRenderer>>,
    settings: Res<ShroudSettings>,
    sheets: Res<ShroudSheets>,
    mut pool: ResMut<ShroudSpritePool>,
    mut sprites: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<ShroudSprite>>,
) {
    let Some(renderer) = renderer else {
        return;
    };
    let pool = &mut *pool;

    let layers = [
        (renderer.fog_layer(), LAYER_Z_FOG, &mut pool.fog),
        (renderer.shroud_layer(), LAYER_Z_SHROUD, &mut pool.shroud),
    ];
    for (layer, z, entities) in layers {
        let Some(layer) = layer else {
            continue;
        };
        let Some((image, atlas)) = sheets.sheets.get(&layer.sheet()) else {
            continue;
        };
        let tint = settings.palette_color(layer.palette());
        sync_layer(&mut commands, layer, image, atlas, tint, z, entities, &mut sprites);
    }
}

#[allow(clippy::too_many_arguments)]
fn sync_layer(
    commands: &mut Commands,
    layer: &TerrainSpriteLayer,
    image: &Handle<Image>,
    atlas: &Handle<TextureAtlasLayout>,
    tint: Color,
    z: f32,
    entities: &mut Vec<Entity>,
    sprites: &mut Query<(&mut Sprite, &mut Transform, &mut Visibility), With<ShroudSprite>>,
) {
    let batch = layer.batch();

    for (slot, &entity) in entities.iter().enumerate() {
        let Ok((mut sprite, mut transform, mut visibility)) = sprites.get_mut(entity) else {
            continue;
        };
        match batch.get(slot) {
            Some(instance) => {
                if let Some(texture_atlas) = sprite.texture_atlas.as_mut() {
                    texture_atlas.index = instance.sprite.frame as usize;
                }
                sprite.custom_size = Some(instance.sprite.size.truncate());
                sprite.color = tint;
                *transform = sprite_transform(instance, z);
                *visibility = Visibility::Visible;
            }
            None => {
                if *visibility != Visibility::Hidden {
                    *visibility = Visibility::Hidden;
                }
            }
        }
    }

    for (slot, instance) in batch.iter().enumerate().skip(entities.len()) {
        let mut sprite = Sprite::from_atlas_image(
            image.clone(),
            TextureAtlas {
                layout: atlas.clone(),
                index: instance.sprite.frame as usize,
            },
        );
        sprite.custom_size = Some(instance.sprite.size.truncate());
        sprite.color = tint;

        let entity = commands
            .spawn((
                sprite,
                sprite_transform(instance, z),
                Visibility::Visible,
                ShroudSprite {
                    layer: layer.kind(),
                    slot,
                },
            ))
            .id();
        entities.push(entity);
    }
}

/// Release the layers and despawn the pooled sprites on shutdown
pub fn dispose_shroud(
    mut commands: Commands,
    mut exit: MessageReader<AppExit>,
    renderer: Option<NonSendMut<ShroudRenderer>>,
    mut pool: ResMut<ShroudSpritePool>,
) {
    if exit.read().next().is_none() {
        return;
    }
    if let Some(mut renderer) = renderer {
        renderer.dispose();
    }
    let pool = &mut *pool;
    for entity in pool.shroud.drain(..).chain(pool.fog.drain(..)) {
        commands.entity(entity).despawn();
    }
}

#[cfg(feature = "debug_shroud")]
pub fn log_render_stats(stats: Res<LastRenderStats>) {
    if stats.0.expanded > 0 || stats.0.rebound {
        info!("Shroud render: {}", stats.0);
    }
}

/// Map a screen-space instance (y down, top-left origin) to a centred
/// sprite transform in world space (y up)
fn sprite_transform(instance: &SpriteInstance, z: f32) -> Transform {
    let centre = instance.position + instance.sprite.size / 2.0;
    Transform::from_xyz(centre.x, -centre.y, z)
}

/// Visible area of the camera in screen space
fn camera_viewport(
    camera_query: &Query<(&Transform, &Projection), With<Camera2d>>,
    window_query: &Query<&Window>,
) -> Option<Rect> {
    let (camera_transform, projection) = camera_query.single().ok()?;
    let window = window_query.single().ok()?;

    let scale = match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => return None,
    };

    let camera_pos = camera_transform.translation.truncate();
    let half_width = (window.width() / 2.0) * scale;
    let half_height = (window.height() / 2.0) * scale;

    Some(Rect::new(
        camera_pos.x - half_width,
        -(camera_pos.y + half_height),
        camera_pos.x + half_width,
        -(camera_pos.y - half_height),
    ))
}
