use super::config::ShroudRendererConfig;
use super::dirty::DirtyTracker;
use super::edges::classify;
use super::error::{LayerKind, ShroudError};
use super::layer::TerrainSpriteLayer;
use super::sequences::{SequenceProvider, SpriteFrame};
use super::sprite_table::{FullOverride, SpriteTable};
use super::tile_cache::TileCache;
use super::visibility::{SourceId, VisibilityRule, VisibilitySource};
use crate::tiles::{Map, PPos};
use bevy::prelude::*;
use rand::Rng;
use std::sync::mpsc::Receiver;

/// Kind of world being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldType {
    #[default]
    Regular,
    /// Map editor: nothing is shrouded
    Editor,
}

/// The visibility source the renderer currently listens to
#[derive(Debug, Default)]
enum SourceBinding {
    #[default]
    Unbound,
    Bound {
        id: SourceId,
        changes: Receiver<Vec<PPos>>,
    },
}

impl SourceBinding {
    fn id(&self) -> Option<SourceId> {
        match self {
            SourceBinding::Unbound => None,
            SourceBinding::Bound { id, .. } => Some(*id),
        }
    }
}

/// What a render pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cells reported as changed
    pub dirty: usize,
    /// Changed cells plus their neighbours
    pub expanded: usize,
    /// Cells with a tile entry that were reclassified
    pub reclassified: usize,
    /// The pass switched to a different visibility source
    pub rebound: bool,
}

impl std::fmt::Display for RenderStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dirty: {}, Expanded: {}, Reclassified: {}, Rebound: {}",
            self.dirty, self.expanded, self.reclassified, self.rebound
        )
    }
}

/// Draws shroud and fog overlays with edge-aware sprites, reclassifying only
/// the cells whose visibility (or whose neighbours' visibility) changed
#[derive(Debug)]
pub struct ShroudRenderer {
    config: ShroudRendererConfig,
    map: Map,
    shroud_sprites: SpriteTable,
    fog_sprites: SpriteTable,
    tiles: TileCache,
    dirty: DirtyTracker,
    binding: SourceBinding,
    visible_under_shroud: VisibilityRule,
    visible_under_fog: VisibilityRule,
    shroud_layer: Option<TerrainSpriteLayer>,
    fog_layer: Option<TerrainSpriteLayer>,
    disposed: bool,
}

impl ShroudRenderer {
    pub fn new(
        config: ShroudRendererConfig,
        map: &Map,
        sequences: &dyn SequenceProvider,
    ) -> Result<Self, ShroudError> {
        config.validate()?;

        let shroud_override = config
            .override_full_shroud
            .as_deref()
            .map(|variant| FullOverride {
                variant,
                edges: config.override_shroud_index,
            });
        let fog_override = config.override_full_fog.as_deref().map(|variant| FullOverride {
            variant,
            edges: config.override_fog_index,
        });

        let shroud_sprites = SpriteTable::build(
            LayerKind::Shroud,
            sequences,
            &config.sequence,
            &config.shroud_variants,
            &config.index,
            shroud_override,
        )?;
        let fog_sprites = SpriteTable::build(
            LayerKind::Fog,
            sequences,
            &config.sequence,
            &config.fog_variants,
            &config.index,
            fog_override,
        )?;

        info!(
            "Shroud renderer ready: {} variants, stride {}, full-tile override: {}",
            shroud_sprites.variant_count(),
            shroud_sprites.stride(),
            config.override_full_shroud.is_some()
        );

        Ok(Self {
            config,
            map: map.clone(),
            shroud_sprites,
            fog_sprites,
            tiles: TileCache::new(),
            dirty: DirtyTracker::new(),
            binding: SourceBinding::Unbound,
            visible_under_shroud: VisibilityRule::InsideMap,
            visible_under_fog: VisibilityRule::InsideMap,
            shroud_layer: None,
            fog_layer: None,
            disposed: false,
        })
    }

    /// Map-loaded hook: build the tile cache, dirty the whole grid and
    /// create the output layers
    pub fn world_loaded<R: Rng>(&mut self, world_type: WorldType, rng: &mut R) {
        self.tiles
            .populate(&self.map, self.shroud_sprites.variant_count(), rng);
        self.dirty.mark_dirty(self.map.projected_cells());

        if self.binding.id().is_none() {
            self.visible_under_shroud = match world_type {
                WorldType::Editor => VisibilityRule::Everywhere,
                WorldType::Regular => VisibilityRule::InsideMap,
            };
            self.visible_under_fog = VisibilityRule::InsideMap;
        }

        self.shroud_layer = Some(TerrainSpriteLayer::new(
            LayerKind::Shroud,
            self.map.size(),
            self.shroud_sprites.sheet(),
            self.config.shroud_blend,
            &self.config.shroud_palette,
        ));
        self.fog_layer = Some(TerrainSpriteLayer::new(
            LayerKind::Fog,
            self.map.size(),
            self.fog_sprites.sheet(),
            self.fog_sprites.blend(),
            &self.config.fog_palette,
        ));

        info!(
            "Shroud tile cache built for {} cells ({:?} world), {} cells dirty",
            self.tiles.len(),
            world_type,
            self.dirty.len()
        );
    }

    /// Record cells whose visibility changed outside of a bound source
    pub fn dirty_cells<I: IntoIterator<Item = PPos>>(&mut self, cells: I) {
        self.dirty.mark_dirty(cells);
    }

    /// Per-frame pass: follow source changes, reclassify dirty cells and
    /// their neighbours, push the results into the layers and draw fog then
    /// shroud
    pub fn render(
        &mut self,
        source: Option<&mut dyn VisibilitySource>,
        viewport: Rect,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        if self.disposed {
            return stats;
        }

        let mut source = source;
        let incoming = source.as_ref().map(|s| s.source_id());
        if incoming != self.binding.id() {
            info!(
                "Shroud source changed from {:?} to {:?}",
                self.binding.id(),
                incoming
            );

            // Replacing the binding drops the old receiver, which unsubscribes
            self.binding = match source.as_mut() {
                Some(s) => SourceBinding::Bound {
                    id: s.source_id(),
                    changes: s.subscribe(),
                },
                None => SourceBinding::Unbound,
            };

            let (shroud, fog) = if incoming.is_some() {
                (VisibilityRule::Explored, VisibilityRule::Visible)
            } else {
                (VisibilityRule::InsideMap, VisibilityRule::InsideMap)
            };
            self.visible_under_shroud = shroud;
            self.visible_under_fog = fog;

            // The whole boundary may have moved
            self.dirty.mark_dirty(self.map.projected_cells());
            stats.rebound = true;
        }

        if let SourceBinding::Bound { changes, .. } = &self.binding {
            for batch in changes.try_iter() {
                self.dirty.mark_dirty(batch);
            }
        }

        let (Some(shroud_layer), Some(fog_layer)) =
            (self.shroud_layer.as_mut(), self.fog_layer.as_mut())
        else {
            debug!("Shroud render skipped: map not loaded yet");
            return stats;
        };

        let source = source.as_deref();
        let map = &self.map;
        let borders = self.config.shroud_on_map_borders;
        let shroud_rule = self.visible_under_shroud;
        let fog_rule = self.visible_under_fog;

        stats.dirty = self.dirty.len();
        let expanded = self.dirty.expand(map);
        stats.expanded = expanded.len();

        for &puv in expanded {
            let uv = map.unproject(puv);
            let Some(tile) = self.tiles.get(uv) else {
                continue;
            };

            let shroud_edges = classify(map, puv, borders, |p| shroud_rule.is_visible(map, source, p));
            let fog_edges = classify(map, puv, borders, |p| fog_rule.is_visible(map, source, p));

            let shroud_sprite = self.shroud_sprites.sprite_for(tile.variant, shroud_edges);
            let fog_sprite = self.fog_sprites.sprite_for(tile.variant, fog_edges);

            shroud_layer.update(uv, shroud_sprite, draw_position(tile.screen_position, shroud_sprite));
            fog_layer.update(uv, fog_sprite, draw_position(tile.screen_position, fog_sprite));
            stats.reclassified += 1;
        }

        self.dirty.clear();

        // Fog goes first so the shroud composites over it
        fog_layer.draw(viewport);
        shroud_layer.draw(viewport);

        if stats.expanded > 0 {
            debug!("Shroud pass: {}", stats);
        }
        stats
    }

    /// Teardown hook: release both layers; repeated calls do nothing
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        for layer in [self.shroud_layer.as_mut(), self.fog_layer.as_mut()]
            .into_iter()
            .flatten()
        {
            layer.release();
        }
        self.binding = SourceBinding::Unbound;
        self.disposed = true;
        info!("Shroud and fog layers released");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn bound_source(&self) -> Option<SourceId> {
        self.binding.id()
    }

    /// Number of raw changes waiting for the next pass
    pub fn pending_dirty(&self) -> usize {
        self.dirty.len()
    }

    pub fn visibility_rules(&self) -> (VisibilityRule, VisibilityRule) {
        (self.visible_under_shroud, self.visible_under_fog)
    }

    pub fn shroud_layer(&self) -> Option<&TerrainSpriteLayer> {
        self.shroud_layer.as_ref()
    }

    pub fn fog_layer(&self) -> Option<&TerrainSpriteLayer> {
        self.fog_layer.as_ref()
    }

    pub fn shroud_sprites(&self) -> &SpriteTable {
        &self.shroud_sprites
    }

    pub fn fog_sprites(&self) -> &SpriteTable {
        &self.fog_sprites
    }

    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn config(&self) -> &ShroudRendererConfig {
        &self.config
    }
}

/// Sprites are drawn centred on the tile anchor, shifted by their pivot
fn draw_position(anchor: Vec3, sprite: Option<&SpriteFrame>) -> Vec3 {
    sprite.map_or(anchor, |sprite| sprite.draw_position(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shroud::config::ShroudSettings;
    use crate::shroud::edges::Edges;
    use crate::shroud::sequences::{SequenceSet, SpriteSequence};
    use crate::shroud::sprite_table::tests::{frame, sequences};
    use crate::tiles::{MPos, MapGridType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::mpsc::{self, Sender};

    /// Visible everywhere except the hidden cells, inside or outside the grid
    struct TestSource {
        id: SourceId,
        hidden: HashSet<PPos>,
        fogged: HashSet<PPos>,
        subscribers: Vec<Sender<Vec<PPos>>>,
    }

    impl TestSource {
        fn new(id: u32, hidden: &[(i32, i32)]) -> Self {
            Self {
                id: SourceId(id),
                hidden: hidden.iter().map(|&(u, v)| PPos::new(u, v)).collect(),
                fogged: HashSet::new(),
                subscribers: Vec::new(),
            }
        }

        fn hide(&mut self, u: i32, v: i32) {
            let puv = PPos::new(u, v);
            self.hidden.insert(puv);
            self.subscribers.retain(|tx| tx.send(vec![puv]).is_ok());
        }

        fn fog(&mut self, u: i32, v: i32) {
            let puv = PPos::new(u, v);
            self.fogged.insert(puv);
            self.subscribers.retain(|tx| tx.send(vec![puv]).is_ok());
        }
    }

    impl VisibilitySource for TestSource {
        fn source_id(&self) -> SourceId {
            self.id
        }

        fn is_explored(&self, puv: PPos) -> bool {
            !self.hidden.contains(&puv)
        }

        fn is_visible(&self, puv: PPos) -> bool {
            !self.hidden.contains(&puv) && !self.fogged.contains(&puv)
        }

        fn subscribe(&mut self) -> Receiver<Vec<PPos>> {
            let (tx, rx) = mpsc::channel();
            self.subscribers.push(tx);
            rx
        }
    }

    fn config() -> ShroudRendererConfig {
        ShroudRendererConfig {
            shroud_variants: vec!["a".into(), "b".into()],
            fog_variants: vec!["a".into(), "b".into()],
            ..Default::default()
        }
    }

    fn grid(size: u32) -> Map {
        Map::new(MapGridType::Rectangular, UVec2::splat(size), UVec2::splat(32))
    }

    fn loaded_renderer(map: &Map) -> ShroudRenderer {
        let mut renderer = ShroudRenderer::new(config(), map, &sequences(&["a", "b"])).unwrap();
        renderer.world_loaded(WorldType::Regular, &mut StdRng::seed_from_u64(3));
        renderer
    }

    fn viewport() -> Rect {
        Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)
    }

    fn expected_frame(renderer: &ShroudRenderer, uv: MPos, edges: Edges) -> Option<u16> {
        let variant = renderer.tiles().get(uv).unwrap().variant;
        renderer.shroud_sprites().sprite_for(variant, edges).map(|s| s.frame)
    }

    fn shroud_frame(renderer: &ShroudRenderer, uv: MPos) -> Option<u16> {
        renderer
            .shroud_layer()
            .unwrap()
            .sprite_at(uv)
            .map(|instance| instance.sprite.frame)
    }

    fn fog_frame(renderer: &ShroudRenderer, uv: MPos) -> Option<u16> {
        renderer
            .fog_layer()
            .unwrap()
            .sprite_at(uv)
            .map(|instance| instance.sprite.frame)
    }

    #[test]
    fn test_single_hidden_cell_end_to_end() {
        let map = grid(4);
        let mut renderer = loaded_renderer(&map);
        let mut source = TestSource::new(1, &[(2, 2)]);

        let stats = renderer.render(Some(&mut source), viewport());
        assert!(stats.rebound);
        assert_eq!(stats.reclassified, 16);

        let centre = MPos::new(2, 2);
        assert_eq!(shroud_frame(&renderer, centre), expected_frame(&renderer, centre, Edges::ALL));

        let neighbours = [
            (MPos::new(2, 1), Edges::BOTTOM),
            (MPos::new(3, 2), Edges::LEFT),
            (MPos::new(2, 3), Edges::TOP),
            (MPos::new(1, 2), Edges::RIGHT),
        ];
        for (uv, edges) in neighbours {
            let expected = expected_frame(&renderer, uv, edges);
            assert!(expected.is_some());
            assert_eq!(shroud_frame(&renderer, uv), expected, "shroud at {:?}", uv);
            assert_eq!(fog_frame(&renderer, uv), expected, "fog at {:?}", uv);
        }

        let touched: HashSet<MPos> = neighbours.iter().map(|(uv, _)| *uv).chain([centre]).collect();
        for uv in map.all_cells().filter(|uv| !touched.contains(uv)) {
            assert_eq!(shroud_frame(&renderer, uv), None, "shroud at {:?}", uv);
            assert_eq!(fog_frame(&renderer, uv), None, "fog at {:?}", uv);
        }

        // Both layers drew the five bound sprites
        assert_eq!(renderer.shroud_layer().unwrap().batch().len(), 5);
        assert_eq!(renderer.fog_layer().unwrap().batch().len(), 5);
    }

    #[test]
    fn test_sprites_are_drawn_centred() {
        let map = grid(4);
        let mut renderer = loaded_renderer(&map);
        let mut source = TestSource::new(1, &[(2, 2)]);
        renderer.render(Some(&mut source), viewport());

        let instance = renderer.shroud_layer().unwrap().sprite_at(MPos::new(2, 2)).unwrap();
        // Anchor (80, 80) minus half of a 32px sprite
        assert_eq!(instance.position, Vec3::new(64.0, 64.0, 0.0));
    }

    #[test]
    fn test_dirty_sets_empty_after_pass() {
        let map = grid(6);
        let mut renderer = loaded_renderer(&map);
        assert_eq!(renderer.pending_dirty(), 36);

        renderer.render(None, viewport());
        assert_eq!(renderer.pending_dirty(), 0);
        assert!(renderer.dirty.is_empty());

        // Nothing changed: nothing to do
        let stats = renderer.render(None, viewport());
        assert_eq!(stats, RenderStats::default());
    }

    #[test]
    fn test_rebinding_dirties_every_cell_once() {
        let map = grid(6);
        let mut renderer = loaded_renderer(&map);
        renderer.render(None, viewport());

        let mut first = TestSource::new(1, &[]);
        let stats = renderer.render(Some(&mut first), viewport());
        assert!(stats.rebound);
        assert_eq!(stats.dirty, map.cell_count());
        assert_eq!(renderer.bound_source(), Some(SourceId(1)));

        let stats = renderer.render(Some(&mut first), viewport());
        assert!(!stats.rebound);
        assert_eq!(stats.dirty, 0);

        // Same visibility, different source: everything is redone anyway
        let mut second = TestSource::new(2, &[]);
        let stats = renderer.render(Some(&mut second), viewport());
        assert!(stats.rebound);
        assert_eq!(stats.dirty, map.cell_count());
        assert_eq!(renderer.bound_source(), Some(SourceId(2)));

        let stats = renderer.render(None, viewport());
        assert!(stats.rebound);
        assert_eq!(stats.dirty, map.cell_count());
        assert_eq!(renderer.bound_source(), None);
        assert_eq!(
            renderer.visibility_rules(),
            (VisibilityRule::InsideMap, VisibilityRule::InsideMap)
        );
    }

    #[test]
    fn test_change_notifications_drive_updates() {
        let map = grid(8);
        let mut renderer = loaded_renderer(&map);
        let mut source = TestSource::new(1, &[]);
        renderer.render(Some(&mut source), viewport());
        assert!(shroud_frame(&renderer, MPos::new(4, 4)).is_none());

        source.hide(4, 4);
        let stats = renderer.render(Some(&mut source), viewport());
        assert!(!stats.rebound);
        assert_eq!(stats.dirty, 1);
        assert_eq!(stats.expanded, 5);
        assert_eq!(stats.reclassified, 5);
        assert_eq!(
            shroud_frame(&renderer, MPos::new(4, 4)),
            expected_frame(&renderer, MPos::new(4, 4), Edges::ALL)
        );

        // Fog only affects the fog layer
        source.fog(1, 6);
        renderer.render(Some(&mut source), viewport());
        assert!(shroud_frame(&renderer, MPos::new(1, 6)).is_none());
        assert!(fog_frame(&renderer, MPos::new(1, 6)).is_some());
        assert!(fog_frame(&renderer, MPos::new(2, 6)).is_some());
    }

    #[test]
    fn test_old_source_is_unsubscribed() {
        let map = grid(6);
        let mut renderer = loaded_renderer(&map);
        let mut first = TestSource::new(1, &[]);
        let mut second = TestSource::new(2, &[]);

        renderer.render(Some(&mut first), viewport());
        renderer.render(Some(&mut second), viewport());

        // The first source's change reaches nobody and is pruned
        first.hide(3, 3);
        assert!(first.subscribers.is_empty());
        let stats = renderer.render(Some(&mut second), viewport());
        assert_eq!(stats.dirty, 0);
    }

    #[test]
    fn test_unbound_hides_outside_map_bounds() {
        let map = grid(6).with_border(1);
        let mut renderer = loaded_renderer(&map);
        renderer.render(None, viewport());

        // Padding is covered, the playable area is clear
        assert_eq!(
            shroud_frame(&renderer, MPos::new(0, 3)),
            expected_frame(&renderer, MPos::new(0, 3), Edges::ALL)
        );
        assert!(shroud_frame(&renderer, MPos::new(3, 3)).is_none());

        // Edges facing the padding are suppressed on the first playable ring
        assert!(shroud_frame(&renderer, MPos::new(1, 3)).is_none());
        assert!(shroud_frame(&renderer, MPos::new(1, 1)).is_none());
    }

    #[test]
    fn test_editor_world_has_no_shroud() {
        let map = grid(6).with_border(1);
        let mut renderer = ShroudRenderer::new(config(), &map, &sequences(&["a", "b"])).unwrap();
        renderer.world_loaded(WorldType::Editor, &mut StdRng::seed_from_u64(3));
        renderer.render(None, viewport());

        assert!(shroud_frame(&renderer, MPos::new(0, 0)).is_none());
        assert!(fog_frame(&renderer, MPos::new(0, 0)).is_some());
        assert_eq!(
            renderer.visibility_rules(),
            (VisibilityRule::Everywhere, VisibilityRule::InsideMap)
        );
    }

    #[test]
    fn test_render_before_load_keeps_dirt() {
        let map = grid(4);
        let mut renderer = ShroudRenderer::new(config(), &map, &sequences(&["a", "b"])).unwrap();
        let mut source = TestSource::new(1, &[]);

        let stats = renderer.render(Some(&mut source), viewport());
        assert!(stats.rebound);
        assert_eq!(stats.reclassified, 0);
        assert_eq!(renderer.pending_dirty(), 16);

        renderer.world_loaded(WorldType::Regular, &mut StdRng::seed_from_u64(3));
        // Bound before load: the source's rules stay in place
        assert_eq!(
            renderer.visibility_rules(),
            (VisibilityRule::Explored, VisibilityRule::Visible)
        );
        let stats = renderer.render(Some(&mut source), viewport());
        assert_eq!(stats.reclassified, 16);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let map = grid(4);
        let mut renderer = loaded_renderer(&map);
        let mut source = TestSource::new(1, &[(1, 1)]);
        renderer.render(Some(&mut source), viewport());

        renderer.dispose();
        assert!(renderer.is_disposed());
        assert!(renderer.shroud_layer().unwrap().is_released());
        assert!(renderer.fog_layer().unwrap().is_released());
        assert_eq!(renderer.bound_source(), None);

        renderer.dispose();
        assert!(renderer.is_disposed());

        let stats = renderer.render(Some(&mut source), viewport());
        assert_eq!(stats, RenderStats::default());
    }

    #[test]
    fn test_construction_rejects_mismatched_variants() {
        let map = grid(4);
        let config = ShroudRendererConfig {
            shroud_variants: vec!["a".into(), "b".into()],
            fog_variants: vec!["a".into(), "b".into(), "a".into()],
            ..Default::default()
        };
        let result = ShroudRenderer::new(config, &map, &sequences(&["a", "b"]));
        assert!(matches!(
            result,
            Err(ShroudError::VariantCountMismatch { shroud: 2, fog: 3 })
        ));
    }

    #[test]
    fn test_construction_rejects_one_sided_override() {
        let map = grid(4);
        let config = ShroudRendererConfig {
            override_full_shroud: Some("full".into()),
            ..config()
        };
        let result = ShroudRenderer::new(config, &map, &sequences(&["a", "b"]));
        assert!(matches!(result, Err(ShroudError::OverrideMismatch)));
    }

    #[test]
    fn test_paired_overrides_resolve_full_tiles() {
        let map = grid(4);
        let mut set: SequenceSet = sequences(&["a", "b"]);
        for (variant, frame_no) in [("full-shroud", 500), ("full-fog", 600)] {
            set.insert(SpriteSequence {
                sequence: "shroud".to_string(),
                variant: variant.to_string(),
                frames: vec![frame(0, frame_no)],
            });
        }

        let config = ShroudRendererConfig {
            override_full_shroud: Some("full-shroud".into()),
            override_full_fog: Some("full-fog".into()),
            override_fog_index: Edges::TOP_LEFT.bits(),
            ..config()
        };
        let renderer = ShroudRenderer::new(config, &map, &set).expect("paired overrides are valid");

        assert_eq!(renderer.shroud_sprites().sprite_for(1, Edges::ALL).unwrap().frame, 500);
        assert_eq!(renderer.fog_sprites().sprite_for(0, Edges::TOP_LEFT).unwrap().frame, 600);
        // The fog table keeps its own frame for fully hidden cells
        assert_eq!(renderer.fog_sprites().sprite_for(0, Edges::ALL).unwrap().frame, 15);
    }

    #[test]
    fn test_shipped_settings_build_a_renderer() {
        let settings =
            ShroudSettings::from_toml_str(include_str!("../../assets/shroud.toml")).unwrap();
        let sequences = SequenceSet::from_definitions(&settings.sheets, &settings.sequences).unwrap();
        let map = Map::from_config(&settings.map);

        let renderer = ShroudRenderer::new(settings.renderer.clone(), &map, &sequences).unwrap();
        assert_eq!(renderer.shroud_sprites().variant_count(), 2);
        assert_eq!(renderer.fog_sprites().sprite_for(1, Edges::ALL).unwrap().frame, 63);
        assert_eq!(renderer.map().cell_count(), 48 * 40);
    }

    #[test]
    fn test_missing_sequence_is_fatal() {
        let map = grid(4);
        let result = ShroudRenderer::new(ShroudRendererConfig::default(), &map, &sequences(&["a"]));
        assert!(matches!(result, Err(ShroudError::MissingSequence { .. })));
    }
}
