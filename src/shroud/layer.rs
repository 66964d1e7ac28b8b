use super::error::LayerKind;
use super::sequences::{BlendMode, SheetId, SpriteFrame};
use crate::tiles::{CellLayer, MPos};
use bevy::prelude::*;

/// A sprite bound to a cell slot, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    pub cell: MPos,
    pub sprite: SpriteFrame,
    /// Top-left draw position in screen space
    pub position: Vec3,
}

/// Batches one sprite per cell from a single sheet and blend mode, and
/// hands out the instances that intersect the viewport on draw
#[derive(Debug)]
pub struct TerrainSpriteLayer {
    kind: LayerKind,
    sheet: SheetId,
    blend: BlendMode,
    palette: String,
    slots: CellLayer<Option<SpriteInstance>>,
    batch: Vec<SpriteInstance>,
    released: bool,
}

impl TerrainSpriteLayer {
    pub fn new(kind: LayerKind, size: UVec2, sheet: SheetId, blend: BlendMode, palette: &str) -> Self {
        Self {
            kind,
            sheet,
            blend,
            palette: palette.to_string(),
            slots: CellLayer::new(size),
            batch: Vec::new(),
            released: false,
        }
    }

    /// Bind `sprite` at `position` to the slot for `uv`, or clear the slot
    pub fn update(&mut self, uv: MPos, sprite: Option<&SpriteFrame>, position: Vec3) {
        if self.released {
            return;
        }

        let instance = sprite.map(|&sprite| {
            debug_assert_eq!(sprite.sheet, self.sheet, "{} layer sprite from a foreign sheet", self.kind);
            SpriteInstance {
                cell: uv,
                sprite,
                position,
            }
        });
        self.slots.set(uv, instance);
    }

    /// Rebuild the draw batch from every bound slot visible in `viewport`
    pub fn draw(&mut self, viewport: Rect) -> &[SpriteInstance] {
        self.batch.clear();
        if self.released {
            return &self.batch;
        }

        self.batch.extend(
            self.slots
                .iter()
                .filter_map(|(_, slot)| *slot)
                .filter(|instance| {
                    !viewport
                        .intersect(instance.sprite.bounds_at(instance.position))
                        .is_empty()
                }),
        );
        &self.batch
    }

    /// Free the layer's contents; later calls are no-ops
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.slots.clear(None);
        self.batch = Vec::new();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Instances produced by the last draw
    pub fn batch(&self) -> &[SpriteInstance] {
        &self.batch
    }

    pub fn sprite_at(&self, uv: MPos) -> Option<&SpriteInstance> {
        self.slots.get(uv).and_then(|slot| slot.as_ref())
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn palette(&self) -> &str {
        &self.palette
    }
}
