use super::edges::{Edges, EDGE_COMBINATIONS};
use super::error::{LayerKind, ShroudError};
use super::sequences::{BlendMode, SequenceProvider, SheetId, SpriteFrame};

/// Full-tile override: an extra frame used for one edge combination in
/// place of the sequence's own frame
#[derive(Debug, Clone, Copy)]
pub struct FullOverride<'a> {
    pub variant: &'a str,
    pub edges: u8,
}

/// Dense (variant, edges) -> sprite lookup for one overlay layer
#[derive(Debug, Clone)]
pub struct SpriteTable {
    layer: LayerKind,
    sprites: Vec<SpriteFrame>,
    variant_count: usize,
    stride: usize,
    edges_to_index: [u8; EDGE_COMBINATIONS],
    sheet: SheetId,
    blend: BlendMode,
}

impl SpriteTable {
    /// Resolve every frame of every variant up front.
    ///
    /// `index[i]` is the edge bitmask drawn by frame `i`. Each variant gets a
    /// block of `stride` sprites; with an override the last slot of the block
    /// holds the override frame and `override.edges` points at it.
    pub fn build(
        layer: LayerKind,
        provider: &dyn SequenceProvider,
        sequence: &str,
        variants: &[String],
        index: &[u8],
        full_override: Option<FullOverride<'_>>,
    ) -> Result<Self, ShroudError> {
        if variants.is_empty() {
            return Err(ShroudError::NoVariants);
        }
        if variants.len() > u8::MAX as usize {
            return Err(ShroudError::TooManyVariants(variants.len()));
        }
        if index.is_empty() {
            return Err(ShroudError::EmptyIndex);
        }
        if index.len() >= u8::MAX as usize {
            return Err(ShroudError::TooManyIndices(index.len()));
        }
        if let Some(&bad) = index.iter().find(|&&bits| bits as usize >= EDGE_COMBINATIONS) {
            return Err(ShroudError::InvalidEdgeIndex(bad));
        }
        if let Some(o) = full_override {
            if o.edges as usize >= EDGE_COMBINATIONS {
                return Err(ShroudError::InvalidEdgeIndex(o.edges));
            }
        }

        let stride = index.len() + usize::from(full_override.is_some());
        let mut sprites = Vec::with_capacity(variants.len() * stride);
        for variant in variants {
            let frames = provider.sequence(sequence, variant)?;
            for i in 0..index.len() {
                sprites.push(*frames.sprite(i)?);
            }

            if let Some(o) = full_override {
                let frames = provider.sequence(sequence, o.variant)?;
                sprites.push(*frames.sprite(0)?);
            }
        }

        // Edge combinations missing from the index fall back to frame 0
        let mut edges_to_index = [0u8; EDGE_COMBINATIONS];
        for (i, &bits) in index.iter().enumerate() {
            edges_to_index[bits as usize] = i as u8;
        }
        if let Some(o) = full_override {
            edges_to_index[o.edges as usize] = (stride - 1) as u8;
        }

        let sheet = sprites[0].sheet;
        if sprites.iter().any(|s| s.sheet != sheet) {
            return Err(ShroudError::MultipleSheets(layer));
        }
        let blend = sprites[0].blend;
        if sprites.iter().any(|s| s.blend != blend) {
            return Err(ShroudError::MixedBlendModes(layer));
        }

        Ok(Self {
            layer,
            sprites,
            variant_count: variants.len(),
            stride,
            edges_to_index,
            sheet,
            blend,
        })
    }

    /// Sprite for a tile variant and edge classification; `None` when no
    /// edge is hidden and nothing needs drawing
    pub fn sprite_for(&self, variant: u8, edges: Edges) -> Option<&SpriteFrame> {
        if edges.is_empty() {
            return None;
        }
        let offset = self.edges_to_index[edges.bits() as usize] as usize;
        self.sprites.get(variant as usize * self.stride + offset)
    }

    pub fn layer(&self) -> LayerKind {
        self.layer
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The one sheet every sprite of this table lives on
    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }
}
