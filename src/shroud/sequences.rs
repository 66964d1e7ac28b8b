use super::error::ShroudError;
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Identifier of an image sheet holding packed sprite frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct SheetId(pub u32);

/// How a layer composites onto what is below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
    Multiply,
    Subtractive,
}

/// A single drawable frame: where it lives and how it is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub sheet: SheetId,
    pub blend: BlendMode,
    /// Frame index within the sheet's atlas
    pub frame: u16,
    /// Pivot offset from the anchor, in pixels
    pub offset: Vec3,
    /// Pixel size of the frame
    pub size: Vec3,
}

impl SpriteFrame {
    /// Top-left draw position for a sprite centred on `anchor`
    pub fn draw_position(&self, anchor: Vec3) -> Vec3 {
        anchor + self.offset - 0.5 * self.size
    }

    /// Screen rectangle covered when drawn at `position`
    pub fn bounds_at(&self, position: Vec3) -> Rect {
        let min = position.truncate();
        Rect::from_corners(min, min + self.size.truncate())
    }
}

/// Ordered frames of one (sequence, variant) pair
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSequence {
    pub sequence: String,
    pub variant: String,
    pub frames: Vec<SpriteFrame>,
}

impl SpriteSequence {
    pub fn sprite(&self, frame: usize) -> Result<&SpriteFrame, ShroudError> {
        self.frames.get(frame).ok_or_else(|| ShroudError::MissingFrame {
            sequence: self.sequence.clone(),
            variant: self.variant.clone(),
            frame,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Source of sprite sequences, addressed by sequence name and variant
pub trait SequenceProvider {
    fn sequence(&self, sequence: &str, variant: &str) -> Result<&SpriteSequence, ShroudError>;
}

/// Image sheet as read from the settings file
#[derive(Deserialize, Debug, Clone)]
pub struct SheetDefinition {
    pub id: SheetId,
    pub image: String,
    pub frame_size: [u32; 2],
    pub columns: u32,
    pub rows: u32,
}

/// Sequence as read from the settings file: a run of frames on one sheet
#[derive(Deserialize, Debug, Clone)]
pub struct SequenceDefinition {
    pub sequence: String,
    pub variant: String,
    pub sheet: SheetId,
    #[serde(default)]
    pub start: u16,
    pub length: u16,
    #[serde(default)]
    pub blend: BlendMode,
    #[serde(default)]
    pub offset: [f32; 2],
}

/// In-memory sequence registry
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: HashMap<(String, String), SpriteSequence>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from sheet and sequence definitions
    pub fn from_definitions(
        sheets: &[SheetDefinition],
        sequences: &[SequenceDefinition],
    ) -> Result<Self, ShroudError> {
        let sheet_sizes: HashMap<SheetId, Vec2> = sheets
            .iter()
            .map(|sheet| (sheet.id, UVec2::from_array(sheet.frame_size).as_vec2()))
            .collect();

        let mut set = Self::new();
        for def in sequences {
            let size = *sheet_sizes
                .get(&def.sheet)
                .ok_or(ShroudError::MissingSheet(def.sheet))?;
            let frames = (def.start..def.start + def.length)
                .map(|frame| SpriteFrame {
                    sheet: def.sheet,
                    blend: def.blend,
                    frame,
                    offset: Vec3::new(def.offset[0], def.offset[1], 0.0),
                    size: size.extend(0.0),
                })
                .collect();
            set.insert(SpriteSequence {
                sequence: def.sequence.clone(),
                variant: def.variant.clone(),
                frames,
            });
        }
        Ok(set)
    }

    pub fn insert(&mut self, sequence: SpriteSequence) {
        self.sequences.insert(
            (sequence.sequence.clone(), sequence.variant.clone()),
            sequence,
        );
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl SequenceProvider for SequenceSet {
    fn sequence(&self, sequence: &str, variant: &str) -> Result<&SpriteSequence, ShroudError> {
        self.sequences
            .get(&(sequence.to_string(), variant.to_string()))
            .ok_or_else(|| ShroudError::MissingSequence {
                sequence: sequence.to_string(),
                variant: variant.to_string(),
            })
    }
}
