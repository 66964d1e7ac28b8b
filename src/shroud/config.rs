use super::error::ShroudError;
use super::sequences::{BlendMode, SequenceDefinition, SheetDefinition};
use crate::tiles::MapConfig;
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default location of the settings file
pub const SETTINGS_PATH: &str = "assets/shroud.toml";

/// Renderer configuration, fixed once the renderer is built
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShroudRendererConfig {
    /// Sequence holding every shroud and fog variant
    pub sequence: String,
    pub shroud_variants: Vec<String>,
    pub fog_variants: Vec<String>,

    pub shroud_palette: String,
    pub fog_palette: String,

    /// Edge bitmask drawn by each frame: bits are top, right, bottom, left
    /// from the least significant bit
    pub index: Vec<u8>,

    /// Draw shroud edges that face the map's own boundary
    pub shroud_on_map_borders: bool,

    /// Override for art that doesn't define a fully shrouded tile
    pub override_full_shroud: Option<String>,
    pub override_shroud_index: u8,

    /// Override for art that doesn't define a fully fogged tile
    pub override_full_fog: Option<String>,
    pub override_fog_index: u8,

    pub shroud_blend: BlendMode,

    /// Seed for the cosmetic per-tile variant choice; random when unset
    pub seed: Option<u64>,
}

impl Default for ShroudRendererConfig {
    fn default() -> Self {
        Self {
            sequence: "shroud".to_string(),
            shroud_variants: vec!["shroud".to_string()],
            fog_variants: vec!["fog".to_string()],
            shroud_palette: "shroud".to_string(),
            fog_palette: "fog".to_string(),
            index: (0..16).collect(),
            shroud_on_map_borders: false,
            override_full_shroud: None,
            override_shroud_index: 15,
            override_full_fog: None,
            override_fog_index: 15,
            shroud_blend: BlendMode::Alpha,
            seed: None,
        }
    }
}

impl ShroudRendererConfig {
    /// Consistency checks that don't need any sprites
    pub fn validate(&self) -> Result<(), ShroudError> {
        if self.shroud_variants.len() != self.fog_variants.len() {
            return Err(ShroudError::VariantCountMismatch {
                shroud: self.shroud_variants.len(),
                fog: self.fog_variants.len(),
            });
        }

        if self.override_full_shroud.is_some() != self.override_full_fog.is_some() {
            return Err(ShroudError::OverrideMismatch);
        }

        if self.shroud_variants.is_empty() {
            return Err(ShroudError::NoVariants);
        }

        if self.shroud_variants.len() > u8::MAX as usize {
            return Err(ShroudError::TooManyVariants(self.shroud_variants.len()));
        }

        if self.index.len() >= u8::MAX as usize {
            return Err(ShroudError::TooManyIndices(self.index.len()));
        }

        Ok(())
    }
}

/// Everything read from the settings file
#[derive(Resource, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ShroudSettings {
    pub renderer: ShroudRendererConfig,
    pub map: MapConfig,
    pub sheets: Vec<SheetDefinition>,
    pub sequences: Vec<SequenceDefinition>,
    /// Palette name -> RGBA tint
    pub palettes: HashMap<String, [f32; 4]>,
}

impl ShroudSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, ShroudError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShroudError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load settings, falling back to defaults when the file can't be used
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(settings) => {
                info!("Loaded shroud settings from {}", path.as_ref().display());
                settings
            }
            Err(e) => {
                warn!(
                    "Failed to load shroud settings from {}: {}, using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Tint for a palette; unknown palettes draw untinted
    pub fn palette_color(&self, palette: &str) -> Color {
        match self.palettes.get(palette) {
            Some(&[r, g, b, a]) => Color::srgba(r, g, b, a),
            None => Color::WHITE,
        }
    }
}
