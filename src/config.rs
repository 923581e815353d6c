//! Configuration persistence for markup settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Color, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH, DEFAULT_STAMP_SIZE};
use crate::geometry::DEFAULT_TOLERANCE;
use crate::geometry::handles::HANDLE_SIZE;
use crate::render::CullingConfig;

/// Settings persisted between sessions
///
/// Every field has a serde default so files written by older versions keep
/// loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupConfig {
    /// Viewport culling
    #[serde(default)]
    pub culling: CullingConfig,
    /// Pointer slop for hit-testing, in page units
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f32,
    /// Grab radius of selection handles
    #[serde(default = "default_handle_size")]
    pub handle_size: f32,
    /// Color given to new objects
    #[serde(default)]
    pub color: Color,
    /// Stroke width given to new objects
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// Stroke width of the eraser tool
    #[serde(default = "default_eraser_width")]
    pub eraser_width: f32,
    /// Font size for text, captions and labels
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Size of instruction stamps
    #[serde(default = "default_stamp_size")]
    pub stamp_size: f32,
    /// How far past the cursor a stamp with a leader lands, in stamp sizes
    #[serde(default = "default_stamp_offset_multiplier")]
    pub stamp_offset_multiplier: f32,
    /// Drag distance at which a stamp gets a leader line
    #[serde(default = "default_stamp_leader_threshold")]
    pub stamp_leader_threshold: f32,
    /// Leader length at which a labeled rect switches to its box phase
    #[serde(default = "default_labeled_rect_leader_length")]
    pub labeled_rect_leader_length: f32,
    /// Drags smaller than this are discarded
    #[serde(default = "default_min_shape_size")]
    pub min_shape_size: f32,
    /// TTF/OTF file used to draw glyphs; the bundled DejaVu Sans otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

fn default_hit_tolerance() -> f32 {
    DEFAULT_TOLERANCE
}

fn default_handle_size() -> f32 {
    HANDLE_SIZE
}

fn default_line_width() -> f32 {
    DEFAULT_LINE_WIDTH
}

fn default_eraser_width() -> f32 {
    16.0
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_stamp_size() -> f32 {
    DEFAULT_STAMP_SIZE
}

fn default_stamp_offset_multiplier() -> f32 {
    0.5
}

fn default_stamp_leader_threshold() -> f32 {
    10.0
}

fn default_labeled_rect_leader_length() -> f32 {
    30.0
}

fn default_min_shape_size() -> f32 {
    5.0
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            culling: CullingConfig::default(),
            hit_tolerance: default_hit_tolerance(),
            handle_size: default_handle_size(),
            color: Color::BLACK,
            line_width: default_line_width(),
            eraser_width: default_eraser_width(),
            font_size: default_font_size(),
            stamp_size: default_stamp_size(),
            stamp_offset_multiplier: default_stamp_offset_multiplier(),
            stamp_leader_threshold: default_stamp_leader_threshold(),
            labeled_rect_leader_length: default_labeled_rect_leader_length(),
            min_shape_size: default_min_shape_size(),
            font_path: None,
        }
    }
}

impl MarkupConfig {
    /// Default config file: `<config dir>/pagemark/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pagemark").join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
