use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Size of the visible play area in pixels and the target frame rate.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720, fps: 60 }
    }
}

impl WindowConfig {
    /// `width / height`, or `0.0` when the height is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}

// ── GameConfig ────────────────────────────────────────────────────────────────

/// Top-level game settings, read from a JSON file.
///
/// Every field is optional in the file; anything left out keeps its default.
///
/// ```json
/// { "window": { "width": 800 }, "reach": 32, "sprites_dir": "assets" }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// How far (Chebyshev, in pixels) the player can reach to pick up or use
    /// something.
    pub reach: i32,
    /// Number of hand slots.
    pub hands: usize,
    /// Folder scanned for `.png` files at startup.
    pub sprites_dir: PathBuf,
    /// Optional sprite manifest mapping sprite names to sheet regions.
    pub manifest: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            reach: 48,
            hands: 2,
            sprites_dir: PathBuf::from("resources/sprites"),
            manifest: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_of_default_window() {
        let w = WindowConfig::default();
        assert!((w.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn aspect_ratio_zero_height() {
        let w = WindowConfig { width: 100, height: 0, fps: 60 };
        assert_eq!(w.aspect_ratio(), 0.0);
    }
}
