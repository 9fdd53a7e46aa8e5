use std::collections::{HashMap, HashSet};
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::items::{ItemKind, Visual};

// ── SheetLayout ──────────────────────────────────────────────────────────────

/// How to cut a sprite sheet into individual sprites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetLayout {
    /// Every sprite is `width` × `height` pixels, laid out left to right, top
    /// to bottom.
    TileSize { width: u32, height: u32 },
    /// The sheet is an even `rows` × `cols` grid.
    Grid { rows: u32, cols: u32 },
    /// Explicit regions, returned in the given order.
    Rects(Vec<Rect>),
}

impl SheetLayout {
    /// Resolve this layout against a `sheet_w` × `sheet_h` sheet.
    ///
    /// Tiles that would run past the right or bottom edge are skipped. Explicit
    /// rects must be non-empty and lie inside the sheet.
    pub fn rects(&self, sheet_w: u32, sheet_h: u32) -> Result<Vec<Rect>> {
        match *self {
            SheetLayout::TileSize { width, height } => {
                if width == 0 || height == 0 {
                    return Err(Error::InvalidSheetLayout(format!(
                        "tile size must be non-zero, got {width}x{height}"
                    )));
                }
                Ok(grid_rects(sheet_w, sheet_h, width, height))
            }
            SheetLayout::Grid { rows, cols } => {
                if rows == 0 || cols == 0 {
                    return Err(Error::InvalidSheetLayout(format!(
                        "grid must have at least one row and column, got {rows}x{cols}"
                    )));
                }
                let (w, h) = (sheet_w / cols, sheet_h / rows);
                if w == 0 || h == 0 {
                    return Err(Error::InvalidSheetLayout(format!(
                        "{rows}x{cols} grid does not fit a {sheet_w}x{sheet_h} sheet"
                    )));
                }
                Ok(grid_rects(sheet_w, sheet_h, w, h))
            }
            SheetLayout::Rects(ref rects) => {
                for (i, r) in rects.iter().enumerate() {
                    if r.is_empty() || !r.fits_within(sheet_w, sheet_h) {
                        return Err(Error::InvalidSheetLayout(format!(
                            "rect {i} {:?} is empty or outside the {sheet_w}x{sheet_h} sheet",
                            [r.x, r.y, r.w, r.h]
                        )));
                    }
                }
                Ok(rects.clone())
            }
        }
    }
}

/// Row-major tiles of `w` × `h` that fit fully inside the sheet.
fn grid_rects(sheet_w: u32, sheet_h: u32, w: u32, h: u32) -> Vec<Rect> {
    let mut out = Vec::new();
    let mut y = 0;
    while y + h <= sheet_h {
        let mut x = 0;
        while x + w <= sheet_w {
            out.push(Rect::new(x, y, w, h));
            x += w;
        }
        y += h;
    }
    out
}

fn crop(sheet: &RgbaImage, r: Rect) -> Result<RgbaImage> {
    let (w, h) = sheet.dimensions();
    if r.is_empty() || !r.fits_within(w, h) {
        return Err(Error::InvalidSheetLayout(format!(
            "region {:?} is empty or outside the {w}x{h} sheet",
            [r.x, r.y, r.w, r.h]
        )));
    }
    Ok(image::imageops::crop_imm(sheet, r.x, r.y, r.w, r.h).to_image())
}

// ── SpriteManifest ───────────────────────────────────────────────────────────

/// Where a named sprite lives: a loaded sheet and, optionally, a region of it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SpriteEntry {
    pub sheet: String,
    /// Whole sheet when absent.
    #[serde(default)]
    pub rect: Option<Rect>,
}

/// Sprite names to sheet coordinates, read from JSON:
///
/// ```json
/// { "sprites": { "lemon": { "sheet": "food", "rect": [0, 32, 32, 32] } } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SpriteManifest {
    #[serde(default)]
    pub sprites: HashMap<String, SpriteEntry>,
}

impl SpriteManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn get(&self, name: &str) -> Option<&SpriteEntry> {
        self.sprites.get(name)
    }
}

// ── AssetCache ───────────────────────────────────────────────────────────────

/// In-memory cache of decoded images and everything derived from them.
///
/// Owned by whoever draws the game. Populate it at startup with
/// [`load_folder`](Self::load_folder), then ask for sprites, tiled
/// backgrounds and item images; each derived surface is built once and kept
/// until [`clear`](Self::clear).
#[derive(Default)]
pub struct AssetCache {
    images: HashMap<String, RgbaImage>,
    sprites: HashMap<(String, Rect), RgbaImage>,
    tiled: HashMap<(String, u32, u32), RgbaImage>,
    swatches: HashMap<([u8; 3], u32), RgbaImage>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `path` recursively for `.png` files and cache each under its file
    /// stem. A stem that is already cached (or seen earlier in the scan) is
    /// skipped; unreadable files are logged and skipped. Returns the number
    /// of images added.
    pub fn load_folder<P: AsRef<Path>>(&mut self, path: P) -> usize {
        let path = path.as_ref();
        let mut seen: HashSet<String> = self.images.keys().cloned().collect();
        let mut added = 0;

        for entry in walkdir::WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };

            if !seen.insert(name.clone()) {
                warn!("assets: duplicate name '{name}' from {}; skipping", file_path.display());
                continue;
            }

            match image::open(file_path) {
                Ok(img) => {
                    self.images.insert(name, img.to_rgba8());
                    added += 1;
                }
                Err(e) => warn!("assets: failed to load {}: {e}", file_path.display()),
            }
        }

        info!("assets: loaded {added} images from {}", path.display());
        added
    }

    /// Load a single image file under `name`, replacing any previous entry.
    pub fn load_image<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<()> {
        let img = image::open(path.as_ref())?.to_rgba8();
        self.insert(name, img);
        Ok(())
    }

    /// Decode an encoded image (PNG) from memory.
    pub fn load_from_memory(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        self.insert(name, img);
        Ok(())
    }

    /// Cache an already-decoded image. Surfaces derived from an older image of
    /// the same name are dropped.
    pub fn insert(&mut self, name: &str, img: RgbaImage) {
        self.sprites.retain(|(sheet, _), _| sheet != name);
        self.tiled.retain(|(tile, _, _), _| tile != name);
        self.images.insert(name.to_string(), img);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn image(&self, name: &str) -> Result<&RgbaImage> {
        self.images.get(name).ok_or_else(|| Error::MissingAsset(name.to_string()))
    }

    /// Cut a cached sheet into sprites. The slices are not cached; use
    /// [`sprite`](Self::sprite) for memoized single regions.
    pub fn slice_sheet(&self, name: &str, layout: &SheetLayout) -> Result<Vec<RgbaImage>> {
        let sheet = self.image(name)?;
        let (w, h) = sheet.dimensions();
        layout.rects(w, h)?.into_iter().map(|r| crop(sheet, r)).collect()
    }

    /// One region of a cached sheet, cropped on first use.
    pub fn sprite(&mut self, sheet: &str, rect: Rect) -> Result<&RgbaImage> {
        let key = (sheet.to_string(), rect);
        if !self.sprites.contains_key(&key) {
            let img = crop(self.image(sheet)?, rect)?;
            self.sprites.insert(key.clone(), img);
        }
        Ok(&self.sprites[&key])
    }

    /// A `width` × `height` surface covered by repeats of the cached image
    /// `tile`, starting at the top-left corner. Edge tiles are clipped.
    pub fn tiled(&mut self, tile: &str, width: u32, height: u32) -> Result<&RgbaImage> {
        let key = (tile.to_string(), width, height);
        if !self.tiled.contains_key(&key) {
            let tile_img = self.image(tile)?;
            let (tw, th) = tile_img.dimensions();
            if tw == 0 || th == 0 {
                return Err(Error::InvalidSheetLayout(format!("tile '{tile}' is empty")));
            }

            let mut surface = RgbaImage::new(width, height);
            for y in (0..height).step_by(th as usize) {
                for x in (0..width).step_by(tw as usize) {
                    image::imageops::replace(&mut surface, tile_img, x as i64, y as i64);
                }
            }
            self.tiled.insert(key.clone(), surface);
        }
        Ok(&self.tiled[&key])
    }

    /// Opaque `size` × `size` square of one colour.
    pub fn swatch(&mut self, color: [u8; 3], size: u32) -> &RgbaImage {
        let [r, g, b] = color;
        self.swatches
            .entry((color, size))
            .or_insert_with(|| RgbaImage::from_pixel(size, size, Rgba([r, g, b, 0xFF])))
    }

    /// The image for an item kind: its swatch, or its sprite as described by
    /// `manifest`.
    pub fn item_image(&mut self, kind: ItemKind, manifest: &SpriteManifest) -> Result<&RgbaImage> {
        match kind.visual() {
            Visual::Swatch { color, size } => Ok(self.swatch(color, size)),
            Visual::Sprite(name) => {
                let entry = manifest.get(name).ok_or_else(|| Error::MissingAsset(name.to_string()))?;
                match entry.rect {
                    Some(rect) => self.sprite(&entry.sheet, rect),
                    None => self.image(&entry.sheet),
                }
            }
        }
    }

    /// Number of cached surfaces of every sort.
    pub fn len(&self) -> usize {
        self.images.len() + self.sprites.len() + self.tiled.len() + self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.sprites.clear();
        self.tiled.clear();
        self.swatches.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── grid_rects() ──────────────────────────────────────────────────────

    #[test]
    fn grid_rects_row_major() {
        let rects = grid_rects(32, 32, 16, 16);
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 16, 16),
                Rect::new(16, 0, 16, 16),
                Rect::new(0, 16, 16, 16),
                Rect::new(16, 16, 16, 16),
            ]
        );
    }

    #[test]
    fn grid_rects_skips_partial_edge_tiles() {
        // 40px wide: two full 16px columns, 8px left over.
        let rects = grid_rects(40, 16, 16, 16);
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.fits_within(40, 16)));
    }

    #[test]
    fn grid_rects_tile_larger_than_sheet_is_empty() {
        assert!(grid_rects(8, 8, 16, 16).is_empty());
    }

    // ── SheetLayout::rects() ──────────────────────────────────────────────

    #[test]
    fn zero_tile_size_rejected() {
        let err = SheetLayout::TileSize { width: 0, height: 16 }.rects(64, 64).unwrap_err();
        assert!(matches!(err, Error::InvalidSheetLayout(_)));
    }

    #[test]
    fn grid_divides_sheet_evenly() {
        let rects = SheetLayout::Grid { rows: 4, cols: 3 }.rects(48, 128).unwrap();
        assert_eq!(rects.len(), 12);
        assert!(rects.iter().all(|r| r.w == 16 && r.h == 32));
    }

    #[test]
    fn grid_too_fine_for_sheet_rejected() {
        let err = SheetLayout::Grid { rows: 1, cols: 10 }.rects(4, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidSheetLayout(_)));
    }

    #[test]
    fn rect_outside_sheet_rejected() {
        let layout = SheetLayout::Rects(vec![Rect::new(0, 0, 16, 16), Rect::new(60, 0, 16, 16)]);
        assert!(layout.rects(64, 64).is_err());
    }

    // ── Cache behaviour ───────────────────────────────────────────────────

    #[test]
    fn swatch_is_solid_and_opaque() {
        let mut cache = AssetCache::new();
        let img = cache.swatch([255, 60, 60], 25);
        assert_eq!(img.dimensions(), (25, 25));
        assert!(img.pixels().all(|p| *p == Rgba([255, 60, 60, 255])));
    }

    #[test]
    fn reinserting_image_drops_derived_sprites() {
        let mut cache = AssetCache::new();
        cache.insert("sheet", RgbaImage::new(32, 32));
        cache.sprite("sheet", Rect::new(0, 0, 16, 16)).unwrap();
        assert_eq!(cache.len(), 2);

        cache.insert("sheet", RgbaImage::new(8, 8));
        assert_eq!(cache.len(), 1);
        assert!(cache.sprite("sheet", Rect::new(0, 0, 16, 16)).is_err());
    }
}
