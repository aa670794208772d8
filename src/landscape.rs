//! One terrain object: its tiles, their placement and the images built from them.
//!
//! A landscape is filled in two steps. [`Landscape::process`] turns component
//! records into tiles, applies the override tables and computes the occupied
//! rectangle. [`Landscape::generate`] then paints every placed tile into the
//! heightmap and normal map canvases and applies the rotation correction.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{RgbImage, RgbaImage};
use log::{debug, warn};

use crate::composite::{Canvas, CompositeStats};
use crate::debug_overlay::DebugOverlay;
use crate::geometry::{Point, Size};
use crate::overrides::LandscapeOverrides;
use crate::record::{LandscapeTransform, Record};
use crate::rotate::rotate_expand;
use crate::source::AssetSource;
use crate::tile::Tile;

/// How the canvases of a landscape are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Extra pixels added right and below the occupied rectangle.
    pub margin: u32,
    /// Rotate the finished canvases by the landscape's inverted yaw.
    pub rotate: bool,
    /// Also draw the tile layout overlay.
    pub debug: bool,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            margin: 0,
            rotate: true,
            debug: false,
        }
    }
}

/// Images produced for one landscape.
pub struct LandscapeImages {
    pub landscape: String,
    pub heightmap: RgbaImage,
    pub normalmap: RgbaImage,
    pub debug: Option<RgbImage>,
    pub stats: CompositeStats,
}

impl LandscapeImages {
    pub fn heightmap_path(&self, output_dir: &Path, map: &str) -> PathBuf {
        output_dir.join(format!("{}_{}_heightmap.png", map, self.landscape))
    }

    pub fn normalmap_path(&self, output_dir: &Path, map: &str) -> PathBuf {
        output_dir.join(format!("{}_{}_normalmap.png", map, self.landscape))
    }

    pub fn debug_path(&self, output_dir: &Path, map: &str) -> PathBuf {
        output_dir.join(format!("{}_{}_debug.png", map, self.landscape))
    }

    /// Write every image as PNG. Returns the written paths.
    pub fn save(&self, output_dir: &Path, map: &str) -> Result<Vec<PathBuf>, image::ImageError> {
        fs::create_dir_all(output_dir)?;

        let mut written = Vec::with_capacity(3);
        if let Some(debug) = &self.debug {
            let path = self.debug_path(output_dir, map);
            debug.save(&path)?;
            written.push(path);
        }
        let path = self.heightmap_path(output_dir, map);
        self.heightmap.save(&path)?;
        written.push(path);

        let path = self.normalmap_path(output_dir, map);
        self.normalmap.save(&path)?;
        written.push(path);

        Ok(written)
    }
}

pub struct Landscape {
    pub name: String,
    pub transform: LandscapeTransform,
    overrides: LandscapeOverrides,
    /// Winning tile per texture id.
    tiles: HashMap<String, Tile>,
    /// Duplicates that lost the merge, kept hidden.
    superseded: Vec<Tile>,
    /// Imported texture sizes by texture id.
    sizes: HashMap<String, Size>,
    top_left: Option<Point>,
    bottom_right: Option<Point>,
}

impl Landscape {
    pub fn new(name: &str, transform: LandscapeTransform, overrides: LandscapeOverrides) -> Self {
        Self {
            name: name.to_string(),
            transform,
            overrides,
            tiles: HashMap::new(),
            superseded: Vec::new(),
            sizes: HashMap::new(),
            top_left: None,
            bottom_right: None,
        }
    }

    /// Gather a landscape's transform and texture sizes from a source.
    pub fn from_source(source: &dyn AssetSource, name: &str, overrides: LandscapeOverrides) -> Self {
        let mut landscape = Landscape::new(name, source.root_transform(name), overrides);
        landscape.register_textures(&source.texture_records(name));
        landscape
    }

    /// Record the imported size of every `Texture2D` record.
    pub fn register_textures(&mut self, textures: &[&Record]) {
        for texture in textures {
            match texture.imported_size() {
                Some(size) => {
                    self.sizes.insert(texture.name.clone(), size);
                }
                None => warn!(
                    "Missing property ImportedSize for {} in {} landscape",
                    texture.name, self.name
                ),
            }
        }
    }

    pub fn set_texture_size(&mut self, tile_id: &str, size: Size) {
        self.sizes.insert(tile_id.to_string(), size);
    }

    pub fn texture_size(&self, tile_id: &str) -> Option<Size> {
        self.sizes.get(tile_id).copied()
    }

    /// Merge a tile into the landscape.
    ///
    /// For an id already present, the incoming tile wins only when it is
    /// at or above-left of the existing one on both axes. The loser is kept
    /// hidden.
    pub fn add_tile(&mut self, mut tile: Tile) {
        tile.visible = true;
        match self.tiles.get_mut(&tile.id) {
            Some(existing) => {
                if tile.position.dominates(&existing.position) {
                    debug!(
                        "{}: {} moves from {} to {}",
                        self.name, tile.id, existing.position, tile.position
                    );
                    std::mem::swap(existing, &mut tile);
                }
                tile.visible = false;
                self.superseded.push(tile);
            }
            None => {
                self.tiles.insert(tile.id.clone(), tile);
            }
        }
    }

    pub fn tile(&self, tile_id: &str) -> Option<&Tile> {
        self.tiles.get(tile_id)
    }

    /// Visible tiles in paint order: ascending number.
    pub fn tiles(&self) -> Vec<&Tile> {
        let mut tiles: Vec<&Tile> = self.tiles.values().collect();
        tiles.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
        tiles
    }

    pub fn superseded(&self) -> &[Tile] {
        &self.superseded
    }

    /// Build the tile set from component records and compute the bounds.
    pub fn process(&mut self, components: &[&Record]) {
        for component in components {
            let mut tile = match Tile::from_component(component) {
                Ok(tile) => tile,
                Err(e) => {
                    warn!("{} ({} landscape)", e, self.name);
                    continue;
                }
            };
            if let Some(position) = self.overrides.absolute_position(&tile.id) {
                debug!("{}: {} misplaced, forced to {}", self.name, tile.id, position);
                tile.position = position;
            }
            self.add_tile(tile);
        }

        let missing: Vec<(String, Point)> = self
            .overrides
            .missing
            .iter()
            .map(|(id, pos)| (id.clone(), Point::from(*pos)))
            .collect();
        for (id, position) in missing {
            match Tile::new(&id, position) {
                Ok(tile) => {
                    debug!("{}: synthesizing missing {} at {}", self.name, id, position);
                    self.add_tile(tile);
                }
                Err(e) => warn!("{} ({} landscape)", e, self.name),
            }
        }

        let offsets: Vec<(String, i32, i32)> = self
            .overrides
            .offsets()
            .map(|(id, dx, dy)| (id.to_string(), dx, dy))
            .collect();
        for (id, dx, dy) in offsets {
            match self.tiles.get_mut(&id) {
                Some(tile) => {
                    tile.position = tile.position.offset(dx, dy);
                    debug!("{}: {} shifted to {}", self.name, id, tile.position);
                }
                None => warn!("Misplaced offset for unknown tile {} in {} landscape", id, self.name),
            }
        }

        self.compute_bounds();
    }

    /// Recompute the occupied rectangle from the visible, sized tiles.
    pub fn compute_bounds(&mut self) {
        self.top_left = None;
        self.bottom_right = None;

        let placed: Vec<(Point, Size)> = self
            .tiles()
            .into_iter()
            .filter_map(|tile| match self.texture_size(&tile.id) {
                Some(size) => Some((tile.position, size)),
                None => {
                    warn!("No texture record for {} in {} landscape", tile.id, self.name);
                    None
                }
            })
            .collect();

        for (position, size) in placed {
            self.update_bounds(position, size);
        }
    }

    fn update_bounds(&mut self, position: Point, size: Size) {
        let right = position.x + size.width as i32;
        let bottom = position.y + size.height as i32;

        let top_left = self.top_left.get_or_insert(position);
        top_left.x = top_left.x.min(position.x);
        top_left.y = top_left.y.min(position.y);

        let bottom_right = self.bottom_right.get_or_insert(Point::new(right, bottom));
        bottom_right.x = bottom_right.x.max(right);
        bottom_right.y = bottom_right.y.max(bottom);
    }

    pub fn top_left(&self) -> Option<Point> {
        self.top_left
    }

    pub fn bottom_right(&self) -> Option<Point> {
        self.bottom_right
    }

    /// Canvas size before margin and rotation. `None` when the placed tiles
    /// cover no area.
    pub fn canvas_size(&self) -> Option<Size> {
        let (tl, br) = (self.top_left?, self.bottom_right?);
        let (width, height) = (br.x - tl.x, br.y - tl.y);
        (width > 0 && height > 0).then(|| Size::new(width as u32, height as u32))
    }

    /// Paint the visible tiles and apply the rotation correction.
    ///
    /// Returns `None` when no tile could be placed. Missing textures and
    /// tiles overrunning the canvas are logged and skipped.
    pub fn generate(&self, source: &dyn AssetSource, options: &CompositeOptions) -> Option<LandscapeImages> {
        let top_left = self.top_left?;
        let size = self.canvas_size()?;
        let width = size.width + options.margin;
        let height = size.height + options.margin;

        let mut canvas = Canvas::new(width, height);
        let mut overlay = options.debug.then(|| DebugOverlay::new(width, height));
        let mut stats = CompositeStats::default();

        if let Some(overlay) = overlay.as_mut() {
            for tile in &self.superseded {
                if let Some(size) = self.texture_size(&tile.id) {
                    let (x, y) = offset_in_canvas(tile.position, top_left);
                    overlay.mark_superseded(x, y, size);
                }
            }
        }

        // Later numbers paint over earlier ones where tiles overlap
        for tile in self.tiles() {
            let Some(tile_size) = self.texture_size(&tile.id) else {
                continue;
            };
            let (x, y) = offset_in_canvas(tile.position, top_left);

            match source.pixel_data(&self.name, &tile.id) {
                Ok(texels) => match canvas.paste(&tile.id, x, y, &texels) {
                    Ok(()) => stats.painted += 1,
                    Err(e) => {
                        warn!("Could not paste {} in {} landscape: {}", tile.id, self.name, e);
                        stats.overrun += 1;
                    }
                },
                Err(e) => {
                    warn!("{}", e);
                    stats.missing += 1;
                }
            }

            if let Some(overlay) = overlay.as_mut() {
                overlay.mark_tile(tile.number, x, y, tile_size);
            }
        }

        let (mut heightmap, mut normalmap) = canvas.finish();
        if options.rotate {
            let angle = -self.transform.rotation.yaw;
            heightmap = rotate_expand(&heightmap, angle);
            normalmap = rotate_expand(&normalmap, angle);
        }

        Some(LandscapeImages {
            landscape: self.name.clone(),
            heightmap,
            normalmap,
            debug: overlay.map(DebugOverlay::into_image),
            stats,
        })
    }
}

fn offset_in_canvas(position: Point, top_left: Point) -> (i64, i64) {
    (
        position.x as i64 - top_left.x as i64,
        position.y as i64 - top_left.y as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotator;
    use crate::overrides::{GridPosition, MisplacedOverride};
    use crate::record::LANDSCAPE_COMPONENT;
    use crate::source::MemorySource;
    use image::Rgba;
    use serde_json::json;
    use tempfile::tempdir;

    const NAME: &str = "Landscape_0";

    fn landscape() -> Landscape {
        Landscape::new(NAME, LandscapeTransform::default(), LandscapeOverrides::default())
    }

    fn tile(id: &str, x: i32, y: i32) -> Tile {
        Tile::new(id, Point::new(x, y)).unwrap()
    }

    fn component(name: &str, texture: &str, x: f64, y: f64) -> Record {
        Record::new(
            LANDSCAPE_COMPONENT,
            name,
            Some(NAME),
            json!({
                "RelativeLocation": { "X": x, "Y": y, "Z": 0.0 },
                "HeightmapTexture": { "ObjectName": format!("Texture2D'{}.{}'", NAME, texture) }
            }),
        )
    }

    fn solid(size: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([value, 0, value, 255]))
    }

    #[test]
    fn test_merge_prefers_dominating_position() {
        // Dominating tile arrives second
        let mut a = landscape();
        a.add_tile(tile("Texture2D_1", 64, 64));
        a.add_tile(tile("Texture2D_1", 0, 0));
        assert_eq!(a.tile("Texture2D_1").unwrap().position, Point::new(0, 0));

        // Dominating tile arrives first
        let mut b = landscape();
        b.add_tile(tile("Texture2D_1", 0, 0));
        b.add_tile(tile("Texture2D_1", 64, 64));
        assert_eq!(b.tile("Texture2D_1").unwrap().position, Point::new(0, 0));

        for l in [&a, &b] {
            assert_eq!(l.tiles().len(), 1);
            assert_eq!(l.superseded().len(), 1);
            assert_eq!(l.superseded()[0].position, Point::new(64, 64));
            assert!(!l.superseded()[0].visible);
            assert!(l.tile("Texture2D_1").unwrap().visible);
        }
    }

    #[test]
    fn test_merge_without_dominance_keeps_first() {
        let mut a = landscape();
        a.add_tile(tile("Texture2D_1", 0, 64));
        a.add_tile(tile("Texture2D_1", 64, 0));
        assert_eq!(a.tile("Texture2D_1").unwrap().position, Point::new(0, 64));

        let mut b = landscape();
        b.add_tile(tile("Texture2D_1", 64, 0));
        b.add_tile(tile("Texture2D_1", 0, 64));
        assert_eq!(b.tile("Texture2D_1").unwrap().position, Point::new(64, 0));
    }

    #[test]
    fn test_tiles_sorted_by_number() {
        let mut l = landscape();
        l.add_tile(tile("Texture2D_100", 0, 0));
        l.add_tile(tile("Texture2D_9", 64, 0));
        l.add_tile(tile("Texture2D_20", 128, 0));
        let numbers: Vec<u64> = l.tiles().iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![9, 20, 100]);
    }

    #[test]
    fn test_process_skips_bad_components() {
        let mut l = landscape();
        l.set_texture_size("Texture2D_10", Size::new(64, 64));
        let broken = Record::new(LANDSCAPE_COMPONENT, "LandscapeComponent_9", Some(NAME), json!({}));
        let unnamed = Record::new(
            LANDSCAPE_COMPONENT,
            "LandscapeComponent_8",
            Some(NAME),
            json!({
                "RelativeLocation": { "X": 0.0, "Y": 0.0 },
                "HeightmapTexture": { "ObjectName": "Weightmap" }
            }),
        );
        let good = component("LandscapeComponent_0", "Texture2D_10", 10.0, 10.0);

        l.process(&[&broken, &unnamed, &good]);
        assert_eq!(l.tiles().len(), 1);
        assert_eq!(l.top_left(), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_missing_override_can_be_refined_by_real_data() {
        let mut overrides = LandscapeOverrides::default();
        overrides
            .missing
            .insert("Texture2D_5".to_string(), GridPosition { x: 128, y: 128 });
        overrides
            .missing
            .insert("Texture2D_6".to_string(), GridPosition { x: 256, y: 0 });
        let mut l = Landscape::new(NAME, LandscapeTransform::default(), overrides);

        let real = component("LandscapeComponent_0", "Texture2D_5", 64.0, 64.0);
        l.process(&[&real]);

        // Real data dominates the placeholder
        assert_eq!(l.tile("Texture2D_5").unwrap().position, Point::new(64, 64));
        // Unmatched placeholder is synthesized
        assert_eq!(l.tile("Texture2D_6").unwrap().position, Point::new(256, 0));
    }

    #[test]
    fn test_missing_override_loses_to_dominated_data() {
        let mut overrides = LandscapeOverrides::default();
        overrides
            .missing
            .insert("Texture2D_5".to_string(), GridPosition { x: 0, y: 0 });
        let mut l = Landscape::new(NAME, LandscapeTransform::default(), overrides);

        let real = component("LandscapeComponent_0", "Texture2D_5", 64.0, 64.0);
        l.process(&[&real]);
        assert_eq!(l.tile("Texture2D_5").unwrap().position, Point::new(0, 0));
    }

    #[test]
    fn test_absolute_misplaced_override_is_authoritative() {
        let mut overrides = LandscapeOverrides::default();
        overrides.misplaced.insert(
            "Texture2D_7".to_string(),
            MisplacedOverride::Absolute { x: 640, y: 1280 },
        );
        let mut l = Landscape::new(NAME, LandscapeTransform::default(), overrides);

        let real = component("LandscapeComponent_0", "Texture2D_7", 0.0, 0.0);
        l.process(&[&real]);
        assert_eq!(l.tile("Texture2D_7").unwrap().position, Point::new(640, 1280));
    }

    #[test]
    fn test_offset_misplaced_override_applies_after_merge() {
        let mut overrides = LandscapeOverrides::default();
        overrides.misplaced.insert(
            "Texture2D_7".to_string(),
            MisplacedOverride::Offset { dx: -64, dy: 128 },
        );
        overrides.misplaced.insert(
            "Texture2D_404".to_string(),
            MisplacedOverride::Offset { dx: 64, dy: 0 },
        );
        let mut l = Landscape::new(NAME, LandscapeTransform::default(), overrides);
        l.set_texture_size("Texture2D_7", Size::new(64, 64));

        let first = component("LandscapeComponent_0", "Texture2D_7", 128.0, 128.0);
        let second = component("LandscapeComponent_1", "Texture2D_7", 192.0, 192.0);
        l.process(&[&first, &second]);

        assert_eq!(l.tile("Texture2D_7").unwrap().position, Point::new(64, 256));
        assert_eq!(l.top_left(), Some(Point::new(64, 256)));
        assert!(l.tile("Texture2D_404").is_none());
    }

    #[test]
    fn test_bounds_contain_every_visible_tile() {
        let mut l = landscape();
        assert!(l.top_left().is_none());
        assert!(l.canvas_size().is_none());

        let placements = [
            ("Texture2D_1", 0, 0, 64),
            ("Texture2D_2", -128, 64, 64),
            ("Texture2D_3", 256, -64, 32),
            ("Texture2D_4", 64, 512, 128),
        ];
        for (id, x, y, size) in placements {
            l.add_tile(tile(id, x, y));
            l.set_texture_size(id, Size::new(size, size));
        }
        // Hidden duplicate far away must not grow the bounds
        l.add_tile(tile("Texture2D_1", 4096, 4096));
        l.compute_bounds();

        let tl = l.top_left().unwrap();
        let br = l.bottom_right().unwrap();
        for t in l.tiles() {
            let size = l.texture_size(&t.id).unwrap();
            assert!(tl.x <= t.position.x && tl.y <= t.position.y);
            assert!(br.x >= t.position.x + size.width as i32);
            assert!(br.y >= t.position.y + size.height as i32);
        }
        assert_eq!(tl, Point::new(-128, -64));
        assert_eq!(br, Point::new(288, 640));
        assert_eq!(l.canvas_size(), Some(Size::new(416, 704)));
    }

    #[test]
    fn test_unsized_tiles_are_left_out() {
        let mut l = landscape();
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.add_tile(tile("Texture2D_2", 640, 640));
        l.set_texture_size("Texture2D_1", Size::new(64, 64));
        l.compute_bounds();
        assert_eq!(l.canvas_size(), Some(Size::new(64, 64)));
    }

    #[test]
    fn test_zero_area_canvas_has_nothing_to_paint() {
        let source = MemorySource::new("TestHex").with_texture(NAME, "Texture2D_1", solid(64, 1));
        let mut l = landscape();
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.set_texture_size("Texture2D_1", Size::new(0, 64));
        l.compute_bounds();

        assert!(l.top_left().is_some());
        assert_eq!(l.canvas_size(), None);
        assert!(l.generate(&source, &CompositeOptions::default()).is_none());
    }

    #[test]
    fn test_two_tiles_end_to_end() {
        let source = MemorySource::new("TestHex")
            .with_texture(NAME, "Texture2D_10", solid(64, 10))
            .with_texture(NAME, "Texture2D_11", solid(64, 11));

        let mut l = landscape();
        l.set_texture_size("Texture2D_10", Size::new(64, 64));
        l.set_texture_size("Texture2D_11", Size::new(64, 64));
        let a = component("LandscapeComponent_0", "Texture2D_10", 100.0, 100.0);
        let b = component("LandscapeComponent_1", "Texture2D_11", 164.0, 100.0);
        l.process(&[&a, &b]);

        assert_eq!(l.tile("Texture2D_10").unwrap().position, Point::new(128, 128));
        assert_eq!(l.tile("Texture2D_11").unwrap().position, Point::new(192, 128));
        assert_eq!(l.canvas_size(), Some(Size::new(128, 64)));

        let images = l.generate(&source, &CompositeOptions::default()).unwrap();
        assert_eq!(images.stats, CompositeStats { painted: 2, missing: 0, overrun: 0 });
        assert_eq!(images.heightmap.dimensions(), (128, 64));
        // Contiguous: no transparent gap, each half from its own tile
        for (x, y, p) in images.heightmap.enumerate_pixels() {
            assert_eq!(p[3], 255, "gap at ({}, {})", x, y);
            assert_eq!(p[0], if x < 64 { 10 } else { 11 });
        }
        assert_eq!(images.normalmap.get_pixel(70, 3), &Rgba([11, 255, 255, 255]));
    }

    #[test]
    fn test_higher_number_paints_last() {
        let source = MemorySource::new("TestHex")
            .with_texture(NAME, "Texture2D_1", solid(64, 1))
            .with_texture(NAME, "Texture2D_2", solid(64, 2));

        let mut l = landscape();
        l.add_tile(tile("Texture2D_2", 0, 0));
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.set_texture_size("Texture2D_1", Size::new(64, 64));
        l.set_texture_size("Texture2D_2", Size::new(64, 64));
        l.compute_bounds();

        let images = l.generate(&source, &CompositeOptions::default()).unwrap();
        assert_eq!(images.heightmap.get_pixel(0, 0)[0], 2);
    }

    #[test]
    fn test_missing_texture_leaves_transparent_hole() {
        let source = MemorySource::new("TestHex")
            .with_texture(NAME, "Texture2D_1", solid(64, 1))
            .with_texture(NAME, "Texture2D_3", solid(64, 3));

        let mut l = landscape();
        for (i, id) in ["Texture2D_1", "Texture2D_2", "Texture2D_3"].iter().enumerate() {
            l.add_tile(tile(id, 64 * i as i32, 0));
            l.set_texture_size(id, Size::new(64, 64));
        }
        l.compute_bounds();

        let images = l.generate(&source, &CompositeOptions::default()).unwrap();
        assert_eq!(images.stats, CompositeStats { painted: 2, missing: 1, overrun: 0 });
        assert!(!images.stats.is_complete());
        assert_eq!(images.heightmap.get_pixel(10, 10)[3], 255);
        assert_eq!(images.heightmap.get_pixel(64 + 10, 10)[3], 0);
        assert_eq!(images.normalmap.get_pixel(64 + 10, 10)[3], 0);
        assert_eq!(images.heightmap.get_pixel(128 + 10, 10)[0], 3);
    }

    #[test]
    fn test_oversized_texture_is_skipped() {
        let source = MemorySource::new("TestHex")
            .with_texture(NAME, "Texture2D_1", solid(64, 1))
            .with_texture(NAME, "Texture2D_2", solid(128, 2));

        let mut l = landscape();
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.add_tile(tile("Texture2D_2", 64, 0));
        // Record claims 64x64, texture is 128x128
        l.set_texture_size("Texture2D_1", Size::new(64, 64));
        l.set_texture_size("Texture2D_2", Size::new(64, 64));
        l.compute_bounds();

        let images = l.generate(&source, &CompositeOptions::default()).unwrap();
        assert_eq!(images.stats, CompositeStats { painted: 1, missing: 0, overrun: 1 });
        assert_eq!(images.heightmap.get_pixel(100, 10)[3], 0);
    }

    #[test]
    fn test_margin_and_rotation() {
        let source = MemorySource::new("TestHex").with_texture(NAME, "Texture2D_1", solid(64, 1));
        let transform = LandscapeTransform {
            rotation: Rotator::new(0.0, 90.0, 0.0),
            ..Default::default()
        };
        let mut l = Landscape::new(NAME, transform, LandscapeOverrides::default());
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.set_texture_size("Texture2D_1", Size::new(64, 64));
        l.compute_bounds();

        let options = CompositeOptions { margin: 64, rotate: false, debug: false };
        let images = l.generate(&source, &options).unwrap();
        assert_eq!(images.heightmap.dimensions(), (128, 128));
        assert_eq!(images.heightmap.get_pixel(100, 100)[3], 0);

        // Wide canvas turns tall
        let options = CompositeOptions { margin: 64, rotate: true, debug: false };
        let mut wide = Landscape::new(NAME, transform, LandscapeOverrides::default());
        wide.add_tile(tile("Texture2D_1", 0, 0));
        wide.set_texture_size("Texture2D_1", Size::new(64, 64));
        wide.set_texture_size("Texture2D_2", Size::new(64, 64));
        wide.add_tile(tile("Texture2D_2", 64, 0));
        wide.compute_bounds();
        let images = wide.generate(&source, &options).unwrap();
        assert_eq!(images.heightmap.dimensions(), (128, 192));
        assert_eq!(images.normalmap.dimensions(), (128, 192));
    }

    #[test]
    fn test_generate_empty_landscape() {
        let source = MemorySource::new("TestHex");
        assert!(landscape().generate(&source, &CompositeOptions::default()).is_none());
    }

    #[test]
    fn test_debug_overlay_and_save() {
        let source = MemorySource::new("TestHex").with_texture(NAME, "Texture2D_1", solid(64, 1));
        let mut l = landscape();
        l.add_tile(tile("Texture2D_1", 0, 0));
        l.add_tile(tile("Texture2D_1", 64, 64));
        l.set_texture_size("Texture2D_1", Size::new(64, 64));
        l.compute_bounds();

        let options = CompositeOptions { debug: true, ..Default::default() };
        let images = l.generate(&source, &options).unwrap();
        let debug = images.debug.as_ref().unwrap();
        assert_eq!(debug.dimensions(), (64 + 500, 64 + 500));

        let dir = tempdir().unwrap();
        let out = dir.path().join("maps");
        let written = images.save(&out, "TestHex").unwrap();
        assert_eq!(written.len(), 3);
        assert!(out.join("TestHex_Landscape_0_heightmap.png").exists());
        assert!(out.join("TestHex_Landscape_0_normalmap.png").exists());
        assert!(out.join("TestHex_Landscape_0_debug.png").exists());

        let reloaded = image::open(out.join("TestHex_Landscape_0_heightmap.png"))
            .unwrap()
            .to_rgba8();
        assert_eq!(reloaded.get_pixel(5, 5), &Rgba([1, 1, 1, 255]));
    }
}
