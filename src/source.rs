//! Where world descriptions and tile textures come from.
//!
//! The landscape pipeline only talks to an [`AssetSource`]. The on-disk
//! export layout is handled by [`JsonExportSource`]:
//! `{json_dir}/{map}.json` for the world dump and
//! `{textures_dir}/{map}/{landscape}/{tile}.png` for the tile textures.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::record::{
    LandscapeTransform, Record, LANDSCAPE, LANDSCAPE_COMPONENT, ROOT_COMPONENT, SCENE_COMPONENT,
    TEXTURE_2D,
};
use crate::tile::parse_number;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid world description {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {tile} not found for {landscape} landscape")]
    TextureNotFound { landscape: String, tile: String },
}

/// Everything the landscape pipeline needs from one map.
pub trait AssetSource {
    fn map_name(&self) -> &str;

    /// Every record of the map's world description.
    fn records(&self) -> &[Record];

    /// Decoded RGBA pixels of one tile texture.
    fn pixel_data(&self, landscape: &str, tile_id: &str) -> Result<RgbaImage, SourceError>;

    /// Ids of the tile textures exported for a landscape, sorted by number.
    fn available_tiles(&self, landscape: &str) -> Vec<String>;

    fn landscape_records(&self) -> Vec<&Record> {
        self.records().iter().filter(|r| r.is_kind(LANDSCAPE)).collect()
    }

    fn component_records(&self, landscape: &str) -> Vec<&Record> {
        scoped(self.records(), LANDSCAPE_COMPONENT, landscape)
    }

    fn texture_records(&self, landscape: &str) -> Vec<&Record> {
        scoped(self.records(), TEXTURE_2D, landscape)
    }

    fn root_transform(&self, landscape: &str) -> LandscapeTransform {
        let root = self.records().iter().find(|r| {
            r.is_kind(SCENE_COMPONENT) && r.name == ROOT_COMPONENT && r.is_scoped_to(landscape)
        });
        LandscapeTransform::from_root_component(root)
    }
}

fn scoped<'a>(records: &'a [Record], kind: &str, outer: &str) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| r.is_kind(kind) && r.is_scoped_to(outer))
        .collect()
}

fn sort_by_number(ids: &mut [String]) {
    ids.sort_by_key(|id| (parse_number(id).unwrap_or(u64::MAX), id.clone()));
}

/// Convert dump entries one by one; malformed entries are logged and dropped.
fn parse_records(map_name: &str, entries: Vec<Value>) -> Vec<Record> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let name = entry
                .get("Name")
                .and_then(Value::as_str)
                .map_or_else(|| format!("entry #{}", index), str::to_string);
            match serde_json::from_value::<Record>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("{}: skipping record {}: {}", map_name, name, e);
                    None
                }
            }
        })
        .collect()
}

/// World dump plus texture directories as written by the asset exporter.
pub struct JsonExportSource {
    map_name: String,
    textures_dir: PathBuf,
    records: Vec<Record>,
}

impl JsonExportSource {
    /// Load `{json_dir}/{map}.json`. Textures are read lazily.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        json_dir: P,
        textures_dir: Q,
        map_name: &str,
    ) -> Result<Self, SourceError> {
        let path = json_dir.as_ref().join(format!("{}.json", map_name));
        let file = File::open(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let entries: Vec<Value> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| SourceError::Json { path, source })?;
        let records = parse_records(map_name, entries);

        Ok(Self {
            map_name: map_name.to_string(),
            textures_dir: textures_dir.as_ref().join(map_name),
            records,
        })
    }

    fn landscape_dir(&self, landscape: &str) -> PathBuf {
        self.textures_dir.join(landscape)
    }

    fn texture_path(&self, landscape: &str, tile_id: &str) -> PathBuf {
        self.landscape_dir(landscape).join(format!("{}.png", tile_id))
    }
}

impl AssetSource for JsonExportSource {
    fn map_name(&self) -> &str {
        &self.map_name
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn pixel_data(&self, landscape: &str, tile_id: &str) -> Result<RgbaImage, SourceError> {
        let path = self.texture_path(landscape, tile_id);
        if !path.exists() {
            return Err(SourceError::TextureNotFound {
                landscape: landscape.to_string(),
                tile: tile_id.to_string(),
            });
        }
        let img = image::open(&path).map_err(|source| SourceError::Image { path, source })?;
        Ok(img.to_rgba8())
    }

    fn available_tiles(&self, landscape: &str) -> Vec<String> {
        let dir = self.landscape_dir(landscape);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No textures listed in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        sort_by_number(&mut ids);
        ids
    }
}

/// Fully in-memory source, for embedding and tests.
#[derive(Default)]
pub struct MemorySource {
    map_name: String,
    records: Vec<Record>,
    textures: HashMap<(String, String), RgbaImage>,
}

impl MemorySource {
    pub fn new(map_name: &str) -> Self {
        Self {
            map_name: map_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_texture(mut self, landscape: &str, tile_id: &str, pixels: RgbaImage) -> Self {
        self.textures
            .insert((landscape.to_string(), tile_id.to_string()), pixels);
        self
    }
}

impl AssetSource for MemorySource {
    fn map_name(&self) -> &str {
        &self.map_name
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn pixel_data(&self, landscape: &str, tile_id: &str) -> Result<RgbaImage, SourceError> {
        self.textures
            .get(&(landscape.to_string(), tile_id.to_string()))
            .cloned()
            .ok_or_else(|| SourceError::TextureNotFound {
                landscape: landscape.to_string(),
                tile: tile_id.to_string(),
            })
    }

    fn available_tiles(&self, landscape: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .textures
            .keys()
            .filter(|(outer, _)| outer == landscape)
            .map(|(_, tile)| tile.clone())
            .collect();
        sort_by_number(&mut ids);
        ids
    }
}

/// Names of the maps that have a world dump in `json_dir`, sorted.
pub fn discover_maps<P: AsRef<Path>>(json_dir: P) -> io::Result<Vec<String>> {
    let mut maps = Vec::new();
    for entry in fs::read_dir(json_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                maps.push(stem.to_string());
            }
        }
    }
    maps.sort();
    Ok(maps)
}
