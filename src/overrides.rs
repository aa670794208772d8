//! Hand-curated corrections for known export defects.
//!
//! Two tables, both keyed `map -> landscape -> tile id`:
//! - missing tiles to synthesize at a fixed grid position,
//! - misplaced tiles, either moved to an absolute position before they are
//!   merged or shifted by a delta after every tile has been placed.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Point;

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("cannot read override table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid override table {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl From<GridPosition> for Point {
    fn from(pos: GridPosition) -> Self {
        Point::new(pos.x, pos.y)
    }
}

/// Correction for a tile exported at the wrong place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MisplacedOverride {
    /// Replace the snapped position before merging. Authoritative.
    Absolute { x: i32, y: i32 },
    /// Shift the tile that won the merge.
    Offset { dx: i32, dy: i32 },
}

/// Overrides of one landscape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandscapeOverrides {
    pub missing: BTreeMap<String, GridPosition>,
    pub misplaced: BTreeMap<String, MisplacedOverride>,
}

impl LandscapeOverrides {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.misplaced.is_empty()
    }

    /// Absolute replacement for `tile_id`, if one is configured.
    pub fn absolute_position(&self, tile_id: &str) -> Option<Point> {
        match self.misplaced.get(tile_id)? {
            MisplacedOverride::Absolute { x, y } => Some(Point::new(*x, *y)),
            MisplacedOverride::Offset { .. } => None,
        }
    }

    /// Deltas to apply after placement.
    pub fn offsets(&self) -> impl Iterator<Item = (&str, i32, i32)> {
        self.misplaced.iter().filter_map(|(id, fix)| match fix {
            MisplacedOverride::Offset { dx, dy } => Some((id.as_str(), *dx, *dy)),
            MisplacedOverride::Absolute { .. } => None,
        })
    }
}

type Table<T> = HashMap<String, HashMap<String, BTreeMap<String, T>>>;

/// Both override tables for every map.
#[derive(Clone, Debug, Default)]
pub struct OverrideTables {
    missing: Table<GridPosition>,
    misplaced: Table<MisplacedOverride>,
}

impl OverrideTables {
    /// Load both tables. A path that does not exist yields an empty table.
    pub fn load(missing: &Path, misplaced: &Path) -> Result<Self, OverrideError> {
        Ok(Self {
            missing: load_table(missing)?,
            misplaced: load_table(misplaced)?,
        })
    }

    pub fn from_json(missing: &str, misplaced: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            missing: serde_json::from_str(missing)?,
            misplaced: serde_json::from_str(misplaced)?,
        })
    }

    pub fn for_landscape(&self, map: &str, landscape: &str) -> LandscapeOverrides {
        LandscapeOverrides {
            missing: lookup(&self.missing, map, landscape),
            misplaced: lookup(&self.misplaced, map, landscape),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.misplaced.is_empty()
    }
}

fn lookup<T: Clone>(table: &Table<T>, map: &str, landscape: &str) -> BTreeMap<String, T> {
    table
        .get(map)
        .and_then(|landscapes| landscapes.get(landscape))
        .cloned()
        .unwrap_or_default()
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Table<T>, OverrideError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(path).map_err(|source| OverrideError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty document is an empty table
    if text.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(&text).map_err(|source| OverrideError::Json {
        path: path.to_path_buf(),
        source,
    })
}
