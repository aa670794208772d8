//! Landscape tiles: one exported heightmap texture placed on the grid.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::geometry::{snap_to_grid, Point};
use crate::record::Record;

/// Prefix shared by every heightmap texture export.
pub const TEXTURE_PREFIX: &str = "Texture2D_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileError {
    #[error("missing property {property} for {record}")]
    MissingProperty { record: String, property: String },
    #[error("cannot extract texture name for {record} from {name:?}")]
    BadTextureName { record: String, name: String },
}

/// One texture of a landscape and where it sits on the grid.
///
/// Identity is the texture id. Paint order uses [`Tile::number`], the
/// trailing integer of the id.
#[derive(Clone, Debug)]
pub struct Tile {
    pub id: String,
    pub number: u64,
    pub position: Point,
    /// False for a duplicate that lost the merge against another tile with
    /// the same id. Hidden tiles are kept for diagnostics only.
    pub visible: bool,
}

impl Tile {
    pub fn new(id: &str, position: Point) -> Result<Self, TileError> {
        let number = parse_number(id).ok_or_else(|| TileError::BadTextureName {
            record: id.to_string(),
            name: id.to_string(),
        })?;
        Ok(Self {
            id: id.to_string(),
            number,
            position,
            visible: true,
        })
    }

    /// Build a tile from a `LandscapeComponent` record.
    ///
    /// The position is the component's relative location snapped to the
    /// grid; the id is the `Texture2D_<n>` part of its heightmap texture.
    pub fn from_component(component: &Record) -> Result<Self, TileError> {
        let missing = |property: &str| TileError::MissingProperty {
            record: component.name.clone(),
            property: property.to_string(),
        };

        let x = component
            .property_f64(&["RelativeLocation", "X"])
            .ok_or_else(|| missing("RelativeLocation.X"))?;
        let y = component
            .property_f64(&["RelativeLocation", "Y"])
            .ok_or_else(|| missing("RelativeLocation.Y"))?;
        let object_name = component
            .property_str(&["HeightmapTexture", "ObjectName"])
            .ok_or_else(|| missing("HeightmapTexture.ObjectName"))?;

        let id = extract_texture_id(object_name).ok_or_else(|| TileError::BadTextureName {
            record: component.name.clone(),
            name: object_name.to_string(),
        })?;

        Tile::new(id, snap_to_grid(x, y)).map_err(|_| TileError::BadTextureName {
            record: component.name.clone(),
            name: object_name.to_string(),
        })
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Trailing integer of an id such as `Texture2D_1342`.
pub fn parse_number(id: &str) -> Option<u64> {
    id.rsplit('_').next()?.parse().ok()
}

/// Find the first `Texture2D_<digits>` occurrence in an object reference.
pub fn extract_texture_id(object_name: &str) -> Option<&str> {
    object_name.match_indices(TEXTURE_PREFIX).find_map(|(start, _)| {
        let digits_start = start + TEXTURE_PREFIX.len();
        let digits = object_name[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        (digits > 0).then(|| &object_name[start..digits_start + digits])
    })
}
