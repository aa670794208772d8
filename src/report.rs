//! Placement diagnostics for curating the override tables.

use std::collections::{BTreeMap, HashSet};

use crate::geometry::Point;
use crate::landscape::Landscape;
use crate::tile::parse_number;

/// Visible tiles sharing a grid position, keyed by that position.
///
/// Only positions holding more than one tile are returned; ids are in paint
/// order, so the last one is what ends up on the canvas.
pub fn overlapping_tiles(landscape: &Landscape) -> BTreeMap<Point, Vec<String>> {
    let mut by_position: BTreeMap<Point, Vec<String>> = BTreeMap::new();
    for tile in landscape.tiles() {
        by_position
            .entry(tile.position)
            .or_default()
            .push(tile.id.clone());
    }
    by_position.retain(|_, ids| ids.len() > 1);
    by_position
}

/// Exported textures no tile of the landscape refers to, by number.
pub fn unused_textures(landscape: &Landscape, available: &[String]) -> Vec<String> {
    let used: HashSet<&str> = landscape.tiles().iter().map(|t| t.id.as_str()).collect();
    let mut unused: Vec<String> = available
        .iter()
        .filter(|id| !used.contains(id.as_str()))
        .cloned()
        .collect();
    unused.sort_by_key(|id| (parse_number(id).unwrap_or(u64::MAX), id.clone()));
    unused
}
