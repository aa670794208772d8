//! Landscape heightmap reconstruction library
//!
//! Rebuilds full heightmap and normal-map images of game landscapes from
//! their exported tile textures and world description. Re-exports modules
//! for use by the binaries.

pub mod composite;
pub mod debug_overlay;
pub mod geometry;
pub mod landscape;
pub mod overrides;
pub mod record;
pub mod report;
pub mod rotate;
pub mod source;
pub mod tile;
pub mod world;

pub use landscape::{CompositeOptions, Landscape, LandscapeImages};
pub use overrides::OverrideTables;
pub use source::{discover_maps, AssetSource, JsonExportSource, MemorySource};
pub use world::{MapJob, MapOutcome, World};
