//! Diagnostic tool for curating the override tables
//! Prints the tile placement of a map, tiles stacked on the same grid cell
//! and exported textures no component refers to

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use landscape_stitcher::report::{overlapping_tiles, unused_textures};
use landscape_stitcher::{AssetSource, JsonExportSource, OverrideTables, World};

#[derive(Parser, Debug)]
#[command(name = "tile_report")]
#[command(about = "Print tile placements, overlaps and unused textures of one map")]
struct Args {
    /// Directory containing the {map}.json world dumps
    json_dir: PathBuf,

    /// Map to inspect
    map: String,

    /// Directory containing the exported tiles
    #[arg(short, long, default_value = "textures")]
    textures: PathBuf,

    /// Comma-separated list of landscapes (all of them if empty)
    #[arg(short, long, value_delimiter = ',')]
    landscapes: Vec<String>,

    #[arg(long, default_value = "tiles_missing.json")]
    missing: PathBuf,

    #[arg(long, default_value = "tiles_misplaced.json")]
    misplaced: PathBuf,

    /// List every placed tile
    #[arg(long)]
    placements: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let overrides = match OverrideTables::load(&args.missing, &args.misplaced) {
        Ok(tables) => tables,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let source = match JsonExportSource::open(&args.json_dir, &args.textures, &args.map) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to load {}: {}", args.map, e);
            return ExitCode::FAILURE;
        }
    };

    let filter = (!args.landscapes.is_empty()).then(|| args.landscapes.iter().cloned().collect());
    let mut world = World::new(&args.map, filter);
    world.populate(&source, &overrides);

    for landscape in world.landscapes() {
        println!("== {}:{}", args.map, landscape.name);
        match (landscape.top_left(), landscape.canvas_size()) {
            (Some(top_left), Some(size)) => println!(
                "  Bounds: {} size {}x{}, yaw {:.2}",
                top_left, size.width, size.height, landscape.transform.rotation.yaw
            ),
            _ => println!("  No placeable tiles"),
        }
        println!(
            "  Tiles: {} visible, {} superseded",
            landscape.tiles().len(),
            landscape.superseded().len()
        );

        if args.placements {
            for tile in landscape.tiles() {
                println!("    {:>16} {}", tile.id, tile.position);
            }
        }

        let overlaps = overlapping_tiles(landscape);
        if !overlaps.is_empty() {
            println!("  Shared cells: {}", overlaps.len());
            for (position, ids) in &overlaps {
                println!("    {} {}", position, ids.join(", "));
            }
        }

        let available = source.available_tiles(&landscape.name);
        let unused = unused_textures(landscape, &available);
        println!("  Unused textures: {}", unused.len());
        for id in &unused {
            println!("    {}", id);
        }
    }

    ExitCode::SUCCESS
}
