use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use rayon::prelude::*;

use landscape_stitcher::{discover_maps, CompositeOptions, MapJob, MapOutcome, OverrideTables};

#[derive(Parser, Debug)]
#[command(name = "landscape_stitcher")]
#[command(about = "Rebuild landscape heightmaps and normal maps from exported tile textures")]
struct Args {
    /// Directory containing the {map}.json world dumps
    json_dir: PathBuf,

    /// Directory containing the exported tiles ({map}/{landscape}/{tile}.png)
    #[arg(short, long, default_value = "textures")]
    textures: PathBuf,

    /// Output directory for the generated images
    #[arg(short, long, default_value = "maps")]
    output: PathBuf,

    /// Comma-separated list of maps (all maps found in json_dir if empty)
    #[arg(short, long, value_delimiter = ',')]
    maps: Vec<String>,

    /// Comma-separated list of landscapes (all of them if empty)
    #[arg(short, long, value_delimiter = ',')]
    landscapes: Vec<String>,

    /// Missing tiles override table
    #[arg(long, default_value = "tiles_missing.json")]
    missing: PathBuf,

    /// Misplaced tiles override table
    #[arg(long, default_value = "tiles_misplaced.json")]
    misplaced: PathBuf,

    /// Extra pixels added right and below each canvas
    #[arg(long, default_value = "0")]
    margin: u32,

    /// Keep the canvases unrotated
    #[arg(long)]
    no_rotate: bool,

    /// Render maps in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Worker threads for --parallel (one per core if not specified)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Also write the tile layout image
    #[arg(long)]
    debug: bool,

    /// Log every tile placement
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let overrides = match OverrideTables::load(&args.missing, &args.misplaced) {
        Ok(tables) => tables,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut maps = match discover_maps(&args.json_dir) {
        Ok(maps) => maps,
        Err(e) => {
            error!("Cannot list maps in {}: {}", args.json_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };
    if !args.maps.is_empty() {
        for wanted in &args.maps {
            if !maps.contains(wanted) {
                warn!("Map {} not found in {}", wanted, args.json_dir.display());
            }
        }
        maps.retain(|m| args.maps.contains(m));
    }
    if maps.is_empty() {
        error!("No maps to process");
        return ExitCode::FAILURE;
    }

    let landscape_filter: Option<HashSet<String>> =
        (!args.landscapes.is_empty()).then(|| args.landscapes.iter().cloned().collect());
    let options = CompositeOptions {
        margin: args.margin,
        rotate: !args.no_rotate,
        debug: args.debug,
    };

    println!("Processing {} map(s)...", maps.len());

    // Each job owns its own copy of the tables and opens its own source
    let jobs: Vec<MapJob> = maps
        .into_iter()
        .map(|map_name| MapJob {
            map_name,
            json_dir: args.json_dir.clone(),
            textures_dir: args.textures.clone(),
            output_dir: args.output.clone(),
            landscape_filter: landscape_filter.clone(),
            overrides: overrides.clone(),
            options,
        })
        .collect();

    let outcomes: Vec<MapOutcome> = if args.parallel {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = args.jobs {
            builder = builder.num_threads(jobs);
        }
        match builder.build() {
            Ok(pool) => pool.install(|| jobs.into_par_iter().map(MapJob::run).collect()),
            Err(e) => {
                warn!("Cannot build thread pool ({}), running sequentially", e);
                jobs.into_iter().map(MapJob::run).collect()
            }
        }
    } else {
        jobs.into_iter().map(MapJob::run).collect()
    };

    let mut failed = 0;
    let mut landscapes = 0;
    let mut incomplete = 0;
    let mut unwritten = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(reports) => {
                landscapes += reports.iter().filter(|r| r.is_written()).count();
                unwritten += reports.iter().filter(|r| !r.is_written()).count();
                incomplete += reports.iter().filter(|r| !r.stats.is_complete()).count();
            }
            Err(_) => failed += 1,
        }
    }

    println!("Generation complete:");
    println!("  Maps processed: {}", outcomes.len() - failed);
    println!("  Maps failed: {}", failed);
    println!("  Landscapes written: {} ({} incomplete)", landscapes, incomplete);
    if unwritten > 0 {
        println!("  Landscapes not written: {}", unwritten);
    }
    println!("  Output directory: {}", args.output.display());
    info!("Done");

    if failed == outcomes.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
