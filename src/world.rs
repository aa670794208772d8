//! One map and the landscapes found in its world description.
//!
//! [`MapJob`] is the unit of work handed to a worker: it owns everything
//! needed to process a map and opens its own source.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::composite::CompositeStats;
use crate::landscape::{CompositeOptions, Landscape};
use crate::overrides::OverrideTables;
use crate::source::{AssetSource, JsonExportSource};

/// What was written for one landscape.
#[derive(Clone, Debug)]
pub struct LandscapeReport {
    pub landscape: String,
    pub stats: CompositeStats,
    pub outputs: Vec<PathBuf>,
    /// Set when the images could not be written.
    pub write_error: Option<String>,
}

impl LandscapeReport {
    pub fn is_written(&self) -> bool {
        self.write_error.is_none()
    }
}

pub struct World {
    pub name: String,
    landscape_filter: Option<HashSet<String>>,
    landscapes: BTreeMap<String, Landscape>,
}

impl World {
    pub fn new(name: &str, landscape_filter: Option<HashSet<String>>) -> Self {
        Self {
            name: name.to_string(),
            landscape_filter,
            landscapes: BTreeMap::new(),
        }
    }

    fn accepts(&self, landscape: &str) -> bool {
        self.landscape_filter
            .as_ref()
            .map_or(true, |filter| filter.contains(landscape))
    }

    /// Build and place the tiles of every selected landscape.
    pub fn populate(&mut self, source: &dyn AssetSource, overrides: &OverrideTables) {
        for record in source.landscape_records() {
            if !self.accepts(&record.name) {
                continue;
            }
            let mut landscape = Landscape::from_source(
                source,
                &record.name,
                overrides.for_landscape(&self.name, &record.name),
            );
            landscape.process(&source.component_records(&record.name));
            self.landscapes.insert(record.name.clone(), landscape);
        }
    }

    pub fn landscapes(&self) -> impl Iterator<Item = &Landscape> {
        self.landscapes.values()
    }

    pub fn landscape(&self, name: &str) -> Option<&Landscape> {
        self.landscapes.get(name)
    }

    /// Populate, then generate and write the images of every landscape.
    pub fn process(
        &mut self,
        source: &dyn AssetSource,
        overrides: &OverrideTables,
        options: &CompositeOptions,
        output_dir: &Path,
    ) -> Vec<LandscapeReport> {
        self.populate(source, overrides);

        let mut reports = Vec::with_capacity(self.landscapes.len());
        for landscape in self.landscapes.values() {
            let Some(images) = landscape.generate(source, options) else {
                warn!("{}:{} has no placeable tiles", self.name, landscape.name);
                continue;
            };
            let (outputs, write_error) = match images.save(output_dir, &self.name) {
                Ok(outputs) => (outputs, None),
                Err(e) => {
                    warn!("Cannot write images for {}:{}: {}", self.name, landscape.name, e);
                    (Vec::new(), Some(e.to_string()))
                }
            };

            if images.stats.is_complete() {
                info!("{}:{} ({} tiles)", self.name, landscape.name, images.stats.painted);
            } else {
                warn!(
                    "{}:{} incomplete ({} painted, {} missing, {} overrun)",
                    self.name,
                    landscape.name,
                    images.stats.painted,
                    images.stats.missing,
                    images.stats.overrun
                );
            }

            reports.push(LandscapeReport {
                landscape: landscape.name.clone(),
                stats: images.stats,
                outputs,
                write_error,
            });
        }
        reports
    }
}

/// Everything needed to process one map, owned by the worker running it.
#[derive(Clone, Debug)]
pub struct MapJob {
    pub map_name: String,
    pub json_dir: PathBuf,
    pub textures_dir: PathBuf,
    pub output_dir: PathBuf,
    pub landscape_filter: Option<HashSet<String>>,
    pub overrides: OverrideTables,
    pub options: CompositeOptions,
}

/// Result of one [`MapJob`].
pub struct MapOutcome {
    pub map_name: String,
    pub result: Result<Vec<LandscapeReport>>,
}

impl MapJob {
    pub fn run(self) -> MapOutcome {
        info!("Processing {}", self.map_name);
        let result = self.process();
        if let Err(e) = &result {
            error!("{}: {:#}", self.map_name, e);
        }
        MapOutcome {
            map_name: self.map_name,
            result,
        }
    }

    fn process(&self) -> Result<Vec<LandscapeReport>> {
        let source = JsonExportSource::open(&self.json_dir, &self.textures_dir, &self.map_name)
            .with_context(|| format!("cannot load map {}", self.map_name))?;
        let mut world = World::new(&self.map_name, self.landscape_filter.clone());
        Ok(world.process(&source, &self.overrides, &self.options, &self.output_dir))
    }
}
