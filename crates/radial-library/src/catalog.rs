//! Lazily loaded season x station model catalog.
//!
//! Every grid file is represented by one [`ModelSlot`] keyed by its canonical
//! path. Station names that are symbolic links to the same file share the
//! slot, so the file is parsed once no matter how many names point at it or
//! how many threads touch it first.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use radial_model::{ModelConfig, RadialGridModel};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LibraryError, Result};
use crate::time_guide::TimeGuide;

/// Snapshot of load counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    /// Grid files parsed successfully.
    pub models_loaded: u64,
    /// Grid files that failed to parse.
    pub load_failures: u64,
}

#[derive(Debug, Default)]
pub(crate) struct LoadCounters {
    loaded: AtomicU64,
    failures: AtomicU64,
}

impl LoadCounters {
    pub(crate) fn snapshot(&self) -> LibraryStats {
        LibraryStats {
            models_loaded: self.loaded.load(Ordering::Relaxed),
            load_failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// One grid file, loaded on first use.
#[derive(Debug)]
pub(crate) struct ModelSlot {
    path: PathBuf,
    cell: OnceCell<Arc<RadialGridModel>>,
}

impl ModelSlot {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            cell: OnceCell::new(),
        }
    }

    /// The loaded model, parsing the file if no one has yet.
    ///
    /// A failed load leaves the slot empty so a later call retries.
    fn get(&self, config: &ModelConfig, ht_convert: f64, counters: &LoadCounters) -> Result<Arc<RadialGridModel>> {
        self.cell
            .get_or_try_init(|| {
                let mut model = RadialGridModel::open(&self.path, config).map_err(|e| {
                    counters.failures.fetch_add(1, Ordering::Relaxed);
                    LibraryError::from(e)
                })?;
                model.set_ht_convert(ht_convert);
                counters.loaded.fetch_add(1, Ordering::Relaxed);
                Ok(Arc::new(model))
            })
            .cloned()
    }
}

/// Season name -> station name -> model slot.
#[derive(Debug)]
pub(crate) struct Catalog {
    seasons: BTreeMap<String, BTreeMap<String, Arc<ModelSlot>>>,
    config: ModelConfig,
    ht_convert: f64,
    counters: Arc<LoadCounters>,
}

impl Catalog {
    /// Index every `<root>/<season>/<station>` file that exists. Nothing is parsed yet.
    pub(crate) fn scan(
        root: &Path,
        stations: &[String],
        guide: &TimeGuide,
        config: &ModelConfig,
        counters: Arc<LoadCounters>,
    ) -> Result<Self> {
        let mut by_file: HashMap<PathBuf, Arc<ModelSlot>> = HashMap::new();
        let mut seasons = BTreeMap::new();

        for season in &guide.seasons {
            let dir = root.join(&season.name);
            let mut slots = BTreeMap::new();
            for station in stations {
                let path = dir.join(station);
                if !path.exists() {
                    continue;
                }
                let canonical = path.canonicalize().map_err(|e| LibraryError::io(&path, e))?;
                let slot = by_file
                    .entry(canonical.clone())
                    .or_insert_with(|| Arc::new(ModelSlot::new(canonical)))
                    .clone();
                slots.insert(station.clone(), slot);
            }
            if slots.is_empty() {
                warn!(season = %season.name, dir = %dir.display(), "Season has no grid files");
            }
            seasons.insert(season.name.clone(), slots);
        }

        debug!(root = %root.display(), files = by_file.len(), "Scanned radial model library");

        Ok(Self {
            seasons,
            config: config.clone(),
            ht_convert: guide.ht_convert,
            counters,
        })
    }

    pub(crate) fn has_season(&self, season: &str) -> bool {
        self.seasons.contains_key(season)
    }

    /// Stations with a grid file in `season`.
    pub(crate) fn stations(&self, season: &str) -> Vec<String> {
        self.seasons
            .get(season)
            .map(|slots| slots.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn model(&self, season: &str, station: &str) -> Result<Option<Arc<RadialGridModel>>> {
        match self.seasons.get(season).and_then(|slots| slots.get(station)) {
            Some(slot) => slot
                .get(&self.config, self.ht_convert, &self.counters)
                .map(Some),
            None => Ok(None),
        }
    }
}
