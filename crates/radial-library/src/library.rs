//! A directory of per-station, per-season radial grids.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use radial_model::{InterpolationPolicy, ModelConfig, RadialGridModel};
use tracing::info;

use crate::catalog::{Catalog, LibraryStats, LoadCounters};
use crate::error::{LibraryError, Result};
use crate::registry;
use crate::stations::{load_stations, locate, STATION_FILES};
use crate::time_guide::{day_of_jdate, day_of_time, TimeGuide, TIME_GUIDE_FILES};

#[derive(Debug)]
struct LibraryState {
    stations: Vec<String>,
    guide: TimeGuide,
    catalog: Catalog,
}

/// Resolves (day of year, station) to a lazily loaded [`RadialGridModel`].
///
/// Obtained through [`RadialModelLibrary::open`], which hands out one shared
/// instance per directory and policy. Safe to query from many threads.
#[derive(Debug)]
pub struct RadialModelLibrary {
    root: PathBuf,
    policy: InterpolationPolicy,
    state: RwLock<Option<Arc<LibraryState>>>,
    counters: Arc<LoadCounters>,
}

impl RadialModelLibrary {
    /// Open the library in `dir`; a second call for the same directory and
    /// policy returns the same instance.
    pub fn open(dir: impl AsRef<Path>, config: &ModelConfig) -> Result<Arc<Self>> {
        registry::open(dir, config)
    }

    /// Read the station list and time guide of `root` and index its grid files.
    pub(crate) fn load(root: PathBuf, config: &ModelConfig) -> Result<Self> {
        let stations = load_stations(&locate(&root, &STATION_FILES, "station list")?)?;
        let guide = TimeGuide::load(&locate(&root, &TIME_GUIDE_FILES, "time guide")?)?;
        let counters = Arc::new(LoadCounters::default());
        let catalog = Catalog::scan(&root, &stations, &guide, config, counters.clone())?;

        info!(
            root = %root.display(),
            policy = %config.policy,
            stations = stations.len(),
            seasons = guide.seasons.len(),
            ht_convert = guide.ht_convert,
            "Opened radial model library"
        );

        Ok(Self {
            root,
            policy: config.policy,
            state: RwLock::new(Some(Arc::new(LibraryState {
                stations,
                guide,
                catalog,
            }))),
            counters,
        })
    }

    fn state(&self) -> Result<Arc<LibraryState>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| LibraryError::Closed(self.root.display().to_string()))
    }

    /// Canonical library directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn stats(&self) -> LibraryStats {
        self.counters.snapshot()
    }

    pub fn ht_convert(&self) -> Result<f64> {
        Ok(self.state()?.guide.ht_convert)
    }

    /// Season names in time guide order.
    pub fn seasons(&self) -> Result<Vec<String>> {
        Ok(self.state()?.guide.seasons.iter().map(|s| s.name.clone()).collect())
    }

    pub fn station_names(&self) -> Result<Vec<String>> {
        Ok(self.state()?.stations.clone())
    }

    /// Season covering common-year day `day`.
    pub fn season_for(&self, day: u32) -> Result<String> {
        Ok(self.state()?.guide.season_for(day).name.clone())
    }

    pub fn season_at(&self, time: DateTime<Utc>) -> Result<String> {
        self.season_for(day_of_time(time))
    }

    /// Model for `station` in `season`, loading it on first use.
    pub fn model(&self, season: &str, station: &str) -> Result<Option<Arc<RadialGridModel>>> {
        self.state()?.catalog.model(season, station)
    }

    /// Model for `station` on the season covering `time`.
    pub fn resolve(&self, time: DateTime<Utc>, station: &str) -> Result<Option<Arc<RadialGridModel>>> {
        let season = self.season_at(time)?;
        self.model(&season, station)
    }

    /// Model for `station` on a `YYYYDDD` date.
    pub fn resolve_jdate(&self, jdate: i64, station: &str) -> Result<Option<Arc<RadialGridModel>>> {
        let season = self.season_for(day_of_jdate(jdate)?)?;
        self.model(&season, station)
    }

    /// Every station name of `season` with its model; aliases appear once per name.
    pub fn models(&self, season: &str) -> Result<BTreeMap<String, Arc<RadialGridModel>>> {
        let state = self.state()?;
        let mut models = BTreeMap::new();
        for station in state.catalog.stations(season) {
            if let Some(model) = state.catalog.model(season, &station)? {
                models.insert(station, model);
            }
        }
        Ok(models)
    }

    /// Models of `season` keyed by grid file name, one entry per file.
    pub fn unique_models(&self, season: &str) -> Result<BTreeMap<String, Arc<RadialGridModel>>> {
        Ok(self
            .models(season)?
            .into_values()
            .map(|model| (model.name(), model))
            .collect())
    }

    pub fn models_at(&self, time: DateTime<Utc>) -> Result<BTreeMap<String, Arc<RadialGridModel>>> {
        let season = self.season_at(time)?;
        self.models(&season)
    }

    pub fn has_season(&self, season: &str) -> Result<bool> {
        Ok(self.state()?.catalog.has_season(season))
    }

    /// Release every model and unregister the library.
    ///
    /// Later calls on this instance return [`LibraryError::Closed`]; opening
    /// the directory again builds a fresh library. Models already handed out
    /// stay valid.
    pub fn close(&self) {
        // a registered library is never closed
        registry::forget(self);
        let previous = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!(root = %self.root.display(), "Closed radial model library");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
