//! On-disk library directories for tests.
//!
//! A library directory holds a station list, a time guide and one grid file
//! per season and station:
//!
//! ```text
//! <root>/stations
//! <root>/time_guide
//! <root>/<SEASON>/<station>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::GridBuilder;

/// The four-season calendar used throughout the tests.
pub const STANDARD_SEASONS: [(&str, Option<u32>); 4] = [
    ("SPRING", Some(100)),
    ("SUMMER", Some(200)),
    ("AUTUMN", Some(300)),
    ("WINTER", Some(365)),
];

/// A temporary library directory, removed on drop.
pub struct LibraryFixture {
    dir: TempDir,
}

impl LibraryFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A fixture with `stations`, the standard calendar and one
    /// [`four_spoke_grid`](crate::four_spoke_grid) per station and season.
    pub fn standard(stations: &[&str]) -> Self {
        let fixture = Self::new();
        fixture.write_stations("stations", stations);
        fixture.write_time_guide("time_guide", 1.5, &STANDARD_SEASONS);
        for (season, _) in STANDARD_SEASONS {
            for station in stations {
                fixture.write_model(season, station, &crate::four_spoke_grid());
            }
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a station list under `file_name`, one name per line.
    pub fn write_stations(&self, file_name: &str, stations: &[&str]) -> PathBuf {
        let mut text = stations.join("\n");
        text.push('\n');
        self.write_text(file_name, &text)
    }

    /// Write a time guide: the conversion bias, then one `SEASON [day]` line each.
    pub fn write_time_guide(
        &self,
        file_name: &str,
        ht_convert: f64,
        seasons: &[(&str, Option<u32>)],
    ) -> PathBuf {
        let mut text = format!("{}\n", ht_convert);
        for (season, day) in seasons {
            match day {
                Some(day) => text.push_str(&format!("{} {}\n", season, day)),
                None => text.push_str(&format!("{}\n", season)),
            }
        }
        self.write_text(file_name, &text)
    }

    /// Write arbitrary text relative to the root.
    pub fn write_text(&self, file_name: &str, text: &str) -> PathBuf {
        let path = self.root().join(file_name);
        fs::write(&path, text).expect("failed to write fixture file");
        path
    }

    /// Encode `grid` into `<root>/<season>/<station>`.
    pub fn write_model(&self, season: &str, station: &str, grid: &GridBuilder) -> PathBuf {
        let dir = self.root().join(season);
        fs::create_dir_all(&dir).expect("failed to create season dir");
        let path = dir.join(station);
        fs::write(&path, grid.encode()).expect("failed to write grid");
        path
    }

    /// Make `<season>/<alias>` a symbolic link to `<season>/<target>`.
    #[cfg(unix)]
    pub fn alias(&self, season: &str, alias: &str, target: &str) -> PathBuf {
        let dir = self.root().join(season);
        let link = dir.join(alias);
        std::os::unix::fs::symlink(dir.join(target), &link).expect("failed to create symlink");
        link
    }
}

impl Default for LibraryFixture {
    fn default() -> Self {
        Self::new()
    }
}
