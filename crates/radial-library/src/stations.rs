//! Station list and conventional file lookup.

use std::path::{Path, PathBuf};

use crate::error::{LibraryError, Result};

/// Conventional station list file names, in lookup order.
pub const STATION_FILES: [&str; 3] = ["stations.txt", "stations", "infra_stas"];

/// First of `candidates` that exists under `dir`.
pub(crate) fn locate(dir: &Path, candidates: &[&str], what: &'static str) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| LibraryError::MissingFile {
            what,
            dir: dir.display().to_string(),
            tried: candidates.join(", "),
        })
}

/// Station names, one per line, blank lines skipped, duplicates dropped.
pub fn parse_stations(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

pub fn load_stations(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| LibraryError::io(path, e))?;
    Ok(parse_stations(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::LibraryFixture;

    #[test]
    fn test_parse_stations() {
        let names = parse_stations("H08S1\n\n  H08N1 \nH08S1\nWK30\n");
        assert_eq!(names, vec!["H08S1", "H08N1", "WK30"]);
    }

    #[test]
    fn test_locate_prefers_first_candidate() {
        let fixture = LibraryFixture::new();
        fixture.write_stations("infra_stas", &["A"]);
        assert!(locate(fixture.root(), &STATION_FILES, "station list")
            .unwrap()
            .ends_with("infra_stas"));

        fixture.write_stations("stations.txt", &["B"]);
        assert!(locate(fixture.root(), &STATION_FILES, "station list")
            .unwrap()
            .ends_with("stations.txt"));
    }

    #[test]
    fn test_locate_missing() {
        let fixture = LibraryFixture::new();
        let err = locate(fixture.root(), &STATION_FILES, "station list").unwrap_err();
        assert!(matches!(err, LibraryError::MissingFile { what: "station list", .. }));
        assert!(err.to_string().contains("infra_stas"));
    }
}
