//! Season calendar ("time guide") of a library directory.
//!
//! ```text
//! 1.5            hydroacoustic conversion bias, seconds
//! SPRING 100     season name and last day of year it covers
//! SUMMER 200
//! WINTER         no day: runs to day 365
//! ```

use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::{LibraryError, Result};

/// Conventional time guide file names, in lookup order.
pub const TIME_GUIDE_FILES: [&str; 2] = ["time_guide.txt", "time_guide"];

const LAST_DAY: u32 = 365;

/// A named season ending (inclusively) on `end_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    pub name: String,
    pub end_day: u32,
}

/// Parsed time guide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGuide {
    /// Uncertainty bias added to T-phase predictions.
    pub ht_convert: f64,
    /// Seasons in file order.
    pub seasons: Vec<Season>,
}

impl TimeGuide {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LibraryError::io(path, e))?;
        Self::parse(&text).map_err(|reason| LibraryError::time_guide(path, reason))
    }

    /// Parse time guide text.
    ///
    /// A bare season name ends on day 365, unless the previous season already
    /// reaches it, in which case the line is ignored.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let first = lines.next().ok_or("empty time guide")?;
        let ht_convert: f64 = first
            .parse()
            .map_err(|_| format!("first line '{}' is not a number", first))?;

        let mut seasons: Vec<Season> = Vec::new();
        for line in lines {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [name, day] => {
                    let end_day = day
                        .parse()
                        .map_err(|_| format!("season {} has invalid end day '{}'", name, day))?;
                    seasons.push(Season {
                        name: name.to_string(),
                        end_day,
                    });
                }
                [name] => {
                    if seasons.last().map_or(true, |s| s.end_day < LAST_DAY) {
                        seasons.push(Season {
                            name: name.to_string(),
                            end_day: LAST_DAY,
                        });
                    }
                }
                _ => return Err(format!("unexpected line '{}'", line)),
            }
        }

        if seasons.is_empty() {
            return Err("no seasons listed".to_string());
        }

        Ok(Self { ht_convert, seasons })
    }

    /// First season whose end day is on or after `day`.
    ///
    /// A day past every season falls back to the first season.
    pub fn season_for(&self, day: u32) -> &Season {
        match self.seasons.iter().find(|s| day <= s.end_day) {
            Some(season) => season,
            None => {
                let first = &self.seasons[0];
                warn!(day, season = %first.name, "Day outside time guide, using first season");
                first
            }
        }
    }
}

/// Day of year on the common-year calendar: Feb 29 and later days of a
/// leap year are shifted back by one so that day 365 is always Dec 31.
pub fn common_day_of_year(date: NaiveDate) -> u32 {
    let ordinal = date.ordinal();
    let leap = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
    if leap && ordinal > 59 {
        ordinal - 1
    } else {
        ordinal
    }
}

/// Common-year day of a UTC timestamp.
pub fn day_of_time(time: DateTime<Utc>) -> u32 {
    common_day_of_year(time.date_naive())
}

/// Common-year day of a `YYYYDDD` date.
pub fn day_of_jdate(jdate: i64) -> Result<u32> {
    let year = i32::try_from(jdate / 1000)
        .map_err(|_| LibraryError::InvalidDate(format!("jdate {} out of range", jdate)))?;
    let ordinal = u32::try_from(jdate % 1000)
        .map_err(|_| LibraryError::InvalidDate(format!("jdate {} is negative", jdate)))?;
    let date = NaiveDate::from_yo_opt(year, ordinal)
        .ok_or_else(|| LibraryError::InvalidDate(format!("jdate {} has no day {}", jdate, ordinal)))?;
    Ok(common_day_of_year(date))
}
