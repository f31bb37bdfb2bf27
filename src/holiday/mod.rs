//! Holiday sources and the per-year holiday cache the workday calculator
//! reads from.

use crate::error::{Result, ScheduleError};
use chrono::{Datelike, NaiveDate};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub mod fixed;
pub mod korea;
pub mod us;

pub use fixed::FixedHolidays;
pub use korea::SouthKorea;
pub use us::UnitedStates;

/// Something that can list the holidays of a region for a given year.
pub trait HolidaySource: Send + Sync {
    fn name(&self) -> &str;

    /// Years this source has data for. Queries outside the range fail
    /// instead of reporting "no holidays".
    fn covered_years(&self) -> RangeInclusive<i32>;

    /// All holidays falling inside `year`.
    fn holidays_for(&self, year: i32) -> Result<BTreeSet<NaiveDate>>;

    fn covers(&self, year: i32) -> bool {
        self.covered_years().contains(&year)
    }
}

/// Built-in regions selectable from configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "kr")]
    SouthKorea,
    #[serde(rename = "us")]
    UnitedStates,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::SouthKorea => "kr",
            Region::UnitedStates => "us",
        }
    }

    pub fn source(&self) -> Box<dyn HolidaySource> {
        match self {
            Region::SouthKorea => Box::new(SouthKorea),
            Region::UnitedStates => Box::new(UnitedStates),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kr" | "korea" | "south-korea" => Ok(Region::SouthKorea),
            "us" | "usa" | "united-states" => Ok(Region::UnitedStates),
            other => Err(ScheduleError::InvalidConfig(format!(
                "unknown region '{other}' (expected kr or us)"
            ))),
        }
    }
}

/// Answers "is this date a holiday?" for one source, loading and caching
/// one holiday set per year.
///
/// The cache is the only mutable state. Lookups share a read lock; a miss
/// takes the upgradable lock so that only one caller builds a given year
/// while readers of already-loaded years carry on.
pub struct HolidayCalendar {
    source: Box<dyn HolidaySource>,
    region: Option<Region>,
    extra: BTreeSet<NaiveDate>,
    cache: RwLock<HashMap<i32, Arc<BTreeSet<NaiveDate>>>>,
}

impl HolidayCalendar {
    pub fn new(source: impl HolidaySource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn HolidaySource>) -> Self {
        Self {
            source,
            region: None,
            extra: BTreeSet::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn for_region(region: Region) -> Self {
        Self {
            region: Some(region),
            ..Self::from_boxed(region.source())
        }
    }

    /// Additional closures (company days off and the like) merged into
    /// whichever year they fall in.
    pub fn with_extra_holidays<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.extra.extend(dates);
        self.cache.get_mut().clear();
        self
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn covered_years(&self) -> RangeInclusive<i32> {
        self.source.covered_years()
    }

    pub fn extra_holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.extra.iter().copied()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.holidays_in_year(date.year())?.contains(&date))
    }

    /// The holiday set for `year`, loading it on first use.
    pub fn holidays_in_year(&self, year: i32) -> Result<Arc<BTreeSet<NaiveDate>>> {
        if let Some(set) = self.cache.read().get(&year) {
            return Ok(Arc::clone(set));
        }

        let guard = self.cache.upgradable_read();
        // Another loader may have finished while we waited for the lock.
        if let Some(set) = guard.get(&year) {
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(self.load_year(year)?);
        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        guard.insert(year, Arc::clone(&set));
        Ok(set)
    }

    /// Load every year in `years` up front.
    pub fn warm(&self, years: RangeInclusive<i32>) -> Result<()> {
        for year in years {
            self.holidays_in_year(year)?;
        }
        Ok(())
    }

    pub fn cached_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.cache.read().keys().copied().collect();
        years.sort_unstable();
        years
    }

    fn load_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
        if !self.source.covers(year) {
            let range = self.source.covered_years();
            return Err(ScheduleError::unavailable(
                self.source.name(),
                year,
                format!("covered years are {}-{}", range.start(), range.end()),
            ));
        }

        let mut set = self.source.holidays_for(year)?;
        set.retain(|date| date.year() == year);
        set.extend(self.extra.iter().copied().filter(|date| date.year() == year));
        debug!(
            calendar = self.source.name(),
            year,
            holidays = set.len(),
            "loaded holiday set"
        );
        Ok(set)
    }
}

impl fmt::Debug for HolidayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HolidayCalendar")
            .field("source", &self.source.name())
            .field("region", &self.region)
            .field("extra", &self.extra)
            .field("cached_years", &self.cached_years())
            .finish()
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl HolidaySource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn covered_years(&self) -> RangeInclusive<i32> {
            2024..=2026
        }

        fn holidays_for(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(NaiveDate::from_ymd_opt(year, 3, 1).into_iter().collect())
        }
    }

    #[test]
    fn each_year_is_loaded_once_across_threads() {
        let loads = Arc::new(AtomicUsize::new(0));
        let calendar = Arc::new(HolidayCalendar::new(CountingSource {
            loads: Arc::clone(&loads),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let calendar = Arc::clone(&calendar);
                std::thread::spawn(move || {
                    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
                    calendar.is_holiday(date).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(calendar.cached_years(), vec![2025]);
    }

    #[test]
    fn uncovered_year_is_not_cached() {
        let loads = Arc::new(AtomicUsize::new(0));
        let calendar = HolidayCalendar::new(CountingSource {
            loads: Arc::clone(&loads),
        });
        let date = NaiveDate::from_ymd_opt(2030, 3, 1).unwrap();
        assert!(calendar.is_holiday(date).is_err());
        assert!(calendar.cached_years().is_empty());
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn region_parses_aliases() {
        assert_eq!("KR".parse::<Region>().unwrap(), Region::SouthKorea);
        assert_eq!("usa".parse::<Region>().unwrap(), Region::UnitedStates);
        assert!("fr".parse::<Region>().is_err());
    }
}
