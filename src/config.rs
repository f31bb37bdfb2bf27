use crate::error::{Result, ScheduleError};
use crate::holiday::Region;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Default cap on consecutive non-working days a scan may cross before
/// giving up (about ten years).
pub const DEFAULT_MAX_SCAN_DAYS: u32 = 3660;

/// Serializable description of a working calendar: which region's
/// holidays apply, which weekdays are worked, and any extra closures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    region: Region,
    #[serde(default = "CalendarConfig::default_working_days")]
    working_days: Vec<Weekday>,
    #[serde(default)]
    extra_holidays: Vec<NaiveDate>,
    #[serde(default = "CalendarConfig::default_max_scan_days")]
    max_scan_days: u32,
}

impl CalendarConfig {
    pub const MON_TO_FRI: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn new<I, J>(region: Region, working_days: I, extra_holidays: J) -> Result<Self>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = extra_holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        let config = Self {
            region,
            working_days: working,
            extra_holidays: holidays,
            max_scan_days: DEFAULT_MAX_SCAN_DAYS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn for_region(region: Region) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    pub fn with_max_scan_days(mut self, days: u32) -> Result<Self> {
        self.max_scan_days = days;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.working_days.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "at least one working day is required".to_string(),
            ));
        }
        if self.max_scan_days == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_scan_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn extra_holidays(&self) -> &[NaiveDate] {
        &self.extra_holidays
    }

    pub fn max_scan_days(&self) -> u32 {
        self.max_scan_days
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let raw: Self = serde_json::from_reader(file)?;
        // Re-run normalisation on whatever the file contained.
        let config = Self::new(raw.region, raw.working_days, raw.extra_holidays)?
            .with_max_scan_days(raw.max_scan_days)?;
        debug!(path = %path.display(), region = %config.region, "calendar config loaded");
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    fn default_working_days() -> Vec<Weekday> {
        Self::MON_TO_FRI.to_vec()
    }

    fn default_max_scan_days() -> u32 {
        DEFAULT_MAX_SCAN_DAYS
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            working_days: Self::default_working_days(),
            extra_holidays: Vec::new(),
            max_scan_days: DEFAULT_MAX_SCAN_DAYS,
        }
    }
}
