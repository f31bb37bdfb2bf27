use crate::config::{CalendarConfig, DEFAULT_MAX_SCAN_DAYS};
use crate::error::{Result, ScheduleError};
use crate::holiday::HolidayCalendar;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use std::sync::Arc;

/// Working-day arithmetic over a working week and a shared holiday
/// calendar. Cloning is cheap; clones share the holiday cache.
#[derive(Debug, Clone)]
pub struct WorkdayCalculator {
    holidays: Arc<HolidayCalendar>,
    non_working_days: HashSet<Weekday>,
    max_scan_days: u32,
}

impl WorkdayCalculator {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Monday to Friday over the given holiday calendar.
    pub fn new(holidays: Arc<HolidayCalendar>) -> Self {
        Self {
            holidays,
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            max_scan_days: DEFAULT_MAX_SCAN_DAYS,
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        config.validate()?;
        let holidays = HolidayCalendar::for_region(config.region())
            .with_extra_holidays(config.extra_holidays().iter().copied());
        Self::new(Arc::new(holidays))
            .with_working_days(config.working_days().iter().copied())?
            .with_max_scan_days(config.max_scan_days())
    }

    /// Only calendars built for a [`Region`](crate::holiday::Region) can
    /// be described as a config.
    pub fn to_config(&self) -> Result<CalendarConfig> {
        let region = self.holidays.region().ok_or_else(|| {
            ScheduleError::InvalidConfig(format!(
                "calendar '{}' is not a built-in region",
                self.holidays.name()
            ))
        })?;
        CalendarConfig::new(region, self.working_days(), self.holidays.extra_holidays())?
            .with_max_scan_days(self.max_scan_days)
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn with_working_days<I>(mut self, days: I) -> Result<Self>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let working: HashSet<Weekday> = days.into_iter().collect();
        if working.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "at least one working day is required".to_string(),
            ));
        }
        self.non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working.contains(day))
            .collect();
        Ok(self)
    }

    pub fn with_max_scan_days(mut self, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_scan_days must be positive".to_string(),
            ));
        }
        self.max_scan_days = days;
        Ok(self)
    }

    pub fn holidays(&self) -> &Arc<HolidayCalendar> {
        &self.holidays
    }

    pub fn working_days(&self) -> Vec<Weekday> {
        Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !self.non_working_days.contains(day))
            .collect()
    }

    pub fn max_scan_days(&self) -> u32 {
        self.max_scan_days
    }

    pub fn is_working_weekday(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
    }

    /// A working weekday that is not a holiday.
    pub fn is_workday(&self, date: NaiveDate) -> Result<bool> {
        if !self.is_working_weekday(date) {
            return Ok(false);
        }
        Ok(!self.holidays.is_holiday(date)?)
    }

    /// First workday strictly after `date`. Like [`Self::add_workdays`],
    /// gives up once more than `max_scan_days` days in a row are closed.
    pub fn next_workday(&self, date: NaiveDate) -> Result<NaiveDate> {
        let mut current = date;
        for _ in 0..=self.max_scan_days {
            current = self.step_forward(current)?;
            if self.is_workday(current)? {
                return Ok(current);
            }
        }
        Err(self.exhausted(date))
    }

    /// First workday strictly before `date`.
    pub fn prev_workday(&self, date: NaiveDate) -> Result<NaiveDate> {
        let mut current = date;
        for _ in 0..=self.max_scan_days {
            current = current
                .pred_opt()
                .ok_or_else(|| self.exhausted(date))?;
            if self.is_workday(current)? {
                return Ok(current);
            }
        }
        Err(self.exhausted(date))
    }

    /// The `n`-th workday counting `start` itself as the first candidate,
    /// so a workday `start` with `n == 1` returns `start`.
    pub fn add_workdays(&self, start: NaiveDate, n: i64) -> Result<NaiveDate> {
        if n <= 0 {
            return Err(ScheduleError::InvalidDuration {
                value: n.to_string(),
                task: None,
            });
        }

        let mut current = start;
        let mut counted = 0;
        let mut idle: u32 = 0;
        loop {
            if self.is_workday(current)? {
                counted += 1;
                if counted == n {
                    return Ok(current);
                }
                idle = 0;
            } else {
                idle += 1;
                if idle > self.max_scan_days {
                    return Err(self.exhausted(start));
                }
            }
            current = self.step_forward(current)?;
        }
    }

    /// Workdays in the inclusive range `[start, end]`; 0 if `start > end`.
    pub fn count_workdays(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let mut count = 0;
        for date in start.iter_days().take_while(|date| *date <= end) {
            if self.is_workday(date)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Get all workdays in a date range
    pub fn workdays_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut days = Vec::new();
        for date in start.iter_days().take_while(|date| *date <= end) {
            if self.is_workday(date)? {
                days.push(date);
            }
        }
        Ok(days)
    }

    fn step_forward(&self, date: NaiveDate) -> Result<NaiveDate> {
        date.succ_opt().ok_or_else(|| self.exhausted(date))
    }

    fn exhausted(&self, from: NaiveDate) -> ScheduleError {
        ScheduleError::scan_exhausted(self.holidays.name(), from, self.max_scan_days)
    }
}

impl Default for WorkdayCalculator {
    fn default() -> Self {
        Self::new(Arc::new(HolidayCalendar::default()))
    }
}
