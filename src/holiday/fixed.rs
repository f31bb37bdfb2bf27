use super::HolidaySource;
use crate::error::{Result, ScheduleError};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// An explicit list of holidays, authoritative for a declared range of
/// years. Years outside the range are reported as unavailable rather than
/// holiday-free.
#[derive(Debug, Clone)]
pub struct FixedHolidays {
    name: String,
    years: RangeInclusive<i32>,
    dates: BTreeSet<NaiveDate>,
}

impl FixedHolidays {
    pub fn new<I>(name: impl Into<String>, years: RangeInclusive<i32>, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let (start, end) = if years.start() <= years.end() {
            (*years.start(), *years.end())
        } else {
            (*years.end(), *years.start())
        };
        Self {
            name: name.into(),
            years: start..=end,
            dates: dates.into_iter().collect(),
        }
    }

    /// No holidays at all over `years`: only the working week applies.
    pub fn none(years: RangeInclusive<i32>) -> Self {
        Self::new("weekends only", years, std::iter::empty())
    }

    /// Add the same month/day for every covered year, skipping years where
    /// the date does not exist (Feb 29).
    pub fn with_recurring(mut self, month: u32, day: u32) -> Self {
        for year in self.years.clone() {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.dates.insert(date);
            }
        }
        self
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl HolidaySource for FixedHolidays {
    fn name(&self) -> &str {
        &self.name
    }

    fn covered_years(&self) -> RangeInclusive<i32> {
        self.years.clone()
    }

    fn holidays_for(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
        if !self.covers(year) {
            return Err(ScheduleError::unavailable(
                &self.name,
                year,
                "year outside the configured holiday list",
            ));
        }
        Ok(self
            .dates
            .iter()
            .copied()
            .filter(|date| date.year() == year)
            .collect())
    }
}
