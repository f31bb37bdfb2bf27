use super::HolidaySource;
use crate::error::{Result, ScheduleError};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// US federal holidays, computed by rule. Fixed-date holidays that land on
/// a weekend are observed on the nearest weekday (Saturday -> Friday,
/// Sunday -> Monday).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitedStates;

impl UnitedStates {
    const FIRST_YEAR: i32 = 1971;
    const LAST_YEAR: i32 = 2200;

    fn fixed_dates(year: i32) -> Vec<(u32, u32)> {
        let mut dates = vec![(1, 1), (7, 4), (11, 11), (12, 25)];
        // Juneteenth
        if year >= 2021 {
            dates.push((6, 19));
        }
        dates
    }

    fn observed(date: NaiveDate) -> NaiveDate {
        match date.weekday() {
            Weekday::Sat => date.pred_opt().unwrap_or(date),
            Weekday::Sun => date.succ_opt().unwrap_or(date),
            _ => date,
        }
    }
}

impl HolidaySource for UnitedStates {
    fn name(&self) -> &str {
        "United States"
    }

    fn covered_years(&self) -> RangeInclusive<i32> {
        Self::FIRST_YEAR..=Self::LAST_YEAR
    }

    fn holidays_for(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
        let missing = || ScheduleError::unavailable(self.name(), year, "date out of range");
        let mut holidays = BTreeSet::new();

        for (month, day) in Self::fixed_dates(year) {
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(missing)?;
            holidays.insert(Self::observed(date));
        }
        // Next New Year's Day observed on Dec 31 of this year.
        if let Some(next) = NaiveDate::from_ymd_opt(year + 1, 1, 1) {
            holidays.insert(Self::observed(next));
        }

        let rules = [
            // Martin Luther King Jr. Day (3rd Monday in January)
            (1, Weekday::Mon, 3),
            // Presidents' Day (3rd Monday in February)
            (2, Weekday::Mon, 3),
            // Labor Day (1st Monday in September)
            (9, Weekday::Mon, 1),
            // Columbus Day (2nd Monday in October)
            (10, Weekday::Mon, 2),
            // Thanksgiving (4th Thursday in November)
            (11, Weekday::Thu, 4),
        ];
        for (month, weekday, n) in rules {
            if month == 1 && year < 1986 {
                continue;
            }
            let date = NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
                .ok_or_else(missing)?;
            holidays.insert(date);
        }

        // Memorial Day (last Monday in May)
        holidays.insert(last_weekday(year, 5, Weekday::Mon).ok_or_else(missing)?);

        Ok(holidays)
    }
}

/// Last occurrence of `weekday` in the given month.
pub(crate) fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = first_of_next.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}
