use super::HolidaySource;
use crate::error::{Result, ScheduleError};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// Public holidays of the Republic of Korea.
///
/// Solar holidays follow fixed dates. Seollal, Buddha's Birthday and
/// Chuseok follow the lunisolar calendar and come from an embedded table,
/// which bounds the covered years. Substitute holidays are derived with
/// the rules in force for each year.
#[derive(Debug, Clone, Copy, Default)]
pub struct SouthKorea;

/// (year, Seollal, Buddha's Birthday, Chuseok) as (month, day).
const LUNAR_TABLE: &[(i32, (u32, u32), (u32, u32), (u32, u32))] = &[
    (2020, (1, 25), (4, 30), (10, 1)),
    (2021, (2, 12), (5, 19), (9, 21)),
    (2022, (2, 1), (5, 8), (9, 10)),
    (2023, (1, 22), (5, 27), (9, 29)),
    (2024, (2, 10), (5, 15), (9, 17)),
    (2025, (1, 29), (5, 5), (10, 6)),
    (2026, (2, 17), (5, 24), (9, 25)),
    (2027, (2, 7), (5, 13), (9, 15)),
    (2028, (1, 27), (5, 2), (10, 3)),
    (2029, (2, 13), (5, 20), (9, 22)),
    (2030, (2, 3), (5, 9), (9, 12)),
];

/// Election days and one-off days off declared by the government.
const ONE_OFF: &[(i32, u32, u32)] = &[
    (2020, 4, 15),
    (2020, 8, 17),
    (2022, 3, 9),
    (2022, 6, 1),
    (2023, 10, 2),
    (2024, 4, 10),
    (2024, 10, 1),
    (2025, 1, 27),
    (2025, 6, 3),
    (2026, 6, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitute {
    Never,
    /// Seollal and Chuseok: a Sunday or a clash with another holiday.
    OnSundayOrOverlap,
    /// Children's Day: Saturday, Sunday or a clash with another holiday.
    OnWeekendOrOverlap,
    OnWeekend,
}

struct Observance {
    days: Vec<NaiveDate>,
    substitute: Substitute,
}

impl SouthKorea {
    fn lunar_dates(year: i32) -> Option<((u32, u32), (u32, u32), (u32, u32))> {
        LUNAR_TABLE
            .iter()
            .find(|(y, ..)| *y == year)
            .map(|(_, seollal, buddha, chuseok)| (*seollal, *buddha, *chuseok))
    }

    fn observances(&self, year: i32) -> Result<Vec<Observance>> {
        let (seollal, buddha, chuseok) = Self::lunar_dates(year).ok_or_else(|| {
            ScheduleError::unavailable(self.name(), year, "no lunar holiday data for this year")
        })?;
        let date = |(month, day): (u32, u32)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| ScheduleError::unavailable(self.name(), year, "invalid table date"))
        };
        let three_day_block = |center: NaiveDate| -> Vec<NaiveDate> {
            [center.pred_opt(), Some(center), center.succ_opt()]
                .into_iter()
                .flatten()
                .collect()
        };
        let since = |first_year: i32, rule: Substitute| {
            if year >= first_year { rule } else { Substitute::Never }
        };
        let national_day = since(2021, Substitute::OnWeekend);

        let single = |md: (u32, u32), substitute: Substitute| -> Result<Observance> {
            Ok(Observance {
                days: vec![date(md)?],
                substitute,
            })
        };

        Ok(vec![
            // New Year's Day
            single((1, 1), Substitute::Never)?,
            Observance {
                days: three_day_block(date(seollal)?),
                substitute: since(2014, Substitute::OnSundayOrOverlap),
            },
            // Independence Movement Day
            single((3, 1), national_day)?,
            single((5, 5), since(2014, Substitute::OnWeekendOrOverlap))?,
            single(buddha, since(2023, Substitute::OnWeekend))?,
            // Memorial Day
            single((6, 6), Substitute::Never)?,
            // Liberation Day
            single((8, 15), national_day)?,
            Observance {
                days: three_day_block(date(chuseok)?),
                substitute: since(2014, Substitute::OnSundayOrOverlap),
            },
            // National Foundation Day
            single((10, 3), national_day)?,
            // Hangul Day
            single((10, 9), national_day)?,
            single((12, 25), since(2023, Substitute::OnWeekend))?,
        ])
    }

    fn needs_substitute(observance: &Observance, counts: &BTreeMap<NaiveDate, usize>) -> bool {
        let overlaps = || {
            observance
                .days
                .iter()
                .any(|day| counts.get(day).copied().unwrap_or(0) > 1)
        };
        let on = |weekdays: &[Weekday]| {
            observance
                .days
                .iter()
                .any(|day| weekdays.contains(&day.weekday()))
        };
        match observance.substitute {
            Substitute::Never => false,
            Substitute::OnSundayOrOverlap => on(&[Weekday::Sun]) || overlaps(),
            Substitute::OnWeekendOrOverlap => on(&[Weekday::Sat, Weekday::Sun]) || overlaps(),
            Substitute::OnWeekend => on(&[Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl HolidaySource for SouthKorea {
    fn name(&self) -> &str {
        "South Korea"
    }

    fn covered_years(&self) -> RangeInclusive<i32> {
        let first = LUNAR_TABLE.first().map(|row| row.0).unwrap_or(0);
        let last = LUNAR_TABLE.last().map(|row| row.0).unwrap_or(-1);
        first..=last
    }

    fn holidays_for(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
        let mut observances = self.observances(year)?;
        observances.sort_by_key(|obs| obs.days.last().copied());

        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for day in observances.iter().flat_map(|obs| obs.days.iter()) {
            *counts.entry(*day).or_default() += 1;
        }
        let mut holidays: BTreeSet<NaiveDate> = counts.keys().copied().collect();
        holidays.extend(
            ONE_OFF
                .iter()
                .filter(|(y, ..)| *y == year)
                .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(*y, *m, *d)),
        );

        for observance in &observances {
            if !Self::needs_substitute(observance, &counts) {
                continue;
            }
            let Some(mut candidate) = observance.days.last().and_then(|day| day.succ_opt()) else {
                continue;
            };
            while matches!(candidate.weekday(), Weekday::Sat | Weekday::Sun)
                || holidays.contains(&candidate)
            {
                match candidate.succ_opt() {
                    Some(next) => candidate = next,
                    None => break,
                }
            }
            holidays.insert(candidate);
        }

        Ok(holidays)
    }
}
