use crate::calendar::WorkdayCalculator;
use crate::error::{Result, ScheduleError};
use crate::input;
use crate::task::Task;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One task placed on the calendar. The inclusive span `[start, end]`
/// contains exactly `duration` workdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration: u32,
}

/// Tasks chained back to back from a start date. Only
/// [`ScheduleBuilder`] creates one, so the totals always agree with the
/// entries; it serializes for export but is not read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    start: NaiveDate,
    entries: Vec<ScheduleEntry>,
    total_working_days: u64,
    final_end: NaiveDate,
    next_available: NaiveDate,
}

impl Schedule {
    /// The requested start date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_working_days(&self) -> u64 {
        self.total_working_days
    }

    pub fn final_end(&self) -> NaiveDate {
        self.final_end
    }

    /// First workday after the last task finishes.
    pub fn next_available(&self) -> NaiveDate {
        self.next_available
    }

    pub fn entry(&self, task_name: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.task_name == task_name)
    }
}

/// A scheduling request as exchanged with callers that batch work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start: NaiveDate,
    pub tasks: Vec<Task>,
}

impl ScheduleRequest {
    pub fn new(start: NaiveDate, tasks: Vec<Task>) -> Self {
        Self { start, tasks }
    }
}

/// Lays tasks out one after another on workdays.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    calculator: WorkdayCalculator,
}

impl ScheduleBuilder {
    pub fn new(calculator: WorkdayCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &WorkdayCalculator {
        &self.calculator
    }

    /// Each task starts at the cursor and ends on its `duration`-th
    /// workday; the next task starts on the first workday strictly after
    /// that, so consecutive tasks never share a day.
    pub fn build(&self, tasks: &[Task], initial_start: NaiveDate) -> Result<Schedule> {
        if tasks.is_empty() {
            return Err(ScheduleError::EmptyTaskList);
        }
        let year = initial_start.year();
        self.calculator.holidays().warm(year..=year)?;

        let mut entries = Vec::with_capacity(tasks.len());
        let mut cursor = initial_start;
        let mut next_available = initial_start;
        for task in tasks {
            let end = self
                .calculator
                .add_workdays(cursor, i64::from(task.duration()))
                .map_err(|err| Self::attach_task(err, task))?;
            entries.push(ScheduleEntry {
                task_name: task.name().to_string(),
                start: cursor,
                end,
                duration: task.duration(),
            });
            next_available = self.calculator.next_workday(end)?;
            cursor = next_available;
        }

        let total_working_days = tasks.iter().map(|task| u64::from(task.duration())).sum();
        let final_end = entries.last().map(|entry| entry.end).unwrap_or(initial_start);

        Ok(Schedule {
            start: initial_start,
            entries,
            total_working_days,
            final_end,
            next_available,
        })
    }

    /// Parse a `YYYY-MM-DD` start date and a `name, duration` task list,
    /// then build.
    pub fn build_from_str(&self, start: &str, tasks_text: &str) -> Result<Schedule> {
        let start = input::parse_start_date(start)?;
        let tasks = input::parse_task_list(tasks_text)?;
        self.build(&tasks, start)
    }

    /// Build independent requests in parallel. Results keep request order.
    pub fn build_batch(&self, requests: &[ScheduleRequest]) -> Vec<Result<Schedule>> {
        requests
            .par_iter()
            .map(|request| self.build(&request.tasks, request.start))
            .collect()
    }

    fn attach_task(err: ScheduleError, task: &Task) -> ScheduleError {
        match err {
            ScheduleError::InvalidDuration { value, task: None } => {
                ScheduleError::InvalidDuration {
                    value,
                    task: Some(task.name().to_string()),
                }
            }
            other => other,
        }
    }
}
