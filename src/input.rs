//! Parsing of the free-text inputs a user types: the start date and the
//! task list (one `name, duration` pair per line).

use crate::error::{Result, ScheduleError};
use crate::task::Task;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_start_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ScheduleError::MalformedDate {
        input: trimmed.to_string(),
    })
}

/// Parse a task list. Blank lines and `#` comments are skipped; names
/// containing commas must be quoted (`"Design, phase 1", 4`).
pub fn parse_task_list(text: &str) -> Result<Vec<Task>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut tasks = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);
        if is_blank(&record) {
            continue;
        }
        tasks.push(parse_record(&record, line)?);
    }
    Ok(tasks)
}

/// Parse a single `name, duration` line, as entered one at a time in the
/// interactive shell.
pub fn parse_task_line(line: &str) -> Result<Task> {
    let mut tasks = parse_task_list(line)?;
    match tasks.len() {
        1 => Ok(tasks.remove(0)),
        0 => Err(ScheduleError::MalformedTaskLine {
            line: 1,
            reason: "expected 'name, duration'".to_string(),
        }),
        n => Err(ScheduleError::MalformedTaskLine {
            line: 1,
            reason: format!("expected one task, found {n}"),
        }),
    }
}

pub fn load_task_file<P: AsRef<Path>>(path: P) -> Result<Vec<Task>> {
    let text = fs::read_to_string(path)?;
    parse_task_list(&text)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn parse_record(record: &StringRecord, line: usize) -> Result<Task> {
    if record.len() != 2 {
        return Err(ScheduleError::MalformedTaskLine {
            line,
            reason: format!(
                "expected 'name, duration' but found {} field(s)",
                record.len()
            ),
        });
    }
    let name = &record[0];
    let raw_duration = &record[1];
    if name.is_empty() {
        return Err(ScheduleError::MalformedTaskLine {
            line,
            reason: "task name is empty".to_string(),
        });
    }
    let duration: i64 = raw_duration
        .parse()
        .map_err(|_| ScheduleError::InvalidDuration {
            value: raw_duration.to_string(),
            task: Some(name.to_string()),
        })?;
    Task::new(name, duration)
}
