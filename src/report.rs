//! Rendering a [`Schedule`] for people and for other tools: the plain-text
//! report, CSV, and a polars `DataFrame` with a boxed text-table view.

use crate::error::Result;
use crate::schedule::Schedule;
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::io;

const NAME_WIDTH: usize = 10;

fn days_label(days: u64) -> &'static str {
    if days == 1 { "day" } else { "days" }
}

impl Schedule {
    /// One line per task plus the summary:
    ///
    /// ```text
    /// Start date: 2025-05-27
    ///
    /// Analysis   | 2025-05-27 → 2025-05-29 | 3 days
    ///
    /// Total working days: 3
    /// Final completion date: 2025-05-29
    /// Next working day: 2025-05-30
    /// ```
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Start date: {}", self.start());
        out.push('\n');
        for entry in self.entries() {
            let duration = u64::from(entry.duration);
            let _ = writeln!(
                out,
                "{:<width$} | {} → {} | {} {}",
                entry.task_name,
                entry.start,
                entry.end,
                duration,
                days_label(duration),
                width = NAME_WIDTH
            );
        }
        out.push('\n');
        let _ = writeln!(out, "Total working days: {}", self.total_working_days());
        let _ = writeln!(out, "Final completion date: {}", self.final_end());
        let _ = write!(out, "Next working day: {}", self.next_available());
        out
    }

    /// Header `task,start,end,duration`, one row per entry.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        #[derive(Serialize)]
        struct Row<'a> {
            task: &'a str,
            start: NaiveDate,
            end: NaiveDate,
            duration: u32,
        }

        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in self.entries() {
            csv_writer.serialize(Row {
                task: &entry.task_name,
                start: entry.start,
                end: entry.end,
                duration: entry.duration,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let entries = self.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.task_name.as_str()).collect();
        let starts: Vec<i32> = entries.iter().map(|e| date_to_i32(e.start)).collect();
        let ends: Vec<i32> = entries.iter().map(|e| date_to_i32(e.end)).collect();
        let durations: Vec<i64> = entries.iter().map(|e| i64::from(e.duration)).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("task"), names).into_column(),
            Series::new(PlSmallStr::from_static("start"), starts)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("end"), ends)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
        ];
        DataFrame::new(columns)
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn date_to_i32(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

fn date_from_i32(days: i32) -> NaiveDate {
    epoch() + Duration::days(i64::from(days))
}

fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Date(days) => date_from_i32(*days).to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Render any frame as a boxed text table.
pub fn render_dataframe(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let headers: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.get(row_idx)
                    .map(|value| cell_text(&value))
                    .unwrap_or_default()
            })
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
