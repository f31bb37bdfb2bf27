use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Every failure the planner can report. Scheduling either returns a
/// complete schedule or one of these, never a partial result.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(
        "invalid duration '{value}'{}: must be a positive whole number of working days",
        .task.as_ref().map(|name| format!(" for task '{name}'")).unwrap_or_default()
    )]
    InvalidDuration { value: String, task: Option<String> },

    #[error("task list is empty")]
    EmptyTaskList,

    #[error("task name must not be empty")]
    InvalidTaskName,

    #[error("holiday calendar '{calendar}' has no data for {year}: {reason}")]
    CalendarUnavailable {
        calendar: String,
        year: i32,
        reason: String,
    },

    #[error("malformed date '{input}': expected YYYY-MM-DD")]
    MalformedDate { input: String },

    #[error("malformed task on line {line}: {reason}")]
    MalformedTaskLine { line: usize, reason: String },

    #[error("invalid calendar configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

impl ScheduleError {
    pub(crate) fn unavailable(calendar: &str, year: i32, reason: impl Into<String>) -> Self {
        ScheduleError::CalendarUnavailable {
            calendar: calendar.to_string(),
            year,
            reason: reason.into(),
        }
    }

    pub(crate) fn scan_exhausted(calendar: &str, from: NaiveDate, limit: u32) -> Self {
        use chrono::Datelike;
        Self::unavailable(
            calendar,
            from.year(),
            format!("no workday found within {limit} days of {from}"),
        )
    }

    /// Short machine-readable tag, used by the HTTP layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InvalidDuration { .. } => "invalid_duration",
            ScheduleError::EmptyTaskList => "empty_task_list",
            ScheduleError::InvalidTaskName => "invalid_task_name",
            ScheduleError::CalendarUnavailable { .. } => "calendar_unavailable",
            ScheduleError::MalformedDate { .. } => "malformed_date",
            ScheduleError::MalformedTaskLine { .. } => "malformed_task_line",
            ScheduleError::InvalidConfig(_) => "invalid_config",
            ScheduleError::Io(_) => "io_error",
            ScheduleError::Csv(_) => "csv_error",
            ScheduleError::Json(_) => "serialization_error",
            ScheduleError::DataFrame(_) => "dataframe_error",
        }
    }
}
