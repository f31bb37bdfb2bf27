use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};

/// A named unit of work measured in working days.
///
/// Fields are private so a `Task` can only exist with a non-empty name
/// and a positive duration; deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    name: String,
    duration: u32,
}

#[derive(Deserialize)]
struct TaskRecord {
    name: String,
    duration: i64,
}

impl Task {
    pub fn new(name: impl Into<String>, duration: i64) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ScheduleError::InvalidTaskName);
        }
        let duration = u32::try_from(duration)
            .ok()
            .filter(|days| *days > 0)
            .ok_or_else(|| ScheduleError::InvalidDuration {
                value: duration.to_string(),
                task: Some(name.clone()),
            })?;
        Ok(Self { name, duration })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ScheduleError;

    fn try_from(record: TaskRecord) -> Result<Self> {
        Task::new(record.name, record.duration)
    }
}

/// Convert `(name, duration)` pairs into tasks, stopping at the first
/// invalid one.
pub fn tasks_from_pairs<I, S>(pairs: I) -> Result<Vec<Task>>
where
    I: IntoIterator<Item = (S, i64)>,
    S: Into<String>,
{
    pairs
        .into_iter()
        .map(|(name, duration)| Task::new(name, duration))
        .collect()
}
