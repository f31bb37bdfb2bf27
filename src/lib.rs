pub mod calendar;
pub mod config;
pub mod error;
pub mod holiday;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod input;
pub mod report;
pub mod schedule;
pub mod task;

pub use calendar::WorkdayCalculator;
pub use config::CalendarConfig;
pub use error::{Result, ScheduleError};
pub use holiday::{
    FixedHolidays, HolidayCalendar, HolidaySource, Region, SouthKorea, UnitedStates,
};
pub use input::{load_task_file, parse_start_date, parse_task_line, parse_task_list};
pub use report::render_dataframe;
pub use schedule::{Schedule, ScheduleBuilder, ScheduleEntry, ScheduleRequest};
pub use task::{Task, tasks_from_pairs};
