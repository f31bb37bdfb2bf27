use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{Schedule, ScheduleBuilder, ScheduleError, Task, input};

#[derive(Clone)]
pub struct AppState {
    builder: Arc<ScheduleBuilder>,
}

impl AppState {
    pub fn new(builder: ScheduleBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }

    fn builder(&self) -> Arc<ScheduleBuilder> {
        self.builder.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Schedule(ScheduleError),
    /// The request itself could not be read (bad JSON, wrong shape).
    Invalid(String),
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Schedule(err) => err,
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        };
        let status = match &err {
            ScheduleError::CalendarUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Io(_)
            | ScheduleError::Csv(_)
            | ScheduleError::Json(_)
            | ScheduleError::DataFrame(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            warn!(error = %err, "request failed");
        }
        let body = Json(ErrorBody {
            error: err.kind(),
            message: err.to_string(),
        });
        (status, body).into_response()
    }
}

/// `duration` stays a raw JSON value so that `3.5` or `"3"` is reported
/// as an invalid duration rather than a body that failed to parse.
#[derive(Debug, Deserialize)]
struct TaskPayload {
    name: String,
    duration: Value,
}

impl TaskPayload {
    fn into_task(self) -> crate::Result<Task> {
        match self.duration.as_i64() {
            Some(days) => Task::new(self.name, days),
            None => Err(ScheduleError::InvalidDuration {
                value: match self.duration {
                    Value::String(raw) => raw,
                    other => other.to_string(),
                },
                task: Some(self.name.trim().to_string()),
            }),
        }
    }
}

/// Either structured `tasks` or free `text` in the `name, duration` line
/// format; `text` wins when both are present.
#[derive(Debug, Deserialize)]
struct SchedulePayload {
    #[serde(default)]
    start: String,
    #[serde(default)]
    tasks: Vec<TaskPayload>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScheduleResponse {
    schedule: Schedule,
    report: String,
}

#[derive(Debug, Serialize)]
struct HolidaysResponse {
    calendar: String,
    year: i32,
    holidays: Vec<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct WorkdayResponse {
    date: NaiveDate,
    is_workday: bool,
    next_workday: NaiveDate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", post(create_schedule))
        .route("/holidays/:year", get(list_holidays))
        .route("/workdays/:date", get(check_workday))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, builder: ScheduleBuilder) -> std::io::Result<()> {
    let state = AppState::new(builder);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn create_schedule(
    State(state): State<AppState>,
    payload: Result<Json<SchedulePayload>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let Json(payload) = payload?;
    let builder = state.builder();
    let start = input::parse_start_date(&payload.start)?;
    let tasks = match payload.text {
        Some(text) => input::parse_task_list(&text)?,
        None => payload
            .tasks
            .into_iter()
            .map(TaskPayload::into_task)
            .collect::<Result<Vec<_>, _>>()?,
    };
    let schedule = builder.build(&tasks, start)?;
    let report = schedule.to_report();
    Ok(Json(ScheduleResponse { schedule, report }))
}

async fn list_holidays(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<HolidaysResponse>, ApiError> {
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| ApiError::Invalid(format!("invalid year '{year}'")))?;
    let builder = state.builder();
    let calendar = builder.calculator().holidays();
    let holidays = calendar.holidays_in_year(year)?;
    Ok(Json(HolidaysResponse {
        calendar: calendar.name().to_string(),
        year,
        holidays: holidays.iter().copied().collect(),
    }))
}

async fn check_workday(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<WorkdayResponse>, ApiError> {
    let builder = state.builder();
    let calculator = builder.calculator();
    let date = input::parse_start_date(&date)?;
    Ok(Json(WorkdayResponse {
        date,
        is_workday: calculator.is_workday(date)?,
        next_workday: calculator.next_workday(date)?,
    }))
}
