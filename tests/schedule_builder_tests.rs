use chrono::NaiveDate;
use std::sync::Arc;
use workday_planner::{
    FixedHolidays, HolidayCalendar, ScheduleBuilder, ScheduleError, ScheduleRequest, Task,
    WorkdayCalculator, tasks_from_pairs,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekends_only() -> ScheduleBuilder {
    let holidays = HolidayCalendar::new(FixedHolidays::none(2020..=2030));
    ScheduleBuilder::new(WorkdayCalculator::new(Arc::new(holidays)))
}

fn analysis_and_design() -> Vec<Task> {
    tasks_from_pairs([("Analysis", 3), ("Design", 4)]).unwrap()
}

#[test]
fn chains_tasks_without_holidays() {
    let schedule = weekends_only()
        .build(&analysis_and_design(), d(2025, 5, 27))
        .unwrap();

    let analysis = schedule.entry("Analysis").unwrap();
    assert_eq!(analysis.start, d(2025, 5, 27));
    assert_eq!(analysis.end, d(2025, 5, 29));

    let design = schedule.entry("Design").unwrap();
    assert_eq!(design.start, d(2025, 5, 30));
    assert_eq!(design.end, d(2025, 6, 4));

    assert_eq!(schedule.total_working_days(), 7);
    assert_eq!(schedule.final_end(), d(2025, 6, 4));
    assert_eq!(schedule.next_available(), d(2025, 6, 5));
}

#[test]
fn korean_calendar_skips_election_day_and_memorial_day() {
    let schedule = ScheduleBuilder::default()
        .build(&analysis_and_design(), d(2025, 5, 27))
        .unwrap();

    let design = schedule.entry("Design").unwrap();
    assert_eq!(design.start, d(2025, 5, 30));
    // Jun 3 (presidential election) is skipped.
    assert_eq!(design.end, d(2025, 6, 5));
    // Jun 6 (Memorial Day) and the weekend push the next slot to Monday.
    assert_eq!(schedule.next_available(), d(2025, 6, 9));
}

#[test]
fn korean_default_task_list() {
    let tasks =
        tasks_from_pairs([("요구사항 분석", 3), ("설계", 4), ("구현", 10), ("테스트", 5)])
            .unwrap();
    let schedule = ScheduleBuilder::default()
        .build(&tasks, d(2025, 5, 27))
        .unwrap();

    let spans: Vec<(NaiveDate, NaiveDate)> = schedule
        .entries()
        .iter()
        .map(|entry| (entry.start, entry.end))
        .collect();
    assert_eq!(
        spans,
        vec![
            (d(2025, 5, 27), d(2025, 5, 29)),
            (d(2025, 5, 30), d(2025, 6, 5)),
            (d(2025, 6, 9), d(2025, 6, 20)),
            (d(2025, 6, 23), d(2025, 6, 27)),
        ]
    );
    assert_eq!(schedule.total_working_days(), 22);
    assert_eq!(schedule.final_end(), d(2025, 6, 27));
    assert_eq!(schedule.next_available(), d(2025, 6, 30));
}

#[test]
fn back_to_back_tasks_never_share_a_day() {
    let tasks = tasks_from_pairs([("A", 1), ("B", 1), ("C", 1)]).unwrap();
    let schedule = weekends_only().build(&tasks, d(2025, 1, 2)).unwrap();
    let entries = schedule.entries();
    for pair in entries.windows(2) {
        assert!(pair[1].start > pair[0].end);
    }
    // Thu, Fri, then Monday.
    assert_eq!(entries[2].start, d(2025, 1, 6));
}

#[test]
fn weekend_start_is_kept_as_first_entry_start() {
    let tasks = tasks_from_pairs([("A", 2)]).unwrap();
    let schedule = weekends_only().build(&tasks, d(2025, 5, 31)).unwrap();
    let entry = &schedule.entries()[0];
    assert_eq!(entry.start, d(2025, 5, 31));
    assert_eq!(entry.end, d(2025, 6, 3));
    assert_eq!(schedule.start(), d(2025, 5, 31));
}

#[test]
fn empty_task_list_is_rejected() {
    let err = weekends_only().build(&[], d(2025, 5, 27)).unwrap_err();
    assert!(matches!(err, ScheduleError::EmptyTaskList));
}

#[test]
fn zero_duration_is_rejected() {
    let err = Task::new("Analysis", 0).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidDuration { .. }));
    let err = tasks_from_pairs([("Analysis", 3), ("Design", -1)]).unwrap_err();
    assert!(err.to_string().contains("Design"), "{err}");
}

#[test]
fn blank_task_name_is_rejected() {
    let err = Task::new("   ", 3).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTaskName));
}

#[test]
fn task_deserialization_validates() {
    let ok: Task = serde_json::from_str(r#"{"name":"Build","duration":2}"#).unwrap();
    assert_eq!(ok.duration(), 2);
    assert!(serde_json::from_str::<Task>(r#"{"name":"Build","duration":0}"#).is_err());
    assert!(serde_json::from_str::<Task>(r#"{"name":"","duration":2}"#).is_err());
}

#[test]
fn no_partial_schedule_when_calendar_runs_out() {
    let tasks = tasks_from_pairs([("A", 1), ("B", 400)]).unwrap();
    let err = ScheduleBuilder::default()
        .build(&tasks, d(2030, 1, 2))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::CalendarUnavailable { .. }));
}

#[test]
fn start_year_outside_coverage_fails_before_scheduling() {
    let tasks = tasks_from_pairs([("A", 1)]).unwrap();
    // A Saturday start would not need holiday data for the start itself.
    let err = ScheduleBuilder::default()
        .build(&tasks, d(2019, 6, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::CalendarUnavailable { year: 2019, .. }));
}

#[test]
fn build_is_idempotent() {
    let builder = ScheduleBuilder::default();
    let tasks = analysis_and_design();
    let first = builder.build(&tasks, d(2025, 9, 29)).unwrap();
    let second = builder.build(&tasks, d(2025, 9, 29)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn build_from_str_parses_inputs() {
    let schedule = weekends_only()
        .build_from_str("2025-05-27", "Analysis, 3\nDesign, 4\n")
        .unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule.final_end(), d(2025, 6, 4));

    let err = weekends_only()
        .build_from_str("27/05/2025", "Analysis, 3")
        .unwrap_err();
    assert!(matches!(err, ScheduleError::MalformedDate { .. }));
}

#[test]
fn batch_results_keep_request_order() {
    let builder = ScheduleBuilder::default();
    let requests: Vec<ScheduleRequest> = (1..=12)
        .map(|month| ScheduleRequest::new(d(2025, month, 10), analysis_and_design()))
        .chain([ScheduleRequest::new(d(2025, 1, 10), Vec::new())])
        .collect();

    let results = builder.build_batch(&requests);
    assert_eq!(results.len(), 13);
    for (request, result) in requests.iter().zip(&results).take(12) {
        let schedule = result.as_ref().unwrap();
        assert_eq!(schedule.start(), request.start);
        assert_eq!(schedule, &builder.build(&request.tasks, request.start).unwrap());
    }
    assert!(matches!(
        results.last(),
        Some(Err(ScheduleError::EmptyTaskList))
    ));
}
