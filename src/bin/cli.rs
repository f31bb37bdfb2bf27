use chrono::NaiveDate;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use workday_planner::{
    CalendarConfig, Region, ScheduleBuilder, Task, WorkdayCalculator, load_task_file,
    parse_start_date, parse_task_line, render_dataframe,
};

#[derive(Debug, Parser)]
#[command(name = "cli", about = "Holiday-aware working-day schedule calculator")]
struct Args {
    /// Start date of the first task (YYYY-MM-DD); defaults to today
    #[arg(long)]
    start: Option<String>,

    /// File with one `name, duration` task per line
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Holiday region (kr or us)
    #[arg(long, conflicts_with = "calendar")]
    region: Option<String>,

    /// Calendar configuration JSON file
    #[arg(long)]
    calendar: Option<PathBuf>,

    /// Print the schedule report and exit instead of starting the shell
    #[arg(long)]
    compute: bool,
}

struct Session {
    builder: ScheduleBuilder,
    start: NaiveDate,
    tasks: Vec<Task>,
}

impl Session {
    fn compute(&self) -> workday_planner::Result<workday_planner::Schedule> {
        self.builder.build(&self.tasks, self.start)
    }

    fn set_config(&mut self, config: &CalendarConfig) -> workday_planner::Result<()> {
        self.builder = ScheduleBuilder::new(WorkdayCalculator::from_config(config)?);
        Ok(())
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                         Show this help\n  start <YYYY-MM-DD>           Set the start date\n  add <name>, <days>           Append a task\n  clear                        Remove all tasks\n  tasks                        List tasks\n  load <path>                  Replace tasks from a `name, duration` file\n  compute                      Calculate and print the schedule\n  table                        Calculate and print the schedule as a table\n  csv <path>                   Write the schedule as CSV\n  json <path>                  Write the schedule as JSON\n  holidays <year>              List holidays of a year\n  next <YYYY-MM-DD>            Show the next working day after a date\n  isworkday <YYYY-MM-DD>       Check whether a date is a working day\n  calendar show                Show the calendar configuration\n  calendar load <json_path>    Load a calendar configuration\n  calendar save <json_path>    Save the calendar configuration\n  quit|exit                    Exit"
    );
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for (idx, task) in tasks.iter().enumerate() {
        println!("{:>3}. {} ({} days)", idx + 1, task.name(), task.duration());
    }
}

fn print_calendar(builder: &ScheduleBuilder) {
    let calculator = builder.calculator();
    let holidays = calculator.holidays();
    let working_days = calculator
        .working_days()
        .iter()
        .map(|wd| wd.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let extra = holidays
        .extra_holidays()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let years = holidays.covered_years();
    println!("Holiday calendar   : {}", holidays.name());
    println!("Covered years      : {}-{}", years.start(), years.end());
    println!("Working days       : {}", working_days);
    println!("Extra holidays     : {}", extra);
}

fn run_command(session: &mut Session, input: &str) -> workday_planner::Result<()> {
    let (cmd, rest) = input
        .split_once(char::is_whitespace)
        .map(|(cmd, rest)| (cmd, rest.trim()))
        .unwrap_or((input, ""));

    match cmd {
        "help" => print_help(),
        "start" => {
            session.start = parse_start_date(rest)?;
            println!("Start date set to {}.", session.start);
        }
        "add" => {
            let task = parse_task_line(rest)?;
            println!("Added task '{}' ({} days).", task.name(), task.duration());
            session.tasks.push(task);
        }
        "clear" => {
            session.tasks.clear();
            println!("Cleared task list.");
        }
        "tasks" => print_tasks(&session.tasks),
        "load" => {
            let tasks = load_task_file(rest)?;
            println!("Loaded {} task(s) from {}.", tasks.len(), rest);
            session.tasks = tasks;
        }
        "compute" => {
            let schedule = session.compute()?;
            println!("{}", schedule.to_report());
        }
        "table" => {
            let schedule = session.compute()?;
            print!("{}", render_dataframe(&schedule.to_dataframe()?));
        }
        "csv" => {
            let schedule = session.compute()?;
            schedule.write_csv(File::create(rest)?)?;
            println!("Schedule written to {}.", rest);
        }
        "json" => {
            let schedule = session.compute()?;
            serde_json::to_writer_pretty(File::create(rest)?, &schedule)?;
            println!("Schedule written to {}.", rest);
        }
        "holidays" => {
            let Ok(year) = rest.parse::<i32>() else {
                println!("Invalid year '{}'. Usage: holidays <year>", rest);
                return Ok(());
            };
            let holidays = session.builder.calculator().holidays().holidays_in_year(year)?;
            println!("{} holiday(s) in {}:", holidays.len(), year);
            for date in holidays.iter() {
                println!("  {} ({})", date, date.format("%a"));
            }
        }
        "next" => {
            let date = parse_start_date(rest)?;
            let next = session.builder.calculator().next_workday(date)?;
            println!("Next working day after {}: {}", date, next);
        }
        "isworkday" => {
            let date = parse_start_date(rest)?;
            if session.builder.calculator().is_workday(date)? {
                println!("{} is a working day.", date);
            } else {
                println!("{} is not a working day.", date);
            }
        }
        "calendar" => {
            let (sub, path) = rest
                .split_once(char::is_whitespace)
                .map(|(sub, path)| (sub, path.trim()))
                .unwrap_or((rest, ""));
            match (sub, path) {
                ("show", _) => print_calendar(&session.builder),
                ("load", path) if !path.is_empty() => {
                    let config = CalendarConfig::load_json(path)?;
                    session.set_config(&config)?;
                    println!("Calendar loaded from {}.", path);
                }
                ("save", path) if !path.is_empty() => {
                    session.builder.calculator().to_config()?.save_json(path)?;
                    println!("Calendar saved to {}.", path);
                }
                _ => println!(
                    "Usage: calendar show | calendar load <json_path> | calendar save <json_path>"
                ),
            }
        }
        _ => println!("Unknown command '{}'. Type 'help' for commands.", cmd),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn setup(args: &Args) -> workday_planner::Result<Session> {
    let config = match (&args.calendar, &args.region) {
        (Some(path), _) => CalendarConfig::load_json(path)?,
        (None, Some(region)) => CalendarConfig::for_region(region.parse::<Region>()?),
        (None, None) => CalendarConfig::default(),
    };
    let builder = ScheduleBuilder::new(WorkdayCalculator::from_config(&config)?);
    let start = match &args.start {
        Some(raw) => parse_start_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let tasks = match &args.tasks {
        Some(path) => load_task_file(path)?,
        None => Vec::new(),
    };
    Ok(Session {
        builder,
        start,
        tasks,
    })
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut session = match setup(&args) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.compute {
        return match session.compute() {
            Ok(schedule) => {
                println!("{}", schedule.to_report());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("Workday Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }
        if let Err(e) = run_command(&mut session, input) {
            println!("Error: {}", e);
        }
    }
    ExitCode::SUCCESS
}
