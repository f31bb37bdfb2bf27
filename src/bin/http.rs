#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use tracing_subscriber::EnvFilter;
    use workday_planner::{CalendarConfig, ScheduleBuilder, WorkdayCalculator, http_api};

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("WORKDAY_PLANNER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("WORKDAY_PLANNER_CALENDAR") {
        Ok(path) => CalendarConfig::load_json(path)?,
        Err(_) => CalendarConfig::default(),
    };
    let calculator = WorkdayCalculator::from_config(&config)?;

    println!("workday-planner HTTP API listening on http://{addr}");
    http_api::serve(addr, ScheduleBuilder::new(calculator)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
