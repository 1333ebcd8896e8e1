use std::error::Error;

use calgo_core::{parse_date_expression, Config};
use chrono::Local;
use clap::Args;

use super::connect;

#[derive(Args)]
pub struct ListArgs {
    /// Day or range, e.g. "m", "+1", "m-f" (default: today)
    expression: Option<String>,
    /// Calendar to read (default from config)
    #[arg(long)]
    calendar_id: Option<String>,
    /// Stop after this many events
    #[arg(long)]
    max_results: Option<usize>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ListArgs) -> Result<(), Box<dyn Error>> {
    let range = parse_date_expression(Local::now(), args.expression.as_deref().unwrap_or(""))?;
    let config = Config::load()?;
    let calendar_id = args
        .calendar_id
        .unwrap_or_else(|| config.planner.calendar_id.clone());

    let google = connect(&config)?;
    let events = google.fetch_events(
        &calendar_id,
        range.start_utc(),
        range.end_utc(),
        args.max_results,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events between {} and {}", range.first_day(), range.last_day());
        return Ok(());
    }
    for event in &events {
        let start = event.start_time.with_timezone(&Local);
        let end = event.end_time.with_timezone(&Local);
        println!(
            "{} {}-{}: {}",
            start.format("%a %Y-%m-%d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            event.summary
        );
    }
    Ok(())
}
