use std::error::Error;

use calgo_core::{CalendarDirectory, Config};
use clap::Args;

use super::connect;

#[derive(Args)]
pub struct CalendarsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CalendarsArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let calendars = connect(&config)?.list_calendars()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calendars)?);
        return Ok(());
    }

    for calendar in &calendars {
        let marker = if calendar.primary { "*" } else { " " };
        println!("{marker} {}  {}", calendar.id, calendar.summary);
    }
    Ok(())
}
