//! Focus planning command for CLI.

use std::error::Error;

use calgo_core::{
    commit, parse_date_expression, parse_duration, CommitOutcome, Config, Planner, PlannerConfig,
};
use chrono::{Duration, Local};
use clap::Args;
use tracing::debug;

use super::{connect, StdinPrompt};

#[derive(Args)]
pub struct PlanArgs {
    /// Day to plan, e.g. "t", "+1", "3" (default: today)
    day: Option<String>,
    /// Overall focus time to plan, e.g. "2h" (default from config)
    #[arg(long)]
    focus_time: Option<String>,
    /// Length of each focus block, e.g. "45m" (default from config)
    #[arg(long)]
    focus_event_duration: Option<String>,
    /// Calendar to plan into (default from config)
    #[arg(long)]
    calendar_id: Option<String>,
    /// Commit without asking for confirmation
    #[arg(short, long)]
    yes: bool,
    /// Show the plan without committing it
    #[arg(long)]
    dry_run: bool,
}

fn duration_arg(flag: &str, value: &str) -> Result<Duration, Box<dyn Error>> {
    parse_duration(value).map_err(|e| format!("invalid {flag} '{value}': {e}").into())
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn Error>> {
    // Command line input is checked before the config file is touched.
    let expression = args.day.unwrap_or_default();
    let range = parse_date_expression(Local::now(), &expression)?;
    if !range.is_single_day() {
        return Err(format!(
            "plan works on a single day, '{expression}' spans {} to {}",
            range.first_day(),
            range.last_day()
        )
        .into());
    }
    let focus_time = args
        .focus_time
        .as_deref()
        .map(|value| duration_arg("--focus-time", value))
        .transpose()?;
    let focus_event_duration = args
        .focus_event_duration
        .as_deref()
        .map(|value| duration_arg("--focus-event-duration", value))
        .transpose()?;

    let config = Config::load()?;
    let settings = &config.planner;

    let overall = match focus_time {
        Some(duration) => duration,
        None => settings.focus_time()?,
    };
    let per_event = match focus_event_duration {
        Some(duration) => duration,
        None => settings.focus_event_duration()?,
    };
    let planner_config =
        PlannerConfig::new(overall, per_event)?.with_focus_title(settings.focus_title.clone());

    let calendar_id = args
        .calendar_id
        .unwrap_or_else(|| settings.calendar_id.clone());
    debug!(%calendar_id, day = %range.first_day(), "planning");

    let google = connect(&config)?;
    let mut planner =
        Planner::new(calendar_id, range.first_day(), planner_config, &google, &google)?;
    planner.plan();
    print!("{planner}");

    if planner.added_events().is_empty() {
        println!("No focus time could be planned");
        return Ok(());
    }
    if args.dry_run {
        return Ok(());
    }

    let interactive = settings.interactive && !args.yes;
    match commit(&mut planner, interactive, &mut StdinPrompt)? {
        CommitOutcome::Declined => println!("Nothing committed"),
        CommitOutcome::Committed(count) => println!("{count} events committed"),
    }
    Ok(())
}
