pub mod calendars;
pub mod config;
pub mod list;
pub mod plan;

use std::io::{self, BufRead, Write};

use calgo_core::{Config, ConfirmPrompt, GoogleCalendar};

/// Connect to Google Calendar using the `[google]` config section.
fn connect(config: &Config) -> calgo_core::Result<GoogleCalendar> {
    GoogleCalendar::from_config(&config.google)
}

/// Asks on stdout and reads the answer from stdin.
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn ask(&mut self, question: &str, default: bool) -> calgo_core::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        print!("{question} {hint} ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(parse_answer(&answer, default))
    }
}

fn parse_answer(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_answer;

    #[test]
    fn empty_answer_takes_default() {
        assert!(parse_answer("\n", true));
        assert!(!parse_answer("", false));
    }

    #[test]
    fn only_yes_confirms() {
        assert!(parse_answer("Y\n", false));
        assert!(parse_answer(" yes ", false));
        assert!(!parse_answer("n", true));
        assert!(!parse_answer("sure", true));
    }
}
