//! Day and range expressions.
//!
//! A compact grammar for picking the day (or days) a command works on:
//!
//! - weekday codes `s m t w th f sa`, or the digits `1`..`7` with Sunday = 1,
//!   resolving to the next occurrence within the coming week (today included)
//! - signed day offsets `+N` / `-N` relative to today
//! - a range `a-b` of two such tokens, each resolved against today
//!
//! The resulting window always spans working hours: it opens at 08:00 on the
//! first day and closes at 20:00 on the last.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc, Weekday};
use serde::Serialize;

use super::day::{local_at, BUSINESS_DAY_END_HOUR, BUSINESS_DAY_START_HOUR};
use crate::error::{CoreError, Result};

/// Window selected by a date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub min: DateTime<Local>,
    pub max: DateTime<Local>,
}

impl DateRange {
    fn between(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            min: local_at(first, BUSINESS_DAY_START_HOUR),
            max: local_at(last, BUSINESS_DAY_END_HOUR),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.min.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.max.date_naive()
    }

    /// Whether the window covers exactly one date.
    pub fn is_single_day(&self) -> bool {
        self.first_day() == self.last_day()
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.min.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.max.with_timezone(&Utc)
    }
}

/// Parse `expression` relative to `reference`.
///
/// An empty expression selects the reference day.
///
/// # Errors
/// `CoreError::InvalidExpression` for unknown tokens, malformed offsets,
/// empty range ends, and offsets outside the supported calendar.
pub fn parse_date_expression(reference: DateTime<Local>, expression: &str) -> Result<DateRange> {
    let expression = expression.trim();
    let today = reference.date_naive();

    if expression.is_empty() {
        return Ok(DateRange::between(today, today));
    }

    let (first, last) = split_range(expression);
    let min = resolve_token(today, first, expression)?;
    let max = match last {
        Some(token) => resolve_token(today, token, expression)?,
        None => min,
    };

    Ok(DateRange::between(min, max))
}

/// Split `a-b` into its two tokens. A leading sign belongs to the first token,
/// so `-1` is a single offset and `-3--1` is a range of two offsets.
fn split_range(expression: &str) -> (&str, Option<&str>) {
    let sign_len = usize::from(expression.starts_with(['+', '-']));
    match expression[sign_len..].find('-') {
        Some(index) => {
            let split = sign_len + index;
            (&expression[..split], Some(&expression[split + 1..]))
        }
        None => (expression, None),
    }
}

fn resolve_token(today: NaiveDate, token: &str, expression: &str) -> Result<NaiveDate> {
    if token.is_empty() {
        return Err(CoreError::invalid_expression(expression, "empty range bound"));
    }

    if token.starts_with(['+', '-']) {
        let offset: i64 = token.parse().map_err(|_| {
            CoreError::invalid_expression(expression, format!("malformed day offset '{token}'"))
        })?;
        return shift_days(today, offset).ok_or_else(|| {
            CoreError::invalid_expression(expression, format!("day offset '{token}' out of range"))
        });
    }

    let target = weekday_code(token).ok_or_else(|| {
        CoreError::invalid_expression(expression, format!("unsupported token '{token}'"))
    })?;

    today
        .checked_add_days(Days::new(days_until(today.weekday(), target)))
        .ok_or_else(|| CoreError::invalid_expression(expression, "date out of range"))
}

fn weekday_code(token: &str) -> Option<Weekday> {
    let weekday = match token {
        "1" | "s" => Weekday::Sun,
        "2" | "m" => Weekday::Mon,
        "3" | "t" => Weekday::Tue,
        "4" | "w" => Weekday::Wed,
        "5" | "th" => Weekday::Thu,
        "6" | "f" => Weekday::Fri,
        "7" | "sa" => Weekday::Sat,
        _ => return None,
    };
    Some(weekday)
}

/// Days from `current` to the next `target`, zero when they match.
fn days_until(current: Weekday, target: Weekday) -> u64 {
    let current = current.number_from_sunday();
    let target = target.number_from_sunday();
    let delta = if target >= current {
        target - current
    } else {
        7 - (current - target)
    };
    u64::from(delta)
}

fn shift_days(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    /// Tuesday, 2022-08-30 15:04:05 local time.
    fn tuesday() -> DateTime<Local> {
        Local.with_ymd_and_hms(2022, 8, 30, 15, 4, 5).unwrap()
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, month, day).unwrap()
    }

    #[test]
    fn expression_table() {
        let cases = [
            ("1", (Weekday::Sun, date(9, 4)), (Weekday::Sun, date(9, 4))),
            ("s", (Weekday::Sun, date(9, 4)), (Weekday::Sun, date(9, 4))),
            ("5", (Weekday::Thu, date(9, 1)), (Weekday::Thu, date(9, 1))),
            ("th", (Weekday::Thu, date(9, 1)), (Weekday::Thu, date(9, 1))),
            ("-1", (Weekday::Mon, date(8, 29)), (Weekday::Mon, date(8, 29))),
            ("1-2", (Weekday::Sun, date(9, 4)), (Weekday::Mon, date(9, 5))),
            ("s-m", (Weekday::Sun, date(9, 4)), (Weekday::Mon, date(9, 5))),
            ("t-sa", (Weekday::Tue, date(8, 30)), (Weekday::Sat, date(9, 3))),
        ];

        for (input, (min_weekday, min_date), (max_weekday, max_date)) in cases {
            let range = parse_date_expression(tuesday(), input)
                .unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"));
            assert_eq!(range.min.weekday(), min_weekday, "min weekday of {input:?}");
            assert_eq!(range.first_day(), min_date, "min date of {input:?}");
            assert_eq!(range.max.weekday(), max_weekday, "max weekday of {input:?}");
            assert_eq!(range.last_day(), max_date, "max date of {input:?}");
        }
    }

    #[test]
    fn window_spans_working_hours() {
        let range = parse_date_expression(tuesday(), "th").unwrap();
        assert_eq!(range.min.hour(), 8);
        assert_eq!(range.min.minute(), 0);
        assert_eq!(range.max.hour(), 20);
        assert!(range.is_single_day());
    }

    #[test]
    fn empty_expression_is_today() {
        for input in ["", "  "] {
            let range = parse_date_expression(tuesday(), input).unwrap();
            assert_eq!(range.first_day(), date(8, 30));
            assert_eq!(range.last_day(), date(8, 30));
            assert_eq!(range.min.hour(), 8);
            assert_eq!(range.max.hour(), 20);
        }
    }

    #[test]
    fn same_weekday_resolves_to_today() {
        let range = parse_date_expression(tuesday(), "3").unwrap();
        assert_eq!(range.first_day(), date(8, 30));
    }

    #[test]
    fn signed_offsets() {
        assert_eq!(
            parse_date_expression(tuesday(), "+7").unwrap().first_day(),
            date(9, 6)
        );
        assert_eq!(
            parse_date_expression(tuesday(), "+0").unwrap().first_day(),
            date(8, 30)
        );

        let range = parse_date_expression(tuesday(), "-3--1").unwrap();
        assert_eq!(range.first_day(), date(8, 27));
        assert_eq!(range.last_day(), date(8, 29));

        let range = parse_date_expression(tuesday(), "+1-+3").unwrap();
        assert_eq!(range.first_day(), date(8, 31));
        assert_eq!(range.last_day(), date(9, 2));
    }

    #[test]
    fn range_bounds_resolve_independently() {
        // "sa" comes before "s" here: each end is resolved against today
        let range = parse_date_expression(tuesday(), "sa-s").unwrap();
        assert_eq!(range.first_day(), date(9, 3));
        assert_eq!(range.last_day(), date(9, 4));

        let range = parse_date_expression(tuesday(), "m-s").unwrap();
        assert_eq!(range.first_day(), date(9, 5));
        assert_eq!(range.last_day(), date(9, 4));
    }

    #[test]
    fn invalid_expressions() {
        let invalid = [
            "x", "8", "0", "mon", "+", "+a", "-1x", "1-", "th-zz", "1-2-3", "+99999999999",
        ];
        for input in invalid {
            let err = parse_date_expression(tuesday(), input).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidExpression { .. }),
                "{input:?} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn weekday_delta_wraps_around() {
        assert_eq!(days_until(Weekday::Tue, Weekday::Sun), 5);
        assert_eq!(days_until(Weekday::Tue, Weekday::Thu), 2);
        assert_eq!(days_until(Weekday::Sat, Weekday::Sun), 1);
        assert_eq!(days_until(Weekday::Sun, Weekday::Sat), 6);
        assert_eq!(days_until(Weekday::Wed, Weekday::Wed), 0);
    }
}
