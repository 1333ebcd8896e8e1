//! Business-day boundaries.
//!
//! Both the event window queries and the slot search use the same working
//! day: 08:00 to 20:00 in the local time zone.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Local hour at which the working day opens.
pub const BUSINESS_DAY_START_HOUR: u32 = 8;
/// Local hour at which the working day closes.
pub const BUSINESS_DAY_END_HOUR: u32 = 20;

/// `date` at `hour`:00 local time.
///
/// Inside a DST gap the wall-clock time does not exist; the first hour after
/// the gap is used instead. Only if that fails too is the naive value read
/// as UTC.
pub fn local_at(date: NaiveDate, hour: u32) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Opening of the working day on `date`.
pub fn business_day_start(date: NaiveDate) -> DateTime<Utc> {
    local_at(date, BUSINESS_DAY_START_HOUR).with_timezone(&Utc)
}

/// Close of the working day on `date`.
pub fn business_day_end(date: NaiveDate) -> DateTime<Utc> {
    local_at(date, BUSINESS_DAY_END_HOUR).with_timezone(&Utc)
}

/// Local calendar date of an instant.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}
