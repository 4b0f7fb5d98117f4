use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use std::fmt;
use std::str::FromStr;

/// View scale determining bucket count and padded range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Number of day buckets backing a view at this scale
    pub fn bucket_count(self) -> usize {
        match self {
            Granularity::Day => 1,
            Granularity::Week => 7,
            Granularity::Month => 35,
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// A contiguous run of calendar days plus its millisecond bounds,
/// covering everything a view at the given granularity can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedRange {
    pub first_day: NaiveDate,
    pub count: usize,
    /// Start of the first day, ms since epoch (local time)
    pub start_ms: i64,
    /// Last millisecond of the final day
    pub end_ms: i64,
}

impl PaddedRange {
    /// Compute the padded range for a view anchored at `date`.
    ///
    /// - Day: the single calendar day.
    /// - Week: the Sunday-to-Saturday week containing `date`.
    /// - Month: 5 calendar weeks from the Sunday on/before the 1st of the
    ///   month. Always 35 days; trailing/leading days from adjacent months
    ///   are included and flagged by the presentation layer.
    pub fn for_view(date: NaiveDate, granularity: Granularity) -> Self {
        let first_day = match granularity {
            Granularity::Day => date,
            Granularity::Week => sunday_on_or_before(date),
            Granularity::Month => {
                let first_of_month = date.with_day(1).unwrap_or(date);
                sunday_on_or_before(first_of_month)
            }
        };
        Self::from_start(first_day, granularity.bucket_count())
    }

    /// Range spanning `count` consecutive days from `first_day`
    pub fn from_start(first_day: NaiveDate, count: usize) -> Self {
        let start_ms = day_start_ms(first_day);
        let end_ms = day_start_ms(first_day + Duration::days(count as i64)) - 1;
        Self {
            first_day,
            count,
            start_ms,
            end_ms,
        }
    }

    /// Whether a millisecond timestamp falls inside the range
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

/// The Sunday on or before the given date
pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Millisecond timestamp of local midnight on the given day
pub fn day_start_ms(day: NaiveDate) -> i64 {
    local_day_start(day).timestamp_millis()
}

/// Calendar day (local time) a millisecond timestamp falls on.
/// `None` only for timestamps outside chrono's representable range.
pub fn day_of_timestamp(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(&Local).date_naive())
}

/// Sunday-based week number where week 1 is the week containing January 1
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    let week_origin = sunday_on_or_before(jan1);
    ((date - week_origin).num_days() / 7 + 1) as u32
}

fn local_day_start(day: NaiveDate) -> DateTime<Local> {
    let mut naive = day.and_time(NaiveTime::MIN);
    // Midnight may not exist or may repeat on DST transition days; the day
    // then starts at the first valid instant.
    for _ in 0..4 {
        match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => naive += Duration::hours(1),
        }
    }
    Local.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}
