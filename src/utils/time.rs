use chrono::{DateTime, TimeZone};

/// Elapsed seconds with millisecond precision. Negative when `ended_at` precedes `started_at`.
pub fn duration_seconds<Tz: TimeZone>(started_at: DateTime<Tz>, ended_at: DateTime<Tz>) -> f64 {
    (ended_at - started_at).num_milliseconds() as f64 / 1000.0
}
