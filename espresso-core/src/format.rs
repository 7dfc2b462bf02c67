use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Shown when a note's timestamp is missing or unreadable
pub const INVALID_DATE: &str = "Invalid date";

/// `MM/DD/YY, hh:mm AM` in local time
pub fn format_last_updated(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(dt) => format_timestamp(&dt.with_timezone(&Local)),
        None => INVALID_DATE.to_string(),
    }
}

pub fn format_timestamp<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%m/%d/%y, %I:%M %p").to_string()
}
