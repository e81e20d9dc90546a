use chrono::{DateTime, TimeZone, Timelike};

/// Formats seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Greeting for the dashboard header based on local hour.
pub fn greeting<Tz: TimeZone>(moment: &DateTime<Tz>) -> &'static str {
    match moment.hour() {
        0..12 => "Good morning",
        12..18 => "Good afternoon",
        _ => "Good evening",
    }
}

/// This is the standard way of showing a date in focusdesk listings.
pub fn short_date<Tz: TimeZone>(moment: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    moment.format("%Y-%m-%d").to_string()
}
