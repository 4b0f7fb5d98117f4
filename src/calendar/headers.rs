use chrono::{Datelike, NaiveDate};

use super::range::week_number;

/// Day view header, e.g. "5th August 2026"
pub fn format_day_header(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        ordinal(date.day()),
        date.format("%B"),
        date.year()
    )
}

/// Week view header, e.g. "Week 32, 2026"
pub fn format_week_header(date: NaiveDate) -> String {
    format!("Week {}, {}", week_number(date), date.year())
}

/// Month view header, e.g. "August 2026"
pub fn format_month_header(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.year())
}

/// Per-day column label, e.g. "Wednesday 5th August"
pub fn format_day_label(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.format("%A"),
        ordinal(date.day()),
        date.format("%B")
    )
}

/// English ordinal day-of-month: 1st, 2nd, 3rd, 4th, ... 11th, 21st
fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
