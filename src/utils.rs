//! Some utility functions around date keys

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone};

use crate::error::Error;
use crate::store::TaskIndex;
use crate::task::Task;

/// Format a calendar date as the canonical date key that indexes tasks by day.
///
/// The key is `"{year}-{month}-{day}"` with a 1-based month and no zero padding (e.g. `"2024-5-1"`).
/// Two dates sharing year/month/day always yield the same key, whatever their time-of-day.
pub fn date_key<D: Datelike>(date: &D) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Parse a stored date string back into the calendar day it designates.
///
/// The server is not strict about what it stores in `dueDate`: it can be a canonical key, a zero-padded date, or a full RFC3339 timestamp. All of them are accepted here.
pub fn parse_date_key(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    // chrono accepts both "2024-05-01" and "2024-5-1" with this format string
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Re-derive the canonical date key from whatever date string the server stored
pub fn normalize_date_key(text: &str) -> Option<String> {
    parse_date_key(text).map(|day| date_key(&day))
}

/// Combine a date key and an `HH:MM` time-of-day into an absolute local timestamp
pub fn local_timestamp(date_key: &str, time_of_day: &str) -> Result<DateTime<Local>, Error> {
    let day = parse_date_key(date_key)
        .ok_or_else(|| Error::InvalidDateKey(date_key.to_string()))?;
    let time = NaiveTime::parse_from_str(time_of_day.trim(), "%H:%M")
        .map_err(|_| Error::InvalidTime(time_of_day.to_string()))?;

    Local.from_local_datetime(&day.and_time(time))
        .earliest()
        .ok_or_else(|| Error::InvalidTime(time_of_day.to_string()))
}

/// A debug utility that pretty-prints a task index
pub fn print_index(index: &TaskIndex) {
    for (date_key, tasks) in index {
        println!("DAY {}", date_key);
        for task in tasks {
            print_task(task);
        }
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let armed = if task.notification().is_some() { "!" } else { " " };
    println!("    {}{} {}\t{}", completion, armed, task.title(), task.id());
}
