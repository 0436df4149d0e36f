//! Calendar-day separators for the message list.
//!
//! Pure and idempotent in `(days, today)`: callers convert message
//! timestamps to local calendar days and recompute on every render, since
//! "today" moves.

#[cfg(test)]
#[path = "date_header_test.rs"]
mod date_header_test;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Label for a day separator, relative to `today`.
///
/// Today and yesterday get their own labels; other days in the current
/// Monday-start week get the weekday name; everything else formats as
/// `dd/mm/yyyy`.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        return "Today".to_owned();
    }
    if day == today - Duration::days(1) {
        return "Yesterday".to_owned();
    }
    if day >= week_start(today) && day < today {
        return weekday_name(day.weekday()).to_owned();
    }
    day.format("%d/%m/%Y").to_string()
}

/// Monday of the week containing `today`. A Sunday maps six days back.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Separator labels for a message list given each message's local day.
///
/// The first entry always gets a separator; later entries get one whenever
/// their day differs from the previous entry's day.
pub fn separator_labels(days: &[NaiveDate], today: NaiveDate) -> Vec<Option<String>> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            if i == 0 || days[i - 1] != *day {
                Some(day_label(*day, today))
            } else {
                None
            }
        })
        .collect()
}
