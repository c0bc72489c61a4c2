//! Due date parsing and formatting helpers.
//!
//! Dates are entered by the user as text, either as `YYYY-MM-DD` or in a small
//! natural language ("today", "next friday", "in 3d"). Stored due dates are
//! UTC timestamps; everything shown to the user is in the local time zone.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};

/// Display format for due dates in the list and the edit form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next monday", "this monday" (and short names)
/// - "this weekend", "end of week", "end of month"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return Some(today + Duration::days(days_until_saturday as i64));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        return parse_offset(rest.trim(), today);
    }

    let (qualifier, day_name) = match s.split_once(' ') {
        Some((q @ ("next" | "this"), rest)) => (Some(q), rest.trim()),
        _ => (None, s.as_str()),
    };
    if let Some(target) = weekday_index(day_name) {
        let current = today.weekday().num_days_from_monday();
        let days_ahead = (target + 7 - current) % 7;
        let days_to_add = match qualifier {
            Some("next") => days_ahead + 7,
            _ => days_ahead,
        };
        return Some(today + Duration::days(days_to_add as i64));
    }

    NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()
}

/// "3d", "2w" or "1m" added to `today`. Out-of-range amounts give `None`.
fn parse_offset(rest: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (split, _) = rest.char_indices().next_back()?;
    let (amount, unit) = rest.split_at(split);
    let n = amount.trim().parse::<i64>().ok()?;
    let offset = match unit {
        "d" => Duration::try_days(n)?,
        "w" => Duration::try_weeks(n)?,
        // Months are approximated as 30 days.
        "m" => Duration::try_days(n.checked_mul(30)?)?,
        _ => return None,
    };
    today.checked_add_signed(offset)
}

fn weekday_index(name: &str) -> Option<u32> {
    let index = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(index)
}

/// Start and end dates of the ISO week (Monday to Sunday) containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// The local calendar date of a stored timestamp.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// The instant local midnight begins on `date`, as UTC.
///
/// Falls back to UTC midnight when the local midnight does not exist
/// (a DST gap at 00:00).
pub fn start_of_local_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Truncate a string to a maximum width in characters, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}
