//! Due-date classification.
//!
//! Every helper takes the reference instant explicitly so callers (and
//! tests) decide what "now" means. Calendar comparisons use the UTC date.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default window for [`is_due_soon`], in days
pub const DEFAULT_DUE_SOON_DAYS: u32 = 3;

/// Display tier for a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    DueToday,
    DueSoon,
    Normal,
}

/// Strictly past the reference instant
pub fn is_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due < now
}

/// Falls on the same calendar day as the reference instant
pub fn is_due_today(due: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due.date_naive() == now.date_naive()
}

/// Falls between today and `days` days from today, both inclusive
pub fn is_due_soon(due: DateTime<Utc>, now: DateTime<Utc>, days: u32) -> bool {
    let today = now.date_naive();
    let due_day = due.date_naive();
    due_day >= today && due_day <= today + Duration::days(i64::from(days))
}

/// Classifies a due date into its display tier.
///
/// A date on today's calendar day is `DueToday` even when its instant has
/// already passed; anything earlier is `Overdue`.
pub fn due_status(due: Option<DateTime<Utc>>, now: DateTime<Utc>, days: u32) -> DueStatus {
    let Some(due) = due else {
        return DueStatus::Normal;
    };

    if is_due_today(due, now) {
        DueStatus::DueToday
    } else if is_overdue(due, now) {
        DueStatus::Overdue
    } else if is_due_soon(due, now, days) {
        DueStatus::DueSoon
    } else {
        DueStatus::Normal
    }
}

/// Short human label for a due date: "Today", "Tomorrow", "Yesterday",
/// "Mar 5", or "Mar 5, 2027" outside the current year.
pub fn format_due_date(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let today = now.date_naive();
    let due_day = due.date_naive();

    if due_day == today {
        "Today".to_string()
    } else if due_day == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else if due_day == today - Duration::days(1) {
        "Yesterday".to_string()
    } else if due_day.year() == today.year() {
        due.format("%b %-d").to_string()
    } else {
        due.format("%b %-d, %Y").to_string()
    }
}
