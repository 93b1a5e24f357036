use serde::Serialize;
use time::{Date, OffsetDateTime};

const DAY_MS: i128 = 24 * 60 * 60 * 1000;

/// Items at or below this many remaining days are flagged as urgent.
pub const URGENT_WITHIN_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Highest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryStatus {
    pub days: i64,
    pub urgency: Urgency,
    pub label: String,
}

impl ExpiryStatus {
    pub fn is_urgent(&self) -> bool {
        self.urgency >= Urgency::Medium
    }
}

/// Classifies an optional expiry date relative to `now`.
///
/// The date is read as midnight UTC of that day and the remaining time is
/// rounded up to whole days, so an item dated today evaluates to `0` for the
/// rest of the day. Never cache the result: it depends on `now`.
pub fn evaluate(expiry: Option<Date>, now: OffsetDateTime) -> Option<ExpiryStatus> {
    let days = days_until(expiry?, now);
    let (urgency, label) = match days {
        d if d < 0 => (Urgency::Highest, "EXPIRED".to_string()),
        0 => (Urgency::High, "EXPIRES TODAY".to_string()),
        d if d <= URGENT_WITHIN_DAYS => (Urgency::Medium, format!("Expiring in {d}d")),
        d => (Urgency::Low, format!("Expires in {d}d")),
    };
    Some(ExpiryStatus {
        days,
        urgency,
        label,
    })
}

pub fn is_urgent(expiry: Option<Date>, now: OffsetDateTime) -> bool {
    evaluate(expiry, now).is_some_and(|s| s.is_urgent())
}

fn days_until(expiry: Date, now: OffsetDateTime) -> i64 {
    let ms = (expiry.midnight().assume_utc() - now).whole_milliseconds();
    // ceil for a positive divisor
    let days = ms.div_euclid(DAY_MS) + i128::from(ms.rem_euclid(DAY_MS) != 0);
    days as i64
}
