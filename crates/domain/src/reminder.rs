use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The kind of rent reminder a tenant receives. This is the flat
/// representation stored in the dispatch log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    DueSoon,
    DueToday,
    Overdue,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DueSoon => "due_soon",
            Self::DueToday => "due_today",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Error, Debug)]
#[error("reminder kind: {0} is not recognized")]
pub struct InvalidReminderKindError(String);

impl FromStr for ReminderKind {
    type Err = InvalidReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "due_soon" => Ok(Self::DueSoon),
            "due_today" => Ok(Self::DueToday),
            "overdue" => Ok(Self::Overdue),
            _ => Err(InvalidReminderKindError(s.to_string())),
        }
    }
}

/// The tagged form handed to the message formatter. `Overdue` carries the
/// day count so an overdue message can never be built without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderEvent {
    DueSoon { days_until_due: u32 },
    DueToday,
    Overdue { days_overdue: u32 },
}

impl ReminderEvent {
    pub fn kind(&self) -> ReminderKind {
        match self {
            Self::DueSoon { .. } => ReminderKind::DueSoon,
            Self::DueToday => ReminderKind::DueToday,
            Self::Overdue { .. } => ReminderKind::Overdue,
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// The due date of the billing cycle that `today` falls in. A `due_day`
/// larger than the current month clamps to the last day of that month, so
/// due-day 31 behaves as "last day of the month" in February.
fn due_date_in_month(due_day: u32, today: NaiveDate) -> NaiveDate {
    let day = due_day.clamp(1, last_day_of_month(today.year(), today.month()));
    NaiveDate::from_ymd_opt(today.year(), today.month(), day).unwrap_or(today)
}

/// Decides whether a reminder fires for a tenant with the given `due_day` on
/// `today`. These are point checks: `DueSoon` fires exactly `days_before`
/// days ahead of the due date, `DueToday` on it and `Overdue` exactly
/// `days_after` days past it. Any other day yields nothing.
pub fn reminder_event_on(
    due_day: u32,
    today: NaiveDate,
    days_before: u32,
    days_after: u32,
) -> Option<ReminderEvent> {
    let due_date = due_date_in_month(due_day, today);

    if due_date >= today {
        let days_until_due = (due_date - today).num_days();
        if days_until_due == i64::from(days_before) {
            Some(ReminderEvent::DueSoon {
                days_until_due: days_before,
            })
        } else if days_until_due == 0 {
            Some(ReminderEvent::DueToday)
        } else {
            None
        }
    } else {
        let days_overdue = (today - due_date).num_days();
        if days_overdue == i64::from(days_after) {
            Some(ReminderEvent::Overdue {
                days_overdue: days_after,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn fires_due_soon_exactly_three_days_before() {
        assert_eq!(
            reminder_event_on(15, date(2024, 1, 12), 3, 3),
            Some(ReminderEvent::DueSoon { days_until_due: 3 })
        );
    }

    #[test]
    fn fires_due_today_on_the_due_day() {
        assert_eq!(
            reminder_event_on(15, date(2024, 1, 15), 3, 3),
            Some(ReminderEvent::DueToday)
        );
    }

    #[test]
    fn fires_overdue_exactly_three_days_after() {
        assert_eq!(
            reminder_event_on(15, date(2024, 1, 18), 3, 3),
            Some(ReminderEvent::Overdue { days_overdue: 3 })
        );
    }

    #[test]
    fn stays_silent_on_every_other_day() {
        assert_eq!(reminder_event_on(15, date(2024, 1, 13), 3, 3), None);
        assert_eq!(reminder_event_on(15, date(2024, 1, 14), 3, 3), None);
        assert_eq!(reminder_event_on(15, date(2024, 1, 16), 3, 3), None);
        assert_eq!(reminder_event_on(15, date(2024, 1, 17), 3, 3), None);
        assert_eq!(reminder_event_on(15, date(2024, 1, 19), 3, 3), None);
    }

    #[test]
    fn respects_configured_offsets() {
        assert_eq!(
            reminder_event_on(15, date(2024, 1, 10), 5, 3),
            Some(ReminderEvent::DueSoon { days_until_due: 5 })
        );
        assert_eq!(
            reminder_event_on(15, date(2024, 1, 22), 3, 7),
            Some(ReminderEvent::Overdue { days_overdue: 7 })
        );
    }

    #[test]
    fn clamps_due_day_to_short_months() {
        // Due-day 31 in February behaves as the last day of February.
        assert_eq!(
            reminder_event_on(31, date(2023, 2, 28), 3, 3),
            Some(ReminderEvent::DueToday)
        );
        assert_eq!(
            reminder_event_on(31, date(2024, 2, 29), 3, 3),
            Some(ReminderEvent::DueToday)
        );
        assert_eq!(
            reminder_event_on(31, date(2023, 2, 25), 3, 3),
            Some(ReminderEvent::DueSoon { days_until_due: 3 })
        );
        assert_eq!(
            reminder_event_on(31, date(2023, 3, 3), 3, 3),
            None // March has a 31st, so March 3rd is not 3 days overdue
        );
    }

    #[test]
    fn kind_matches_event() {
        assert_eq!(
            ReminderEvent::DueSoon { days_until_due: 3 }.kind(),
            ReminderKind::DueSoon
        );
        assert_eq!(ReminderEvent::DueToday.kind(), ReminderKind::DueToday);
        assert_eq!(
            ReminderEvent::Overdue { days_overdue: 3 }.kind(),
            ReminderKind::Overdue
        );
    }

    #[test]
    fn kind_roundtrips_through_str() {
        for kind in [
            ReminderKind::DueSoon,
            ReminderKind::DueToday,
            ReminderKind::Overdue,
        ] {
            assert_eq!(kind.as_str().parse::<ReminderKind>().unwrap(), kind);
        }
        assert!("due_eventually".parse::<ReminderKind>().is_err());
    }
}
