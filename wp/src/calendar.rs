//! ISO-week calendar logic
//!
//! Week identifiers have the form `YYYY-W??` (ISO year plus two-digit
//! zero-padded ISO week, e.g. `2026-W08`). ISO week rules apply exactly:
//! weeks start Monday, week 1 of a year is the week containing that year's
//! first Thursday, and dates near year boundaries may belong to the adjacent
//! ISO year.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Block, DaySchedule};

/// The seven canonical weekday names, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Calendar errors
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Invalid week id: '{0}' (expected YYYY-W??)")]
    InvalidWeekId(String),
}

/// One day of the rendered week view: weekday name, concrete date, blocks
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatedDay {
    pub day: String,
    /// ISO calendar date, e.g. "2026-02-16"
    pub date: String,
    pub blocks: Vec<Block>,
}

/// Current UTC timestamp at second precision, e.g. "2026-02-16T09:30:00Z"
pub fn now_utc_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Week id for a calendar date
pub fn week_id_for(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Week id for "today" in the given timezone
pub fn current_week_id(tz: Tz) -> String {
    let today = Utc::now().with_timezone(&tz).date_naive();
    let week_id = week_id_for(today);
    debug!(%today, %week_id, "current_week_id: computed");
    week_id
}

/// Monday of the ISO week named by `week_id`
pub fn week_start_date(week_id: &str) -> Result<NaiveDate, CalendarError> {
    debug!(%week_id, "week_start_date: called");
    let (year_str, week_str) = week_id
        .split_once("-W")
        .ok_or_else(|| CalendarError::InvalidWeekId(week_id.to_string()))?;

    let iso_year: i32 = year_str
        .parse()
        .map_err(|_| CalendarError::InvalidWeekId(week_id.to_string()))?;
    let iso_week: u32 = week_str
        .parse()
        .map_err(|_| CalendarError::InvalidWeekId(week_id.to_string()))?;

    NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Mon)
        .ok_or_else(|| CalendarError::InvalidWeekId(week_id.to_string()))
}

/// Expand a stored weekly plan into a full dated Monday..Sunday view
///
/// Always emits exactly seven entries in fixed order. Days present in the
/// input populate their blocks; absent days get an empty block list. Input
/// entries whose `day` is not one of the seven canonical English names are
/// dropped - intentional lossy normalization of oracle output, not an error.
pub fn expand_week_with_dates(week_id: &str, weekly_plan: &[DaySchedule]) -> Result<Vec<DatedDay>, CalendarError> {
    debug!(%week_id, days = weekly_plan.len(), "expand_week_with_dates: called");
    let week_start = week_start_date(week_id)?;

    let mut out = Vec::with_capacity(7);
    for (offset, day) in WEEKDAYS.iter().enumerate() {
        let date = week_start + chrono::Duration::days(offset as i64);
        let blocks = weekly_plan
            .iter()
            .find(|d| d.day == *day)
            .map(|d| d.blocks.clone())
            .unwrap_or_default();
        out.push(DatedDay {
            day: (*day).to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            blocks,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(name: &str, blocks: Vec<Block>) -> DaySchedule {
        DaySchedule {
            day: name.to_string(),
            blocks,
        }
    }

    fn block(start: &str, end: &str, task: &str) -> Block {
        Block {
            start: start.to_string(),
            end: end.to_string(),
            task: task.to_string(),
            notes: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_week_id_for_mid_year_date() {
        // 2026-02-20 is a Friday in ISO week 8
        let d = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        assert_eq!(week_id_for(d), "2026-W08");
    }

    #[test]
    fn test_week_start_date_round_trip() {
        assert_eq!(
            week_start_date("2026-W08").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 16).unwrap()
        );
    }

    #[test]
    fn test_year_boundary_week_membership() {
        // 2025-12-29 (Monday) through 2026-01-04 (Sunday) are all ISO week
        // 2026-W01 even though the calendar dates span two Gregorian years
        let start = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
        for offset in 0..7 {
            let d = start + chrono::Duration::days(offset);
            assert_eq!(week_id_for(d), "2026-W01", "offset {}", offset);
        }
        assert_eq!(week_start_date("2026-W01").unwrap(), start);
    }

    #[test]
    fn test_week_start_date_invalid_inputs() {
        for bad in ["", "2026", "2026-08", "2026-Wxx", "banana-W08", "2026-W99"] {
            assert!(
                matches!(week_start_date(bad), Err(CalendarError::InvalidWeekId(_))),
                "expected InvalidWeekId for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_expand_empty_plan_gives_seven_empty_days() {
        let days = expand_week_with_dates("2026-W08", &[]).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, "Monday");
        assert_eq!(days[0].date, "2026-02-16");
        assert_eq!(days[6].day, "Sunday");
        assert_eq!(days[6].date, "2026-02-22");
        assert!(days.iter().all(|d| d.blocks.is_empty()));
    }

    #[test]
    fn test_expand_populates_named_days_in_fixed_order() {
        let plan = vec![
            day("Friday", vec![block("09:00", "10:00", "review")]),
            day("Monday", vec![block("14:00", "15:00", "planning")]),
        ];
        let days = expand_week_with_dates("2026-W08", &plan).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].blocks.len(), 1);
        assert_eq!(days[0].blocks[0].task, "planning");
        assert_eq!(days[4].blocks.len(), 1);
        assert_eq!(days[4].blocks[0].task, "review");
        assert!(days[1].blocks.is_empty());
    }

    #[test]
    fn test_expand_drops_unrecognized_day_names() {
        let plan = vec![
            day("Funday", vec![block("09:00", "10:00", "lost")]),
            day("Tuesday", vec![block("10:00", "11:00", "kept")]),
        ];
        let days = expand_week_with_dates("2026-W08", &plan).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[1].blocks.len(), 1);
        assert_eq!(days[1].blocks[0].task, "kept");
        let total: usize = days.iter().map(|d| d.blocks.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_expand_invalid_week_id_errors() {
        assert!(expand_week_with_dates("not-a-week", &[]).is_err());
    }
}
