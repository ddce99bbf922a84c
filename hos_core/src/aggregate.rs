//! Per-day rollup of duty-status log segments.
//!
//! Aggregation is a read-only pass over the simulated segment stream; it
//! never reorders or drops segments.

use crate::{DailyLog, DailyTotals, DutyStatus, LogSegment};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Sum driving, on-duty and off-duty minutes for each day
///
/// OFF and SLEEPER segments both count towards off-duty time.
pub fn daily_totals(segments: &[LogSegment]) -> BTreeMap<u32, DailyTotals> {
    let mut totals: BTreeMap<u32, DailyTotals> = BTreeMap::new();

    for segment in segments {
        let entry = totals.entry(segment.day).or_insert_with(|| DailyTotals {
            day: segment.day,
            ..DailyTotals::default()
        });

        let minutes = segment.duration_minutes();
        match segment.status {
            DutyStatus::Driving => entry.driving_minutes += minutes,
            DutyStatus::OnDuty => entry.on_duty_minutes += minutes,
            DutyStatus::Off | DutyStatus::Sleeper => entry.off_duty_minutes += minutes,
        }
    }

    totals
}

/// Group segments into dated log pages, day 1 falling on `start_date`
pub fn daily_logs(segments: &[LogSegment], start_date: NaiveDate) -> Vec<DailyLog> {
    let mut by_day: BTreeMap<u32, Vec<LogSegment>> = BTreeMap::new();
    for segment in segments {
        by_day.entry(segment.day).or_default().push(segment.clone());
    }

    let mut totals = daily_totals(segments);

    by_day
        .into_iter()
        .map(|(day, segments)| DailyLog {
            day,
            date: date_for_day(start_date, day),
            totals: totals.remove(&day).unwrap_or_default(),
            segments,
        })
        .collect()
}

/// Calendar date of a 1-based trip day
pub fn date_for_day(start_date: NaiveDate, day: u32) -> NaiveDate {
    let offset = Days::new(u64::from(day.saturating_sub(1)));
    start_date.checked_add_days(offset).unwrap_or(NaiveDate::MAX)
}
