//! Trip planning: turn a trip request into a dated, labelled schedule.
//!
//! The route distance is supplied by the caller. This module validates the
//! request, runs the engine and decorates the raw timeline with locations,
//! wall-clock times and per-day log pages.

use crate::aggregate::{daily_logs, date_for_day};
use crate::{
    DailyLog, HosEngine, Result, RouteStop, StopKind, Timeline, TripParameters,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label used for stops that are not tied to a named location
pub const EN_ROUTE: &str = "En route";

/// What the caller wants planned
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub total_distance_miles: f64,
    pub cycle_used_hours: f64,
    pub start_date: NaiveDate,
}

/// A route stop placed on the calendar
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedStop {
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub day_number: u32,
    pub location_name: String,
    pub start_minute: u32,
    pub end_minute: u32,
    pub duration_minutes: u32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Headline numbers for a planned trip
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TripSummary {
    pub total_days: usize,
    pub total_distance_miles: f64,
    pub simulated_miles: f64,
    pub total_driving_minutes: u32,
    pub total_on_duty_minutes: u32,
    /// Distance the duty cycle did not allow for
    pub unfinished_miles: f64,
    pub cycle_hours_remaining: f64,
}

impl TripSummary {
    pub fn is_complete(&self) -> bool {
        self.unfinished_miles <= 0.0
    }
}

/// A complete planned trip
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub request: TripRequest,
    pub stops: Vec<PlannedStop>,
    pub daily_logs: Vec<DailyLog>,
    pub summary: TripSummary,
}

/// Validate a request, simulate it and assemble the plan
pub fn plan_trip(engine: &HosEngine, request: TripRequest) -> Result<TripPlan> {
    let params = TripParameters::new(
        request.total_distance_miles,
        request.cycle_used_hours,
        engine.rules(),
    )?;

    let timeline = engine.simulate(&params);

    let stops = timeline
        .route_stops()
        .iter()
        .map(|stop| place_stop(stop, &request))
        .collect();
    let logs = daily_logs(timeline.log_segments(), request.start_date);
    let summary = summarize(&timeline, &logs, &request, engine);

    let plan = TripPlan {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        request,
        stops,
        daily_logs: logs,
        summary,
    };

    tracing::info!(
        "Planned trip {}: {} days, {:.1} of {:.1} miles",
        plan.id,
        plan.summary.total_days,
        plan.summary.simulated_miles,
        plan.summary.total_distance_miles
    );

    Ok(plan)
}

fn place_stop(stop: &RouteStop, request: &TripRequest) -> PlannedStop {
    let location_name = match stop.kind {
        StopKind::Pickup => request.pickup_location.clone(),
        StopKind::Dropoff => request.drop_location.clone(),
        _ => EN_ROUTE.to_string(),
    };

    PlannedStop {
        kind: stop.kind,
        day_number: stop.day,
        location_name,
        start_minute: stop.start_minute,
        end_minute: stop.end_minute,
        duration_minutes: stop.duration_minutes(),
        start_time: wall_clock(request.start_date, stop.day, stop.start_minute),
        end_time: wall_clock(request.start_date, stop.day, stop.end_minute),
    }
}

fn wall_clock(start_date: NaiveDate, day: u32, minute: u32) -> NaiveDateTime {
    date_for_day(start_date, day).and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute))
}

fn summarize(
    timeline: &Timeline,
    logs: &[DailyLog],
    request: &TripRequest,
    engine: &HosEngine,
) -> TripSummary {
    let total_driving_minutes: u32 = logs.iter().map(|l| l.totals.driving_minutes).sum();
    let total_on_duty_minutes: u32 = logs.iter().map(|l| l.totals.on_duty_minutes).sum();

    TripSummary {
        total_days: timeline.days(),
        total_distance_miles: request.total_distance_miles,
        simulated_miles: engine.rules().miles_for_minutes(total_driving_minutes),
        total_driving_minutes,
        total_on_duty_minutes,
        unfinished_miles: timeline.unfinished_miles(),
        cycle_hours_remaining: timeline.cycle_left_hours(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, HosRules};

    fn engine() -> HosEngine {
        HosEngine::new(HosRules::default()).unwrap()
    }

    fn request(distance: f64, cycle_used: f64) -> TripRequest {
        TripRequest {
            current_location: "Dallas, TX".into(),
            pickup_location: "Fort Worth, TX".into(),
            drop_location: "Denver, CO".into(),
            total_distance_miles: distance,
            cycle_used_hours: cycle_used,
            start_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    #[test]
    fn test_plan_labels_and_times() {
        let plan = plan_trip(&engine(), request(500.0, 0.0)).unwrap();

        let pickup = &plan.stops[0];
        assert_eq!(pickup.kind, StopKind::Pickup);
        assert_eq!(pickup.location_name, "Fort Worth, TX");
        assert_eq!(pickup.duration_minutes, 60);
        assert_eq!(
            pickup.start_time,
            NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );

        let dropoff = plan.stops.last().unwrap();
        assert_eq!(dropoff.kind, StopKind::Dropoff);
        assert_eq!(dropoff.location_name, "Denver, CO");
        assert_eq!(dropoff.day_number, 2);
        assert_eq!(
            dropoff.end_time,
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );

        assert!(plan.stops[1..plan.stops.len() - 1]
            .iter()
            .all(|s| s.location_name == EN_ROUTE));
    }

    #[test]
    fn test_plan_summary() {
        let plan = plan_trip(&engine(), request(500.0, 0.0)).unwrap();

        assert_eq!(plan.summary.total_days, 2);
        assert_eq!(plan.daily_logs.len(), 2);
        assert_eq!(plan.summary.total_driving_minutes, 545);
        // pickup + break + dropoff
        assert_eq!(plan.summary.total_on_duty_minutes, 150);
        assert!(plan.summary.is_complete());
        assert!((plan.summary.simulated_miles - 499.583).abs() < 0.01);
        assert!((plan.summary.cycle_hours_remaining - (70.0 - 500.0 / 55.0)).abs() < 1e-9);
    }

    #[test]
    fn test_plan_reports_unfinished_distance() {
        let plan = plan_trip(&engine(), request(3000.0, 62.0)).unwrap();

        assert!(!plan.summary.is_complete());
        assert!((plan.summary.unfinished_miles - (3000.0 - 8.0 * 55.0)).abs() < 1e-9);
        assert_eq!(plan.summary.cycle_hours_remaining, 0.0);
    }

    #[test]
    fn test_plan_rejects_invalid_cycle() {
        let err = plan_trip(&engine(), request(500.0, 80.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_plan_empty_trip() {
        let plan = plan_trip(&engine(), request(0.0, 0.0)).unwrap();
        assert!(plan.stops.is_empty());
        assert!(plan.daily_logs.is_empty());
        assert_eq!(plan.summary.total_days, 0);
    }
}
