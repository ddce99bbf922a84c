//! Core domain types for the HOS trip planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Route stops (physical activities along the route)
//! - Log segments (duty-status intervals for the driver's daily log)
//! - Validated trip parameters
//! - The finished simulation timeline and its per-day totals

use crate::{Error, HosRules, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Activity and Duty Status
// ============================================================================

/// Kind of activity recorded as a route stop
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopKind {
    Driving,
    Pickup,
    Dropoff,
    Rest,
    Fuel,
    Break,
}

/// Duty status shown on the driver's log grid
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    Off,
    Sleeper,
    Driving,
    OnDuty,
}

impl DutyStatus {
    /// OFF and SLEEPER both count as off-duty time
    pub fn is_off_duty(self) -> bool {
        matches!(self, DutyStatus::Off | DutyStatus::Sleeper)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DutyStatus::Off => "OFF",
            DutyStatus::Sleeper => "SLEEPER",
            DutyStatus::Driving => "DRIVING",
            DutyStatus::OnDuty => "ON_DUTY",
        }
    }
}

impl StopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StopKind::Driving => "DRIVING",
            StopKind::Pickup => "PICKUP",
            StopKind::Dropoff => "DROPOFF",
            StopKind::Rest => "REST",
            StopKind::Fuel => "FUEL",
            StopKind::Break => "BREAK",
        }
    }
}

// ============================================================================
// Timeline Segments
// ============================================================================

/// A physical activity on the route, anchored to a day and minute interval
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteStop {
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub day: u32,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl RouteStop {
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }
}

/// A duty-status interval, anchored to a day and minute interval
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogSegment {
    pub status: DutyStatus,
    pub day: u32,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl LogSegment {
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }
}

// ============================================================================
// Trip Input
// ============================================================================

/// Validated simulation input
///
/// Fields are private: a `TripParameters` value only exists once the
/// distance and cycle hours have passed validation, so the engine never
/// sees NaN, infinities or an out-of-range cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripParameters {
    total_distance_miles: f64,
    cycle_used_hours: f64,
    max_cycle_hours: f64,
}

impl TripParameters {
    /// Validate trip input against the rule set's cycle limit
    ///
    /// A distance of zero or less is accepted and simulates to an empty
    /// timeline.
    pub fn new(total_distance_miles: f64, cycle_used_hours: f64, rules: &HosRules) -> Result<Self> {
        if !total_distance_miles.is_finite() {
            return Err(Error::InvalidInput(format!(
                "total distance must be finite, got {}",
                total_distance_miles
            )));
        }
        if !cycle_used_hours.is_finite() {
            return Err(Error::InvalidInput(format!(
                "cycle hours used must be finite, got {}",
                cycle_used_hours
            )));
        }
        if cycle_used_hours < 0.0 || cycle_used_hours > rules.max_cycle_hours {
            return Err(Error::InvalidInput(format!(
                "cycle hours used must be between 0 and {}, got {}",
                rules.max_cycle_hours, cycle_used_hours
            )));
        }

        Ok(Self {
            total_distance_miles,
            cycle_used_hours,
            max_cycle_hours: rules.max_cycle_hours,
        })
    }

    pub fn total_distance_miles(&self) -> f64 {
        self.total_distance_miles
    }

    pub fn cycle_used_hours(&self) -> f64 {
        self.cycle_used_hours
    }

    /// Hours still available in the duty cycle when the trip starts
    pub fn cycle_left_hours(&self) -> f64 {
        self.max_cycle_hours - self.cycle_used_hours
    }
}

// ============================================================================
// Simulation Output
// ============================================================================

/// The finished, immutable result of one simulation run
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Timeline {
    route_stops: Vec<RouteStop>,
    log_segments: Vec<LogSegment>,
    unfinished_miles: f64,
    cycle_left_hours: f64,
}

impl Timeline {
    pub(crate) fn new(
        route_stops: Vec<RouteStop>,
        log_segments: Vec<LogSegment>,
        unfinished_miles: f64,
        cycle_left_hours: f64,
    ) -> Self {
        Self {
            route_stops,
            log_segments,
            unfinished_miles,
            cycle_left_hours,
        }
    }

    pub fn route_stops(&self) -> &[RouteStop] {
        &self.route_stops
    }

    pub fn log_segments(&self) -> &[LogSegment] {
        &self.log_segments
    }

    /// Distance left undriven because the duty cycle ran out first
    pub fn unfinished_miles(&self) -> f64 {
        self.unfinished_miles
    }

    /// Cycle hours remaining after the last driving day
    pub fn cycle_left_hours(&self) -> f64 {
        self.cycle_left_hours
    }

    /// Number of distinct days that carry log segments
    pub fn days(&self) -> usize {
        let mut days: Vec<u32> = self.log_segments.iter().map(|s| s.day).collect();
        days.dedup();
        days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route_stops.is_empty() && self.log_segments.is_empty()
    }

    pub fn into_parts(self) -> (Vec<RouteStop>, Vec<LogSegment>) {
        (self.route_stops, self.log_segments)
    }
}

/// Per-day duty totals derived from log segments
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyTotals {
    pub day: u32,
    pub driving_minutes: u32,
    pub on_duty_minutes: u32,
    pub off_duty_minutes: u32,
}

impl DailyTotals {
    pub fn total_minutes(&self) -> u32 {
        self.driving_minutes + self.on_duty_minutes + self.off_duty_minutes
    }

    pub fn driving_hours(&self) -> f64 {
        f64::from(self.driving_minutes) / 60.0
    }

    pub fn on_duty_hours(&self) -> f64 {
        f64::from(self.on_duty_minutes) / 60.0
    }

    pub fn off_duty_hours(&self) -> f64 {
        f64::from(self.off_duty_minutes) / 60.0
    }
}

/// One dated page of the driver's log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub day: u32,
    pub date: NaiveDate,
    pub totals: DailyTotals,
    pub segments: Vec<LogSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&DutyStatus::OnDuty).unwrap();
        assert_eq!(json, "\"ON_DUTY\"");
        assert_eq!(DutyStatus::OnDuty.as_str(), "ON_DUTY");
    }

    #[test]
    fn test_route_stop_serializes_type_field() {
        let stop = RouteStop {
            kind: StopKind::Pickup,
            day: 1,
            start_minute: 60,
            end_minute: 120,
        };
        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["type"], "PICKUP");
        assert_eq!(stop.duration_minutes(), 60);
    }

    #[test]
    fn test_off_duty_statuses() {
        assert!(DutyStatus::Off.is_off_duty());
        assert!(DutyStatus::Sleeper.is_off_duty());
        assert!(!DutyStatus::Driving.is_off_duty());
        assert!(!DutyStatus::OnDuty.is_off_duty());
    }

    #[test]
    fn test_trip_parameters_accepts_valid_input() {
        let rules = HosRules::default();
        let params = TripParameters::new(500.0, 20.0, &rules).unwrap();
        assert_eq!(params.total_distance_miles(), 500.0);
        assert_eq!(params.cycle_left_hours(), 50.0);

        // Boundaries are inclusive
        assert!(TripParameters::new(100.0, 0.0, &rules).is_ok());
        assert!(TripParameters::new(100.0, 70.0, &rules).is_ok());
    }

    #[test]
    fn test_trip_parameters_allows_nonpositive_distance() {
        let rules = HosRules::default();
        assert!(TripParameters::new(0.0, 10.0, &rules).is_ok());
        assert!(TripParameters::new(-25.0, 10.0, &rules).is_ok());
    }

    #[test]
    fn test_trip_parameters_rejects_out_of_range_cycle() {
        let rules = HosRules::default();
        assert!(matches!(
            TripParameters::new(100.0, -0.5, &rules),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            TripParameters::new(100.0, 70.5, &rules),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_trip_parameters_rejects_non_finite() {
        let rules = HosRules::default();
        assert!(TripParameters::new(f64::NAN, 0.0, &rules).is_err());
        assert!(TripParameters::new(f64::INFINITY, 0.0, &rules).is_err());
        assert!(TripParameters::new(100.0, f64::NAN, &rules).is_err());
        assert!(TripParameters::new(100.0, f64::NEG_INFINITY, &rules).is_err());
    }

    #[test]
    fn test_daily_totals_hours() {
        let totals = DailyTotals {
            day: 1,
            driving_minutes: 545,
            on_duty_minutes: 90,
            off_duty_minutes: 805,
        };
        assert_eq!(totals.total_minutes(), 1440);
        assert_eq!(totals.on_duty_hours(), 1.5);
    }
}
