//! Hours-of-service simulation engine.
//!
//! The engine walks a trip one day at a time:
//!
//! 1. The day's driving budget is the smallest of the daily driving limit,
//!    the hours needed for the remaining distance, and the hours left in
//!    the duty cycle. A budget of zero or less ends the trip.
//! 2. Every day opens with an off-duty block; the first day follows it
//!    with the pickup.
//! 3. Driving is consumed in blocks no longer than the break threshold.
//!    A block cut at the threshold is followed by a mandatory break, and
//!    a fuel stop is inserted between blocks once the fuel interval has
//!    been driven.
//! 4. Whatever is left of the day is logged as sleeper berth time.
//!
//! Once the loop ends a single dropoff is appended after the last logged
//! segment, rolling to the next day when it does not fit.
//!
//! No interval ever crosses the end of a day. Distance and cycle hours
//! are deducted using exact fractional hours; only the hours-to-minutes
//! conversion truncates, which loses less than one minute of driving per
//! day.

use crate::config::{hours_to_minutes, MINUTES_PER_HOUR};
use crate::{
    DutyStatus, HosRules, LogSegment, Result, RouteStop, StopKind, Timeline, TripParameters,
};

/// Which constraint set the day's driving budget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BudgetLimit {
    DailyMaximum,
    Distance,
    Cycle,
}

#[derive(Clone, Copy, Debug)]
struct DayBudget {
    hours: f64,
    limit: BudgetLimit,
}

/// Everything the simulation carries from one day to the next
#[derive(Clone, Debug)]
struct SimulationState {
    day: u32,
    remaining_miles: f64,
    cycle_left_hours: f64,
    distance_since_fuel: f64,
    pickup_emitted: bool,
}

impl SimulationState {
    fn start(params: &TripParameters) -> Self {
        Self {
            day: 1,
            remaining_miles: params.total_distance_miles(),
            cycle_left_hours: params.cycle_left_hours(),
            distance_since_fuel: 0.0,
            pickup_emitted: false,
        }
    }

    fn trip_continues(&self) -> bool {
        self.remaining_miles > 0.0 && self.cycle_left_hours > 0.0
    }
}

/// Output accumulated during a run; only ever handed out as a `Timeline`
#[derive(Default)]
struct TimelineBuilder {
    stops: Vec<RouteStop>,
    segments: Vec<LogSegment>,
}

/// Write position inside a single day
struct DayCursor<'a> {
    day: u32,
    minute: u32,
    day_minutes: u32,
    out: &'a mut TimelineBuilder,
}

impl DayCursor<'_> {
    fn minutes_left(&self) -> u32 {
        self.day_minutes.saturating_sub(self.minute)
    }

    fn fits(&self, minutes: u32) -> bool {
        minutes <= self.minutes_left()
    }

    /// Log `minutes` of a duty status, capped at the end of the day.
    /// Returns the minutes actually logged.
    fn log(&mut self, status: DutyStatus, minutes: u32) -> u32 {
        let minutes = minutes.min(self.minutes_left());
        if minutes == 0 {
            return 0;
        }

        let start = self.minute;
        self.minute += minutes;
        self.out.segments.push(LogSegment {
            status,
            day: self.day,
            start_minute: start,
            end_minute: self.minute,
        });
        minutes
    }

    /// Log an activity together with its route stop.
    fn activity(&mut self, kind: StopKind, status: DutyStatus, minutes: u32) -> u32 {
        let start = self.minute;
        let logged = self.log(status, minutes);
        if logged > 0 {
            self.out.stops.push(RouteStop {
                kind,
                day: self.day,
                start_minute: start,
                end_minute: start + logged,
            });
        }
        logged
    }
}

/// Day-by-day hours-of-service simulator
#[derive(Clone, Debug)]
pub struct HosEngine {
    rules: HosRules,
}

impl HosEngine {
    /// Create an engine for a rule set, rejecting rules it cannot run on
    pub fn new(rules: HosRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &HosRules {
        &self.rules
    }

    /// Simulate the whole trip and return the finished timeline
    pub fn simulate(&self, params: &TripParameters) -> Timeline {
        let mut state = SimulationState::start(params);
        let mut out = TimelineBuilder::default();

        loop {
            let budget = self.day_budget(&state);
            if budget.hours <= 0.0 {
                break;
            }

            let planned_minutes = hours_to_minutes(budget.hours);
            let driven_minutes = self.simulate_day(&mut state, budget, &mut out);
            if planned_minutes > 0 && driven_minutes == 0 {
                tracing::warn!(
                    "Day {}: no time left to drive, stopping with {:.2} miles remaining",
                    state.day,
                    state.remaining_miles
                );
                break;
            }

            if !state.trip_continues() {
                break;
            }
            state.day += 1;
        }

        self.append_dropoff(&mut out);

        tracing::debug!(
            "Simulation finished: {} stops, {} log segments, {:.2} miles unfinished",
            out.stops.len(),
            out.segments.len(),
            state.remaining_miles.max(0.0)
        );

        Timeline::new(
            out.stops,
            out.segments,
            state.remaining_miles.max(0.0),
            state.cycle_left_hours.max(0.0),
        )
    }

    fn day_budget(&self, state: &SimulationState) -> DayBudget {
        let mut budget = DayBudget {
            hours: self.rules.max_daily_drive_hours,
            limit: BudgetLimit::DailyMaximum,
        };

        let distance_hours = state.remaining_miles / self.rules.speed_mph;
        if distance_hours <= budget.hours {
            budget = DayBudget {
                hours: distance_hours,
                limit: BudgetLimit::Distance,
            };
        }

        if state.cycle_left_hours <= budget.hours {
            budget = DayBudget {
                hours: state.cycle_left_hours,
                limit: BudgetLimit::Cycle,
            };
        }

        budget
    }

    /// Simulate one day and return the whole minutes driven
    fn simulate_day(
        &self,
        state: &mut SimulationState,
        budget: DayBudget,
        out: &mut TimelineBuilder,
    ) -> u32 {
        let rules = &self.rules;
        let mut cursor = DayCursor {
            day: state.day,
            minute: 0,
            day_minutes: rules.day_minutes,
            out,
        };

        cursor.log(DutyStatus::Off, rules.off_duty_start_minutes);

        if !state.pickup_emitted {
            cursor.activity(StopKind::Pickup, DutyStatus::OnDuty, rules.pickup_minutes);
            state.pickup_emitted = true;
        }

        let break_threshold = rules.break_threshold_minutes();
        let planned_minutes = hours_to_minutes(budget.hours);
        let mut budget_left = planned_minutes;

        while budget_left > 0 && cursor.minutes_left() > 0 {
            if state.distance_since_fuel >= rules.fuel_interval_miles {
                if cursor.fits(rules.fuel_minutes) {
                    cursor.activity(StopKind::Fuel, DutyStatus::OnDuty, rules.fuel_minutes);
                    state.distance_since_fuel = 0.0;
                } else {
                    tracing::debug!(
                        "Day {}: fuel stop does not fit before end of day, deferring",
                        state.day
                    );
                }
            }

            let needs_break = budget_left > break_threshold;
            let block = if needs_break { break_threshold } else { budget_left };

            let driven = cursor.activity(StopKind::Driving, DutyStatus::Driving, block);
            if driven == 0 {
                break;
            }
            budget_left -= driven;
            state.distance_since_fuel += rules.miles_for_minutes(driven);

            if needs_break {
                cursor.activity(StopKind::Break, DutyStatus::OnDuty, rules.break_minutes);
            }
        }

        let rest = cursor.minutes_left();
        cursor.log(DutyStatus::Sleeper, rest);

        // The sub-minute remainder of a fully driven budget still counts;
        // a budget cut short by the end of the day only counts what was driven.
        let fully_driven = budget_left == 0;
        let driven_hours = if fully_driven {
            budget.hours
        } else {
            budget.hours - f64::from(budget_left) / MINUTES_PER_HOUR
        };

        let distance_hours = state.remaining_miles / rules.speed_mph;
        if fully_driven && distance_hours <= budget.hours {
            state.remaining_miles = 0.0;
        } else {
            state.remaining_miles -= driven_hours * rules.speed_mph;
        }

        if fully_driven && state.cycle_left_hours <= budget.hours {
            state.cycle_left_hours = 0.0;
        } else {
            state.cycle_left_hours -= driven_hours;
        }

        tracing::debug!(
            "Day {}: budget {:.2}h ({:?}), drove {:.2}h, {:.2} miles and {:.2} cycle hours left",
            state.day,
            budget.hours,
            budget.limit,
            driven_hours,
            state.remaining_miles,
            state.cycle_left_hours
        );

        planned_minutes - budget_left
    }

    fn append_dropoff(&self, out: &mut TimelineBuilder) {
        let (last_day, last_end) = match out.segments.last() {
            Some(segment) => (segment.day, segment.end_minute),
            None => return,
        };

        let rules = &self.rules;
        let (day, start) = if last_end.saturating_add(rules.dropoff_minutes) <= rules.day_minutes {
            (last_day, last_end)
        } else {
            (last_day + 1, 0)
        };

        let mut cursor = DayCursor {
            day,
            minute: start,
            day_minutes: rules.day_minutes,
            out,
        };
        cursor.activity(StopKind::Dropoff, DutyStatus::OnDuty, rules.dropoff_minutes);
    }
}

/// Validate input and simulate a trip under the default rule set
pub fn simulate_trip(total_distance_miles: f64, cycle_used_hours: f64) -> Result<Timeline> {
    let engine = HosEngine::new(HosRules::default())?;
    let params = TripParameters::new(total_distance_miles, cycle_used_hours, engine.rules())?;
    Ok(engine.simulate(&params))
}
