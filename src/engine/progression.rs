//! Progressive overload projections
//!
//! A routine's targets are stored as week 1 values plus a per-week increment.
//! Week N shows `base + increment * (N - 1)`. Rest routines never progress.

use std::ops::{Add, Mul};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::warn;

use crate::models::{ExerciseTarget, LoggedSet, Plan, Routine, RoutineType};

/// Short labels, Monday first
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Targets for one exercise in a given week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedTarget {
    pub sets: u32,
    pub reps: i32,
    pub weight: f64,
}

/// One prefilled set of an active session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetTarget {
    pub set_number: u32,
    pub target_reps: i32,
    pub target_weight: f64,
}

/// `base + increment * weeks_elapsed`, applied literally.
///
/// Negative `weeks_elapsed` is not floored; callers clamp the week first.
pub fn project_value<T>(base: T, increment: T, weeks_elapsed: i32) -> T
where
    T: Add<Output = T> + Mul<Output = T> + From<i32>,
{
    base + increment * T::from(weeks_elapsed)
}

/// Project an exercise target to `current_week` (1-indexed).
///
/// Sets never progress. Rest routines ignore stored increments entirely.
/// Weeks below 1 are treated as week 1.
pub fn project_exercise_target(
    target: &ExerciseTarget,
    routine_type: RoutineType,
    current_week: i32,
) -> ProjectedTarget {
    let weeks_elapsed = if routine_type.is_rest() {
        0
    } else {
        current_week.max(1) - 1
    };

    ProjectedTarget {
        sets: target.target_sets,
        reps: project_value(target.target_reps, target.increment_reps, weeks_elapsed),
        weight: project_value(target.target_weight, target.increment_weight, weeks_elapsed),
    }
}

/// Project every exercise of a routine, keeping display order
pub fn project_routine(
    routine: &Routine,
    current_week: i32,
) -> Vec<(&ExerciseTarget, ProjectedTarget)> {
    routine
        .exercises
        .iter()
        .map(|ex| (ex, project_exercise_target(ex, routine.routine_type, current_week)))
        .collect()
}

/// Whether `last_completed_at` falls on the same calendar day as `now` in `tz`
pub fn is_completed_on_same_day<Tz: TimeZone>(
    last_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> bool {
    last_completed_at.is_some_and(|at| {
        at.with_timezone(tz).date_naive() == now.with_timezone(tz).date_naive()
    })
}

/// Whether a routine was finished today, on the local wall-clock calendar
pub fn is_routine_completed_today(
    last_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_completed_on_same_day(last_completed_at, now, &Local)
}

/// Routine scheduled on `day_index` (Monday = 0).
///
/// Plans should hold at most one routine per day. If they don't, the first
/// one in plan order wins and the conflict is logged.
pub fn find_routine_for_day(routines: &[Routine], day_index: u8) -> Option<&Routine> {
    let mut matches = routines.iter().filter(|r| r.day_of_week == Some(day_index));
    let first = matches.next()?;

    if let Some(other) = matches.next() {
        warn!(
            "Routines {} and {} share day {}, using {}",
            first.id, other.id, day_index, first.id
        );
    }

    Some(first)
}

/// Keep a week inside `[1, duration_weeks]`
pub fn clamp_week(week: i32, duration_weeks: u32) -> i32 {
    let last = i32::try_from(duration_weeks.max(1)).unwrap_or(i32::MAX);
    week.clamp(1, last)
}

/// Plan week (1-indexed) that contains `today`
pub fn week_of_plan(plan: &Plan, today: NaiveDate) -> i32 {
    let days = (today - plan.start_date).num_days();
    if days < 0 {
        return 1;
    }
    let week = i32::try_from(days / 7 + 1).unwrap_or(i32::MAX);
    clamp_week(week, plan.duration_weeks)
}

/// Week to show: the requested one, else the week containing `today`,
/// always kept inside the plan
pub fn resolve_week(plan: &Plan, requested: Option<i32>, today: NaiveDate) -> i32 {
    let week = requested.unwrap_or_else(|| week_of_plan(plan, today));
    clamp_week(week, plan.duration_weeks)
}

/// Why a routine can't be started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartBlock {
    RestDay,
    CompletedToday,
}

impl StartBlock {
    pub fn message(&self) -> &'static str {
        match self {
            StartBlock::RestDay => "rest days have no session to start",
            StartBlock::CompletedToday => "already completed today",
        }
    }
}

/// Rest routines and routines finished today (in `tz`) can't be started
pub fn start_block_in<Tz: TimeZone>(
    routine: &Routine,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Option<StartBlock> {
    if routine.routine_type.is_rest() {
        Some(StartBlock::RestDay)
    } else if is_completed_on_same_day(routine.last_completed_at, now, tz) {
        Some(StartBlock::CompletedToday)
    } else {
        None
    }
}

/// Same as [`start_block_in`] on the local calendar
pub fn start_block(routine: &Routine, now: DateTime<Utc>) -> Option<StartBlock> {
    start_block_in(routine, now, &Local)
}

/// Monday = 0 ... Sunday = 6
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_monday is always 0..=6
    date.weekday().num_days_from_monday() as u8
}

pub fn day_name(index: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(index)).copied()
}

/// Prefilled sets for an active session of this exercise
pub fn session_sets(
    target: &ExerciseTarget,
    routine_type: RoutineType,
    current_week: i32,
) -> Vec<SetTarget> {
    let projected = project_exercise_target(target, routine_type, current_week);
    (1..=projected.sets)
        .map(|set_number| SetTarget {
            set_number,
            target_reps: projected.reps,
            target_weight: projected.weight,
        })
        .collect()
}

/// Day card line, e.g. `3 x 8 @ 62.5kg`
pub fn format_target(projected: &ProjectedTarget) -> String {
    format!(
        "{} x {} @ {}kg",
        projected.sets,
        projected.reps,
        format_weight(projected.weight)
    )
}

/// Weight without trailing zeros: 70, 62.5, 61.25
pub fn format_weight(weight: f64) -> String {
    let formatted = format!("{:.2}", weight);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    // Tiny negatives round to "-0"
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Volume (reps x weight) of the completed sets of a session
pub fn session_volume(sets: &[LoggedSet]) -> f64 {
    sets.iter()
        .filter(|s| s.is_completed)
        .map(|s| f64::from(s.reps) * s.weight)
        .sum()
}
