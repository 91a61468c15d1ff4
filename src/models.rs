//! Plan data model - snapshots of what the backend serves
//!
//! Everything here is plain data. Field names follow the backend's JSON
//! (snake_case), so records deserialize straight from API payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of routine scheduled on a day
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoutineType {
    #[default]
    Workout,
    /// Recovery day, shown on the schedule but never progressed
    Rest,
}

impl RoutineType {
    pub fn is_rest(&self) -> bool {
        matches!(self, RoutineType::Rest)
    }
}

/// Target for one exercise inside a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTarget {
    pub exercise_id: String,
    pub name: String,
    pub target_sets: u32,
    /// Week 1 reps
    pub target_reps: i32,
    /// Week 1 weight, kg
    pub target_weight: f64,
    /// Added per elapsed week, kg
    #[serde(default)]
    pub increment_weight: f64,
    /// Added per elapsed week
    #[serde(default)]
    pub increment_reps: i32,
}

/// Routine assigned to a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: String,
    pub name: String,
    /// Monday = 0 ... Sunday = 6, `None` = flexible
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub routine_type: RoutineType,
    /// Display order matters
    #[serde(default)]
    pub exercises: Vec<ExerciseTarget>,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
}

/// Multi-week training plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub duration_weeks: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub routines: Vec<Routine>,
}

/// One bar of an aggregated volume series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDataPoint {
    pub date: NaiveDate,
    pub label: String,
    pub value: f64,
}

/// Set as recorded during an active session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub exercise_id: String,
    pub set_number: u32,
    pub reps: i32,
    pub weight: f64,
    pub is_completed: bool,
}
