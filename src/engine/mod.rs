//! Engine module - pure plan and chart computations
//!
//! Features:
//! - Progressive overload projection per plan week
//! - Day-of-week scheduling and "done today" checks
//! - Adaptive bar chart layout per time period

pub mod chart_layout;
pub mod chart_window;
pub mod progression;

pub use chart_layout::{compute_layout, ChartLayout, Period};
pub use progression::{
    find_routine_for_day, is_routine_completed_today, project_exercise_target, project_value,
    ProjectedTarget,
};

use crate::models::{Plan, Routine};

/// One row of the week view
#[derive(Debug, Clone)]
pub struct DayCard<'a> {
    pub day_index: u8,
    pub day_name: &'static str,
    pub routine: Option<&'a Routine>,
    /// Exercise name and its projection, in routine order
    pub targets: Vec<(&'a str, ProjectedTarget)>,
}

impl DayCard<'_> {
    pub fn is_rest(&self) -> bool {
        self.routine.is_some_and(|r| r.routine_type.is_rest())
    }

    /// Lines as shown on the card
    pub fn lines(&self) -> Vec<String> {
        match self.routine {
            None => vec!["-".to_string()],
            Some(_) if self.is_rest() => vec!["Active recovery".to_string()],
            Some(_) if self.targets.is_empty() => vec!["No exercises yet".to_string()],
            Some(_) => self
                .targets
                .iter()
                .map(|(name, p)| format!("{}: {}", name, progression::format_target(p)))
                .collect(),
        }
    }
}

/// A plan projected to one of its weeks
pub struct PlanWeek<'a> {
    plan: &'a Plan,
    week: i32,
}

impl<'a> PlanWeek<'a> {
    /// Week is clamped to the plan's duration
    pub fn new(plan: &'a Plan, week: i32) -> Self {
        Self {
            plan,
            week: progression::clamp_week(week, plan.duration_weeks),
        }
    }

    pub fn week(&self) -> i32 {
        self.week
    }

    pub fn plan(&self) -> &'a Plan {
        self.plan
    }

    /// Monday to Sunday
    pub fn days(&self) -> Vec<DayCard<'a>> {
        (0..7u8)
            .map(|day_index| {
                let routine = find_routine_for_day(&self.plan.routines, day_index);
                let targets: Vec<(&'a str, ProjectedTarget)> = routine
                    .map(|r| {
                        progression::project_routine(r, self.week)
                            .into_iter()
                            .map(|(ex, p)| (ex.name.as_str(), p))
                            .collect()
                    })
                    .unwrap_or_default();

                DayCard {
                    day_index,
                    day_name: progression::day_name(day_index).unwrap_or("?"),
                    routine,
                    targets,
                }
            })
            .collect()
    }

    /// Routines without a fixed day
    pub fn flexible_routines(&self) -> Vec<&'a Routine> {
        self.plan
            .routines
            .iter()
            .filter(|r| r.day_of_week.is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseTarget, RoutineType};
    use chrono::NaiveDate;

    fn create_routine(id: &str, day: Option<u8>, routine_type: RoutineType) -> Routine {
        Routine {
            id: id.to_string(),
            name: id.to_string(),
            day_of_week: day,
            routine_type,
            exercises: vec![ExerciseTarget {
                exercise_id: "squat".to_string(),
                name: "Squat".to_string(),
                target_sets: 5,
                target_reps: 5,
                target_weight: 100.0,
                increment_weight: 2.5,
                increment_reps: 0,
            }],
            last_completed_at: None,
        }
    }

    fn create_plan() -> Plan {
        Plan {
            id: "p1".to_string(),
            name: "5x5".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            duration_weeks: 6,
            is_active: true,
            routines: vec![
                create_routine("legs", Some(0), RoutineType::Workout),
                create_routine("recovery", Some(3), RoutineType::Rest),
                create_routine("extra", None, RoutineType::Workout),
            ],
        }
    }

    #[test]
    fn test_plan_week_clamps() {
        let plan = create_plan();
        assert_eq!(PlanWeek::new(&plan, 0).week(), 1);
        assert_eq!(PlanWeek::new(&plan, 9).week(), 6);
    }

    #[test]
    fn test_days_cover_the_week() {
        let plan = create_plan();
        let days = PlanWeek::new(&plan, 3).days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day_name, "Mon");
        assert_eq!(days[0].routine.map(|r| r.id.as_str()), Some("legs"));
        assert_eq!(days[0].targets[0].1.weight, 105.0);
        assert!(days[1].routine.is_none());
        assert_eq!(days[1].lines(), vec!["-"]);
    }

    #[test]
    fn test_rest_day_card() {
        let plan = create_plan();
        let days = PlanWeek::new(&plan, 4).days();
        assert!(days[3].is_rest());
        assert_eq!(days[3].targets[0].1.weight, 100.0);
        assert_eq!(days[3].lines(), vec!["Active recovery"]);
    }

    #[test]
    fn test_card_lines() {
        let plan = create_plan();
        let days = PlanWeek::new(&plan, 1).days();
        assert_eq!(days[0].lines(), vec!["Squat: 5 x 5 @ 100kg"]);
    }

    #[test]
    fn test_flexible_routines() {
        let plan = create_plan();
        let week = PlanWeek::new(&plan, 1);
        let flexible = week.flexible_routines();
        assert_eq!(flexible.len(), 1);
        assert_eq!(flexible[0].id, "extra");
    }
}
