//! Store module - read-only JSON snapshot of backend data

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use chrono::NaiveDate;

use crate::engine::chart_window::in_window;
use crate::engine::Period;
use crate::models::{ChartDataPoint, LoggedSet, Plan, Routine};

/// Plans and volume series as fetched from the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub plans: Vec<Plan>,
    /// Volume series keyed by period code
    #[serde(default)]
    pub volume: BTreeMap<Period, Vec<ChartDataPoint>>,
}

impl Snapshot {
    /// Load a snapshot file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        info!(
            "Snapshot {} loaded: {} plans, {} series",
            path.display(),
            snapshot.plans.len(),
            snapshot.volume.len()
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        snapshot.check();
        Ok(snapshot)
    }

    /// Log data the UI should have rejected. Nothing is altered.
    fn check(&self) {
        for plan in &self.plans {
            if !(1..=52).contains(&plan.duration_weeks) {
                warn!("Plan {} lasts {} weeks, outside 1-52", plan.id, plan.duration_weeks);
            }

            let mut seen = HashSet::new();
            for day in plan.routines.iter().filter_map(|r| r.day_of_week) {
                if day > 6 {
                    warn!("Plan {} has a routine on day {}, out of range", plan.id, day);
                } else if !seen.insert(day) {
                    warn!("Plan {} has several routines on day {}", plan.id, day);
                }
            }
        }
    }

    /// First active plan, else the first plan
    pub fn active_plan(&self) -> Option<&Plan> {
        self.plans
            .iter()
            .find(|p| p.is_active)
            .or_else(|| self.plans.first())
    }

    pub fn plan(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Plan by id, or the active one when no id is given
    pub fn select_plan(&self, id: Option<&str>) -> Option<&Plan> {
        match id {
            Some(id) => self.plan(id),
            None => self.active_plan(),
        }
    }

    /// Routine and its plan, searched across all plans
    pub fn find_routine(&self, routine_id: &str) -> Option<(&Plan, &Routine)> {
        self.plans.iter().find_map(|plan| {
            plan.routines
                .iter()
                .find(|r| r.id == routine_id)
                .map(|r| (plan, r))
        })
    }

    /// Routines of active plans, the home screen list
    pub fn active_routines(&self) -> Vec<&Routine> {
        self.plans
            .iter()
            .filter(|p| p.is_active)
            .flat_map(|p| p.routines.iter())
            .collect()
    }

    pub fn volume_series(&self, period: Period) -> &[ChartDataPoint] {
        let series = self.volume.get(&period).map(Vec::as_slice).unwrap_or_default();
        debug!("Volume series {}: {} points", period, series.len());
        series
    }

    /// Points of a series that fall in the window ending at `anchor`
    pub fn volume_window(&self, period: Period, anchor: NaiveDate) -> Vec<&ChartDataPoint> {
        self.volume_series(period)
            .iter()
            .filter(|point| in_window(point.date, anchor, period))
            .collect()
    }
}

/// Read the sets logged during a session, a JSON array of `LoggedSet`
pub fn load_session(path: impl AsRef<Path>) -> Result<Vec<LoggedSet>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session {}", path.display()))?;
    let sets: Vec<LoggedSet> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse session {}", path.display()))?;
    debug!("Session {}: {} sets", path.display(), sets.len());
    Ok(sets)
}
