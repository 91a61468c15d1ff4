//! Adaptive bar chart layout
//!
//! Picks bar width and spacing for a volume series so the chart fits the
//! available width when it can and scrolls when it can't. Each period has a
//! fixed profile; no per-screen tuning.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

/// Margin before the first and after the last bar
pub const EDGE_SPACING: f64 = 12.0;
/// Bars never get thinner than this
pub const MIN_BAR_WIDTH: f64 = 5.0;
/// Gaps never get wider than this
pub const MAX_SPACING: f64 = 18.0;

/// Coarse time range of a chart
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    /// Dashboard and CLI default
    #[default]
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    AllTime,
}

/// Layout tuning for one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodProfile {
    pub visible_bars_before_scroll: usize,
    /// Share of a bar slot taken by the bar itself
    pub target_bar_ratio: f64,
    pub max_bar_width: f64,
    pub min_spacing: f64,
    pub show_top_labels_up_to: usize,
}

impl Period {
    pub const ALL_PERIODS: [Period; 5] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::AllTime,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::AllTime => "ALL",
        }
    }

    pub fn profile(&self) -> PeriodProfile {
        match self {
            // Daily bars
            Period::OneMonth => PeriodProfile {
                visible_bars_before_scroll: 31,
                target_bar_ratio: 0.6,
                max_bar_width: 14.0,
                min_spacing: 4.0,
                show_top_labels_up_to: 16,
            },
            // Weekly bars
            Period::ThreeMonths => PeriodProfile {
                visible_bars_before_scroll: 13,
                target_bar_ratio: 0.65,
                max_bar_width: 22.0,
                min_spacing: 6.0,
                show_top_labels_up_to: 16,
            },
            Period::SixMonths => PeriodProfile {
                visible_bars_before_scroll: 26,
                target_bar_ratio: 0.62,
                max_bar_width: 16.0,
                min_spacing: 4.0,
                show_top_labels_up_to: 13,
            },
            // Monthly bars
            Period::OneYear => PeriodProfile {
                visible_bars_before_scroll: 12,
                target_bar_ratio: 0.65,
                max_bar_width: 24.0,
                min_spacing: 6.0,
                show_top_labels_up_to: 14,
            },
            Period::AllTime => PeriodProfile {
                visible_bars_before_scroll: 24,
                target_bar_ratio: 0.6,
                max_bar_width: 18.0,
                min_spacing: 4.0,
                show_top_labels_up_to: 0,
            },
        }
    }

    /// Next period in selector order, wrapping around
    pub fn next(&self) -> Period {
        let idx = Self::ALL_PERIODS.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL_PERIODS[(idx + 1) % Self::ALL_PERIODS.len()]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match Period::ALL_PERIODS.iter().find(|p| p.code() == upper) {
            Some(period) => Ok(*period),
            None => bail!("unknown period '{}', expected one of 1M, 3M, 6M, 1Y, ALL", s),
        }
    }
}

/// Geometry for one chart render
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartLayout {
    pub bar_width: f64,
    pub spacing: f64,
    pub initial_spacing: f64,
    pub end_spacing: f64,
    pub is_scrollable: bool,
    /// `None` = natural content width inside a horizontal scroll view
    pub chart_width: Option<f64>,
    pub show_labels: bool,
    pub x_axis_label_width: f64,
}

/// Compute bar geometry for `data_count` bars in `available_width`.
///
/// `available_width` is the chart body only; axis columns are already
/// subtracted by the caller.
pub fn compute_layout(data_count: usize, period: Period, available_width: f64) -> ChartLayout {
    let profile = period.profile();

    if data_count == 0 {
        return ChartLayout {
            bar_width: MIN_BAR_WIDTH,
            spacing: profile.min_spacing,
            initial_spacing: EDGE_SPACING,
            end_spacing: EDGE_SPACING,
            is_scrollable: false,
            chart_width: Some(available_width.max(0.0)),
            show_labels: false,
            x_axis_label_width: x_axis_label_width(0, false),
        };
    }

    let visible_bars = data_count.min(profile.visible_bars_before_scroll).max(1);
    let usable_width = available_width - EDGE_SPACING * 2.0;
    let slot_width = usable_width / visible_bars as f64;

    let bar_width = (slot_width * profile.target_bar_ratio)
        .round()
        .clamp(MIN_BAR_WIDTH, profile.max_bar_width);
    let spacing = (slot_width - bar_width)
        .round()
        .clamp(profile.min_spacing, MAX_SPACING);

    let total_content_width = data_count as f64 * (bar_width + spacing) + EDGE_SPACING * 2.0;
    let is_scrollable =
        data_count > profile.visible_bars_before_scroll && total_content_width > available_width;

    let chart_width = if is_scrollable {
        None
    } else {
        Some(available_width.max(0.0))
    };

    ChartLayout {
        bar_width,
        spacing,
        initial_spacing: EDGE_SPACING,
        end_spacing: EDGE_SPACING,
        is_scrollable,
        chart_width,
        show_labels: show_top_labels(data_count, period, &profile, is_scrollable),
        x_axis_label_width: x_axis_label_width(data_count, is_scrollable),
    }
}

/// Label box width by density tier
fn x_axis_label_width(data_count: usize, is_scrollable: bool) -> f64 {
    if is_scrollable {
        return 24.0;
    }
    match data_count {
        0..=12 => 44.0,
        13..=20 => 36.0,
        21..=31 => 30.0,
        _ => 28.0,
    }
}

fn show_top_labels(
    data_count: usize,
    period: Period,
    profile: &PeriodProfile,
    is_scrollable: bool,
) -> bool {
    if period == Period::AllTime {
        return false;
    }
    let limit = if is_scrollable {
        profile.show_top_labels_up_to.min(10)
    } else {
        profile.show_top_labels_up_to
    };
    data_count <= limit
}

/// Show every Nth x-axis label to keep them from overlapping
pub fn x_axis_label_step(period: Period, data_count: usize) -> usize {
    match period {
        Period::OneMonth => 5,
        Period::ThreeMonths => 2,
        Period::SixMonths => 3,
        Period::OneYear => 1,
        Period::AllTime if data_count > 24 => 2,
        Period::AllTime => 1,
    }
}

/// Whether the x label at `index` is drawn (the last one always is)
pub fn shows_x_label(index: usize, step: usize, data_count: usize) -> bool {
    index % step.max(1) == 0 || index + 1 == data_count
}

/// Y-axis ceiling with headroom for top labels
pub fn y_axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        (max * 1.35).ceil()
    } else {
        100.0
    }
}

/// 1.2M, 3.4k, 950
pub fn format_compact_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{}", value.round())
    }
}
