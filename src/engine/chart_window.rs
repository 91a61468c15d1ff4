//! Analytics windows anchored to a calendar date
//!
//! Month-based periods anchor to the first of the month, week-based ones to
//! the Monday of the ISO week.

use chrono::{Datelike, Months, NaiveDate, TimeDelta};

use super::chart_layout::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Snap a date to the start of its window
pub fn normalize_anchor(date: NaiveDate, period: Period) -> NaiveDate {
    match period {
        Period::OneMonth | Period::OneYear | Period::AllTime => date.with_day(1).unwrap_or(date),
        Period::ThreeMonths | Period::SixMonths => {
            let days_from_monday = i64::from(date.weekday().num_days_from_monday());
            date - TimeDelta::days(days_from_monday)
        }
    }
}

/// Step the window one page back or forward.
///
/// Returns `None` when the step would pass the window holding `latest`.
pub fn shift_anchor(
    anchor: NaiveDate,
    period: Period,
    direction: Direction,
    latest: NaiveDate,
) -> Option<NaiveDate> {
    let base = normalize_anchor(anchor, period);

    let shifted = match direction {
        Direction::Prev => step_back(base, period),
        Direction::Next => step_forward(base, period),
    }?;

    if shifted > normalize_anchor(latest, period) {
        return None;
    }
    Some(shifted)
}

fn step_back(base: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::OneMonth => base.checked_sub_months(Months::new(1)),
        Period::ThreeMonths => base.checked_sub_signed(TimeDelta::weeks(13)),
        Period::SixMonths => base.checked_sub_signed(TimeDelta::weeks(26)),
        Period::OneYear | Period::AllTime => base.checked_sub_months(Months::new(12)),
    }
}

fn step_forward(base: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::OneMonth => base.checked_add_months(Months::new(1)),
        Period::ThreeMonths => base.checked_add_signed(TimeDelta::weeks(13)),
        Period::SixMonths => base.checked_add_signed(TimeDelta::weeks(26)),
        Period::OneYear | Period::AllTime => base.checked_add_months(Months::new(12)),
    }
}

/// Dates covered by the window ending at `anchor`, as `[start, end)`.
///
/// Month windows cover the anchor's month (1M) or the twelve months up to it
/// (1Y). Week windows cover 13 or 26 weeks up to the anchor's week. ALL has
/// no start.
pub fn window_range(anchor: NaiveDate, period: Period) -> (Option<NaiveDate>, NaiveDate) {
    let base = normalize_anchor(anchor, period);
    let end = step_after(base, period);
    let start = match period {
        Period::OneMonth => Some(base),
        Period::ThreeMonths => base.checked_sub_signed(TimeDelta::weeks(12)),
        Period::SixMonths => base.checked_sub_signed(TimeDelta::weeks(25)),
        Period::OneYear => base.checked_sub_months(Months::new(11)),
        Period::AllTime => None,
    };
    (start, end)
}

/// First day after the anchor's month or week
fn step_after(base: NaiveDate, period: Period) -> NaiveDate {
    let next = match period {
        Period::ThreeMonths | Period::SixMonths => base.checked_add_signed(TimeDelta::weeks(1)),
        Period::OneMonth | Period::OneYear | Period::AllTime => {
            base.checked_add_months(Months::new(1))
        }
    };
    next.unwrap_or(NaiveDate::MAX)
}

/// Whether `date` falls inside the window ending at `anchor`
pub fn in_window(date: NaiveDate, anchor: NaiveDate, period: Period) -> bool {
    let (start, end) = window_range(anchor, period);
    start.is_none_or(|s| date >= s) && date < end
}

/// Whether no newer window exists
pub fn is_latest_window(anchor: NaiveDate, period: Period, latest: NaiveDate) -> bool {
    normalize_anchor(anchor, period) >= normalize_anchor(latest, period)
}

/// Header text for the window
pub fn window_label(anchor: NaiveDate, period: Period) -> String {
    match period {
        Period::OneMonth => anchor.format("%B %Y").to_string(),
        Period::ThreeMonths => format!("13 weeks ending {}", anchor.format("%d %b %Y")),
        Period::SixMonths => format!("26 weeks ending {}", anchor.format("%d %b %Y")),
        Period::OneYear => format!("12 months ending {}", anchor.format("%b %Y")),
        Period::AllTime => format!("All time to {}", anchor.format("%b %Y")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_month_periods() {
        for period in [Period::OneMonth, Period::OneYear, Period::AllTime] {
            assert_eq!(normalize_anchor(date(2025, 3, 19), period), date(2025, 3, 1));
        }
    }

    #[test]
    fn test_normalize_week_periods() {
        // 2025-03-19 is a Wednesday
        assert_eq!(normalize_anchor(date(2025, 3, 19), Period::ThreeMonths), date(2025, 3, 17));
        assert_eq!(normalize_anchor(date(2025, 3, 17), Period::SixMonths), date(2025, 3, 17));
        // Sunday goes back six days
        assert_eq!(normalize_anchor(date(2025, 3, 23), Period::ThreeMonths), date(2025, 3, 17));
    }

    #[test]
    fn test_shift_back() {
        let latest = date(2025, 3, 19);
        assert_eq!(
            shift_anchor(date(2025, 3, 19), Period::OneMonth, Direction::Prev, latest),
            Some(date(2025, 2, 1))
        );
        assert_eq!(
            shift_anchor(date(2025, 3, 17), Period::ThreeMonths, Direction::Prev, latest),
            Some(date(2024, 12, 16))
        );
        assert_eq!(
            shift_anchor(date(2025, 3, 1), Period::OneYear, Direction::Prev, latest),
            Some(date(2024, 3, 1))
        );
    }

    #[test]
    fn test_shift_forward_stops_at_latest() {
        let latest = date(2025, 3, 19);
        assert_eq!(shift_anchor(date(2025, 3, 5), Period::OneMonth, Direction::Next, latest), None);
        assert_eq!(
            shift_anchor(date(2025, 1, 10), Period::OneMonth, Direction::Next, latest),
            Some(date(2025, 2, 1))
        );
        assert_eq!(
            shift_anchor(date(2025, 1, 1), Period::SixMonths, Direction::Next, latest),
            None
        );
    }

    #[test]
    fn test_is_latest_window() {
        let latest = date(2025, 3, 19);
        assert!(is_latest_window(date(2025, 3, 2), Period::OneMonth, latest));
        assert!(!is_latest_window(date(2025, 2, 28), Period::OneMonth, latest));
    }

    #[test]
    fn test_window_range() {
        assert_eq!(
            window_range(date(2025, 3, 19), Period::OneMonth),
            (Some(date(2025, 3, 1)), date(2025, 4, 1))
        );
        // 13 weeks up to and including the week of 2025-03-17
        assert_eq!(
            window_range(date(2025, 3, 19), Period::ThreeMonths),
            (Some(date(2024, 12, 23)), date(2025, 3, 24))
        );
        assert_eq!(
            window_range(date(2025, 3, 19), Period::OneYear),
            (Some(date(2024, 4, 1)), date(2025, 4, 1))
        );
        assert_eq!(window_range(date(2025, 3, 19), Period::AllTime).0, None);
    }

    #[test]
    fn test_in_window() {
        let anchor = date(2025, 3, 19);
        assert!(in_window(date(2025, 3, 31), anchor, Period::OneMonth));
        assert!(!in_window(date(2025, 4, 1), anchor, Period::OneMonth));
        assert!(!in_window(date(2025, 2, 28), anchor, Period::OneMonth));
        assert!(in_window(date(2019, 1, 1), anchor, Period::AllTime));
    }

    #[test]
    fn test_paging_back_stays_before_latest() {
        let latest = date(2025, 3, 19);
        let mut anchor = latest;
        for _ in 0..5 {
            anchor = shift_anchor(anchor, Period::SixMonths, Direction::Prev, latest).unwrap();
            assert!(!is_latest_window(anchor, Period::SixMonths, latest));
        }
        // and forward again until the latest window
        let mut steps = 0;
        while let Some(next) = shift_anchor(anchor, Period::SixMonths, Direction::Next, latest) {
            anchor = next;
            steps += 1;
        }
        assert_eq!(steps, 5);
    }

    #[test]
    fn test_window_labels() {
        assert_eq!(window_label(date(2025, 3, 1), Period::OneMonth), "March 2025");
        assert_eq!(
            window_label(date(2025, 3, 17), Period::ThreeMonths),
            "13 weeks ending 17 Mar 2025"
        );
        assert_eq!(window_label(date(2025, 3, 1), Period::OneYear), "12 months ending Mar 2025");
        assert_eq!(window_label(date(2025, 3, 1), Period::AllTime), "All time to Mar 2025");
    }
}
