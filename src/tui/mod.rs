//! TUI module - Plan week view and volume chart with ratatui

use std::io::{stdout, Stdout};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{info, warn};

use crate::engine::chart_layout::{self, format_compact_number, shows_x_label, x_axis_label_step};
use crate::engine::chart_window::{self, is_latest_window, normalize_anchor, window_label};
use crate::engine::progression::{
    clamp_week, is_routine_completed_today, resolve_week, weekday_index,
};
use crate::engine::{compute_layout, Period, PlanWeek};
use crate::store::Snapshot;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Layout points per terminal column
const POINTS_PER_CELL: f64 = 6.0;

/// App state for TUI
pub struct App {
    data_path: PathBuf,
    snapshot: Snapshot,
    plan_idx: usize,
    week: i32,
    period: Period,
    /// Any date in the chart window, today for the latest one
    anchor: NaiveDate,
    should_quit: bool,
}

impl App {
    pub fn new(data_path: PathBuf, period: Period) -> Result<Self> {
        let snapshot = Snapshot::open(&data_path)?;
        let plan_idx = snapshot
            .plans
            .iter()
            .position(|p| p.is_active)
            .unwrap_or(0);
        let mut app = Self {
            data_path,
            snapshot,
            plan_idx,
            week: 1,
            period,
            anchor: Local::now().date_naive(),
            should_quit: false,
        };
        app.reset_week();
        Ok(app)
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Re-read the snapshot file. On failure the current data stays on screen.
    fn reload(&mut self) -> bool {
        match Snapshot::open(&self.data_path) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                if self.plan_idx >= self.snapshot.plans.len() {
                    self.plan_idx = 0;
                }
                self.step_week(0);
                info!("Snapshot {} reloaded", self.data_path.display());
                true
            }
            Err(e) => {
                warn!("Reload failed, keeping previous snapshot: {:#}", e);
                false
            }
        }
    }

    /// Page the chart window, never past the one holding `latest`
    fn page_window(&mut self, direction: chart_window::Direction, latest: NaiveDate) {
        let shifted = chart_window::shift_anchor(self.anchor, self.period, direction, latest);
        if let Some(anchor) = shifted {
            self.anchor = anchor;
        }
    }

    fn reset_week(&mut self) {
        let today = Local::now().date_naive();
        self.week = self
            .snapshot
            .plans
            .get(self.plan_idx)
            .map(|p| resolve_week(p, None, today))
            .unwrap_or(1);
    }

    fn step_week(&mut self, delta: i32) {
        if let Some(plan) = self.snapshot.plans.get(self.plan_idx) {
            self.week = clamp_week(self.week + delta, plan.duration_weeks);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(12),
                Constraint::Length(3),
            ])
            .split(area);

        let Some(plan) = self.snapshot.plans.get(self.plan_idx) else {
            let empty = Paragraph::new("No plans in snapshot")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        };
        let plan_week = PlanWeek::new(plan, self.week);

        // Header
        let header = Paragraph::new(format!(
            "{} - Week {} / {}",
            plan.name,
            plan_week.week(),
            plan.duration_weeks
        ))
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Week table
        let now = Utc::now();
        let today_idx = weekday_index(Local::now().date_naive());
        let rows: Vec<Row> = plan_week
            .days()
            .iter()
            .map(|day| {
                let name = day.routine.map(|r| r.name.clone()).unwrap_or_default();
                let done = day
                    .routine
                    .is_some_and(|r| is_routine_completed_today(r.last_completed_at, now));
                let lines = day.lines();
                let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).max(1);
                let mut style = Style::default();
                if day.is_rest() {
                    style = style.fg(Color::Green);
                }
                if day.day_index == today_idx {
                    style = style.bold();
                }
                Row::new(vec![
                    Cell::from(day.day_name),
                    Cell::from(name),
                    Cell::from(lines.join("\n")),
                    Cell::from(if done { "done" } else { "" }),
                ])
                .height(height)
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(16),
                Constraint::Min(30),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(vec!["Day", "Routine", "Targets", "Today"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Week"));
        frame.render_widget(table, chunks[1]);

        self.render_chart(frame, chunks[2]);

        // Footer
        let footer = Paragraph::new(
            "q: quit | ←/→: week | t: today | p: period | [/]: window | tab: plan | r: reload",
        )
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let series = self.snapshot.volume_window(self.period, self.anchor);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.chart_title(Local::now().date_naive()));

        if series.is_empty() {
            let empty = Paragraph::new("No data for this period.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let inner_width = f64::from(area.width.saturating_sub(2));
        let layout = compute_layout(series.len(), self.period, inner_width * POINTS_PER_CELL);
        let bar_cells = to_cells(layout.bar_width).max(1);
        let gap_cells = to_cells(layout.spacing);

        // Scroll to the newest bars when the series does not fit
        let visible = if layout.is_scrollable {
            let per_bar = usize::from(bar_cells + gap_cells).max(1);
            (inner_width as usize / per_bar).max(1).min(series.len())
        } else {
            series.len()
        };
        let offset = series.len() - visible;
        let step = x_axis_label_step(self.period, series.len());

        let bars: Vec<Bar> = series
            .iter()
            .enumerate()
            .skip(offset)
            .map(|(idx, point)| {
                let label = if shows_x_label(idx, step, series.len()) {
                    point.label.clone()
                } else {
                    String::new()
                };
                let text = if layout.show_labels {
                    format_compact_number(point.value)
                } else {
                    String::new()
                };
                Bar::default()
                    .value(point.value.max(0.0).round() as u64)
                    .label(Line::from(label))
                    .text_value(text)
            })
            .collect();

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let chart = BarChart::default()
            .block(block)
            .bar_width(bar_cells)
            .bar_gap(gap_cells)
            .max(chart_layout::y_axis_max(&values) as u64)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn chart_title(&self, today: NaiveDate) -> String {
        let label = window_label(normalize_anchor(self.anchor, self.period), self.period);
        if is_latest_window(self.anchor, self.period, today) {
            format!("Volume {} - {} (latest)", self.period, label)
        } else {
            format!("Volume {} - {}", self.period, label)
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Left => self.step_week(-1),
                        KeyCode::Right => self.step_week(1),
                        KeyCode::Char('t') => self.reset_week(),
                        KeyCode::Char('p') => self.period = self.period.next(),
                        KeyCode::Char('[') => self.page_window(
                            chart_window::Direction::Prev,
                            Local::now().date_naive(),
                        ),
                        KeyCode::Char(']') => self.page_window(
                            chart_window::Direction::Next,
                            Local::now().date_naive(),
                        ),
                        KeyCode::Tab if !self.snapshot.plans.is_empty() => {
                            self.plan_idx = (self.plan_idx + 1) % self.snapshot.plans.len();
                            self.reset_week();
                        }
                        KeyCode::Char('r') => {
                            self.reload();
                        }
                        _ => {}
                    }
                }
        Ok(())
    }
}

/// Layout points to whole terminal columns
fn to_cells(points: f64) -> u16 {
    (points / POINTS_PER_CELL).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "plans": [{
            "id": "cur",
            "name": "Current block",
            "start_date": "2025-03-03",
            "duration_weeks": 8,
            "is_active": true,
            "routines": [{"id": "push", "name": "Push", "day_of_week": 0}]
        }],
        "volume": {
            "3M": [
                {"date": "2025-03-03", "label": "W10", "value": 5400.0},
                {"date": "2025-03-10", "label": "W11", "value": 6100.0}
            ]
        }
    }"#;

    fn app_from(file: &tempfile::NamedTempFile) -> App {
        App::new(file.path().to_path_buf(), Period::ThreeMonths).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reload_failure_keeps_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        let mut app = app_from(&file);

        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(!app.reload());
        assert_eq!(app.snapshot.plans.len(), 1);
        assert_eq!(app.snapshot.plans[0].id, "cur");
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        let mut app = app_from(&file);

        std::fs::write(file.path(), r#"{"plans": []}"#).unwrap();
        assert!(app.reload());
        assert!(app.snapshot.plans.is_empty());
        assert_eq!(app.plan_idx, 0);
    }

    #[test]
    fn test_page_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        let mut app = app_from(&file);
        let latest = date(2025, 3, 12);
        app.anchor = latest;

        // Already latest, next is a no-op
        app.page_window(chart_window::Direction::Next, latest);
        assert_eq!(app.anchor, latest);
        assert_eq!(
            app.chart_title(latest),
            "Volume 3M - 13 weeks ending 10 Mar 2025 (latest)"
        );

        app.page_window(chart_window::Direction::Prev, latest);
        assert_eq!(app.anchor, date(2024, 12, 9));
        assert_eq!(app.chart_title(latest), "Volume 3M - 13 weeks ending 09 Dec 2024");
        assert!(app.snapshot.volume_window(app.period, app.anchor).is_empty());

        app.page_window(chart_window::Direction::Next, latest);
        assert_eq!(app.anchor, date(2025, 3, 10));
        assert_eq!(app.snapshot.volume_window(app.period, app.anchor).len(), 2);
    }

    #[test]
    fn test_to_cells() {
        assert_eq!(to_cells(0.0), 0);
        assert_eq!(to_cells(12.0), 2);
        assert_eq!(to_cells(14.0), 2);
        assert_eq!(to_cells(-5.0), 0);
    }
}
