//! gymplan - Multi-week gym plan tracker
//!
//! Projects progressive overload targets for any plan week and lays out
//! volume charts.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;

use gymplan::engine::chart_layout::{format_compact_number, x_axis_label_step, y_axis_max};
use gymplan::engine::chart_window::{is_latest_window, normalize_anchor, window_label};
use gymplan::engine::progression::{
    day_name, format_weight, is_routine_completed_today, resolve_week, session_sets,
    session_volume, start_block, weekday_index,
};
use gymplan::engine::{compute_layout, find_routine_for_day, Period, PlanWeek};
use gymplan::store::{self, Snapshot};
use gymplan::tui::App;

/// Chart body width used when none is given (phone screen minus padding)
const DEFAULT_CHART_WIDTH: &str = "342";

#[derive(Parser)]
#[command(name = "gymplan")]
#[command(author, version, about = "Multi-week gym plan tracker")]
struct Cli {
    /// Snapshot file with plans and volume series
    #[arg(short, long, global = true, env = "GYMPLAN_DATA", default_value = "gymplan.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui {
        /// Chart period (1M, 3M, 6M, 1Y, ALL)
        #[arg(short, long, default_value_t)]
        period: Period,
    },

    /// Show a plan week with projected targets
    Week {
        /// Plan week, defaults to the week containing today
        #[arg(short, long)]
        week: Option<i32>,

        /// Plan id, defaults to the active plan
        #[arg(long)]
        plan: Option<String>,
    },

    /// List routines and whether they were done today
    Today,

    /// Preview the sets of a workout session.
    ///
    /// Rest routines and routines already completed today are refused.
    Start {
        /// Routine id
        routine: String,

        /// Plan week, defaults to the week containing today
        #[arg(short, long)]
        week: Option<i32>,
    },

    /// Compute chart layout for a bar count
    Layout {
        /// Number of bars
        count: usize,

        #[arg(short, long, default_value_t)]
        period: Period,

        /// Chart body width
        #[arg(short, long, default_value = DEFAULT_CHART_WIDTH)]
        width: f64,
    },

    /// Lay out the snapshot's volume chart
    Chart {
        #[arg(short, long, default_value_t)]
        period: Period,

        /// Chart body width
        #[arg(short, long, default_value = DEFAULT_CHART_WIDTH)]
        width: f64,

        /// Any date in the window to show (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        anchor: Option<NaiveDate>,
    },

    /// Total volume of a logged session file
    Volume {
        /// JSON array of logged sets
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Starting with snapshot {}", cli.data.display());

    match cli.command {
        Some(Commands::Tui { period }) => {
            let mut app = App::new(cli.data, period)?;
            app.run()?;
        }

        Some(Commands::Week { week, plan }) => {
            let snapshot = Snapshot::open(&cli.data)?;
            let plan = snapshot
                .select_plan(plan.as_deref())
                .context("No matching plan in snapshot")?;
            let week = resolve_week(plan, week, Local::now().date_naive());
            let plan_week = PlanWeek::new(plan, week);

            println!("{} - week {} of {}", plan.name, plan_week.week(), plan.duration_weeks);
            println!("{:-<60}", "");
            for day in plan_week.days() {
                let routine = day.routine.map(|r| r.name.as_str()).unwrap_or("");
                for (i, line) in day.lines().iter().enumerate() {
                    if i == 0 {
                        println!("{:4} | {:16} | {}", day.day_name, routine, line);
                    } else {
                        println!("{:4} | {:16} | {}", "", "", line);
                    }
                }
            }

            let flexible = plan_week.flexible_routines();
            if !flexible.is_empty() {
                println!("{:-<60}", "");
                let names: Vec<_> = flexible.iter().map(|r| r.name.as_str()).collect();
                println!("Flexible: {}", names.join(", "));
            }
        }

        Some(Commands::Today) => {
            let snapshot = Snapshot::open(&cli.data)?;
            let now = Utc::now();
            let today_idx = weekday_index(Local::now().date_naive());

            println!("Routines:");
            println!("{:-<40}", "");
            for routine in snapshot.active_routines() {
                let done = is_routine_completed_today(routine.last_completed_at, now);
                let day = routine.day_of_week.and_then(day_name).unwrap_or("Flex");
                println!(
                    "{} {:4} | {}",
                    if done { "✓" } else { " " },
                    day,
                    routine.name
                );
            }

            if let Some(plan) = snapshot.active_plan() {
                match find_routine_for_day(&plan.routines, today_idx) {
                    Some(r) => println!("\nScheduled today: {}", r.name),
                    None => println!("\nNothing scheduled today"),
                }
            }
        }

        Some(Commands::Start { routine, week }) => {
            let snapshot = Snapshot::open(&cli.data)?;
            let (plan, routine) = snapshot
                .find_routine(&routine)
                .with_context(|| format!("Routine '{}' not found", routine))?;
            if let Some(block) = start_block(routine, Utc::now()) {
                bail!("Routine '{}' can't be started: {}", routine.name, block.message());
            }
            let week = resolve_week(plan, week, Local::now().date_naive());

            println!("{} (week {} of {})", routine.name, week, plan.duration_weeks);
            for exercise in &routine.exercises {
                println!("\n{}", exercise.name);
                for set in session_sets(exercise, routine.routine_type, week) {
                    println!(
                        "  set {}: {} reps @ {}kg",
                        set.set_number,
                        set.target_reps,
                        format_weight(set.target_weight)
                    );
                }
            }
        }

        Some(Commands::Layout { count, period, width }) => {
            let layout = compute_layout(count, period, width);
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }

        Some(Commands::Chart { period, width, anchor }) => {
            let snapshot = Snapshot::open(&cli.data)?;
            let today = Local::now().date_naive();
            let anchor = anchor.unwrap_or(today);
            let series = snapshot.volume_window(period, anchor);
            let layout = compute_layout(series.len(), period, width);
            let values: Vec<f64> = series.iter().map(|p| p.value).collect();

            let label = window_label(normalize_anchor(anchor, period), period);
            if is_latest_window(anchor, period, today) {
                println!("{} (latest)", label);
            } else {
                println!("{}", label);
            }
            println!("{:-<40}", "");
            println!("Bars: {}", series.len());
            println!("Bar width: {} | spacing: {}", layout.bar_width, layout.spacing);
            match layout.chart_width {
                Some(w) => println!("Fits in {}", w),
                None => println!("Scrolls horizontally"),
            }
            println!("Top labels: {}", if layout.show_labels { "on" } else { "off" });
            println!("X label step: {}", x_axis_label_step(period, series.len()));
            println!("Y max: {}", format_compact_number(y_axis_max(&values)));
        }

        Some(Commands::Volume { file }) => {
            let sets = store::load_session(&file)?;
            let done = sets.iter().filter(|s| s.is_completed).count();
            let volume = session_volume(&sets);
            println!("Sets: {} of {} completed", done, sets.len());
            println!("Volume: {}kg ({})", format_weight(volume), format_compact_number(volume));
        }

        None => {
            // Default: show TUI
            let mut app = App::new(cli.data, Period::default())?;
            app.run()?;
        }
    }

    Ok(())
}
