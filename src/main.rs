//! workout-coach - 12-week bodyweight program coach

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use workout_coach::clock::SystemClock;
use workout_coach::db::Database;
use workout_coach::exercises::{DayVariant, plan_for};
use workout_coach::schedule::{PROGRAM_WEEKS, phase_for_week, weekday_name};
use workout_coach::session::{SessionMachine, parse_start_date};
use workout_coach::tui::App;

const DB_PATH: &str = "workout_coach.db";
const LOG_PATH: &str = "workout_coach.log";

#[derive(Parser)]
#[command(name = "workout-coach")]
#[command(author, version, about = "12-week bodyweight program coach")]
struct Cli {
    /// SQLite database holding the program record
    #[arg(long, global = true, env = "WORKOUT_COACH_DB", default_value = DB_PATH)]
    db: String,

    /// Log file used while the TUI owns the terminal
    #[arg(long, global = true, env = "WORKOUT_COACH_LOG", default_value = LOG_PATH)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive coach
    Tui,

    /// Set the program start date (Monday, Wednesday or Friday)
    Setup {
        /// Start date, YYYY-MM-DD
        date: String,
    },

    /// Show current week, phase and schedule
    Status,

    /// List completed workouts
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print the exercise list for a program week
    Plan {
        /// Program week (1-12), defaults to the current week
        #[arg(short, long)]
        week: Option<u32>,

        /// Weeks 9-12 workout variant
        #[arg(short, long, value_enum, default_value_t = VariantArg::A)]
        variant: VariantArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    A,
    B,
}

impl From<VariantArg> for DayVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::A => DayVariant::A,
            VariantArg::B => DayVariant::B,
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let tui = matches!(cli.command, None | Some(Commands::Tui));
    if tui {
        // stderr would draw over the alternate screen
        let file = File::create(&cli.log_file)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli)?;

    let db = Database::open(&cli.db)?;
    let mut machine = SessionMachine::load(db, SystemClock);

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(machine);
            app.run()?;
        }

        Some(Commands::Setup { date }) => {
            if let Some(program) = machine.program() {
                bail!("Program already started on {}", program.start_date);
            }
            machine.submit_start_date(parse_start_date(&date)?)?;
            println!("Program starts {}. Good luck!", date.trim());
        }

        Some(Commands::Status) => {
            let Some(status) = machine.day_status() else {
                println!("No program yet. Run `workout-coach setup <YYYY-MM-DD>` first.");
                return Ok(());
            };

            println!("Week {} of {} | {} - {}", status.week, PROGRAM_WEEKS, status.phase.name(), status.phase.title());
            if status.trains_today {
                match status.variant {
                    Some(variant) => println!("Today: training day (workout {})", variant.label()),
                    None => println!("Today: training day"),
                }
            } else {
                println!("Today: rest day");
            }
            println!("Next workout: {}", weekday_name(status.next_training_day));
        }

        Some(Commands::History { limit }) => {
            let analytics = machine.analytics();
            println!("Completed workouts:");
            println!("{:-<48}", "");
            for w in machine.history().iter().rev().take(limit) {
                println!(
                    "{} | week {:2} | {} exercises | {:3} min",
                    w.date, w.week, w.exercises_done, w.duration
                );
            }
            println!("{:-<48}", "");
            println!(
                "Total: {} workouts, {} min | avg {:.0} min | {:.1} sessions/week",
                analytics.total_workouts(),
                analytics.total_minutes(),
                analytics.average_minutes().unwrap_or(0.0),
                analytics.weekly_frequency()
            );
        }

        Some(Commands::Plan { week, variant }) => {
            let week = match week {
                Some(w) if (1..=PROGRAM_WEEKS).contains(&w) => w,
                Some(w) => bail!("Week must be between 1 and {}, got {}", PROGRAM_WEEKS, w),
                None => machine.day_status().map(|s| s.week).unwrap_or(1),
            };
            let phase = phase_for_week(week);
            println!("Week {} - {} ({})", week, phase.title(), phase.name());
            for (i, ex) in plan_for(phase, variant.into()).iter().enumerate() {
                println!("{}. {} - {}×{} (rest {}s) - {}", i + 1, ex.name, ex.sets, ex.reps, ex.rest_secs, ex.notes);
            }
        }
    }

    Ok(())
}
