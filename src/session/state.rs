//! Session types: screens, transient state, intents and errors

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;

use crate::exercises::{DayVariant, Exercise, ProgramPhase, total_sets};

/// Seconds on the "get ready" countdown before each set
pub const READY_COUNTDOWN_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Setup,
    Dashboard,
    Start,
    Warmup,
    Exercise,
    Rest,
    Ready,
    ExerciseDone,
    CoolDown,
    Done,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Setup => "setup",
            Screen::Dashboard => "dashboard",
            Screen::Start => "start",
            Screen::Warmup => "warmup",
            Screen::Exercise => "exercise",
            Screen::Rest => "rest",
            Screen::Ready => "ready",
            Screen::ExerciseDone => "exerciseDone",
            Screen::CoolDown => "cool-down",
            Screen::Done => "done",
        }
    }

    /// Screens that index into the active plan
    pub fn is_in_set(&self) -> bool {
        matches!(self, Screen::Exercise | Screen::Rest | Screen::Ready | Screen::ExerciseDone)
    }

    /// Screens driven by a one-second countdown
    pub fn is_timed(&self) -> bool {
        matches!(self, Screen::Rest | Screen::Ready)
    }

    /// Screens from which a workout may be abandoned
    pub fn allows_exit(&self) -> bool {
        matches!(self, Screen::Exercise | Screen::Rest)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The day's workout, fixed when the start screen opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPlan {
    pub date: NaiveDate,
    pub week: u32,
    pub phase: ProgramPhase,
    pub variant: Option<DayVariant>,
    pub exercises: &'static [Exercise],
}

impl WorkoutPlan {
    pub fn total_sets(&self) -> u32 {
        total_sets(self.exercises)
    }
}

/// Transient, in-memory session fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub screen: Screen,
    pub exercise_index: usize,
    pub set_index: u32,
    pub rest_remaining: u32,
    pub countdown: u32,
    pub started_at: Option<DateTime<Local>>,
    pub confirming_exit: bool,
}

impl SessionState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            exercise_index: 0,
            set_index: 0,
            rest_remaining: 0,
            countdown: READY_COUNTDOWN_SECS,
            started_at: None,
            confirming_exit: false,
        }
    }
}

/// Numbers shown on the completion screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub duration_minutes: u32,
    pub exercises: usize,
    pub total_sets: u32,
}

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SubmitStartDate(Option<NaiveDate>),
    OpenWorkout,
    BackToDashboard,
    StartWorkout,
    FinishWarmup,
    CompleteSet,
    SkipRest,
    NextExercise,
    FinishCooldown,
    FinishWorkout,
    RequestExit,
    ConfirmExit(bool),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SubmitStartDate(_) => "submit start date",
            Intent::OpenWorkout => "open workout",
            Intent::BackToDashboard => "back",
            Intent::StartWorkout => "start workout",
            Intent::FinishWarmup => "finish warm-up",
            Intent::CompleteSet => "set complete",
            Intent::SkipRest => "skip rest",
            Intent::NextExercise => "next exercise",
            Intent::FinishCooldown => "finish cool-down",
            Intent::FinishWorkout => "finish",
            Intent::RequestExit => "exit",
            Intent::ConfirmExit(_) => "confirm exit",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("This program starts on Monday, Wednesday, or Friday only. {date} is a {weekday}, please pick one of those days.")]
    InvalidStartDay { date: NaiveDate, weekday: &'static str },
    #[error("Please select a date first!")]
    MissingStartDate,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("No workout scheduled on {0} in this phase")]
    NotATrainingDay(&'static str),
    #[error("'{action}' is not available on the {screen} screen")]
    InvalidAction { action: &'static str, screen: Screen },
}

/// Parse setup input; blank input is "no date selected"
pub fn parse_start_date(input: &str) -> Result<Option<NaiveDate>, SessionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| SessionError::InvalidDateFormat(input.to_string()))
}

/// Format seconds as MM:SS
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
