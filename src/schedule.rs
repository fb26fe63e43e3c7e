//! Program calendar - week number, phase and training days from dates

use chrono::{Datelike, NaiveDate, Weekday};

use crate::exercises::{DayVariant, Exercise, ProgramPhase, plan_for};

/// Length of the program in weeks
pub const PROGRAM_WEEKS: u32 = 12;

/// Week of the program (1..=12) for `today` given the start date.
///
/// Dates before the start count as week 1, dates past the end stay at week 12.
pub fn week_number(start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - start).num_days();
    let weeks_elapsed = days.div_euclid(7);
    (weeks_elapsed + 1).clamp(1, PROGRAM_WEEKS as i64) as u32
}

pub fn phase_for_week(week: u32) -> ProgramPhase {
    match week {
        0..=4 => ProgramPhase::Weeks1To4,
        5..=8 => ProgramPhase::Weeks5To8,
        _ => ProgramPhase::Weeks9To12,
    }
}

/// The program may only start on Monday, Wednesday or Friday
pub fn is_valid_start_day(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Mon | Weekday::Wed | Weekday::Fri)
}

pub fn is_training_day(phase: ProgramPhase, weekday: Weekday) -> bool {
    phase.training_days().contains(&weekday)
}

/// Nearest training weekday strictly after `today`, wrapping around the week
pub fn next_training_day(phase: ProgramPhase, today: Weekday) -> Weekday {
    let mut day = today;
    for _ in 0..7 {
        day = day.succ();
        if is_training_day(phase, day) {
            return day;
        }
    }
    today
}

/// Weeks 9-12 use list A on Monday and Thursday, list B otherwise
pub fn day_variant(weekday: Weekday) -> DayVariant {
    match weekday {
        Weekday::Mon | Weekday::Thu => DayVariant::A,
        _ => DayVariant::B,
    }
}

/// Today's exercises, or `None` when the phase does not train on this weekday
pub fn todays_exercises(phase: ProgramPhase, weekday: Weekday) -> Option<&'static [Exercise]> {
    if !is_training_day(phase, weekday) {
        return None;
    }
    Some(plan_for(phase, day_variant(weekday)))
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Everything the dashboard needs to know about a given day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub week: u32,
    pub phase: ProgramPhase,
    pub trains_today: bool,
    pub variant: Option<DayVariant>,
    pub next_training_day: Weekday,
}

impl DayStatus {
    pub fn compute(start: NaiveDate, today: NaiveDate) -> Self {
        let week = week_number(start, today);
        let phase = phase_for_week(week);
        let weekday = today.weekday();
        let trains_today = is_training_day(phase, weekday);
        let variant = (trains_today && phase == ProgramPhase::Weeks9To12).then(|| day_variant(weekday));

        Self {
            date: today,
            week,
            phase,
            trains_today,
            variant,
            next_training_day: next_training_day(phase, weekday),
        }
    }
}
