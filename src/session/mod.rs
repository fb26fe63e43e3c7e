//! Workout session state machine
//!
//! Owns the transient session state and moves between screens only through
//! the named transitions below. The rest and ready countdowns run on a single
//! cancellable timer slot; every screen change cancels it before anything
//! else happens, so a countdown can never act on a screen it does not own.

mod state;

pub use state::{
    Intent, READY_COUNTDOWN_SECS, Screen, SessionError, SessionState, WorkoutPlan, WorkoutSummary, format_clock,
    parse_start_date,
};

use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::db::{KeyValueStore, ProgramState, WorkoutRecord, load_program, save_program};
use crate::exercises::{Exercise, WARMUP};
use crate::schedule::{DayStatus, is_valid_start_day, todays_exercises, week_number, weekday_name};
use crate::stats::Analytics;
use crate::timer::{TimerId, TimerSlot};

const TIMER_PERIOD: Duration = Duration::from_secs(1);

pub struct SessionMachine<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    program: Option<ProgramState>,
    state: SessionState,
    plan: Option<WorkoutPlan>,
    timers: TimerSlot,
}

impl<S: KeyValueStore, C: Clock> SessionMachine<S, C> {
    /// Load saved data; without a start date the machine waits in setup
    pub fn load(store: S, clock: C) -> Self {
        let program = load_program(&store);
        let screen = if program.is_some() { Screen::Dashboard } else { Screen::Setup };
        info!("Session starting on the {} screen", screen);

        Self {
            store,
            clock,
            program,
            state: SessionState::new(screen),
            plan: None,
            timers: TimerSlot::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn program(&self) -> Option<&ProgramState> {
        self.program.as_ref()
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history(&self) -> &[WorkoutRecord] {
        self.program.as_ref().map(|p| p.workout_history.as_slice()).unwrap_or(&[])
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self.history())
    }

    pub fn warmup(&self) -> &'static [&'static str] {
        WARMUP
    }

    /// Cool-down steps for the active workout's phase
    pub fn cooldown(&self) -> Option<&'static [&'static str]> {
        self.plan.as_ref().and_then(|p| p.phase.cooldown())
    }

    /// Week, phase and schedule for today; `None` until a start date is set
    pub fn day_status(&self) -> Option<DayStatus> {
        let program = self.program.as_ref()?;
        Some(DayStatus::compute(program.start_date, self.clock.today()))
    }

    pub fn current_exercise(&self) -> Option<&'static Exercise> {
        let exercises: &'static [Exercise] = self.plan.as_ref()?.exercises;
        exercises.get(self.state.exercise_index)
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timers.current().is_some()
    }

    /// Totals for the completion screen
    pub fn summary(&self) -> Option<WorkoutSummary> {
        let plan = self.plan.as_ref()?;
        Some(WorkoutSummary {
            duration_minutes: self.elapsed_minutes(),
            exercises: plan.exercises.len(),
            total_sets: plan.total_sets(),
        })
    }

    /// Dispatch a user intent to its transition
    pub fn handle(&mut self, intent: Intent) -> Result<(), SessionError> {
        match intent {
            Intent::SubmitStartDate(date) => self.submit_start_date(date),
            Intent::OpenWorkout => self.open_workout(),
            Intent::BackToDashboard => self.back_to_dashboard(),
            Intent::StartWorkout => self.start_workout(),
            Intent::FinishWarmup => self.finish_warmup(),
            Intent::CompleteSet => self.complete_set(),
            Intent::SkipRest => self.skip_rest(),
            Intent::NextExercise => self.next_exercise(),
            Intent::FinishCooldown => self.finish_cooldown(),
            Intent::FinishWorkout => self.finish_workout(),
            Intent::RequestExit => self.request_exit(),
            Intent::ConfirmExit(accepted) => self.confirm_exit(accepted),
        }
    }

    pub fn submit_start_date(&mut self, date: Option<NaiveDate>) -> Result<(), SessionError> {
        self.require(Screen::Setup, Intent::SubmitStartDate(date))?;
        let date = date.ok_or(SessionError::MissingStartDate)?;

        let weekday = date.weekday();
        if !is_valid_start_day(weekday) {
            debug!("Rejected start date {} ({:?})", date, weekday);
            return Err(SessionError::InvalidStartDay {
                date,
                weekday: weekday_name(weekday),
            });
        }

        let program = ProgramState::new(date);
        save_program(&mut self.store, &program);
        self.program = Some(program);
        info!("Program start date set to {}", date);

        self.enter(Screen::Dashboard);
        Ok(())
    }

    /// Dashboard -> start preview, only on a scheduled training day
    pub fn open_workout(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Dashboard, Intent::OpenWorkout)?;
        let Some(status) = self.day_status() else {
            return Err(self.invalid(Intent::OpenWorkout));
        };

        let weekday = status.date.weekday();
        let exercises = todays_exercises(status.phase, weekday).ok_or(SessionError::NotATrainingDay(weekday_name(weekday)))?;

        self.plan = Some(WorkoutPlan {
            date: status.date,
            week: status.week,
            phase: status.phase,
            variant: status.variant,
            exercises,
        });
        self.enter(Screen::Start);
        Ok(())
    }

    pub fn back_to_dashboard(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Start, Intent::BackToDashboard)?;
        self.reset_to_dashboard();
        Ok(())
    }

    pub fn start_workout(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Start, Intent::StartWorkout)?;
        self.state.started_at = Some(self.clock.now());
        if let Some(plan) = &self.plan {
            info!(
                "Workout started: week {} ({}), {} exercises",
                plan.week,
                plan.phase.name(),
                plan.exercises.len()
            );
        }
        self.enter(Screen::Warmup);
        Ok(())
    }

    pub fn finish_warmup(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Warmup, Intent::FinishWarmup)?;
        self.state.exercise_index = 0;
        self.state.set_index = 0;
        self.enter(Screen::Exercise);
        Ok(())
    }

    /// Rest between sets, or move on after the last one
    pub fn complete_set(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Exercise, Intent::CompleteSet)?;
        let Some(exercise) = self.current_exercise() else {
            return Err(self.invalid(Intent::CompleteSet));
        };

        if self.state.set_index + 1 < exercise.sets {
            self.state.rest_remaining = exercise.rest_secs;
            self.enter(Screen::Rest);
        } else {
            self.enter(Screen::ExerciseDone);
        }
        Ok(())
    }

    pub fn skip_rest(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Rest, Intent::SkipRest)?;
        self.finish_rest(self.clock.instant());
        Ok(())
    }

    pub fn next_exercise(&mut self) -> Result<(), SessionError> {
        self.require(Screen::ExerciseDone, Intent::NextExercise)?;
        let (count, has_cooldown) = match &self.plan {
            Some(plan) => (plan.exercises.len(), plan.phase.cooldown().is_some()),
            None => return Err(self.invalid(Intent::NextExercise)),
        };

        if self.state.exercise_index + 1 < count {
            self.state.exercise_index += 1;
            self.state.set_index = 0;
            self.state.countdown = READY_COUNTDOWN_SECS;
            self.enter(Screen::Ready);
        } else if has_cooldown {
            self.enter(Screen::CoolDown);
        } else {
            self.enter(Screen::Done);
        }
        Ok(())
    }

    pub fn finish_cooldown(&mut self) -> Result<(), SessionError> {
        self.require(Screen::CoolDown, Intent::FinishCooldown)?;
        self.enter(Screen::Done);
        Ok(())
    }

    /// Record the finished workout and go back to the dashboard
    pub fn finish_workout(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Done, Intent::FinishWorkout)?;
        let today = self.clock.today();
        let duration = self.elapsed_minutes();
        let missing = self.invalid(Intent::FinishWorkout);
        let Some(exercises_done) = self.plan.as_ref().map(|p| p.exercises.len() as u32) else {
            return Err(missing);
        };
        let Some(program) = self.program.as_mut() else {
            return Err(missing);
        };

        let record = WorkoutRecord {
            date: today,
            completed: true,
            week: week_number(program.start_date, today),
            exercises_done,
            duration,
        };
        info!(
            "Workout finished: week {}, {} exercises in {} min",
            record.week, record.exercises_done, record.duration
        );
        program.workout_history.push(record);
        save_program(&mut self.store, program);

        self.reset_to_dashboard();
        Ok(())
    }

    /// Ask to abandon the workout; nothing changes until confirmed
    pub fn request_exit(&mut self) -> Result<(), SessionError> {
        if !self.state.screen.allows_exit() || self.state.confirming_exit {
            return Err(self.invalid(Intent::RequestExit));
        }
        self.state.confirming_exit = true;
        Ok(())
    }

    pub fn confirm_exit(&mut self, accepted: bool) -> Result<(), SessionError> {
        if !self.state.confirming_exit {
            return Err(self.invalid(Intent::ConfirmExit(accepted)));
        }

        if accepted {
            warn!(
                "Workout abandoned on {} (exercise {}, set {})",
                self.state.screen,
                self.state.exercise_index + 1,
                self.state.set_index + 1
            );
            self.reset_to_dashboard();
        } else {
            self.state.confirming_exit = false;
            // countdowns were frozen while the dialog was open
            if self.state.screen.is_timed() {
                self.timers.schedule(self.clock.instant(), TIMER_PERIOD);
            }
        }
        Ok(())
    }

    /// Fire every timer period that has elapsed since the last call
    pub fn tick(&mut self) {
        if self.state.confirming_exit {
            return;
        }
        let now = self.clock.instant();
        while let Some((id, due)) = self.timers.poll(now) {
            self.fire(id, due);
        }
    }

    /// One-second timer callback, delivered now
    pub fn on_timer(&mut self, id: TimerId) {
        self.fire(id, self.clock.instant());
    }

    /// Handle a firing that belongs to the period ending at `due`; a
    /// follow-on countdown starts from there, not from when it was noticed
    fn fire(&mut self, id: TimerId, due: Instant) {
        if !self.timers.is_current(id) {
            debug!("Ignoring stale timer {:?}", id);
            return;
        }

        match self.state.screen {
            Screen::Rest => {
                self.state.rest_remaining = self.state.rest_remaining.saturating_sub(1);
                if self.state.rest_remaining == 0 {
                    self.finish_rest(due);
                }
            }
            Screen::Ready => {
                self.state.countdown = self.state.countdown.saturating_sub(1);
                if self.state.countdown == 0 {
                    self.enter_at(Screen::Exercise, due);
                }
            }
            _ => {
                self.timers.cancel();
            }
        }
    }

    fn finish_rest(&mut self, at: Instant) {
        self.state.set_index += 1;
        self.state.rest_remaining = 0;
        self.state.countdown = READY_COUNTDOWN_SECS;
        self.enter_at(Screen::Ready, at);
    }

    fn enter(&mut self, screen: Screen) {
        self.enter_at(screen, self.clock.instant());
    }

    /// Every screen change goes through here; a timed screen counts from `at`
    fn enter_at(&mut self, screen: Screen, at: Instant) {
        self.timers.cancel();
        debug!("{} -> {}", self.state.screen, screen);
        self.state.screen = screen;

        if screen == Screen::Rest && self.state.rest_remaining == 0 {
            self.finish_rest(at);
            return;
        }
        if screen.is_timed() {
            self.timers.schedule(at, TIMER_PERIOD);
        }
    }

    fn reset_to_dashboard(&mut self) {
        self.timers.cancel();
        self.plan = None;
        self.state = SessionState::new(Screen::Dashboard);
    }

    fn elapsed_minutes(&self) -> u32 {
        let Some(started) = self.state.started_at else {
            return 0;
        };
        let millis = (self.clock.now() - started).num_milliseconds().max(0);
        (millis as f64 / 60_000.0).round() as u32
    }

    fn require(&self, screen: Screen, intent: Intent) -> Result<(), SessionError> {
        if self.state.screen != screen || self.state.confirming_exit {
            return Err(self.invalid(intent));
        }
        Ok(())
    }

    fn invalid(&self, intent: Intent) -> SessionError {
        SessionError::InvalidAction {
            action: intent.name(),
            screen: self.state.screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone};

    use super::*;
    use crate::clock::ManualClock;
    use crate::db::MemoryStore;
    use crate::exercises::{
        DayVariant, EXERCISES_W1_W4, EXERCISES_W5_W8, EXERCISES_W9_W12_B, ProgramPhase, total_sets,
    };

    type TestMachine = SessionMachine<MemoryStore, ManualClock>;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn morning(day: NaiveDate) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(day.year(), day.month(), day.day(), 9, 0, 0)
            .unwrap()
    }

    // 2025-01-06 is a Monday
    fn monday() -> NaiveDate {
        date(2025, 1, 6)
    }

    fn fresh(today: NaiveDate) -> TestMachine {
        SessionMachine::load(MemoryStore::new(), ManualClock::new(morning(today)))
    }

    fn started(start: NaiveDate, today: NaiveDate) -> TestMachine {
        let mut store = MemoryStore::new();
        assert!(save_program(&mut store, &ProgramState::new(start)));
        SessionMachine::load(store, ManualClock::new(morning(today)))
    }

    /// Dashboard -> first set of the first exercise
    fn into_first_set(m: &mut TestMachine) {
        m.open_workout().unwrap();
        m.start_workout().unwrap();
        m.finish_warmup().unwrap();
        assert_eq!(m.screen(), Screen::Exercise);
    }

    fn wait_secs(m: &mut TestMachine, secs: u64) {
        for _ in 0..secs {
            m.clock().advance_secs(1);
            m.tick();
        }
    }

    fn assert_indices_valid(m: &TestMachine) {
        if !m.screen().is_in_set() {
            return;
        }
        let plan = m.plan().expect("plan while in a set");
        let idx = m.state().exercise_index;
        assert!(idx < plan.exercises.len(), "exercise index {} out of range", idx);
        assert!(
            m.state().set_index < plan.exercises[idx].sets,
            "set index {} out of range on {}",
            m.state().set_index,
            m.screen()
        );
    }

    /// Walk the rest of the workout, checking the index invariant at every step.
    /// Returns every screen stepped through.
    fn run_to_done(m: &mut TestMachine) -> Vec<Screen> {
        let mut seen = Vec::new();
        for _ in 0..10_000 {
            assert_indices_valid(m);
            seen.push(m.screen());
            match m.screen() {
                Screen::Exercise => m.complete_set().unwrap(),
                Screen::Rest => wait_secs(m, 1),
                Screen::Ready => wait_secs(m, 1),
                Screen::ExerciseDone => m.next_exercise().unwrap(),
                Screen::CoolDown => m.finish_cooldown().unwrap(),
                Screen::Done => return seen,
                other => panic!("unexpected screen {}", other),
            }
        }
        panic!("workout never finished");
    }

    #[test]
    fn test_no_saved_program_starts_in_setup() {
        let mut m = fresh(monday());
        assert_eq!(m.screen(), Screen::Setup);
        assert!(m.day_status().is_none());
        assert!(m.open_workout().is_err());
        assert_eq!(m.screen(), Screen::Setup);
    }

    #[test]
    fn test_setup_rejects_wrong_weekday() {
        let mut m = fresh(monday());
        for bad in [date(2025, 1, 7), date(2025, 1, 9), date(2025, 1, 11), date(2025, 1, 12)] {
            let err = m.submit_start_date(Some(bad)).unwrap_err();
            assert!(matches!(err, SessionError::InvalidStartDay { .. }), "{:?}", err);
        }
        assert_eq!(m.screen(), Screen::Setup);
        assert!(m.program().is_none());
        assert!(load_program(m.store()).is_none());
    }

    #[test]
    fn test_setup_without_date() {
        let mut m = fresh(monday());
        assert_eq!(m.handle(Intent::SubmitStartDate(None)), Err(SessionError::MissingStartDate));
        assert_eq!(m.screen(), Screen::Setup);
    }

    #[test]
    fn test_setup_accepts_mon_wed_fri() {
        for good in [date(2025, 1, 6), date(2025, 1, 8), date(2025, 1, 10)] {
            let mut m = fresh(monday());
            m.submit_start_date(Some(good)).unwrap();
            assert_eq!(m.screen(), Screen::Dashboard);
            assert_eq!(load_program(m.store()).map(|p| p.start_date), Some(good));
        }
    }

    #[test]
    fn test_setup_only_once() {
        let mut m = started(monday(), monday());
        assert!(matches!(
            m.submit_start_date(Some(monday())),
            Err(SessionError::InvalidAction { screen: Screen::Dashboard, .. })
        ));
    }

    #[test]
    fn test_dashboard_same_monday_trains_today() {
        let m = started(monday(), monday());
        let status = m.day_status().unwrap();
        assert_eq!(status.week, 1);
        assert_eq!(status.phase, ProgramPhase::Weeks1To4);
        assert!(status.trains_today);
    }

    #[test]
    fn test_open_workout_on_rest_day_is_rejected() {
        let tuesday = date(2025, 1, 7);
        let mut m = started(monday(), tuesday);
        assert_eq!(m.open_workout(), Err(SessionError::NotATrainingDay("Tuesday")));
        assert_eq!(m.screen(), Screen::Dashboard);
        assert!(m.plan().is_none());
    }

    #[test]
    fn test_start_preview_freezes_plan() {
        let mut m = started(monday(), monday());
        m.open_workout().unwrap();
        assert_eq!(m.screen(), Screen::Start);
        let plan = m.plan().unwrap();
        assert_eq!(plan.exercises, EXERCISES_W1_W4);
        assert_eq!(plan.week, 1);

        m.back_to_dashboard().unwrap();
        assert_eq!(m.screen(), Screen::Dashboard);
        assert!(m.plan().is_none());
    }

    #[test]
    fn test_week_eleven_thursday_uses_variant_a() {
        // 73 days after a Monday: Thursday of week 11
        let thursday = monday() + chrono::Duration::days(73);
        let mut m = started(monday(), thursday);
        m.open_workout().unwrap();
        let plan = m.plan().unwrap();
        assert_eq!(plan.week, 11);
        assert_eq!(plan.phase, ProgramPhase::Weeks9To12);
        assert_eq!(plan.variant, Some(DayVariant::A));
    }

    #[test]
    fn test_set_complete_arms_rest_timer() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        assert!(!m.is_timer_armed());

        m.complete_set().unwrap();
        assert_eq!(m.screen(), Screen::Rest);
        assert_eq!(m.state().rest_remaining, 90);
        assert_eq!(m.state().set_index, 0);
        assert!(m.is_timer_armed());
    }

    #[test]
    fn test_rest_counts_down_to_ready_then_exercise() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();

        wait_secs(&mut m, 89);
        assert_eq!(m.screen(), Screen::Rest);
        assert_eq!(m.state().rest_remaining, 1);

        wait_secs(&mut m, 1);
        assert_eq!(m.screen(), Screen::Ready);
        assert_eq!(m.state().set_index, 1);
        assert_eq!(m.state().countdown, READY_COUNTDOWN_SECS);

        wait_secs(&mut m, 2);
        assert_eq!(m.screen(), Screen::Ready);
        assert_eq!(m.state().countdown, 1);

        wait_secs(&mut m, 1);
        assert_eq!(m.screen(), Screen::Exercise);
        assert_eq!(m.state().set_index, 1);
        assert!(!m.is_timer_armed());
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();

        m.clock().advance_secs(30);
        m.tick();
        assert_eq!(m.state().rest_remaining, 60);
    }

    #[test]
    fn test_overdue_rest_and_ready_finish_in_one_tick() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();

        // 90 s rest plus the 3 s ready countdown, noticed 2 s late
        m.clock().advance_secs(95);
        m.tick();
        assert_eq!(m.screen(), Screen::Exercise);
        assert_eq!(m.state().set_index, 1);
        assert!(!m.is_timer_armed());
    }

    #[test]
    fn test_ready_counts_from_end_of_rest() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();

        m.clock().advance_secs(91);
        m.tick();
        assert_eq!(m.screen(), Screen::Ready);
        assert_eq!(m.state().countdown, 2);

        m.clock().advance_secs(2);
        m.tick();
        assert_eq!(m.screen(), Screen::Exercise);
    }

    #[test]
    fn test_skip_rest_matches_timer_expiry() {
        let mut by_timer = started(monday(), monday());
        let mut by_skip = started(monday(), monday());
        for m in [&mut by_timer, &mut by_skip] {
            into_first_set(m);
            m.complete_set().unwrap();
        }

        wait_secs(&mut by_timer, 90);
        by_skip.skip_rest().unwrap();

        assert_eq!(by_timer.state(), by_skip.state());
        assert_eq!(by_skip.screen(), Screen::Ready);
    }

    #[test]
    fn test_last_set_bypasses_rest() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.state.set_index = 2; // push-ups have 3 sets

        m.complete_set().unwrap();
        assert_eq!(m.screen(), Screen::ExerciseDone);
        assert!(!m.is_timer_armed());
        assert_indices_valid(&m);
    }

    #[test]
    fn test_next_exercise_resets_set_and_counts_down() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.state.set_index = 2;
        m.complete_set().unwrap();

        m.next_exercise().unwrap();
        assert_eq!(m.screen(), Screen::Ready);
        assert_eq!(m.state().exercise_index, 1);
        assert_eq!(m.state().set_index, 0);
        assert_eq!(m.state().countdown, READY_COUNTDOWN_SECS);
        assert_eq!(m.current_exercise().map(|e| e.name), Some("SQUATS"));
    }

    #[test]
    fn test_last_exercise_without_cooldown_goes_to_done() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.state.exercise_index = EXERCISES_W1_W4.len() - 1;
        m.state.set_index = EXERCISES_W1_W4[EXERCISES_W1_W4.len() - 1].sets - 1;
        m.complete_set().unwrap();

        m.next_exercise().unwrap();
        assert_eq!(m.screen(), Screen::Done);
    }

    #[test]
    fn test_last_exercise_with_cooldown_goes_to_cooldown() {
        // week 5 Monday
        let today = monday() + chrono::Duration::days(28);
        let mut m = started(monday(), today);
        into_first_set(&mut m);
        let count = m.plan().unwrap().exercises.len();
        m.state.exercise_index = count - 1;
        m.state.set_index = m.current_exercise().unwrap().sets - 1;
        m.complete_set().unwrap();

        m.next_exercise().unwrap();
        assert_eq!(m.screen(), Screen::CoolDown);
        assert_eq!(m.cooldown().map(|c| c.len()), Some(4));

        m.finish_cooldown().unwrap();
        assert_eq!(m.screen(), Screen::Done);
    }

    #[test]
    fn test_full_workout_keeps_indices_valid_and_records_once() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        run_to_done(&mut m);

        let summary = m.summary().unwrap();
        assert_eq!(summary.exercises, EXERCISES_W1_W4.len());
        assert_eq!(summary.total_sets, 16);

        m.finish_workout().unwrap();
        assert_eq!(m.screen(), Screen::Dashboard);
        assert_eq!(m.history().len(), 1);
        assert_eq!(m.history()[0].exercises_done, EXERCISES_W1_W4.len() as u32);
        assert_eq!(m.history()[0].week, 1);
        assert!(m.history()[0].completed);
    }

    #[test]
    fn test_finish_records_rounded_duration_and_resets() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        run_to_done(&mut m);

        // push elapsed time to exactly 34.5 minutes since start_workout
        let started_at = m.state().started_at.unwrap();
        let elapsed = (m.clock().now() - started_at).num_milliseconds() as u64;
        m.clock().advance(std::time::Duration::from_millis(34 * 60_000 + 30_000 - elapsed));
        assert_eq!(m.summary().unwrap().duration_minutes, 35);

        m.finish_workout().unwrap();

        let saved = load_program(m.store()).unwrap();
        assert_eq!(saved.workout_history.len(), 1);
        assert_eq!(saved.workout_history[0].duration, 35);
        assert_eq!(saved.workout_history[0].date, monday());

        assert_eq!(m.state(), &SessionState::new(Screen::Dashboard));
        assert_eq!(m.state().exercise_index, 0);
        assert_eq!(m.state().set_index, 0);
        assert_eq!(m.state().rest_remaining, 0);
        assert!(m.plan().is_none());
        assert!(!m.is_timer_armed());
    }

    #[test]
    fn test_full_workout_weeks_5_8_ends_with_cooldown() {
        // week 5 Monday
        let mut m = started(monday(), monday() + chrono::Duration::days(28));
        into_first_set(&mut m);
        assert_eq!(m.plan().unwrap().exercises, EXERCISES_W5_W8);

        let seen = run_to_done(&mut m);
        let sets = seen.iter().filter(|s| **s == Screen::Exercise).count();
        assert_eq!(sets as u32, total_sets(EXERCISES_W5_W8));
        assert!(seen.contains(&Screen::CoolDown));

        m.finish_workout().unwrap();
        assert_eq!(m.history()[0].week, 5);
    }

    #[test]
    fn test_full_workout_weeks_9_12_variant_b() {
        // week 9 Wednesday
        let mut m = started(monday(), monday() + chrono::Duration::days(58));
        into_first_set(&mut m);
        let plan = m.plan().unwrap();
        assert_eq!(plan.variant, Some(DayVariant::B));
        assert_eq!(plan.exercises, EXERCISES_W9_W12_B);

        let seen = run_to_done(&mut m);
        let sets = seen.iter().filter(|s| **s == Screen::Exercise).count();
        assert_eq!(sets as u32, total_sets(EXERCISES_W9_W12_B));
        assert!(seen.contains(&Screen::CoolDown));
        assert_eq!(m.summary().unwrap().exercises, EXERCISES_W9_W12_B.len());
    }

    #[test]
    fn test_history_is_appended_not_replaced() {
        let mut m = started(monday(), monday());
        for _ in 0..2 {
            into_first_set(&mut m);
            run_to_done(&mut m);
            m.finish_workout().unwrap();
        }
        assert_eq!(load_program(m.store()).unwrap().workout_history.len(), 2);
    }

    #[test]
    fn test_exit_declined_leaves_state() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();
        wait_secs(&mut m, 10);
        let before = m.state().clone();

        m.request_exit().unwrap();
        m.confirm_exit(false).unwrap();

        assert_eq!(m.state(), &before);
        assert_eq!(m.screen(), Screen::Rest);
        assert!(m.is_timer_armed());
    }

    #[test]
    fn test_exit_accepted_discards_session() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();

        m.handle(Intent::RequestExit).unwrap();
        m.handle(Intent::ConfirmExit(true)).unwrap();

        assert_eq!(m.screen(), Screen::Dashboard);
        assert!(m.history().is_empty());
        assert!(load_program(m.store()).unwrap().workout_history.is_empty());
        assert!(!m.is_timer_armed());
    }

    #[test]
    fn test_exit_not_available_outside_sets() {
        let mut m = started(monday(), monday());
        m.open_workout().unwrap();
        m.start_workout().unwrap();
        assert!(m.request_exit().is_err());
        assert!(m.confirm_exit(true).is_err());
        assert_eq!(m.screen(), Screen::Warmup);
    }

    #[test]
    fn test_countdown_frozen_while_confirming_exit() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();
        m.request_exit().unwrap();

        wait_secs(&mut m, 200);
        assert_eq!(m.screen(), Screen::Rest);
        assert_eq!(m.state().rest_remaining, 90);
        assert!(m.skip_rest().is_err());

        m.confirm_exit(false).unwrap();
        wait_secs(&mut m, 1);
        assert_eq!(m.state().rest_remaining, 89);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();
        let rest_timer = m.timers.current().unwrap();

        m.skip_rest().unwrap();
        let ready = m.state().clone();
        assert!(!m.timers.is_current(rest_timer));

        m.on_timer(rest_timer);
        assert_eq!(m.state(), &ready);
    }

    #[test]
    fn test_leaving_timed_screen_cancels_timer() {
        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        m.complete_set().unwrap();
        m.request_exit().unwrap();
        m.confirm_exit(true).unwrap();

        assert!(!m.is_timer_armed());
        m.clock().advance_secs(120);
        m.tick();
        assert_eq!(m.screen(), Screen::Dashboard);
        assert_eq!(m.state().set_index, 0);
    }

    #[test]
    fn test_zero_rest_goes_straight_to_ready() {
        static NO_REST: &[Exercise] = &[Exercise {
            name: "TEST",
            sets: 2,
            reps: "1",
            rest_secs: 0,
            notes: "",
        }];

        let mut m = started(monday(), monday());
        into_first_set(&mut m);
        if let Some(plan) = m.plan.as_mut() {
            plan.exercises = NO_REST;
        }

        m.complete_set().unwrap();
        assert_eq!(m.screen(), Screen::Ready);
        assert_eq!(m.state().set_index, 1);
    }

    #[test]
    fn test_wrong_screen_intents_do_nothing() {
        let mut m = started(monday(), monday());
        let before = m.state().clone();
        for intent in [
            Intent::StartWorkout,
            Intent::FinishWarmup,
            Intent::CompleteSet,
            Intent::SkipRest,
            Intent::NextExercise,
            Intent::FinishCooldown,
            Intent::FinishWorkout,
            Intent::BackToDashboard,
        ] {
            let err = m.handle(intent).unwrap_err();
            assert_eq!(
                err,
                SessionError::InvalidAction {
                    action: intent.name(),
                    screen: Screen::Dashboard
                }
            );
        }
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_failing_store_does_not_block_setup() {
        struct ReadOnly;
        impl KeyValueStore for ReadOnly {
            fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
                Ok(None)
            }
            fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
                anyhow::bail!("read-only")
            }
        }

        let mut m = SessionMachine::load(ReadOnly, ManualClock::new(morning(monday())));
        m.submit_start_date(Some(monday())).unwrap();
        assert_eq!(m.screen(), Screen::Dashboard);
        assert_eq!(m.day_status().map(|s| s.week), Some(1));
    }
}
