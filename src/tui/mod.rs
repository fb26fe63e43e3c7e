//! TUI module - Terminal coach with ratatui

mod view;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::session::{Intent, Screen, SessionMachine, parse_start_date};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const DATE_INPUT_LEN: usize = 10; // YYYY-MM-DD

/// App state for TUI
pub struct App<S: KeyValueStore, C: Clock> {
    machine: SessionMachine<S, C>,
    date_input: String,
    message: Option<String>,
    should_quit: bool,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(machine: SessionMachine<S, C>) -> Self {
        Self {
            machine,
            date_input: String::new(),
            message: None,
            should_quit: false,
        }
    }

    pub fn machine(&self) -> &SessionMachine<S, C> {
        &self.machine
    }

    pub fn date_input(&self) -> &str {
        &self.date_input
    }

    /// Last validation error, cleared by the next successful action
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
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
            self.machine.tick();
            terminal.draw(|frame| view::render(self, frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.on_key(key);
        }
        Ok(())
    }

    /// Translate a key press into a session intent
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let screen = self.machine.screen();

        if self.machine.state().confirming_exit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.dispatch(Intent::ConfirmExit(true)),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.dispatch(Intent::ConfirmExit(false)),
                _ => {}
            }
            return;
        }

        if screen == Screen::Setup {
            self.on_setup_key(key.code);
            return;
        }

        let intent = match (screen, key.code) {
            (Screen::Dashboard, KeyCode::Char('q')) => {
                self.should_quit = true;
                None
            }
            (Screen::Dashboard, KeyCode::Enter | KeyCode::Char('s')) => Some(Intent::OpenWorkout),
            (Screen::Start, KeyCode::Enter) => Some(Intent::StartWorkout),
            (Screen::Start, KeyCode::Esc | KeyCode::Char('b')) => Some(Intent::BackToDashboard),
            (Screen::Warmup, KeyCode::Enter) => Some(Intent::FinishWarmup),
            (Screen::Exercise, KeyCode::Enter | KeyCode::Char(' ')) => Some(Intent::CompleteSet),
            (Screen::Rest, KeyCode::Enter | KeyCode::Char('s')) => Some(Intent::SkipRest),
            (Screen::Exercise | Screen::Rest, KeyCode::Char('x')) => Some(Intent::RequestExit),
            (Screen::ExerciseDone, KeyCode::Enter) => Some(Intent::NextExercise),
            (Screen::CoolDown, KeyCode::Enter) => Some(Intent::FinishCooldown),
            (Screen::Done, KeyCode::Enter) => Some(Intent::FinishWorkout),
            _ => None,
        };

        if let Some(intent) = intent {
            self.dispatch(intent);
        }
    }

    fn on_setup_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && self.date_input.len() < DATE_INPUT_LEN => {
                self.date_input.push(c);
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Enter => match parse_start_date(&self.date_input) {
                Ok(date) => self.dispatch(Intent::SubmitStartDate(date)),
                Err(e) => self.reject(e.to_string()),
            },
            _ => {}
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        match self.machine.handle(intent) {
            Ok(()) => {
                self.message = None;
                self.date_input.clear();
            }
            Err(e) => {
                debug!("{:?} rejected: {}", intent, e);
                self.reject(e.to_string());
            }
        }
    }

    /// Show the error and clear the rejected input
    fn reject(&mut self, message: String) {
        self.message = Some(message);
        self.date_input.clear();
    }
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
