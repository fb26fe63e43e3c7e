//! Screen rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::App;
use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::schedule::{PROGRAM_WEEKS, weekday_name};
use crate::session::{Screen, format_clock};

/// Rest seconds at which the timer turns red
const REST_WARNING_SECS: u32 = 10;

pub fn render<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)])
        .split(area);

    // Header
    let header = Paragraph::new(header_text(app))
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let machine = app.machine();
    let body = chunks[1];
    match machine.screen() {
        Screen::Setup => render_setup(app, frame, body),
        Screen::Dashboard => render_dashboard(app, frame, body),
        Screen::Start => render_start(app, frame, body),
        Screen::Warmup => render_steps(frame, body, "WARM UP", machine.warmup()),
        Screen::Exercise => render_exercise(app, frame, body),
        Screen::Rest => render_rest(app, frame, body),
        Screen::Ready => render_ready(app, frame, body),
        Screen::ExerciseDone => {
            let name = machine.current_exercise().map(|e| e.name).unwrap_or_default();
            let text = vec![
                Line::from(format!("{} COMPLETE!", name).bold()),
                Line::from(""),
                Line::from("All sets finished!"),
            ];
            frame.render_widget(centered(text, "Exercise done"), body);
        }
        Screen::CoolDown => render_steps(frame, body, "COOL DOWN", machine.cooldown().unwrap_or_default()),
        Screen::Done => render_done(app, frame, body),
    }

    // Footer
    let footer_style = if app.message().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let trains_today = machine.day_status().is_some_and(|s| s.trains_today);
    let footer = Paragraph::new(app.message().unwrap_or(key_hints(machine.screen(), trains_today)))
        .style(footer_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);

    if machine.state().confirming_exit {
        render_confirm(frame, area);
    }
}

fn header_text<S: KeyValueStore, C: Clock>(app: &App<S, C>) -> String {
    let machine = app.machine();
    let state = machine.state();
    match (machine.screen().is_in_set(), machine.plan()) {
        (true, Some(plan)) => {
            let sets = machine.current_exercise().map(|e| e.sets).unwrap_or(0);
            format!(
                "Exercise {}/{} | Set {}/{}",
                state.exercise_index + 1,
                plan.exercises.len(),
                state.set_index + 1,
                sets
            )
        }
        _ => "WORKOUT COACH".to_string(),
    }
}

fn key_hints(screen: Screen, trains_today: bool) -> &'static str {
    match screen {
        Screen::Setup => "type YYYY-MM-DD | enter: start program | q: quit",
        Screen::Dashboard if trains_today => "enter: today's workout | q: quit",
        Screen::Dashboard => "rest day - come back on the next training day | q: quit",
        Screen::Start => "enter: start workout | esc: back",
        Screen::Warmup => "enter: done - start exercises",
        Screen::Exercise => "space: set complete | x: exit",
        Screen::Rest => "s: skip rest | x: exit",
        Screen::Ready => "get ready...",
        Screen::ExerciseDone => "enter: next exercise",
        Screen::CoolDown => "enter: done",
        Screen::Done => "enter: finish",
    }
}

fn centered<'a>(lines: Vec<Line<'a>>, title: &'a str) -> Paragraph<'a> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title))
}

fn render_setup<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("SETUP".bold()),
        Line::from(""),
        Line::from("When did you start training?"),
        Line::from("The program starts on a Monday, Wednesday or Friday."),
        Line::from(""),
        Line::from(format!("> {}_", app.date_input()).yellow()),
    ];
    frame.render_widget(centered(text, "Setup"), area);
}

fn render_dashboard<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let machine = app.machine();
    let Some(status) = machine.day_status() else {
        return;
    };
    let analytics = machine.analytics();

    let mut text = vec![
        Line::from(format!("Week {} of {}", status.week, PROGRAM_WEEKS).bold()),
        Line::from(format!("{} - {}", status.phase.name(), status.phase.title())),
        Line::from(""),
    ];

    if status.trains_today {
        let label = match status.variant {
            Some(variant) => format!("Today is a training day (workout {})", variant.label()),
            None => "Today is a training day".to_string(),
        };
        text.push(Line::from(label.green()));
    } else {
        text.push(Line::from("Rest day today".yellow()));
    }
    text.push(Line::from(format!(
        "Next workout: {}",
        weekday_name(status.next_training_day)
    )));
    text.push(Line::from(""));
    text.push(Line::from(format!(
        "Workouts done: {} | this week: {} | total: {} min",
        analytics.total_workouts(),
        analytics.workouts_in_week(status.week),
        analytics.total_minutes()
    )));
    if let Some(avg) = analytics.average_minutes() {
        text.push(Line::from(format!("Average workout: {:.0} min", avg)));
    }
    if let Some(last) = analytics.last_workout() {
        text.push(Line::from(format!("Last workout: {} ({} min)", last.date, last.duration)));
    }

    frame.render_widget(centered(text, "Dashboard"), area);
}

fn render_start<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let Some(plan) = app.machine().plan() else {
        return;
    };

    let items: Vec<ListItem> = plan
        .exercises
        .iter()
        .enumerate()
        .map(|(i, ex)| ListItem::new(format!("{}. {} - {}×{}", i + 1, ex.name, ex.sets, ex.reps)))
        .collect();

    let title = format!("Week {} - {}", plan.week, plan.phase.title());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_steps(frame: &mut Frame, area: Rect, title: &str, steps: &[&str]) {
    let items: Vec<ListItem> = steps.iter().map(|s| ListItem::new(*s)).collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_exercise<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let machine = app.machine();
    let Some(exercise) = machine.current_exercise() else {
        return;
    };

    let text = vec![
        Line::from(exercise.name.bold()),
        Line::from(format!("Set {} of {}", machine.state().set_index + 1, exercise.sets)),
        Line::from(""),
        Line::from(format!("{} reps", exercise.reps).cyan()),
        Line::from(""),
        Line::from(exercise.notes),
    ];
    frame.render_widget(centered(text, "Exercise"), area);
}

fn render_rest<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let state = app.machine().state();
    let timer_style = if state.rest_remaining <= REST_WARNING_SECS {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().bold()
    };

    let text = vec![
        Line::from("REST"),
        Line::from(""),
        Line::styled(format_clock(state.rest_remaining), timer_style),
        Line::from(""),
        Line::from(format!("Next: Set {}", state.set_index + 2)),
    ];
    frame.render_widget(centered(text, "Rest"), area);
}

fn render_ready<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let machine = app.machine();
    let name = machine.current_exercise().map(|e| e.name).unwrap_or_default();
    let text = vec![
        Line::from("GET READY"),
        Line::from(name.bold()),
        Line::from(format!("Set {}", machine.state().set_index + 1)),
        Line::from(""),
        Line::from(machine.state().countdown.to_string().yellow().bold()),
    ];
    frame.render_widget(centered(text, "Ready"), area);
}

fn render_done<S: KeyValueStore, C: Clock>(app: &App<S, C>, frame: &mut Frame, area: Rect) {
    let Some(summary) = app.machine().summary() else {
        return;
    };
    let text = vec![
        Line::from("WORKOUT COMPLETE!".bold().green()),
        Line::from(""),
        Line::from(format!("Duration: {} min", summary.duration_minutes)),
        Line::from(format!("Exercises: {}", summary.exercises)),
        Line::from(format!("Total Sets: {}", summary.total_sets)),
    ];
    frame.render_widget(centered(text, "Done"), area);
}

fn render_confirm(frame: &mut Frame, area: Rect) {
    let popup = Rect {
        x: area.width.saturating_sub(44) / 2,
        y: area.height.saturating_sub(5) / 2,
        width: area.width.min(44),
        height: area.height.min(5),
    };
    let dialog = Paragraph::new(vec![
        Line::from("Exit workout? Progress will not be saved."),
        Line::from("y: exit | n: keep going"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Confirm"));

    frame.render_widget(Clear, popup);
    frame.render_widget(dialog, popup);
}
