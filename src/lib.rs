//! workout-coach - 12-week bodyweight program coach
//!
//! Warm-up, set/rest cycling, cool-down and a local workout history.

pub mod clock;
pub mod db;
pub mod exercises;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod timer;
pub mod tui;

pub use db::Database;
pub use session::SessionMachine;
