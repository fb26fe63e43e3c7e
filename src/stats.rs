//! Workout history statistics

use crate::db::WorkoutRecord;

/// Read-only view over the workout history
pub struct Analytics<'a> {
    history: &'a [WorkoutRecord],
}

impl<'a> Analytics<'a> {
    pub fn new(history: &'a [WorkoutRecord]) -> Self {
        Self { history }
    }

    pub fn total_workouts(&self) -> usize {
        self.history.len()
    }

    /// Total training time in minutes
    pub fn total_minutes(&self) -> u32 {
        self.history.iter().map(|w| w.duration).sum()
    }

    pub fn average_minutes(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.total_minutes() as f64 / self.history.len() as f64)
    }

    /// Number of sessions recorded during a program week
    pub fn workouts_in_week(&self, week: u32) -> usize {
        self.history.iter().filter(|w| w.week == week).count()
    }

    pub fn last_workout(&self) -> Option<&'a WorkoutRecord> {
        self.history.last()
    }

    /// Get training frequency (sessions per week)
    pub fn weekly_frequency(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.first(), self.history.last()) else {
            return 0.0;
        };
        if self.history.len() < 2 {
            return 0.0;
        }

        let days = (last.date - first.date).num_days() as f64;
        if days <= 0.0 {
            return self.history.len() as f64;
        }

        (self.history.len() as f64 / days) * 7.0
    }
}
