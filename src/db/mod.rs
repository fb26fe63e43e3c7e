//! Database module - key-value storage for the program record

use std::collections::HashMap;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Key the whole program record is stored under
pub const STORAGE_KEY: &str = "workoutData";

/// One completed workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub completed: bool,
    pub week: u32,
    pub exercises_done: u32,
    pub duration: u32, // minutes
}

/// Persisted program: start date plus append-only history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramState {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub workout_history: Vec<WorkoutRecord>,
}

impl ProgramState {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            workout_history: Vec::new(),
        }
    }
}

/// Opaque get/set storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// In-memory store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the program record. Missing, unreadable and malformed data all mean
/// "not configured yet".
pub fn load_program(store: &impl KeyValueStore) -> Option<ProgramState> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No saved program found");
            return None;
        }
        Err(e) => {
            warn!("Failed to read saved program: {:#}", e);
            return None;
        }
    };

    match serde_json::from_str::<ProgramState>(&raw) {
        Ok(program) => {
            debug!(
                "Loaded program started {} with {} workouts",
                program.start_date,
                program.workout_history.len()
            );
            Some(program)
        }
        Err(e) => {
            warn!("Ignoring malformed saved program: {}", e);
            None
        }
    }
}

/// Overwrite the stored program record. Best effort: failures are logged and
/// reported as `false`.
pub fn save_program(store: &mut impl KeyValueStore, program: &ProgramState) -> bool {
    let data = match serde_json::to_string(program) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to serialize program: {}", e);
            return false;
        }
    };

    match store.set(STORAGE_KEY, &data) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save program: {:#}", e);
            false
        }
    }
}
