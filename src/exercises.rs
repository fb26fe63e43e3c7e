//! Exercise definitions - the 12-week program catalog

use chrono::Weekday;

/// One of the three 4-week blocks of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramPhase {
    Weeks1To4,
    Weeks5To8,
    Weeks9To12,
}

impl ProgramPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ProgramPhase::Weeks1To4 => "Weeks 1-4",
            ProgramPhase::Weeks5To8 => "Weeks 5-8",
            ProgramPhase::Weeks9To12 => "Weeks 9-12",
        }
    }

    /// Heading shown above the day's exercise list
    pub fn title(&self) -> &'static str {
        match self {
            ProgramPhase::Weeks1To4 | ProgramPhase::Weeks5To8 => "Foundation",
            ProgramPhase::Weeks9To12 => "Building Strength",
        }
    }

    /// Weekdays on which this phase trains
    pub fn training_days(&self) -> &'static [Weekday] {
        match self {
            ProgramPhase::Weeks1To4 | ProgramPhase::Weeks5To8 => &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
            ProgramPhase::Weeks9To12 => &[Weekday::Mon, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        }
    }

    /// Cool-down steps, if the phase has any
    pub fn cooldown(&self) -> Option<&'static [&'static str]> {
        match self {
            ProgramPhase::Weeks1To4 => None,
            ProgramPhase::Weeks5To8 => Some(COOLDOWN_W5_W8),
            ProgramPhase::Weeks9To12 => Some(COOLDOWN_W9_W12),
        }
    }
}

/// Weeks 9-12 alternate between two exercise lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayVariant {
    A,
    B,
}

impl DayVariant {
    pub fn label(&self) -> &'static str {
        match self {
            DayVariant::A => "A",
            DayVariant::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: &'static str,
    pub sets: u32,
    pub reps: &'static str, // "8-12", "75s" - shown as is
    pub rest_secs: u32,
    pub notes: &'static str,
}

pub const WARMUP: &[&str] = &[
    "Jumping jacks - 30 seconds",
    "Arm circles - 20 each way",
    "Leg swings - 10 each leg",
    "Squats - 10 reps",
    "Cat-cow - 10 reps",
];

const COOLDOWN_W5_W8: &[&str] = &[
    "Child's pose - 30 seconds",
    "Chest doorway stretch - 30 seconds each side",
    "Hip flexor stretch - 30 seconds each leg",
    "Seated hamstring stretch - 45 seconds",
];

const COOLDOWN_W9_W12: &[&str] = &[
    "Brisk walking - 20-30 minutes",
    "Casual cycling - 20-30 minutes",
    "Light jogging - 15-20 minutes (only if comfortable)",
    "Jump rope - 5-10 minutes (build up gradually)",
];

pub const EXERCISES_W1_W4: &[Exercise] = &[
    Exercise {
        name: "PUSH-UPS",
        sets: 3,
        reps: "5-8",
        rest_secs: 90,
        notes: "On knees if needed. Chest to floor, elbows 45°",
    },
    Exercise {
        name: "SQUATS",
        sets: 3,
        reps: "10-12",
        rest_secs: 60,
        notes: "Thighs parallel, chest up",
    },
    Exercise {
        name: "INVERTED ROWS",
        sets: 3,
        reps: "5-8",
        rest_secs: 90,
        notes: "Under table, pull chest to edge",
    },
    Exercise {
        name: "GLUTE BRIDGES",
        sets: 3,
        reps: "12-15",
        rest_secs: 60,
        notes: "Squeeze glutes for 2 seconds at top",
    },
    Exercise {
        name: "PLANK",
        sets: 2,
        reps: "75s or more/less",
        rest_secs: 60,
        notes: "Straight line, don't sag",
    },
    Exercise {
        name: "WALL SLIDES",
        sets: 2,
        reps: "10",
        rest_secs: 45,
        notes: "Back flat against wall",
    },
];

pub const EXERCISES_W5_W8: &[Exercise] = &[
    Exercise {
        name: "PUSH-UPS",
        sets: 3,
        reps: "8-12",
        rest_secs: 90,
        notes: "Do regular push-ups if you can, not on knees",
    },
    Exercise {
        name: "GOBLET SQUATS",
        sets: 3,
        reps: "10-12",
        rest_secs: 75,
        notes: "Fill up backpack, 2-5kg load, chest up",
    },
    Exercise {
        name: "INVERTED ROWS",
        sets: 3,
        reps: "8-12",
        rest_secs: 90,
        notes: "Feet elevated on chair if too easy",
    },
    Exercise {
        name: "SINGLE-LEG GLUTE BRIDGES",
        sets: 3,
        reps: "8-10",
        rest_secs: 60,
        notes: "Harder variation for glutes/hamstrings",
    },
    Exercise {
        name: "SIDE PLANK",
        sets: 3,
        reps: "20-30s per side",
        rest_secs: 60,
        notes: "Build oblique strength",
    },
    Exercise {
        name: "SUPERMAN HOLDS",
        sets: 3,
        reps: "15-20s",
        rest_secs: 60,
        notes: "Lower back/posture strength",
    },
    Exercise {
        name: "DEAD HANGS",
        sets: 2,
        reps: "20-30s",
        rest_secs: 60,
        notes: "Grip + shoulder health",
    },
];

/// Weeks 9-12, day A (Monday/Thursday): horizontal push/pull, single-leg work
pub const EXERCISES_W9_W12_A: &[Exercise] = &[
    Exercise {
        name: "DECLINE PUSH-UPS",
        sets: 4,
        reps: "8-12",
        rest_secs: 90,
        notes: "Feet on chair, body in one line",
    },
    Exercise {
        name: "BULGARIAN SPLIT SQUATS",
        sets: 3,
        reps: "8-10 per leg",
        rest_secs: 75,
        notes: "Rear foot on chair, front knee tracks toes",
    },
    Exercise {
        name: "INVERTED ROWS",
        sets: 4,
        reps: "8-12",
        rest_secs: 90,
        notes: "Feet elevated, pause 1 second at the top",
    },
    Exercise {
        name: "SINGLE-LEG GLUTE BRIDGES",
        sets: 3,
        reps: "10-12",
        rest_secs: 60,
        notes: "Shoulders on couch for longer range",
    },
    Exercise {
        name: "PLANK",
        sets: 3,
        reps: "60s",
        rest_secs: 60,
        notes: "Squeeze glutes, ribs down",
    },
];

/// Weeks 9-12, day B: vertical push, hinge, carries and hangs
pub const EXERCISES_W9_W12_B: &[Exercise] = &[
    Exercise {
        name: "PIKE PUSH-UPS",
        sets: 3,
        reps: "6-10",
        rest_secs: 90,
        notes: "Hips high, head between hands",
    },
    Exercise {
        name: "GOBLET SQUATS",
        sets: 4,
        reps: "12-15",
        rest_secs: 75,
        notes: "Heavier backpack, 3 second descent",
    },
    Exercise {
        name: "SINGLE-LEG ROMANIAN DEADLIFTS",
        sets: 3,
        reps: "8-10 per leg",
        rest_secs: 60,
        notes: "Flat back, reach the free leg behind",
    },
    Exercise {
        name: "SIDE PLANK",
        sets: 3,
        reps: "30-40s per side",
        rest_secs: 60,
        notes: "Top leg raised if too easy",
    },
    Exercise {
        name: "SUPERMAN HOLDS",
        sets: 3,
        reps: "20-30s",
        rest_secs: 60,
        notes: "Arms forward, long neck",
    },
    Exercise {
        name: "DEAD HANGS",
        sets: 3,
        reps: "30-40s",
        rest_secs: 60,
        notes: "Active shoulders, no swinging",
    },
];

/// Exercise list for a phase; the variant only matters for weeks 9-12
pub fn plan_for(phase: ProgramPhase, variant: DayVariant) -> &'static [Exercise] {
    match (phase, variant) {
        (ProgramPhase::Weeks1To4, _) => EXERCISES_W1_W4,
        (ProgramPhase::Weeks5To8, _) => EXERCISES_W5_W8,
        (ProgramPhase::Weeks9To12, DayVariant::A) => EXERCISES_W9_W12_A,
        (ProgramPhase::Weeks9To12, DayVariant::B) => EXERCISES_W9_W12_B,
    }
}

/// Sum of target sets across a plan
pub fn total_sets(plan: &[Exercise]) -> u32 {
    plan.iter().map(|e| e.sets).sum()
}
