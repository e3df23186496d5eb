//! Scheduling preferences.
//!
//! Preferences arrive pre-classified: a closed variant enumeration with
//! structured fields, an entity reference, a priority, and a hard flag.
//! They are parsed once at ingestion — the scheduling loop only matches
//! on the enum, never re-interprets payload strings.
//!
//! A soft preference (the default) only affects the score. A preference
//! with `is_hard = true` is enforced by hard validation: violating it
//! rejects the placement outright.

use serde::{Deserialize, Serialize};

/// The entity a preference attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    /// A faculty member, by id.
    Faculty(String),
    /// A classroom, by id.
    Classroom(String),
    /// A program, by id.
    Program(String),
}

impl EntityRef {
    /// The referenced entity id.
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Faculty(id) | EntityRef::Classroom(id) | EntityRef::Program(id) => id,
        }
    }
}

/// What is being preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    /// The entity's sessions should land in one of these slots.
    TimePreference { slots: Vec<usize> },
    /// The entity's sessions should be held in this classroom.
    RoomPreference { classroom_id: String },
    /// The entity should teach at most this many sessions on any one day.
    WorkloadPreference { max_sessions_per_day: u32 },
}

/// A single classified preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    /// The entity this preference belongs to.
    pub entity: EntityRef,
    /// The structured preference payload.
    pub kind: PreferenceKind,
    /// Weight in scoring (higher = more important).
    pub priority: i32,
    /// When true, a violation invalidates the placement instead of
    /// lowering its score.
    pub is_hard: bool,
}

impl Preference {
    /// Creates a soft preference.
    pub fn new(entity: EntityRef, kind: PreferenceKind, priority: i32) -> Self {
        Self {
            entity,
            kind,
            priority,
            is_hard: false,
        }
    }

    /// Creates a time preference for a faculty member.
    pub fn faculty_time(id: impl Into<String>, slots: Vec<usize>, priority: i32) -> Self {
        Self::new(
            EntityRef::Faculty(id.into()),
            PreferenceKind::TimePreference { slots },
            priority,
        )
    }

    /// Creates a room preference for a program.
    pub fn program_room(
        id: impl Into<String>,
        classroom_id: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self::new(
            EntityRef::Program(id.into()),
            PreferenceKind::RoomPreference {
                classroom_id: classroom_id.into(),
            },
            priority,
        )
    }

    /// Creates a daily workload preference for a faculty member.
    pub fn faculty_workload(id: impl Into<String>, max_sessions_per_day: u32, priority: i32) -> Self {
        Self::new(
            EntityRef::Faculty(id.into()),
            PreferenceKind::WorkloadPreference {
                max_sessions_per_day,
            },
            priority,
        )
    }

    /// Escalates this preference to a hard constraint.
    pub fn hard(mut self) -> Self {
        self.is_hard = true;
        self
    }

    /// Whether this preference attaches to any of the given entities.
    pub fn applies_to(&self, faculty_id: &str, classroom_id: &str, program_id: &str) -> bool {
        match &self.entity {
            EntityRef::Faculty(id) => id == faculty_id,
            EntityRef::Classroom(id) => id == classroom_id,
            EntityRef::Program(id) => id == program_id,
        }
    }
}
