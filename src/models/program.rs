//! Program (course offering) model.
//!
//! A program is one course offering to be timetabled: it needs
//! `sessions_per_week` placements of `session_minutes` each, a qualified
//! faculty member, and a classroom large enough for its enrollment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A course offering to be scheduled.
///
/// Immutable input for a generation run. The weekly session count is
/// implied by credits upstream; here it arrives as a plain number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier.
    pub id: String,
    /// Owning department.
    pub department: String,
    /// Semester the offering belongs to.
    pub semester: u8,
    /// Length of one session in minutes.
    pub session_minutes: u32,
    /// Required placements per week.
    pub sessions_per_week: u32,
    /// Whether sessions must be held in a lab classroom.
    pub needs_lab: bool,
    /// Expertise tags a faculty member must overlap with.
    pub required_expertise: BTreeSet<String>,
    /// Expected enrollment ceiling.
    pub max_students: u32,
    /// Scheduling priority (higher = more important).
    pub priority: i32,
}

impl Program {
    /// Creates a program with one 60-minute weekly session and no
    /// special requirements.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            department: String::new(),
            semester: 1,
            session_minutes: 60,
            sessions_per_week: 1,
            needs_lab: false,
            required_expertise: BTreeSet::new(),
            max_students: 0,
            priority: 0,
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    /// Sets the per-session duration in minutes.
    pub fn with_session_minutes(mut self, minutes: u32) -> Self {
        self.session_minutes = minutes;
        self
    }

    /// Sets the weekly session count.
    pub fn with_sessions_per_week(mut self, sessions: u32) -> Self {
        self.sessions_per_week = sessions;
        self
    }

    /// Requires a lab classroom.
    pub fn with_lab_required(mut self) -> Self {
        self.needs_lab = true;
        self
    }

    /// Adds a required expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.required_expertise.insert(tag.into());
        self
    }

    /// Sets the enrollment ceiling.
    pub fn with_max_students(mut self, max_students: u32) -> Self {
        self.max_students = max_students;
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Total weekly teaching minutes this program demands.
    pub fn weekly_minutes(&self) -> u32 {
        self.session_minutes * self.sessions_per_week
    }
}
