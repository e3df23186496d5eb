//! Timetable (solution) model.
//!
//! A timetable is the working assignment set built up during a
//! generation run, plus the conflicts recorded for sessions that could
//! not be placed. Every assignment present has passed hard validation
//! at the moment it was accepted; the exact solver's backtracking is
//! the only thing that revokes one.

use serde::{Deserialize, Serialize};

/// One placed session: a (program, faculty, classroom, slot) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Program the session belongs to.
    pub program_id: String,
    /// Faculty member teaching it.
    pub faculty_id: String,
    /// Room it is held in.
    pub classroom_id: String,
    /// Slot identifier.
    pub slot_id: String,
    /// Dense slot index (canonical key for booking checks).
    pub slot_index: usize,
    /// Session length in minutes (for workload accounting).
    pub minutes: u32,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        program_id: impl Into<String>,
        faculty_id: impl Into<String>,
        classroom_id: impl Into<String>,
        slot_id: impl Into<String>,
        slot_index: usize,
        minutes: u32,
    ) -> Self {
        Self {
            program_id: program_id.into(),
            faculty_id: faculty_id.into(),
            classroom_id: classroom_id.into(),
            slot_id: slot_id.into(),
            slot_index,
            minutes,
        }
    }
}

/// Which hard constraint a rejected placement failed.
///
/// Ordering mirrors the validation order: the first failed check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Faculty not available in the slot.
    FacultyUnavailable,
    /// Classroom not available in the slot.
    ClassroomUnavailable,
    /// Faculty already teaching in the slot.
    FacultyDoubleBooked,
    /// Classroom already occupied in the slot.
    ClassroomDoubleBooked,
    /// Room capacity below the enrollment floor.
    InsufficientCapacity,
    /// Program needs a lab but the room is not one.
    LabRequired,
    /// Placement would push the faculty past the weekly hour cap.
    WorkloadExceeded,
    /// A preference flagged `is_hard` would be violated.
    HardPreferenceViolated,
    /// No candidate placement survived validation at all.
    Unplaceable,
}

/// A recorded failure to place a required session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// The hard constraint that failed.
    pub reason: ConflictReason,
    /// Program whose session could not be placed.
    pub program_id: String,
    /// Session ordinal within the week (0-based).
    pub session: u32,
    /// Slot involved, when the failure is slot-specific.
    pub slot_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Conflict {
    /// Records a session for which no candidate placement validated.
    pub fn unplaceable(program_id: impl Into<String>, session: u32) -> Self {
        let program_id = program_id.into();
        let message = format!(
            "no valid (faculty, classroom, slot) placement for session {} of program '{}'",
            session + 1,
            program_id
        );
        Self {
            reason: ConflictReason::Unplaceable,
            program_id,
            session,
            slot_id: None,
            message,
        }
    }

    /// Records a slot-specific rejection.
    pub fn at_slot(
        reason: ConflictReason,
        program_id: impl Into<String>,
        session: u32,
        slot_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reason,
            program_id: program_id.into(),
            session,
            slot_id: Some(slot_id.into()),
            message: message.into(),
        }
    }
}

/// The working assignment set of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    assignments: Vec<Assignment>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assignment. Callers validate first.
    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Removes and returns the most recent assignment (backtracking).
    pub fn pop(&mut self) -> Option<Assignment> {
        self.assignments.pop()
    }

    /// All assignments in placement order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Consumes the timetable, yielding its assignments.
    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }

    /// Number of placed sessions.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Whether the faculty member already teaches in the slot.
    pub fn is_faculty_busy(&self, faculty_id: &str, slot_index: usize) -> bool {
        self.assignments
            .iter()
            .any(|a| a.slot_index == slot_index && a.faculty_id == faculty_id)
    }

    /// Whether the classroom is already occupied in the slot.
    pub fn is_classroom_busy(&self, classroom_id: &str, slot_index: usize) -> bool {
        self.assignments
            .iter()
            .any(|a| a.slot_index == slot_index && a.classroom_id == classroom_id)
    }

    /// Total minutes already assigned to a faculty member.
    pub fn faculty_minutes(&self, faculty_id: &str) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.faculty_id == faculty_id)
            .map(|a| a.minutes)
            .sum()
    }

    /// Number of sessions already placed for a program.
    pub fn sessions_placed(&self, program_id: &str) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.program_id == program_id)
            .count() as u32
    }

    /// All assignments for a faculty member.
    pub fn assignments_for_faculty(&self, faculty_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.faculty_id == faculty_id)
            .collect()
    }

    /// All assignments in a slot.
    pub fn assignments_for_slot(&self, slot_index: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.slot_index == slot_index)
            .collect()
    }
}
