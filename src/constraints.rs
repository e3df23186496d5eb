//! Hard-constraint validation and soft-preference scoring.
//!
//! The constraint model classifies an attempted assignment as accepted
//! or rejected-with-reason, and computes the soft score used to compare
//! complete results. Hard checks run in a fixed order and the first
//! failure wins, so conflict diagnostics stay stable across strategies.
//!
//! # Scoring
//!
//! The aggregate result score blends two normalized terms:
//! completeness (sessions placed / sessions required) and preference
//! satisfaction (soft score achieved / maximum achievable). The split is
//! `ScoringWeights` — 40% completeness, 60% preferences by default — and
//! is held fixed across strategies so their scores are comparable.

use std::collections::HashMap;

use log::debug;

use crate::models::{
    Assignment, Classroom, ConflictReason, EntityRef, Faculty, Preference, PreferenceKind,
    Program, TimeGrid, Timetable,
};

/// Weight split between completeness and preference satisfaction in the
/// 0–100 result score. Must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    /// Share of the score earned by placing required sessions.
    pub completeness: f64,
    /// Share of the score earned by satisfying soft preferences.
    pub preference: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            completeness: 0.4,
            preference: 0.6,
        }
    }
}

/// Validates candidate assignments and scores results.
///
/// Borrows the run's immutable inputs; one checker is shared by every
/// strategy in a run so validation semantics cannot drift between them.
pub struct ConstraintChecker<'a> {
    programs: &'a [Program],
    faculty: &'a [Faculty],
    classrooms: &'a [Classroom],
    grid: &'a TimeGrid,
    preferences: &'a [Preference],
    min_enrollment: Option<u32>,
    weights: ScoringWeights,
    program_by_id: HashMap<&'a str, &'a Program>,
    faculty_by_id: HashMap<&'a str, &'a Faculty>,
    classroom_by_id: HashMap<&'a str, &'a Classroom>,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker over the run's inputs.
    pub fn new(
        programs: &'a [Program],
        faculty: &'a [Faculty],
        classrooms: &'a [Classroom],
        grid: &'a TimeGrid,
        preferences: &'a [Preference],
    ) -> Self {
        Self {
            programs,
            faculty,
            classrooms,
            grid,
            preferences,
            min_enrollment: None,
            weights: ScoringWeights::default(),
            program_by_id: programs.iter().map(|p| (p.id.as_str(), p)).collect(),
            faculty_by_id: faculty.iter().map(|f| (f.id.as_str(), f)).collect(),
            classroom_by_id: classrooms.iter().map(|c| (c.id.as_str(), c)).collect(),
        }
    }

    /// Sets the enrollment floor used by the capacity check. Rooms only
    /// need to seat `min(floor, program.max_students)`.
    pub fn with_min_enrollment(mut self, floor: u32) -> Self {
        self.min_enrollment = Some(floor);
        self
    }

    /// Overrides the scoring weight split.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Looks up a program by id.
    pub fn program(&self, id: &str) -> Option<&'a Program> {
        self.program_by_id.get(id).copied()
    }

    /// Looks up a faculty member by id.
    pub fn faculty(&self, id: &str) -> Option<&'a Faculty> {
        self.faculty_by_id.get(id).copied()
    }

    /// Looks up a classroom by id.
    pub fn classroom(&self, id: &str) -> Option<&'a Classroom> {
        self.classroom_by_id.get(id).copied()
    }

    /// The preference collection this checker scores against.
    pub fn preferences(&self) -> &'a [Preference] {
        self.preferences
    }

    /// The grid this checker validates against.
    pub fn grid(&self) -> &'a TimeGrid {
        self.grid
    }

    /// The input programs, in input order.
    pub fn programs(&self) -> &'a [Program] {
        self.programs
    }

    /// The input faculty, in input order.
    pub fn all_faculty(&self) -> &'a [Faculty] {
        self.faculty
    }

    /// The input classrooms, in input order.
    pub fn all_classrooms(&self) -> &'a [Classroom] {
        self.classrooms
    }

    /// Total sessions the input programs require per week.
    pub fn required_sessions(&self) -> u32 {
        self.programs.iter().map(|p| p.sessions_per_week).sum()
    }

    /// Seats the candidate program actually needs from a room.
    pub fn enrollment_floor(&self, program: &Program) -> u32 {
        match self.min_enrollment {
            Some(floor) => floor.min(program.max_students),
            None => program.max_students,
        }
    }

    /// Checks a candidate against every hard constraint, in order:
    /// faculty availability, classroom availability, faculty
    /// double-booking, classroom double-booking, capacity, lab
    /// requirement, weekly hour cap, hard preferences. First failure
    /// wins.
    pub fn validate_hard(
        &self,
        candidate: &Assignment,
        timetable: &Timetable,
    ) -> Result<(), ConflictReason> {
        let program = self
            .program(&candidate.program_id)
            .ok_or(ConflictReason::Unplaceable)?;
        let faculty = self
            .faculty(&candidate.faculty_id)
            .ok_or(ConflictReason::Unplaceable)?;
        let classroom = self
            .classroom(&candidate.classroom_id)
            .ok_or(ConflictReason::Unplaceable)?;

        if !faculty.is_available(candidate.slot_index) {
            return Err(ConflictReason::FacultyUnavailable);
        }
        if !classroom.is_available(candidate.slot_index) {
            return Err(ConflictReason::ClassroomUnavailable);
        }
        if timetable.is_faculty_busy(&candidate.faculty_id, candidate.slot_index) {
            return Err(ConflictReason::FacultyDoubleBooked);
        }
        if timetable.is_classroom_busy(&candidate.classroom_id, candidate.slot_index) {
            return Err(ConflictReason::ClassroomDoubleBooked);
        }
        if classroom.capacity < self.enrollment_floor(program) {
            return Err(ConflictReason::InsufficientCapacity);
        }
        if program.needs_lab && !classroom.is_lab {
            return Err(ConflictReason::LabRequired);
        }
        if timetable.faculty_minutes(&candidate.faculty_id) + candidate.minutes
            > faculty.max_minutes_per_week()
        {
            return Err(ConflictReason::WorkloadExceeded);
        }

        for pref in self.preferences.iter().filter(|p| p.is_hard) {
            if pref.applies_to(
                &candidate.faculty_id,
                &candidate.classroom_id,
                &candidate.program_id,
            ) && !preference_satisfied(pref, candidate, timetable, self.grid, false)
            {
                debug!(
                    "hard preference rejected placement of '{}' at {}",
                    candidate.program_id, candidate.slot_id
                );
                return Err(ConflictReason::HardPreferenceViolated);
            }
        }

        Ok(())
    }

    /// Soft score contribution of one assignment: priority-weighted sum
    /// over matching satisfied soft preferences, plus the faculty
    /// preferred-slot bonus.
    ///
    /// `placed` tells the workload check whether the assignment is
    /// already part of `timetable`.
    pub fn score_assignment(
        &self,
        assignment: &Assignment,
        timetable: &Timetable,
        placed: bool,
    ) -> f64 {
        let mut score = 0.0;
        for pref in self.preferences.iter().filter(|p| !p.is_hard) {
            if pref.applies_to(
                &assignment.faculty_id,
                &assignment.classroom_id,
                &assignment.program_id,
            ) && preference_satisfied(pref, assignment, timetable, self.grid, placed)
            {
                score += pref.priority.max(0) as f64;
            }
        }
        score + self.preferred_slot_bonus(assignment)
    }

    /// Maximum soft score this assignment could earn if every matching
    /// soft preference were satisfied.
    pub fn max_assignment_score(&self, assignment: &Assignment) -> f64 {
        let mut max = 0.0;
        for pref in self.preferences.iter().filter(|p| !p.is_hard) {
            if pref.applies_to(
                &assignment.faculty_id,
                &assignment.classroom_id,
                &assignment.program_id,
            ) {
                max += pref.priority.max(0) as f64;
            }
        }
        if self
            .faculty(&assignment.faculty_id)
            .is_some_and(|f| !f.preferred_slots.is_empty())
        {
            max += 1.0;
        }
        max
    }

    /// Rank-weighted bonus when the slot is in the faculty's ordered
    /// preferred list: the first entry is worth 1.0, later entries
    /// proportionally less.
    fn preferred_slot_bonus(&self, assignment: &Assignment) -> f64 {
        let Some(faculty) = self.faculty(&assignment.faculty_id) else {
            return 0.0;
        };
        let n = faculty.preferred_slots.len();
        if n == 0 {
            return 0.0;
        }
        match faculty
            .preferred_slots
            .iter()
            .position(|&s| s == assignment.slot_index)
        {
            Some(pos) => (n - pos) as f64 / n as f64,
            None => 0.0,
        }
    }

    /// Normalized 0–100 score for a (possibly partial) result.
    ///
    /// `completeness_weight × placed/required +
    /// preference_weight × achieved/max_achievable`, scaled to 100.
    /// A conflict-free, complete result with no applicable preferences
    /// earns the full preference term.
    pub fn score_result(&self, timetable: &Timetable) -> f64 {
        let required = self.required_sessions();
        let completeness = if required == 0 {
            1.0
        } else {
            timetable.len() as f64 / required as f64
        };

        let mut achieved = 0.0;
        let mut max = 0.0;
        for assignment in timetable.assignments() {
            achieved += self.score_assignment(assignment, timetable, true);
            max += self.max_assignment_score(assignment);
        }
        let preference = if max == 0.0 { 1.0 } else { achieved / max };

        let score =
            (self.weights.completeness * completeness + self.weights.preference * preference)
                * 100.0;
        score.clamp(0.0, 100.0)
    }
}

/// Whether one preference is satisfied by an assignment.
///
/// `placed` indicates the assignment is already part of `timetable`
/// (result scoring) rather than a candidate under validation — the
/// daily workload count must not double-count it.
pub fn preference_satisfied(
    pref: &Preference,
    assignment: &Assignment,
    timetable: &Timetable,
    grid: &TimeGrid,
    placed: bool,
) -> bool {
    match &pref.kind {
        PreferenceKind::TimePreference { slots } => slots.contains(&assignment.slot_index),
        PreferenceKind::RoomPreference { classroom_id } => {
            assignment.classroom_id == *classroom_id
        }
        PreferenceKind::WorkloadPreference {
            max_sessions_per_day,
        } => {
            let EntityRef::Faculty(faculty_id) = &pref.entity else {
                // Daily workload only means something for faculty.
                return true;
            };
            let Some(day) = grid.slot(assignment.slot_index).map(|s| s.day) else {
                return true;
            };
            let mut count: u32 = timetable
                .assignments_for_faculty(faculty_id)
                .iter()
                .filter(|a| grid.slot(a.slot_index).map(|s| s.day) == Some(day))
                .count() as u32;
            if !placed && assignment.faculty_id == *faculty_id {
                count += 1;
            }
            count <= *max_sessions_per_day
        }
    }
}
