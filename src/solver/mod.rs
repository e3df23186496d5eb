//! Solving strategies.
//!
//! Two placement strategies (a greedy single-pass assigner and an
//! explicit-stack backtracking solver) plus the pluggable candidate
//! ranking they share. Both operate on the same vocabulary:
//!
//! - an [`Obligation`] is one required (program, session-of-week)
//!   placement still needing a (faculty, classroom, slot) triple;
//! - a [`Candidate`] is one such triple, by input index;
//! - a [`SearchBudget`] bounds wall time and iterations;
//! - a [`Strategy`] turns obligations plus a seed timetable into a
//!   [`PartialOutcome`].
//!
//! Obligations are handed to strategies in scarcity order — fewest
//! compatible (classroom, slot) combinations first — which minimizes
//! late-stage deadlock and backtracking.

mod exact;
mod greedy;
mod rank;

pub use exact::ExactSolver;
pub use greedy::GreedyAssigner;
pub use rank::{CandidateRanker, RankContext, ScarcityRanker, WeightedRanker};

use std::time::{Duration, Instant};

use itertools::{iproduct, Itertools};

use crate::constraints::ConstraintChecker;
use crate::models::{Classroom, Conflict, Faculty, Program, TimeGrid, Timetable};

/// One required (program, session-of-week) placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obligation {
    /// Index of the program in the input slice.
    pub program: usize,
    /// Session ordinal within the week (0-based).
    pub session: u32,
}

/// A candidate (faculty, classroom, slot) triple, by input index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the faculty slice.
    pub faculty: usize,
    /// Index into the classroom slice.
    pub classroom: usize,
    /// Dense slot index.
    pub slot_index: usize,
}

/// Wall-time and iteration budget for a generation run.
///
/// One budget spans all strategies of a run; the hybrid escalation
/// inherits whatever the greedy pass left over. Exhaustion is checked
/// at every candidate trial so a single pathological branch cannot
/// blow the limit.
#[derive(Debug)]
pub struct SearchBudget {
    started: Instant,
    time_limit: Duration,
    max_iterations: u64,
    used: u64,
}

impl SearchBudget {
    /// Creates a budget running from now.
    pub fn new(time_limit: Duration, max_iterations: u64) -> Self {
        Self {
            started: Instant::now(),
            time_limit,
            max_iterations,
            used: 0,
        }
    }

    /// Consumes one iteration. Returns `false`, without consuming,
    /// once the time or iteration limit is reached.
    pub fn consume(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        self.used += 1;
        true
    }

    /// Whether either limit has been reached.
    pub fn exhausted(&self) -> bool {
        self.used >= self.max_iterations || self.started.elapsed() >= self.time_limit
    }

    /// Iterations consumed so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Wall time elapsed since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a strategy produced: the (possibly partial) timetable, the
/// conflicts for sessions it could not place, and whether every
/// obligation was placed.
#[derive(Debug)]
pub struct PartialOutcome {
    /// Assignments accepted so far (seed included).
    pub timetable: Timetable,
    /// One conflict per unplaced obligation.
    pub conflicts: Vec<Conflict>,
    /// Whether all obligations were placed.
    pub complete: bool,
}

/// A placement strategy.
///
/// Strategies receive the obligation list (scarcity-ordered), a seed
/// timetable whose placements must be preserved, the shared constraint
/// checker, and the run budget. They never revoke seed placements;
/// only the exact solver's own backtracking revokes its own.
pub trait Strategy: std::fmt::Debug {
    /// Strategy name, recorded in diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to place every obligation not already covered by the
    /// seed. Returns a best-effort outcome when the budget runs out.
    fn attempt(
        &self,
        obligations: &[Obligation],
        seed: Timetable,
        checker: &ConstraintChecker<'_>,
        budget: &mut SearchBudget,
    ) -> PartialOutcome;
}

/// Expands programs into obligations, most-constrained-first.
///
/// Scarcity is the number of compatible (classroom, slot) combinations:
/// rooms that pass the lab and enrollment-floor checks, counted per
/// slot they are available in. Ties break on the lower program id.
pub fn scarcity_ordered_obligations(
    checker: &ConstraintChecker<'_>,
    grid: &TimeGrid,
) -> Vec<Obligation> {
    let programs = checker.programs();
    let scarcity: Vec<usize> = programs
        .iter()
        .map(|p| room_slot_combinations(p, checker, grid))
        .collect();
    let order = (0..programs.len())
        .sorted_by(|&a, &b| {
            scarcity[a]
                .cmp(&scarcity[b])
                .then_with(|| programs[a].id.cmp(&programs[b].id))
        });

    let mut obligations = Vec::new();
    for idx in order {
        for session in 0..programs[idx].sessions_per_week {
            obligations.push(Obligation {
                program: idx,
                session,
            });
        }
    }
    obligations
}

fn room_slot_combinations(
    program: &Program,
    checker: &ConstraintChecker<'_>,
    grid: &TimeGrid,
) -> usize {
    let floor = checker.enrollment_floor(program);
    checker
        .all_classrooms()
        .iter()
        .filter(|c| room_compatible(program, c, floor))
        .map(|c| (0..grid.len()).filter(|&s| c.is_available(s)).count())
        .sum()
}

fn room_compatible(program: &Program, classroom: &Classroom, floor: u32) -> bool {
    (!program.needs_lab || classroom.is_lab) && classroom.capacity >= floor
}

fn faculty_compatible(program: &Program, faculty: &Faculty) -> bool {
    faculty.qualifies_for(&program.required_expertise)
}

/// Enumerates the candidate triples for a program: qualified faculty ×
/// compatible rooms × all slots, in input/index order. Availability and
/// booking state are left to hard validation.
pub fn compatible_candidates(
    program: &Program,
    checker: &ConstraintChecker<'_>,
    grid: &TimeGrid,
) -> Vec<Candidate> {
    let floor = checker.enrollment_floor(program);
    let qualified = checker
        .all_faculty()
        .iter()
        .enumerate()
        .filter(|(_, f)| faculty_compatible(program, f))
        .map(|(fi, _)| fi);
    let rooms = checker
        .all_classrooms()
        .iter()
        .enumerate()
        .filter(|(_, c)| room_compatible(program, c, floor))
        .map(|(ci, _)| ci);

    iproduct!(qualified, rooms, 0..grid.len())
        .map(|(faculty, classroom, slot_index)| Candidate {
            faculty,
            classroom,
            slot_index,
        })
        .collect()
}

/// Obligations the seed timetable has not yet covered.
///
/// A program with `k` sessions already placed keeps its obligations
/// with ordinal `>= k`.
pub fn pending_obligations(
    obligations: &[Obligation],
    seed: &Timetable,
    programs: &[Program],
) -> Vec<Obligation> {
    obligations
        .iter()
        .copied()
        .filter(|ob| ob.session >= seed.sessions_placed(&programs[ob.program].id))
        .collect()
}

/// Builds a throwaway assignment for stateless preference probing.
/// The slot id is left empty — preference matching keys on the index.
pub(crate) fn probe_assignment(
    program: &Program,
    faculty: &Faculty,
    classroom: &Classroom,
    slot_index: usize,
) -> crate::models::Assignment {
    crate::models::Assignment::new(
        &program.id,
        &faculty.id,
        &classroom.id,
        "",
        slot_index,
        program.session_minutes,
    )
}

/// Builds the assignment a candidate describes.
pub(crate) fn assignment_for(
    program: &Program,
    candidate: Candidate,
    checker: &ConstraintChecker<'_>,
    grid: &TimeGrid,
) -> crate::models::Assignment {
    let slot_id = grid
        .slot(candidate.slot_index)
        .map(|s| s.id.clone())
        .unwrap_or_default();
    crate::models::Assignment::new(
        &program.id,
        &checker.all_faculty()[candidate.faculty].id,
        &checker.all_classrooms()[candidate.classroom].id,
        slot_id,
        candidate.slot_index,
        program.session_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotMask, Weekday};

    fn grid() -> TimeGrid {
        TimeGrid::weekday_grid(&[Weekday::Monday], 4, 9 * 60, 60)
    }

    #[test]
    fn test_budget_iteration_limit() {
        let mut b = SearchBudget::new(Duration::from_secs(60), 3);
        assert!(b.consume());
        assert!(b.consume());
        assert!(b.consume());
        assert!(!b.consume());
        assert!(b.exhausted());
        assert_eq!(b.used(), 3);
    }

    #[test]
    fn test_budget_zero_time() {
        let mut b = SearchBudget::new(Duration::ZERO, 100);
        assert!(!b.consume());
        assert_eq!(b.used(), 0);
    }

    #[test]
    fn test_scarcity_orders_most_constrained_first() {
        let grid = grid();
        // "wide" fits both rooms, "narrow" needs the lab.
        let programs = vec![
            Program::new("wide").with_max_students(10),
            Program::new("narrow").with_max_students(10).with_lab_required(),
        ];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![
            Classroom::new("R1", 20, grid.len()),
            Classroom::new("L1", 20, grid.len()).as_lab("computing"),
        ];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);

        let obligations = scarcity_ordered_obligations(&checker, &grid);
        assert_eq!(obligations.len(), 2);
        // narrow (index 1) has 4 combos, wide has 8 → narrow first.
        assert_eq!(obligations[0].program, 1);
        assert_eq!(obligations[1].program, 0);
    }

    #[test]
    fn test_scarcity_tie_breaks_by_id() {
        let grid = grid();
        let programs = vec![
            Program::new("b").with_max_students(10),
            Program::new("a").with_max_students(10),
        ];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);

        let obligations = scarcity_ordered_obligations(&checker, &grid);
        assert_eq!(obligations[0].program, 1); // "a"
        assert_eq!(obligations[1].program, 0); // "b"
    }

    #[test]
    fn test_sessions_expand_in_order() {
        let grid = grid();
        let programs = vec![Program::new("p").with_sessions_per_week(3)];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);

        let obligations = scarcity_ordered_obligations(&checker, &grid);
        let sessions: Vec<u32> = obligations.iter().map(|o| o.session).collect();
        assert_eq!(sessions, vec![0, 1, 2]);
    }

    #[test]
    fn test_compatible_candidates_filters() {
        let grid = grid();
        let programs = vec![Program::new("p")
            .with_expertise("chem")
            .with_max_students(25)
            .with_lab_required()];
        let faculty = vec![
            Faculty::new("F1", grid.len()).with_expertise("chem"),
            Faculty::new("F2", grid.len()).with_expertise("math"),
        ];
        let classrooms = vec![
            Classroom::new("R1", 30, grid.len()),                    // Not a lab
            Classroom::new("L1", 30, grid.len()).as_lab("chem"),     // Fits
            Classroom::new("L2", 20, grid.len()).as_lab("chem"),     // Too small
        ];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);

        let candidates = compatible_candidates(&programs[0], &checker, &grid);
        // 1 qualified faculty × 1 compatible room × 4 slots.
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.faculty == 0 && c.classroom == 1));
    }

    #[test]
    fn test_pending_obligations_respects_seed() {
        let programs = vec![Program::new("p").with_sessions_per_week(2)];
        let obligations = vec![
            Obligation { program: 0, session: 0 },
            Obligation { program: 0, session: 1 },
        ];
        let mut seed = Timetable::new();
        seed.push(crate::models::Assignment::new("p", "F1", "R1", "Monday-0", 0, 60));

        let pending = pending_obligations(&obligations, &seed, &programs);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].session, 1);
    }

    #[test]
    fn test_restricted_room_availability_lowers_scarcity() {
        let grid = grid();
        let programs = vec![Program::new("p").with_max_students(10)];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms =
            vec![Classroom::new("R1", 20, grid.len())
                .with_availability(SlotMask::from_indices(grid.len(), &[0, 1]))];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        assert_eq!(room_slot_combinations(&programs[0], &checker, &grid), 2);
    }
}
