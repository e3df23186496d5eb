//! Exact backtracking solver.
//!
//! Depth-first search over the obligation list with forward-check
//! pruning: a candidate is validated against the current partial
//! timetable before it is committed, and a dead end pops one level and
//! tries the next candidate there. The search keeps a monotonically
//! improving best-known solution (by placed count, then result score)
//! so budget exhaustion returns the best partial found rather than
//! nothing.
//!
//! The search uses an explicit frame stack — one frame per obligation
//! depth, carrying that depth's ranked candidate list and a cursor —
//! so budget checks happen at every candidate trial and stack depth is
//! bounded by the obligation count, not by recursion.

use std::sync::Arc;

use log::{debug, info, trace};

use crate::constraints::ConstraintChecker;
use crate::models::{Conflict, Timetable};

use super::{
    assignment_for, compatible_candidates, pending_obligations, Candidate, CandidateRanker,
    Obligation, PartialOutcome, RankContext, ScarcityRanker, SearchBudget, Strategy,
};

/// One search-tree level: the ranked candidates for one obligation and
/// a cursor over them.
struct Frame {
    candidates: Vec<Candidate>,
    next: usize,
}

/// Backtracking search over the assignment space.
#[derive(Debug, Clone)]
pub struct ExactSolver {
    ranker: Arc<dyn CandidateRanker>,
}

impl ExactSolver {
    /// Creates a solver with the default scarcity ranking.
    pub fn new() -> Self {
        Self {
            ranker: Arc::new(ScarcityRanker),
        }
    }

    /// Replaces the candidate ranker.
    pub fn with_ranker(mut self, ranker: Arc<dyn CandidateRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    fn frame_for(
        &self,
        obligation: Obligation,
        checker: &ConstraintChecker<'_>,
        ctx: &RankContext<'_>,
    ) -> Frame {
        let program = &checker.programs()[obligation.program];
        let mut candidates = compatible_candidates(program, checker, checker.grid());
        self.ranker.order(program, &mut candidates, ctx);
        Frame {
            candidates,
            next: 0,
        }
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for ExactSolver {
    fn name(&self) -> &'static str {
        "cp_sat"
    }

    fn attempt(
        &self,
        obligations: &[Obligation],
        seed: Timetable,
        checker: &ConstraintChecker<'_>,
        budget: &mut SearchBudget,
    ) -> PartialOutcome {
        let mut timetable = seed;
        let pending = pending_obligations(obligations, &timetable, checker.programs());
        if pending.is_empty() {
            return PartialOutcome {
                timetable,
                conflicts: Vec::new(),
                complete: true,
            };
        }

        let ctx = RankContext {
            faculty: checker.all_faculty(),
            classrooms: checker.all_classrooms(),
            grid: checker.grid(),
            preferences: checker.preferences(),
        };
        info!(
            "exact search: {} obligations, {} seeded placements, ranker '{}'",
            pending.len(),
            timetable.len(),
            self.ranker.name()
        );

        let mut best_table = timetable.clone();
        let mut best_score = checker.score_result(&best_table);
        let mut complete = false;

        let mut stack: Vec<Frame> = vec![self.frame_for(pending[0], checker, &ctx)];

        'search: while !stack.is_empty() {
            let depth = stack.len() - 1;
            let program = &checker.programs()[pending[depth].program];

            // Advance this frame's cursor to its next valid candidate.
            let mut advanced = false;
            if let Some(frame) = stack.last_mut() {
                while frame.next < frame.candidates.len() {
                    if !budget.consume() {
                        debug!(
                            "exact search budget exhausted after {} iterations",
                            budget.used()
                        );
                        break 'search;
                    }
                    let candidate = frame.candidates[frame.next];
                    frame.next += 1;

                    let assignment = assignment_for(program, candidate, checker, checker.grid());
                    if checker.validate_hard(&assignment, &timetable).is_ok() {
                        trace!(
                            "depth {depth}: placed '{}' at slot {}",
                            assignment.program_id,
                            assignment.slot_index
                        );
                        timetable.push(assignment);
                        advanced = true;
                        break;
                    }
                }
            }

            if advanced {
                if timetable.len() > best_table.len() {
                    best_table = timetable.clone();
                    best_score = checker.score_result(&best_table);
                } else if timetable.len() == best_table.len() {
                    let score = checker.score_result(&timetable);
                    if score > best_score {
                        best_table = timetable.clone();
                        best_score = score;
                    }
                }

                if stack.len() == pending.len() {
                    // Every obligation placed.
                    complete = true;
                    best_table = timetable.clone();
                    break;
                }
                let next = pending[stack.len()];
                stack.push(self.frame_for(next, checker, &ctx));
            } else {
                // Dead end: drop this frame and retract the placement
                // made by the level below, so it can try its next
                // candidate.
                stack.pop();
                if !stack.is_empty() {
                    timetable.pop();
                }
            }
        }

        let conflicts: Vec<Conflict> = if complete {
            Vec::new()
        } else {
            pending_obligations(&pending, &best_table, checker.programs())
                .iter()
                .map(|ob| Conflict::unplaceable(&checker.programs()[ob.program].id, ob.session))
                .collect()
        };

        info!(
            "exact search done: {}/{} obligations placed, {} iterations",
            pending.len() - conflicts.len(),
            pending.len(),
            budget.used()
        );

        let complete = conflicts.is_empty();
        PartialOutcome {
            timetable: best_table,
            conflicts,
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Faculty, Program, SlotMask, TimeGrid, Weekday};
    use crate::solver::scarcity_ordered_obligations;
    use std::time::Duration;

    fn grid(periods: usize) -> TimeGrid {
        TimeGrid::weekday_grid(&[Weekday::Monday], periods, 9 * 60, 60)
    }

    fn big_budget() -> SearchBudget {
        SearchBudget::new(Duration::from_secs(60), 1_000_000)
    }

    #[test]
    fn test_solves_where_greedy_order_matters() {
        // Two programs, two slots. F1 can only teach slot 0; F2 can
        // teach both. A search must give slot 0 to A (taught by F1)
        // and slot 1 to B.
        let grid = grid(2);
        let programs = vec![
            Program::new("A").with_expertise("x").with_max_students(10),
            Program::new("B").with_expertise("y").with_max_students(10),
        ];
        let faculty = vec![
            Faculty::new("F1", grid.len())
                .with_expertise("x")
                .with_availability(SlotMask::from_indices(grid.len(), &[0])),
            Faculty::new("F2", grid.len()).with_expertise("y"),
        ];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        let outcome =
            ExactSolver::new().attempt(&obligations, Timetable::new(), &checker, &mut big_budget());
        assert!(outcome.complete);
        assert_eq!(outcome.timetable.len(), 2);
    }

    #[test]
    fn test_backtracks_out_of_greedy_trap() {
        // One room, two slots. Program A accepts anyone; program B
        // requires G, who can only teach slot 0. Room-slot scarcity is
        // equal, so A is handled first and its first choice takes
        // slot 0 — completing both then requires backtracking A onto
        // slot 1 so B can have G at slot 0.
        let grid = grid(2);
        let programs = vec![
            Program::new("A").with_max_students(10),
            Program::new("B").with_expertise("y").with_max_students(10),
        ];
        let faculty = vec![
            Faculty::new("F", grid.len()),
            Faculty::new("G", grid.len())
                .with_expertise("y")
                .with_availability(SlotMask::from_indices(grid.len(), &[0])),
        ];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        let outcome =
            ExactSolver::new().attempt(&obligations, Timetable::new(), &checker, &mut big_budget());
        assert!(outcome.complete);
        assert_eq!(outcome.timetable.len(), 2);
        // B ended up with G at slot 0, A elsewhere.
        let b = outcome
            .timetable
            .assignments()
            .iter()
            .find(|a| a.program_id == "B")
            .unwrap();
        assert_eq!(b.faculty_id, "G");
        assert_eq!(b.slot_index, 0);
        let a = outcome
            .timetable
            .assignments()
            .iter()
            .find(|a| a.program_id == "A")
            .unwrap();
        assert_eq!(a.slot_index, 1);
    }

    #[test]
    fn test_infeasible_returns_best_partial() {
        // Two programs, one qualified faculty member, one slot: only
        // one session can ever be placed.
        let grid = grid(1);
        let programs = vec![
            Program::new("A").with_expertise("x").with_max_students(10),
            Program::new("B").with_expertise("x").with_max_students(10),
        ];
        let faculty = vec![Faculty::new("F1", grid.len()).with_expertise("x")];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        let outcome =
            ExactSolver::new().attempt(&obligations, Timetable::new(), &checker, &mut big_budget());
        assert!(!outcome.complete);
        assert_eq!(outcome.timetable.len(), 1);
        assert_eq!(outcome.conflicts.len(), 1);
    }

    #[test]
    fn test_seeded_placements_survive() {
        let grid = grid(3);
        let programs = vec![Program::new("A").with_sessions_per_week(2).with_max_students(10)];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        let mut seed = Timetable::new();
        seed.push(crate::models::Assignment::new("A", "F1", "R1", "Monday-2", 2, 60));

        let outcome = ExactSolver::new().attempt(&obligations, seed, &checker, &mut big_budget());
        assert!(outcome.complete);
        assert_eq!(outcome.timetable.len(), 2);
        assert!(outcome
            .timetable
            .assignments()
            .iter()
            .any(|a| a.slot_index == 2));
    }

    #[test]
    fn test_budget_exhaustion_keeps_best_known() {
        let grid = grid(2);
        let programs = vec![
            Program::new("A").with_max_students(10),
            Program::new("B").with_max_students(10),
        ];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        // One iteration: only the first placement happens.
        let mut budget = SearchBudget::new(Duration::from_secs(60), 1);
        let outcome =
            ExactSolver::new().attempt(&obligations, Timetable::new(), &checker, &mut budget);
        assert!(!outcome.complete);
        assert_eq!(outcome.timetable.len(), 1);
        assert_eq!(outcome.conflicts.len(), 1);
    }

    #[test]
    fn test_empty_pending_is_complete() {
        let grid = grid(2);
        let programs = vec![Program::new("A").with_max_students(10)];
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let checker = ConstraintChecker::new(&programs, &faculty, &classrooms, &grid, &[]);
        let obligations = scarcity_ordered_obligations(&checker, &grid);

        let mut seed = Timetable::new();
        seed.push(crate::models::Assignment::new("A", "F1", "R1", "Monday-0", 0, 60));

        let outcome = ExactSolver::new().attempt(&obligations, seed, &checker, &mut big_budget());
        assert!(outcome.complete);
        assert!(outcome.conflicts.is_empty());
        assert_eq!(outcome.timetable.len(), 1);
    }
}
