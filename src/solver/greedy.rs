//! Greedy single-pass assigner.
//!
//! The fast, deterministic first pass. Obligations arrive
//! most-constrained-first from the orchestrator; for each one the
//! assigner walks the ranked candidate triples and accepts the first
//! that passes hard validation. No backtracking: a session with no
//! valid candidate becomes a conflict and the pass moves on.

use std::sync::Arc;

use log::{debug, info};

use crate::constraints::ConstraintChecker;
use crate::models::{Conflict, Timetable};

use super::{
    assignment_for, compatible_candidates, pending_obligations, CandidateRanker, Obligation,
    PartialOutcome, RankContext, ScarcityRanker, SearchBudget, Strategy,
};

/// Single-pass heuristic placement.
#[derive(Debug, Clone)]
pub struct GreedyAssigner {
    ranker: Arc<dyn CandidateRanker>,
}

impl GreedyAssigner {
    /// Creates an assigner with the default scarcity ranking.
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
}

impl Default for GreedyAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for GreedyAssigner {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn attempt(
        &self,
        obligations: &[Obligation],
        seed: Timetable,
        checker: &ConstraintChecker<'_>,
        budget: &mut SearchBudget,
    ) -> PartialOutcome {
        let grid = checker.grid();
        let mut timetable = seed;
        let mut conflicts: Vec<Conflict> = Vec::new();
        let ctx = RankContext {
            faculty: checker.all_faculty(),
            classrooms: checker.all_classrooms(),
            grid,
            preferences: checker.preferences(),
        };

        let pending = pending_obligations(obligations, &timetable, checker.programs());
        info!(
            "greedy pass: {} obligations, ranker '{}'",
            pending.len(),
            self.ranker.name()
        );

        for (i, ob) in pending.iter().enumerate() {
            let program = &checker.programs()[ob.program];

            if budget.exhausted() {
                // Out of budget: everything left is unplaced.
                conflicts.extend(
                    pending[i..]
                        .iter()
                        .map(|ob| Conflict::unplaceable(&checker.programs()[ob.program].id, ob.session)),
                );
                break;
            }

            let mut candidates = compatible_candidates(program, checker, grid);
            self.ranker.order(program, &mut candidates, &ctx);

            let mut placed = false;
            for candidate in candidates {
                if !budget.consume() {
                    break;
                }
                let assignment = assignment_for(program, candidate, checker, grid);
                if checker.validate_hard(&assignment, &timetable).is_ok() {
                    debug!(
                        "greedy placed '{}' session {} at {} ({} / {})",
                        program.id,
                        ob.session,
                        assignment.slot_id,
                        assignment.faculty_id,
                        assignment.classroom_id
                    );
                    timetable.push(assignment);
                    placed = true;
                    break;
                }
            }

            if !placed {
                debug!(
                    "greedy could not place '{}' session {}",
                    program.id, ob.session
                );
                conflicts.push(Conflict::unplaceable(&program.id, ob.session));
            }
        }

        let complete = conflicts.is_empty();
        PartialOutcome {
            timetable,
            conflicts,
            complete,
        }
    }
}
