//! Candidate ranking.
//!
//! Rankers order the candidate triples for one obligation best-first.
//! They are consumed as pluggable comparators by both the greedy
//! assigner and the exact solver — a ranker never validates anything
//! itself, it only decides which candidate gets tried first.
//!
//! Two implementations:
//! - [`ScarcityRanker`] — the deterministic default tie-break chain:
//!   fewest faculty preference violations, then tightest sufficient
//!   room capacity, then earliest slot.
//! - [`WeightedRanker`] — a weighted score over heuristic signals
//!   (expertise-tag overlap, preference priority sum, capacity fit)
//!   that biases search toward placements likely to score well.

use std::fmt::Debug;

use crate::constraints::preference_satisfied;
use crate::models::{Classroom, Faculty, Preference, Program, TimeGrid, Timetable};

use super::Candidate;

/// Read-only inputs a ranker may consult.
pub struct RankContext<'a> {
    /// Faculty, by candidate index.
    pub faculty: &'a [Faculty],
    /// Classrooms, by candidate index.
    pub classrooms: &'a [Classroom],
    /// The time grid (for day lookups).
    pub grid: &'a TimeGrid,
    /// The run's preference collection.
    pub preferences: &'a [Preference],
}

/// Orders candidate triples for one obligation, best first.
///
/// Implementations must be deterministic: equal inputs produce the
/// identical ordering, with no randomness and no hidden state.
pub trait CandidateRanker: Debug + Send + Sync {
    /// Ranker name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Reorders `candidates` in place, best first.
    fn order(&self, program: &Program, candidates: &mut [Candidate], ctx: &RankContext<'_>);
}

/// Number of soft preferences a candidate would leave unsatisfied for
/// its faculty member, plus the preferred-slot list when missed.
///
/// Stateful preferences (daily workload) are skipped — they depend on
/// the evolving timetable, which rankers do not see.
fn faculty_preference_violations(
    program: &Program,
    candidate: Candidate,
    ctx: &RankContext<'_>,
) -> usize {
    let faculty = &ctx.faculty[candidate.faculty];
    let classroom = &ctx.classrooms[candidate.classroom];
    let probe = super::probe_assignment(program, faculty, classroom, candidate.slot_index);
    let empty = Timetable::new();

    let mut violations = 0;
    for pref in ctx.preferences.iter().filter(|p| !p.is_hard) {
        if pref.applies_to(&faculty.id, &classroom.id, &program.id)
            && !preference_satisfied(pref, &probe, &empty, ctx.grid, true)
        {
            violations += 1;
        }
    }
    if !faculty.preferred_slots.is_empty()
        && !faculty.preferred_slots.contains(&candidate.slot_index)
    {
        violations += 1;
    }
    violations
}

/// Capacity ordering key: sufficient rooms sort by slack ascending
/// (tightest fit first), undersized rooms sort after all of them.
fn capacity_fit_key(program: &Program, classroom: &Classroom) -> (u8, u32) {
    if classroom.capacity >= program.max_students {
        (0, classroom.capacity - program.max_students)
    } else {
        (1, program.max_students - classroom.capacity)
    }
}

/// The default candidate order.
///
/// Tie-break chain: fewest faculty preference violations, then room
/// capacity closest to (not below) the program's demand, then earliest
/// slot index, then faculty and classroom input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScarcityRanker;

impl CandidateRanker for ScarcityRanker {
    fn name(&self) -> &'static str {
        "scarcity"
    }

    fn order(&self, program: &Program, candidates: &mut [Candidate], ctx: &RankContext<'_>) {
        candidates.sort_by_key(|&c| {
            (
                faculty_preference_violations(program, c, ctx),
                capacity_fit_key(program, &ctx.classrooms[c.classroom]),
                c.slot_index,
                c.faculty,
                c.classroom,
            )
        });
    }
}

/// Weighted heuristic candidate order.
///
/// Scores each triple as
/// `expertise_weight × tag_overlap + preference_weight × priority_sum
/// − fit_weight × capacity_slack` and sorts descending. The defaults
/// put expertise first, preferences second, and use capacity fit as a
/// mild tiebreaker.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRanker {
    /// Weight on the expertise-tag overlap count.
    pub expertise_weight: f64,
    /// Weight on the satisfied soft-preference priority sum.
    pub preference_weight: f64,
    /// Penalty per seat of unused room capacity.
    pub fit_weight: f64,
}

impl Default for WeightedRanker {
    fn default() -> Self {
        Self {
            expertise_weight: 10.0,
            preference_weight: 1.0,
            fit_weight: 0.1,
        }
    }
}

impl WeightedRanker {
    fn score(&self, program: &Program, candidate: Candidate, ctx: &RankContext<'_>) -> f64 {
        let faculty = &ctx.faculty[candidate.faculty];
        let classroom = &ctx.classrooms[candidate.classroom];
        let probe = super::probe_assignment(program, faculty, classroom, candidate.slot_index);
        let empty = Timetable::new();

        let overlap = faculty.expertise_overlap(&program.required_expertise) as f64;

        let mut priority_sum = 0.0;
        for pref in ctx.preferences.iter().filter(|p| !p.is_hard) {
            if pref.applies_to(&faculty.id, &classroom.id, &program.id)
                && preference_satisfied(pref, &probe, &empty, ctx.grid, true)
            {
                priority_sum += pref.priority.max(0) as f64;
            }
        }
        if let Some(pos) = faculty
            .preferred_slots
            .iter()
            .position(|&s| s == candidate.slot_index)
        {
            let n = faculty.preferred_slots.len();
            priority_sum += (n - pos) as f64 / n as f64;
        }

        let slack = classroom.capacity.abs_diff(program.max_students) as f64;

        self.expertise_weight * overlap + self.preference_weight * priority_sum
            - self.fit_weight * slack
    }
}

impl CandidateRanker for WeightedRanker {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn order(&self, program: &Program, candidates: &mut [Candidate], ctx: &RankContext<'_>) {
        let scores: Vec<f64> = candidates
            .iter()
            .map(|&c| self.score(program, c, ctx))
            .collect();
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let (ca, cb) = (candidates[a], candidates[b]);
                    (ca.slot_index, ca.faculty, ca.classroom).cmp(&(
                        cb.slot_index,
                        cb.faculty,
                        cb.classroom,
                    ))
                })
        });
        let reordered: Vec<Candidate> = order.iter().map(|&i| candidates[i]).collect();
        candidates.copy_from_slice(&reordered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn grid() -> TimeGrid {
        TimeGrid::weekday_grid(&[Weekday::Monday], 4, 9 * 60, 60)
    }

    fn all_candidates(n_faculty: usize, n_rooms: usize, n_slots: usize) -> Vec<Candidate> {
        let mut out = Vec::new();
        for f in 0..n_faculty {
            for c in 0..n_rooms {
                for s in 0..n_slots {
                    out.push(Candidate {
                        faculty: f,
                        classroom: c,
                        slot_index: s,
                    });
                }
            }
        }
        out
    }

    #[test]
    fn test_scarcity_prefers_fewest_violations() {
        let grid = grid();
        let program = Program::new("p").with_max_students(20);
        let faculty = vec![
            Faculty::new("F1", grid.len()),
            Faculty::new("F2", grid.len()),
        ];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        // F1 dislikes everything but slot 3; F2 has no preferences.
        let preferences = vec![Preference::faculty_time("F1", vec![3], 5)];
        let ctx = RankContext {
            faculty: &faculty,
            classrooms: &classrooms,
            grid: &grid,
            preferences: &preferences,
        };

        let mut candidates = all_candidates(2, 1, 4);
        ScarcityRanker.order(&program, &mut candidates, &ctx);

        // Zero-violation candidates first: F1@slot3 and all of F2.
        // Earliest slot wins among them, then faculty order.
        assert_eq!(candidates[0].faculty, 1);
        assert_eq!(candidates[0].slot_index, 0);
        // F1's only zero-violation slot sorts with the zero group.
        let f1_pos = candidates
            .iter()
            .position(|c| c.faculty == 0 && c.slot_index == 3)
            .unwrap();
        let first_violation = candidates
            .iter()
            .position(|c| c.faculty == 0 && c.slot_index != 3)
            .unwrap();
        assert!(f1_pos < first_violation);
    }

    #[test]
    fn test_scarcity_prefers_tightest_room() {
        let grid = grid();
        let program = Program::new("p").with_max_students(25);
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![
            Classroom::new("big", 100, grid.len()),
            Classroom::new("snug", 30, grid.len()),
        ];
        let ctx = RankContext {
            faculty: &faculty,
            classrooms: &classrooms,
            grid: &grid,
            preferences: &[],
        };

        let mut candidates = all_candidates(1, 2, 1);
        ScarcityRanker.order(&program, &mut candidates, &ctx);
        assert_eq!(candidates[0].classroom, 1); // snug before big
    }

    #[test]
    fn test_scarcity_is_deterministic() {
        let grid = grid();
        let program = Program::new("p").with_max_students(10);
        let faculty = vec![
            Faculty::new("F1", grid.len()),
            Faculty::new("F2", grid.len()),
        ];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let ctx = RankContext {
            faculty: &faculty,
            classrooms: &classrooms,
            grid: &grid,
            preferences: &[],
        };

        let mut a = all_candidates(2, 1, 4);
        let mut b = all_candidates(2, 1, 4);
        b.reverse();
        ScarcityRanker.order(&program, &mut a, &ctx);
        ScarcityRanker.order(&program, &mut b, &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn test_weighted_prefers_expertise_overlap() {
        let grid = grid();
        let program = Program::new("p")
            .with_expertise("db")
            .with_expertise("sql")
            .with_max_students(20);
        let faculty = vec![
            Faculty::new("generalist", grid.len()).with_expertise("db"),
            Faculty::new("specialist", grid.len())
                .with_expertise("db")
                .with_expertise("sql"),
        ];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let ctx = RankContext {
            faculty: &faculty,
            classrooms: &classrooms,
            grid: &grid,
            preferences: &[],
        };

        let mut candidates = all_candidates(2, 1, 2);
        WeightedRanker::default().order(&program, &mut candidates, &ctx);
        assert_eq!(candidates[0].faculty, 1);
    }

    #[test]
    fn test_weighted_tie_break_is_slot_order() {
        let grid = grid();
        let program = Program::new("p").with_max_students(20);
        let faculty = vec![Faculty::new("F1", grid.len())];
        let classrooms = vec![Classroom::new("R1", 20, grid.len())];
        let ctx = RankContext {
            faculty: &faculty,
            classrooms: &classrooms,
            grid: &grid,
            preferences: &[],
        };

        let mut candidates = all_candidates(1, 1, 4);
        candidates.reverse();
        WeightedRanker::default().order(&program, &mut candidates, &ctx);
        let slots: Vec<usize> = candidates.iter().map(|c| c.slot_index).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }
}
