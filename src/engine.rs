//! Generation engine and orchestration.
//!
//! The engine runs the configured strategy end-to-end: input and
//! configuration validation, strategy dispatch, escalation from the
//! greedy pass to the exact solver, and result finalization (score,
//! elapsed time, success flag).
//!
//! # Strategies
//!
//! | `strategy`  | pipeline                                          |
//! |-------------|---------------------------------------------------|
//! | `greedy`    | greedy pass only                                  |
//! | `cp_sat`    | exact solver only, scarcity candidate order       |
//! | `ml_guided` | greedy + exact escalation, weighted candidate order |
//! | `hybrid`    | greedy, then exact seeded with greedy's placements |
//!
//! The hybrid escalation never discards placements the greedy pass
//! accepted — only the unresolved obligations are re-searched.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::constraints::{ConstraintChecker, ScoringWeights};
use crate::error::EngineError;
use crate::models::{
    Assignment, Classroom, Conflict, Faculty, Preference, Program, TimeGrid, Timetable,
};
use crate::solver::{
    scarcity_ordered_obligations, ExactSolver, GreedyAssigner, PartialOutcome, SearchBudget,
    Strategy, WeightedRanker,
};
use crate::validation::validate_input;

/// Which solving pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    /// Single greedy pass.
    Greedy,
    /// Exact backtracking search only.
    CpSat,
    /// Greedy + exact escalation with weighted candidate ranking.
    MlGuided,
    /// Greedy first, exact escalation on residual conflicts.
    #[default]
    Hybrid,
}

/// Per-run generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Academic year label (e.g. "2025-2026").
    pub academic_year: String,
    /// Week the timetable is generated for.
    pub week_number: u32,
    /// Solving pipeline.
    pub strategy: OptimizationStrategy,
    /// Iteration ceiling across all stages. Must be positive.
    pub max_iterations: u64,
    /// Wall-time ceiling across all stages. Must be positive.
    pub time_limit: Duration,
    /// When false, any unresolved hard conflict fails the run.
    pub allow_conflicts: bool,
    /// Optional enrollment floor for the capacity check; defaults to
    /// each program's own `max_students`.
    pub min_enrollment: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            academic_year: String::new(),
            week_number: 1,
            strategy: OptimizationStrategy::default(),
            max_iterations: 100_000,
            time_limit: Duration::from_secs(30),
            allow_conflicts: false,
            min_enrollment: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a default configuration for an academic year.
    pub fn new(academic_year: impl Into<String>) -> Self {
        Self {
            academic_year: academic_year.into(),
            ..Default::default()
        }
    }

    /// Sets the week number.
    pub fn with_week(mut self, week_number: u32) -> Self {
        self.week_number = week_number;
        self
    }

    /// Sets the solving strategy.
    pub fn with_strategy(mut self, strategy: OptimizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the iteration ceiling.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the wall-time ceiling.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Permits unresolved conflicts in a successful run.
    pub fn with_conflicts_allowed(mut self) -> Self {
        self.allow_conflicts = true;
        self
    }

    /// Relaxes the capacity check to this enrollment floor.
    pub fn with_min_enrollment(mut self, floor: u32) -> Self {
        self.min_enrollment = Some(floor);
        self
    }

    /// Rejects configurations the engine cannot start with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidConfiguration(
                "max_iterations must be positive".into(),
            ));
        }
        if self.time_limit.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "time_limit must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// The immutable inputs of one generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Course offerings to place.
    pub programs: &'a [Program],
    /// Available faculty.
    pub faculty: &'a [Faculty],
    /// Available classrooms.
    pub classrooms: &'a [Classroom],
    /// The weekly time grid.
    pub grid: &'a TimeGrid,
    /// Classified preferences.
    pub preferences: &'a [Preference],
    /// Run settings.
    pub config: &'a GenerationConfig,
}

/// The outcome of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Whether the run met its success criterion (see
    /// `GenerationConfig::allow_conflicts`).
    pub success: bool,
    /// Accepted assignments, in placement order.
    pub assignments: Vec<Assignment>,
    /// Sessions that could not be placed.
    pub conflicts: Vec<Conflict>,
    /// Normalized quality score, 0–100.
    pub optimization_score: f64,
    /// The sub-strategy that produced the returned result.
    pub strategy_used: String,
    /// Wall time spent generating.
    pub generation_time: Duration,
    /// Iterations consumed across all stages.
    pub iterations: u64,
}

/// Timetable generation engine.
///
/// Stateless and cheap to construct; one engine value can serve any
/// number of concurrent runs since every run owns its working state.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    weights: ScoringWeights,
}

impl Engine {
    /// Creates an engine with the default scoring weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the completeness/preference scoring split.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Runs one generation request to completion.
    ///
    /// Fatal setup problems (unusable configuration, nothing to
    /// schedule) return `Err`; everything else — including unplaced
    /// sessions and budget exhaustion — is reported inside the result.
    pub fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<OptimizationResult, EngineError> {
        let config = request.config;
        config.validate()?;
        if request.programs.is_empty() {
            return Err(EngineError::EmptyInput("no programs to schedule"));
        }
        if request.grid.is_empty() {
            return Err(EngineError::EmptyInput("no time slots in the grid"));
        }
        if let Err(errors) = validate_input(
            request.programs,
            request.faculty,
            request.classrooms,
            request.grid,
            request.preferences,
        ) {
            let detail: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(EngineError::InvalidConfiguration(detail.join("; ")));
        }

        let mut checker = ConstraintChecker::new(
            request.programs,
            request.faculty,
            request.classrooms,
            request.grid,
            request.preferences,
        )
        .with_weights(self.weights);
        if let Some(floor) = config.min_enrollment {
            checker = checker.with_min_enrollment(floor);
        }

        let mut budget = SearchBudget::new(config.time_limit, config.max_iterations);
        let obligations = scarcity_ordered_obligations(&checker, request.grid);
        info!(
            "generation run: {:?} strategy, {} programs, {} obligations, {} faculty, {} classrooms",
            config.strategy,
            request.programs.len(),
            obligations.len(),
            request.faculty.len(),
            request.classrooms.len()
        );

        let (outcome, strategy_used) = match config.strategy {
            OptimizationStrategy::Greedy => {
                let outcome = GreedyAssigner::new().attempt(
                    &obligations,
                    Timetable::new(),
                    &checker,
                    &mut budget,
                );
                (outcome, "greedy".to_string())
            }
            OptimizationStrategy::CpSat => {
                let outcome = ExactSolver::new().attempt(
                    &obligations,
                    Timetable::new(),
                    &checker,
                    &mut budget,
                );
                (outcome, "cp_sat".to_string())
            }
            OptimizationStrategy::MlGuided => {
                let ranker = Arc::new(WeightedRanker::default());
                let primary = GreedyAssigner::new().with_ranker(ranker.clone());
                let escalation = ExactSolver::new().with_ranker(ranker);
                let (outcome, _) =
                    run_staged(&primary, &escalation, &obligations, &checker, &mut budget);
                (outcome, "ml_guided".to_string())
            }
            OptimizationStrategy::Hybrid => {
                let primary = GreedyAssigner::new();
                let escalation = ExactSolver::new();
                let (outcome, escalated) =
                    run_staged(&primary, &escalation, &obligations, &checker, &mut budget);
                let used = if escalated { "hybrid" } else { "greedy" };
                (outcome, used.to_string())
            }
        };

        let optimization_score = checker.score_result(&outcome.timetable);
        let success = if config.allow_conflicts {
            outcome.complete || !budget.exhausted()
        } else {
            outcome.conflicts.is_empty()
        };
        if !outcome.conflicts.is_empty() {
            warn!(
                "generation finished with {} unresolved conflicts",
                outcome.conflicts.len()
            );
        }
        info!(
            "generation done: strategy '{}', score {:.1}, {} assignments, {} conflicts, {:?}",
            strategy_used,
            optimization_score,
            outcome.timetable.len(),
            outcome.conflicts.len(),
            budget.elapsed()
        );

        Ok(OptimizationResult {
            success,
            assignments: outcome.timetable.into_assignments(),
            conflicts: outcome.conflicts,
            optimization_score,
            strategy_used,
            generation_time: budget.elapsed(),
            iterations: budget.used(),
        })
    }
}

/// Runs the primary strategy, escalating to the secondary when
/// conflicts remain and budget allows. The escalation is seeded with
/// the primary's accepted placements. Returns the outcome and whether
/// escalation ran.
fn run_staged(
    primary: &dyn Strategy,
    escalation: &dyn Strategy,
    obligations: &[crate::solver::Obligation],
    checker: &ConstraintChecker<'_>,
    budget: &mut SearchBudget,
) -> (PartialOutcome, bool) {
    let outcome = primary.attempt(obligations, Timetable::new(), checker, budget);
    if outcome.complete || budget.exhausted() {
        return (outcome, false);
    }
    info!(
        "escalating from '{}' to '{}': {} conflicts remain",
        primary.name(),
        escalation.name(),
        outcome.conflicts.len()
    );
    let seeded = escalation.attempt(obligations, outcome.timetable, checker, budget);
    (seeded, true)
}
