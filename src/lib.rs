//! Class-timetable generation engine.
//!
//! Given academic programs, faculty, classrooms, and a fixed weekly
//! grid of time slots, produces an assignment of (program, faculty,
//! classroom, slot) tuples that satisfies hard constraints — no
//! double-booking, room capacity, lab requirements, faculty workload
//! caps — and maximizes soft-preference satisfaction, within a bounded
//! time and iteration budget.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Program`, `Faculty`, `Classroom`,
//!   `TimeGrid`, `Preference`, `Assignment`, `Conflict`, `Timetable`
//! - **`constraints`**: Hard-constraint validation and soft scoring
//! - **`solver`**: The greedy assigner, the exact backtracking solver,
//!   and pluggable candidate ranking
//! - **`engine`**: The orchestrator — strategy dispatch, escalation,
//!   result finalization
//! - **`validation`**: Structural integrity checks on the inputs
//!
//! # Usage
//!
//! ```
//! use timetabler::engine::{Engine, GenerationConfig, GenerationRequest};
//! use timetabler::models::{Classroom, Faculty, Program, TimeGrid, Weekday};
//!
//! let grid = TimeGrid::weekday_grid(&Weekday::TEACHING_WEEK, 6, 8 * 60, 60);
//! let programs = vec![Program::new("CS101").with_max_students(40)];
//! let faculty = vec![Faculty::new("F1", grid.len())];
//! let classrooms = vec![Classroom::new("R1", 60, grid.len())];
//! let config = GenerationConfig::new("2025-2026");
//!
//! let result = Engine::new()
//!     .generate(&GenerationRequest {
//!         programs: &programs,
//!         faculty: &faculty,
//!         classrooms: &classrooms,
//!         grid: &grid,
//!         preferences: &[],
//!         config: &config,
//!     })
//!     .unwrap();
//! assert!(result.success);
//! ```
//!
//! # Concurrency
//!
//! The engine is invoked synchronously per request and holds no shared
//! mutable state: inputs are borrowed immutably and each run owns its
//! working timetable, so concurrent runs need no locking.

pub mod constraints;
pub mod engine;
pub mod error;
pub mod models;
pub mod solver;
pub mod validation;

pub use engine::{
    Engine, GenerationConfig, GenerationRequest, OptimizationResult, OptimizationStrategy,
};
pub use error::EngineError;
