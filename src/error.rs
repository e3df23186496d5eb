//! Fatal error taxonomy.
//!
//! Only setup problems abort a run: a configuration the engine cannot
//! start with, or inputs with nothing to schedule. Hard-constraint
//! violations and budget exhaustion are recovered into the result's
//! conflict list and score instead.

use thiserror::Error;

/// Errors that prevent a generation run from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The configuration or input structure is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// There is nothing to schedule.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}
