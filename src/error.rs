use crate::scheduler::SearchStats;
use thiserror::Error;

/// Domain-specific errors for the timetabling core.
///
/// Every failure surfaced by the crate is one of these kinds; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// Static checks failed before search; the engine was never invoked.
    #[error("problem infeasible before search: {}", reasons.join("; "))]
    InfeasiblePreflight { reasons: Vec<String> },

    /// The search space was exhausted without a feasible timetable.
    #[error(
        "no feasible timetable exists ({} of {} hours placeable)",
        .stats.total_placed,
        .stats.total_demand
    )]
    Unsatisfiable { stats: SearchStats },

    /// The iteration budget tripped before the search finished.
    #[error("search aborted after {iterations} iterations (budget exhausted)")]
    Exhausted { iterations: u64, stats: SearchStats },

    /// External cancellation observed at a checkpoint.
    #[error("generation cancelled")]
    Cancelled,

    /// Duplicate natural-key write to the catalog.
    #[error("duplicate key: '{key}' already exists")]
    Conflict { key: String },

    /// A referenced entity is missing or inactive.
    #[error("{entity} not found: '{key}'")]
    NotFound { entity: &'static str, key: String },

    /// Transaction or connectivity failure; any open transaction rolled back.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
