//! Scheduler core: the `generate` entry point and the backtracking engine.
//!
//! Generation runs in three steps:
//! 1. **Compile**: resolve the request against a catalog snapshot into a
//!    self-contained problem instance (preflight checks included).
//! 2. **Search**: synchronous backtracking over (cell, demand) placements,
//!    run on the blocking pool, cancellable between steps.
//! 3. **Report**: a sorted, deterministic solution with search statistics.

mod engine;
mod solution;

pub use solution::*;

use crate::catalog::CatalogStore;
use crate::compiler::{compile, ProblemInstance};
use crate::error::{Result, TimetableError};
use crate::types::{EngineConfig, GenerationRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation lever for an in-flight generation.
///
/// The engine checks it when advancing between cells and every thousand
/// iterations; a cancelled search surfaces `Cancelled` and writes nothing.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run the search on an already-compiled instance.
///
/// Deterministic: identical instances produce identical solutions.
pub fn solve(
    instance: &ProblemInstance,
    config: &EngineConfig,
    cancel: &CancelFlag,
) -> Result<Solution> {
    engine::run(instance, config.max_iterations, cancel)
}

/// Produce a feasible timetable for `request`, or a typed failure.
///
/// Compiles a problem instance from the catalog snapshot, then searches on
/// the blocking pool. Failure leaves no trace in the catalog; publishing an
/// accepted solution is a separate step.
pub async fn generate(
    store: &CatalogStore,
    request: &GenerationRequest,
    config: &EngineConfig,
    cancel: CancelFlag,
) -> Result<Solution> {
    let reference_date = chrono::Utc::now().date_naive();
    let instance = compile(store, request, config, reference_date).await?;

    tracing::info!(
        academic_year = %instance.academic_year,
        semester = %instance.semester_type,
        groups = instance.groups.len(),
        demands = instance.demands.len(),
        "starting timetable search"
    );

    let config = config.clone();
    let handle =
        tokio::task::spawn_blocking(move || engine::run(&instance, config.max_iterations, &cancel));
    let result = match handle.await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
        Err(_) => Err(TimetableError::Cancelled),
    };

    match &result {
        Ok(solution) => tracing::info!(
            slots = solution.slots.len(),
            iterations = solution.stats.iterations,
            "timetable search succeeded"
        ),
        Err(err) => tracing::info!(error = %err, "timetable search failed"),
    }
    result
}
