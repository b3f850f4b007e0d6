//! Campus Timetabler - Constraint-based university timetable generator
//!
//! This library builds weekly timetables: assignments of
//! (teacher, subject, group, room) tuples to (day, period) cells that
//! satisfy resource-exclusion and capacity constraints while meeting
//! per-subject weekly hour demands.
//!
//! # Pipeline
//!
//! 1. **Catalog**: teachers, subjects, rooms, groups and their relations
//!    live in a SQLite-backed store
//! 2. **Compile**: a generation request plus a catalog snapshot become a
//!    self-contained problem instance (with preflight checks)
//! 3. **Search**: backtracking with bitset conflict propagation finds a
//!    feasible assignment or proves there is none
//! 4. **Publish**: an accepted solution replaces the stored timetable for
//!    its (year, semester) partition in one transaction
//!
//! An independent entry point allocates elective seats to students by
//! CGPA priority.
//!
//! # Example
//!
//! ```no_run
//! use campus_timetabler::catalog::CatalogStore;
//! use campus_timetabler::scheduler::{generate, CancelFlag};
//! use campus_timetabler::types::{EngineConfig, GenerationRequest, GroupId, SemesterType};
//!
//! # async fn run() -> campus_timetabler::Result<()> {
//! let store = CatalogStore::open("timetable.db").await?;
//! let request = GenerationRequest::new("2025-26", SemesterType::Odd, vec![GroupId(1)]);
//! let solution = generate(&store, &request, &EngineConfig::default(), CancelFlag::new()).await?;
//! store.publish(&solution, "2025-26", SemesterType::Odd).await?;
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod reporter;
pub mod scheduler;
pub mod types;
pub mod validator;

pub use allocator::allocate_electives;
pub use catalog::CatalogStore;
pub use error::{Result, TimetableError};
pub use scheduler::{generate, solve, CancelFlag, SearchStats, Solution};
