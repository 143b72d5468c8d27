//! Preference-driven period assignment.
//!
//! Places every student into one activity per period so that each
//! student gets a fixed number of their ranked choices, no activity is
//! repeated, and every activity stays within its size bounds in every
//! period. Among all such placements the one with the highest
//! rank-weighted score is chosen, by formulating the problem as a binary
//! integer program and handing it to an ILP solver.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ActivityCatalog`, `StudentRecord`,
//!   `AssignmentConfig`, `Assignment`, `Violation`
//! - **`index`**: Resolves activity names to ids, rejecting bad records
//! - **`ilp`**: Model representation, the assignment model builder, the
//!   `IlpSolver` gateway and its `good_lp` backend
//! - **`extract`**: Reads solver values back into an `Assignment`
//! - **`report`**: Satisfaction statistics recomputed from the assignment
//! - **`validation`**: Configuration checks and post-hoc invariant audits
//! - **`pipeline`**: The end-to-end run
//! - **`io`**: CSV input and output
//! - **`scenario`**: Seeded synthetic student data
//!
//! # Example
//!
//! ```
//! use u_assign::ilp::GoodLpSolver;
//! use u_assign::models::{ActivityCatalog, AssignmentConfig, StudentRecord};
//! use u_assign::pipeline::AssignmentPipeline;
//!
//! let config = AssignmentConfig::new(ActivityCatalog::from_names(["Chess", "Robots"]))
//!     .with_periods(1)
//!     .with_capacity(1, 2);
//! let records = vec![
//!     StudentRecord::new("Ada", "Lovelace").with_choices(["Chess", "Robots", "Chess", "Chess"]),
//!     StudentRecord::new("Alan", "Turing").with_choices(["Robots", "Chess", "Robots", "Robots"]),
//! ];
//!
//! let outcome = AssignmentPipeline::new(config, GoodLpSolver::new())
//!     .run(&records)
//!     .unwrap();
//! assert!(outcome.report.all_satisfied());
//! ```
//!
//! # References
//!
//! - Wolsey (1998), "Integer Programming"
//! - Pentico (2007), "Assignment problems: A golden anniversary survey"

pub mod error;
pub mod extract;
pub mod ilp;
pub mod index;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod scenario;
pub mod validation;

pub use error::{AssignError, ExtractionError, MalformedReason};
pub use pipeline::{AssignmentPipeline, PipelineOutcome, PipelineStage};
pub use report::SatisfactionReport;
