//! End-to-end assignment run.
//!
//! Each run moves through a fixed sequence of stages and calls the solver
//! exactly once:
//!
//! ```text
//! Unbuilt ──build──▶ Built ──solve──▶ Solved ──extract──▶ Extracted ──audit──▶ Validated
//!                                       │                            │
//!                              infeasible | error              violations
//!                                       └──────────▶ Failed ◀────────┘
//! ```
//!
//! An optimal solve whose assignment breaks any model invariant is a
//! solver defect and fails the run with [`AssignError::Unsound`]; a
//! returned [`PipelineOutcome`] has always passed the audit.
//!
//! Nothing is retried. Any failure ends the run with an [`AssignError`]
//! whose [`stage`](AssignError::stage) names the last stage completed.

use std::fmt;
use std::io::Write;
use std::path::Path;

use log::{error, info};
use serde::Serialize;

use crate::error::{AssignError, MalformedReason};
use crate::extract::extract_assignment;
use crate::ilp::{AssignmentIlpBuilder, IlpSolver, ModelStats, SolveStatus};
use crate::index::PreferenceIndex;
use crate::io::{write_assignment_records, write_assignment_records_to_path};
use crate::models::{Assignment, AssignmentConfig, StudentRecord};
use crate::report::SatisfactionReport;
use crate::validation::{audit_assignment, validate_config};

/// Stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineStage {
    /// Inputs loaded, no model yet.
    Unbuilt,
    /// Model built.
    Built,
    /// Solver returned an optimal solution.
    Solved,
    /// Assignment read back from the solution.
    Extracted,
    /// Satisfaction computed and invariants audited.
    Validated,
    /// The solver reported infeasibility or failed, or the audit found
    /// a broken invariant.
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbuilt => "unbuilt",
            Self::Built => "built",
            Self::Solved => "solved",
            Self::Extracted => "extracted",
            Self::Validated => "validated",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Resolved students.
    pub index: PreferenceIndex,
    /// Size of the solved model.
    pub stats: ModelStats,
    /// Objective value reported by the solver (informational).
    pub objective: Option<f64>,
    /// The assignment.
    pub assignment: Assignment,
    /// Satisfaction recomputed from the assignment.
    pub report: SatisfactionReport,
}

/// Runs the full build, solve, extract and report sequence.
///
/// # Example
/// ```no_run
/// use u_assign::ilp::GoodLpSolver;
/// use u_assign::io::read_student_records_from_path;
/// use u_assign::models::AssignmentConfig;
/// use u_assign::pipeline::AssignmentPipeline;
///
/// let config = AssignmentConfig::science_fair();
/// let records = read_student_records_from_path("student_choices.csv", config.ranks()).unwrap();
/// let outcome = AssignmentPipeline::new(config, GoodLpSolver::new())
///     .run(&records)
///     .unwrap();
/// println!("{}", outcome.report);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentPipeline<S> {
    config: AssignmentConfig,
    solver: S,
}

impl<S: IlpSolver> AssignmentPipeline<S> {
    /// Creates a pipeline.
    pub fn new(config: AssignmentConfig, solver: S) -> Self {
        Self { config, solver }
    }

    /// The run configuration.
    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    /// The solver backend.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Assigns every student one activity per period.
    ///
    /// # Errors
    /// - [`AssignError::InvalidConfig`] before anything else runs
    /// - [`AssignError::MalformedInput`] for a bad record or empty input
    /// - [`AssignError::Infeasible`] if no assignment meets every constraint
    /// - [`AssignError::Solver`] if the backend fails
    /// - [`AssignError::Extraction`] if the solver's values break the model
    /// - [`AssignError::Unsound`] if the assignment fails the invariant audit
    pub fn run(&self, records: &[StudentRecord]) -> Result<PipelineOutcome, AssignError> {
        let config = &self.config;
        validate_config(config).map_err(AssignError::InvalidConfig)?;

        let index = PreferenceIndex::build(records, &config.catalog, config.ranks())?;
        if index.is_empty() {
            return Err(AssignError::MalformedInput {
                record: 0,
                reason: MalformedReason::NoRecords,
            });
        }
        log_stage(PipelineStage::Unbuilt);

        let model = AssignmentIlpBuilder::new(&index, config).build();
        let stats = model.stats();
        log_stage(PipelineStage::Built);

        let solution = self.solver.solve(&model);
        match solution.status() {
            SolveStatus::Optimal => log_stage(PipelineStage::Solved),
            SolveStatus::Infeasible => {
                log_stage(PipelineStage::Failed);
                return Err(AssignError::Infeasible {
                    detail: capacity_summary(config, index.len()),
                });
            }
            SolveStatus::Error(message) => {
                log_stage(PipelineStage::Failed);
                return Err(AssignError::Solver {
                    solver: self.solver.name().to_string(),
                    message: message.clone(),
                });
            }
        }
        if let Some(objective) = solution.objective() {
            info!("objective value: {objective}");
        }

        let assignment = extract_assignment(&model, &solution)?;
        log_stage(PipelineStage::Extracted);

        let violations = audit_assignment(config, &index, &assignment);
        if !violations.is_empty() {
            for violation in &violations {
                error!("{}", violation.message);
            }
            log_stage(PipelineStage::Failed);
            return Err(AssignError::Unsound { violations });
        }
        let report = SatisfactionReport::calculate(config, &index, &assignment);
        log_stage(PipelineStage::Validated);

        Ok(PipelineOutcome {
            index,
            stats,
            objective: solution.objective(),
            assignment,
            report,
        })
    }

    /// Runs and writes the assignment CSV. Nothing is written if the run fails.
    pub fn run_to_writer<W: Write>(
        &self,
        records: &[StudentRecord],
        writer: W,
    ) -> Result<PipelineOutcome, AssignError> {
        let outcome = self.run(records)?;
        write_assignment_records(writer, &outcome.index, &self.config.catalog, &outcome.assignment)?;
        Ok(outcome)
    }

    /// Runs and writes the assignment CSV to a file, created only after a
    /// successful run.
    pub fn run_to_path(
        &self,
        records: &[StudentRecord],
        path: impl AsRef<Path>,
    ) -> Result<PipelineOutcome, AssignError> {
        let outcome = self.run(records)?;
        write_assignment_records_to_path(
            path,
            &outcome.index,
            &self.config.catalog,
            &outcome.assignment,
        )?;
        Ok(outcome)
    }
}

fn log_stage(stage: PipelineStage) {
    info!("pipeline stage: {stage}");
}

/// Per-period capacity totals against the head count.
fn capacity_summary(config: &AssignmentConfig, students: usize) -> String {
    let (min_total, max_total) = (0..config.catalog.len())
        .map(|a| config.capacity_of(a))
        .fold((0u64, 0u64), |(lo, hi), b| {
            (lo + u64::from(b.min), hi.saturating_add(u64::from(b.max)))
        });

    let mut detail = format!(
        "each period needs between {min_total} and {max_total} students across {} activities, {students} enrolled",
        config.catalog.len()
    );
    if (students as u64) < min_total {
        detail.push_str("; minimum sizes exceed the head count");
    }
    if (students as u64) > max_total {
        detail.push_str("; maximum sizes cannot seat every student");
    }
    if config.periods > config.catalog.len() {
        detail.push_str(&format!(
            "; {} periods but only {} distinct activities",
            config.periods,
            config.catalog.len()
        ));
    }
    detail
}
