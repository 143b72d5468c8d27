//! Solver gateway contract.
//!
//! The assignment pipeline depends only on [`IlpSolver`]: hand it a
//! model, get back a status and, when optimal, one value per variable.
//! How the backend searches (simplex, branch-and-bound, threads) is its
//! own business.

use std::fmt::Debug;

use serde::Serialize;

use super::IlpModel;

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    /// A provably optimal solution was found.
    Optimal,
    /// No solution satisfies every constraint.
    Infeasible,
    /// The backend failed (resource exhaustion, internal fault, unbounded
    /// relaxation). Says nothing about whether a solution exists.
    Error(String),
}

/// Solver response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IlpSolution {
    status: SolveStatus,
    values: Vec<f64>,
    objective: Option<f64>,
}

impl IlpSolution {
    /// An optimal solution with one value per variable.
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
        }
    }

    /// An infeasibility proof.
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            values: Vec::new(),
            objective: None,
        }
    }

    /// A backend failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::Error(message.into()),
            values: Vec::new(),
            objective: None,
        }
    }

    /// Solve status.
    #[inline]
    pub fn status(&self) -> &SolveStatus {
        &self.status
    }

    /// Whether the status is optimal.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Variable values (empty unless optimal).
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Objective value as reported by the backend.
    ///
    /// Informational only; satisfaction statistics are recomputed from
    /// the extracted assignment.
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.objective
    }
}

/// An ILP backend.
///
/// Implementations must return either `Optimal` with exactly
/// `model.variable_count()` values, `Infeasible`, or `Error`.
pub trait IlpSolver: Debug {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Solves the model once.
    fn solve(&self, model: &IlpModel) -> IlpSolution;
}

impl<S: IlpSolver + ?Sized> IlpSolver for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &IlpModel) -> IlpSolution {
        (**self).solve(model)
    }
}

impl<S: IlpSolver + ?Sized> IlpSolver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &IlpModel) -> IlpSolution {
        (**self).solve(model)
    }
}
