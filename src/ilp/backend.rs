//! `good_lp` solver backend.
//!
//! Translates an [`IlpModel`] row by row into a `good_lp` problem with
//! binary variables and solves it with the crate's default solver (the
//! pure-Rust `microlp` branch-and-bound with this crate's features).

use std::time::Instant;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use log::{debug, info};

use super::{Comparator, IlpModel, IlpSolution, IlpSolver, LinearExpr, ObjectiveSense};

/// Solves assignment models with `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl IlpSolver for GoodLpSolver {
    fn name(&self) -> &str {
        "good_lp/microlp"
    }

    fn solve(&self, model: &IlpModel) -> IlpSolution {
        let start = Instant::now();

        let mut vars = ProblemVariables::new();
        let x: Vec<Variable> = vars.add_vector(variable().binary(), model.variable_count());

        let objective = to_expression(model.objective(), &x);
        let unsolved = match model.sense() {
            ObjectiveSense::Maximize => vars.maximise(objective),
            ObjectiveSense::Minimize => vars.minimise(objective),
        };
        let mut problem = unsolved.using(default_solver);

        for row in model.constraints() {
            let lhs = to_expression(&row.expr, &x);
            let rhs = row.rhs as f64;
            let c = match row.comparator {
                Comparator::Equal => constraint!(lhs == rhs),
                Comparator::LessEq => constraint!(lhs <= rhs),
                Comparator::GreaterEq => constraint!(lhs >= rhs),
            };
            problem.add_constraint(c);
        }
        debug!(
            "handed {} variables and {} rows to {}",
            x.len(),
            model.constraints().len(),
            self.name()
        );

        let outcome = match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = x.iter().map(|&v| solution.value(v)).collect();
                let objective = model.objective_value(&values);
                IlpSolution::optimal(values, objective)
            }
            Err(ResolutionError::Infeasible) => IlpSolution::infeasible(),
            Err(e) => IlpSolution::error(e.to_string()),
        };
        info!(
            "{} finished in {:.2?}: {:?}",
            self.name(),
            start.elapsed(),
            outcome.status()
        );
        outcome
    }
}

fn to_expression(expr: &LinearExpr, x: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.len());
    for &(var, coef) in expr.terms() {
        out.add_mul(coef as f64, x[var]);
    }
    out
}
