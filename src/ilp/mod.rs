//! ILP formulation of the period-assignment problem.
//!
//! Translates students, ranked choices, and capacity bounds into a
//! binary integer program, hands it to any [`IlpSolver`], and defines
//! the request/response types that cross that boundary.
//!
//! # Formulation
//!
//! One binary variable x(p, s, a) per (period, student, activity), stored
//! in a flat arena addressed by [`VariableSpace::index`]. Constraints:
//!
//! | Class | Scope | Relation |
//! |-------|-------|----------|
//! | Period exclusivity | (p, s) | Σ_a x = 1 |
//! | No repeat | (s, a) | Σ_p x ≤ 1 |
//! | Minimum capacity | (p, a) | Σ_s x ≥ min(a) |
//! | Maximum capacity | (p, a) | Σ_s x ≤ max(a) |
//! | Preference satisfaction | (s) | Σ_p Σ_k x(p, s, choice_k) = required |
//!
//! Objective: maximize Σ w_k · x(p, s, choice_k) over all periods,
//! students, and ranks.
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", Ch. 1
//! - Williams (2013), "Model Building in Mathematical Programming", Ch. 9

mod backend;
mod builder;
mod solver;

pub use backend::GoodLpSolver;
pub use builder::AssignmentIlpBuilder;
pub use solver::{IlpSolution, IlpSolver, SolveStatus};

use serde::Serialize;

use crate::models::{ActivityId, StudentId};

/// Tolerance when comparing solver values against integers.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Dense (period, student, activity) variable space.
///
/// Variables are laid out period-major, then student, then activity, so
/// all activity variables of one (period, student) pair are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableSpace {
    periods: usize,
    students: usize,
    activities: usize,
}

/// Coordinates of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VarKey {
    /// Period.
    pub period: usize,
    /// Student.
    pub student: StudentId,
    /// Activity.
    pub activity: ActivityId,
}

impl VariableSpace {
    /// Creates a variable space of `periods × students × activities`.
    pub fn new(periods: usize, students: usize, activities: usize) -> Self {
        Self {
            periods,
            students,
            activities,
        }
    }

    /// Number of periods (P).
    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Number of students (S).
    #[inline]
    pub fn students(&self) -> usize {
        self.students
    }

    /// Number of activities (A).
    #[inline]
    pub fn activities(&self) -> usize {
        self.activities
    }

    /// Total number of variables (P·S·A).
    #[inline]
    pub fn len(&self) -> usize {
        self.periods * self.students * self.activities
    }

    /// Whether the space has no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of x(period, student, activity).
    #[inline]
    pub fn index(&self, period: usize, student: StudentId, activity: ActivityId) -> usize {
        debug_assert!(period < self.periods);
        debug_assert!(student < self.students);
        debug_assert!(activity < self.activities);
        (period * self.students + student) * self.activities + activity
    }

    /// Coordinates of a flat index.
    pub fn key(&self, index: usize) -> Option<VarKey> {
        if index >= self.len() {
            return None;
        }
        let activity = index % self.activities;
        let rest = index / self.activities;
        Some(VarKey {
            period: rest / self.students,
            student: rest % self.students,
            activity,
        })
    }

    /// Flat index range of all activity variables for one (period, student).
    pub fn row(&self, period: usize, student: StudentId) -> std::ops::Range<usize> {
        let start = self.index(period, student, 0);
        start..start + self.activities
    }
}

/// Sparse linear expression over decision variables.
///
/// A variable may appear in several terms; coefficients add up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinearExpr {
    terms: Vec<(usize, i64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty expression with room for `capacity` terms.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Adds `coefficient · x[variable]`.
    pub fn add_term(&mut self, variable: usize, coefficient: i64) {
        self.terms.push((variable, coefficient));
    }

    /// All `(variable, coefficient)` terms in insertion order.
    #[inline]
    pub fn terms(&self) -> &[(usize, i64)] {
        &self.terms
    }

    /// Number of terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no terms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression at the given variable values.
    ///
    /// Variables beyond `values` count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef as f64 * values.get(var).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Relation between a constraint's expression and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparator {
    /// `expr <= rhs`
    LessEq,
    /// `expr == rhs`
    Equal,
    /// `expr >= rhs`
    GreaterEq,
}

/// Which invariant a constraint encodes, and for which key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintClass {
    /// Exactly one activity for a student in a period.
    PeriodExclusivity { period: usize, student: StudentId },
    /// A student attends an activity in at most one period.
    NoRepeat {
        student: StudentId,
        activity: ActivityId,
    },
    /// Lower head-count bound of an activity in a period.
    MinCapacity { period: usize, activity: ActivityId },
    /// Upper head-count bound of an activity in a period.
    MaxCapacity { period: usize, activity: ActivityId },
    /// Exact number of a student's preference slots covered.
    PreferenceSatisfaction { student: StudentId },
}

impl ConstraintClass {
    /// Short name of the constraint class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PeriodExclusivity { .. } => "period-exclusivity",
            Self::NoRepeat { .. } => "no-repeat",
            Self::MinCapacity { .. } => "min-capacity",
            Self::MaxCapacity { .. } => "max-capacity",
            Self::PreferenceSatisfaction { .. } => "preference-satisfaction",
        }
    }
}

/// A linear constraint `expr ⋈ rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    /// Invariant encoded by this row.
    pub class: ConstraintClass,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub comparator: Comparator,
    /// Constant bound.
    pub rhs: i64,
}

impl LinearConstraint {
    /// Whether the constraint holds at the given values (within tolerance).
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        let lhs = self.expr.evaluate(values);
        let rhs = self.rhs as f64;
        match self.comparator {
            Comparator::LessEq => lhs <= rhs + INTEGRALITY_TOLERANCE,
            Comparator::Equal => (lhs - rhs).abs() <= INTEGRALITY_TOLERANCE,
            Comparator::GreaterEq => lhs >= rhs - INTEGRALITY_TOLERANCE,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectiveSense {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

/// A complete binary integer program.
///
/// Every variable has domain {0, 1}.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IlpModel {
    space: VariableSpace,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
    sense: ObjectiveSense,
}

/// Size summary of a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    /// Decision variables.
    pub variables: usize,
    /// Period-exclusivity rows.
    pub exclusivity: usize,
    /// No-repeat rows.
    pub no_repeat: usize,
    /// Minimum-capacity rows.
    pub min_capacity: usize,
    /// Maximum-capacity rows.
    pub max_capacity: usize,
    /// Preference-satisfaction rows.
    pub preference: usize,
    /// Objective terms.
    pub objective_terms: usize,
}

impl ModelStats {
    /// Total number of constraint rows.
    pub fn constraints(&self) -> usize {
        self.exclusivity + self.no_repeat + self.min_capacity + self.max_capacity + self.preference
    }
}

impl IlpModel {
    /// Creates a model from its parts.
    pub fn new(
        space: VariableSpace,
        constraints: Vec<LinearConstraint>,
        objective: LinearExpr,
        sense: ObjectiveSense,
    ) -> Self {
        Self {
            space,
            constraints,
            objective,
            sense,
        }
    }

    /// The variable space.
    #[inline]
    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    /// Number of decision variables.
    #[inline]
    pub fn variable_count(&self) -> usize {
        self.space.len()
    }

    /// All constraints in construction order.
    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// The objective expression.
    #[inline]
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// The optimization direction.
    #[inline]
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Objective value at the given variable values.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Constraints not satisfied by the given values.
    pub fn violated_constraints(&self, values: &[f64]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(values))
            .collect()
    }

    /// Size summary.
    pub fn stats(&self) -> ModelStats {
        let mut stats = ModelStats {
            variables: self.variable_count(),
            objective_terms: self.objective.len(),
            ..ModelStats::default()
        };
        for constraint in &self.constraints {
            match constraint.class {
                ConstraintClass::PeriodExclusivity { .. } => stats.exclusivity += 1,
                ConstraintClass::NoRepeat { .. } => stats.no_repeat += 1,
                ConstraintClass::MinCapacity { .. } => stats.min_capacity += 1,
                ConstraintClass::MaxCapacity { .. } => stats.max_capacity += 1,
                ConstraintClass::PreferenceSatisfaction { .. } => stats.preference += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let space = VariableSpace::new(3, 4, 5);
        assert_eq!(space.len(), 60);

        let mut seen = vec![false; space.len()];
        for p in 0..3 {
            for s in 0..4 {
                for a in 0..5 {
                    let i = space.index(p, s, a);
                    assert!(!seen[i]);
                    seen[i] = true;
                    assert_eq!(
                        space.key(i),
                        Some(VarKey {
                            period: p,
                            student: s,
                            activity: a
                        })
                    );
                }
            }
        }
        assert!(seen.iter().all(|&b| b));
        assert_eq!(space.key(60), None);
    }

    #[test]
    fn test_row_is_contiguous() {
        let space = VariableSpace::new(2, 3, 4);
        let row = space.row(1, 2);
        assert_eq!(row.len(), 4);
        assert_eq!(row.start, space.index(1, 2, 0));
        assert_eq!(row.end - 1, space.index(1, 2, 3));
    }

    #[test]
    fn test_empty_space() {
        let space = VariableSpace::new(3, 0, 11);
        assert!(space.is_empty());
        assert_eq!(space.key(0), None);
    }

    #[test]
    fn test_expr_evaluate_accumulates() {
        let mut expr = LinearExpr::new();
        expr.add_term(0, 2);
        expr.add_term(2, 5);
        expr.add_term(0, 1);

        assert!((expr.evaluate(&[1.0, 1.0, 1.0]) - 8.0).abs() < 1e-10);
        assert!((expr.evaluate(&[1.0]) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let mut expr = LinearExpr::new();
        expr.add_term(0, 1);
        expr.add_term(1, 1);
        let constraint = LinearConstraint {
            class: ConstraintClass::PeriodExclusivity {
                period: 0,
                student: 0,
            },
            expr,
            comparator: Comparator::Equal,
            rhs: 1,
        };

        assert!(constraint.is_satisfied_by(&[1.0, 0.0]));
        assert!(constraint.is_satisfied_by(&[0.0, 0.999_999_9]));
        assert!(!constraint.is_satisfied_by(&[1.0, 1.0]));
        assert!(!constraint.is_satisfied_by(&[0.0, 0.0]));
    }

    #[test]
    fn test_class_names() {
        let class = ConstraintClass::MinCapacity {
            period: 0,
            activity: 1,
        };
        assert_eq!(class.name(), "min-capacity");
    }
}
