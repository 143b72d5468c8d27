//! Assignment model builder.
//!
//! Turns a preference index and a configuration into an [`IlpModel`].
//! The builder holds only borrowed, immutable inputs; `build` is a pure
//! function of them and may be called any number of times.

use log::{debug, info};

use super::{
    Comparator, ConstraintClass, IlpModel, LinearConstraint, LinearExpr, ObjectiveSense,
    VariableSpace,
};
use crate::index::PreferenceIndex;
use crate::models::AssignmentConfig;

/// Builds the assignment ILP from students and configuration.
///
/// # Example
/// ```
/// use u_assign::ilp::AssignmentIlpBuilder;
/// use u_assign::index::PreferenceIndex;
/// use u_assign::models::{ActivityCatalog, AssignmentConfig, StudentRecord};
///
/// let config = AssignmentConfig::new(ActivityCatalog::from_names(["A", "B"]))
///     .with_periods(1)
///     .with_capacity(1, 2);
/// let records = vec![
///     StudentRecord::new("Ada", "Lovelace").with_choices(["A", "B", "A", "A"]),
///     StudentRecord::new("Alan", "Turing").with_choices(["B", "A", "B", "B"]),
/// ];
/// let index = PreferenceIndex::build(&records, &config.catalog, config.ranks()).unwrap();
///
/// let model = AssignmentIlpBuilder::new(&index, &config).build();
/// assert_eq!(model.variable_count(), 4); // 1 period × 2 students × 2 activities
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AssignmentIlpBuilder<'a> {
    index: &'a PreferenceIndex,
    config: &'a AssignmentConfig,
}

impl<'a> AssignmentIlpBuilder<'a> {
    /// Creates a builder over students and configuration.
    pub fn new(index: &'a PreferenceIndex, config: &'a AssignmentConfig) -> Self {
        Self { index, config }
    }

    /// The variable space the model will use.
    pub fn space(&self) -> VariableSpace {
        VariableSpace::new(
            self.config.periods,
            self.index.len(),
            self.config.catalog.len(),
        )
    }

    /// Builds the complete model.
    ///
    /// Creates:
    /// - P·S·A binary variables
    /// - P·S period-exclusivity equalities
    /// - S·A no-repeat inequalities
    /// - P·A minimum and P·A maximum capacity inequalities
    /// - S preference-satisfaction equalities
    /// - A maximization objective over ranked-choice variables
    pub fn build(&self) -> IlpModel {
        let space = self.space();
        info!(
            "building assignment model: {} periods x {} students x {} activities = {} variables",
            space.periods(),
            space.students(),
            space.activities(),
            space.len()
        );

        let mut constraints = Vec::with_capacity(
            space.periods() * space.students()
                + space.students() * space.activities()
                + 2 * space.periods() * space.activities()
                + space.students(),
        );
        self.add_exclusivity(&space, &mut constraints);
        self.add_no_repeat(&space, &mut constraints);
        self.add_capacity(&space, &mut constraints);
        self.add_preference_satisfaction(&space, &mut constraints);
        let objective = self.objective(&space);

        let model = IlpModel::new(space, constraints, objective, ObjectiveSense::Maximize);
        let stats = model.stats();
        debug!(
            "constraints: {} exclusivity, {} no-repeat, {} min-capacity, {} max-capacity, {} preference; {} objective terms",
            stats.exclusivity,
            stats.no_repeat,
            stats.min_capacity,
            stats.max_capacity,
            stats.preference,
            stats.objective_terms
        );
        model
    }

    /// Σ_a x(p, s, a) = 1 for every (p, s).
    fn add_exclusivity(&self, space: &VariableSpace, out: &mut Vec<LinearConstraint>) {
        for period in 0..space.periods() {
            for student in 0..space.students() {
                let mut expr = LinearExpr::with_capacity(space.activities());
                for var in space.row(period, student) {
                    expr.add_term(var, 1);
                }
                out.push(LinearConstraint {
                    class: ConstraintClass::PeriodExclusivity { period, student },
                    expr,
                    comparator: Comparator::Equal,
                    rhs: 1,
                });
            }
        }
    }

    /// Σ_p x(p, s, a) ≤ 1 for every (s, a).
    fn add_no_repeat(&self, space: &VariableSpace, out: &mut Vec<LinearConstraint>) {
        for student in 0..space.students() {
            for activity in 0..space.activities() {
                let mut expr = LinearExpr::with_capacity(space.periods());
                for period in 0..space.periods() {
                    expr.add_term(space.index(period, student, activity), 1);
                }
                out.push(LinearConstraint {
                    class: ConstraintClass::NoRepeat { student, activity },
                    expr,
                    comparator: Comparator::LessEq,
                    rhs: 1,
                });
            }
        }
    }

    /// min(a) ≤ Σ_s x(p, s, a) ≤ max(a) for every (p, a).
    fn add_capacity(&self, space: &VariableSpace, out: &mut Vec<LinearConstraint>) {
        for period in 0..space.periods() {
            for activity in 0..space.activities() {
                let bounds = self.config.capacity_of(activity);
                let mut expr = LinearExpr::with_capacity(space.students());
                for student in 0..space.students() {
                    expr.add_term(space.index(period, student, activity), 1);
                }
                out.push(LinearConstraint {
                    class: ConstraintClass::MinCapacity { period, activity },
                    expr: expr.clone(),
                    comparator: Comparator::GreaterEq,
                    rhs: i64::from(bounds.min),
                });
                out.push(LinearConstraint {
                    class: ConstraintClass::MaxCapacity { period, activity },
                    expr,
                    comparator: Comparator::LessEq,
                    rhs: i64::from(bounds.max),
                });
            }
        }
    }

    /// Σ_p Σ_k x(p, s, choice_k(s)) = required for every s.
    ///
    /// A choice listed at several ranks contributes once per listing.
    fn add_preference_satisfaction(&self, space: &VariableSpace, out: &mut Vec<LinearConstraint>) {
        let required = self.config.required_matches as i64;
        for student in self.index.students() {
            let mut expr = LinearExpr::with_capacity(space.periods() * student.choices.len());
            for period in 0..space.periods() {
                for &choice in &student.choices {
                    expr.add_term(space.index(period, student.id, choice), 1);
                }
            }
            out.push(LinearConstraint {
                class: ConstraintClass::PreferenceSatisfaction {
                    student: student.id,
                },
                expr,
                comparator: Comparator::Equal,
                rhs: required,
            });
        }
    }

    /// Σ_p Σ_s Σ_k w_k · x(p, s, choice_k(s)).
    ///
    /// The period a choice is honored in does not affect the score.
    fn objective(&self, space: &VariableSpace) -> LinearExpr {
        let mut objective =
            LinearExpr::with_capacity(space.periods() * space.students() * self.config.ranks());
        for period in 0..space.periods() {
            for student in self.index.students() {
                for (&choice, &weight) in student.choices.iter().zip(&self.config.rank_weights) {
                    objective.add_term(space.index(period, student.id, choice), weight);
                }
            }
        }
        objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityCatalog, StudentRecord};

    fn setup() -> (AssignmentConfig, PreferenceIndex) {
        let catalog = ActivityCatalog::from_names(["A", "B", "C", "D", "E"])
            .with_capacity_override("E", 0, 1);
        let config = AssignmentConfig::new(catalog)
            .with_periods(3)
            .with_capacity(1, 4);
        let records = vec![
            StudentRecord::new("S", "One").with_choices(["A", "B", "C", "D"]),
            StudentRecord::new("S", "Two").with_choices(["E", "D", "C", "B"]),
            StudentRecord::new("S", "Three").with_choices(["B", "A", "E", "C"]),
        ];
        let index = PreferenceIndex::build(&records, &config.catalog, config.ranks()).unwrap();
        (config, index)
    }

    #[test]
    fn test_model_dimensions() {
        let (config, index) = setup();
        let model = AssignmentIlpBuilder::new(&index, &config).build();
        let stats = model.stats();

        assert_eq!(stats.variables, 3 * 3 * 5);
        assert_eq!(stats.exclusivity, 3 * 3);
        assert_eq!(stats.no_repeat, 3 * 5);
        assert_eq!(stats.min_capacity, 3 * 5);
        assert_eq!(stats.max_capacity, 3 * 5);
        assert_eq!(stats.preference, 3);
        assert_eq!(stats.objective_terms, 3 * 3 * 4);
        assert_eq!(stats.constraints(), 9 + 15 + 15 + 15 + 3);
        assert_eq!(model.sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn test_exclusivity_rows() {
        let (config, index) = setup();
        let model = AssignmentIlpBuilder::new(&index, &config).build();
        let space = *model.space();

        let row = model
            .constraints()
            .iter()
            .find(|c| {
                c.class
                    == ConstraintClass::PeriodExclusivity {
                        period: 2,
                        student: 1,
                    }
            })
            .unwrap();
        assert_eq!(row.comparator, Comparator::Equal);
        assert_eq!(row.rhs, 1);
        let vars: Vec<usize> = row.expr.terms().iter().map(|&(v, _)| v).collect();
        assert_eq!(vars, space.row(2, 1).collect::<Vec<_>>());
    }

    #[test]
    fn test_capacity_override_applied() {
        let (config, index) = setup();
        let model = AssignmentIlpBuilder::new(&index, &config).build();

        let max_e = model
            .constraints()
            .iter()
            .find(|c| {
                c.class
                    == ConstraintClass::MaxCapacity {
                        period: 0,
                        activity: 4,
                    }
            })
            .unwrap();
        assert_eq!(max_e.rhs, 1);

        let min_a = model
            .constraints()
            .iter()
            .find(|c| {
                c.class
                    == ConstraintClass::MinCapacity {
                        period: 1,
                        activity: 0,
                    }
            })
            .unwrap();
        assert_eq!(min_a.comparator, Comparator::GreaterEq);
        assert_eq!(min_a.rhs, 1);
        assert_eq!(min_a.expr.len(), 3);
    }

    #[test]
    fn test_preference_row() {
        let (config, index) = setup();
        let model = AssignmentIlpBuilder::new(&index, &config).build();
        let space = *model.space();

        let row = model
            .constraints()
            .iter()
            .find(|c| c.class == ConstraintClass::PreferenceSatisfaction { student: 1 })
            .unwrap();
        assert_eq!(row.comparator, Comparator::Equal);
        assert_eq!(row.rhs, 3);
        assert_eq!(row.expr.len(), 3 * 4);
        // Student 1 prefers E, D, C, B: never A.
        for p in 0..3 {
            assert!(!row
                .expr
                .terms()
                .iter()
                .any(|&(v, _)| v == space.index(p, 1, 0)));
        }
    }

    #[test]
    fn test_objective_weights() {
        let (config, index) = setup();
        let model = AssignmentIlpBuilder::new(&index, &config).build();
        let space = *model.space();

        let mut values = vec![0.0; model.variable_count()];
        // Student 0: A (rank 1) in period 0, D (rank 4) in period 2.
        values[space.index(0, 0, 0)] = 1.0;
        values[space.index(2, 0, 3)] = 1.0;
        // Student 2: E (rank 3) in period 1.
        values[space.index(1, 2, 4)] = 1.0;
        // Student 1: A is not ranked, no points.
        values[space.index(0, 1, 0)] = 1.0;

        assert!((model.objective_value(&values) - 1011.0).abs() < 1e-10);
    }

    #[test]
    fn test_build_is_repeatable() {
        let (config, index) = setup();
        let builder = AssignmentIlpBuilder::new(&index, &config);
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_duplicate_choice_counts_per_listing() {
        let config = AssignmentConfig::new(ActivityCatalog::from_names(["A", "B"]))
            .with_periods(1)
            .with_capacity(1, 2);
        let records = vec![StudentRecord::new("S", "One").with_choices(["A", "B", "A", "A"])];
        let index = PreferenceIndex::build(&records, &config.catalog, 4).unwrap();
        let model = AssignmentIlpBuilder::new(&index, &config).build();

        let row = model
            .constraints()
            .iter()
            .find(|c| c.class == ConstraintClass::PreferenceSatisfaction { student: 0 })
            .unwrap();
        // Attending A covers three slots.
        let values = [1.0, 0.0];
        assert!(row.is_satisfied_by(&values));
        assert!((model.objective_value(&values) - 1011.0).abs() < 1e-10);
    }
}
