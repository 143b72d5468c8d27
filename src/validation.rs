//! Configuration validation and assignment audits.
//!
//! Two kinds of checks live here:
//!
//! - [`validate_config`] runs before anything is built and rejects
//!   configurations that cannot describe a model at all (no periods,
//!   empty catalog, duplicate names, inverted capacity bounds, unusable
//!   rank weights). It collects every problem rather than stopping at
//!   the first one.
//! - [`audit_assignment`] runs after extraction and re-checks every
//!   model invariant directly on the assignment. For an optimal solve
//!   it must come back empty.
//!
//! Feasibility (e.g. minimum capacities that exceed the head count) is
//! not checked here; the solver reports it as infeasibility.

use std::collections::HashSet;

use crate::index::PreferenceIndex;
use crate::models::{Assignment, AssignmentConfig, Violation, ViolationType};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The number of periods is zero.
    NoPeriods,
    /// The catalog has no activities.
    EmptyCatalog,
    /// Two activities share a name.
    DuplicateActivity,
    /// An activity's minimum exceeds its maximum.
    InvertedCapacity,
    /// No rank weights are configured.
    NoRanks,
    /// A rank weight is zero or negative.
    NonPositiveWeight,
    /// More matches are required than there are ranked choices.
    RequiredMatchesExceedRanks,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a run configuration.
///
/// Checks:
/// 1. At least one period
/// 2. At least one activity
/// 3. No duplicate activity names
/// 4. `min <= max` for the default bounds and every override
/// 5. At least one rank weight, all positive
/// 6. `required_matches <= ranks`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &AssignmentConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.periods == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoPeriods,
            "Number of periods must be at least 1",
        ));
    }

    if config.catalog.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Activity catalog is empty",
        ));
    }

    let mut names = HashSet::new();
    for activity in config.catalog.iter() {
        if !names.insert(activity.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateActivity,
                format!("Duplicate activity name: {}", activity.name),
            ));
        }
    }

    if !config.capacity.is_consistent() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedCapacity,
            format!(
                "Default capacity minimum {} exceeds maximum {}",
                config.capacity.min, config.capacity.max
            ),
        ));
    }
    for activity in config.catalog.iter() {
        if let Some(bounds) = activity.capacity {
            if !bounds.is_consistent() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvertedCapacity,
                    format!(
                        "Activity '{}' minimum {} exceeds maximum {}",
                        activity.name, bounds.min, bounds.max
                    ),
                ));
            }
        }
    }

    if config.rank_weights.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRanks,
            "At least one rank weight is required",
        ));
    }
    for (i, &weight) in config.rank_weights.iter().enumerate() {
        if weight <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveWeight,
                format!("Weight for rank {} must be positive, got {weight}", i + 1),
            ));
        }
    }

    if config.required_matches > config.ranks() {
        errors.push(ValidationError::new(
            ValidationErrorKind::RequiredMatchesExceedRanks,
            format!(
                "Required matches {} exceed the {} ranked choices",
                config.required_matches,
                config.ranks()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits an assignment against every model invariant.
///
/// Checks, for each student, one catalog activity per period, no repeated
/// activity, and exactly `required_matches` preference slots covered; and
/// for each (period, activity), a head count within capacity. Preference
/// slots are counted the way the model counts them: a choice listed twice
/// covers two slots.
pub fn audit_assignment(
    config: &AssignmentConfig,
    index: &PreferenceIndex,
    assignment: &Assignment,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let activity_count = config.catalog.len();

    for student in index.students() {
        let row = assignment.activities_of(student.id);

        for period in 0..config.periods {
            match row.get(period) {
                Some(&activity) if activity < activity_count => {}
                _ => violations.push(Violation::missing_period(
                    student.id,
                    period,
                    format!(
                        "Student '{}' has no activity in period {}",
                        student.display_name(),
                        period + 1
                    ),
                )),
            }
        }

        let mut seen = HashSet::new();
        for &activity in row {
            if !seen.insert(activity) {
                violations.push(Violation::repeated_activity(
                    student.id,
                    activity,
                    format!(
                        "Student '{}' attends '{}' more than once",
                        student.display_name(),
                        config.catalog.name_of(activity)
                    ),
                ));
            }
        }

        let covered: usize = row
            .iter()
            .map(|a| student.choices.iter().filter(|c| *c == a).count())
            .sum();
        if covered != config.required_matches {
            violations.push(Violation::preference_mismatch(
                student.id,
                format!(
                    "Student '{}' covers {covered} preference slots, expected {}",
                    student.display_name(),
                    config.required_matches
                ),
            ));
        }
    }

    let counts = assignment.head_counts(activity_count);
    for (period, per_activity) in counts.iter().enumerate() {
        for (activity, &count) in per_activity.iter().enumerate() {
            let bounds = config.capacity_of(activity);
            let kind = if count < bounds.min {
                ViolationType::CapacityShortfall
            } else if count > bounds.max {
                ViolationType::CapacityExceeded
            } else {
                continue;
            };
            violations.push(Violation::capacity(
                kind,
                period,
                activity,
                format!(
                    "Activity '{}' has {count} students in period {}, bounds [{}, {}]",
                    config.catalog.name_of(activity),
                    period + 1,
                    bounds.min,
                    bounds.max
                ),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityCatalog, StudentRecord};

    fn small_config() -> AssignmentConfig {
        AssignmentConfig::new(ActivityCatalog::from_names(["A", "B", "C", "D"]))
            .with_periods(2)
            .with_capacity(0, 2)
            .with_required_matches(2)
    }

    fn small_index(config: &AssignmentConfig) -> PreferenceIndex {
        let records = vec![
            StudentRecord::new("S", "One").with_choices(["A", "B", "C", "D"]),
            StudentRecord::new("S", "Two").with_choices(["B", "C", "D", "A"]),
        ];
        PreferenceIndex::build(&records, &config.catalog, config.ranks()).unwrap()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&AssignmentConfig::science_fair()).is_ok());
        assert!(validate_config(&small_config()).is_ok());
    }

    #[test]
    fn test_no_periods_and_empty_catalog() {
        let config = AssignmentConfig::new(ActivityCatalog::default()).with_periods(0);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoPeriods));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyCatalog));
    }

    #[test]
    fn test_duplicate_activity() {
        let config = AssignmentConfig::new(ActivityCatalog::from_names(["A", "B", "A"]));

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateActivity && e.message.contains("A")));
    }

    #[test]
    fn test_inverted_capacity() {
        let catalog = ActivityCatalog::from_activities(vec![
            Activity::new(0, "A"),
            Activity::new(1, "B").with_capacity(4, 3),
        ]);
        let config = AssignmentConfig::new(catalog).with_capacity(9, 5);

        let errors = validate_config(&config).unwrap_err();
        let inverted: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::InvertedCapacity)
            .collect();
        assert_eq!(inverted.len(), 2);
    }

    #[test]
    fn test_rank_weights() {
        let config = AssignmentConfig::science_fair().with_rank_weights(vec![]);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoRanks));
        // 3 required of 0 ranks
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::RequiredMatchesExceedRanks));

        let config = AssignmentConfig::science_fair().with_rank_weights(vec![10, 0, 1, -1]);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NonPositiveWeight)
                .count(),
            2
        );
    }

    #[test]
    fn test_audit_clean() {
        let config = small_config();
        let index = small_index(&config);
        // One: A, B (2 of its choices). Two: B, C (2 of its choices).
        let assignment = Assignment::from_rows(2, vec![vec![0, 1], vec![1, 2]]);

        assert!(audit_assignment(&config, &index, &assignment).is_empty());
    }

    #[test]
    fn test_audit_repeat_and_missing() {
        let config = small_config();
        let index = small_index(&config);
        let assignment = Assignment::from_rows(2, vec![vec![0, 0], vec![1]]);

        let violations = audit_assignment(&config, &index, &assignment);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::RepeatedActivity && v.student == Some(0)));
        assert!(violations.iter().any(|v| {
            v.violation_type == ViolationType::MissingPeriod
                && v.student == Some(1)
                && v.period == Some(1)
        }));
    }

    #[test]
    fn test_audit_capacity() {
        let config = small_config().with_capacity(1, 1);
        let index = small_index(&config);
        // Both in A for period 0: A exceeds, B/C/D fall short.
        let assignment = Assignment::from_rows(2, vec![vec![0, 1], vec![0, 2]]);

        let violations = audit_assignment(&config, &index, &assignment);
        assert!(violations.iter().any(|v| {
            v.violation_type == ViolationType::CapacityExceeded
                && v.period == Some(0)
                && v.activity == Some(0)
        }));
        assert!(violations.iter().any(|v| {
            v.violation_type == ViolationType::CapacityShortfall
                && v.period == Some(0)
                && v.activity == Some(3)
        }));
    }

    #[test]
    fn test_audit_preference_mismatch() {
        let config = small_config().with_required_matches(2);
        let records = vec![StudentRecord::new("S", "One").with_choices(["A", "B", "A", "A"])];
        let index = PreferenceIndex::build(&records, &config.catalog, 4).unwrap();
        // A covers three slots (ranks 1, 3, 4), B one more: 4 != 2.
        let assignment = Assignment::from_rows(2, vec![vec![0, 1]]);

        let violations = audit_assignment(&config, &index, &assignment);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::PreferenceMismatch));
    }
}
