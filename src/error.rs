//! Error types for the assignment pipeline.
//!
//! Each failure class is a separate variant so callers can tell a bad
//! input row from an over-constrained dataset from a broken solver.
//! Nothing in the crate retries; every error ends the run.

use thiserror::Error;

use crate::models::Violation;
use crate::pipeline::PipelineStage;
use crate::validation::ValidationError;

/// Why an input record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// The record does not have `first_name, last_name` plus one field per rank.
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    /// A choice names an activity outside the catalog.
    #[error("choice {rank} names unknown activity '{name}'")]
    UnknownActivity { rank: usize, name: String },
    /// A required field is blank.
    #[error("field '{field}' is empty")]
    EmptyField { field: &'static str },
    /// The input holds no student records.
    #[error("no student records")]
    NoRecords,
}

/// The solver reported `optimal` but its values break the model contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// Extraction was attempted on a non-optimal solution.
    #[error("solution status is not optimal")]
    NotOptimal,
    /// The solution does not carry one value per decision variable.
    #[error("solution has {found} values, model has {expected} variables")]
    ValueCount { expected: usize, found: usize },
    /// A binary variable came back with a fractional value.
    #[error(
        "variable for student {student}, period {period}, activity {activity} has non-binary value {value}"
    )]
    Fractional {
        period: usize,
        student: usize,
        activity: usize,
        value: f64,
    },
    /// Zero or several activities are selected for one (period, student).
    #[error("student {student} has {selected} activities selected in period {period}")]
    Exclusivity {
        period: usize,
        student: usize,
        selected: usize,
    },
}

/// A failed assignment run.
#[derive(Debug, Error)]
pub enum AssignError {
    /// The configuration is structurally unusable.
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),
    /// An input record is malformed (1-based record number, header excluded).
    #[error("malformed input at record {record}: {reason}")]
    MalformedInput { record: usize, reason: MalformedReason },
    /// No assignment satisfies every hard constraint.
    #[error("model is infeasible: {detail}")]
    Infeasible { detail: String },
    /// The solver backend failed without proving infeasibility.
    #[error("solver '{solver}' failed: {message}")]
    Solver { solver: String, message: String },
    /// The solver's answer violates the model contract.
    #[error("solution extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    /// The extracted assignment breaks a model invariant the solver
    /// claimed to satisfy.
    #[error("solution breaks {} invariant(s): {}", .violations.len(), join_violations(.violations))]
    Unsound { violations: Vec<Violation> },
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The tabular layer failed to read or write a record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl AssignError {
    /// Last stage a run completed before this error ended it.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::InvalidConfig(_) | Self::MalformedInput { .. } | Self::Io(_) | Self::Csv(_) => {
                PipelineStage::Unbuilt
            }
            Self::Infeasible { .. } | Self::Solver { .. } => PipelineStage::Built,
            Self::Extraction(_) => PipelineStage::Solved,
            Self::Unsound { .. } => PipelineStage::Extracted,
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_malformed_display() {
        let err = AssignError::MalformedInput {
            record: 7,
            reason: MalformedReason::UnknownActivity {
                rank: 2,
                name: "Chess".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "malformed input at record 7: choice 2 names unknown activity 'Chess'"
        );
    }

    #[test]
    fn test_invalid_config_joins_messages() {
        let err = AssignError::InvalidConfig(vec![
            ValidationError::new(ValidationErrorKind::NoPeriods, "no periods"),
            ValidationError::new(ValidationErrorKind::EmptyCatalog, "no activities"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration: no periods; no activities"
        );
    }

    #[test]
    fn test_stage_of_errors() {
        let infeasible = AssignError::Infeasible {
            detail: String::new(),
        };
        assert_eq!(infeasible.stage(), PipelineStage::Built);

        let extraction = AssignError::from(ExtractionError::NotOptimal);
        assert_eq!(extraction.stage(), PipelineStage::Solved);

        let malformed = AssignError::MalformedInput {
            record: 1,
            reason: MalformedReason::EmptyField {
                field: "first_name",
            },
        };
        assert_eq!(malformed.stage(), PipelineStage::Unbuilt);
    }

    #[test]
    fn test_unsound_display_and_stage() {
        let err = AssignError::Unsound {
            violations: vec![Violation::preference_mismatch(
                1,
                "Student 'Turing, Alan' covers 1 preference slots, expected 3",
            )],
        };
        assert_eq!(
            err.to_string(),
            "solution breaks 1 invariant(s): Student 'Turing, Alan' covers 1 preference slots, expected 3"
        );
        assert_eq!(err.stage(), PipelineStage::Extracted);
    }

    #[test]
    fn test_exclusivity_display() {
        let err = ExtractionError::Exclusivity {
            period: 1,
            student: 4,
            selected: 0,
        };
        assert_eq!(
            err.to_string(),
            "student 4 has 0 activities selected in period 1"
        );
    }
}
