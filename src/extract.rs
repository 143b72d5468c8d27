//! Solution extraction.
//!
//! Reads solver values back into an [`Assignment`]. For each period, in
//! order, and each student, exactly one activity variable must be 1 and
//! every other must be 0. Anything else means the solver broke its
//! contract, and extraction fails rather than guessing.

use log::trace;

use crate::error::ExtractionError;
use crate::ilp::{IlpModel, IlpSolution, INTEGRALITY_TOLERANCE};
use crate::models::Assignment;

/// Builds the assignment from an optimal solution.
///
/// # Errors
/// - [`ExtractionError::NotOptimal`] if the solution is not optimal
/// - [`ExtractionError::ValueCount`] if values and variables disagree in number
/// - [`ExtractionError::Fractional`] for a value that is neither 0 nor 1
///   (NaN and infinities included)
/// - [`ExtractionError::Exclusivity`] if a (period, student) pair has zero
///   or several activities at 1
pub fn extract_assignment(
    model: &IlpModel,
    solution: &IlpSolution,
) -> Result<Assignment, ExtractionError> {
    if !solution.is_optimal() {
        return Err(ExtractionError::NotOptimal);
    }

    let space = model.space();
    let values = solution.values();
    if values.len() != space.len() {
        return Err(ExtractionError::ValueCount {
            expected: space.len(),
            found: values.len(),
        });
    }

    let mut rows = vec![Vec::with_capacity(space.periods()); space.students()];
    for period in 0..space.periods() {
        for (student, row) in rows.iter_mut().enumerate() {
            let mut chosen = None;
            let mut selected = 0;

            for (activity, var) in space.row(period, student).enumerate() {
                let value = values[var];
                if (value - 1.0).abs() <= INTEGRALITY_TOLERANCE {
                    selected += 1;
                    chosen = Some(activity);
                } else if !value.is_finite() || value.abs() > INTEGRALITY_TOLERANCE {
                    return Err(ExtractionError::Fractional {
                        period,
                        student,
                        activity,
                        value,
                    });
                }
            }

            match (selected, chosen) {
                (1, Some(activity)) => {
                    trace!("student {student} -> activity {activity} in period {period}");
                    row.push(activity);
                }
                _ => {
                    return Err(ExtractionError::Exclusivity {
                        period,
                        student,
                        selected,
                    })
                }
            }
        }
    }

    Ok(Assignment::from_rows(space.periods(), rows))
}
