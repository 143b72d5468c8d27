//! Assignment (solution) model.
//!
//! An assignment lists, for every student, the activity attended in each
//! period. It is produced once by the solution extractor and never
//! modified afterwards: the type has no mutating methods.
//!
//! Audits of an assignment report [`Violation`]s, one per broken
//! invariant instance.

use serde::Serialize;

use super::{ActivityId, StudentId};

/// Per-student, per-period activity assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    periods: usize,
    /// `rows[s][p]` = activity of student `s` in period `p`.
    rows: Vec<Vec<ActivityId>>,
}

impl Assignment {
    /// Wraps extracted rows. Only the extractor (and tests) build assignments.
    pub(crate) fn from_rows(periods: usize, rows: Vec<Vec<ActivityId>>) -> Self {
        Self { periods, rows }
    }

    /// Number of periods (P).
    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Number of students covered.
    #[inline]
    pub fn student_count(&self) -> usize {
        self.rows.len()
    }

    /// Activities of a student in period order (empty for unknown students).
    pub fn activities_of(&self, student: StudentId) -> &[ActivityId] {
        self.rows.get(student).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Activity of a student in a given period.
    pub fn activity_at(&self, student: StudentId, period: usize) -> Option<ActivityId> {
        self.rows.get(student).and_then(|row| row.get(period).copied())
    }

    /// Whether a student attends an activity in any period.
    pub fn attends(&self, student: StudentId, activity: ActivityId) -> bool {
        self.activities_of(student).contains(&activity)
    }

    /// Iterates over `(student, activities)` in student order.
    pub fn iter(&self) -> impl Iterator<Item = (StudentId, &[ActivityId])> {
        self.rows.iter().enumerate().map(|(s, row)| (s, row.as_slice()))
    }

    /// Students attending an activity in a period, in id order.
    pub fn roster(&self, period: usize, activity: ActivityId) -> Vec<StudentId> {
        self.iter()
            .filter(|(_, row)| row.get(period) == Some(&activity))
            .map(|(s, _)| s)
            .collect()
    }

    /// Head counts indexed `[period][activity]`.
    ///
    /// Activity ids at or beyond `activity_count` are ignored.
    pub fn head_counts(&self, activity_count: usize) -> Vec<Vec<u32>> {
        let mut counts = vec![vec![0u32; activity_count]; self.periods];
        for row in &self.rows {
            for (period, &activity) in row.iter().enumerate().take(self.periods) {
                if activity < activity_count {
                    counts[period][activity] += 1;
                }
            }
        }
        counts
    }
}

/// A broken assignment invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Student concerned, if the violation is per-student.
    pub student: Option<StudentId>,
    /// Period concerned, if any.
    pub period: Option<usize>,
    /// Activity concerned, if any.
    pub activity: Option<ActivityId>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of assignment violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    /// A student has no valid activity for a period.
    MissingPeriod,
    /// A student attends the same activity in two periods.
    RepeatedActivity,
    /// Fewer students than the activity minimum in a period.
    CapacityShortfall,
    /// More students than the activity maximum in a period.
    CapacityExceeded,
    /// A student received a number of ranked choices other than required.
    PreferenceMismatch,
}

impl Violation {
    /// Creates a per-student period violation.
    pub fn missing_period(student: StudentId, period: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::MissingPeriod,
            student: Some(student),
            period: Some(period),
            activity: None,
            message: message.into(),
        }
    }

    /// Creates a repeated-activity violation.
    pub fn repeated_activity(
        student: StudentId,
        activity: ActivityId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type: ViolationType::RepeatedActivity,
            student: Some(student),
            period: None,
            activity: Some(activity),
            message: message.into(),
        }
    }

    /// Creates a capacity violation (shortfall or excess).
    pub fn capacity(
        violation_type: ViolationType,
        period: usize,
        activity: ActivityId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            student: None,
            period: Some(period),
            activity: Some(activity),
            message: message.into(),
        }
    }

    /// Creates a preference-count violation.
    pub fn preference_mismatch(student: StudentId, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::PreferenceMismatch,
            student: Some(student),
            period: None,
            activity: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        // 3 students, 2 periods, 3 activities
        Assignment::from_rows(2, vec![vec![0, 1], vec![1, 2], vec![0, 2]])
    }

    #[test]
    fn test_accessors() {
        let a = sample();
        assert_eq!(a.periods(), 2);
        assert_eq!(a.student_count(), 3);
        assert_eq!(a.activities_of(1), &[1, 2]);
        assert_eq!(a.activities_of(9), &[] as &[usize]);
        assert_eq!(a.activity_at(2, 1), Some(2));
        assert_eq!(a.activity_at(2, 5), None);
        assert!(a.attends(0, 1));
        assert!(!a.attends(0, 2));
    }

    #[test]
    fn test_roster() {
        let a = sample();
        assert_eq!(a.roster(0, 0), vec![0, 2]);
        assert_eq!(a.roster(1, 2), vec![1, 2]);
        assert!(a.roster(1, 0).is_empty());
    }

    #[test]
    fn test_head_counts() {
        let counts = sample().head_counts(3);
        assert_eq!(counts, vec![vec![2, 1, 0], vec![0, 1, 2]]);
    }

    #[test]
    fn test_violation_constructors() {
        let v = Violation::repeated_activity(4, 2, "again");
        assert_eq!(v.violation_type, ViolationType::RepeatedActivity);
        assert_eq!(v.student, Some(4));
        assert_eq!(v.activity, Some(2));
        assert_eq!(v.period, None);

        let v = Violation::capacity(ViolationType::CapacityExceeded, 1, 3, "full");
        assert_eq!(v.period, Some(1));
        assert_eq!(v.student, None);
    }
}
