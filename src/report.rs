//! Preference satisfaction statistics.
//!
//! Recomputes, from the extracted assignment alone, how well students'
//! ranked choices were honored. The solver's own objective value is
//! never consulted; agreement between the two is a cross-check of the
//! model, not an assumption.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Rank-k matches | Students whose k-th choice is among their activities |
//! | Required matches | Students with exactly `required_matches` ranks matched |
//! | Points | Σ over students of the weights of matched ranks |
//!
//! Matching is a membership test over the student's activities in any
//! period; the period a choice is honored in does not matter.

use std::fmt;

use serde::Serialize;

use crate::index::PreferenceIndex;
use crate::models::{Assignment, AssignmentConfig, StudentId};

/// Which ranks one student received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSatisfaction {
    /// Student.
    pub student: StudentId,
    /// `matched[k]` = whether the rank `k + 1` choice was assigned.
    pub matched: Vec<bool>,
    /// Σ weights of matched ranks.
    pub points: i64,
}

impl StudentSatisfaction {
    /// Number of matched ranks.
    pub fn match_count(&self) -> usize {
        self.matched.iter().filter(|&&m| m).count()
    }
}

/// Aggregate satisfaction statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionReport {
    /// Number of students evaluated.
    pub student_count: usize,
    /// `rank_matches[k]` = students who received their rank `k + 1` choice.
    pub rank_matches: Vec<usize>,
    /// Number of matches every student should have.
    pub required_matches: usize,
    /// Students with exactly `required_matches` ranks matched.
    pub students_with_required: usize,
    /// Σ points over all students.
    pub total_points: i64,
    /// Per-student detail, in student order.
    pub students: Vec<StudentSatisfaction>,
}

impl SatisfactionReport {
    /// Computes satisfaction from an assignment.
    ///
    /// # Arguments
    /// * `config` - Rank weights and the required match count.
    /// * `index` - Students and their ranked choices.
    /// * `assignment` - The extracted assignment.
    pub fn calculate(
        config: &AssignmentConfig,
        index: &PreferenceIndex,
        assignment: &Assignment,
    ) -> Self {
        let ranks = index.ranks();
        let mut rank_matches = vec![0usize; ranks];
        let mut students_with_required = 0;
        let mut total_points = 0;
        let mut students = Vec::with_capacity(index.len());

        for student in index.students() {
            let matched: Vec<bool> = student
                .choices
                .iter()
                .map(|&choice| assignment.attends(student.id, choice))
                .collect();

            let mut points = 0;
            for (k, &hit) in matched.iter().enumerate() {
                if hit {
                    rank_matches[k] += 1;
                    points += config.weight_of_rank(k + 1);
                }
            }

            let detail = StudentSatisfaction {
                student: student.id,
                matched,
                points,
            };
            if detail.match_count() == config.required_matches {
                students_with_required += 1;
            }
            total_points += points;
            students.push(detail);
        }

        Self {
            student_count: index.len(),
            rank_matches,
            required_matches: config.required_matches,
            students_with_required,
            total_points,
            students,
        }
    }

    /// Students who received their choice at a 1-based rank.
    pub fn matches_at_rank(&self, rank: usize) -> usize {
        rank.checked_sub(1)
            .and_then(|i| self.rank_matches.get(i).copied())
            .unwrap_or(0)
    }

    /// Percentage (0..100) of students who received their choice at a rank.
    pub fn rank_percentage(&self, rank: usize) -> f64 {
        self.percentage(self.matches_at_rank(rank))
    }

    /// Percentage (0..100) of students with exactly the required matches.
    pub fn required_percentage(&self) -> f64 {
        self.percentage(self.students_with_required)
    }

    /// Whether every student received exactly the required matches.
    pub fn all_satisfied(&self) -> bool {
        self.students_with_required == self.student_count
    }

    fn percentage(&self, count: usize) -> f64 {
        if self.student_count == 0 {
            0.0
        } else {
            count as f64 / self.student_count as f64 * 100.0
        }
    }
}

impl fmt::Display for SatisfactionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 1..=self.rank_matches.len() {
            writeln!(
                f,
                "percent who got choice {rank}: {:.1} ({} of {})",
                self.rank_percentage(rank),
                self.matches_at_rank(rank),
                self.student_count
            )?;
        }
        write!(
            f,
            "percent who got {} of {} choices: {:.1} ({} of {})",
            self.required_matches,
            self.rank_matches.len(),
            self.required_percentage(),
            self.students_with_required,
            self.student_count
        )
    }
}
