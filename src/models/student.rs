//! Student and raw preference record models.
//!
//! A [`StudentRecord`] is one row as it arrives from the outside world:
//! names and ranked activity names. A [`Student`] is the normalized form
//! produced by the preference index, with integer ids in place of names.

use serde::{Deserialize, Serialize};

use super::ActivityId;

/// Student identifier (0..S-1, in input order).
pub type StudentId = usize;

/// A raw ranked-choice record for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Activity names, most preferred first.
    pub choices: Vec<String>,
}

impl StudentRecord {
    /// Creates a record without choices.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            choices: Vec::new(),
        }
    }

    /// Appends the next-ranked choice.
    pub fn with_choice(mut self, activity: impl Into<String>) -> Self {
        self.choices.push(activity.into());
        self
    }

    /// Sets all choices at once, most preferred first.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Display name in `"last, first"` form.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// A student with normalized preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Index in the input order.
    pub id: StudentId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Preferred activity ids; index 0 is rank 1.
    pub choices: Vec<ActivityId>,
}

impl Student {
    /// Display name in `"last, first"` form.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Activity id at a 1-based rank.
    pub fn choice_at_rank(&self, rank: usize) -> Option<ActivityId> {
        rank.checked_sub(1).and_then(|i| self.choices.get(i).copied())
    }

    /// Whether the same activity is listed at more than one rank.
    pub fn has_duplicate_choices(&self) -> bool {
        self.choices
            .iter()
            .enumerate()
            .any(|(i, c)| self.choices[..i].contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = StudentRecord::new("Ada", "Lovelace")
            .with_choice("Salute")
            .with_choice("Measuring");

        assert_eq!(record.choices, vec!["Salute", "Measuring"]);
        assert_eq!(record.display_name(), "Lovelace, Ada");

        let record = record.with_choices(["A", "B", "C", "D"]);
        assert_eq!(record.choices.len(), 4);
    }

    #[test]
    fn test_choice_at_rank() {
        let student = Student {
            id: 0,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            choices: vec![3, 1, 4, 0],
        };

        assert_eq!(student.choice_at_rank(1), Some(3));
        assert_eq!(student.choice_at_rank(4), Some(0));
        assert_eq!(student.choice_at_rank(0), None);
        assert_eq!(student.choice_at_rank(5), None);
        assert!(!student.has_duplicate_choices());
    }

    #[test]
    fn test_duplicate_choices() {
        let student = Student {
            id: 0,
            first_name: "A".into(),
            last_name: "B".into(),
            choices: vec![0, 1, 0, 0],
        };
        assert!(student.has_duplicate_choices());
    }
}
