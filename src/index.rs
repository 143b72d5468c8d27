//! Preference index.
//!
//! Normalizes raw ranked-choice records into students with integer
//! activity ids. This is the only place activity names are resolved;
//! everything downstream works on ids.
//!
//! Loading is all-or-nothing: the first malformed record aborts the run
//! with its 1-based record number, before any model is built.

use log::{debug, warn};
use serde::Serialize;

use crate::error::{AssignError, MalformedReason};
use crate::models::{ActivityCatalog, Student, StudentId, StudentRecord};

/// Students with preferences resolved to activity ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceIndex {
    students: Vec<Student>,
    ranks: usize,
}

impl PreferenceIndex {
    /// Resolves records against a catalog.
    ///
    /// Every record must carry exactly `ranks` choices, non-empty names,
    /// and only catalog activity names. Repeated choices are accepted
    /// (and logged); the model does not exclude them.
    pub fn build(
        records: &[StudentRecord],
        catalog: &ActivityCatalog,
        ranks: usize,
    ) -> Result<Self, AssignError> {
        let mut students = Vec::with_capacity(records.len());

        for (id, record) in records.iter().enumerate() {
            let student = Self::resolve(id, record, catalog, ranks).map_err(|reason| {
                AssignError::MalformedInput {
                    record: id + 1,
                    reason,
                }
            })?;

            if student.has_duplicate_choices() {
                warn!(
                    "student '{}' lists the same activity at more than one rank",
                    student.display_name()
                );
            }
            students.push(student);
        }

        debug!(
            "indexed {} students with {} ranked choices each",
            students.len(),
            ranks
        );
        Ok(Self { students, ranks })
    }

    fn resolve(
        id: StudentId,
        record: &StudentRecord,
        catalog: &ActivityCatalog,
        ranks: usize,
    ) -> Result<Student, MalformedReason> {
        if record.choices.len() != ranks {
            return Err(MalformedReason::FieldCount {
                expected: ranks + 2,
                found: record.choices.len() + 2,
            });
        }
        if record.first_name.trim().is_empty() {
            return Err(MalformedReason::EmptyField {
                field: "first_name",
            });
        }
        if record.last_name.trim().is_empty() {
            return Err(MalformedReason::EmptyField { field: "last_name" });
        }

        let choices = record
            .choices
            .iter()
            .enumerate()
            .map(|(i, name)| {
                catalog
                    .id_of(name.trim())
                    .ok_or_else(|| MalformedReason::UnknownActivity {
                        rank: i + 1,
                        name: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Student {
            id,
            first_name: record.first_name.trim().to_string(),
            last_name: record.last_name.trim().to_string(),
            choices,
        })
    }

    /// All students in id order.
    #[inline]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Looks up a student.
    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    /// Number of students (S).
    #[inline]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether no students were loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Ranked choices per student (R).
    #[inline]
    pub fn ranks(&self) -> usize {
        self.ranks
    }
}
