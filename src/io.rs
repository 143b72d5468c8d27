//! Tabular input and output.
//!
//! # Input layout
//!
//! ```text
//! first_name,last_name,choice1,choice2,choice3,choice4
//! Ada,Lovelace,Salute,Measuring,BubbleMania,Closeto20
//! ```
//!
//! The first row is a header and is skipped. Rows may have any length on
//! the wire; a row with the wrong number of fields is reported as
//! [`AssignError::MalformedInput`] with its 1-based record number.
//!
//! # Output layout
//!
//! `name, choice1..choiceR, assignment1..assignmentP`, with `name` in
//! `"last, first"` form and every field quoted.

use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, info};
use serde::Serialize;

use crate::error::{AssignError, MalformedReason};
use crate::index::PreferenceIndex;
use crate::models::{ActivityCatalog, Assignment, Student, StudentRecord};

/// Reads ranked-choice records with `ranks` choices each.
///
/// # Errors
/// [`AssignError::MalformedInput`] for a row whose field count is not
/// `ranks + 2`; [`AssignError::Csv`] if the stream is not valid CSV.
pub fn read_student_records<R: Read>(
    reader: R,
    ranks: usize,
) -> Result<Vec<StudentRecord>, AssignError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        records.push(parse_row(&row, ranks).map_err(|reason| AssignError::MalformedInput {
            record: i + 1,
            reason,
        })?);
    }

    debug!("read {} student records", records.len());
    Ok(records)
}

/// Reads ranked-choice records from a file.
pub fn read_student_records_from_path(
    path: impl AsRef<Path>,
    ranks: usize,
) -> Result<Vec<StudentRecord>, AssignError> {
    let path = path.as_ref();
    info!("reading student choices from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_student_records(file, ranks)
}

fn parse_row(row: &StringRecord, ranks: usize) -> Result<StudentRecord, MalformedReason> {
    let expected = ranks + 2;
    if row.len() != expected {
        return Err(MalformedReason::FieldCount {
            expected,
            found: row.len(),
        });
    }

    let mut fields = row.iter();
    let first = fields.next().unwrap_or_default();
    let last = fields.next().unwrap_or_default();
    Ok(StudentRecord::new(first, last).with_choices(fields))
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    /// `"last, first"`.
    pub name: String,
    /// Ranked choices, echoed by name.
    pub choices: Vec<String>,
    /// Assigned activity names in period order.
    pub assignments: Vec<String>,
}

impl OutputRecord {
    /// Builds the output row for one student.
    pub fn from_student(student: &Student, catalog: &ActivityCatalog, assignment: &Assignment) -> Self {
        Self {
            name: student.display_name(),
            choices: student
                .choices
                .iter()
                .map(|&a| catalog.name_of(a).to_string())
                .collect(),
            assignments: assignment
                .activities_of(student.id)
                .iter()
                .map(|&a| catalog.name_of(a).to_string())
                .collect(),
        }
    }

    /// Fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.choices.iter().map(String::as_str))
            .chain(self.assignments.iter().map(String::as_str))
    }
}

/// Header row for `ranks` choices and `periods` assignments.
pub fn output_header(ranks: usize, periods: usize) -> Vec<String> {
    std::iter::once("name".to_string())
        .chain((1..=ranks).map(|k| format!("choice{k}")))
        .chain((1..=periods).map(|p| format!("assignment{p}")))
        .collect()
}

/// Writes one quoted row per student, preceded by the header.
pub fn write_assignment_records<W: Write>(
    writer: W,
    index: &PreferenceIndex,
    catalog: &ActivityCatalog,
    assignment: &Assignment,
) -> Result<(), AssignError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wtr.write_record(output_header(index.ranks(), assignment.periods()))?;
    for student in index.students() {
        let row = OutputRecord::from_student(student, catalog, assignment);
        wtr.write_record(row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the assignment to a file.
pub fn write_assignment_records_to_path(
    path: impl AsRef<Path>,
    index: &PreferenceIndex,
    catalog: &ActivityCatalog,
    assignment: &Assignment,
) -> Result<(), AssignError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_assignment_records(file, index, catalog, assignment)?;
    info!("wrote {} assignments to {}", index.len(), path.display());
    Ok(())
}

/// Writes raw records (header included), e.g. generated demo input.
pub fn write_student_records<W: Write>(
    writer: W,
    records: &[StudentRecord],
    ranks: usize,
) -> Result<(), AssignError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let header: Vec<String> = ["first_name".to_string(), "last_name".to_string()]
        .into_iter()
        .chain((1..=ranks).map(|k| format!("choice{k}")))
        .collect();
    wtr.write_record(&header)?;
    for record in records {
        let row = [record.first_name.as_str(), record.last_name.as_str()]
            .into_iter()
            .chain(record.choices.iter().map(String::as_str));
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
