//! Assignment domain models.
//!
//! Provides the data types for describing a period-assignment problem
//! and its solution: an activity catalog, students with ranked choices,
//! the run configuration, and the resulting per-period assignment.
//!
//! # Domain Mappings
//!
//! | u-assign | Science fair | Summer camp | Conference |
//! |----------|--------------|-------------|------------|
//! | Activity | Game station | Workshop | Breakout room |
//! | Student | Pupil | Camper | Attendee |
//! | Period | Rotation | Session block | Time slot |
//! | Assignment | Station roster | Camp timetable | Personal agenda |

mod activity;
mod assignment;
mod config;
mod student;

pub use activity::{Activity, ActivityCatalog, ActivityId, CapacityBounds};
pub use assignment::{Assignment, Violation, ViolationType};
pub use config::{
    AssignmentConfig, DEFAULT_PERIODS, DEFAULT_RANK_WEIGHTS, DEFAULT_REQUIRED_MATCHES,
    SCIENCE_FAIR_ACTIVITIES,
};
pub use student::{Student, StudentId, StudentRecord};
