//! Timetabling domain models.
//!
//! Core data types for representing timetable generation problems and
//! solutions: the weekly time grid, the three input entity kinds
//! (programs, faculty, classrooms), classified preferences, and the
//! assignment/conflict output types.
//!
//! All input models are immutable for the duration of a generation run
//! and constructed via builders.

mod classroom;
mod faculty;
mod preference;
mod program;
mod slot;
mod timetable;

pub use classroom::Classroom;
pub use faculty::Faculty;
pub use preference::{EntityRef, Preference, PreferenceKind};
pub use program::Program;
pub use slot::{SlotMask, TimeGrid, TimeSlot, Weekday};
pub use timetable::{Assignment, Conflict, ConflictReason, Timetable};
