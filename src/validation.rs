//! Input integrity checks.
//!
//! The persistence layer is responsible for semantic validation; this
//! module only guards the structural contract the engine relies on —
//! unique ids, references that resolve, masks sized to the grid.
//! All problems are collected and reported together.

use std::collections::HashSet;

use crate::models::{Classroom, Faculty, Preference, PreferenceKind, Program, TimeGrid};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A structural problem in the input data.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of input problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same id.
    DuplicateId,
    /// A preference references an entity that doesn't exist.
    UnknownEntity,
    /// An availability mask doesn't match the grid size.
    MaskSizeMismatch,
    /// A slot index is outside the grid.
    SlotOutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural integrity of a run's inputs.
///
/// Checks:
/// 1. No duplicate program, faculty, classroom, or slot ids
/// 2. Preference entity references resolve
/// 3. Availability masks are sized to the grid
/// 4. Preferred and preference slot indices are within the grid
///
/// Returns `Ok(())` if all checks pass, `Err(errors)` with every
/// detected issue otherwise.
pub fn validate_input(
    programs: &[Program],
    faculty: &[Faculty],
    classrooms: &[Classroom],
    grid: &TimeGrid,
    preferences: &[Preference],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut program_ids = HashSet::new();
    for p in programs {
        if !program_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate program id: {}", p.id),
            ));
        }
    }

    let mut faculty_ids = HashSet::new();
    for f in faculty {
        if !faculty_ids.insert(f.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate faculty id: {}", f.id),
            ));
        }
        if f.availability.capacity() != grid.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MaskSizeMismatch,
                format!(
                    "faculty '{}' availability covers {} slots, grid has {}",
                    f.id,
                    f.availability.capacity(),
                    grid.len()
                ),
            ));
        }
        for &slot in &f.preferred_slots {
            if slot >= grid.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SlotOutOfRange,
                    format!("faculty '{}' prefers unknown slot index {slot}", f.id),
                ));
            }
        }
    }

    let mut classroom_ids = HashSet::new();
    for c in classrooms {
        if !classroom_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate classroom id: {}", c.id),
            ));
        }
        if c.availability.capacity() != grid.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MaskSizeMismatch,
                format!(
                    "classroom '{}' availability covers {} slots, grid has {}",
                    c.id,
                    c.availability.capacity(),
                    grid.len()
                ),
            ));
        }
    }

    let mut slot_ids = HashSet::new();
    for s in grid.all_slots() {
        if !slot_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate slot id: {}", s.id),
            ));
        }
    }

    for pref in preferences {
        let (known, id) = match &pref.entity {
            crate::models::EntityRef::Faculty(id) => (faculty_ids.contains(id.as_str()), id),
            crate::models::EntityRef::Classroom(id) => (classroom_ids.contains(id.as_str()), id),
            crate::models::EntityRef::Program(id) => (program_ids.contains(id.as_str()), id),
        };
        if !known {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEntity,
                format!("preference references unknown entity '{id}'"),
            ));
        }
        if let PreferenceKind::TimePreference { slots } = &pref.kind {
            for &slot in slots {
                if slot >= grid.len() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::SlotOutOfRange,
                        format!("preference for '{id}' names unknown slot index {slot}"),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
