//! Faculty model.
//!
//! A faculty member carries expertise tags, a weekly workload cap, an
//! availability mask over the time grid, and an ordered list of
//! preferred slots (soft — earlier entries weigh more).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::SlotMask;

/// A faculty member who can be assigned to program sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Home department.
    pub department: String,
    /// Expertise tags used for program matching.
    pub expertise: BTreeSet<String>,
    /// Hard cap on assigned teaching hours per week.
    pub max_hours_per_week: u32,
    /// Slots this person can teach in (1 = available).
    pub availability: SlotMask,
    /// Preferred slot indices, best first. Soft.
    pub preferred_slots: Vec<usize>,
}

impl Faculty {
    /// Creates a faculty member available in every slot of a grid of
    /// `grid_len` slots, with a 40-hour weekly cap.
    pub fn new(id: impl Into<String>, grid_len: usize) -> Self {
        Self {
            id: id.into(),
            department: String::new(),
            expertise: BTreeSet::new(),
            max_hours_per_week: 40,
            availability: SlotMask::full(grid_len),
            preferred_slots: Vec::new(),
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds an expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.expertise.insert(tag.into());
        self
    }

    /// Sets the weekly hour cap.
    pub fn with_max_hours(mut self, hours: u32) -> Self {
        self.max_hours_per_week = hours;
        self
    }

    /// Replaces the availability mask.
    pub fn with_availability(mut self, availability: SlotMask) -> Self {
        self.availability = availability;
        self
    }

    /// Appends a preferred slot (order matters, best first).
    pub fn with_preferred_slot(mut self, slot_index: usize) -> Self {
        self.preferred_slots.push(slot_index);
        self
    }

    /// Whether this person can teach in the given slot.
    #[inline]
    pub fn is_available(&self, slot_index: usize) -> bool {
        self.availability.contains(slot_index)
    }

    /// Whether this person carries a given expertise tag.
    pub fn has_expertise(&self, tag: &str) -> bool {
        self.expertise.contains(tag)
    }

    /// Number of tags shared with a required set.
    pub fn expertise_overlap(&self, required: &BTreeSet<String>) -> usize {
        required.iter().filter(|t| self.expertise.contains(*t)).count()
    }

    /// Whether this person qualifies for a requirement set: any overlap,
    /// or trivially qualified when nothing is required.
    pub fn qualifies_for(&self, required: &BTreeSet<String>) -> bool {
        required.is_empty() || self.expertise_overlap(required) > 0
    }

    /// Weekly cap expressed in minutes.
    #[inline]
    pub fn max_minutes_per_week(&self) -> u32 {
        self.max_hours_per_week * 60
    }
}
