//! Classroom model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::SlotMask;

/// A room that program sessions can be placed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Building the room is in.
    pub building: String,
    /// Seat capacity.
    pub capacity: u32,
    /// Whether the room is equipped as a lab.
    pub is_lab: bool,
    /// Lab specialization (e.g. "chemistry", "computing").
    pub lab_type: Option<String>,
    /// Installed equipment tags.
    pub equipment: BTreeSet<String>,
    /// Slots the room can be booked in (1 = available).
    pub availability: SlotMask,
}

impl Classroom {
    /// Creates a non-lab classroom available in every slot of a grid of
    /// `grid_len` slots.
    pub fn new(id: impl Into<String>, capacity: u32, grid_len: usize) -> Self {
        Self {
            id: id.into(),
            building: String::new(),
            capacity,
            is_lab: false,
            lab_type: None,
            equipment: BTreeSet::new(),
            availability: SlotMask::full(grid_len),
        }
    }

    /// Sets the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Marks the room as a lab of the given type.
    pub fn as_lab(mut self, lab_type: impl Into<String>) -> Self {
        self.is_lab = true;
        self.lab_type = Some(lab_type.into());
        self
    }

    /// Adds an equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.insert(tag.into());
        self
    }

    /// Replaces the availability mask.
    pub fn with_availability(mut self, availability: SlotMask) -> Self {
        self.availability = availability;
        self
    }

    /// Whether the room can be booked in the given slot.
    #[inline]
    pub fn is_available(&self, slot_index: usize) -> bool {
        self.availability.contains(slot_index)
    }

    /// Whether the room has a given equipment tag.
    pub fn has_equipment(&self, tag: &str) -> bool {
        self.equipment.contains(tag)
    }
}
