//! Weekly time grid and slot availability masks.
//!
//! The grid enumerates the finite universe of schedulable slots
//! (day × period). Every slot carries a dense `slot_index` in 0..N-1,
//! which is the canonical key used by availability masks, double-booking
//! checks, and preference matching. Slots are atomic, non-overlapping
//! units: two slots overlap iff they have the same index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The standard teaching week, Monday through Friday.
    pub const TEACHING_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
}

/// A single schedulable period in the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Start time as minutes since midnight.
    pub start_minute: u16,
    /// End time as minutes since midnight (exclusive).
    pub end_minute: u16,
    /// Dense position in the weekly grid (0..N-1).
    pub slot_index: usize,
}

impl TimeSlot {
    /// Creates a slot with an explicit index.
    pub fn new(
        id: impl Into<String>,
        day: Weekday,
        start_minute: u16,
        end_minute: u16,
        slot_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            day,
            start_minute,
            end_minute,
            slot_index,
        }
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end_minute - self.start_minute
    }
}

/// The canonical, ordered enumeration of all slots in one week.
///
/// Built once per academic calendar and shared read-only by every
/// generation run. Indexing is by `slot_index`; id lookups go through
/// an internal map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeGrid {
    slots: Vec<TimeSlot>,
    #[serde(skip)]
    index_by_id: HashMap<String, usize>,
}

impl TimeGrid {
    /// Builds a grid from pre-constructed slots, assigning dense indices
    /// in the order given.
    pub fn new(mut slots: Vec<TimeSlot>) -> Self {
        for (i, slot) in slots.iter_mut().enumerate() {
            slot.slot_index = i;
        }
        let index_by_id = slots
            .iter()
            .map(|s| (s.id.clone(), s.slot_index))
            .collect();
        Self { slots, index_by_id }
    }

    /// Builds a day × period grid: `periods_per_day` back-to-back slots
    /// per day starting at `first_start_minute`, each `period_minutes`
    /// long. Slot ids are `"{day:?}-{period}"`.
    pub fn weekday_grid(
        days: &[Weekday],
        periods_per_day: usize,
        first_start_minute: u16,
        period_minutes: u16,
    ) -> Self {
        let mut slots = Vec::with_capacity(days.len() * periods_per_day);
        for &day in days {
            for period in 0..periods_per_day {
                let start = first_start_minute + period as u16 * period_minutes;
                slots.push(TimeSlot::new(
                    format!("{day:?}-{period}"),
                    day,
                    start,
                    start + period_minutes,
                    0,
                ));
            }
        }
        Self::new(slots)
    }

    /// Number of slots in the grid.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in index order.
    pub fn all_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// The slot at a dense index.
    pub fn slot(&self, index: usize) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    /// Resolves a slot id to its dense index.
    pub fn slot_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Whether two slots occupy the same time. Slots are atomic units,
    /// so overlap is index equality.
    pub fn overlaps(&self, a: usize, b: usize) -> bool {
        a == b
    }

    /// Rebuilds the id lookup after deserialization.
    pub fn reindex(&mut self) {
        self.index_by_id = self
            .slots
            .iter()
            .map(|s| (s.id.clone(), s.slot_index))
            .collect();
    }
}

/// A set of slot indices, stored as a bitset.
///
/// Word `i / 64`, bit `i % 64` is set when slot `i` is in the set.
/// Used for faculty and classroom availability over the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMask {
    words: Vec<u64>,
    len: usize,
}

impl SlotMask {
    /// An all-zero mask sized to a grid of `len` slots.
    pub fn empty(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// An all-one mask sized to a grid of `len` slots.
    pub fn full(len: usize) -> Self {
        let mut mask = Self::empty(len);
        for i in 0..len {
            mask.set(i);
        }
        mask
    }

    /// Builds a mask from explicit slot indices.
    pub fn from_indices(len: usize, indices: &[usize]) -> Self {
        let mut mask = Self::empty(len);
        for &i in indices {
            mask.set(i);
        }
        mask
    }

    /// Marks a slot as present. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.words[index / 64] |= 1 << (index % 64);
        }
    }

    /// Removes a slot from the set.
    pub fn clear(&mut self, index: usize) {
        if index < self.len {
            self.words[index / 64] &= !(1 << (index % 64));
        }
    }

    /// Whether a slot is in the set.
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && (self.words[index / 64] >> (index % 64)) & 1 != 0
    }

    /// Number of slots in the set (population count).
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Capacity of the mask (grid size it was built for).
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Iterates over set indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.contains(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_grid_shape() {
        let grid = TimeGrid::weekday_grid(&Weekday::TEACHING_WEEK, 6, 8 * 60, 60);
        assert_eq!(grid.len(), 30);

        let first = grid.slot(0).unwrap();
        assert_eq!(first.day, Weekday::Monday);
        assert_eq!(first.start_minute, 480);
        assert_eq!(first.end_minute, 540);
        assert_eq!(first.duration_minutes(), 60);

        let last = grid.slot(29).unwrap();
        assert_eq!(last.day, Weekday::Friday);
        assert_eq!(last.slot_index, 29);
    }

    #[test]
    fn test_slot_index_lookup() {
        let grid = TimeGrid::weekday_grid(&[Weekday::Monday], 3, 540, 60);
        assert_eq!(grid.slot_index("Monday-0"), Some(0));
        assert_eq!(grid.slot_index("Monday-2"), Some(2));
        assert_eq!(grid.slot_index("Tuesday-0"), None);
    }

    #[test]
    fn test_overlap_is_index_equality() {
        let grid = TimeGrid::weekday_grid(&[Weekday::Monday], 4, 540, 60);
        assert!(grid.overlaps(1, 1));
        assert!(!grid.overlaps(1, 2));
    }

    #[test]
    fn test_dense_indices_assigned_in_order() {
        let slots = vec![
            TimeSlot::new("a", Weekday::Monday, 540, 600, 99),
            TimeSlot::new("b", Weekday::Monday, 600, 660, 99),
        ];
        let grid = TimeGrid::new(slots);
        assert_eq!(grid.slot(0).unwrap().id, "a");
        assert_eq!(grid.slot(0).unwrap().slot_index, 0);
        assert_eq!(grid.slot(1).unwrap().slot_index, 1);
    }

    #[test]
    fn test_mask_set_contains_count() {
        let mut mask = SlotMask::empty(100);
        assert_eq!(mask.count(), 0);

        mask.set(0);
        mask.set(63);
        mask.set(64);
        mask.set(99);
        assert!(mask.contains(0));
        assert!(mask.contains(63));
        assert!(mask.contains(64));
        assert!(mask.contains(99));
        assert!(!mask.contains(50));
        assert_eq!(mask.count(), 4);

        mask.clear(63);
        assert!(!mask.contains(63));
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_mask_out_of_range() {
        let mut mask = SlotMask::empty(10);
        mask.set(10); // Ignored
        assert!(!mask.contains(10));
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_mask_full_and_iter() {
        let mask = SlotMask::full(70);
        assert_eq!(mask.count(), 70);

        let sparse = SlotMask::from_indices(70, &[3, 65]);
        let indices: Vec<usize> = sparse.iter().collect();
        assert_eq!(indices, vec![3, 65]);
    }
}
