//! Staff preferences and availability as seen by coverage analysis.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::schedule::{BlockId, ShiftLengths};

/// How an availability entry addresses a slot.
///
/// `Index` is the slot's position in the day template. It goes stale when
/// blocks are inserted, removed or reordered. `Block` keys on the block's
/// stable id and wins over a positional entry for the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotRef {
    Index(usize),
    Block(BlockId),
}

/// One explicit availability entry, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub weekday: Weekday,
    pub slot: SlotRef,
    pub available: bool,
}

/// Sparse availability map. Slots without an entry count as available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AvailabilityEntry>", into = "Vec<AvailabilityEntry>")]
pub struct AvailabilityGrid {
    entries: HashMap<(Weekday, SlotRef), bool>,
}

impl AvailabilityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, day: Weekday, slot: SlotRef, available: bool) {
        self.entries.insert((day, slot), available);
    }

    /// Set availability by positional slot index.
    pub fn set_slot(&mut self, day: Weekday, slot_index: usize, available: bool) {
        self.set(day, SlotRef::Index(slot_index), available);
    }

    /// Set availability by stable block id.
    pub fn set_block(&mut self, day: Weekday, block: BlockId, available: bool) {
        self.set(day, SlotRef::Block(block), available);
    }

    /// Drop an explicit entry, returning the slot to the default.
    pub fn clear(&mut self, day: Weekday, slot: &SlotRef) -> Option<bool> {
        self.entries.remove(&(day, slot.clone()))
    }

    /// The explicitly stored value, distinguishing "never set" from "set".
    pub fn explicit(&self, day: Weekday, slot: &SlotRef) -> Option<bool> {
        self.entries.get(&(day, slot.clone())).copied()
    }

    /// Availability for a slot: block-id entry, then positional entry,
    /// then available.
    pub fn is_available(&self, day: Weekday, slot_index: usize, block: &BlockId) -> bool {
        self.explicit(day, &SlotRef::Block(block.clone()))
            .or_else(|| self.explicit(day, &SlotRef::Index(slot_index)))
            .unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<AvailabilityEntry>> for AvailabilityGrid {
    fn from(value: Vec<AvailabilityEntry>) -> Self {
        Self {
            entries: value
                .into_iter()
                .map(|e| ((e.weekday, e.slot), e.available))
                .collect(),
        }
    }
}

impl From<AvailabilityGrid> for Vec<AvailabilityEntry> {
    fn from(value: AvailabilityGrid) -> Self {
        let mut entries: Vec<AvailabilityEntry> = value
            .entries
            .into_iter()
            .map(|((weekday, slot), available)| AvailabilityEntry {
                weekday,
                slot,
                available,
            })
            .collect();
        entries.sort_by(|a, b| {
            a.weekday
                .num_days_from_monday()
                .cmp(&b.weekday.num_days_from_monday())
                .then_with(|| a.slot.cmp(&b.slot))
        });
        entries
    }
}

/// A staff record from the staff directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    /// Shift lengths this person will work; empty means any configured length
    #[serde(default)]
    pub preferred_lengths: Vec<f64>,
    #[serde(default)]
    pub availability: AvailabilityGrid,
    #[serde(default)]
    pub keyholder: bool,
    #[serde(default)]
    pub contracted_hours: f64,
    /// Zero means "not set"
    #[serde(default)]
    pub max_hours: f64,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            preferred_lengths: Vec::new(),
            availability: AvailabilityGrid::default(),
            keyholder: false,
            contracted_hours: 0.0,
            max_hours: 0.0,
        }
    }

    pub fn with_preferred_lengths(mut self, lengths: impl IntoIterator<Item = f64>) -> Self {
        self.preferred_lengths = lengths.into_iter().collect();
        self
    }

    pub fn with_keyholder(mut self, keyholder: bool) -> Self {
        self.keyholder = keyholder;
        self
    }

    pub fn with_hours(mut self, contracted: f64, max: f64) -> Self {
        self.contracted_hours = contracted;
        self.max_hours = max;
        self
    }

    /// Preferred lengths, falling back to every configured length.
    pub fn preferred_lengths_or(&self, all: &ShiftLengths) -> Vec<f64> {
        if self.preferred_lengths.is_empty() {
            all.as_slice().to_vec()
        } else {
            self.preferred_lengths.clone()
        }
    }

    /// Whether a slot of `length` hours suits this person.
    ///
    /// The slot length is rounded to the nearest whole hour and must lie
    /// within half an hour (inclusive) of a preferred length.
    pub fn prefers_length(&self, length: f64, all: &ShiftLengths) -> bool {
        let rounded = length.round();
        let matches = |p: &f64| (rounded - p).abs() <= 0.5 + f64::EPSILON;
        if self.preferred_lengths.is_empty() {
            all.as_slice().iter().any(matches)
        } else {
            self.preferred_lengths.iter().any(matches)
        }
    }

    /// Whether this person can cover the slot at `slot_index` on `day`.
    pub fn can_cover(
        &self,
        day: Weekday,
        slot_index: usize,
        block: &BlockId,
        length: f64,
        all: &ShiftLengths,
    ) -> bool {
        self.prefers_length(length, all) && self.availability.is_available(day, slot_index, block)
    }

    /// Check hour fields.
    ///
    /// # Errors
    ///
    /// Fails on negative or non-finite hours, or a set maximum below the
    /// contracted hours.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |h: f64| h.is_finite() && h >= 0.0;
        if !valid(self.contracted_hours) || !valid(self.max_hours) {
            return Err(ConfigError::InvalidValue {
                key: format!("staff.{}.hours", self.id),
                message: "hours must be finite and non-negative".into(),
            });
        }
        if self.max_hours > 0.0 && self.max_hours < self.contracted_hours {
            return Err(ConfigError::InvalidValue {
                key: format!("staff.{}.max_hours", self.id),
                message: format!(
                    "max hours ({}) below contracted hours ({})",
                    self.max_hours, self.contracted_hours
                ),
            });
        }
        Ok(())
    }
}
