//! Fixed-size slot availability board
//!
//! The storefront sells a fixed number of commission slots. Availability
//! is a vector of booleans (`true` = free) persisted as a single blob;
//! all mutations go through conditional writes keyed on the blob's
//! revision (see the booking crate's slot registry).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bookable slots. Fixed by the storefront.
pub const SLOT_COUNT: usize = 4;

/// Index of a single slot, guaranteed in `0..SLOT_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Create a SlotIndex, returning None when out of range
    pub fn new(index: i64) -> Option<Self> {
        if (0..SLOT_COUNT as i64).contains(&index) {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SlotIndex::new(value as i64)
            .ok_or_else(|| format!("slot index out of range: {value} (max {})", SLOT_COUNT - 1))
    }
}

impl From<SlotIndex> for u8 {
    fn from(index: SlotIndex) -> Self {
        index.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Availability board for all slots (`true` = free)
///
/// Serializes as `{"slots": [bool; 4]}`, the shape used both in the
/// persisted blob and on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBoard {
    slots: [bool; SLOT_COUNT],
}

impl SlotBoard {
    /// Board with every slot free (initial state at first use)
    pub fn all_free() -> Self {
        Self {
            slots: [true; SLOT_COUNT],
        }
    }

    pub fn is_free(&self, index: SlotIndex) -> bool {
        self.slots[index.as_usize()]
    }

    /// Set one slot's availability (`true` = free)
    pub fn set(&mut self, index: SlotIndex, available: bool) {
        self.slots[index.as_usize()] = available;
    }

    pub fn slots(&self) -> &[bool; SLOT_COUNT] {
        &self.slots
    }
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::all_free()
    }
}
