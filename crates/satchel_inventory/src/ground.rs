//! Ground container
//!
//! Items dropped into the world near the player. Not weighed, not part of the
//! uniqueness scope, and cleared wholesale when the player walks away.

use crate::container::{SlotContainer, SlotStore};
use crate::item::ItemDefinition;
use crate::metadata::ItemMetadata;
use crate::outcome::AddOutcome;
use satchel_core::IdSource;
use serde::{Deserialize, Serialize};

/// Ephemeral, capacity-bounded world container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    slots: SlotContainer,
}

impl Ground {
    /// Default number of slots
    pub const DEFAULT_SLOTS: usize = 30;

    /// Create an empty ground container
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SlotContainer::new(capacity),
        }
    }

    /// Place `quantity` units
    pub fn add(
        &self,
        def: &ItemDefinition,
        quantity: u32,
        metadata: Option<ItemMetadata>,
        ids: &dyn IdSource,
    ) -> AddOutcome<Self> {
        self.slots.add(def, quantity, metadata, ids).map(|slots| self.with_slots(slots))
    }

    /// Check if nothing lies on the ground
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Same capacity, every slot empty
    pub fn cleared(&self) -> Self {
        if !self.is_empty() {
            log::debug!("Clearing {} ground slots", self.slots.used_slots());
        }
        self.with_slots(self.slots.cleared())
    }
}

impl Default for Ground {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLOTS)
    }
}

impl SlotStore for Ground {
    fn slots(&self) -> &SlotContainer {
        &self.slots
    }

    fn with_slots(&self, slots: SlotContainer) -> Self {
        Self { slots }
    }
}
