//! Player inventory and hotbar
//!
//! The inventory is the only weighed container. Unique items are counted
//! across the inventory and the hotbar together, so adds on either side take
//! the other as a parameter.

use crate::container::{SlotContainer, SlotStore, Stack};
use crate::item::ItemDefinition;
use crate::metadata::ItemMetadata;
use crate::outcome::{log_rejection, AddOutcome, Outcome};
use crate::registry::ItemLookup;
use crate::weight;
use satchel_core::{IdSource, InventoryError};
use serde::{Deserialize, Serialize};

/// Weighed player container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: SlotContainer,
    /// Grams
    max_weight: u64,
}

impl Inventory {
    /// Default number of slots
    pub const DEFAULT_SLOTS: usize = 40;
    /// Default capacity in grams
    pub const DEFAULT_MAX_WEIGHT: u64 = 40_000;

    /// Create an empty inventory with the default weight capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SlotContainer::new(capacity),
            max_weight: Self::DEFAULT_MAX_WEIGHT,
        }
    }

    /// Wrap existing slots
    pub fn from_container(slots: SlotContainer, max_weight: u64) -> Self {
        Self { slots, max_weight }
    }

    /// Set weight capacity
    pub fn with_max_weight(mut self, grams: u64) -> Self {
        self.max_weight = grams;
        self
    }

    /// Weight capacity in grams
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    /// Current weight in grams
    pub fn weight(&self, lookup: &dyn ItemLookup) -> u64 {
        weight::total_weight(&self.slots, lookup)
    }

    /// Grams left before the capacity
    pub fn remaining_weight(&self, lookup: &dyn ItemLookup) -> u64 {
        weight::remaining_capacity(self.weight(lookup), self.max_weight)
    }

    /// Check if a unique item is already held here or in `hotbar`
    pub fn owns_unique(&self, def: &ItemDefinition, hotbar: &Hotbar) -> bool {
        def.is_unique() && (self.has_item(&def.name) || hotbar.has_item(&def.name))
    }

    /// Place `quantity` units, honoring uniqueness across `hotbar` and the
    /// weight capacity. Units cut by weight or slot space are `unplaced`.
    pub fn add(
        &self,
        def: &ItemDefinition,
        quantity: u32,
        metadata: Option<ItemMetadata>,
        hotbar: &Hotbar,
        lookup: &dyn ItemLookup,
        ids: &dyn IdSource,
    ) -> AddOutcome<Self> {
        let reject = |err| {
            let err = log_rejection("inventory add", err, format_args!("{} x{}", def.name, quantity));
            AddOutcome::rejected(self.clone(), quantity, err)
        };

        if quantity == 0 {
            return reject(InventoryError::InvalidQuantity);
        }
        if self.owns_unique(def, hotbar) {
            return reject(InventoryError::UniqueConflict);
        }
        let admitted = match self.admit(def, quantity, lookup) {
            Ok(admitted) => admitted,
            Err(err) => return reject(err),
        };

        let out = self.slots.add(def, admitted, metadata, ids);
        if let Some(err) = out.error {
            return AddOutcome::rejected(self.clone(), quantity, err);
        }
        let placed = out.placed;
        AddOutcome::placed(self.with_slots(out.state), placed, quantity - placed)
    }

    /// Put a whole stack, id included, into the first empty slot
    pub fn insert_stack(&self, stack: Stack, hotbar: &Hotbar, lookup: &dyn ItemLookup) -> Outcome<Self> {
        let reject = |err| {
            let err = log_rejection("inventory insert", err, format_args!("{}", stack.item_name));
            Outcome::rejected(self.clone(), err)
        };

        if let Some(def) = lookup.lookup(&stack.item_name) {
            if self.owns_unique(def, hotbar) {
                return reject(InventoryError::UniqueConflict);
            }
            if !weight::can_accept(
                self.weight(lookup),
                self.max_weight,
                u64::from(def.weight) * u64::from(stack.quantity),
            ) {
                return reject(InventoryError::Overweight);
            }
        }
        match self.slots.insert_stack(stack.clone()) {
            Some((slots, _)) => Outcome::accepted(self.with_slots(slots)),
            None => reject(InventoryError::NoSpace),
        }
    }

    /// Change the weight capacity; rejected below the current weight
    pub fn set_max_weight(&self, grams: u64, lookup: &dyn ItemLookup) -> Outcome<Self> {
        let current = self.weight(lookup);
        if grams < current {
            let err = log_rejection(
                "set max weight",
                InventoryError::CapacityConflict,
                format_args!("{} below current {}", grams, current),
            );
            return Outcome::rejected(self.clone(), err);
        }
        Outcome::accepted(self.clone().with_max_weight(grams))
    }

    /// Change the number of slots; see [`SlotContainer::resize`]
    pub fn resize(&self, capacity: usize) -> Outcome<Self> {
        self.slots.resize(capacity).map(|slots| self.with_slots(slots))
    }

    /// Same shape, every slot empty
    pub fn cleared(&self) -> Self {
        self.with_slots(self.slots.cleared())
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLOTS)
    }
}

impl SlotStore for Inventory {
    fn slots(&self) -> &SlotContainer {
        &self.slots
    }

    fn with_slots(&self, slots: SlotContainer) -> Self {
        Self {
            slots,
            max_weight: self.max_weight,
        }
    }

    fn admit(&self, def: &ItemDefinition, requested: u32, lookup: &dyn ItemLookup) -> satchel_core::Result<u32> {
        let fit = weight::units_that_fit(def, self.weight(lookup), self.max_weight);
        match requested.min(fit) {
            0 => Err(InventoryError::Overweight),
            admitted => Ok(admitted),
        }
    }

    fn admit_exchange(
        &self,
        outgoing: Option<&Stack>,
        incoming: Option<&Stack>,
        lookup: &dyn ItemLookup,
    ) -> satchel_core::Result<()> {
        let leaving = outgoing.map_or(0, |stack| weight::slot_weight(stack, lookup));
        let arriving = incoming.map_or(0, |stack| weight::slot_weight(stack, lookup));
        let remaining = self.weight(lookup).saturating_sub(leaving);
        if arriving > leaving && !weight::can_accept(remaining, self.max_weight, arriving) {
            return Err(InventoryError::Overweight);
        }
        Ok(())
    }

    fn counts_unique(&self) -> bool {
        true
    }
}

/// Small fixed-size quick-access bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotbar {
    slots: SlotContainer,
}

impl Hotbar {
    /// Default number of slots
    pub const DEFAULT_SLOTS: usize = 5;

    /// Create an empty hotbar
    pub fn new(size: usize) -> Self {
        Self {
            slots: SlotContainer::new(size),
        }
    }

    /// Number of slots
    pub fn size(&self) -> usize {
        self.slots.capacity()
    }

    /// Replace the contents, truncating or padding to the hotbar size.
    /// Zero-quantity entries become empty slots.
    pub fn set_slots(&self, slots: Vec<Option<Stack>>) -> Self {
        let mut slots: Vec<Option<Stack>> = slots
            .into_iter()
            .map(|slot| slot.filter(|stack| stack.quantity > 0))
            .collect();
        if slots.len() != self.size() {
            log::debug!("Hotbar given {} slots, fitting to {}", slots.len(), self.size());
        }
        slots.resize(self.size(), None);
        let container = match SlotContainer::from_slots(slots) {
            Ok(container) => container.with_stacking(self.slots.stacking()),
            Err(_) => self.slots.cleared(),
        };
        self.with_slots(container)
    }

    /// Place `quantity` units, honoring uniqueness across `inventory`
    pub fn add(
        &self,
        def: &ItemDefinition,
        quantity: u32,
        metadata: Option<ItemMetadata>,
        inventory: &Inventory,
        ids: &dyn IdSource,
    ) -> AddOutcome<Self> {
        if inventory.owns_unique(def, self) {
            let err = log_rejection("hotbar add", InventoryError::UniqueConflict, format_args!("{}", def.name));
            return AddOutcome::rejected(self.clone(), quantity, err);
        }
        self.slots.add(def, quantity, metadata, ids).map(|slots| self.with_slots(slots))
    }

    /// Same size, every slot empty
    pub fn cleared(&self) -> Self {
        self.with_slots(self.slots.cleared())
    }
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLOTS)
    }
}

impl SlotStore for Hotbar {
    fn slots(&self) -> &SlotContainer {
        &self.slots
    }

    fn with_slots(&self, slots: SlotContainer) -> Self {
        Self { slots }
    }

    fn counts_unique(&self) -> bool {
        true
    }
}
