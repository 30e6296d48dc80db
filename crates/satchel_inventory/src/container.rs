//! Slot containers
//!
//! A [`SlotContainer`] is a fixed-length sequence of optional [`Stack`]s.
//! Every primitive takes `&self` and returns a replacement container; when a
//! request is rejected the returned container equals the input.
//!
//! Ties are always broken by ascending slot index.

use crate::item::{ItemDefinition, StackLimit};
use crate::metadata::ItemMetadata;
use crate::outcome::{log_rejection, AddOutcome, Outcome};
use crate::registry::ItemLookup;
use satchel_core::{IdSource, InventoryError, StackId};
use serde::{Deserialize, Serialize};

/// A quantity of one item occupying one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    /// Fresh on every creation event
    pub id: StackId,
    /// Item definition key
    #[serde(rename = "name")]
    pub item_name: String,
    /// Always at least 1
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ItemMetadata>,
}

impl Stack {
    /// Create a new stack
    pub fn new(id: StackId, item_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            item_name: item_name.into(),
            quantity,
            metadata: None,
        }
    }

    /// Set metadata
    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Same entry with a different quantity
    fn resized(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Player-chosen display name, if any
    pub fn custom_label(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(ItemMetadata::custom_label)
    }
}

/// Whether metadata must be equal for two entries to share a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataStacking {
    /// Entries stack by item name alone
    #[default]
    Ignore,
    /// Entries stack only when their metadata is equal
    MustMatch,
}

impl MetadataStacking {
    fn accepts(&self, existing: Option<&ItemMetadata>, incoming: Option<&ItemMetadata>) -> bool {
        match self {
            Self::Ignore => true,
            Self::MustMatch => existing == incoming,
        }
    }
}

/// Fixed-capacity ordered sequence of optional stacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotContainer {
    slots: Vec<Option<Stack>>,
    #[serde(default)]
    stacking: MetadataStacking,
}

impl SlotContainer {
    /// Create an empty container
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            stacking: MetadataStacking::default(),
        }
    }

    /// Build from existing slots; zero-quantity entries are not representable
    pub fn from_slots(slots: Vec<Option<Stack>>) -> satchel_core::Result<Self> {
        if slots.iter().flatten().any(|stack| stack.quantity == 0) {
            return Err(InventoryError::InvalidQuantity);
        }
        Ok(Self {
            slots,
            stacking: MetadataStacking::default(),
        })
    }

    /// Set the metadata stacking policy
    pub fn with_stacking(mut self, stacking: MetadataStacking) -> Self {
        self.stacking = stacking;
        self
    }

    /// Metadata stacking policy
    pub fn stacking(&self) -> MetadataStacking {
        self.stacking
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Raw slot view
    pub fn slots(&self) -> &[Option<Stack>] {
        &self.slots
    }

    /// Get slot contents
    pub fn get(&self, index: usize) -> Option<&Stack> {
        self.slots.get(index)?.as_ref()
    }

    /// Number of occupied slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of empty slots
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.used_slots()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.used_slots() == 0
    }

    /// Occupied slots with their indices
    pub fn items(&self) -> impl Iterator<Item = (usize, &Stack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|stack| (i, stack)))
    }

    /// Lowest-index empty slot
    pub fn find_first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    /// First slot holding `name`
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|stack| stack.item_name == name))
    }

    /// Check if any slot holds `name`
    pub fn has_item(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Sum of quantities of every entry named `name`
    pub fn total_quantity(&self, name: &str) -> u64 {
        self.items()
            .filter(|(_, stack)| stack.item_name == name)
            .map(|(_, stack)| u64::from(stack.quantity))
            .sum()
    }

    /// Place `quantity` units of `def`.
    ///
    /// Tops up matching entries first, then fills empty slots. Whatever does
    /// not fit is reported as `unplaced`; an error is set only when nothing
    /// was placed.
    pub fn add(
        &self,
        def: &ItemDefinition,
        quantity: u32,
        metadata: Option<ItemMetadata>,
        ids: &dyn IdSource,
    ) -> AddOutcome<Self> {
        if quantity == 0 {
            let err = log_rejection("add", InventoryError::InvalidQuantity, format_args!("{} x0", def.name));
            return AddOutcome::rejected(self.clone(), quantity, err);
        }

        if def.is_unique() {
            if self.has_item(&def.name) {
                let err = log_rejection("add", InventoryError::UniqueConflict, format_args!("{} already held", def.name));
                return AddOutcome::rejected(self.clone(), quantity, err);
            }
            let Some(index) = self.find_first_empty() else {
                let err = log_rejection("add", InventoryError::NoSpace, format_args!("{}", def.name));
                return AddOutcome::rejected(self.clone(), quantity, err);
            };
            let mut next = self.clone();
            let mut stack = Stack::new(ids.next_stack_id(), def.name.clone(), 1);
            stack.metadata = metadata;
            next.slots[index] = Some(stack);
            return AddOutcome::placed(next, 1, quantity - 1);
        }

        let (next, placed) = self.deposit(def, quantity, metadata.as_ref(), ids);
        if placed == 0 {
            let err = log_rejection("add", InventoryError::NoSpace, format_args!("{} x{}", def.name, quantity));
            return AddOutcome::rejected(self.clone(), quantity, err);
        }
        AddOutcome::placed(next, placed, quantity - placed)
    }

    /// Two-pass placement shared by `add` and the transfer coordinator.
    /// Returns the new container and the amount placed.
    pub(crate) fn deposit(
        &self,
        def: &ItemDefinition,
        quantity: u32,
        metadata: Option<&ItemMetadata>,
        ids: &dyn IdSource,
    ) -> (Self, u32) {
        let limit = def.stack_limit();
        let mut next = self.clone();
        let mut remaining = quantity;

        if def.can_stack() {
            for slot in next.slots.iter_mut() {
                if remaining == 0 {
                    break;
                }
                let Some(stack) = slot else { continue };
                if stack.item_name != def.name
                    || !self.stacking.accepts(stack.metadata.as_ref(), metadata)
                {
                    continue;
                }
                let add = remaining.min(slot_room(limit, stack.quantity));
                if add > 0 {
                    stack.quantity += add;
                    remaining -= add;
                }
            }
        }

        while remaining > 0 {
            let Some(index) = next.find_first_empty() else { break };
            let add = limit.clamp(remaining);
            let mut stack = Stack::new(ids.next_stack_id(), def.name.clone(), add);
            stack.metadata = metadata.cloned();
            next.slots[index] = Some(stack);
            remaining -= add;
        }

        (next, quantity - remaining)
    }

    /// Put a whole stack, id included, into the first empty slot
    pub(crate) fn insert_stack(&self, stack: Stack) -> Option<(Self, usize)> {
        let index = self.find_first_empty()?;
        let mut next = self.clone();
        next.slots[index] = Some(stack);
        Some((next, index))
    }

    /// Decrement a slot; removing at least its quantity empties it
    pub fn remove(&self, index: usize, quantity: u32) -> Outcome<Self> {
        match self.take(index, quantity) {
            Ok((next, _)) => Outcome::accepted(next),
            Err(err) => Outcome::rejected(
                self.clone(),
                log_rejection("remove", err, format_args!("slot {} x{}", index, quantity)),
            ),
        }
    }

    /// Remove up to `quantity` units, returning how many were taken
    pub(crate) fn take(&self, index: usize, quantity: u32) -> satchel_core::Result<(Self, u32)> {
        if index >= self.capacity() {
            return Err(InventoryError::OutOfRange);
        }
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        let stack = self.get(index).ok_or(InventoryError::EmptySlot)?;
        let taken = quantity.min(stack.quantity);
        let mut next = self.clone();
        next.slots[index] = if taken == stack.quantity {
            None
        } else {
            Some(stack.resized(stack.quantity - taken))
        };
        Ok((next, taken))
    }

    /// Exchange two slots wholesale; the same index twice is a no-op
    pub fn swap(&self, a: usize, b: usize) -> Outcome<Self> {
        if a >= self.capacity() || b >= self.capacity() {
            let err = log_rejection("swap", InventoryError::OutOfRange, format_args!("slots {} and {}", a, b));
            return Outcome::rejected(self.clone(), err);
        }
        let mut next = self.clone();
        next.slots.swap(a, b);
        Outcome::accepted(next)
    }

    /// Move `quantity` units of a slot into a new entry in the lowest empty slot
    pub fn split(&self, index: usize, quantity: u32, ids: &dyn IdSource) -> Outcome<Self> {
        let reject = |err| {
            Outcome::rejected(
                self.clone(),
                log_rejection("split", err, format_args!("slot {} x{}", index, quantity)),
            )
        };

        if index >= self.capacity() {
            return reject(InventoryError::OutOfRange);
        }
        let Some(stack) = self.get(index) else {
            return reject(InventoryError::EmptySlot);
        };
        if quantity == 0 || quantity >= stack.quantity {
            return reject(InventoryError::InvalidQuantity);
        }
        let Some(empty) = self.find_first_empty() else {
            return reject(InventoryError::NoSpace);
        };

        let mut next = self.clone();
        next.slots[index] = Some(stack.resized(stack.quantity - quantity));
        next.slots[empty] = Some(Stack {
            id: ids.next_stack_id(),
            ..stack.resized(quantity)
        });
        Outcome::accepted(next)
    }

    /// Move units from one entry onto another of the same item.
    ///
    /// With a limited destination, only what fits moves; the rest stays in
    /// the source.
    pub fn merge(&self, from: usize, to: usize, def: &ItemDefinition) -> Outcome<Self> {
        let reject = |err| {
            Outcome::rejected(
                self.clone(),
                log_rejection("merge", err, format_args!("slot {} into {}", from, to)),
            )
        };

        if from >= self.capacity() || to >= self.capacity() {
            return reject(InventoryError::OutOfRange);
        }
        if from == to {
            return reject(InventoryError::SameSlot);
        }
        let (Some(source), Some(dest)) = (self.get(from), self.get(to)) else {
            return reject(InventoryError::EmptySlot);
        };
        if source.item_name != dest.item_name
            || source.item_name != def.name
            || !self.stacking.accepts(dest.metadata.as_ref(), source.metadata.as_ref())
        {
            return reject(InventoryError::ItemMismatch);
        }
        if !def.can_stack() {
            return reject(InventoryError::NotStackable);
        }

        let moved = source.quantity.min(slot_room(def.stack_limit(), dest.quantity));
        if moved == 0 {
            return reject(InventoryError::NoSpace);
        }

        let mut next = self.clone();
        next.slots[to] = Some(dest.resized(dest.quantity + moved));
        next.slots[from] = if moved == source.quantity {
            None
        } else {
            Some(source.resized(source.quantity - moved))
        };
        Outcome::accepted(next)
    }

    /// Change the number of slots. Shrinking is rejected when a dropped slot
    /// is occupied.
    pub fn resize(&self, capacity: usize) -> Outcome<Self> {
        if self.slots.iter().skip(capacity).any(Option::is_some) {
            let err = log_rejection(
                "resize",
                InventoryError::CapacityConflict,
                format_args!("{} -> {}", self.capacity(), capacity),
            );
            return Outcome::rejected(self.clone(), err);
        }
        let mut next = self.clone();
        next.slots.resize(capacity, None);
        Outcome::accepted(next)
    }

    /// Same capacity, every slot empty
    pub fn cleared(&self) -> Self {
        Self::new(self.capacity()).with_stacking(self.stacking)
    }

    /// Rename the entry in a slot
    pub fn set_custom_label(&self, index: usize, label: impl Into<String>) -> Outcome<Self> {
        if index >= self.capacity() {
            let err = log_rejection("rename", InventoryError::OutOfRange, format_args!("slot {}", index));
            return Outcome::rejected(self.clone(), err);
        }
        let Some(stack) = self.get(index) else {
            let err = log_rejection("rename", InventoryError::EmptySlot, format_args!("slot {}", index));
            return Outcome::rejected(self.clone(), err);
        };

        let label = label.into();
        let metadata = match &stack.metadata {
            Some(meta) => meta.with_custom_label(label),
            None => ItemMetadata::Opaque(Default::default()).with_custom_label(label),
        };
        let mut next = self.clone();
        next.slots[index] = Some(Stack {
            metadata: Some(metadata),
            ..stack.clone()
        });
        Outcome::accepted(next)
    }

    /// Replace one slot without validation; used by the transfer coordinator
    /// after it has checked the request
    pub(crate) fn with_slot(&self, index: usize, stack: Option<Stack>) -> Self {
        let mut next = self.clone();
        next.slots[index] = stack;
        next
    }
}

/// A container kind built on a [`SlotContainer`].
///
/// Implementors get the slot primitives for free; `admit` lets a container
/// cap what may enter it (the inventory uses it for weight).
pub trait SlotStore: Clone {
    /// Underlying slots
    fn slots(&self) -> &SlotContainer;

    /// Copy of `self` holding `slots` instead
    fn with_slots(&self, slots: SlotContainer) -> Self;

    /// How many of `requested` units of `def` this container will take,
    /// ignoring slot space. Zero is reported as the returned error.
    fn admit(
        &self,
        _def: &ItemDefinition,
        requested: u32,
        _lookup: &dyn ItemLookup,
    ) -> satchel_core::Result<u32> {
        Ok(requested)
    }

    /// Check an exchange of `outgoing` for `incoming` at one slot, as in a
    /// swap between containers
    fn admit_exchange(
        &self,
        _outgoing: Option<&Stack>,
        _incoming: Option<&Stack>,
        _lookup: &dyn ItemLookup,
    ) -> satchel_core::Result<()> {
        Ok(())
    }

    /// Check if stacks held here count toward the inventory and hotbar
    /// uniqueness scope
    fn counts_unique(&self) -> bool {
        false
    }

    /// Number of slots
    fn capacity(&self) -> usize {
        self.slots().capacity()
    }

    /// Get slot contents
    fn get(&self, index: usize) -> Option<&Stack> {
        self.slots().get(index)
    }

    /// Lowest-index empty slot
    fn find_first_empty(&self) -> Option<usize> {
        self.slots().find_first_empty()
    }

    /// First slot holding `name`
    fn find_by_name(&self, name: &str) -> Option<usize> {
        self.slots().find_by_name(name)
    }

    /// Sum of quantities named `name`
    fn total_quantity(&self, name: &str) -> u64 {
        self.slots().total_quantity(name)
    }

    /// Check if any slot holds `name`
    fn has_item(&self, name: &str) -> bool {
        self.slots().has_item(name)
    }

    /// See [`SlotContainer::remove`]
    fn remove(&self, index: usize, quantity: u32) -> Outcome<Self> {
        self.slots().remove(index, quantity).map(|s| self.with_slots(s))
    }

    /// See [`SlotContainer::swap`]
    fn swap(&self, a: usize, b: usize) -> Outcome<Self> {
        self.slots().swap(a, b).map(|s| self.with_slots(s))
    }

    /// See [`SlotContainer::split`]
    fn split(&self, index: usize, quantity: u32, ids: &dyn IdSource) -> Outcome<Self> {
        self.slots().split(index, quantity, ids).map(|s| self.with_slots(s))
    }

    /// See [`SlotContainer::merge`]
    fn merge(&self, from: usize, to: usize, def: &ItemDefinition) -> Outcome<Self> {
        self.slots().merge(from, to, def).map(|s| self.with_slots(s))
    }

    /// See [`SlotContainer::set_custom_label`]
    fn set_custom_label(&self, index: usize, label: &str) -> Outcome<Self> {
        self.slots().set_custom_label(index, label).map(|s| self.with_slots(s))
    }
}

impl SlotStore for SlotContainer {
    fn slots(&self) -> &SlotContainer {
        self
    }

    fn with_slots(&self, slots: SlotContainer) -> Self {
        slots
    }
}

/// Room a single slot holding `current` units has left under `limit`,
/// with unlimited slots reported as `u32::MAX`
pub(crate) fn slot_room(limit: StackLimit, current: u32) -> u32 {
    limit.room_for(current).unwrap_or(u32::MAX - current)
}
