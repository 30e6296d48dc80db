//! Transfer coordinator
//!
//! Moves stacks between two different containers as one step. Either both
//! returned containers reflect the move, or both equal their inputs.
//!
//! ```ignore
//! let coordinator = TransferCoordinator::new(&registry, &ids);
//! let out = coordinator.assign(&inventory, 3, &hotbar, 0, 5, water);
//! if out.is_success() {
//!     inventory = out.source;
//!     hotbar = out.dest;
//! }
//! ```
//!
//! Source and destination must be distinct containers; moves inside one
//! container use the [`SlotStore`] primitives instead.
//!
//! A unique item may exist once across the inventory and hotbar. The generic
//! moves only see two containers, so they refuse to bring a unique item into
//! that pair from outside it; [`TransferCoordinator::pick_up`],
//! [`TransferCoordinator::pick_up_to_hotbar`] and
//! [`TransferCoordinator::swap_with_ground`] take both halves and do.

use crate::container::{slot_room, MetadataStacking, SlotStore, Stack};
use crate::equipment::{EquipmentSlot, EquipmentState, EquippedItem};
use crate::ground::Ground;
use crate::inventory::{Hotbar, Inventory};
use crate::item::ItemDefinition;
use crate::outcome::{log_rejection, Consumed, Transfer};
use crate::registry::ItemLookup;
use satchel_core::{IdSource, InventoryError};

/// Result of moving an item from the inventory into equipment
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct EquipTransfer {
    pub inventory: Inventory,
    pub equipment: EquipmentState,
    /// Previous occupant, already placed back in the inventory
    pub replaced: Option<EquippedItem>,
    pub error: Option<InventoryError>,
}

impl EquipTransfer {
    /// Check if the item was equipped
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of moving equipped items back into the inventory
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct UnequipTransfer {
    pub inventory: Inventory,
    pub equipment: EquipmentState,
    /// Items that moved, in slot order
    pub items: Vec<EquippedItem>,
    pub error: Option<InventoryError>,
}

impl UnequipTransfer {
    /// Check if the items moved
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Orchestrates atomic cross-container moves.
///
/// Borrows the definition lookup and id source for its lifetime; never
/// holds on to container state.
#[derive(Clone, Copy)]
pub struct TransferCoordinator<'a> {
    lookup: &'a dyn ItemLookup,
    ids: &'a dyn IdSource,
}

impl<'a> TransferCoordinator<'a> {
    /// Create a coordinator
    pub fn new(lookup: &'a dyn ItemLookup, ids: &'a dyn IdSource) -> Self {
        Self { lookup, ids }
    }

    /// Resolve an item name
    pub fn definition_of(&self, name: &str) -> satchel_core::Result<&'a ItemDefinition> {
        self.lookup.lookup(name).ok_or(InventoryError::UnknownDefinition)
    }

    fn check_assign<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        dest_index: usize,
        quantity: u32,
        def: &ItemDefinition,
    ) -> satchel_core::Result<u32> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        if source_index >= source.capacity() || dest_index >= dest.capacity() {
            return Err(InventoryError::OutOfRange);
        }
        let held = source.get(source_index).ok_or(InventoryError::EmptySlot)?;
        if held.quantity < quantity {
            return Err(InventoryError::InsufficientQuantity);
        }
        if held.item_name != def.name {
            return Err(InventoryError::ItemMismatch);
        }
        if def.is_unique() && enters_scope(source, dest) {
            return Err(InventoryError::UniqueConflict);
        }

        let wanted = if def.is_unique() { 1 } else { quantity };
        let limit = def.stack_limit();
        let fits = match dest.get(dest_index) {
            Some(target) => {
                let stacking = dest.slots().stacking();
                if target.item_name != held.item_name
                    || (stacking == MetadataStacking::MustMatch && target.metadata != held.metadata)
                {
                    return Err(InventoryError::ItemMismatch);
                }
                wanted.min(slot_room(limit, target.quantity))
            }
            None => limit.clamp(wanted),
        };
        if fits == 0 {
            return Err(InventoryError::NoSpace);
        }
        dest.admit(def, fits, self.lookup)
    }

    /// Check whether [`Self::assign`] would move anything
    pub fn can_assign<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        dest_index: usize,
        quantity: u32,
        def: &ItemDefinition,
    ) -> bool {
        self.check_assign(source, source_index, dest, dest_index, quantity, def)
            .is_ok()
    }

    /// Move up to `quantity` units from one slot onto a specific slot of
    /// another container.
    ///
    /// Unique items move exactly one unit, and only within the inventory
    /// and hotbar pair. The amount is capped by the destination's room;
    /// nothing fitting is `NO_SPACE`.
    pub fn assign<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        dest_index: usize,
        quantity: u32,
        def: &ItemDefinition,
    ) -> Transfer<S, D> {
        let moved = match self.check_assign(source, source_index, dest, dest_index, quantity, def) {
            Ok(moved) => moved,
            Err(err) => {
                let err = log_rejection(
                    "assign",
                    err,
                    format_args!("{} x{} from slot {} to {}", def.name, quantity, source_index, dest_index),
                );
                return Transfer::rejected(source.clone(), dest.clone(), err);
            }
        };

        // check_assign guarantees the source slot holds at least `moved`
        let Some(held) = source.get(source_index) else {
            return Transfer::rejected(source.clone(), dest.clone(), InventoryError::EmptySlot);
        };
        let placed = match dest.get(dest_index) {
            Some(target) => Stack {
                quantity: target.quantity + moved,
                ..target.clone()
            },
            None => Stack {
                id: self.ids.next_stack_id(),
                quantity: moved,
                ..held.clone()
            },
        };
        let new_dest = dest.with_slots(dest.slots().with_slot(dest_index, Some(placed)));
        let new_source = match source.slots().take(source_index, moved) {
            Ok((slots, _)) => source.with_slots(slots),
            Err(err) => return Transfer::rejected(source.clone(), dest.clone(), err),
        };
        Transfer::moved(new_source, new_dest, moved)
    }

    /// [`Self::assign`] with the definition resolved from the lookup
    pub fn assign_item<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        dest_index: usize,
        quantity: u32,
    ) -> Transfer<S, D> {
        match self.resolve(source, source_index) {
            Ok(def) => self.assign(source, source_index, dest, dest_index, quantity, def),
            Err(err) => Transfer::rejected(
                source.clone(),
                dest.clone(),
                log_rejection("assign", err, format_args!("slot {}", source_index)),
            ),
        }
    }

    fn resolve<S: SlotStore>(&self, source: &S, index: usize) -> satchel_core::Result<&'a ItemDefinition> {
        if index >= source.capacity() {
            return Err(InventoryError::OutOfRange);
        }
        let held = source.get(index).ok_or(InventoryError::EmptySlot)?;
        self.definition_of(&held.item_name)
    }

    /// Spread `quantity` units of one slot across another container: top up
    /// matching entries, then fill empty slots. The source shrinks by exactly
    /// what the destination absorbed.
    pub fn give_back<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        quantity: u32,
        def: &ItemDefinition,
    ) -> Transfer<S, D> {
        let result = if def.is_unique() && enters_scope(source, dest) {
            Err(InventoryError::UniqueConflict)
        } else {
            self.try_give_back(source, source_index, dest, quantity, def)
        };
        settle("give back", result, source, source_index, dest, quantity, def)
    }

    fn try_give_back<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        quantity: u32,
        def: &ItemDefinition,
    ) -> satchel_core::Result<(S, D, u32)> {
        if source_index >= source.capacity() {
            return Err(InventoryError::OutOfRange);
        }
        let held = source.get(source_index).ok_or(InventoryError::EmptySlot)?;
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        if quantity > held.quantity {
            return Err(InventoryError::InsufficientQuantity);
        }
        if held.item_name != def.name {
            return Err(InventoryError::ItemMismatch);
        }
        if def.is_unique() && dest.has_item(&def.name) {
            return Err(InventoryError::UniqueConflict);
        }

        let admitted = dest.admit(def, quantity, self.lookup)?;
        let (slots, moved) = dest
            .slots()
            .deposit(def, admitted, held.metadata.as_ref(), self.ids);
        if moved == 0 {
            return Err(InventoryError::NoSpace);
        }
        let (source_slots, _) = source.slots().take(source_index, moved)?;
        Ok((source.with_slots(source_slots), dest.with_slots(slots), moved))
    }

    /// Remove up to `quantity` units from a slot for item use, reporting how
    /// many were actually removed
    pub fn consume<S: SlotStore>(&self, container: &S, index: usize, quantity: u32) -> Consumed<S> {
        match container.slots().take(index, quantity) {
            Ok((slots, consumed)) => Consumed {
                state: container.with_slots(slots),
                consumed,
                error: None,
            },
            Err(err) => Consumed {
                state: container.clone(),
                consumed: 0,
                error: Some(log_rejection("consume", err, format_args!("slot {} x{}", index, quantity))),
            },
        }
    }

    /// Exchange the contents of a slot in `a` with a slot in `b`.
    ///
    /// A side that is weighed must stay within its capacity, and a unique
    /// item may not enter the inventory and hotbar pair from outside it.
    /// `moved` counts units that changed container.
    pub fn swap_across<S: SlotStore, D: SlotStore>(
        &self,
        a: &S,
        index_a: usize,
        b: &D,
        index_b: usize,
    ) -> Transfer<S, D> {
        let checked = check_range(a, index_a, b, index_b).and_then(|()| {
            let from_a = a.get(index_a);
            let from_b = b.get(index_b);
            for (stack, entering) in [(from_a, enters_scope(a, b)), (from_b, enters_scope(b, a))] {
                if let Some(stack) = stack.filter(|_| entering) {
                    if self.lookup.lookup(&stack.item_name).is_some_and(ItemDefinition::is_unique) {
                        return Err(InventoryError::UniqueConflict);
                    }
                }
            }
            a.admit_exchange(from_a, from_b, self.lookup)?;
            b.admit_exchange(from_b, from_a, self.lookup)
        });
        match checked {
            Ok(()) => exchange(a, index_a, b, index_b),
            Err(err) => {
                let err = log_rejection("swap across", err, format_args!("slots {} and {}", index_a, index_b));
                Transfer::rejected(a.clone(), b.clone(), err)
            }
        }
    }

    /// Exchange a ground slot with an inventory slot. A unique item coming
    /// off the ground is refused when the inventory (apart from the slot it
    /// replaces) or the hotbar already holds it.
    pub fn swap_with_ground(
        &self,
        ground: &Ground,
        ground_index: usize,
        inventory: &Inventory,
        inventory_index: usize,
        hotbar: &Hotbar,
    ) -> Transfer<Ground, Inventory> {
        let checked = check_range(ground, ground_index, inventory, inventory_index).and_then(|()| {
            let incoming = ground.get(ground_index);
            let outgoing = inventory.get(inventory_index);
            if let Some(def) = incoming.and_then(|stack| self.lookup.lookup(&stack.item_name)) {
                let rest = inventory.with_slots(inventory.slots().with_slot(inventory_index, None));
                if rest.owns_unique(def, hotbar) {
                    return Err(InventoryError::UniqueConflict);
                }
            }
            inventory.admit_exchange(outgoing, incoming, self.lookup)
        });
        match checked {
            Ok(()) => exchange(ground, ground_index, inventory, inventory_index),
            Err(err) => {
                let err = log_rejection(
                    "swap with ground",
                    err,
                    format_args!("slots {} and {}", ground_index, inventory_index),
                );
                Transfer::rejected(ground.clone(), inventory.clone(), err)
            }
        }
    }

    /// Give back a whole slot; an empty slot is a trivial success
    pub fn clear_slot<S: SlotStore, D: SlotStore>(
        &self,
        source: &S,
        source_index: usize,
        dest: &D,
        def: &ItemDefinition,
    ) -> Transfer<S, D> {
        if source_index >= source.capacity() {
            let err = log_rejection("clear slot", InventoryError::OutOfRange, format_args!("slot {}", source_index));
            return Transfer::rejected(source.clone(), dest.clone(), err);
        }
        match source.get(source_index) {
            Some(held) => self.give_back(source, source_index, dest, held.quantity, def),
            None => Transfer::moved(source.clone(), dest.clone(), 0),
        }
    }

    /// Move ground items into the inventory. Unique items are refused when
    /// already held in the inventory or hotbar.
    pub fn pick_up(
        &self,
        ground: &Ground,
        index: usize,
        inventory: &Inventory,
        hotbar: &Hotbar,
        quantity: u32,
    ) -> Transfer<Ground, Inventory> {
        self.collect(ground, index, inventory, quantity, |def| inventory.owns_unique(def, hotbar))
    }

    /// Move ground items into the hotbar. Unique items are refused when
    /// already held in the inventory or hotbar.
    pub fn pick_up_to_hotbar(
        &self,
        ground: &Ground,
        index: usize,
        hotbar: &Hotbar,
        inventory: &Inventory,
        quantity: u32,
    ) -> Transfer<Ground, Hotbar> {
        self.collect(ground, index, hotbar, quantity, |def| inventory.owns_unique(def, hotbar))
    }

    fn collect<D: SlotStore>(
        &self,
        ground: &Ground,
        index: usize,
        dest: &D,
        quantity: u32,
        held: impl Fn(&ItemDefinition) -> bool,
    ) -> Transfer<Ground, D> {
        let def = match self.resolve(ground, index) {
            Ok(def) => def,
            Err(err) => {
                let err = log_rejection("pick up", err, format_args!("slot {}", index));
                return Transfer::rejected(ground.clone(), dest.clone(), err);
            }
        };
        let result = if held(def) {
            Err(InventoryError::UniqueConflict)
        } else {
            self.try_give_back(ground, index, dest, quantity, def)
        };
        settle("pick up", result, ground, index, dest, quantity, def)
    }

    /// Move units from the inventory or hotbar onto the ground
    pub fn drop_to_ground<S: SlotStore>(
        &self,
        source: &S,
        index: usize,
        ground: &Ground,
        quantity: u32,
    ) -> Transfer<S, Ground> {
        match self.resolve(source, index) {
            Ok(def) => self.give_back(source, index, ground, quantity, def),
            Err(err) => Transfer::rejected(
                source.clone(),
                ground.clone(),
                log_rejection("drop", err, format_args!("slot {}", index)),
            ),
        }
    }

    /// Equip one unit of an inventory slot.
    ///
    /// A multi-unit stack keeps its id; the equipped unit gets a fresh one.
    /// With `force`, a displaced item goes back into the inventory, and the
    /// whole step is rejected if it cannot.
    pub fn equip_from_inventory(
        &self,
        inventory: &Inventory,
        index: usize,
        equipment: &EquipmentState,
        slot: EquipmentSlot,
        force: bool,
        hotbar: &Hotbar,
    ) -> EquipTransfer {
        let reject = |err| EquipTransfer {
            inventory: inventory.clone(),
            equipment: equipment.clone(),
            replaced: None,
            error: Some(log_rejection("equip from inventory", err, format_args!("slot {} to {}", index, slot))),
        };

        if index >= inventory.capacity() {
            return reject(InventoryError::OutOfRange);
        }
        let Some(held) = inventory.get(index) else {
            return reject(InventoryError::EmptySlot);
        };
        if let Err(err) = EquipmentState::can_equip(held, slot) {
            return reject(err);
        }
        if equipment.is_occupied(slot) && !force {
            return reject(InventoryError::SlotOccupied);
        }

        let unit = if held.quantity > 1 {
            Stack {
                id: self.ids.next_stack_id(),
                quantity: 1,
                ..held.clone()
            }
        } else {
            held.clone()
        };
        let equipped = equipment.equip(&unit, slot, force);
        if let Some(err) = equipped.error {
            return reject(err);
        }

        let mut next = match inventory.slots().take(index, 1) {
            Ok((slots, _)) => inventory.with_slots(slots),
            Err(err) => return reject(err),
        };
        if let Some(old) = &equipped.replaced {
            let out = next.insert_stack(old.clone().into_stack(), hotbar, self.lookup);
            if let Some(err) = out.error {
                return reject(err);
            }
            next = out.state;
        }

        EquipTransfer {
            inventory: next,
            equipment: equipped.state,
            replaced: equipped.replaced,
            error: None,
        }
    }

    /// Unequip a slot into the first empty inventory slot
    pub fn unequip_to_inventory(
        &self,
        equipment: &EquipmentState,
        slot: EquipmentSlot,
        inventory: &Inventory,
        hotbar: &Hotbar,
    ) -> UnequipTransfer {
        let out = equipment.unequip(slot);
        match (out.error, out.item) {
            (None, Some(item)) => self.restore(equipment, out.state, vec![item], inventory, hotbar),
            (err, _) => self.reject_unequip(equipment, inventory, err.unwrap_or(InventoryError::ItemNotFound)),
        }
    }

    /// Empty every equipment slot into the inventory, all or nothing
    pub fn clear_equipment_to_inventory(
        &self,
        equipment: &EquipmentState,
        inventory: &Inventory,
        hotbar: &Hotbar,
    ) -> UnequipTransfer {
        let (cleared, items) = equipment.clear_all();
        self.restore(equipment, cleared, items, inventory, hotbar)
    }

    fn restore(
        &self,
        equipment: &EquipmentState,
        next_equipment: EquipmentState,
        items: Vec<EquippedItem>,
        inventory: &Inventory,
        hotbar: &Hotbar,
    ) -> UnequipTransfer {
        if items.len() > inventory.slots().free_slots() {
            return self.reject_unequip(equipment, inventory, InventoryError::NoSpace);
        }
        let mut next = inventory.clone();
        for item in &items {
            let out = next.insert_stack(item.clone().into_stack(), hotbar, self.lookup);
            if let Some(err) = out.error {
                return self.reject_unequip(equipment, inventory, err);
            }
            next = out.state;
        }
        UnequipTransfer {
            inventory: next,
            equipment: next_equipment,
            items,
            error: None,
        }
    }

    fn reject_unequip(&self, equipment: &EquipmentState, inventory: &Inventory, err: InventoryError) -> UnequipTransfer {
        UnequipTransfer {
            inventory: inventory.clone(),
            equipment: equipment.clone(),
            items: Vec::new(),
            error: Some(log_rejection("unequip to inventory", err, format_args!("{} items equipped", equipment.equipped_count()))),
        }
    }
}

/// Check if a move from `source` into `dest` brings stacks into the
/// inventory and hotbar pair from outside it
fn enters_scope<S: SlotStore, D: SlotStore>(source: &S, dest: &D) -> bool {
    dest.counts_unique() && !source.counts_unique()
}

fn check_range<S: SlotStore, D: SlotStore>(a: &S, index_a: usize, b: &D, index_b: usize) -> satchel_core::Result<()> {
    if index_a >= a.capacity() || index_b >= b.capacity() {
        return Err(InventoryError::OutOfRange);
    }
    Ok(())
}

/// Swap two in-range slots unconditionally
fn exchange<S: SlotStore, D: SlotStore>(a: &S, index_a: usize, b: &D, index_b: usize) -> Transfer<S, D> {
    let from_a = a.get(index_a).cloned();
    let from_b = b.get(index_b).cloned();
    let moved = [&from_a, &from_b]
        .into_iter()
        .flatten()
        .map(|stack| stack.quantity)
        .sum();
    Transfer::moved(
        a.with_slots(a.slots().with_slot(index_a, from_b)),
        b.with_slots(b.slots().with_slot(index_b, from_a)),
        moved,
    )
}

/// Turn a give-back result into a transfer, logging a rejection
fn settle<S: SlotStore, D: SlotStore>(
    op: &str,
    result: satchel_core::Result<(S, D, u32)>,
    source: &S,
    source_index: usize,
    dest: &D,
    quantity: u32,
    def: &ItemDefinition,
) -> Transfer<S, D> {
    match result {
        Ok((new_source, new_dest, moved)) => Transfer::moved(new_source, new_dest, moved),
        Err(err) => {
            let err = log_rejection(op, err, format_args!("{} x{} from slot {}", def.name, quantity, source_index));
            Transfer::rejected(source.clone(), dest.clone(), err)
        }
    }
}
