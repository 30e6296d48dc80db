//! Equipment map
//!
//! One optional item per body location. An item may occupy key `K` only if
//! its clothing metadata declares `K`. Equipped items never stack.

use crate::container::Stack;
use crate::metadata::{ClothingMetadata, ComponentType, ItemMetadata};
use crate::outcome::log_rejection;
use satchel_core::{InventoryError, StackId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Equipment slot keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Hat,
    Glasses,
    Mask,
    Earring,
    Tshirt,
    Jacket,
    Pants,
    Shoes,
    Bag,
    Armor,
    Watch,
    Bracelet,
    Necklace,
    Gloves,
    Helmet,
}

/// Static description of an equipment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDefinition {
    pub slot: EquipmentSlot,
    pub label: &'static str,
    pub component_type: ComponentType,
    /// Component id for components, prop id for props
    pub native_id: i32,
}

impl EquipmentSlot {
    /// Number of slots
    pub const COUNT: usize = 15;

    /// Every slot, in map order
    pub const ALL: [EquipmentSlot; Self::COUNT] = [
        Self::Hat,
        Self::Glasses,
        Self::Mask,
        Self::Earring,
        Self::Tshirt,
        Self::Jacket,
        Self::Pants,
        Self::Shoes,
        Self::Bag,
        Self::Armor,
        Self::Watch,
        Self::Bracelet,
        Self::Necklace,
        Self::Gloves,
        Self::Helmet,
    ];

    /// Position in [`Self::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire key
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hat => "hat",
            Self::Glasses => "glasses",
            Self::Mask => "mask",
            Self::Earring => "earring",
            Self::Tshirt => "tshirt",
            Self::Jacket => "jacket",
            Self::Pants => "pants",
            Self::Shoes => "shoes",
            Self::Bag => "bag",
            Self::Armor => "armor",
            Self::Watch => "watch",
            Self::Bracelet => "bracelet",
            Self::Necklace => "necklace",
            Self::Gloves => "gloves",
            Self::Helmet => "helmet",
        }
    }

    /// Label, component type and native id
    pub const fn definition(self) -> SlotDefinition {
        use ComponentType::{Component, Prop};
        let (label, component_type, native_id) = match self {
            Self::Hat => ("Hat", Prop, 0),
            Self::Glasses => ("Glasses", Prop, 1),
            Self::Mask => ("Mask", Component, 1),
            Self::Earring => ("Earring", Prop, 2),
            Self::Tshirt => ("T-Shirt", Component, 8),
            Self::Jacket => ("Jacket", Component, 11),
            Self::Pants => ("Pants", Component, 4),
            Self::Shoes => ("Shoes", Component, 6),
            Self::Bag => ("Bag", Component, 5),
            Self::Armor => ("Armor", Component, 9),
            Self::Watch => ("Watch", Prop, 6),
            Self::Bracelet => ("Bracelet", Prop, 7),
            Self::Necklace => ("Necklace", Component, 7),
            Self::Gloves => ("Gloves", Component, 3),
            Self::Helmet => ("Helmet", Prop, 0),
        };
        SlotDefinition {
            slot: self,
            label,
            component_type,
            native_id,
        }
    }

    /// Check if this slot holds a prop
    pub fn is_prop(self) -> bool {
        self.definition().component_type == ComponentType::Prop
    }
}

impl FromStr for EquipmentSlot {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or(InventoryError::InvalidSlot)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item occupying an equipment slot; always quantity 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub id: StackId,
    #[serde(rename = "name")]
    pub item_name: String,
    pub metadata: ClothingMetadata,
}

impl EquippedItem {
    /// Always 1
    pub fn quantity(&self) -> u32 {
        1
    }

    /// Slot the item declares
    pub fn slot(&self) -> EquipmentSlot {
        self.metadata.equipment_slot
    }

    /// Convert back into a single-unit stack, keeping the id
    pub fn into_stack(self) -> Stack {
        Stack::new(self.id, self.item_name, 1).with_metadata(ItemMetadata::Clothing(self.metadata))
    }
}

/// Result of an equip request
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct EquipOutcome {
    pub state: EquipmentState,
    pub error: Option<InventoryError>,
    /// Item displaced by a forced equip
    pub replaced: Option<EquippedItem>,
}

impl EquipOutcome {
    /// Check if the item was equipped
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of an unequip request
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct UnequipOutcome {
    pub state: EquipmentState,
    pub error: Option<InventoryError>,
    pub item: Option<EquippedItem>,
}

impl UnequipOutcome {
    /// Check if an item was removed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Total mapping from every [`EquipmentSlot`] to an optional item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<EquipmentSlot, Option<EquippedItem>>",
    into = "BTreeMap<EquipmentSlot, Option<EquippedItem>>"
)]
pub struct EquipmentState {
    slots: [Option<EquippedItem>; EquipmentSlot::COUNT],
}

impl EquipmentState {
    /// Every slot empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the item in a slot
    pub fn get(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        self.slots[slot.index()].as_ref()
    }

    /// Check if a slot is occupied
    pub fn is_occupied(&self, slot: EquipmentSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Occupied slots, in map order
    pub fn occupied_slots(&self) -> Vec<EquipmentSlot> {
        EquipmentSlot::ALL
            .into_iter()
            .filter(|slot| self.is_occupied(*slot))
            .collect()
    }

    /// Empty slots, in map order
    pub fn empty_slots(&self) -> Vec<EquipmentSlot> {
        EquipmentSlot::ALL
            .into_iter()
            .filter(|slot| !self.is_occupied(*slot))
            .collect()
    }

    /// Number of equipped items
    pub fn equipped_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Equipped items, in map order
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &EquippedItem)> {
        EquipmentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|item| (slot, item)))
    }

    /// Check whether `item` may go into `slot`, ignoring occupancy
    pub fn can_equip(item: &Stack, slot: EquipmentSlot) -> satchel_core::Result<()> {
        let declared = Self::clothing_of(item)?.equipment_slot;
        if declared != slot {
            return Err(InventoryError::SlotMismatch);
        }
        Ok(())
    }

    /// Slot an item declares, if it is clothing
    pub fn slot_for(item: &Stack) -> Option<EquipmentSlot> {
        Self::clothing_of(item).ok().map(|c| c.equipment_slot)
    }

    fn check_identity(item: &Stack) -> satchel_core::Result<()> {
        if item.id.is_null() || item.item_name.is_empty() {
            return Err(InventoryError::InvalidItem);
        }
        Ok(())
    }

    fn clothing_of(item: &Stack) -> satchel_core::Result<&ClothingMetadata> {
        Self::check_identity(item)?;
        item.metadata
            .as_ref()
            .and_then(ItemMetadata::as_clothing)
            .ok_or(InventoryError::NotClothingItem)
    }

    /// Put `item` into `slot`.
    ///
    /// An occupied slot is rejected unless `force` is set, in which case the
    /// previous occupant is returned as `replaced`.
    pub fn equip(&self, item: &Stack, slot: EquipmentSlot, force: bool) -> EquipOutcome {
        let clothing = match Self::clothing_of(item) {
            Ok(clothing) if clothing.equipment_slot == slot => clothing,
            Ok(_) => return self.reject_equip(InventoryError::SlotMismatch, slot),
            Err(err) => return self.reject_equip(err, slot),
        };
        if self.is_occupied(slot) && !force {
            return self.reject_equip(InventoryError::SlotOccupied, slot);
        }

        let mut next = self.clone();
        let replaced = next.slots[slot.index()].replace(EquippedItem {
            id: item.id,
            item_name: item.item_name.clone(),
            metadata: clothing.clone(),
        });
        if let Some(old) = &replaced {
            log::debug!("Replaced {} ({}) in {}", old.item_name, old.id, slot);
        }
        EquipOutcome {
            state: next,
            error: None,
            replaced,
        }
    }

    /// Like [`Self::equip`] with a wire slot key. The item's identity is
    /// checked before the key, its clothing shape after.
    pub fn equip_named(&self, item: &Stack, slot: &str, force: bool) -> EquipOutcome {
        if let Err(err) = Self::check_identity(item) {
            return self.reject_equip_named(err, slot);
        }
        match slot.parse::<EquipmentSlot>() {
            Ok(slot) => self.equip(item, slot, force),
            Err(err) => self.reject_equip_named(err, slot),
        }
    }

    fn reject_equip(&self, err: InventoryError, slot: EquipmentSlot) -> EquipOutcome {
        self.reject_equip_named(err, slot.as_str())
    }

    fn reject_equip_named(&self, err: InventoryError, slot: &str) -> EquipOutcome {
        EquipOutcome {
            state: self.clone(),
            error: Some(log_rejection("equip", err, format_args!("slot {}", slot))),
            replaced: None,
        }
    }

    /// Empty a slot, returning its occupant
    pub fn unequip(&self, slot: EquipmentSlot) -> UnequipOutcome {
        let mut next = self.clone();
        match next.slots[slot.index()].take() {
            Some(item) => UnequipOutcome {
                state: next,
                error: None,
                item: Some(item),
            },
            None => self.reject_unequip(InventoryError::ItemNotFound, slot.as_str()),
        }
    }

    /// Like [`Self::unequip`] with a wire slot key
    pub fn unequip_named(&self, slot: &str) -> UnequipOutcome {
        match slot.parse::<EquipmentSlot>() {
            Ok(slot) => self.unequip(slot),
            Err(err) => self.reject_unequip(err, slot),
        }
    }

    fn reject_unequip(&self, err: InventoryError, slot: &str) -> UnequipOutcome {
        UnequipOutcome {
            state: self.clone(),
            error: Some(log_rejection("unequip", err, format_args!("slot {}", slot))),
            item: None,
        }
    }

    /// Exchange the occupants of two slots. Each occupant must declare the
    /// slot it moves into.
    pub fn swap(&self, a: EquipmentSlot, b: EquipmentSlot) -> (Self, Option<InventoryError>) {
        let fits = |item: Option<&EquippedItem>, target: EquipmentSlot| {
            item.map_or(true, |item| item.slot() == target)
        };
        if !fits(self.get(a), b) || !fits(self.get(b), a) {
            let err = log_rejection("swap", InventoryError::SlotMismatch, format_args!("{} and {}", a, b));
            return (self.clone(), Some(err));
        }
        let mut next = self.clone();
        next.slots.swap(a.index(), b.index());
        (next, None)
    }

    /// Empty every slot, returning every previous occupant in map order
    pub fn clear_all(&self) -> (Self, Vec<EquippedItem>) {
        let cleared = self.slots.iter().flatten().cloned().collect();
        (Self::new(), cleared)
    }
}

impl TryFrom<BTreeMap<EquipmentSlot, Option<EquippedItem>>> for EquipmentState {
    type Error = String;

    fn try_from(map: BTreeMap<EquipmentSlot, Option<EquippedItem>>) -> Result<Self, Self::Error> {
        let mut state = Self::new();
        for (slot, item) in map {
            if let Some(item) = &item {
                if item.slot() != slot {
                    return Err(format!("{} declares slot {} but sits in {}", item.item_name, item.slot(), slot));
                }
            }
            state.slots[slot.index()] = item;
        }
        Ok(state)
    }
}

impl From<EquipmentState> for BTreeMap<EquipmentSlot, Option<EquippedItem>> {
    fn from(state: EquipmentState) -> Self {
        EquipmentSlot::ALL.into_iter().zip(state.slots).collect()
    }
}
