//! Error kinds reported by engine operations
//!
//! Engine operations never fail by panicking or by returning early through
//! `?`: they hand back a replacement state together with an optional
//! [`InventoryError`]. A rejected request always carries the unchanged input
//! state, so callers may apply the returned state without checking first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way an inventory, transfer or equipment request can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryError {
    /// The item is missing or carries a null identifier
    #[error("invalid item")]
    InvalidItem,
    /// The equipment slot key is not recognized
    #[error("unknown equipment slot")]
    InvalidSlot,
    /// The item declares a different equipment slot
    #[error("item does not belong in this equipment slot")]
    SlotMismatch,
    /// The equipment slot already holds an item
    #[error("equipment slot is occupied")]
    SlotOccupied,
    /// Nothing is equipped in the slot
    #[error("no item equipped in this slot")]
    ItemNotFound,
    /// The item metadata does not have the clothing shape
    #[error("item is not clothing")]
    NotClothingItem,

    /// Slot index outside the container
    #[error("slot index out of range")]
    OutOfRange,
    /// The addressed slot holds nothing
    #[error("slot is empty")]
    EmptySlot,
    /// Quantity is zero or outside the accepted range
    #[error("invalid quantity")]
    InvalidQuantity,
    /// The source slot holds fewer units than requested
    #[error("not enough items in slot")]
    InsufficientQuantity,
    /// Source and destination are the same slot
    #[error("source and destination are the same slot")]
    SameSlot,
    /// The two slots hold different items
    #[error("items do not match")]
    ItemMismatch,
    /// The item definition forbids sharing a slot
    #[error("item cannot be stacked")]
    NotStackable,
    /// The destination cannot take a single unit
    #[error("no space left")]
    NoSpace,
    /// The destination weight capacity would be exceeded
    #[error("weight capacity exceeded")]
    Overweight,
    /// A unique item already exists in the inventory or hotbar
    #[error("unique item already owned")]
    UniqueConflict,
    /// No definition exists for the item name
    #[error("unknown item definition")]
    UnknownDefinition,
    /// A capacity change would drop items or weight already held
    #[error("capacity change conflicts with current contents")]
    CapacityConflict,
}

impl InventoryError {
    /// Stable wire code for the UI layer to translate
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidItem => "INVALID_ITEM",
            Self::InvalidSlot => "INVALID_SLOT",
            Self::SlotMismatch => "SLOT_MISMATCH",
            Self::SlotOccupied => "SLOT_OCCUPIED",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::NotClothingItem => "NOT_CLOTHING_ITEM",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::EmptySlot => "EMPTY_SLOT",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InsufficientQuantity => "INSUFFICIENT_QUANTITY",
            Self::SameSlot => "SAME_SLOT",
            Self::ItemMismatch => "ITEM_MISMATCH",
            Self::NotStackable => "NOT_STACKABLE",
            Self::NoSpace => "NO_SPACE",
            Self::Overweight => "OVERWEIGHT",
            Self::UniqueConflict => "UNIQUE_CONFLICT",
            Self::UnknownDefinition => "UNKNOWN_DEFINITION",
            Self::CapacityConflict => "CAPACITY_CONFLICT",
        }
    }

    /// Whether this kind belongs to the equipment map
    pub const fn is_equipment_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidItem
                | Self::InvalidSlot
                | Self::SlotMismatch
                | Self::SlotOccupied
                | Self::ItemNotFound
                | Self::NotClothingItem
        )
    }
}

/// Result alias for validation helpers
pub type Result<T> = core::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde() {
        for err in [
            InventoryError::InvalidItem,
            InventoryError::SlotOccupied,
            InventoryError::NotClothingItem,
            InventoryError::UniqueConflict,
            InventoryError::CapacityConflict,
        ] {
            let json = serde_json::to_string(&err).unwrap();
            assert_eq!(json, format!("\"{}\"", err.code()));
        }
    }

    #[test]
    fn test_equipment_classification() {
        assert!(InventoryError::SlotMismatch.is_equipment_error());
        assert!(!InventoryError::NoSpace.is_equipment_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(InventoryError::SlotOccupied.to_string(), "equipment slot is occupied");
    }
}
