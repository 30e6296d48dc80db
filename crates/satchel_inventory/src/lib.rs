//! Satchel Inventory - Container, Stacking and Equipment Engine
//!
//! Decides how quantity-bearing item stacks live in fixed-capacity slot
//! containers and a fixed-key equipment map, and moves them between those
//! containers without duplicating or losing anything.
//!
//! # Features
//!
//! - Item definitions in the host JSON shape, loaded into a registry
//! - Stack limits and unique items
//! - Generic slot container with add, remove, split, merge and swap
//! - Inventory (weighed), hotbar and ground containers
//! - Equipment map keyed by body location
//! - Atomic cross-container transfers
//!
//! Every operation is a pure function from the current state to a
//! replacement state plus an optional error. Rejected requests hand back the
//! input unchanged.
//!
//! # Example
//!
//! ```ignore
//! use satchel_inventory::prelude::*;
//!
//! let registry = ItemRegistry::load_json("items.json")?;
//! let config = SatchelConfig::load("satchel.toml")?;
//! let ids = IdGenerator::new();
//!
//! let mut inventory = config.inventory();
//! let mut hotbar = config.hotbar();
//!
//! let water = registry.get("water").unwrap();
//! inventory = inventory.add(water, 8, None, &hotbar, &registry, &ids).state;
//!
//! let coordinator = TransferCoordinator::new(&registry, &ids);
//! let out = coordinator.assign(&inventory, 0, &hotbar, 0, 3, water);
//! inventory = out.source;
//! hotbar = out.dest;
//! ```

pub mod config;
pub mod container;
pub mod equipment;
pub mod ground;
pub mod inventory;
pub mod item;
pub mod metadata;
pub mod outcome;
pub mod registry;
pub mod transfer;
pub mod weight;

pub mod prelude {
    pub use crate::config::{ConfigError, SatchelConfig};
    pub use crate::container::{MetadataStacking, SlotContainer, SlotStore, Stack};
    pub use crate::equipment::{
        EquipOutcome, EquipmentSlot, EquipmentState, EquippedItem, SlotDefinition, UnequipOutcome,
    };
    pub use crate::ground::Ground;
    pub use crate::inventory::{Hotbar, Inventory};
    pub use crate::item::{ItemDefinition, ItemKind, JobRestriction, StackLimit};
    pub use crate::metadata::{ClothingMetadata, ComponentType, Gender, ItemMetadata, MetadataValue};
    pub use crate::outcome::{AddOutcome, Consumed, Outcome, Transfer};
    pub use crate::registry::{ItemLookup, ItemRegistry, RegistryError};
    pub use crate::transfer::{EquipTransfer, TransferCoordinator, UnequipTransfer};
    pub use satchel_core::{IdGenerator, IdSource, InventoryError, StackId};
}

pub use prelude::*;
