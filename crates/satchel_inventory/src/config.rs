//! Engine configuration
//!
//! Container sizes and policies for a session, read from TOML:
//!
//! ```toml
//! inventory_slots = 40
//! max_weight = 40000        # grams
//! hotbar_slots = 5
//! ground_slots = 30
//! metadata_stacking = "ignore"   # or "must_match"
//! ```
//!
//! Every key is optional.

use crate::container::{MetadataStacking, SlotContainer, SlotStore};
use crate::equipment::EquipmentState;
use crate::ground::Ground;
use crate::inventory::{Hotbar, Inventory};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Container sizes and policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatchelConfig {
    pub inventory_slots: usize,
    /// Grams
    pub max_weight: u64,
    pub hotbar_slots: usize,
    pub ground_slots: usize,
    pub metadata_stacking: MetadataStacking,
}

impl Default for SatchelConfig {
    fn default() -> Self {
        Self {
            inventory_slots: Inventory::DEFAULT_SLOTS,
            max_weight: Inventory::DEFAULT_MAX_WEIGHT,
            hotbar_slots: Hotbar::DEFAULT_SLOTS,
            ground_slots: Ground::DEFAULT_SLOTS,
            metadata_stacking: MetadataStacking::default(),
        }
    }
}

impl SatchelConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        log::info!(
            "Loaded config: {} inventory slots, {} g, {} hotbar slots, {} ground slots",
            config.inventory_slots,
            config.max_weight,
            config.hotbar_slots,
            config.ground_slots
        );
        Ok(config)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that every container has at least one slot
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("inventory_slots", self.inventory_slots),
            ("hotbar_slots", self.hotbar_slots),
            ("ground_slots", self.ground_slots),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{} must be positive", key)));
            }
        }
        if self.max_weight == 0 {
            log::warn!("max_weight is 0; only weightless items will fit in the inventory");
        }
        Ok(())
    }

    fn container(&self, capacity: usize) -> SlotContainer {
        SlotContainer::new(capacity).with_stacking(self.metadata_stacking)
    }

    /// Empty inventory
    pub fn inventory(&self) -> Inventory {
        Inventory::from_container(self.container(self.inventory_slots), self.max_weight)
    }

    /// Empty hotbar
    pub fn hotbar(&self) -> Hotbar {
        Hotbar::new(self.hotbar_slots).with_slots(self.container(self.hotbar_slots))
    }

    /// Empty ground container
    pub fn ground(&self) -> Ground {
        Ground::new(self.ground_slots).with_slots(self.container(self.ground_slots))
    }

    /// Empty equipment map
    pub fn equipment(&self) -> EquipmentState {
        EquipmentState::new()
    }
}
