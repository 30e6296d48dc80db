//! Item definition registry
//!
//! Read-only lookup from item name to [`ItemDefinition`]. Definitions come
//! from the host as a JSON object keyed by name, or from a TOML file with an
//! `[[items]]` array:
//!
//! ```toml
//! [[items]]
//! name = "bread"
//! label = "Bread"
//! weight = 100
//! type = "item"
//! stackLimits = 10
//! isUseable = true
//! ```

use crate::item::{ItemDefinition, ItemKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors from loading definitions
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Duplicate item definition: {0}")]
    Duplicate(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Source of item definitions.
///
/// An absent definition means the operation does not apply to that item.
pub trait ItemLookup {
    /// Definition named `name`, if known
    fn lookup(&self, name: &str) -> Option<&ItemDefinition>;
}

impl ItemLookup for HashMap<String, ItemDefinition> {
    fn lookup(&self, name: &str) -> Option<&ItemDefinition> {
        self.get(name)
    }
}

impl<T: ItemLookup + ?Sized> ItemLookup for &T {
    fn lookup(&self, name: &str) -> Option<&ItemDefinition> {
        (**self).lookup(name)
    }
}

#[derive(Debug, Deserialize)]
struct ItemsToml {
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

/// Name-keyed set of item definitions
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    definitions: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host format: a JSON object mapping names to definitions
    pub fn from_json_str(content: &str) -> RegistryResult<Self> {
        let raw: HashMap<String, ItemDefinition> = serde_json::from_str(content)?;
        let mut registry = Self::new();
        for (key, def) in raw {
            if key != def.name {
                log::warn!("Item definition keyed '{}' is named '{}'; using its name", key, def.name);
            }
            if registry.contains(&def.name) {
                return Err(RegistryError::Duplicate(def.name));
            }
            registry.insert(def);
        }
        log::info!("Loaded {} item definitions from JSON", registry.len());
        Ok(registry)
    }

    /// Parse a TOML document with an `[[items]]` array
    pub fn from_toml_str(content: &str) -> RegistryResult<Self> {
        let raw: ItemsToml = toml::from_str(content)?;
        let mut registry = Self::new();
        for def in raw.items {
            if registry.contains(&def.name) {
                return Err(RegistryError::Duplicate(def.name));
            }
            registry.insert(def);
        }
        log::info!("Loaded {} item definitions from TOML", registry.len());
        Ok(registry)
    }

    /// Load a JSON definitions file
    pub fn load_json(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a TOML definitions file
    pub fn load_toml(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Add or replace a definition, returning the one it replaced
    pub fn insert(&mut self, def: ItemDefinition) -> Option<ItemDefinition> {
        self.definitions.insert(def.name.clone(), def)
    }

    /// Get a definition
    pub fn get(&self, name: &str) -> Option<&ItemDefinition> {
        self.definitions.get(name)
    }

    /// Check if a definition exists
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All definitions, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.definitions.values()
    }

    /// Definitions of one kind, sorted by name
    pub fn of_kind(&self, kind: ItemKind) -> Vec<&ItemDefinition> {
        let mut defs: Vec<_> = self.iter().filter(|d| d.kind == kind).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}

impl ItemLookup for ItemRegistry {
    fn lookup(&self, name: &str) -> Option<&ItemDefinition> {
        self.get(name)
    }
}

impl FromIterator<ItemDefinition> for ItemRegistry {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for def in iter {
            registry.insert(def);
        }
        registry
    }
}
