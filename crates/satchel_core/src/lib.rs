//! # satchel_core - Satchel Core
//!
//! Small primitives shared by every part of the inventory engine:
//! - **Identifiers**: fresh, never-reused stack ids and injectable sources
//! - **Errors**: the typed rejection kinds every operation reports

pub mod error;
pub mod id;

pub use error::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{InventoryError, Result};
    pub use crate::id::{IdGenerator, IdSource, StackId};
}
