//! Results returned by engine operations
//!
//! Every operation returns the full replacement state of each container it
//! touched. When `error` is set the returned state equals the input.

use satchel_core::InventoryError;

/// Replacement state plus an optional rejection
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<S> {
    pub state: S,
    pub error: Option<InventoryError>,
}

impl<S> Outcome<S> {
    /// Request applied
    pub fn accepted(state: S) -> Self {
        Self { state, error: None }
    }

    /// Request rejected; `state` must be the unchanged input
    pub fn rejected(state: S, error: InventoryError) -> Self {
        Self {
            state,
            error: Some(error),
        }
    }

    /// Check if the request was applied
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert the state, keeping the verdict
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Outcome<T> {
        Outcome {
            state: f(self.state),
            error: self.error,
        }
    }

    /// Split into state and `Result`
    pub fn into_parts(self) -> (S, Result<(), InventoryError>) {
        let verdict = match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        };
        (self.state, verdict)
    }
}

/// Result of placing a quantity into a container
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AddOutcome<S> {
    pub state: S,
    /// Units that found a slot
    pub placed: u32,
    /// Units left over; the caller decides what to do with them
    pub unplaced: u32,
    /// Set only when nothing was placed
    pub error: Option<InventoryError>,
}

impl<S> AddOutcome<S> {
    pub(crate) fn placed(state: S, placed: u32, unplaced: u32) -> Self {
        Self {
            state,
            placed,
            unplaced,
            error: None,
        }
    }

    pub(crate) fn rejected(state: S, requested: u32, error: InventoryError) -> Self {
        Self {
            state,
            placed: 0,
            unplaced: requested,
            error: Some(error),
        }
    }

    /// Check if at least one unit was placed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Check if every requested unit was placed
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.unplaced == 0
    }

    /// Convert the state, keeping the counts
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> AddOutcome<T> {
        AddOutcome {
            state: f(self.state),
            placed: self.placed,
            unplaced: self.unplaced,
            error: self.error,
        }
    }
}

/// Result of depleting a slot
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Consumed<S> {
    pub state: S,
    /// Units actually removed
    pub consumed: u32,
    pub error: Option<InventoryError>,
}

impl<S> Consumed<S> {
    /// Check if the request was applied
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of moving items between two containers
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Transfer<S, D> {
    pub source: S,
    pub dest: D,
    /// Units that changed container
    pub moved: u32,
    pub error: Option<InventoryError>,
}

impl<S, D> Transfer<S, D> {
    pub(crate) fn moved(source: S, dest: D, moved: u32) -> Self {
        Self {
            source,
            dest,
            moved,
            error: None,
        }
    }

    pub(crate) fn rejected(source: S, dest: D, error: InventoryError) -> Self {
        Self {
            source,
            dest,
            moved: 0,
            error: Some(error),
        }
    }

    /// Check if the request was applied
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Log a rejection at debug level and pass the error through
pub(crate) fn log_rejection(op: &str, error: InventoryError, detail: std::fmt::Arguments<'_>) -> InventoryError {
    log::debug!("{} rejected with {}: {}", op, error.code(), detail);
    error
}
