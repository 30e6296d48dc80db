//! Weight ledger
//!
//! All weights are grams. Stacks whose definition is unknown weigh nothing.

use crate::container::{SlotContainer, Stack};
use crate::item::ItemDefinition;
use crate::registry::ItemLookup;

/// Weight of one stack
pub fn slot_weight(stack: &Stack, lookup: &dyn ItemLookup) -> u64 {
    lookup
        .lookup(&stack.item_name)
        .map_or(0, |def| u64::from(def.weight) * u64::from(stack.quantity))
}

/// Sum of every occupied slot's weight
pub fn total_weight(container: &SlotContainer, lookup: &dyn ItemLookup) -> u64 {
    container
        .items()
        .map(|(_, stack)| slot_weight(stack, lookup))
        .sum()
}

/// Check if `delta` more grams stay within `capacity`
pub fn can_accept(current: u64, capacity: u64, delta: u64) -> bool {
    current.saturating_add(delta) <= capacity
}

/// Grams left before `capacity`
pub fn remaining_capacity(current: u64, capacity: u64) -> u64 {
    capacity.saturating_sub(current)
}

/// Check if over capacity
pub fn is_overweight(current: u64, capacity: u64) -> bool {
    current > capacity
}

/// Fill level in percent, capped at 100
pub fn weight_percentage(current: u64, capacity: u64) -> f32 {
    if capacity == 0 {
        return 0.0;
    }
    ((current as f64 / capacity as f64) * 100.0).min(100.0) as f32
}

/// How many units of `def` fit in the remaining capacity
pub fn units_that_fit(def: &ItemDefinition, current: u64, capacity: u64) -> u32 {
    if def.weight == 0 {
        return u32::MAX;
    }
    let units = remaining_capacity(current, capacity) / u64::from(def.weight);
    u32::try_from(units).unwrap_or(u32::MAX)
}

/// Grams as kilograms with one decimal, e.g. `"1.5kg"`
pub fn format_weight(grams: u64) -> String {
    format!("{:.1}kg", grams as f64 / 1000.0)
}

/// `"current / capacity"` in kilograms
pub fn format_weight_range(current: u64, capacity: u64) -> String {
    format!("{} / {}", format_weight(current), format_weight(capacity))
}
