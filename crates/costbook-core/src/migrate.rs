//! Load-time record upgrades.
//!
//! Older documents predate `basis_quantity` and `price_per_unit`. Rather
//! than backfilling on every read path, the document store runs
//! [`upgrade_work_item`] exactly once when a document is loaded, so all
//! in-memory records satisfy the current schema:
//!
//! - `basis_quantity` is always positive (absent or non-positive → 1.0)
//! - `price_per_unit` is always `sum_total / basis_quantity`

use crate::model::WorkItem;

/// Heal one work item in place. Idempotent.
pub fn upgrade_work_item(item: &mut WorkItem) {
    if item.basis_quantity <= 0.0 || !item.basis_quantity.is_finite() {
        item.basis_quantity = 1.0;
    }
    // Absent on old records (deserializes as 0). A genuine stored zero only
    // occurs alongside a zero sum_total, where the recomputation is a no-op.
    if item.price_per_unit == 0.0 {
        item.price_per_unit = item.sum_total / item.basis_quantity;
    }
}
