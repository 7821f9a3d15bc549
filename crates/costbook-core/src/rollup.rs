//! The cost rollup engine.
//!
//! [`compute_work_item`] derives a complete [`WorkItem`] from a typed draft
//! (as decoded by the outer surface) plus the three master catalogs. The
//! engine is pure: it never touches storage, and recomputing from identical
//! inputs yields an identical record except for a freshly generated id.
//!
//! Failure policy, deliberately asymmetric:
//!
//! - an empty work-item name is the only hard error;
//! - a non-numeric or non-positive basis quantity silently becomes 1.0;
//! - a line whose master id is unknown or whose quantity fails numeric
//!   coercion is silently skipped, and the rest of the rollup proceeds.
//!
//! The leniency favors forward progress over strictness and is part of the
//! engine's contract, not an accident.

use crate::error::{Error, Result};
use crate::model::{MasterItem, Trade, WorkItem, WorkItemLine};
use std::collections::HashMap;

/// Fixed contractor overhead markup applied to every work item.
pub const OVERHEAD_RATE: f64 = 0.15;

/// Unit of measure used when the draft leaves it blank.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "Per Item";

/// One selected catalog line, still in raw form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    /// Master item id as submitted.
    pub master_id: String,
    /// Raw quantity text; coercion failures skip the line.
    pub quantity: String,
}

impl LineDraft {
    #[must_use]
    pub fn new(master_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            master_id: master_id.into(),
            quantity: quantity.into(),
        }
    }
}

/// A typed work-item request record, decoded by the outer surface before
/// it reaches the engine.
#[derive(Debug, Clone, Default)]
pub struct WorkItemDraft {
    pub name: String,
    pub unit_of_measure: String,
    /// Raw basis quantity text; anything non-numeric or non-positive
    /// becomes 1.0.
    pub basis_quantity: String,
    pub labor: Vec<LineDraft>,
    pub material: Vec<LineDraft>,
    pub equipment: Vec<LineDraft>,
}

impl WorkItemDraft {
    fn lines(&self, trade: Trade) -> &[LineDraft] {
        match trade {
            Trade::Labor => &self.labor,
            Trade::Material => &self.material,
            Trade::Equipment => &self.equipment,
        }
    }
}

/// Id-keyed master catalogs for all three trades.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    labor: HashMap<String, MasterItem>,
    material: HashMap<String, MasterItem>,
    equipment: HashMap<String, MasterItem>,
}

impl Catalogs {
    #[must_use]
    pub fn new(
        labor: HashMap<String, MasterItem>,
        material: HashMap<String, MasterItem>,
        equipment: HashMap<String, MasterItem>,
    ) -> Self {
        Self {
            labor,
            material,
            equipment,
        }
    }

    fn map(&self, trade: Trade) -> &HashMap<String, MasterItem> {
        match trade {
            Trade::Labor => &self.labor,
            Trade::Material => &self.material,
            Trade::Equipment => &self.equipment,
        }
    }
}

/// Compute a work item from a draft and the master catalogs.
///
/// Pass `existing_id` to preserve the record id across an update; `None`
/// generates a fresh UUID.
///
/// # Errors
///
/// [`Error::Validation`] when the draft name is empty. All numeric
/// malformation is absorbed (see module docs); nothing else fails.
pub fn compute_work_item(
    draft: &WorkItemDraft,
    catalogs: &Catalogs,
    existing_id: Option<&str>,
) -> Result<WorkItem> {
    if draft.name.trim().is_empty() {
        return Err(Error::empty_name("work item"));
    }

    let basis_quantity = coerce_basis(&draft.basis_quantity);

    let mut item = WorkItem {
        id: existing_id.map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string),
        name: draft.name.clone(),
        unit_of_measure: if draft.unit_of_measure.is_empty() {
            DEFAULT_UNIT_OF_MEASURE.to_string()
        } else {
            draft.unit_of_measure.clone()
        },
        basis_quantity,
        ..WorkItem::default()
    };

    let mut total_cost = 0.0;
    for trade in Trade::ALL {
        let map = catalogs.map(trade);
        let mut group_subtotal = 0.0;
        let mut lines = Vec::new();
        for line in draft.lines(trade) {
            let Some(master) = map.get(&line.master_id) else {
                tracing::debug!(trade = %trade, id = %line.master_id, "skipping unknown master id");
                continue;
            };
            let Ok(quantity) = line.quantity.trim().parse::<f64>() else {
                tracing::debug!(trade = %trade, id = %line.master_id, "skipping unparseable quantity");
                continue;
            };
            let subtotal = quantity * master.price;
            group_subtotal += subtotal;
            lines.push(WorkItemLine {
                id: line.master_id.clone(),
                name: master.name.clone(),
                quantity,
                unit_price: master.price,
                subtotal,
                unit: master.unit.clone(),
            });
        }
        total_cost += group_subtotal;
        match trade {
            Trade::Labor => {
                item.labor = lines;
                item.labor_total = group_subtotal;
            }
            Trade::Material => {
                item.material = lines;
                item.material_total = group_subtotal;
            }
            Trade::Equipment => {
                item.equipment = lines;
                item.equipment_total = group_subtotal;
            }
        }
    }

    item.total_cost_per_unit = total_cost;
    item.contractor_overhead_15_percent = total_cost * OVERHEAD_RATE;
    item.sum_total = total_cost * 1.15;
    item.price_per_unit = item.sum_total / basis_quantity;
    Ok(item)
}

/// Coerce a raw basis quantity: non-numeric or non-positive input becomes
/// 1.0, never an error.
fn coerce_basis(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => v,
        _ => 1.0,
    }
}
