use serde::{Deserialize, Serialize};

/// One selected catalog line inside a work item.
///
/// Every field is a snapshot taken when the work item was saved: later
/// edits (or deletion) of the master catalog entry never touch existing
/// work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkItemLine {
    /// Master item id at snapshot time.
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// `quantity * unit_price`, fixed at save time.
    pub subtotal: f64,
    pub unit: String,
}

/// A reusable unit-cost recipe combining labor/material/equipment lines,
/// priced per a basis quantity of its declared unit.
///
/// Field names mirror the legacy document keys exactly (including
/// `contractor_overhead_15_percent`) so existing documents keep loading.
/// `basis_quantity` defaults to 0 on deserialization; the load-time
/// migration heals absent or non-positive values to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkItem {
    pub id: String,
    pub name: String,
    pub unit_of_measure: String,
    pub basis_quantity: f64,
    pub labor: Vec<WorkItemLine>,
    pub material: Vec<WorkItemLine>,
    pub equipment: Vec<WorkItemLine>,
    pub labor_total: f64,
    pub material_total: f64,
    pub equipment_total: f64,
    /// Sum of the three trade totals, before overhead.
    pub total_cost_per_unit: f64,
    pub contractor_overhead_15_percent: f64,
    /// `total_cost_per_unit * 1.15`.
    pub sum_total: f64,
    /// `sum_total / basis_quantity`.
    pub price_per_unit: f64,
}

/// A named group of work items. Top-level, independent lifecycle; each
/// work item is owned by exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub work_items: Vec<WorkItem>,
}
