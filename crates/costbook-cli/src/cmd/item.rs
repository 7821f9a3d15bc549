//! `cb item` — build, update, and inspect work items.
//!
//! Line selections arrive as repeated `ID:QTY` specs (e.g. `--labor 3:2.5`).
//! The quantity part stays raw text all the way into the rollup engine,
//! which owns the coercion policy.

use crate::output::{fail, pretty_kv, render, render_success, OutputMode};
use clap::{Args, Subcommand};
use costbook_core::model::{Trade, WorkItem};
use costbook_core::rollup::{compute_work_item, Catalogs, LineDraft, WorkItemDraft};
use costbook_core::store::document::DocumentStore;
use costbook_core::store::inventory::InventoryStore;
use costbook_core::units::format_unit;
use costbook_core::{Error, ErrorCode};
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ItemCmd {
    /// Compute a work item from catalog lines and add it to a category.
    Add(AddArgs),
    /// Recompute an existing work item in place.
    Update(UpdateArgs),
    /// Delete a work item from its category.
    Delete(DeleteArgs),
    /// Show one work item (searched across all categories).
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Category to add the work item to.
    #[arg(short, long)]
    pub category: String,

    #[command(flatten)]
    pub draft: DraftArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the work item to recompute.
    pub id: String,

    /// Category the work item lives in.
    #[arg(short, long)]
    pub category: String,

    #[command(flatten)]
    pub draft: DraftArgs,
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Work item name.
    #[arg(short, long)]
    pub name: String,

    /// Unit of measure (e.g. "Cubic Meter").
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Basis quantity the cost normalizes against; bad input becomes 1.
    #[arg(short, long, default_value = "1")]
    pub basis: String,

    /// Labor line as ID:QTY (repeatable).
    #[arg(long)]
    pub labor: Vec<String>,

    /// Material line as ID:QTY (repeatable).
    #[arg(long)]
    pub material: Vec<String>,

    /// Equipment line as ID:QTY (repeatable).
    #[arg(long)]
    pub equipment: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the work item to delete.
    pub id: String,

    /// Category the work item lives in.
    #[arg(short, long)]
    pub category: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Work item id.
    pub id: String,
}

impl DraftArgs {
    fn to_draft(&self) -> WorkItemDraft {
        WorkItemDraft {
            name: self.name.clone(),
            unit_of_measure: self.unit.clone().unwrap_or_default(),
            basis_quantity: self.basis.clone(),
            labor: parse_line_specs(&self.labor),
            material: parse_line_specs(&self.material),
            equipment: parse_line_specs(&self.equipment),
        }
    }
}

/// Split `ID:QTY` specs; a bare `ID` means quantity 1.
fn parse_line_specs(specs: &[String]) -> Vec<LineDraft> {
    specs
        .iter()
        .map(|spec| match spec.split_once(':') {
            Some((id, qty)) => LineDraft::new(id, qty),
            None => LineDraft::new(spec.as_str(), "1"),
        })
        .collect()
}

fn load_catalogs(data_dir: &Path) -> costbook_core::Result<Catalogs> {
    let inventory = InventoryStore::new(data_dir);
    Ok(Catalogs::new(
        inventory.map_by_id(Trade::Labor)?,
        inventory.map_by_id(Trade::Material)?,
        inventory.map_by_id(Trade::Equipment)?,
    ))
}

pub fn run(cmd: &ItemCmd, data_dir: &Path, output: OutputMode) -> anyhow::Result<()> {
    let store = DocumentStore::open(data_dir);
    match cmd {
        ItemCmd::Add(args) => {
            let catalogs = load_catalogs(data_dir).map_err(|e| fail(output, &e))?;
            let item = compute_work_item(&args.draft.to_draft(), &catalogs, None)
                .map_err(|e| fail(output, &e))?;
            store
                .add_work_item(&args.category, item.clone())
                .map_err(|e| fail(output, &e))?;
            render(output, &item, |item, w| print_work_item(item, w))
        }
        ItemCmd::Update(args) => {
            let catalogs = load_catalogs(data_dir).map_err(|e| fail(output, &e))?;
            let item = compute_work_item(&args.draft.to_draft(), &catalogs, Some(&args.id))
                .map_err(|e| fail(output, &e))?;
            store
                .replace_work_item(&args.category, item.clone())
                .map_err(|e| fail(output, &e))?;
            render(output, &item, |item, w| print_work_item(item, w))
        }
        ItemCmd::Delete(args) => {
            store
                .delete_work_item(&args.category, &args.id)
                .map_err(|e| fail(output, &e))?;
            render_success(output, &format!("deleted work item {}", args.id))
        }
        ItemCmd::Show(args) => {
            let item = store
                .find_work_item(&args.id)
                .map_err(|e| fail(output, &e))?
                .ok_or_else(|| {
                    fail(
                        output,
                        &Error::NotFound {
                            code: ErrorCode::WorkItemNotFound,
                            what: "work item",
                            id: args.id.clone(),
                        },
                    )
                })?;
            render(output, &item, |item, w| print_work_item(item, w))
        }
    }
}

fn print_work_item(item: &WorkItem, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "work item", &item.name)?;
    pretty_kv(w, "id", &item.id)?;
    pretty_kv(
        w,
        "unit of measure",
        format!("{} (basis {})", item.unit_of_measure, item.basis_quantity),
    )?;
    for (label, lines) in [
        ("labor", &item.labor),
        ("material", &item.material),
        ("equipment", &item.equipment),
    ] {
        for line in lines {
            writeln!(
                w,
                "  {label:<10} {:<24} {:>8} x {:>10.2} = {:>12.2}  ({})",
                line.name,
                line.quantity,
                line.unit_price,
                line.subtotal,
                format_unit(&line.unit)
            )?;
        }
    }
    pretty_kv(w, "labor total", format!("{:.2}", item.labor_total))?;
    pretty_kv(w, "material total", format!("{:.2}", item.material_total))?;
    pretty_kv(w, "equipment total", format!("{:.2}", item.equipment_total))?;
    pretty_kv(w, "cost per unit", format!("{:.2}", item.total_cost_per_unit))?;
    pretty_kv(
        w,
        "overhead (15%)",
        format!("{:.2}", item.contractor_overhead_15_percent),
    )?;
    pretty_kv(w, "sum total", format!("{:.2}", item.sum_total))?;
    pretty_kv(w, "price per unit", format!("{:.2}", item.price_per_unit))?;
    Ok(())
}
