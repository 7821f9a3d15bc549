//! `cb inventory` — manage the master rate catalogs.

use crate::output::{fail, render, render_success, OutputMode};
use clap::{Args, Subcommand};
use costbook_core::model::{MasterItem, Trade};
use costbook_core::store::inventory::InventoryStore;
use costbook_core::units::format_unit;
use std::io::Write;
use std::path::Path;

/// Parse a trade name for clap (`labor`, `material`, `equipment`).
pub fn parse_trade(raw: &str) -> Result<Trade, String> {
    raw.parse::<Trade>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum InventoryCmd {
    /// List the catalog for one trade.
    List(ListArgs),
    /// Add a catalog entry.
    Add(AddArgs),
    /// Update a catalog entry's name, unit, or price.
    Update(UpdateArgs),
    /// Delete a catalog entry (existing work items keep their snapshots).
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Trade: labor, material, or equipment.
    #[arg(value_parser = parse_trade)]
    pub trade: Trade,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(value_parser = parse_trade)]
    pub trade: Trade,

    /// Name of the rate (e.g. "Mason").
    #[arg(short, long)]
    pub name: String,

    /// Unit the price applies to (e.g. "PerDay").
    #[arg(short, long)]
    pub unit: String,

    /// Price per unit; zero is rejected.
    #[arg(short, long)]
    pub price: f64,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_parser = parse_trade)]
    pub trade: Trade,

    /// Serial number of the entry to update.
    pub id: String,

    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub unit: String,

    #[arg(short, long)]
    pub price: f64,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[arg(value_parser = parse_trade)]
    pub trade: Trade,

    /// Serial number of the entry to delete.
    pub id: String,
}

pub fn run(cmd: &InventoryCmd, data_dir: &Path, output: OutputMode) -> anyhow::Result<()> {
    let store = InventoryStore::new(data_dir);
    match cmd {
        InventoryCmd::List(args) => {
            let items = store.list(args.trade).map_err(|e| fail(output, &e))?;
            render(output, &items, |items, w| print_catalog(items, w))
        }
        InventoryCmd::Add(args) => {
            let id = store
                .create(args.trade, &args.name, &args.unit, args.price)
                .map_err(|e| fail(output, &e))?;
            if output.is_json() {
                render(output, &serde_json::json!({ "id": id }), |_, _| Ok(()))
            } else {
                render_success(output, &format!("added {} item {id} ({})", args.trade, args.name))
            }
        }
        InventoryCmd::Update(args) => {
            store
                .update(args.trade, &args.id, &args.name, &args.unit, args.price)
                .map_err(|e| fail(output, &e))?;
            render_success(output, &format!("updated {} item {}", args.trade, args.id))
        }
        InventoryCmd::Delete(args) => {
            store
                .delete(args.trade, &args.id)
                .map_err(|e| fail(output, &e))?;
            render_success(output, &format!("deleted {} item {}", args.trade, args.id))
        }
    }
}

fn print_catalog(items: &[MasterItem], w: &mut dyn Write) -> std::io::Result<()> {
    if items.is_empty() {
        return writeln!(w, "(empty catalog)");
    }
    for item in items {
        writeln!(
            w,
            "{:<6} {:<28} {:<14} {:>12.2}",
            item.id,
            item.name,
            format_unit(&item.unit),
            item.price
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_trade;
    use costbook_core::model::Trade;

    #[test]
    fn trade_parser_accepts_the_three_catalogs() {
        assert_eq!(parse_trade("labor").unwrap(), Trade::Labor);
        assert_eq!(parse_trade("Material").unwrap(), Trade::Material);
        assert!(parse_trade("overhead").is_err());
    }
}
