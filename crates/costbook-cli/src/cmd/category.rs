//! `cb category` — manage work-item categories.

use crate::output::{fail, pretty_kv, render, OutputMode};
use clap::{Args, Subcommand};
use costbook_core::model::Category;
use costbook_core::store::document::DocumentStore;
use costbook_core::units::format_unit;
use costbook_core::{Error, ErrorCode};
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum CategoryCmd {
    /// Create a category.
    Add(AddArgs),
    /// List all categories.
    List,
    /// Show one category with its work items.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the new category.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Category id.
    pub id: String,
}

pub fn run(cmd: &CategoryCmd, data_dir: &Path, output: OutputMode) -> anyhow::Result<()> {
    let store = DocumentStore::open(data_dir);
    match cmd {
        CategoryCmd::Add(args) => {
            let id = store
                .create_category(&args.name)
                .map_err(|e| fail(output, &e))?;
            render(output, &serde_json::json!({ "id": id }), |_, w| {
                writeln!(w, "✓ created category {id} ({})", args.name)
            })
        }
        CategoryCmd::List => {
            let categories = store.categories().map_err(|e| fail(output, &e))?;
            render(output, &categories, |categories, w| {
                if categories.is_empty() {
                    return writeln!(w, "(no categories)");
                }
                for category in categories {
                    writeln!(
                        w,
                        "{:<38} {:<28} {} work items",
                        category.id,
                        category.name,
                        category.work_items.len()
                    )?;
                }
                Ok(())
            })
        }
        CategoryCmd::Show(args) => {
            let category = store
                .category(&args.id)
                .map_err(|e| fail(output, &e))?
                .ok_or_else(|| {
                    fail(
                        output,
                        &Error::NotFound {
                            code: ErrorCode::CategoryNotFound,
                            what: "category",
                            id: args.id.clone(),
                        },
                    )
                })?;
            render(output, &category, |category, w| print_category(category, w))
        }
    }
}

fn print_category(category: &Category, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "category", &category.name)?;
    pretty_kv(w, "id", &category.id)?;
    if category.work_items.is_empty() {
        return writeln!(w, "(no work items)");
    }
    for item in &category.work_items {
        writeln!(
            w,
            "{:<38} {:<28} {:>12.2} per {}",
            item.id,
            item.name,
            item.price_per_unit,
            format_unit(&item.unit_of_measure)
        )?;
    }
    Ok(())
}
