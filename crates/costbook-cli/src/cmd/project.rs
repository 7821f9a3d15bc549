//! `cb project` — assemble projects from work-item quantities.

use crate::output::{fail, pretty_kv, render, render_success, OutputMode};
use clap::{Args, Subcommand};
use costbook_core::model::Project;
use costbook_core::store::document::DocumentStore;
use costbook_core::{Error, ErrorCode};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ProjectCmd {
    /// Create a project.
    Add(AddArgs),
    /// List all projects with their grand totals.
    List,
    /// Show one project with line and grand totals.
    Show(ShowArgs),
    /// Add a work item to a project (price snapshotted at add time).
    AddItem(AddItemArgs),
    /// Set the quantity of one project line.
    SetQty(SetQtyArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the new project.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct AddItemArgs {
    /// Project id.
    pub project: String,

    /// Work item id (searched across all categories).
    pub work_item: String,

    /// Quantity of the work item's unit.
    #[arg(short, long, default_value_t = 1.0)]
    pub qty: f64,
}

#[derive(Args, Debug)]
pub struct SetQtyArgs {
    /// Project id.
    pub project: String,

    /// Line instance id (shown by `cb project show`).
    pub instance: String,

    /// New quantity; text that fails to parse becomes 0.
    pub qty: String,
}

/// Display shape of a project: the persisted fields plus the derived
/// line totals and grand total, recomputed on every read.
#[derive(Debug, Serialize)]
struct ProjectView {
    id: String,
    name: String,
    items: Vec<LineView>,
    grand_total: f64,
}

#[derive(Debug, Serialize)]
struct LineView {
    instance_id: String,
    work_item_id: String,
    name: String,
    unit_of_measure: String,
    unit_price: f64,
    quantity: f64,
    total: f64,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        let grand_total = project.grand_total();
        Self {
            id: project.id,
            name: project.name,
            items: project
                .items
                .into_iter()
                .map(|line| LineView {
                    total: line.total(),
                    instance_id: line.instance_id,
                    work_item_id: line.work_item_id,
                    name: line.name,
                    unit_of_measure: line.unit_of_measure,
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                })
                .collect(),
            grand_total,
        }
    }
}

pub fn run(cmd: &ProjectCmd, data_dir: &Path, output: OutputMode) -> anyhow::Result<()> {
    let store = DocumentStore::open(data_dir);
    match cmd {
        ProjectCmd::Add(args) => {
            let id = store
                .create_project(&args.name)
                .map_err(|e| fail(output, &e))?;
            render(output, &serde_json::json!({ "id": id }), |_, w| {
                writeln!(w, "✓ created project {id} ({})", args.name)
            })
        }
        ProjectCmd::List => {
            let projects: Vec<ProjectView> = store
                .projects()
                .map_err(|e| fail(output, &e))?
                .into_iter()
                .map(ProjectView::from)
                .collect();
            render(output, &projects, |projects, w| {
                if projects.is_empty() {
                    return writeln!(w, "(no projects)");
                }
                for project in projects {
                    writeln!(
                        w,
                        "{:<38} {:<28} {:>14.2}",
                        project.id, project.name, project.grand_total
                    )?;
                }
                Ok(())
            })
        }
        ProjectCmd::Show(args) => {
            let project = store
                .project(&args.id)
                .map_err(|e| fail(output, &e))?
                .ok_or_else(|| {
                    fail(
                        output,
                        &Error::NotFound {
                            code: ErrorCode::ProjectNotFound,
                            what: "project",
                            id: args.id.clone(),
                        },
                    )
                })?;
            let view = ProjectView::from(project);
            render(output, &view, |view, w| print_project(view, w))
        }
        ProjectCmd::AddItem(args) => {
            let line = store
                .add_project_line(&args.project, &args.work_item, args.qty)
                .map_err(|e| fail(output, &e))?;
            if output.is_json() {
                render(
                    output,
                    &serde_json::json!({
                        "instance_id": line.instance_id,
                        "unit_price": line.unit_price,
                        "quantity": line.quantity,
                    }),
                    |_, _| Ok(()),
                )
            } else {
                render_success(
                    output,
                    &format!("added '{}' x {} to project", line.name, line.quantity),
                )
            }
        }
        ProjectCmd::SetQty(args) => {
            store
                .set_line_quantity(&args.project, &args.instance, &args.qty)
                .map_err(|e| fail(output, &e))?;
            render_success(output, &format!("updated line {}", args.instance))
        }
    }
}

fn print_project(view: &ProjectView, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "project", &view.name)?;
    pretty_kv(w, "id", &view.id)?;
    for line in &view.items {
        writeln!(
            w,
            "  {:<38} {:<24} {:>8} x {:>10.2} = {:>12.2}",
            line.instance_id, line.name, line.quantity, line.unit_price, line.total
        )?;
    }
    pretty_kv(w, "grand total", format!("{:.2}", view.grand_total))?;
    Ok(())
}
