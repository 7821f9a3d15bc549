#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "costbook: construction cost estimation from the command line",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Data directory holding the catalogs and the main document.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Catalogs",
        about = "Manage the master rate catalogs",
        after_help = "EXAMPLES:\n    # Add a labor rate\n    cb inventory add labor --name Mason --unit PerDay --price 800\n\n    # List materials as JSON\n    cb inventory list material --json"
    )]
    Inventory {
        #[command(subcommand)]
        command: cmd::inventory::InventoryCmd,
    },

    #[command(
        next_help_heading = "Estimating",
        about = "Manage work-item categories",
        after_help = "EXAMPLES:\n    # Create a category\n    cb category add Masonry\n\n    # Show a category's work items\n    cb category show <id>"
    )]
    Category {
        #[command(subcommand)]
        command: cmd::category::CategoryCmd,
    },

    #[command(
        next_help_heading = "Estimating",
        about = "Build and inspect work items",
        after_help = "EXAMPLES:\n    # Price brickwork per 2 cubic meters\n    cb item add --category <id> --name Brickwork --unit \"Cubic Meter\" \\\n        --basis 2 --labor 1:2 --material 1:5"
    )]
    Item {
        #[command(subcommand)]
        command: cmd::item::ItemCmd,
    },

    #[command(
        next_help_heading = "Projects",
        about = "Assemble projects from work-item quantities",
        after_help = "EXAMPLES:\n    # Create a project and cost 3 units of a work item\n    cb project add \"Site A\"\n    cb project add-item <project-id> <work-item-id> --qty 3"
    )]
    Project {
        #[command(subcommand)]
        command: cmd::project::ProjectCmd,
    },

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COSTBOOK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "costbook=debug,info"
        } else {
            "costbook=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Inventory { ref command } => cmd::inventory::run(command, &data_dir, output),
        Commands::Category { ref command } => cmd::category::run(command, &data_dir, output),
        Commands::Item { ref command } => cmd::item::run(command, &data_dir, output),
        Commands::Project { ref command } => cmd::project::run(command, &data_dir, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["cb", "--json", "category", "list"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["cb", "category", "list", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["cb", "project", "list"]);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn data_dir_flag_is_global() {
        let cli = Cli::parse_from(["cb", "inventory", "list", "labor", "--data-dir", "/tmp/x"]);
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/x")));
    }

    #[test]
    fn inventory_add_parses() {
        let cli = Cli::parse_from([
            "cb", "inventory", "add", "labor", "--name", "Mason", "--unit", "PerDay", "--price",
            "800",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Inventory {
                command: cmd::inventory::InventoryCmd::Add(_)
            }
        ));
    }

    #[test]
    fn item_add_parses_repeated_lines() {
        let cli = Cli::parse_from([
            "cb", "item", "add", "--category", "c-1", "--name", "Brickwork", "--basis", "2",
            "--labor", "1:2", "--material", "1:5", "--material", "2:1",
        ]);
        let Commands::Item {
            command: cmd::item::ItemCmd::Add(args),
        } = cli.command
        else {
            panic!("expected item add");
        };
        assert_eq!(args.draft.labor.len(), 1);
        assert_eq!(args.draft.material.len(), 2);
        assert_eq!(args.draft.basis, "2");
    }

    #[test]
    fn project_add_item_defaults_quantity_to_one() {
        let cli = Cli::parse_from(["cb", "project", "add-item", "p-1", "w-1"]);
        let Commands::Project {
            command: cmd::project::ProjectCmd::AddItem(args),
        } = cli.command
        else {
            panic!("expected project add-item");
        };
        assert_eq!(args.qty, 1.0);
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["cb", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["cb", "inventory", "list", "labor"],
            vec!["cb", "inventory", "add", "labor", "-n", "x", "-u", "y", "-p", "1"],
            vec!["cb", "inventory", "update", "labor", "1", "-n", "x", "-u", "y", "-p", "1"],
            vec!["cb", "inventory", "delete", "labor", "1"],
            vec!["cb", "category", "add", "Masonry"],
            vec!["cb", "category", "list"],
            vec!["cb", "category", "show", "c-1"],
            vec!["cb", "item", "add", "-c", "c-1", "-n", "Brickwork"],
            vec!["cb", "item", "update", "w-1", "-c", "c-1", "-n", "Brickwork"],
            vec!["cb", "item", "delete", "w-1", "-c", "c-1"],
            vec!["cb", "item", "show", "w-1"],
            vec!["cb", "project", "add", "Site A"],
            vec!["cb", "project", "list"],
            vec!["cb", "project", "show", "p-1"],
            vec!["cb", "project", "add-item", "p-1", "w-1", "--qty", "3"],
            vec!["cb", "project", "set-qty", "p-1", "i-1", "4"],
            vec!["cb", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }
}
