//! hdlws: the command-line front end for HDL project workspaces.
//!
//! Provides `hdlws init` and `hdlws import` to set up a workspace, `list` and
//! `activate` to manage its projects, `hierarchy` and `top` to inspect the
//! parsed module tree, `diagram` and `serve` for block-diagram layout, and
//! `watch` to keep project files in sync with the disk.

#![warn(missing_docs)]

mod diagram;
mod hierarchy;
mod logging;
mod session;
mod watch;
mod workspace;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// hdlws: manage FPGA/HDL project workspaces.
#[derive(Parser, Debug)]
#[command(name = "hdlws", version, about = "HDL project workspace manager")]
pub struct Cli {
    /// Workspace directory (defaults to the current directory).
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a workspace file in the workspace directory.
    Init,
    /// Register a directory as a project.
    Import {
        /// Project root directory.
        dir: PathBuf,

        /// Project name (defaults to the directory name).
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List projects and the active project's files.
    List,
    /// Make a project the active one.
    Activate {
        /// Project name.
        name: String,
    },
    /// Parse the active project and print its module hierarchy.
    Hierarchy {
        /// List every parsed module instead of the tree below the top module.
        #[arg(long)]
        flat: bool,

        /// Print JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },
    /// Set the top module of the active project.
    Top {
        /// Module name.
        name: String,
    },
    /// Lay out part of the hierarchy and print the diagram scene.
    Diagram {
        /// Dotted instance path below the top module.
        #[arg(short, long, default_value = "")]
        path: String,

        /// Draw the instance's submodules rather than the instance itself.
        #[arg(short, long)]
        submodules: bool,
    },
    /// Answer diagram view requests on stdin, one JSON object per line.
    Serve,
    /// Watch project roots and keep project files and the hierarchy current.
    Watch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let root = session::workspace_root(cli.workspace.as_deref())?;
    match cli.command {
        Command::Init => workspace::init(&root),
        Command::Import { ref dir, ref name } => workspace::import(&root, dir, name.as_deref()),
        Command::List => workspace::list(&root),
        Command::Activate { ref name } => workspace::activate(&root, name),
        Command::Hierarchy { flat, json } => hierarchy::run(&root, flat, json).await,
        Command::Top { ref name } => hierarchy::set_top(&root, name).await,
        Command::Diagram {
            ref path,
            submodules,
        } => diagram::run(&root, path, submodules).await,
        Command::Serve => diagram::serve(&root).await,
        Command::Watch => watch::run(&root).await,
    }
}
