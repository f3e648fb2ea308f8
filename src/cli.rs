//! CLI definitions for regpilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use regpilot_protocols::Mode;

/// regpilot CLI.
#[derive(Parser)]
#[command(name = "regpilot")]
#[command(about = "Drives course planning and registration pages in Chrome")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.regpilot/config.toml)
    #[arg(short, long, global = true, env = "REGPILOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the list of classes to add
    Classes {
        #[command(subcommand)]
        action: ClassesAction,
    },

    /// Show the status log of the last run
    Status {
        /// Clear the log instead of printing it
        #[arg(long)]
        clear: bool,
    },

    /// Open a tab and run a workflow until it finishes
    Run {
        #[arg(value_enum)]
        workflow: Workflow,
    },
}

#[derive(Subcommand)]
pub(crate) enum ClassesAction {
    /// Add classes, e.g. "CSE 373 A AA"
    Add {
        #[arg(required = true)]
        specs: Vec<String>,
    },

    /// Remove a class by its position in `classes list`
    Remove { index: usize },

    /// List the saved classes
    List,

    /// Remove every saved class
    Clear,
}

/// Workflows selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Workflow {
    /// Select the term and submit the planned schedule
    Register,
    /// Add the saved classes on the planning site
    AddClasses,
    /// Add the saved classes, then register
    AddAndRegister,
}

impl From<Workflow> for Mode {
    fn from(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Register => Mode::Registration,
            Workflow::AddClasses => Mode::AddClasses,
            Workflow::AddAndRegister => Mode::AddClassesAndRegister,
        }
    }
}
