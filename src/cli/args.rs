//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Editable organizational chart: replay actions and print the resulting chart
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Extra config file, applied over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "ORGTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Allow branch members under branch members
    #[arg(long, global = true)]
    pub nested_branches: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply an action script and print the chart
    Replay {
        /// Script file, or - for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Print the chart after every action
        #[arg(long)]
        steps: bool,
        /// Fail on the first action that leaves the chart unchanged
        #[arg(long)]
        strict: bool,
        /// Print root-to-leaf branches instead of the outline
        #[arg(short, long)]
        branches: bool,
    },

    /// Build and print a small sample chart
    Demo {
        /// Print root-to-leaf branches instead of the outline
        #[arg(short, long)]
        branches: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}
