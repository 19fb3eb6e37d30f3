use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal command-line toolbox")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read settings from this file instead of ~/.config/twlib/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace symlinks in the given directory with their associated files/directories
    RevertSymlinks {
        /// Directory containing the symlinks
        root: PathBuf,

        /// Exclude links with a path component equal to this name (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,

        /// Report what would be replaced without touching anything
        #[arg(short, long)]
        dry_run: bool,

        /// Move the targets instead of copying them
        #[arg(short, long = "move")]
        move_targets: bool,
    },
}
