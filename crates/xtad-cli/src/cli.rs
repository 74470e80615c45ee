use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xtad",
    about = "Real/virtual object store: create, duplicate, and reference-count objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store directory (overrides `base_dir` from the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a one-record object
    Create(CreateArgs),
    /// Show an object's metadata, records, and references
    Show(IdArgs),
    /// List every named object
    List,
    /// List objects with a zero reference count
    Orphans,
    /// Deep-copy an object and everything it references
    Dup(IdArgs),
    /// Copy one object verbatim, sharing its references
    DupShallow(DupShallowArgs),
    /// Increment an object's reference count
    Inc(IdArgs),
    /// Decrement an object's reference count
    Dec(IdArgs),
    /// Physically delete an object's files
    Rm(IdArgs),
    /// Change an object's display name
    Rename(RenameArgs),
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CreateArgs {
    pub name: String,
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DupShallowArgs {
    pub id: String,
    pub name: String,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    pub name: String,
}
