//! CLI argument definitions for the treepack binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Encode, decode and inspect typed value trees
#[derive(Parser, Debug)]
#[command(name = "treepack")]
#[command(about = "treepack: typed nested values in a hierarchical key-value store")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options selecting the store file and the group to work under
#[derive(clap::Args, Debug, Clone)]
pub struct StoreArgs {
    /// Store file, created on first write
    #[arg(
        short,
        long,
        global = true,
        default_value = "treepack.json",
        env = "TREEPACK_STORE"
    )]
    pub store: PathBuf,

    /// Group to work under, as a slash-separated path such as `models/run1`
    #[arg(short, long, global = true)]
    pub group: Option<String>,

    /// Device decoded tensors are placed on
    #[arg(long, global = true, default_value = "cpu", env = "TREEPACK_DEVICE")]
    pub device: String,

    /// Do not record mapping order; decoded mappings are ordered by key name
    #[arg(long, global = true)]
    pub unordered: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON document into the group
    Encode(EncodeArgs),
    /// Decode the group and print it as JSON
    Decode,
    /// Print the leaf at a path
    Fetch(PathArgs),
    /// Write a JSON scalar as an untagged leaf at a path
    Insert(InsertArgs),
    /// Delete the node at a path
    Delete(DeleteArgs),
    /// List every node under the group
    Tree,
}

/// Arguments for the encode command
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// JSON document to encode, or `-` for stdin
    pub input: PathBuf,
}

/// A path of raw node names
#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Node names from the group downwards
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the insert command
#[derive(clap::Args, Debug)]
pub struct InsertArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// JSON scalar to store: null, a boolean, a number or a string
    #[arg(long)]
    pub value: String,
}

/// Arguments for the delete command
#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Also delete ancestor groups left empty
    #[arg(short, long)]
    pub recursive: bool,
}
