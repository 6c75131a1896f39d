use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("treepack=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    let store_args = &cli.store;

    match &cli.command {
        Commands::Encode(args) => commands::codec::encode(args, store_args, format),
        Commands::Decode => commands::codec::decode(store_args, format),
        Commands::Fetch(args) => commands::access::fetch(args, store_args, format),
        Commands::Insert(args) => commands::access::insert(args, store_args, format),
        Commands::Delete(args) => commands::access::delete(args, store_args, format),
        Commands::Tree => commands::tree::run(store_args, format),
    }
}
