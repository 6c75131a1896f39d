//! Whole-value commands: encode a JSON document, decode the group.

use std::io::Read;

use treepack::value::Value;

use crate::backend::{load_store, save_store};
use crate::cli::{EncodeArgs, StoreArgs};
use crate::commands::open_storage;
use crate::output::OutputFormat;

/// Run the `encode` command
pub fn encode(
    args: &EncodeArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(&args.input)?
    };
    let value = Value::from_json(serde_json::from_str(&text)?)?;

    let mut store = load_store(&store_args.store)?;
    open_storage(&mut store, store_args)?.from_value(&value)?;
    save_store(&store, &store_args.store)?;

    match format {
        OutputFormat::Human => println!("Encoded {} value into {}", value.kind(), store_args.store.display()),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "kind": value.kind().tag(),
                "nodes": store.node_count(),
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}

/// Run the `decode` command
pub fn decode(store_args: &StoreArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(&store_args.store)?;
    let value = open_storage(&mut store, store_args)?.to_value()?;

    match format {
        OutputFormat::Human => println!("{}", serde_json::to_string_pretty(&value.to_json())?),
        OutputFormat::Json => println!("{}", serde_json::to_string(&value.to_json())?),
    }
    Ok(())
}
