//! Point accessor commands: fetch, insert and delete single nodes.

use treepack::{backend::Payload, codec::CodecError};

use crate::backend::{load_store, save_store};
use crate::cli::{DeleteArgs, InsertArgs, PathArgs, StoreArgs};
use crate::commands::open_storage;
use crate::output::{OutputFormat, describe_payload};

/// Run the `fetch` command
pub fn fetch(
    args: &PathArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(&store_args.store)?;
    let payload = open_storage(&mut store, store_args)?.fetch(args.names.as_slice())?;

    match format {
        OutputFormat::Human => println!("{}", describe_payload(&payload)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&payload)?),
    }
    Ok(())
}

/// Run the `insert` command
pub fn insert(
    args: &InsertArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = parse_scalar(&args.value)?;

    let mut store = load_store(&store_args.store)?;
    open_storage(&mut store, store_args)?.insert(args.path.names.as_slice(), payload.clone())?;
    save_store(&store, &store_args.store)?;

    match format {
        OutputFormat::Human => println!(
            "Inserted {} at /{}",
            describe_payload(&payload),
            args.path.names.join("/")
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string(&payload)?),
    }
    Ok(())
}

/// Run the `delete` command
pub fn delete(
    args: &DeleteArgs,
    store_args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(&store_args.store)?;
    open_storage(&mut store, store_args)?.delete(args.path.names.as_slice(), args.recursive)?;
    save_store(&store, &store_args.store)?;

    let path = format!("/{}", args.path.names.join("/"));
    match format {
        OutputFormat::Human => println!("Deleted {path}"),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "deleted": path,
                "recursive": args.recursive,
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}

/// Parse a JSON scalar into the payload a point insert stores.
fn parse_scalar(text: &str) -> Result<Payload, Box<dyn std::error::Error>> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let payload = match json {
        serde_json::Value::Null => Payload::Empty,
        serde_json::Value::Bool(b) => Payload::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Payload::Int(i),
            (None, Some(x)) if !n.is_u64() => Payload::Float(x),
            _ => {
                return Err(CodecError::UnsupportedValueType {
                    kind: "int".to_string(),
                    reason: format!("{n} does not fit in a 64-bit signed integer"),
                }
                .into());
            }
        },
        serde_json::Value::String(s) => Payload::Bytes(s.into_bytes()),
        other => {
            return Err(CodecError::UnsupportedValueType {
                kind: if other.is_array() { "list" } else { "dict" }.to_string(),
                reason: "point inserts store a single scalar; use encode for containers"
                    .to_string(),
            }
            .into());
        }
    };
    Ok(payload)
}
