//! The `tree` command: list every node under the group.

use treepack::{
    backend::{InMemory, NodeId, NodeKind, TreeStore},
    constants::ORDINAL_ATTR,
    path::NodePath,
};

use crate::backend::load_store;
use crate::cli::StoreArgs;
use crate::commands::open_storage;
use crate::output::{OutputFormat, describe_payload, print_table};

/// One listed node
struct NodeRow {
    path: NodePath,
    kind: NodeKind,
    tag: Option<String>,
    ordinal: Option<String>,
    detail: String,
}

/// Run the `tree` command
pub fn run(store_args: &StoreArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(&store_args.store)?;
    let root = open_storage(&mut store, store_args)?.root();

    let mut rows = Vec::new();
    collect(&store, root, NodePath::root(), &mut rows)?;

    match format {
        OutputFormat::Human => {
            if rows.len() == 1 && rows[0].tag.is_none() {
                println!("Group is empty.");
                return Ok(());
            }
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.path.to_string(),
                        row.kind.to_string(),
                        row.tag.clone().unwrap_or_else(|| "-".to_string()),
                        row.ordinal.clone().unwrap_or_default(),
                        row.detail.clone(),
                    ]
                })
                .collect();
            print_table(&["PATH", "NODE", "TAG", "ORDINAL", "CONTENT"], &table);
        }
        OutputFormat::Json => {
            let entries: Vec<_> = rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "path": row.path.to_string(),
                        "node": row.kind,
                        "tag": row.tag,
                        "ordinal": row.ordinal,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}

/// Depth-first walk in name order
fn collect(
    store: &InMemory,
    node: NodeId,
    path: NodePath,
    rows: &mut Vec<NodeRow>,
) -> treepack::Result<()> {
    let kind = store.node_kind(node)?;
    let mut children = match kind {
        NodeKind::Group => store.children(node)?,
        NodeKind::Leaf => Vec::new(),
    };
    children.sort();

    let detail = match kind {
        NodeKind::Group => format!("{} children", children.len()),
        NodeKind::Leaf => describe_payload(&store.payload(node)?),
    };
    rows.push(NodeRow {
        path: path.clone(),
        kind,
        tag: store.tag(node)?,
        ordinal: store.attr(node, ORDINAL_ATTR)?,
        detail,
    });

    for name in children {
        if let Some(child) = store.child(node, &name)? {
            collect(store, child, path.join(name.as_str()), rows)?;
        }
    }
    Ok(())
}
