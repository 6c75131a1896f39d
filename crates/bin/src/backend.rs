//! Store loading and saving, and codec configuration from CLI options.

use std::path::Path;

use treepack::{CodecConfig, backend::InMemory};

use crate::cli::StoreArgs;

/// Load the store file, or start an empty store if it does not exist yet
pub fn load_store(path: &Path) -> treepack::Result<InMemory> {
    let store = InMemory::load_from_file(path)?;
    tracing::debug!(
        path = %path.display(),
        nodes = store.node_count(),
        "Loaded store"
    );
    Ok(store)
}

/// Write the store back to its file
pub fn save_store(store: &InMemory, path: &Path) -> treepack::Result<()> {
    store.save_to_file(path)?;
    tracing::info!(path = %path.display(), nodes = store.node_count(), "Saved store");
    Ok(())
}

/// Split the `--group` option into node names
pub fn group_names(args: &StoreArgs) -> Vec<String> {
    args.group
        .as_deref()
        .map(|group| {
            group
                .split('/')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Build the codec configuration selected on the command line
pub fn codec_config(args: &StoreArgs) -> CodecConfig {
    CodecConfig::default()
        .with_target_device(args.device.as_str())
        .with_mapping_order(!args.unordered)
}
