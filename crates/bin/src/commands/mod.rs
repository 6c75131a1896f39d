//! Subcommand implementations.

pub mod access;
pub mod codec;
pub mod tree;

use std::sync::Arc;

use treepack::{Storage, backend::InMemory, codec::TracingSink};

use crate::backend::{codec_config, group_names};
use crate::cli::StoreArgs;

/// Open the group selected by `args` in `store`, logging codec events
pub fn open_storage<'s>(
    store: &'s mut InMemory,
    args: &StoreArgs,
) -> treepack::Result<Storage<'s, InMemory>> {
    Ok(Storage::open(store, group_names(args))?
        .with_config(codec_config(args))
        .with_event_sink(Arc::new(TracingSink)))
}
