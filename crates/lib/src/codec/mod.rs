//! The typed tree codec.
//!
//! The codec maps [`Value`](crate::value::Value)s onto a
//! [`TreeStore`](crate::backend::TreeStore) and back:
//!
//! - [`key`]: escaping of mapping keys into node names
//! - [`encoder`]: the recursive writer
//! - [`decoder`]: the recursive reader
//! - [`events`]: non-fatal conditions reported through an [`EventSink`]
//! - [`errors`]: [`CodecError`]
//!
//! Most callers go through [`Storage`](crate::Storage), which binds a store
//! subtree to a configuration and an event sink.

pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod events;
pub mod key;

pub use decoder::Decoder;
pub use encoder::{Encoder, pack};
pub use errors::CodecError;
pub use events::{CodecEvent, EventSink, NoopSink, RecordingSink, TracingSink};
pub use key::{decode_key, encode_key, is_reserved};
