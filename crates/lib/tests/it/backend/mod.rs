//! Tree store integration tests
//!
//! These exercise the `TreeStore` trait through the in-memory store, and the
//! JSON persistence of whole encoded trees.

mod persistence;
mod store_operations;
