//! Storage integration tests
//!
//! The point accessors (`fetch`, `insert`, `delete`) and end-to-end
//! scenarios through the `Storage` entry point.

mod accessors;
mod scenario;
