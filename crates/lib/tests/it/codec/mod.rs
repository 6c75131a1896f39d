//! Codec integration tests
//!
//! Whole-value round trips, key escaping properties and the behaviour of the
//! decoder on trees that were not written by the encoder.

mod keys;
mod round_trip;
