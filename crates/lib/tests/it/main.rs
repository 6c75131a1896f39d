/*! Integration tests for treepack.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - codec: Round trips, key escaping and decoding of damaged trees
 * - backend: The TreeStore trait on the in-memory store, and its persistence
 * - storage: The Storage entry point and the point accessors
 * - value: The value model and its JSON conversion
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("treepack=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod codec;
mod storage;
