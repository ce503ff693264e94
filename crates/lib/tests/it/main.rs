/*! Integration tests for Tessera.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - data: Nested property trees and their write policy
 * - blueprint: Defaults, merging, validation and the filter/extra split
 * - record: Records and the in-memory and file-backed stores
 * - auth: Group and per-account authorization
 * - user: Account lifecycle, authentication, avatars and rehydration
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tessera=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod auth;
mod blueprint;
mod data;
mod helpers;
mod record;
mod user;
