//! Runs in its own binary: the global subscriber can only be claimed once.

use quill_core::init_tracing;
use tracing::Level;

#[test]
fn test_second_init_is_ignored() {
    init_tracing(false, Level::INFO);
    init_tracing(true, Level::DEBUG);
    tracing::info!("still logging after a repeated init");
}
